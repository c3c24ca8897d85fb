//! Workflow execution tracking.

pub mod service;

pub use service::ExecutionService;
