//! Workflow execution entities.

pub mod execution;

pub use execution::{ExecutionRecord, ExecutionSnapshot, ExecutionStatus, WorkflowRef};
