//! Workflow execution store and live status source traits.

use async_trait::async_trait;

use assetver_core::result::AppResult;
use assetver_entity::asset::AssetRef;
use assetver_entity::workflow::{ExecutionRecord, ExecutionSnapshot, WorkflowRef};

/// Persistent table of workflow executions run against assets.
#[async_trait]
pub trait ExecutionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Executions for an asset, newest first, optionally narrowed to one
    /// workflow, returning at most `limit` records.
    async fn list_executions(
        &self,
        asset: &AssetRef,
        workflow: Option<&WorkflowRef>,
        limit: usize,
    ) -> AppResult<Vec<ExecutionRecord>>;

    /// Insert or replace a record, keyed by asset and execution id.
    async fn save_execution(&self, record: &ExecutionRecord) -> AppResult<()>;
}

/// Describes executions by ARN.
#[async_trait]
pub trait ExecutionStatusSource: Send + Sync + std::fmt::Debug + 'static {
    /// Current state of the execution with the given ARN.
    async fn describe_execution(&self, execution_arn: &str) -> AppResult<ExecutionSnapshot>;
}
