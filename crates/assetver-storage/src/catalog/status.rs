//! Execution status source backed by snapshots recorded in the catalog.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use assetver_core::error::AppError;
use assetver_core::result::AppResult;
use assetver_entity::workflow::ExecutionSnapshot;

use super::document::CatalogDocument;
use crate::workflow::ExecutionStatusSource;

/// Answers `describe_execution` from the catalog's `executionSnapshots`.
#[derive(Debug, Clone)]
pub struct RecordedStatusSource {
    document: Arc<RwLock<CatalogDocument>>,
}

impl RecordedStatusSource {
    pub(crate) fn new(document: Arc<RwLock<CatalogDocument>>) -> Self {
        Self { document }
    }
}

#[async_trait]
impl ExecutionStatusSource for RecordedStatusSource {
    async fn describe_execution(&self, execution_arn: &str) -> AppResult<ExecutionSnapshot> {
        let doc = self.document.read().await;
        doc.execution_snapshots
            .iter()
            .find(|s| s.execution_arn == execution_arn)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Execution {execution_arn} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use assetver_entity::workflow::ExecutionStatus;

    #[tokio::test]
    async fn test_describe_recorded_and_unknown() {
        let store = CatalogStore::from_document(CatalogDocument {
            execution_snapshots: vec![ExecutionSnapshot {
                execution_arn: "arn:aws:states:us-east-1:1:execution:wf:e1".to_string(),
                name: "e1".to_string(),
                status: ExecutionStatus::Running,
                start_date: None,
                stop_date: None,
            }],
            ..Default::default()
        });
        let source = store.status_source();

        let snap = source
            .describe_execution("arn:aws:states:us-east-1:1:execution:wf:e1")
            .await
            .unwrap();
        assert_eq!(snap.status, ExecutionStatus::Running);

        let err = source.describe_execution("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
