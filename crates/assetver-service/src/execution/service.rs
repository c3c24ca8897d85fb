//! Lists workflow executions for an asset, refreshing unfinished ones.

use std::sync::Arc;

use tracing::{debug, warn};

use assetver_core::result::AppResult;
use assetver_entity::asset::AssetRef;
use assetver_entity::workflow::{ExecutionRecord, WorkflowRef};
use assetver_storage::workflow::{ExecutionStatusSource, ExecutionStore};

/// Reads execution records and brings running ones up to date.
#[derive(Debug, Clone)]
pub struct ExecutionService {
    store: Arc<dyn ExecutionStore>,
    status: Arc<dyn ExecutionStatusSource>,
    page_limit: usize,
}

impl ExecutionService {
    /// Create an execution service returning at most `page_limit` records.
    pub fn new(
        store: Arc<dyn ExecutionStore>,
        status: Arc<dyn ExecutionStatusSource>,
        page_limit: usize,
    ) -> Self {
        Self {
            store,
            status,
            page_limit: page_limit.max(1),
        }
    }

    /// Executions for an asset, newest first.
    ///
    /// Records without a stop date are described afresh; those found stopped
    /// are written back to the store. A record whose refresh fails is logged
    /// and left out of the result.
    pub async fn list_executions(
        &self,
        asset: &AssetRef,
        workflow: Option<&WorkflowRef>,
    ) -> AppResult<Vec<ExecutionRecord>> {
        let records = self
            .store
            .list_executions(asset, workflow, self.page_limit)
            .await?;

        let mut result = Vec::with_capacity(records.len());
        for mut record in records {
            if !record.needs_refresh() {
                result.push(record);
                continue;
            }
            match self.refresh(&mut record).await {
                Ok(()) => result.push(record),
                Err(e) => warn!(
                    asset = %asset,
                    execution_id = %record.execution_id,
                    error = %e,
                    "Skipping execution that could not be refreshed"
                ),
            }
        }

        debug!(asset = %asset, count = result.len(), "Listed executions");
        Ok(result)
    }

    async fn refresh(&self, record: &mut ExecutionRecord) -> AppResult<()> {
        let snapshot = self.status.describe_execution(&record.execution_arn()).await?;
        if record.apply_snapshot(&snapshot) {
            self.store.save_execution(record).await?;
            debug!(
                execution_id = %record.execution_id,
                status = %record.execution_status,
                "Stopped execution persisted"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetver_entity::workflow::{ExecutionSnapshot, ExecutionStatus};
    use assetver_storage::catalog::{CatalogDocument, CatalogStore};
    use chrono::{TimeZone, Utc};

    const WORKFLOW_ARN: &str = "arn:aws:states:us-east-1:111:stateMachine:wf-1";

    fn record(execution_id: &str, stop_date: &str) -> ExecutionRecord {
        ExecutionRecord {
            database_id: "db1".to_string(),
            asset_id: "a1".to_string(),
            workflow_database_id: "db1".to_string(),
            workflow_id: "wf-1".to_string(),
            workflow_arn: WORKFLOW_ARN.to_string(),
            execution_id: execution_id.to_string(),
            execution_status: if stop_date.is_empty() {
                String::new()
            } else {
                "SUCCEEDED".to_string()
            },
            start_date: String::new(),
            stop_date: stop_date.to_string(),
        }
    }

    fn snapshot(execution_id: &str, status: ExecutionStatus, stopped: bool) -> ExecutionSnapshot {
        ExecutionSnapshot {
            execution_arn: format!("arn:aws:states:us-east-1:111:execution:wf-1:{execution_id}"),
            name: execution_id.to_string(),
            status,
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap()),
            stop_date: stopped.then(|| Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_refreshes_unfinished_and_skips_failures() {
        let store = CatalogStore::from_document(CatalogDocument {
            executions: vec![
                record("done", "01/01/2024, 00:00:00"),
                record("running", ""),
                record("finished-now", ""),
                record("unknown", ""),
            ],
            execution_snapshots: vec![
                snapshot("running", ExecutionStatus::Running, false),
                snapshot("finished-now", ExecutionStatus::Failed, true),
            ],
            ..Default::default()
        });
        let service = ExecutionService::new(
            Arc::new(store.clone()),
            Arc::new(store.status_source()),
            50,
        );

        let records = service
            .list_executions(&AssetRef::new("db1", "a1"), None)
            .await
            .unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.execution_id.as_str()).collect();
        assert_eq!(ids, vec!["finished-now", "running", "done"]);

        assert_eq!(records[0].execution_status, "FAILED");
        assert_eq!(records[0].start_date, "03/04/2024, 05:06:07");
        assert_eq!(records[0].stop_date, "03/04/2024, 06:00:00");
        assert_eq!(records[1].execution_status, "RUNNING");
        assert!(records[1].stop_date.is_empty());

        let stored = store.snapshot().await;
        let persisted = stored
            .executions
            .iter()
            .find(|r| r.execution_id == "finished-now")
            .unwrap();
        assert_eq!(persisted.execution_status, "FAILED");
        let still_running = stored
            .executions
            .iter()
            .find(|r| r.execution_id == "running")
            .unwrap();
        assert!(still_running.execution_status.is_empty());
    }

    #[tokio::test]
    async fn test_respects_page_limit() {
        let store = CatalogStore::from_document(CatalogDocument {
            executions: (0..5)
                .map(|i| record(&format!("e{i}"), "01/01/2024, 00:00:00"))
                .collect(),
            ..Default::default()
        });
        let service = ExecutionService::new(
            Arc::new(store.clone()),
            Arc::new(store.status_source()),
            2,
        );
        let records = service
            .list_executions(&AssetRef::new("db1", "a1"), None)
            .await
            .unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.execution_id.as_str()).collect();
        assert_eq!(ids, vec!["e4", "e3"]);
    }
}
