//! Workflow execution records and state-machine status snapshots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assetver_core::AppError;

/// Display format used for execution start and stop dates.
pub const EXECUTION_DATE_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

/// Status reported by the workflow state-machine service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Still running.
    Running,
    /// Finished successfully.
    Succeeded,
    /// Finished with an error.
    Failed,
    /// Exceeded its timeout.
    TimedOut,
    /// Stopped by an operator.
    Aborted,
    /// Failed and waiting to be redriven.
    PendingRedrive,
}

impl ExecutionStatus {
    /// Check if the execution has stopped.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running | Self::PendingRedrive)
    }

    /// Return the status as the service spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::TimedOut => "TIMED_OUT",
            Self::Aborted => "ABORTED",
            Self::PendingRedrive => "PENDING_REDRIVE",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RUNNING" => Ok(Self::Running),
            "SUCCEEDED" => Ok(Self::Succeeded),
            "FAILED" => Ok(Self::Failed),
            "TIMED_OUT" => Ok(Self::TimedOut),
            "ABORTED" => Ok(Self::Aborted),
            "PENDING_REDRIVE" => Ok(Self::PendingRedrive),
            _ => Err(AppError::validation(format!(
                "Invalid execution status: '{s}'"
            ))),
        }
    }
}

/// Identifies a workflow within a workflow database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRef {
    /// Database the workflow is defined in (may be the global database).
    pub workflow_database_id: String,
    /// Workflow identifier.
    pub workflow_id: String,
}

/// A workflow run against an asset, as tracked in the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Database of the asset the workflow ran against.
    pub database_id: String,
    /// Asset the workflow ran against.
    pub asset_id: String,
    /// Database the workflow is defined in.
    pub workflow_database_id: String,
    /// Workflow identifier.
    pub workflow_id: String,
    /// State-machine ARN of the workflow.
    #[serde(rename = "workflow_arn", alias = "workflowArn")]
    pub workflow_arn: String,
    /// Execution name within the state machine.
    pub execution_id: String,
    /// Last known status; empty until the execution is first described.
    #[serde(default)]
    pub execution_status: String,
    /// Formatted start date; empty when unknown.
    #[serde(default)]
    pub start_date: String,
    /// Formatted stop date; empty while running.
    #[serde(default)]
    pub stop_date: String,
}

impl ExecutionRecord {
    /// Execution ARN derived from the workflow's state-machine ARN.
    pub fn execution_arn(&self) -> String {
        format!(
            "{}:{}",
            self.workflow_arn.replace("stateMachine", "execution"),
            self.execution_id
        )
    }

    /// Whether the record has no stop date and may still be running.
    pub fn needs_refresh(&self) -> bool {
        self.stop_date.is_empty()
    }

    /// The workflow this execution belongs to.
    pub fn workflow(&self) -> WorkflowRef {
        WorkflowRef {
            workflow_database_id: self.workflow_database_id.clone(),
            workflow_id: self.workflow_id.clone(),
        }
    }

    /// Merge a fresh snapshot into the record. Returns `true` when the
    /// snapshot shows the execution stopped, meaning the record should be
    /// written back to the store.
    pub fn apply_snapshot(&mut self, snapshot: &ExecutionSnapshot) -> bool {
        self.execution_id = snapshot.name.clone();
        self.execution_status = snapshot.status.as_str().to_string();
        if let Some(start) = snapshot.start_date {
            self.start_date = start.format(EXECUTION_DATE_FORMAT).to_string();
        }
        match snapshot.stop_date {
            Some(stop) => {
                self.stop_date = stop.format(EXECUTION_DATE_FORMAT).to_string();
                true
            }
            None => false,
        }
    }
}

/// Live description of an execution from the state-machine service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSnapshot {
    /// Execution ARN.
    pub execution_arn: String,
    /// Execution name.
    pub name: String,
    /// Current status.
    pub status: ExecutionStatus,
    /// Start time.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Stop time, absent while running.
    #[serde(default)]
    pub stop_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ExecutionRecord {
        ExecutionRecord {
            database_id: "db".into(),
            asset_id: "chair".into(),
            workflow_database_id: "global".into(),
            workflow_id: "convert".into(),
            workflow_arn: "arn:aws:states:us-east-1:123:stateMachine:convert".into(),
            execution_id: "run-1".into(),
            execution_status: String::new(),
            start_date: String::new(),
            stop_date: String::new(),
        }
    }

    #[test]
    fn test_execution_arn() {
        assert_eq!(
            record().execution_arn(),
            "arn:aws:states:us-east-1:123:execution:convert:run-1"
        );
    }

    #[test]
    fn test_apply_running_snapshot_does_not_persist() {
        let mut r = record();
        let snapshot = ExecutionSnapshot {
            execution_arn: r.execution_arn(),
            name: "run-1".into(),
            status: ExecutionStatus::Running,
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            stop_date: None,
        };
        assert!(!r.apply_snapshot(&snapshot));
        assert_eq!(r.start_date, "03/01/2024, 09:30:00");
        assert_eq!(r.execution_status, "RUNNING");
        assert!(r.needs_refresh());
    }

    #[test]
    fn test_apply_stopped_snapshot_persists() {
        let mut r = record();
        let snapshot = ExecutionSnapshot {
            execution_arn: r.execution_arn(),
            name: "run-1".into(),
            status: ExecutionStatus::Succeeded,
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            stop_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 45, 5).unwrap()),
        };
        assert!(r.apply_snapshot(&snapshot));
        assert_eq!(r.stop_date, "03/01/2024, 09:45:05");
        assert!(!r.needs_refresh());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("timed_out".parse::<ExecutionStatus>().unwrap(), ExecutionStatus::TimedOut);
        assert!("bogus".parse::<ExecutionStatus>().is_err());
        assert!(ExecutionStatus::Aborted.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
    }
}
