//! `executions`: list workflow executions run against an asset.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use assetver_core::error::AppError;
use assetver_entity::workflow::WorkflowRef;

use super::AssetArgs;
use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the executions command
#[derive(Debug, Args)]
pub struct ExecutionsArgs {
    #[command(flatten)]
    pub asset: AssetArgs,
    /// Only executions of this workflow
    #[arg(long)]
    pub workflow: Option<String>,
    /// Database of the workflow (defaults to the asset's database)
    #[arg(long, requires = "workflow")]
    pub workflow_database: Option<String>,
}

/// Execution display row
#[derive(Debug, Serialize, Tabled)]
struct ExecutionRow {
    /// Execution ID
    execution_id: String,
    /// Workflow
    workflow: String,
    /// Status
    status: String,
    /// Started
    start_date: String,
    /// Stopped
    stop_date: String,
}

/// Execute the executions command
pub async fn execute(
    args: &ExecutionsArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let workflow = args.workflow.as_ref().map(|id| WorkflowRef {
        workflow_database_id: args
            .workflow_database
            .clone()
            .unwrap_or_else(|| args.asset.database_id.clone()),
        workflow_id: id.clone(),
    });

    let records = ctx
        .executions()
        .list_executions(&args.asset.asset_ref(), workflow.as_ref())
        .await?;

    let rows: Vec<ExecutionRow> = records
        .iter()
        .map(|r| ExecutionRow {
            execution_id: r.execution_id.clone(),
            workflow: r.workflow_id.clone(),
            status: r.execution_status.clone(),
            start_date: r.start_date.clone(),
            stop_date: r.stop_date.clone(),
        })
        .collect();

    output::print_list(&rows, &records, format);
    Ok(())
}
