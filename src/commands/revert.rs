//! `revert`: record a new version restored from an older one.

use clap::Args;

use assetver_core::error::AppError;
use assetver_entity::version::RevertVersionRequest;

use super::AssetArgs;
use super::create_version::print_operation;
use crate::context::AppContext;
use crate::output::OutputFormat;

/// Arguments for the revert command
#[derive(Debug, Args)]
pub struct RevertArgs {
    #[command(flatten)]
    pub asset: AssetArgs,
    /// Version whose files are restored
    pub version: String,
    /// Version comment
    #[arg(long)]
    pub comment: Option<String>,
    /// Recorded as the version's creator
    #[arg(long, default_value = "system")]
    pub created_by: String,
}

/// Execute the revert command
pub async fn execute(args: &RevertArgs, ctx: &AppContext, format: OutputFormat) -> Result<(), AppError> {
    let request = RevertVersionRequest {
        version: args.version.clone(),
        comment: args.comment.clone(),
    };
    let op = ctx
        .versions()
        .revert_version(&args.asset.asset_ref(), &request, &args.created_by)
        .await?;
    print_operation(&op, ctx, format);
    Ok(())
}
