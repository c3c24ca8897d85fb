//! `create-version`: record the next version of an asset.

use clap::Args;

use assetver_core::error::AppError;
use assetver_entity::version::{CreateVersionRequest, FileSelection, VersionOperation};

use super::AssetArgs;
use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the create-version command
#[derive(Debug, Args)]
pub struct CreateVersionArgs {
    #[command(flatten)]
    pub asset: AssetArgs,
    /// Pin a file version as KEY@VERSION_ID; without any, the latest blobs are used
    #[arg(long = "file", value_parser = parse_selection)]
    pub files: Vec<FileSelection>,
    /// Accept pinned files whose key is currently archived
    #[arg(long)]
    pub allow_archived: bool,
    /// Version comment
    #[arg(long)]
    pub comment: Option<String>,
    /// Recorded as the version's creator
    #[arg(long, default_value = "system")]
    pub created_by: String,
}

fn parse_selection(value: &str) -> Result<FileSelection, String> {
    match value.rsplit_once('@') {
        Some((key, version_id)) if !key.is_empty() && !version_id.is_empty() => Ok(FileSelection {
            relative_key: key.to_string(),
            version_id: version_id.to_string(),
            is_archived: false,
        }),
        _ => Err(format!("expected KEY@VERSION_ID, got '{value}'")),
    }
}

/// Execute the create-version command
pub async fn execute(
    args: &CreateVersionArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let request = CreateVersionRequest {
        use_latest_files: args.files.is_empty(),
        files: args
            .files
            .iter()
            .cloned()
            .map(|selection| FileSelection {
                is_archived: args.allow_archived,
                ..selection
            })
            .collect(),
        comment: args.comment.clone(),
    };
    let op = ctx
        .versions()
        .create_version(&args.asset.asset_ref(), &request, &args.created_by)
        .await?;
    print_operation(&op, ctx, format);
    Ok(())
}

/// Print the outcome of a create or revert.
pub(super) fn print_operation(op: &VersionOperation, ctx: &AppContext, format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_json(op);
    } else {
        output::print_success(&op.message);
        output::print_kv("Version", &op.version);
        output::print_kv("Files", &op.file_count.to_string());
        for key in &op.skipped_files {
            output::print_warning(&format!("Skipped {key}"));
        }
    }
    if !ctx.config.catalog.persist_updates {
        output::print_warning("catalog.persist_updates is off; the version is not written to the catalog file.");
    }
}
