//! `versions`: list an asset's versions.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use assetver_core::error::AppError;
use assetver_core::types::pagination::TokenRequest;
use assetver_service::file::format_date;

use super::AssetArgs;
use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the versions command
#[derive(Debug, Args)]
pub struct VersionsArgs {
    #[command(flatten)]
    pub asset: AssetArgs,
    /// Token returned by a previous page
    #[arg(long)]
    pub starting_token: Option<String>,
    /// Maximum versions to return
    #[arg(long)]
    pub max_items: Option<u64>,
}

/// Version display row
#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version
    version: String,
    /// Current marker
    current: String,
    /// Created
    created: String,
    /// Created by
    created_by: String,
    /// File count
    files: u64,
    /// Comment
    comment: String,
}

/// Execute the versions command
pub async fn execute(
    args: &VersionsArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let request = TokenRequest {
        starting_token: args.starting_token.clone(),
        max_items: args.max_items,
    };
    let page = ctx
        .versions()
        .list_versions(&args.asset.asset_ref(), &request)
        .await?;

    let rows: Vec<VersionRow> = page
        .items
        .iter()
        .map(|v| VersionRow {
            version: v.version.clone(),
            current: if v.is_current { "*".into() } else { String::new() },
            created: format_date(Some(&v.date_created)),
            created_by: v.created_by.clone(),
            files: v.file_count,
            comment: v.comment.clone(),
        })
        .collect();

    output::print_list(&rows, &page, format);
    if let (OutputFormat::Table, Some(token)) = (format, &page.next_token) {
        output::print_kv("Next token", token);
    }
    Ok(())
}
