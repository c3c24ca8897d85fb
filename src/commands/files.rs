//! `files`: show one version's files, filtered and paged.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use assetver_core::error::AppError;
use assetver_core::types::pagination::PageResponse;
use assetver_entity::file::FileVersion;
use assetver_entity::version::StatusSummary;
use assetver_service::file::{format_date, format_file_size};

use super::AssetArgs;
use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the files command
#[derive(Debug, Args)]
pub struct FilesArgs {
    #[command(flatten)]
    pub asset: AssetArgs,
    /// Version to show
    pub version: String,
    /// Case-insensitive substring filter on file keys
    #[arg(long, default_value = "")]
    pub filter: String,
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u64,
    /// Files per page
    #[arg(long)]
    pub page_size: Option<u64>,
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// Relative key
    file: String,
    /// Status badge
    status: String,
    /// Size
    size: String,
    /// Last modified
    last_modified: String,
    /// Version ID
    version_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilesOutput<'a> {
    version: &'a str,
    created_by: &'a str,
    date_created: &'a str,
    comment: Option<&'a str>,
    summary: StatusSummary,
    page: &'a PageResponse<FileVersion>,
}

/// Execute the files command
pub async fn execute(args: &FilesArgs, ctx: &AppContext, format: OutputFormat) -> Result<(), AppError> {
    let mut session = ctx.session(&args.asset.asset_ref(), None).await?;
    session.select_version(&args.version).await?;
    if let Some(size) = args.page_size {
        session.set_page_size(size)?;
    }
    session.set_filter_text(args.filter.as_str());
    session.set_page(args.page);

    let page = session.visible_page();
    let summary = session.status_summary();
    let Some(details) = session.details() else {
        return Err(AppError::internal("Version details missing after selection"));
    };

    if format == OutputFormat::Json {
        output::print_json(&FilesOutput {
            version: &details.version,
            created_by: &details.created_by,
            date_created: &details.date_created,
            comment: details.comment.as_deref(),
            summary,
            page: &page,
        });
        return Ok(());
    }

    output::print_kv("Version", &details.version);
    output::print_kv("Created by", &details.created_by);
    output::print_kv("Created", &format_date(Some(&details.date_created)));
    if let Some(comment) = &details.comment {
        output::print_kv("Comment", comment);
    }
    output::print_kv(
        "Files",
        &format!(
            "{} available, {} archived, {} permanently deleted",
            summary.available, summary.archived, summary.permanently_deleted
        ),
    );

    if details.is_empty() {
        output::print_warning("No files associated with this version.");
        return Ok(());
    }

    let rows: Vec<FileRow> = page
        .items
        .iter()
        .map(|f| FileRow {
            file: f.relative_key.clone(),
            status: f.effective_state().badge().unwrap_or("").to_string(),
            size: format_file_size(f.size),
            last_modified: format_date(f.last_modified.as_deref()),
            version_id: f.version_id.clone(),
        })
        .collect();
    output::print_list(&rows, &page, format);

    if page.was_clamped() {
        output::print_warning(&format!(
            "Page {} is out of range; showing page {}.",
            page.requested_page, page.page
        ));
    }
    output::print_kv(
        "Page",
        &format!("{} of {} ({} files)", page.page, page.total_pages, page.total_items),
    );
    Ok(())
}
