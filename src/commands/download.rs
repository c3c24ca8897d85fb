//! `download`: save files of a version locally.

use clap::Args;
use futures::future::join_all;
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use assetver_core::error::AppError;
use assetver_entity::download::DownloadEvent;

use super::AssetArgs;
use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the download command
#[derive(Debug, Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub asset: AssetArgs,
    /// Version the files belong to
    pub version: String,
    /// Relative keys of the files to download
    #[arg(required = true)]
    pub keys: Vec<String>,
    /// Directory to save into (defaults to downloads.output_dir)
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

/// Download result row
#[derive(Debug, Serialize, Tabled)]
struct DownloadRow {
    /// Relative key
    file: String,
    /// Outcome
    status: String,
    /// Saved path or error message
    detail: String,
}

/// Execute the download command. Ctrl-C cancels every in-flight download.
pub async fn execute(
    args: &DownloadArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut session = ctx
        .session(&args.asset.asset_ref(), args.output_dir.as_deref())
        .await?;
    session.select_version(&args.version).await?;

    let mut rows = Vec::with_capacity(args.keys.len());
    let mut handles = Vec::new();
    for key in &args.keys {
        match session.download(key) {
            Ok(handle) => handles.push(handle),
            Err(e) => rows.push(DownloadRow {
                file: key.clone(),
                status: "rejected".to_string(),
                detail: e.message,
            }),
        }
    }

    let finished = join_all(handles.into_iter().map(|h| async move {
        let key = h.relative_key.clone();
        (key, h.finish().await)
    }));
    tokio::pin!(finished);

    let results = tokio::select! {
        results = &mut finished => results,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; cancelling downloads");
            session.close();
            finished.await
        }
    };

    let mut failed = rows.len();
    for (key, event) in results {
        let (status, detail) = match event {
            DownloadEvent::Complete { saved_to, .. } => ("complete".to_string(), saved_to),
            DownloadEvent::Error { message } => {
                failed += 1;
                ("error".to_string(), message)
            }
            DownloadEvent::Progress { .. } => continue,
        };
        rows.push(DownloadRow {
            file: key,
            status,
            detail,
        });
    }

    output::print_list(&rows, &rows, format);
    if failed == 0 {
        output::print_success(&format!("Downloaded {} file(s)", rows.len()));
        Ok(())
    } else {
        Err(AppError::external_service(format!(
            "{failed} of {} download(s) failed",
            rows.len()
        )))
    }
}
