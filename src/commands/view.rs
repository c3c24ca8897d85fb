//! `view`: resolve the viewer navigation for one file.

use clap::Args;

use assetver_core::error::AppError;
use assetver_entity::viewer::{ViewType, Viewer};
use assetver_service::file::{format_date, format_file_size};

use super::AssetArgs;
use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the view command
#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub asset: AssetArgs,
    /// Version the file belongs to
    pub version: String,
    /// Relative key of the file
    pub key: String,
    /// Renderer to use instead of the one inferred from the extension
    #[arg(long)]
    pub view_type: Option<ViewType>,
}

/// Execute the view command
pub async fn execute(args: &ViewArgs, ctx: &AppContext, format: OutputFormat) -> Result<(), AppError> {
    let asset = args.asset.asset_ref();
    let mut session = ctx.session(&asset, None).await?;
    session.select_version(&args.version).await?;

    let mut navigation = session.view_file(&args.key)?;
    if let Some(view_type) = args.view_type {
        navigation.viewer = Some(Viewer::build(view_type, &asset, &navigation.file));
    }

    if format == OutputFormat::Json {
        output::print_json(&navigation);
        return Ok(());
    }

    let file = &navigation.file;
    output::print_kv("Route", &navigation.route);
    output::print_kv("File", &file.file_name);
    output::print_kv("Key", &file.key);
    output::print_kv("Version ID", &file.version_id);
    output::print_kv("Size", &format_file_size(file.size));
    output::print_kv("Last modified", &format_date(file.last_modified.as_deref()));
    output::print_kv("Archived", if file.is_archived { "yes" } else { "no" });
    match &navigation.viewer {
        Some(viewer) => output::print_kv("Viewer", viewer.view_type().as_str()),
        None => output::print_warning("No viewer available for this file type."),
    }
    Ok(())
}
