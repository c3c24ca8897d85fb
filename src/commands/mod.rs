//! CLI command definitions and dispatch.

pub mod create_version;
pub mod download;
pub mod executions;
pub mod files;
pub mod revert;
pub mod versions;
pub mod view;

use clap::{Args, Parser, Subcommand};

use assetver_core::config::AppConfig;
use assetver_core::error::AppError;
use assetver_entity::asset::AssetRef;

use crate::context::AppContext;
use crate::output::OutputFormat;

/// Asset Versions: browse, view, download, and record asset versions
#[derive(Debug, Parser)]
#[command(name = "assetver", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from config/{env}
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the versions of an asset
    Versions(versions::VersionsArgs),
    /// Show the files of one asset version
    Files(files::FilesArgs),
    /// Download files of an asset version
    Download(download::DownloadArgs),
    /// List workflow executions run against an asset
    Executions(executions::ExecutionsArgs),
    /// Resolve the viewer navigation for a file
    View(view::ViewArgs),
    /// Record the next version from the latest or pinned files
    CreateVersion(create_version::CreateVersionArgs),
    /// Record the next version by restoring an older one
    Revert(revert::RevertArgs),
}

/// Database and asset identifying the asset to work on
#[derive(Debug, Clone, Args)]
pub struct AssetArgs {
    /// Database ID
    pub database_id: String,
    /// Asset ID
    pub asset_id: String,
}

impl AssetArgs {
    /// Reference to the asset.
    pub fn asset_ref(&self) -> AssetRef {
        AssetRef::new(&self.database_id, &self.asset_id)
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let ctx = AppContext::build(config).await?;
        match &self.command {
            Commands::Versions(args) => versions::execute(args, &ctx, self.format).await,
            Commands::Files(args) => files::execute(args, &ctx, self.format).await,
            Commands::Download(args) => download::execute(args, &ctx, self.format).await,
            Commands::Executions(args) => executions::execute(args, &ctx, self.format).await,
            Commands::View(args) => view::execute(args, &ctx, self.format).await,
            Commands::CreateVersion(args) => create_version::execute(args, &ctx, self.format).await,
            Commands::Revert(args) => revert::execute(args, &ctx, self.format).await,
        }
    }
}
