//! Viewer selection for the file view route.
//!
//! A [`Viewer`] is chosen by [`ViewType`] and carries only the properties
//! that renderer needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use assetver_core::AppError;

use crate::asset::AssetRef;
use crate::file::FileDescriptor;

/// Renderer tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    /// Generated preview image of the asset.
    Preview,
    /// Raster or vector image.
    Image,
    /// 3D model.
    Model,
    /// Point cloud.
    #[serde(rename = "pc")]
    PointCloud,
    /// 3D scatter plot.
    Plot,
    /// Columnar/tabular data.
    Column,
    /// HTML document.
    Html,
    /// Video.
    Video,
    /// Audio.
    Audio,
}

impl ViewType {
    /// Return the tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Image => "image",
            Self::Model => "model",
            Self::PointCloud => "pc",
            Self::Plot => "plot",
            Self::Column => "column",
            Self::Html => "html",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// Infer a renderer from a lowercase file extension.
    ///
    /// `Preview` and `Plot` are never inferred; they are only chosen explicitly.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "bmp" => Some(Self::Image),
            "glb" | "gltf" | "obj" | "fbx" | "stl" | "ply" | "usd" | "usda" | "usdz" | "3ds"
            | "dae" => Some(Self::Model),
            "e57" | "las" | "laz" | "pts" | "xyz" | "potree" => Some(Self::PointCloud),
            "csv" | "tsv" | "parquet" => Some(Self::Column),
            "html" | "htm" => Some(Self::Html),
            "mp4" | "mov" | "webm" | "mkv" | "avi" => Some(Self::Video),
            "mp3" | "wav" | "ogg" | "flac" | "m4a" => Some(Self::Audio),
            _ => None,
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preview" => Ok(Self::Preview),
            "image" => Ok(Self::Image),
            "model" => Ok(Self::Model),
            "pc" => Ok(Self::PointCloud),
            "plot" => Ok(Self::Plot),
            "column" => Ok(Self::Column),
            "html" => Ok(Self::Html),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            _ => Err(AppError::validation(format!(
                "Invalid view type: '{s}'. Expected one of: preview, image, model, pc, plot, column, html, video, audio"
            ))),
        }
    }
}

/// Properties shared by renderers that load one versioned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileViewProps {
    /// Owning database.
    pub database_id: String,
    /// Owning asset.
    pub asset_id: String,
    /// Relative key of the file.
    pub asset_key: String,
    /// Blob version to load.
    pub version_id: String,
}

/// Properties for the image renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageViewProps {
    /// Owning database.
    pub database_id: String,
    /// Owning asset.
    pub asset_id: String,
    /// Relative key of the image.
    pub asset_key: String,
    /// Fallback key when the primary fails to load.
    pub alt_asset_key: String,
    /// Blob version; preview images always load the latest.
    pub version_id: Option<String>,
    /// Whether this is the asset's generated preview.
    pub is_preview_file: bool,
}

/// Properties for the model renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelViewProps {
    /// Owning database.
    pub database_id: String,
    /// Owning asset.
    pub asset_id: String,
    /// Relative key of the primary model file.
    pub asset_key: String,
    /// Additional files loaded together with the primary file.
    pub multi_file_keys: Vec<String>,
    /// Blob version to load.
    pub version_id: String,
}

/// Properties for the point-cloud renderer, which always streams the latest tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCloudViewProps {
    /// Owning database.
    pub database_id: String,
    /// Owning asset.
    pub asset_id: String,
    /// Relative key of the point-cloud file.
    pub relative_file_key: String,
}

/// A renderer selection with its own property contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "viewType", content = "props", rename_all = "lowercase")]
pub enum Viewer {
    /// Generated preview image.
    Preview(ImageViewProps),
    /// Image file.
    Image(ImageViewProps),
    /// 3D model.
    Model(ModelViewProps),
    /// Point cloud.
    #[serde(rename = "pc")]
    PointCloud(PointCloudViewProps),
    /// 3D plot.
    Plot(FileViewProps),
    /// Tabular data.
    Column(FileViewProps),
    /// HTML document.
    Html(FileViewProps),
    /// Video.
    Video(FileViewProps),
    /// Audio.
    Audio(FileViewProps),
}

impl Viewer {
    /// Build the viewer for `view_type` showing `file` of `asset`.
    pub fn build(view_type: ViewType, asset: &AssetRef, file: &FileDescriptor) -> Self {
        let file_props = || FileViewProps {
            database_id: asset.database_id.clone(),
            asset_id: asset.asset_id.clone(),
            asset_key: file.key.clone(),
            version_id: file.version_id.clone(),
        };
        let image_props = |is_preview_file: bool| ImageViewProps {
            database_id: asset.database_id.clone(),
            asset_id: asset.asset_id.clone(),
            asset_key: file.key.clone(),
            alt_asset_key: file.key.clone(),
            version_id: (!is_preview_file).then(|| file.version_id.clone()),
            is_preview_file,
        };

        match view_type {
            ViewType::Preview => Self::Preview(image_props(true)),
            ViewType::Image => Self::Image(image_props(false)),
            ViewType::Model => Self::Model(ModelViewProps {
                database_id: asset.database_id.clone(),
                asset_id: asset.asset_id.clone(),
                asset_key: file.key.clone(),
                multi_file_keys: Vec::new(),
                version_id: file.version_id.clone(),
            }),
            ViewType::PointCloud => Self::PointCloud(PointCloudViewProps {
                database_id: asset.database_id.clone(),
                asset_id: asset.asset_id.clone(),
                relative_file_key: file.key.clone(),
            }),
            ViewType::Plot => Self::Plot(file_props()),
            ViewType::Column => Self::Column(file_props()),
            ViewType::Html => Self::Html(file_props()),
            ViewType::Video => Self::Video(file_props()),
            ViewType::Audio => Self::Audio(file_props()),
        }
    }

    /// Pick a viewer from the file's extension, if any renderer handles it.
    pub fn for_file(asset: &AssetRef, file: &FileDescriptor) -> Option<Self> {
        let view_type = file.extension().and_then(|ext| ViewType::from_extension(&ext))?;
        Some(Self::build(view_type, asset, file))
    }

    /// The tag of this viewer.
    pub fn view_type(&self) -> ViewType {
        match self {
            Self::Preview(_) => ViewType::Preview,
            Self::Image(_) => ViewType::Image,
            Self::Model(_) => ViewType::Model,
            Self::PointCloud(_) => ViewType::PointCloud,
            Self::Plot(_) => ViewType::Plot,
            Self::Column(_) => ViewType::Column,
            Self::Html(_) => ViewType::Html,
            Self::Video(_) => ViewType::Video,
            Self::Audio(_) => ViewType::Audio,
        }
    }
}
