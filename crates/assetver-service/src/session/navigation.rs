//! Navigation requests handed to the file viewer.

use serde::{Deserialize, Serialize};

use assetver_entity::asset::AssetRef;
use assetver_entity::file::FileDescriptor;
use assetver_entity::viewer::Viewer;

/// Where to navigate to view a file, and with what state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    /// Route of the file viewer page.
    pub route: String,
    /// File state passed along with the navigation.
    pub file: FileDescriptor,
    /// Renderer inferred from the file's extension, if any.
    pub viewer: Option<Viewer>,
}

impl NavigationRequest {
    /// Navigation to the viewer page for `file` of `asset`.
    pub fn for_file(asset: &AssetRef, file: FileDescriptor) -> Self {
        Self {
            route: format!(
                "/databases/{}/assets/{}/file",
                asset.database_id, asset.asset_id
            ),
            viewer: Viewer::for_file(asset, &file),
            file,
        }
    }
}
