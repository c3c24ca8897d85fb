//! Local filesystem blob provider.
//!
//! Every storage key is a directory under the root holding one file per blob
//! version. Archiving a version leaves a `{versionId}.delete-marker` file next
//! to it; the newest entry by modification time is the latest version, with
//! markers winning ties.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use assetver_core::error::{AppError, ErrorKind};
use assetver_core::result::AppResult;
use assetver_core::traits::inventory::{BlobInventory, BlobObject};
use assetver_core::traits::probe::BlobProbe;
use assetver_core::traits::storage::{
    AssetStorage, RetrievalHandle, RetrievalOutcome, RetrievalRequest,
};

const DELETE_MARKER_SUFFIX: &str = ".delete-marker";

/// Message for version ids that resolve to an archive marker.
pub const ARCHIVED_VERSION_MESSAGE: &str =
    "File version has been archived and cannot be downloaded";

/// Local filesystem blob store implementing both storage and probe traits.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Absolute root directory for all blobs.
    root: PathBuf,
    /// Lifetime reported on issued handles.
    url_expiry_seconds: u64,
}

/// One entry in a key's version directory.
#[derive(Debug, Clone)]
struct VersionEntry {
    version_id: String,
    is_delete_marker: bool,
    modified: std::time::SystemTime,
    size: u64,
}

impl LocalBlobStore {
    /// Create a blob store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str, url_expiry_seconds: u64) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        let root = fs::canonicalize(&root).await?;
        Ok(Self {
            root,
            url_expiry_seconds,
        })
    }

    /// Directory holding the versions of `key`.
    fn key_dir(&self, key: &str) -> AppResult<PathBuf> {
        let clean = key.trim_matches('/');
        if clean.is_empty() || clean.split('/').any(|seg| seg == "..") {
            return Err(AppError::validation(format!("Invalid storage key: {key}")));
        }
        Ok(self.root.join(clean))
    }

    fn version_path(dir: &Path, version_id: &str) -> AppResult<PathBuf> {
        if version_id.is_empty() || version_id.contains(['/', '\\']) || version_id == ".." {
            return Err(AppError::validation(format!(
                "Invalid version id: {version_id}"
            )));
        }
        Ok(dir.join(version_id))
    }

    fn marker_path(dir: &Path, version_id: &str) -> AppResult<PathBuf> {
        Self::version_path(dir, &format!("{version_id}{DELETE_MARKER_SUFFIX}"))
    }

    /// Store bytes as a new version of `key`.
    pub async fn write_version(&self, key: &str, version_id: &str, data: Bytes) -> AppResult<()> {
        let dir = self.key_dir(key)?;
        fs::create_dir_all(&dir).await?;
        let path = Self::version_path(&dir, version_id)?;
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {key}@{version_id}"),
                e,
            )
        })?;
        debug!(key, version_id, bytes = data.len(), "Wrote blob version");
        Ok(())
    }

    /// Archive `key` by placing a delete marker with the given id as its
    /// newest version.
    pub async fn write_delete_marker(&self, key: &str, marker_id: &str) -> AppResult<()> {
        let dir = self.key_dir(key)?;
        fs::create_dir_all(&dir).await?;
        fs::write(Self::marker_path(&dir, marker_id)?, b"").await?;
        debug!(key, marker_id, "Wrote delete marker");
        Ok(())
    }

    /// Irreversibly remove one blob version.
    pub async fn purge_version(&self, key: &str, version_id: &str) -> AppResult<()> {
        let dir = self.key_dir(key)?;
        match fs::remove_file(Self::version_path(&dir, version_id)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn entries(&self, dir: &Path) -> AppResult<Vec<VersionEntry>> {
        let mut read = match fs::read_dir(dir).await {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let (version_id, is_delete_marker) = match name.strip_suffix(DELETE_MARKER_SUFFIX) {
                Some(id) => (id.to_string(), true),
                None => (name, false),
            };
            entries.push(VersionEntry {
                version_id,
                is_delete_marker,
                modified: meta.modified()?,
                size: meta.len(),
            });
        }
        Ok(entries)
    }

    async fn latest(&self, dir: &Path) -> AppResult<Option<VersionEntry>> {
        let entries = self.entries(dir).await?;
        Ok(entries
            .into_iter()
            .max_by(|a, b| {
                a.modified
                    .cmp(&b.modified)
                    .then_with(|| a.is_delete_marker.cmp(&b.is_delete_marker))
                    .then_with(|| a.version_id.cmp(&b.version_id))
            }))
    }

    fn file_url(path: &Path) -> String {
        format!("file://{}", path.display())
    }

    fn blob_object(key: &str, entry: &VersionEntry, is_archived: bool) -> BlobObject {
        BlobObject {
            key: key.to_string(),
            version_id: entry.version_id.clone(),
            size: Some(entry.size),
            last_modified: Some(
                chrono::DateTime::<chrono::Utc>::from(entry.modified).to_rfc3339(),
            ),
            etag: None,
            is_archived,
        }
    }

    /// Storage keys under `prefix`, in key order. A key is any directory
    /// holding at least one version file.
    async fn keys_under(&self, prefix: &str) -> AppResult<Vec<String>> {
        let start = match prefix.trim_matches('/') {
            "" => self.root.clone(),
            clean => self.key_dir(clean)?,
        };

        let mut keys = Vec::new();
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let mut read = match fs::read_dir(&dir).await {
                Ok(read) => read,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let mut has_versions = false;
            while let Some(entry) = read.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    has_versions = true;
                }
            }
            if let (true, Ok(relative)) = (has_versions, dir.strip_prefix(&self.root)) {
                let key: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                keys.push(key.join("/"));
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl AssetStorage for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn retrieval_handle(&self, request: &RetrievalRequest) -> AppResult<RetrievalOutcome> {
        let dir = self.key_dir(&request.key)?;

        let version_id = match &request.version_id {
            Some(version_id) => {
                if fs::try_exists(Self::marker_path(&dir, version_id)?).await? {
                    return Err(AppError::gone(ARCHIVED_VERSION_MESSAGE));
                }
                version_id.clone()
            }
            None => match self.latest(&dir).await? {
                Some(entry) if entry.is_delete_marker => {
                    return Err(AppError::gone(ARCHIVED_VERSION_MESSAGE));
                }
                Some(entry) => entry.version_id,
                None => {
                    return Ok(RetrievalOutcome::Denied {
                        reason: "File not found".to_string(),
                    });
                }
            },
        };

        let path = Self::version_path(&dir, &version_id)?;
        if !fs::try_exists(&path).await? {
            return Ok(RetrievalOutcome::Denied {
                reason: "File not found".to_string(),
            });
        }

        debug!(
            key = %request.key,
            version_id = %version_id,
            download_type = %request.download_type,
            "Issued local retrieval handle"
        );

        Ok(RetrievalOutcome::Granted(RetrievalHandle {
            download_url: Self::file_url(&path),
            expires_in: self.url_expiry_seconds,
            version_id: Some(version_id),
            download_type: request.download_type,
        }))
    }
}

#[async_trait]
impl BlobProbe for LocalBlobStore {
    async fn version_exists(&self, key: &str, version_id: &str) -> AppResult<bool> {
        let dir = self.key_dir(key)?;
        if fs::try_exists(Self::version_path(&dir, version_id)?).await? {
            return Ok(true);
        }
        Ok(fs::try_exists(Self::marker_path(&dir, version_id)?).await?)
    }

    async fn latest_is_archived(&self, key: &str) -> AppResult<bool> {
        let dir = self.key_dir(key)?;
        Ok(self
            .latest(&dir)
            .await?
            .is_some_and(|entry| entry.is_delete_marker))
    }
}

#[async_trait]
impl BlobInventory for LocalBlobStore {
    async fn list_latest(&self, prefix: &str) -> AppResult<Vec<BlobObject>> {
        let mut objects = Vec::new();
        for key in self.keys_under(prefix).await? {
            let dir = self.key_dir(&key)?;
            match self.latest(&dir).await? {
                Some(entry) if !entry.is_delete_marker => {
                    objects.push(Self::blob_object(&key, &entry, false));
                }
                _ => {}
            }
        }
        debug!(prefix, count = objects.len(), "Listed latest blobs");
        Ok(objects)
    }

    async fn head_version(&self, key: &str, version_id: &str) -> AppResult<Option<BlobObject>> {
        let dir = self.key_dir(key)?;
        let entries = self.entries(&dir).await?;
        let Some(entry) = entries
            .iter()
            .find(|e| e.version_id == version_id && !e.is_delete_marker)
        else {
            return Ok(None);
        };
        let is_archived = self
            .latest(&dir)
            .await?
            .is_some_and(|latest| latest.is_delete_marker);
        Ok(Some(Self::blob_object(key, entry, is_archived)))
    }

    async fn restore_version(&self, key: &str, version_id: &str) -> AppResult<String> {
        let dir = self.key_dir(key)?;
        let source = Self::version_path(&dir, version_id)?;
        let data = fs::read(&source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob version not found: {key}@{version_id}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {key}@{version_id}"),
                    e,
                )
            }
        })?;

        let restored = uuid::Uuid::new_v4().simple().to_string();
        self.write_version(key, &restored, Bytes::from(data)).await?;
        debug!(key, from = version_id, to = %restored, "Restored blob version");
        Ok(restored)
    }
}
