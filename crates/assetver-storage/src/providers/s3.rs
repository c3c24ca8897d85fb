//! S3-compatible object storage provider (requires the `s3` feature).
//!
//! Relies on bucket versioning: archived keys carry a delete marker as their
//! latest version, and a `HEAD` on a delete-marker version answers 405.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::DateTimeFormat;
use aws_sdk_s3::presigning::PresigningConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, info, warn};

use assetver_core::config::storage::S3StorageConfig;
use assetver_core::error::{AppError, ErrorKind};
use assetver_core::result::AppResult;
use assetver_core::traits::inventory::{BlobInventory, BlobObject};
use assetver_core::traits::probe::BlobProbe;
use assetver_core::traits::storage::{
    AssetStorage, RetrievalHandle, RetrievalOutcome, RetrievalRequest,
};

use super::local::ARCHIVED_VERSION_MESSAGE;

/// Characters escaped in a `CopySource` key; `/` separates segments.
const COPY_SOURCE_KEY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// S3-compatible blob store implementing both storage and probe traits.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    url_expiry_seconds: u64,
}

impl S3BlobStore {
    /// Create a provider from configuration, using the default AWS credential chain.
    pub async fn new(config: &S3StorageConfig, url_expiry_seconds: u64) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        let region = if config.region.is_empty() {
            "us-east-1".to_string()
        } else {
            config.region.clone()
        };

        info!(
            endpoint = %config.endpoint,
            region = %region,
            bucket = %config.bucket,
            "Initializing S3 blob store"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region));
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(&config.endpoint);
        }
        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(!config.endpoint.is_empty())
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            url_expiry_seconds,
        })
    }

    async fn is_delete_marker(&self, key: &str, version_id: &str) -> AppResult<bool> {
        let listing = self
            .client
            .list_object_versions()
            .bucket(&self.bucket)
            .prefix(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to list versions of {key}"),
                    e,
                )
            })?;
        Ok(listing
            .delete_markers()
            .iter()
            .any(|m| m.key() == Some(key) && m.version_id() == Some(version_id)))
    }
}

#[async_trait]
impl AssetStorage for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn retrieval_handle(&self, request: &RetrievalRequest) -> AppResult<RetrievalOutcome> {
        if let Some(version_id) = &request.version_id {
            if self.is_delete_marker(&request.key, version_id).await? {
                return Err(AppError::gone(ARCHIVED_VERSION_MESSAGE));
            }
        } else if self.latest_is_archived(&request.key).await? {
            return Err(AppError::gone(ARCHIVED_VERSION_MESSAGE));
        }

        let presigning = PresigningConfig::expires_in(Duration::from_secs(self.url_expiry_seconds))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid URL expiry", e)
            })?;

        let mut get = self.client.get_object().bucket(&self.bucket).key(&request.key);
        if let Some(version_id) = &request.version_id {
            get = get.version_id(version_id);
        }
        let presigned = get.presigned(presigning).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to presign {}", request.key),
                e,
            )
        })?;

        debug!(key = %request.key, download_type = %request.download_type, "Issued S3 retrieval handle");

        Ok(RetrievalOutcome::Granted(RetrievalHandle {
            download_url: presigned.uri().to_string(),
            expires_in: self.url_expiry_seconds,
            version_id: request.version_id.clone(),
            download_type: request.download_type,
        }))
    }
}

#[async_trait]
impl BlobProbe for S3BlobStore {
    async fn version_exists(&self, key: &str, version_id: &str) -> AppResult<bool> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .version_id(version_id)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) => {
                // A delete-marker version answers 405 but still exists.
                if err.raw_response().map(|r| r.status().as_u16()) == Some(405) {
                    return Ok(true);
                }
                if err.as_service_error().is_some_and(|e| e.is_not_found()) {
                    return Ok(false);
                }
                Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to head {key}@{version_id}"),
                    err,
                ))
            }
        }
    }

    async fn latest_is_archived(&self, key: &str) -> AppResult<bool> {
        let listing = self
            .client
            .list_object_versions()
            .bucket(&self.bucket)
            .prefix(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to list versions of {key}"),
                    e,
                )
            })?;
        Ok(listing
            .delete_markers()
            .iter()
            .any(|m| m.key() == Some(key) && m.is_latest() == Some(true)))
    }
}

#[async_trait]
impl BlobInventory for S3BlobStore {
    async fn list_latest(&self, prefix: &str) -> AppResult<Vec<BlobObject>> {
        let prefix = match prefix.trim_end_matches('/') {
            "" => String::new(),
            trimmed => format!("{trimmed}/"),
        };

        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&prefix)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to list objects under {prefix}"),
                    e,
                )
            })?;
            // Keys whose latest version is a delete marker are not listed.
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                if key.ends_with('/') {
                    continue;
                }
                let head = match self.client.head_object().bucket(&self.bucket).key(key).send().await {
                    Ok(head) => head,
                    Err(e) => {
                        warn!(key, error = %e, "Skipping object without readable metadata");
                        continue;
                    }
                };
                objects.push(BlobObject {
                    key: key.to_string(),
                    version_id: head.version_id().unwrap_or("null").to_string(),
                    size: object.size().and_then(|s| u64::try_from(s).ok()),
                    last_modified: object
                        .last_modified()
                        .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok()),
                    etag: object.e_tag().map(|t| t.trim_matches('"').to_string()),
                    is_archived: false,
                });
            }
        }
        Ok(objects)
    }

    async fn head_version(&self, key: &str, version_id: &str) -> AppResult<Option<BlobObject>> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .version_id(version_id)
            .send()
            .await;

        let head = match result {
            Ok(head) => head,
            Err(err) => {
                if err.raw_response().map(|r| r.status().as_u16()) == Some(405)
                    || err.as_service_error().is_some_and(|e| e.is_not_found())
                {
                    return Ok(None);
                }
                return Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to head {key}@{version_id}"),
                    err,
                ));
            }
        };

        Ok(Some(BlobObject {
            key: key.to_string(),
            version_id: version_id.to_string(),
            size: head.content_length().and_then(|s| u64::try_from(s).ok()),
            last_modified: head
                .last_modified()
                .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok()),
            etag: head.e_tag().map(|t| t.trim_matches('"').to_string()),
            is_archived: self.latest_is_archived(key).await?,
        }))
    }

    async fn restore_version(&self, key: &str, version_id: &str) -> AppResult<String> {
        let source = format!(
            "{}/{}?versionId={}",
            self.bucket,
            utf8_percent_encode(key, COPY_SOURCE_KEY),
            utf8_percent_encode(version_id, NON_ALPHANUMERIC)
        );
        let copied = self
            .client
            .copy_object()
            .bucket(&self.bucket)
            .key(key)
            .copy_source(source)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to restore {key}@{version_id}"),
                    e,
                )
            })?;

        let restored = copied.version_id().ok_or_else(|| {
            AppError::external_service(format!(
                "Bucket did not report a new version for {key}; is versioning enabled?"
            ))
        })?;
        debug!(key, from = version_id, to = restored, "Restored S3 object version");
        Ok(restored.to_string())
    }
}
