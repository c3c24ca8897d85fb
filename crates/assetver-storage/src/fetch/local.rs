//! Fetcher for `file://` URLs issued by the local blob store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio_util::io::ReaderStream;

use assetver_core::error::{AppError, ErrorKind};
use assetver_core::result::AppResult;
use assetver_core::traits::fetch::{ByteFetcher, FetchedBody};

pub(crate) const FILE_SCHEME: &str = "file://";

/// Streams local files named by `file://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl ByteFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> AppResult<FetchedBody> {
        let path = url
            .strip_prefix(FILE_SCHEME)
            .map(PathBuf::from)
            .ok_or_else(|| AppError::validation(format!("Not a file URL: {url}")))?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FetchedBody {
                    status: 404,
                    total_bytes: None,
                    stream: Box::pin(futures::stream::empty::<Result<bytes::Bytes, std::io::Error>>()),
                });
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open {}", path.display()),
                    e,
                ));
            }
        };
        let total_bytes = file.metadata().await?.len();

        Ok(FetchedBody {
            status: 200,
            total_bytes: Some(total_bytes),
            stream: Box::pin(ReaderStream::new(file)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_reads_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        std::fs::write(&path, b"abcdef").unwrap();

        let mut body = FileFetcher
            .fetch(&format!("file://{}", path.display()))
            .await
            .unwrap();
        assert_eq!(body.total_bytes, Some(6));

        let mut data = Vec::new();
        while let Some(chunk) = body.stream.next().await {
            data.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(data, b"abcdef");
    }

    #[tokio::test]
    async fn test_missing_file_reports_not_found_status() {
        let body = FileFetcher
            .fetch("file:///definitely/not/here")
            .await
            .unwrap();
        assert_eq!(body.status, 404);
    }
}
