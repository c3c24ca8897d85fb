//! HTTP(S) fetcher backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use tracing::debug;

use assetver_core::error::{AppError, ErrorKind};
use assetver_core::result::AppResult;
use assetver_core::traits::fetch::{ByteFetcher, FetchedBody};

/// Streams response bodies of presigned HTTP URLs.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self { client })
    }
}

fn network_error(err: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("Network error: {err}"),
        err,
    )
}

#[async_trait]
impl ByteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> AppResult<FetchedBody> {
        let response = self.client.get(url).send().await.map_err(network_error)?;

        let status = response.status().as_u16();
        let total_bytes = response.content_length();
        debug!(status, total_bytes, "Fetch response received");

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(FetchedBody {
            status,
            total_bytes,
            stream: Box::pin(stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use futures::StreamExt;

    async fn serve() -> String {
        let app = Router::new()
            .route("/blob", get(|| async { vec![7u8; 4096] }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_streams_body_with_length() {
        let base = serve().await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let mut body = fetcher.fetch(&format!("{base}/blob")).await.unwrap();
        assert!(body.is_success());
        assert_eq!(body.total_bytes, Some(4096));

        let mut received = 0;
        while let Some(chunk) = body.stream.next().await {
            received += chunk.unwrap().len();
        }
        assert_eq!(received, 4096);
    }

    #[tokio::test]
    async fn test_non_success_reports_status() {
        let base = serve().await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let body = fetcher.fetch(&format!("{base}/missing")).await.unwrap();
        assert_eq!(body.status, 404);
        assert!(!body.is_success());
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/blob")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
