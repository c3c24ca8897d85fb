//! Byte fetchers for retrieval URLs.

pub mod http;
pub mod local;

use async_trait::async_trait;

use assetver_core::error::AppError;
use assetver_core::result::AppResult;
use assetver_core::traits::fetch::{ByteFetcher, FetchedBody};

pub use http::HttpFetcher;
pub use local::FileFetcher;

/// Dispatches to the HTTP or file fetcher by URL scheme.
#[derive(Debug, Clone)]
pub struct RoutingFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl RoutingFetcher {
    /// Create a routing fetcher from its two backends.
    pub fn new(http: HttpFetcher, file: FileFetcher) -> Self {
        Self { http, file }
    }
}

#[async_trait]
impl ByteFetcher for RoutingFetcher {
    async fn fetch(&self, url: &str) -> AppResult<FetchedBody> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.http.fetch(url).await
        } else if url.starts_with(local::FILE_SCHEME) {
            self.file.fetch(url).await
        } else {
            Err(AppError::validation(format!("Unsupported URL scheme: {url}")))
        }
    }
}
