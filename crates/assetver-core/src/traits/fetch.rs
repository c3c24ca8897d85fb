//! Byte fetcher trait for streaming retrieval URLs.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// An opened response: status plus body stream.
pub struct FetchedBody {
    /// HTTP-style status code of the response.
    pub status: u16,
    /// Total length in bytes, when the source reports it.
    pub total_bytes: Option<u64>,
    /// Body chunks in order.
    pub stream: ByteStream,
}

impl std::fmt::Debug for FetchedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedBody")
            .field("status", &self.status)
            .field("total_bytes", &self.total_bytes)
            .finish()
    }
}

impl FetchedBody {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Opens retrieval URLs as byte streams.
#[async_trait]
pub trait ByteFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Open `url`. Transport failures are errors; a non-success status is
    /// returned in [`FetchedBody::status`] for the caller to judge.
    async fn fetch(&self, url: &str) -> AppResult<FetchedBody>;
}
