//! Collaborator traits defined in `assetver-core` and implemented by
//! `assetver-storage`.

pub mod fetch;
pub mod inventory;
pub mod probe;
pub mod storage;

pub use fetch::{ByteFetcher, ByteStream, FetchedBody};
pub use inventory::{BlobInventory, BlobObject};
pub use probe::BlobProbe;
pub use storage::{AssetStorage, DownloadType, RetrievalHandle, RetrievalOutcome, RetrievalRequest};
