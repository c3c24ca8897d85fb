//! Download service: retrieval handle, byte transfer, progress events.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use assetver_core::error::AppError;
use assetver_core::result::AppResult;
use assetver_core::traits::fetch::ByteFetcher;
use assetver_core::traits::storage::{AssetStorage, DownloadType, RetrievalOutcome, RetrievalRequest};
use assetver_entity::asset::Asset;
use assetver_entity::download::{DownloadEvent, percent};
use assetver_entity::file::{FileVersion, base_name};

use super::tracker::DownloadTracker;

/// Starts downloads of version files and records their progress.
#[derive(Clone)]
pub struct DownloadService {
    storage: Arc<dyn AssetStorage>,
    fetcher: Arc<dyn ByteFetcher>,
    tracker: Arc<DownloadTracker>,
    output_dir: PathBuf,
    permits: Arc<Semaphore>,
}

impl std::fmt::Debug for DownloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadService")
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

/// A running download attempt.
#[derive(Debug)]
pub struct DownloadHandle {
    /// Relative key of the file.
    pub relative_key: String,
    /// Attempt number for this key.
    pub attempt: u64,
    events: mpsc::UnboundedReceiver<DownloadEvent>,
    task: JoinHandle<DownloadEvent>,
}

impl DownloadHandle {
    /// Next event of the attempt; `None` after the terminal event.
    pub async fn next_event(&mut self) -> Option<DownloadEvent> {
        self.events.recv().await
    }

    /// Wait for the attempt to end and return its terminal event.
    pub async fn finish(self) -> DownloadEvent {
        match self.task.await {
            Ok(event) => event,
            Err(e) => DownloadEvent::Error {
                message: format!("Error downloading file: {e}"),
            },
        }
    }
}

/// Everything one spawned attempt needs.
struct Job {
    relative_key: String,
    attempt: u64,
    request: RetrievalRequest,
    target: PathBuf,
    temp: PathBuf,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<DownloadEvent>,
}

impl DownloadService {
    /// Create a download service saving into `output_dir`, running at most
    /// `max_concurrent` transfers at a time.
    pub fn new(
        storage: Arc<dyn AssetStorage>,
        fetcher: Arc<dyn ByteFetcher>,
        output_dir: impl Into<PathBuf>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            storage,
            fetcher,
            tracker: Arc::new(DownloadTracker::new()),
            output_dir: output_dir.into(),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// The progress table shared by all attempts.
    pub fn tracker(&self) -> &Arc<DownloadTracker> {
        &self.tracker
    }

    /// Directory finished files are saved to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the retrieval request for `file` of `asset`.
    pub fn retrieval_request(asset: &Asset, file: &FileVersion) -> AppResult<RetrievalRequest> {
        if !asset.is_distributable {
            return Err(AppError::validation(format!(
                "Asset {} is not distributable",
                asset.asset_id
            )));
        }
        Ok(RetrievalRequest {
            database_id: asset.database_id.clone(),
            asset_id: asset.asset_id.clone(),
            key: asset.object_key(&file.relative_key),
            version_id: (!file.version_id.is_empty()).then(|| file.version_id.clone()),
            download_type: DownloadType::AssetFile,
        })
    }

    /// Start downloading `file`. Rejected without any state change when the
    /// file is permanently deleted or the asset is not distributable.
    ///
    /// Cancelling `cancel` ends the attempt with `Error("cancelled")`.
    pub fn start(
        &self,
        asset: &Asset,
        file: &FileVersion,
        cancel: &CancellationToken,
    ) -> AppResult<DownloadHandle> {
        if !file.actions_enabled() {
            return Err(AppError::validation(format!(
                "File {} has been permanently deleted and cannot be downloaded",
                file.relative_key
            )));
        }
        let request = Self::retrieval_request(asset, file)?;

        let (attempt, cancel) = self.tracker.begin(&file.relative_key, cancel);
        let (tx, rx) = mpsc::unbounded_channel();
        let name = file.file_name();
        let job = Job {
            relative_key: file.relative_key.clone(),
            attempt,
            request,
            target: self.output_dir.join(name),
            temp: self
                .output_dir
                .join(format!(".{name}.{}.part", Uuid::new_v4().simple())),
            cancel,
            events: tx,
        };

        info!(
            asset_id = %asset.asset_id,
            relative_key = %file.relative_key,
            attempt,
            "Download started"
        );

        let this = self.clone();
        let task = tokio::spawn(async move { this.run(job).await });

        Ok(DownloadHandle {
            relative_key: file.relative_key.clone(),
            attempt,
            events: rx,
            task,
        })
    }

    async fn run(self, job: Job) -> DownloadEvent {
        let result = tokio::select! {
            biased;
            _ = job.cancel.cancelled() => Err(AppError::cancelled("cancelled")),
            result = self.transfer(&job) => result,
        };

        let event = match result {
            Ok(bytes) => DownloadEvent::Complete {
                saved_to: job.target.display().to_string(),
                bytes,
            },
            Err(e) => {
                if let Err(cleanup) = remove_if_exists(&job.temp).await {
                    warn!(path = %job.temp.display(), error = %cleanup, "Failed to remove partial download");
                }
                warn!(relative_key = %job.relative_key, attempt = job.attempt, error = %e, "Download failed");
                DownloadEvent::Error { message: e.message }
            }
        };

        self.emit(&job, event.clone());
        event
    }

    fn emit(&self, job: &Job, event: DownloadEvent) {
        self.tracker.record(&job.relative_key, job.attempt, &event);
        // The receiver may have been dropped; the tracker still holds the state.
        let _ = job.events.send(event);
    }

    /// Fetch the blob into the temp file and move it into place. Errors carry
    /// the user-facing message.
    async fn transfer(&self, job: &Job) -> AppResult<u64> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AppError::cancelled("cancelled"))?;

        let key = &job.relative_key;
        let handle = match self.storage.retrieval_handle(&job.request).await {
            Ok(RetrievalOutcome::Granted(handle)) => handle,
            Ok(RetrievalOutcome::Denied { reason }) => {
                debug!(relative_key = %key, reason = %reason, "Retrieval denied");
                return Err(AppError::external_service(format!("Failed to download file: {key}")));
            }
            Err(e) => {
                return Err(AppError::external_service(format!(
                    "Error downloading file: {}",
                    e.message
                )));
            }
        };

        let network_error =
            || AppError::external_service(format!("Network error while downloading file: {key}"));

        let mut body = self
            .fetcher
            .fetch(&handle.download_url)
            .await
            .map_err(|_| network_error())?;
        if !body.is_success() {
            return Err(AppError::external_service(format!(
                "Failed to download file: {key} (Status: {})",
                body.status
            )));
        }

        let save_error = |e: std::io::Error| {
            AppError::with_source(
                assetver_core::error::ErrorKind::Storage,
                format!("Error downloading file: {e}"),
                e,
            )
        };

        fs::create_dir_all(&self.output_dir).await.map_err(save_error)?;
        let mut out = fs::File::create(&job.temp).await.map_err(save_error)?;

        let total = body.total_bytes;
        let mut loaded = 0u64;
        self.emit(
            job,
            DownloadEvent::Progress {
                bytes_loaded: 0,
                bytes_total: total,
                percent: 0,
            },
        );

        while let Some(chunk) = body.stream.next().await {
            let chunk = chunk.map_err(|_| network_error())?;
            out.write_all(&chunk).await.map_err(save_error)?;
            loaded += chunk.len() as u64;
            self.emit(
                job,
                DownloadEvent::Progress {
                    bytes_loaded: loaded,
                    bytes_total: total,
                    percent: percent(loaded, total),
                },
            );
        }

        out.flush().await.map_err(save_error)?;
        drop(out);
        fs::rename(&job.temp, &job.target).await.map_err(save_error)?;

        info!(relative_key = %key, bytes = loaded, path = %job.target.display(), "Download complete");
        Ok(loaded)
    }
}

async fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
