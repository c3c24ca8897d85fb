//! Concurrent progress table keyed by relative key.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use assetver_entity::download::{DownloadEvent, DownloadProgress, DownloadStatus};

/// Latest download progress per file.
///
/// Starting a download for a key that already has an attempt cancels that
/// attempt and replaces its progress; events from superseded attempts are
/// ignored. Attempt numbers are unique for the tracker's lifetime, so an
/// attempt cancelled by [`clear`](Self::clear) can never match a later one.
#[derive(Debug, Default)]
pub struct DownloadTracker {
    progress: DashMap<String, DownloadProgress>,
    cancels: DashMap<String, CancellationToken>,
    next_attempt: AtomicU64,
}

impl DownloadTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new attempt for `relative_key`, returning its number and a
    /// cancellation token derived from `parent`.
    pub fn begin(&self, relative_key: &str, parent: &CancellationToken) -> (u64, CancellationToken) {
        let cancel = parent.child_token();
        let attempt = self.next_attempt.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(previous) = self.cancels.insert(relative_key.to_string(), cancel.clone()) {
            previous.cancel();
        }
        self.progress.insert(
            relative_key.to_string(),
            DownloadProgress::started(relative_key, attempt),
        );
        (attempt, cancel)
    }

    /// Apply an event to the progress of `attempt`. Returns `false` when the
    /// attempt has been superseded or the entry cleared.
    pub fn record(&self, relative_key: &str, attempt: u64, event: &DownloadEvent) -> bool {
        let Some(mut progress) = self.progress.get_mut(relative_key) else {
            return false;
        };
        if progress.attempt != attempt {
            return false;
        }
        match event {
            DownloadEvent::Progress {
                bytes_loaded,
                bytes_total,
                percent,
            } => {
                progress.bytes_loaded = *bytes_loaded;
                progress.bytes_total = *bytes_total;
                progress.percent = *percent;
            }
            DownloadEvent::Complete { bytes, .. } => {
                progress.bytes_loaded = *bytes;
                progress.percent = 100;
                progress.status = DownloadStatus::Complete;
            }
            DownloadEvent::Error { message } => {
                progress.status = DownloadStatus::Error(message.clone());
            }
        }
        true
    }

    /// Progress of the latest attempt for `relative_key`.
    pub fn get(&self, relative_key: &str) -> Option<DownloadProgress> {
        self.progress.get(relative_key).map(|p| p.clone())
    }

    /// All tracked progress, ordered by relative key.
    pub fn all(&self) -> Vec<DownloadProgress> {
        let mut all: Vec<_> = self.progress.iter().map(|p| p.value().clone()).collect();
        all.sort_by(|a, b| a.relative_key.cmp(&b.relative_key));
        all
    }

    /// Number of attempts still transferring.
    pub fn in_flight(&self) -> usize {
        self.progress
            .iter()
            .filter(|p| !p.status.is_terminal())
            .count()
    }

    /// Cancel every attempt and forget all progress.
    pub fn clear(&self) {
        for cancel in self.cancels.iter() {
            cancel.cancel();
        }
        self.cancels.clear();
        self.progress.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_supersedes_previous_attempt() {
        let tracker = DownloadTracker::new();
        let session = CancellationToken::new();

        let (first, first_cancel) = tracker.begin("a.txt", &session);
        tracker.record(
            "a.txt",
            first,
            &DownloadEvent::Progress {
                bytes_loaded: 5,
                bytes_total: Some(10),
                percent: 50,
            },
        );

        let (second, second_cancel) = tracker.begin("a.txt", &session);
        assert!(second > first);
        assert!(first_cancel.is_cancelled());
        assert!(!second_cancel.is_cancelled());

        let progress = tracker.get("a.txt").unwrap();
        assert_eq!(progress.attempt, second);
        assert_eq!(progress.percent, 0);

        let stale = DownloadEvent::Error {
            message: "cancelled".to_string(),
        };
        assert!(!tracker.record("a.txt", first, &stale));
        assert_eq!(tracker.get("a.txt").unwrap().status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_keys_are_independent() {
        let tracker = DownloadTracker::new();
        let session = CancellationToken::new();
        let (a, _) = tracker.begin("a.txt", &session);
        let (b, _) = tracker.begin("b.txt", &session);

        tracker.record(
            "a.txt",
            a,
            &DownloadEvent::Complete {
                saved_to: "/tmp/a.txt".to_string(),
                bytes: 3,
            },
        );
        tracker.record(
            "b.txt",
            b,
            &DownloadEvent::Progress {
                bytes_loaded: 1,
                bytes_total: Some(4),
                percent: 25,
            },
        );

        assert_eq!(tracker.get("a.txt").unwrap().status, DownloadStatus::Complete);
        assert_eq!(tracker.get("a.txt").unwrap().percent, 100);
        assert_eq!(tracker.get("b.txt").unwrap().percent, 25);
        assert_eq!(tracker.in_flight(), 1);
    }

    #[test]
    fn test_attempt_from_before_clear_is_stale() {
        let tracker = DownloadTracker::new();
        let session = CancellationToken::new();
        let (old, old_cancel) = tracker.begin("readme.txt", &session);
        tracker.clear();
        assert!(old_cancel.is_cancelled());

        let (new, _) = tracker.begin("readme.txt", &session);
        assert_ne!(old, new);

        let cancelled = DownloadEvent::Error {
            message: "cancelled".to_string(),
        };
        assert!(!tracker.record("readme.txt", old, &cancelled));
        let progress = tracker.get("readme.txt").unwrap();
        assert_eq!(progress.attempt, new);
        assert_eq!(progress.status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_clear_cancels_attempts() {
        let tracker = DownloadTracker::new();
        let session = CancellationToken::new();
        let (_, cancel) = tracker.begin("a.txt", &session);
        tracker.clear();
        assert!(cancel.is_cancelled());
        assert!(tracker.all().is_empty());
    }
}
