//! Per-file download progress and terminal status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of one download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "message")]
pub enum DownloadStatus {
    /// Bytes are being transferred.
    Downloading,
    /// All bytes were received and saved.
    Complete,
    /// The attempt failed; carries a user-facing message.
    Error(String),
}

impl DownloadStatus {
    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Downloading)
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downloading => write!(f, "downloading"),
            Self::Complete => write!(f, "complete"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Recorded progress of the latest download attempt for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    /// Relative key of the file being downloaded.
    pub relative_key: String,
    /// Attempt number for this key; a retry increments it.
    pub attempt: u64,
    /// Bytes received so far.
    pub bytes_loaded: u64,
    /// Total bytes, when the source reports it.
    pub bytes_total: Option<u64>,
    /// Progress in percent, `0..=100`.
    pub percent: u8,
    /// Current status.
    #[serde(flatten)]
    pub status: DownloadStatus,
}

impl DownloadProgress {
    /// Fresh progress for a new attempt.
    pub fn started(relative_key: impl Into<String>, attempt: u64) -> Self {
        Self {
            relative_key: relative_key.into(),
            attempt,
            bytes_loaded: 0,
            bytes_total: None,
            percent: 0,
            status: DownloadStatus::Downloading,
        }
    }
}

/// Events emitted by a download attempt, in order. Exactly one terminal
/// event (`Complete` or `Error`) ends every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum DownloadEvent {
    /// More bytes arrived.
    Progress {
        /// Bytes received so far.
        bytes_loaded: u64,
        /// Total bytes, when known.
        bytes_total: Option<u64>,
        /// Progress in percent.
        percent: u8,
    },
    /// The file was saved to `saved_to`.
    Complete {
        /// Local path of the saved file.
        saved_to: String,
        /// Bytes written.
        bytes: u64,
    },
    /// The attempt failed.
    Error {
        /// User-facing message.
        message: String,
    },
}

impl DownloadEvent {
    /// Check if the event ends the attempt.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Round `loaded / total` to a whole percent in `0..=100`.
///
/// Unknown or zero totals report zero until completion.
pub fn percent(bytes_loaded: u64, bytes_total: Option<u64>) -> u8 {
    match bytes_total {
        Some(total) if total > 0 => {
            let pct = (bytes_loaded as f64 / total as f64 * 100.0).round();
            pct.clamp(0.0, 100.0) as u8
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, Some(200)), 0);
        assert_eq!(percent(1, Some(3)), 33);
        assert_eq!(percent(2, Some(3)), 67);
        assert_eq!(percent(200, Some(200)), 100);
        assert_eq!(percent(500, Some(200)), 100);
        assert_eq!(percent(500, None), 0);
        assert_eq!(percent(500, Some(0)), 0);
    }

    #[test]
    fn test_status_serializes_with_message() {
        let progress = DownloadProgress {
            status: DownloadStatus::Error("Status: 403".into()),
            ..DownloadProgress::started("a/b.png", 1)
        };
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Status: 403");
        assert_eq!(json["relativeKey"], "a/b.png");
    }
}
