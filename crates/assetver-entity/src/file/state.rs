//! Effective display state of a file version.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display state derived from a file's archival and deletion flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileState {
    /// Content is retrievable.
    Available,
    /// The file's latest content blob has been archived.
    LatestArchived,
    /// The pinned content blob was irreversibly removed.
    PermanentlyDeleted,
}

impl FileState {
    /// Derive the state from raw flags. Deletion takes precedence over archival.
    pub fn from_flags(is_permanently_deleted: bool, is_latest_version_archived: bool) -> Self {
        if is_permanently_deleted {
            Self::PermanentlyDeleted
        } else if is_latest_version_archived {
            Self::LatestArchived
        } else {
            Self::Available
        }
    }

    /// Whether view and download actions are enabled.
    pub fn allows_actions(&self) -> bool {
        !matches!(self, Self::PermanentlyDeleted)
    }

    /// Badge text shown next to the file name, if any.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            Self::Available => None,
            Self::LatestArchived => Some("Latest Version Archived"),
            Self::PermanentlyDeleted => Some("Permanently Deleted"),
        }
    }

    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::LatestArchived => "latest-archived",
            Self::PermanentlyDeleted => "permanently-deleted",
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_wins_over_archived() {
        assert_eq!(FileState::from_flags(true, true), FileState::PermanentlyDeleted);
        assert_eq!(FileState::from_flags(true, false), FileState::PermanentlyDeleted);
        assert_eq!(FileState::from_flags(false, true), FileState::LatestArchived);
        assert_eq!(FileState::from_flags(false, false), FileState::Available);
    }

    #[test]
    fn test_actions_disabled_only_when_deleted() {
        assert!(FileState::Available.allows_actions());
        assert!(FileState::LatestArchived.allows_actions());
        assert!(!FileState::PermanentlyDeleted.allows_actions());
    }
}
