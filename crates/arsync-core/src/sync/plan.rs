//! Freshness decision for one local file.

use crate::store::FileRecord;

/// What to do for a local file that has an index record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Local copy is at least as new as the archive.
    UpToDate,
    /// Archive is newer and the artifact is not cached yet.
    NeedsDownload,
    /// Archive is newer and the artifact is already cached.
    NeedsCopyOnly,
}

/// Compare the local modification time (Unix seconds) with the record.
pub fn decide(local_modified_at: i64, record: &FileRecord) -> SyncAction {
    if local_modified_at >= record.remote_modified_at {
        SyncAction::UpToDate
    } else if record.downloaded {
        SyncAction::NeedsCopyOnly
    } else {
        SyncAction::NeedsDownload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UNKNOWN_REMOTE_DATE;

    fn record(remote_modified_at: i64, downloaded: bool) -> FileRecord {
        FileRecord {
            id: 1,
            name: "report.zip".to_string(),
            link: "https://archive.example/report.zip".to_string(),
            remote_modified_at,
            downloaded,
        }
    }

    #[test]
    fn remote_newer_needs_download_or_copy() {
        assert_eq!(decide(99, &record(100, false)), SyncAction::NeedsDownload);
        assert_eq!(decide(99, &record(100, true)), SyncAction::NeedsCopyOnly);
    }

    #[test]
    fn equal_or_newer_local_is_up_to_date() {
        assert_eq!(decide(100, &record(100, false)), SyncAction::UpToDate);
        assert_eq!(decide(101, &record(100, true)), SyncAction::UpToDate);
    }

    #[test]
    fn unknown_remote_date_is_never_newer() {
        assert_eq!(decide(i64::MIN, &record(UNKNOWN_REMOTE_DATE, false)), SyncAction::UpToDate);
        assert_eq!(decide(0, &record(UNKNOWN_REMOTE_DATE, true)), SyncAction::UpToDate);
    }

    #[test]
    fn decision_flips_exactly_at_remote_time() {
        for remote in [0_i64, 1_710_460_800] {
            for local in (remote - 3)..=(remote + 3) {
                let action = decide(local, &record(remote, false));
                assert_eq!(action == SyncAction::UpToDate, local >= remote);
            }
        }
    }
}
