//! Types used by the metadata database.

use serde::Serialize;

/// Record identifier (SQLite rowid).
pub type FileId = i64;

/// Remote time stored for a file whose listing date could not be parsed.
/// No local file is older, so such a record never triggers a transfer.
pub const UNKNOWN_REMOTE_DATE: i64 = i64::MIN;

/// One indexed remote file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub id: FileId,
    /// Lower-cased, trimmed file name; unique.
    pub name: String,
    pub link: String,
    /// Remote modification time, Unix seconds.
    pub remote_modified_at: i64,
    /// Set once the artifact is fully written to the shared cache. Never reset.
    pub downloaded: bool,
}

/// What `upsert_or_refresh` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(FileId),
    /// Existing row; only its date was rewritten.
    Refreshed(FileId),
}

impl UpsertOutcome {
    pub fn id(self) -> FileId {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Refreshed(id) => id,
        }
    }
}
