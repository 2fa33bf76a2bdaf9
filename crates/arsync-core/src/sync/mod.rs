//! Per-user reconciliation of local files against the archive index.

pub mod control;
pub mod engine;
pub mod naming;
pub mod plan;
pub mod users;

pub use control::CancelToken;
pub use engine::{FileOutcome, SyncEngine, SyncLayout, SyncReport, UnlistedFile};
pub use naming::archive_name_for;
pub use plan::{decide, SyncAction};
pub use users::{read_user_list, UserTarget};
