//! Persistent index of remote archive files (SQLite via sqlx).
//!
//! One row per normalized file name: remote link, last-known remote
//! modification time, and whether the artifact is already in the shared cache.

pub mod db;
pub mod records;
pub mod types;

pub use db::MetadataDb;
pub use types::*;
