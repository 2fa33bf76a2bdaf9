//! SQLite-backed metadata database: connection and migrations.
//!
//! Record operations live in `records`.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

use crate::config::default_database_path;
use crate::error::StoreError;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the file index. Cheap to clone; pass it to the crawler and the sync engine.
///
/// The default database file is stored under the XDG state directory:
/// `~/.local/state/arsync/index.db` on Debian.
#[derive(Clone)]
pub struct MetadataDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl MetadataDb {
    /// Open (or create) the default index database and run migrations.
    pub async fn open_default() -> Result<Self, StoreError> {
        let db_path = default_database_path()?;
        Self::open_at(&db_path).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        // Single writer; one connection keeps every statement on the same handle.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&uri)
            .await?;
        let db = MetadataDb { pool };
        db.migrate().await?;
        tracing::debug!(path = %path.display(), "opened index database");
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        // `name` is UNIQUE so a racing second insert fails instead of duplicating.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                link TEXT NOT NULL,
                date INTEGER NOT NULL,
                downloaded INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Close the pool, flushing outstanding work.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Open an in-memory database (no disk I/O). Used by tests across the crate.
#[cfg(test)]
pub(crate) async fn open_memory() -> Result<MetadataDb, StoreError> {
    // Single connection to avoid the pool handing back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = MetadataDb { pool };
    db.migrate().await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_uri_escapes_special_chars() {
        let uri = path_to_sqlite_uri(Path::new("/tmp/my dir/a#b?.db"));
        assert_eq!(uri, "sqlite:///tmp/my%20dir/a%23b%3F.db");
    }
}
