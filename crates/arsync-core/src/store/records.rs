//! Record operations: upsert, lookup, flag update, listing.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::db::MetadataDb;
use super::types::{FileId, FileRecord, UpsertOutcome};
use crate::error::StoreError;

fn record_from_row(row: &SqliteRow) -> FileRecord {
    let downloaded: i64 = row.get("downloaded");
    FileRecord {
        id: row.get("id"),
        name: row.get("name"),
        link: row.get("link"),
        remote_modified_at: row.get("date"),
        downloaded: downloaded != 0,
    }
}

impl MetadataDb {
    /// Insert a new record (`downloaded = 0`) or, if `name` is already indexed,
    /// rewrite only its date. Link and downloaded flag of an existing row are kept.
    pub async fn upsert_or_refresh(
        &self,
        name: &str,
        link: &str,
        remote_modified_at: i64,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;
        let existing = sqlx::query("SELECT id FROM files WHERE name = ?1")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = match existing {
            Some(row) => {
                let id: i64 = row.get("id");
                sqlx::query("UPDATE files SET date = ?1 WHERE id = ?2")
                    .bind(remote_modified_at)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                UpsertOutcome::Refreshed(id)
            }
            None => {
                let id = sqlx::query(
                    r#"
                    INSERT INTO files (name, link, date, downloaded)
                    VALUES (?1, ?2, ?3, 0)
                    "#,
                )
                .bind(name)
                .bind(link)
                .bind(remote_modified_at)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();
                UpsertOutcome::Inserted(id)
            }
        };
        tx.commit().await?;
        Ok(outcome)
    }

    /// Insert `name` unless it is already indexed; an existing row is not touched.
    /// Returns the new id, or `None` if the name was present.
    pub async fn insert_if_absent(
        &self,
        name: &str,
        link: &str,
        remote_modified_at: i64,
    ) -> Result<Option<FileId>, StoreError> {
        let res = sqlx::query(
            r#"
            INSERT INTO files (name, link, date, downloaded)
            VALUES (?1, ?2, ?3, 0)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(link)
        .bind(remote_modified_at)
        .execute(&self.pool)
        .await?;
        Ok((res.rows_affected() == 1).then(|| res.last_insert_rowid()))
    }

    /// Exact-match lookup by normalized name. `None` means the file is not indexed.
    pub async fn lookup(&self, name: &str) -> Result<Option<FileRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, link, date, downloaded
            FROM files
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    /// Set `downloaded = 1`. Idempotent.
    pub async fn mark_downloaded(&self, id: FileId) -> Result<(), StoreError> {
        sqlx::query("UPDATE files SET downloaded = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All records ordered by name.
    pub async fn list_records(&self) -> Result<Vec<FileRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, link, date, downloaded
            FROM files
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM files")
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }
}
