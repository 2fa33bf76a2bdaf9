//! Sync engine: per user, per local file, decide and carry out download/copy.
//!
//! For every recognized local file the engine looks up the matching archive
//! record and compares modification times. A newer archive file is fetched
//! into the shared cache once (the record's `downloaded` flag is committed
//! right after the download) and then copied into the user's destination
//! folder. Download and flag-commit failures end the run; everything else is
//! logged and the next file is processed.

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use super::control::CancelToken;
use super::naming::archive_name_for;
use super::plan::{decide, SyncAction};
use super::users::UserTarget;
use crate::config::ArsyncConfig;
use crate::error::{SyncError, TransferError};
use crate::store::{FileRecord, MetadataDb};
use crate::transfer::{NoopProgress, ProgressReporter, Transfer};

/// Where cached artifacts live and which local files are recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLayout {
    pub cache_dir: PathBuf,
    pub local_extension: String,
    pub archive_extension: String,
}

impl SyncLayout {
    /// Layout for the index stored at `database`; see `ArsyncConfig::cache_dir_for`.
    pub fn from_config(cfg: &ArsyncConfig, database: &Path) -> Self {
        Self {
            cache_dir: cfg.cache_dir_for(database),
            local_extension: cfg.naming.local_extension.clone(),
            archive_extension: cfg.naming.archive_extension.clone(),
        }
    }

    /// Cached artifact path for a record name.
    pub fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(name)
    }
}

/// Result of reconciling one local file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// No index record for the derived archive name.
    Unlisted,
    UpToDate,
    /// Copied to the destination; `fetched` is true if it was downloaded in this call.
    Synced { fetched: bool },
}

/// A local file whose archive name has no index record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlistedFile {
    pub user: PathBuf,
    pub name: String,
}

/// Counters for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub users: usize,
    /// Users whose source directory could not be read.
    pub users_skipped: usize,
    pub scanned: usize,
    /// In scan order.
    pub unlisted: Vec<UnlistedFile>,
    pub up_to_date: usize,
    pub downloaded: usize,
    pub copied: usize,
    pub failed: usize,
    pub cancelled: bool,
}

pub struct SyncEngine {
    db: MetadataDb,
    transfer: Arc<dyn Transfer>,
    progress: Arc<dyn ProgressReporter>,
    layout: SyncLayout,
    cancel: Option<CancelToken>,
}

impl SyncEngine {
    pub fn new(db: MetadataDb, transfer: Arc<dyn Transfer>, layout: SyncLayout) -> Self {
        Self {
            db,
            transfer,
            progress: Arc::new(NoopProgress),
            layout,
            cancel: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Sync every user in order. Returns early with the error on a fatal failure.
    pub async fn run(&self, users: &[UserTarget]) -> Result<SyncReport, SyncError> {
        tokio::fs::create_dir_all(&self.layout.cache_dir)
            .await
            .map_err(|source| SyncError::Io {
                path: self.layout.cache_dir.clone(),
                source,
            })?;

        let mut report = SyncReport::default();
        for user in users {
            if self.cancelled() {
                report.cancelled = true;
            }
            if report.cancelled {
                tracing::info!("sync cancelled");
                break;
            }
            self.sync_user(user, &mut report).await?;
        }
        tracing::info!(?report, "sync finished");
        Ok(report)
    }

    /// Sync the recognized files of one user.
    pub async fn sync_user(&self, user: &UserTarget, report: &mut SyncReport) -> Result<(), SyncError> {
        tracing::info!(user = %user.root.display(), "syncing user");
        let files = match local_files(&user.source_dir, &self.layout).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(dir = %user.source_dir.display(), error = %e, "cannot read source directory, skipping user");
                report.users_skipped += 1;
                return Ok(());
            }
        };
        report.users += 1;

        for (path, archive_name) in files {
            if self.cancelled() {
                report.cancelled = true;
                return Ok(());
            }
            report.scanned += 1;
            match self.sync_file(user, &path, &archive_name).await {
                Ok(FileOutcome::Unlisted) => report.unlisted.push(UnlistedFile {
                    user: user.root.clone(),
                    name: archive_name,
                }),
                Ok(FileOutcome::UpToDate) => report.up_to_date += 1,
                Ok(FileOutcome::Synced { fetched }) => {
                    if fetched {
                        report.downloaded += 1;
                    }
                    report.copied += 1;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "sync failed for file");
                    report.failed += 1;
                }
            }
        }
        Ok(())
    }

    /// Reconcile one local file whose archive name is `archive_name`.
    pub async fn sync_file(
        &self,
        user: &UserTarget,
        local_path: &Path,
        archive_name: &str,
    ) -> Result<FileOutcome, SyncError> {
        let record = self
            .db
            .lookup(archive_name)
            .await
            .map_err(|source| SyncError::Lookup {
                name: archive_name.to_string(),
                source,
            })?;
        let Some(record) = record else {
            tracing::warn!(name = archive_name, user = %user.root.display(), "missing from index");
            return Ok(FileOutcome::Unlisted);
        };

        let local_modified_at = modified_unix(local_path).await.map_err(|source| SyncError::Io {
            path: local_path.to_path_buf(),
            source,
        })?;

        let fetched = match decide(local_modified_at, &record) {
            SyncAction::UpToDate => {
                tracing::debug!(name = %record.name, local_modified_at, remote_modified_at = record.remote_modified_at, "up to date");
                return Ok(FileOutcome::UpToDate);
            }
            SyncAction::NeedsDownload => {
                self.download(&record).await?;
                true
            }
            SyncAction::NeedsCopyOnly => false,
        };

        self.deliver(&record, user).await?;
        Ok(FileOutcome::Synced { fetched })
    }

    /// Fetch the record's artifact into the cache and commit the flag.
    async fn download(&self, record: &FileRecord) -> Result<(), SyncError> {
        let dest = self.layout.cache_path(&record.name);
        tracing::info!(name = %record.name, link = %record.link, "downloading");

        let transfer = Arc::clone(&self.transfer);
        let progress = Arc::clone(&self.progress);
        let name = record.name.clone();
        let link = record.link.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let mut on_chunk = |bytes: u64| progress.on_progress(&name, bytes);
            let res = transfer.download(&dest, &link, &mut on_chunk);
            if let Ok(bytes) = &res {
                progress.on_finish(&name, *bytes);
            }
            res
        })
        .await;

        let bytes = joined
            .map_err(TransferError::from)
            .and_then(|res| res)
            .map_err(|source| SyncError::Transfer {
                name: record.name.clone(),
                source,
            })?;

        self.db.mark_downloaded(record.id).await?;
        tracing::info!(name = %record.name, bytes, "downloaded");
        Ok(())
    }

    /// Copy the cached artifact into the user's destination folder.
    async fn deliver(&self, record: &FileRecord, user: &UserTarget) -> Result<u64, SyncError> {
        tokio::fs::create_dir_all(&user.destination_dir)
            .await
            .map_err(|source| SyncError::Io {
                path: user.destination_dir.clone(),
                source,
            })?;

        let src = self.layout.cache_path(&record.name);
        let dest = user.destination_dir.join(&record.name);
        let transfer = Arc::clone(&self.transfer);
        let target = dest.clone();
        let bytes = tokio::task::spawn_blocking(move || transfer.copy(&src, &target))
            .await
            .map_err(TransferError::from)
            .and_then(|res| res)
            .map_err(|source| SyncError::Copy {
                name: record.name.clone(),
                source,
            })?;

        tracing::info!(name = %record.name, dest = %dest.display(), bytes, "copied");
        Ok(bytes)
    }
}

/// Regular files in `dir` carrying the local extension, sorted by file name,
/// paired with their archive names.
async fn local_files(dir: &Path, layout: &SyncLayout) -> io::Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::debug!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        let Some(archive_name) =
            archive_name_for(&file_name, &layout.local_extension, &layout.archive_extension)
        else {
            continue;
        };
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        out.push((path, archive_name));
    }
    out.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(out)
}

/// File modification time as Unix seconds (negative before the epoch).
async fn modified_unix(path: &Path) -> io::Result<i64> {
    let modified = tokio::fs::metadata(path).await?.modified()?;
    Ok(match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    })
}
