//! `arsync sync` – reconcile user folders against the index.

use anyhow::{Context, Result};
use arsync_core::config::ArsyncConfig;
use arsync_core::store::MetadataDb;
use arsync_core::sync::{read_user_list, CancelToken, SyncEngine, SyncLayout, SyncReport};
use arsync_core::transfer::CurlTransfer;
use std::path::Path;
use std::sync::Arc;

use crate::cli::progress::ConsoleProgress;

pub async fn run_sync(
    db: &MetadataDb,
    cfg: &ArsyncConfig,
    users_file: Option<&Path>,
) -> Result<SyncReport> {
    let users_file = users_file.unwrap_or(cfg.users_file.as_path());
    let users = read_user_list(users_file, &cfg.naming)
        .with_context(|| format!("read user list {}", users_file.display()))?;
    if users.is_empty() {
        println!("No users listed in {}.", users_file.display());
        return Ok(SyncReport::default());
    }

    let database = cfg.database_path()?;
    let layout = SyncLayout::from_config(cfg, &database);
    tracing::debug!(cache = %layout.cache_dir.display(), "using download cache");

    // Ctrl-C stops the run after the file in progress.
    let cancel = CancelToken::new();
    let on_signal = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupt received, stopping after the current file");
            on_signal.cancel();
        }
    });

    let engine = SyncEngine::new(
        db.clone(),
        Arc::new(CurlTransfer::new(cfg.http.clone())),
        layout,
    )
    .with_progress(Arc::new(ConsoleProgress::new()))
    .with_cancel(cancel);

    let result = engine.run(&users).await;
    signal_task.abort();
    let report = result?;

    println!(
        "Synced {} user(s): {} downloaded, {} copied, {} up to date, {} not in archive, {} failed.",
        report.users,
        report.downloaded,
        report.copied,
        report.up_to_date,
        report.unlisted.len(),
        report.failed
    );
    for missing in &report.unlisted {
        println!("  not in archive: {} ({})", missing.name, missing.user.display());
    }
    if report.users_skipped > 0 {
        println!("{} user(s) skipped: source folder unreadable.", report.users_skipped);
    }
    if report.cancelled {
        println!("Run interrupted.");
    }
    Ok(report)
}
