//! `arsync run` – crawl, then sync.

use anyhow::Result;
use arsync_core::config::ArsyncConfig;
use arsync_core::store::MetadataDb;
use std::path::Path;

use super::{run_crawl, run_sync};

pub async fn run_pass(
    db: &MetadataDb,
    cfg: &ArsyncConfig,
    users_file: Option<&Path>,
    skip_crawl: bool,
) -> Result<()> {
    if skip_crawl {
        tracing::info!("crawl skipped, using existing index");
    } else {
        run_crawl(db, cfg).await?;
    }
    run_sync(db, cfg, users_file).await?;
    Ok(())
}
