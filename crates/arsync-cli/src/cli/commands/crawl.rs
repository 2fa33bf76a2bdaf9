//! `arsync crawl` – refresh the archive index.

use anyhow::{Context, Result};
use arsync_core::config::ArsyncConfig;
use arsync_core::crawl::{CrawlReport, Crawler, CurlFetcher};
use arsync_core::store::MetadataDb;
use std::sync::Arc;

pub async fn run_crawl(db: &MetadataDb, cfg: &ArsyncConfig) -> Result<CrawlReport> {
    let fetcher = Arc::new(CurlFetcher::new(cfg.http.clone()));
    let crawler = Crawler::new(db.clone(), fetcher, &cfg.listing, cfg.max_depth)?;
    let report = crawler
        .crawl(&cfg.index_url)
        .await
        .with_context(|| format!("crawl {}", cfg.index_url))?;

    println!(
        "Indexed {} file(s) ({} new) from {} page(s).",
        report.files_indexed(),
        report.inserted,
        report.pages_visited
    );
    let problems = report.page_errors + report.date_errors + report.store_errors;
    if problems > 0 {
        println!(
            "Problems: {} folder page(s) skipped, {} bad date(s) ({} new file(s) indexed undated), {} store error(s). See the log for details.",
            report.page_errors, report.date_errors, report.undated, report.store_errors
        );
    }
    Ok(report)
}
