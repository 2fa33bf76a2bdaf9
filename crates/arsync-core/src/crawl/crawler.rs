//! Bounded-depth crawl of the archive listing.
//!
//! The root page is visited at depth 0; folder entries are followed while
//! `depth < max_depth`. Every file entry is upserted into the store as it is
//! found. Only a failure to fetch the root page is returned as an error;
//! sub-folder fetch failures, bad dates and per-row store errors are logged
//! and counted in the report.

use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

use super::fetch::PageFetcher;
use super::listing::{normalize_name, parse_listing, parse_listing_date, CompiledRules, ListingEntry};
use crate::config::ListingRules;
use crate::error::{DateParseError, FetchError, ListingError};
use crate::store::{MetadataDb, UpsertOutcome, UNKNOWN_REMOTE_DATE};

/// Counters for one crawl pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub pages_visited: usize,
    pub page_errors: usize,
    /// Folder entries not followed because they were at the depth limit.
    pub folders_skipped: usize,
    pub inserted: usize,
    pub refreshed: usize,
    pub date_errors: usize,
    /// New files indexed with an unknown date (counted in `inserted` too).
    pub undated: usize,
    pub store_errors: usize,
}

impl CrawlReport {
    pub fn files_indexed(&self) -> usize {
        self.inserted + self.refreshed
    }
}

pub struct Crawler {
    db: MetadataDb,
    fetcher: Arc<dyn PageFetcher>,
    rules: CompiledRules,
    max_depth: u32,
}

impl Crawler {
    pub fn new(
        db: MetadataDb,
        fetcher: Arc<dyn PageFetcher>,
        rules: &ListingRules,
        max_depth: u32,
    ) -> Result<Self, ListingError> {
        Ok(Self {
            db,
            fetcher,
            rules: CompiledRules::compile(rules)?,
            max_depth,
        })
    }

    /// Crawl from `root_url` and upsert every file found.
    pub async fn crawl(&self, root_url: &str) -> Result<CrawlReport, FetchError> {
        let root = Url::parse(root_url).map_err(|source| FetchError::Url {
            url: root_url.to_string(),
            source,
        })?;

        let mut report = CrawlReport::default();
        let mut seen: HashSet<Url> = HashSet::new();
        seen.insert(root.clone());
        let mut pending: VecDeque<(Url, u32)> = VecDeque::new();
        pending.push_back((root, 0));

        while let Some((url, depth)) = pending.pop_front() {
            let started = Instant::now();
            match self.visit(&url, depth, &mut report).await {
                Ok(children) => {
                    for child in children {
                        if seen.insert(child.clone()) {
                            pending.push_back((child, depth + 1));
                        }
                    }
                    tracing::info!(
                        url = %url,
                        depth,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "listing parsed"
                    );
                }
                Err(e) if depth == 0 => return Err(e),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "folder fetch failed, skipping");
                    report.page_errors += 1;
                }
            }
        }

        tracing::info!(?report, "crawl finished");
        Ok(report)
    }

    /// Visit one listing page at `depth`. Indexes its files and returns the
    /// folders that may be visited next (none once `depth` reaches the limit).
    pub async fn visit(
        &self,
        url: &Url,
        depth: u32,
        report: &mut CrawlReport,
    ) -> Result<Vec<Url>, FetchError> {
        let html = self.fetch_page(url).await?;
        report.pages_visited += 1;

        let entries = parse_listing(&html, url, &self.rules);
        let mut children = Vec::new();
        for entry in entries {
            match entry {
                ListingEntry::Folder { url: folder } => {
                    if depth < self.max_depth {
                        children.push(folder);
                    } else {
                        tracing::debug!(folder = %folder, depth, "depth limit reached, not following");
                        report.folders_skipped += 1;
                    }
                }
                ListingEntry::File { name, url, date } => {
                    self.index_file(&name, url.as_str(), &date, report).await;
                }
            }
        }
        Ok(children)
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let fetcher = Arc::clone(&self.fetcher);
        let target = url.to_string();
        tokio::task::spawn_blocking(move || fetcher.fetch(&target)).await?
    }

    async fn index_file(&self, display_name: &str, link: &str, date: &str, report: &mut CrawlReport) {
        let name = normalize_name(display_name);
        let remote_modified_at = match parse_listing_date(date, self.rules.date_format()) {
            Ok(ts) => ts,
            Err(e) => {
                report.date_errors += 1;
                self.index_undated(&name, link, &e, report).await;
                return;
            }
        };

        match self.db.upsert_or_refresh(&name, link, remote_modified_at).await {
            Ok(UpsertOutcome::Inserted(id)) => {
                tracing::debug!(id, name = %name, "indexed new file");
                report.inserted += 1;
            }
            Ok(UpsertOutcome::Refreshed(_)) => report.refreshed += 1,
            Err(e) => {
                tracing::error!(name = %name, error = %e, "failed to store index entry");
                report.store_errors += 1;
            }
        }
    }

    /// A file whose date cannot be parsed is still indexed when new, so that
    /// it is known to exist; an existing row keeps its stored date.
    async fn index_undated(
        &self,
        name: &str,
        link: &str,
        err: &DateParseError,
        report: &mut CrawlReport,
    ) {
        match self.db.insert_if_absent(name, link, UNKNOWN_REMOTE_DATE).await {
            Ok(Some(id)) => {
                tracing::warn!(id, name, error = %err, "indexed new file without a usable date");
                report.inserted += 1;
                report.undated += 1;
            }
            Ok(None) => {
                tracing::warn!(name, error = %err, "unparseable date, keeping stored date");
            }
            Err(e) => {
                tracing::error!(name, error = %e, "failed to store index entry");
                report.store_errors += 1;
            }
        }
    }
}
