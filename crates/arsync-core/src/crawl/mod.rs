//! Remote index builder: walks the archive listing and records every file in
//! the metadata store.

pub mod crawler;
pub mod fetch;
pub mod listing;

pub use crawler::{CrawlReport, Crawler};
pub use fetch::{CurlFetcher, PageFetcher};
pub use listing::{
    format_listing_date, normalize_name, parse_listing, parse_listing_date, CompiledRules,
    ListingEntry,
};
