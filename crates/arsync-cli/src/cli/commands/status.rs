//! `arsync status` – list indexed archive files.

use anyhow::Result;
use arsync_core::config::ArsyncConfig;
use arsync_core::crawl::format_listing_date;
use arsync_core::store::{MetadataDb, UNKNOWN_REMOTE_DATE};

pub async fn run_status(db: &MetadataDb, cfg: &ArsyncConfig, json: bool) -> Result<()> {
    let records = db.list_records().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("Index is empty. Run `arsync crawl` first.");
        return Ok(());
    }
    println!("{:<6} {:<12} {:<8} {}", "ID", "MODIFIED", "CACHED", "NAME");
    for r in records {
        let date = if r.remote_modified_at == UNKNOWN_REMOTE_DATE {
            "unknown".to_string()
        } else {
            format_listing_date(r.remote_modified_at, &cfg.listing.date_format)
                .unwrap_or_else(|| r.remote_modified_at.to_string())
        };
        println!(
            "{:<6} {:<12} {:<8} {}",
            r.id,
            date,
            if r.downloaded { "yes" } else { "no" },
            r.name
        );
    }
    Ok(())
}
