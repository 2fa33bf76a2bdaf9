//! Listing page parsing: rows → folder or file entries.

use chrono::{DateTime, NaiveDate, NaiveTime};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::ListingRules;
use crate::error::{DateParseError, ListingError};

/// One row of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    /// Link to a nested listing page.
    Folder { url: Url },
    /// Downloadable file; `date` is the raw text of the date cell.
    File { name: String, url: Url, date: String },
}

/// `ListingRules` with selectors parsed once.
#[derive(Debug)]
pub struct CompiledRules {
    row: Selector,
    link: Selector,
    date: Selector,
    folder_marker: String,
    date_format: String,
}

fn compile(selector: &str) -> Result<Selector, ListingError> {
    Selector::parse(selector).map_err(|e| ListingError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl CompiledRules {
    pub fn compile(rules: &ListingRules) -> Result<Self, ListingError> {
        Ok(Self {
            row: compile(&rules.row_selector)?,
            link: compile(&rules.link_selector)?,
            date: compile(&rules.date_selector)?,
            folder_marker: rules.folder_marker.clone(),
            date_format: rules.date_format.clone(),
        })
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Extract entries from `html`. Rows without a link or with an empty `href`
/// are skipped; links are resolved against `page_url`.
pub fn parse_listing(html: &str, page_url: &Url, rules: &CompiledRules) -> Vec<ListingEntry> {
    let doc = Html::parse_document(html);
    let mut out = Vec::new();

    for row in doc.select(&rules.row) {
        let Some(anchor) = row.select(&rules.link).next() else {
            continue;
        };
        let href = anchor.value().attr("href").unwrap_or("").trim();
        if href.is_empty() {
            continue;
        }
        let url = match page_url.join(href) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!(href, error = %e, "skipping unresolvable link");
                continue;
            }
        };

        if href.contains(rules.folder_marker.as_str()) {
            out.push(ListingEntry::Folder { url });
        } else {
            let date = row
                .select(&rules.date)
                .next()
                .map(text_of)
                .unwrap_or_default();
            out.push(ListingEntry::File {
                name: text_of(anchor),
                url,
                date: date.trim().to_string(),
            });
        }
    }
    out
}

/// Store key for a display name: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse a listing date (default format `DD.MM.YYYY`) to Unix seconds at UTC midnight.
pub fn parse_listing_date(text: &str, format: &str) -> Result<i64, DateParseError> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, format).map_err(|source| DateParseError {
        text: text.to_string(),
        source,
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// Render Unix seconds back in a listing date format (UTC). `None` if out of range.
pub fn format_listing_date(ts: i64, format: &str) -> Option<String> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.format(format).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> CompiledRules {
        CompiledRules::compile(&ListingRules::default()).unwrap()
    }

    fn page_url() -> Url {
        Url::parse("https://archive.example/download?folder=data").unwrap()
    }

    const PAGE: &str = r#"
        <html><body>
        <table id="conference">
          <tr><th>Name</th><th>Type</th><th>Size</th><th>Date</th></tr>
          <tr>
            <td><a href="/download?folder=data/prices">prices</a></td>
            <td>folder</td><td></td><td></td>
          </tr>
          <tr>
            <td><a href="/download?file=data/Report.zip">  Report.zip </a></td>
            <td>zip</td><td>1 MB</td><td> 15.03.2024 </td>
          </tr>
          <tr>
            <td><a href="">empty.zip</a></td>
            <td>zip</td><td>1 MB</td><td>15.03.2024</td>
          </tr>
          <tr>
            <td>no link here</td>
            <td>zip</td><td>1 MB</td><td>15.03.2024</td>
          </tr>
          <tr>
            <td><a href="https://cdn.example/other.zip">other.zip</a></td>
            <td>zip</td><td>2 MB</td><td>yesterday</td>
          </tr>
        </table>
        <table id="footer"><tr><td><a href="/about">About</a></td></tr></table>
        </body></html>
    "#;

    #[test]
    fn parses_folders_and_files() {
        let entries = parse_listing(PAGE, &page_url(), &rules());
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            ListingEntry::Folder {
                url: Url::parse("https://archive.example/download?folder=data/prices").unwrap()
            }
        );
        match &entries[1] {
            ListingEntry::File { name, url, date } => {
                assert_eq!(name, "  Report.zip ");
                assert_eq!(url.as_str(), "https://archive.example/download?file=data/Report.zip");
                assert_eq!(date, "15.03.2024");
            }
            other => panic!("expected file, got {:?}", other),
        }
        match &entries[2] {
            ListingEntry::File { url, date, .. } => {
                assert_eq!(url.as_str(), "https://cdn.example/other.zip");
                assert_eq!(date, "yesterday");
            }
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn rows_outside_listing_table_are_ignored() {
        let entries = parse_listing(PAGE, &page_url(), &rules());
        assert!(entries.iter().all(|e| match e {
            ListingEntry::Folder { url } | ListingEntry::File { url, .. } => url.path() != "/about",
        }));
    }

    #[test]
    fn empty_page_has_no_entries() {
        assert!(parse_listing("<html></html>", &page_url(), &rules()).is_empty());
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let bad = ListingRules {
            row_selector: "tr[".to_string(),
            ..ListingRules::default()
        };
        let err = CompiledRules::compile(&bad).unwrap_err();
        assert_eq!(err.selector, "tr[");
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_name("  Report.ZIP \n"), "report.zip");
    }

    #[test]
    fn listing_date_is_utc_midnight() {
        assert_eq!(parse_listing_date("15.03.2024", "%d.%m.%Y").unwrap(), 1_710_460_800);
        assert_eq!(parse_listing_date(" 01.01.1970 ", "%d.%m.%Y").unwrap(), 0);
    }

    #[test]
    fn listing_date_formats_back() {
        assert_eq!(format_listing_date(1_710_460_800, "%d.%m.%Y").as_deref(), Some("15.03.2024"));
        assert!(format_listing_date(i64::MAX, "%d.%m.%Y").is_none());
    }

    #[test]
    fn bad_listing_date_is_error() {
        let err = parse_listing_date("2024-03-15", "%d.%m.%Y").unwrap_err();
        assert_eq!(err.text, "2024-03-15");
        assert!(parse_listing_date("", "%d.%m.%Y").is_err());
        assert!(parse_listing_date("32.01.2024", "%d.%m.%Y").is_err());
    }
}
