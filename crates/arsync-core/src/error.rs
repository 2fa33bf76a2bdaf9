//! Typed errors for the index, crawl, transfer and sync layers.
//!
//! Callers decide per variant whether to log and continue or abort the run;
//! nothing here is swallowed.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence layer failure (open, migrate, query).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("state directory: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
}

/// A listing date that does not match the configured format.
#[derive(Debug, Error)]
#[error("invalid listing date {text:?}: {source}")]
pub struct DateParseError {
    pub text: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Failure to fetch a listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("GET {url}: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },
    #[error("fetch task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Download or copy failure.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("GET {url}: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a regular file", .0.display())]
    NotRegularFile(PathBuf),
    #[error("copy {} -> {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("transfer task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl TransferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransferError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure that ends a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Download of an artifact failed; the run cannot continue.
    #[error("download of {name} failed: {source}")]
    Transfer {
        name: String,
        #[source]
        source: TransferError,
    },
    /// Committing the downloaded flag failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("lookup of {name} failed: {source}")]
    Lookup {
        name: String,
        #[source]
        source: StoreError,
    },
    #[error("delivery of {name} failed: {source}")]
    Copy {
        name: String,
        #[source]
        source: TransferError,
    },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Whether the run must stop. Other errors only affect the current file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Transfer { .. } | SyncError::Store(_))
    }
}

/// Listing rules that cannot be used (bad CSS selector).
#[derive(Debug, Error)]
#[error("invalid selector {selector:?}: {message}")]
pub struct ListingError {
    pub selector: String,
    pub message: String,
}
