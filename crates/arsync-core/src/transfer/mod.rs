//! Artifact transfer: atomic download into the shared cache and plain copy
//! from the cache into a user's destination folder.
//!
//! Downloads are written to `<dest>.tmp` and renamed only after the body has
//! been fully received and synced, so the final path never holds a partial file.

mod artifact;
mod copy;
mod download;
mod progress;

pub use artifact::PartialArtifact;
pub use copy::copy_file;
pub use download::{download_to, CurlTransfer};
pub(crate) use download::new_easy;
pub use progress::{NoopProgress, ProgressReporter};

use crate::error::TransferError;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Path for the temp file: appends `.tmp` to the final path (e.g. `a.zip` → `a.zip.tmp`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Network fetch and local copy of artifacts. Blocking; the sync engine runs it
/// on tokio's blocking pool.
pub trait Transfer: Send + Sync {
    /// Fetch `link` into `dest`, calling `progress` with cumulative bytes received.
    /// On error `dest` does not exist (a `.tmp` sibling may).
    fn download(
        &self,
        dest: &Path,
        link: &str,
        progress: &mut dyn FnMut(u64),
    ) -> Result<u64, TransferError>;

    /// Copy a cached artifact to a destination, overwriting it.
    fn copy(&self, src: &Path, dest: &Path) -> Result<u64, TransferError> {
        copy_file(src, dest)
    }
}
