//! Sequential writer for an in-flight download.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::temp_path;
use crate::error::TransferError;

/// Temp file that becomes the final artifact only through `finalize`.
/// Dropping it without finalizing leaves the `.tmp` file in place.
pub struct PartialArtifact {
    file: File,
    temp_path: PathBuf,
    written: u64,
}

impl PartialArtifact {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> Result<Self, TransferError> {
        let temp_path = temp_path(final_path);
        let file = File::create(&temp_path).map_err(|e| TransferError::io(&temp_path, e))?;
        Ok(Self {
            file,
            temp_path,
            written: 0,
        })
    }

    pub fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes appended so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Sync and atomically rename the temp file to `final_path`. Fails if
    /// `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> Result<u64, TransferError> {
        let PartialArtifact {
            mut file,
            temp_path,
            written,
        } = self;
        file.flush().map_err(|e| TransferError::io(&temp_path, e))?;
        file.sync_all().map_err(|e| TransferError::io(&temp_path, e))?;
        drop(file);

        std::fs::rename(&temp_path, final_path).map_err(|e| TransferError::io(final_path, e))?;
        Ok(written)
    }
}
