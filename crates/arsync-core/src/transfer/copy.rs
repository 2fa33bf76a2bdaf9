//! Plain file copy from the shared cache to a user's destination folder.
//!
//! Not crash-atomic: an interrupted copy can leave a truncated destination.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::error::TransferError;

/// Copy `src` to `dest` byte for byte, overwriting `dest`. Returns bytes copied.
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64, TransferError> {
    let meta = fs::metadata(src).map_err(|e| TransferError::io(src, e))?;
    if !meta.is_file() {
        return Err(TransferError::NotRegularFile(src.to_path_buf()));
    }

    let copy_err = |source: io::Error| TransferError::Copy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };
    let mut source = File::open(src).map_err(copy_err)?;
    let mut destination = File::create(dest).map_err(copy_err)?;
    io::copy(&mut source, &mut destination).map_err(copy_err)
}
