//! Mapping from producer-native file names to archive file names.

use std::path::Path;

/// Archive name for a local file, or `None` if `file_name` does not carry
/// `local_ext`. Extensions are given without the dot and compared
/// case-insensitively; the result is lower-cased (`Report.GSD8` → `report.zip`).
pub fn archive_name_for(file_name: &str, local_ext: &str, archive_ext: &str) -> Option<String> {
    let path = Path::new(file_name);
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case(local_ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some(format!("{}.{}", stem, archive_ext).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_local_to_archive_name() {
        assert_eq!(archive_name_for("report.GSD8", "GSD8", "zip").as_deref(), Some("report.zip"));
        assert_eq!(archive_name_for("Report.gsd8", "GSD8", "zip").as_deref(), Some("report.zip"));
        assert_eq!(
            archive_name_for("Smeta 2024.v2.GSD8", "GSD8", "zip").as_deref(),
            Some("smeta 2024.v2.zip")
        );
    }

    #[test]
    fn other_extensions_are_ignored() {
        assert!(archive_name_for("report.zip", "GSD8", "zip").is_none());
        assert!(archive_name_for("report.GSD8.bak", "GSD8", "zip").is_none());
        assert!(archive_name_for("GSD8", "GSD8", "zip").is_none());
        assert!(archive_name_for(".GSD8", "GSD8", "zip").is_none());
    }
}
