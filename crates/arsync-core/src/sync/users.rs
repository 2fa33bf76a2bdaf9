//! User list: one local directory per line.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::NamingConfig;

/// A user directory and the two folders derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTarget {
    pub root: PathBuf,
    /// Scanned for producer-native files.
    pub source_dir: PathBuf,
    /// Receives synced artifacts.
    pub destination_dir: PathBuf,
}

impl UserTarget {
    pub fn new(root: impl Into<PathBuf>, naming: &NamingConfig) -> Self {
        let root = root.into();
        Self {
            source_dir: root.join(&naming.source_subdir),
            destination_dir: root.join(&naming.destination_subdir),
            root,
        }
    }
}

/// Parse user list text. Lines are trimmed; blank lines and `#` comments are skipped.
pub fn parse_user_list(text: &str, naming: &NamingConfig) -> Vec<UserTarget> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| UserTarget::new(line, naming))
        .collect()
}

pub fn read_user_list(path: &Path, naming: &NamingConfig) -> std::io::Result<Vec<UserTarget>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_user_list(&text, naming))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_source_and_destination() {
        let t = UserTarget::new("/srv/users/ivanov/", &NamingConfig::default());
        assert_eq!(t.source_dir, PathBuf::from("/srv/users/ivanov/Data"));
        assert_eq!(t.destination_dir, PathBuf::from("/srv/users/ivanov/Download"));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "/home/a/\r\n\n   \n# retired\n  /home/b  \n";
        let users = parse_user_list(text, &NamingConfig::default());
        let roots: Vec<_> = users.iter().map(|u| u.root.clone()).collect();
        assert_eq!(roots, vec![PathBuf::from("/home/a/"), PathBuf::from("/home/b")]);
    }

    #[test]
    fn read_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_user_list(&dir.path().join("users.txt"), &NamingConfig::default()).is_err());
    }
}
