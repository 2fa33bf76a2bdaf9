use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How rows, links and dates are located on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingRules {
    /// CSS selector for one listing row.
    pub row_selector: String,
    /// CSS selector (relative to the row) for the entry link; its text is the display name.
    pub link_selector: String,
    /// CSS selector (relative to the row) for the date cell.
    pub date_selector: String,
    /// Substring of a link that marks it as a sub-folder listing.
    pub folder_marker: String,
    /// chrono format of the date cell (e.g. `15.03.2024`).
    pub date_format: String,
}

impl Default for ListingRules {
    fn default() -> Self {
        Self {
            row_selector: "#conference tr".to_string(),
            link_selector: "td:nth-child(1) > a".to_string(),
            date_selector: "td:nth-child(4)".to_string(),
            folder_marker: "folder".to_string(),
            date_format: "%d.%m.%Y".to_string(),
        }
    }
}

/// Local/archive naming convention and per-user directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Extension (without dot) of producer-native files found in the source dir.
    pub local_extension: String,
    /// Extension (without dot) of the same logical file in the archive.
    pub archive_extension: String,
    /// Subdirectory of a user path that is scanned for local files.
    pub source_subdir: String,
    /// Subdirectory of a user path that receives synced artifacts.
    pub destination_subdir: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            local_extension: "GSD8".to_string(),
            archive_extension: "zip".to_string(),
            source_subdir: "Data".to_string(),
            destination_subdir: "Download".to_string(),
        }
    }
}

/// libcurl limits applied to page fetches and downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Upper bound for one whole request (page or artifact).
    pub timeout_secs: u64,
    /// Abort when the rate stays below this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit: u32,
    pub low_speed_time_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            user_agent: concat!("arsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }
}

/// Global configuration loaded from `~/.config/arsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArsyncConfig {
    /// Root listing page of the remote archive.
    pub index_url: String,
    /// Text file with one user directory per line.
    pub users_file: PathBuf,
    /// Shared download cache; artifacts are stored here by normalized name.
    /// A relative path is taken relative to the index database's directory.
    pub cache_dir: PathBuf,
    /// Index database path; if missing, `~/.local/state/arsync/index.db` is used.
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// How many folder levels below the root listing are visited.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default)]
    pub listing: ListingRules,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_max_depth() -> u32 {
    1
}

/// Default index database: `~/.local/state/arsync/index.db`.
pub fn default_database_path() -> std::result::Result<PathBuf, xdg::BaseDirectoriesError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("arsync")?;
    Ok(xdg_dirs.get_state_home().join("index.db"))
}

impl ArsyncConfig {
    /// Configured database path, or the XDG default.
    pub fn database_path(&self) -> std::result::Result<PathBuf, xdg::BaseDirectoriesError> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }

    /// Cache directory for the index at `database`. A relative `cache_dir`
    /// is joined to the database's directory so the cache and the
    /// `downloaded` flags always move together.
    pub fn cache_dir_for(&self, database: &Path) -> PathBuf {
        if self.cache_dir.is_absolute() {
            return self.cache_dir.clone();
        }
        match database.parent() {
            Some(dir) => dir.join(&self.cache_dir),
            None => self.cache_dir.clone(),
        }
    }
}

impl Default for ArsyncConfig {
    fn default() -> Self {
        Self {
            index_url: "https://www.grandsmeta.ru/download?folder=grandsmeta/data".to_string(),
            users_file: PathBuf::from("users.txt"),
            cache_dir: PathBuf::from("Downloaded"),
            database: None,
            max_depth: default_max_depth(),
            listing: ListingRules::default(),
            naming: NamingConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("arsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ArsyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ArsyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file (no default is written).
pub fn load_from_path(path: &Path) -> Result<ArsyncConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ArsyncConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
