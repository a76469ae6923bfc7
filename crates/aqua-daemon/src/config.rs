//! Configuration file management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "AQUA_DATA_DIR";

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chemistry defaults.
    #[serde(default)]
    pub chemistry: ChemistryConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    /// Database file name inside the data directory.
    #[serde(default = "default_db_file")]
    pub db_file: String,
    /// IPC socket file name inside the data directory.
    #[serde(default = "default_socket_name")]
    pub socket_name: String,
}

/// Chemistry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemistryConfig {
    /// NH3 warning level (mg/L) used when the database carries none.
    #[serde(default = "default_nh3_warning")]
    pub nh3_warning_mg_l: f64,
    /// Upper bound on rows returned by list queries.
    #[serde(default = "default_max_list_rows")]
    pub max_list_rows: u32,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file path. Empty = stderr.
    #[serde(default)]
    pub log_file: String,
}

fn default_db_file() -> String {
    "aquakeeper.db".to_string()
}

fn default_socket_name() -> String {
    "aquad.sock".to_string()
}

fn default_nh3_warning() -> f64 {
    aqua_chem::ammonia::DEFAULT_NH3_WARNING_MG_L
}

fn default_max_list_rows() -> u32 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            db_file: default_db_file(),
            socket_name: default_socket_name(),
        }
    }
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            nh3_warning_mg_l: default_nh3_warning(),
            max_list_rows: default_max_list_rows(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults if absent.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DaemonConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Database file path.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.db_file)
    }

    /// IPC socket path.
    pub fn socket_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.socket_name)
    }

    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/AquaKeeper")
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs_fallback(".aquakeeper")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/aquakeeper"))
}
