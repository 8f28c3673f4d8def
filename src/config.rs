//! Runtime configuration.
//!
//! Read from a JSON file. Every field has a default, so a partial file
//! is fine and a missing one means "use the defaults".

use crate::error::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the logged-in session is persisted.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
    #[serde(default = "default_bootstrap_username")]
    pub bootstrap_username: String,
    #[serde(default = "default_bootstrap_password")]
    pub bootstrap_password: String,
    /// Skip imported transactions whose description and date already exist.
    #[serde(default)]
    pub detect_transaction_duplicates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            session_file: default_session_file(),
            bootstrap_username: default_bootstrap_username(),
            bootstrap_password: default_bootstrap_password(),
            detect_transaction_duplicates: false,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("branchbooks")
}

fn default_session_file() -> PathBuf {
    config_dir().join("session.json")
}

fn default_bootstrap_username() -> String {
    "FirstDev".to_string()
}

fn default_bootstrap_password() -> String {
    "A123456789+".to_string()
}

/// Path of the config file used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

impl Config {
    /// Reads a config file, failing on I/O or JSON errors.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `explicit` if given, else the default path if it exists.
    ///
    /// A file that cannot be read or parsed falls back to the defaults
    /// with a warning.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = default_config_path();
                if !p.exists() {
                    debug!("No config at {}, using defaults", p.display());
                    return Config::default();
                }
                p
            }
        };

        match Config::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }
}
