//! Project configuration for the `gsc` driver.
//!
//! Loaded from a `gsc.toml` in the current directory, the user's config
//! directory, or an explicit `--config` path, in that order of precedence
//! (an explicit CLI flag always wins; see [`crate::load_config`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DrvError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "gsc.toml";

/// Project-level configuration for `gsc build`/`gsc check`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory `gsc build`/`gsc check` search for `.gs` files when given a
    /// directory instead of a single file.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Directory module summaries are written under.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Whether IR generation should optimize. Accepted and currently a
    /// no-op: the IR generator has no optimization passes.
    #[serde(default = "default_true")]
    pub optimize: bool,

    /// Number of files to compile in parallel.
    #[serde(default = "default_jobs")]
    pub jobs: u32,
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_output_dir() -> String {
    "target/gsc".to_string()
}

fn default_true() -> bool {
    true
}

fn default_jobs() -> u32 {
    std::thread::available_parallelism().map(|n| n.get() as u32).unwrap_or(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            optimize: true,
            jobs: default_jobs(),
        }
    }
}

impl Config {
    /// Loads configuration from the default search locations, falling back
    /// to [`Config::default`] if none is found.
    ///
    /// Search order: current directory, then the user's config directory
    /// (`~/.config/gsc/gsc.toml` on Linux).
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DrvError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| DrvError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_user_config() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("gsc").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config().or_else(Self::check_user_config)
    }
}
