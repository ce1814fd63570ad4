use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// Constants
pub const DEFAULT_TOOL: &str = "pyenv";
pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const DEFAULT_HELP_URL: &str = "https://github.com/pyenv/pyenv#installation";
const CONFIG_DIR: &str = "pyenv-menu";
const CONFIG_FILE: &str = "config.toml";

// User configuration, every key optional in the file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Version-manager executable to drive.
    pub tool: String,
    /// Shell used to run the tool's init hook and subcommands.
    pub shell: PathBuf,
    /// Extra shell lines run before the tool's own init,
    /// e.g. `eval "$(/opt/homebrew/bin/brew shellenv)"`.
    pub init_hooks: Vec<String>,
    /// Link offered when the tool is unavailable.
    pub help_url: String,
    /// Where log output goes when logging is enabled.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            shell: PathBuf::from(DEFAULT_SHELL),
            init_hooks: Vec::new(),
            help_url: DEFAULT_HELP_URL.to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match the schema.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config from TOML text
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the text does not match the schema.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the config the user asked for, or the default location if present.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    // $XDG_CONFIG_HOME/pyenv-menu/config.toml or the platform equivalent
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    // Log file location, falling back to the platform cache dir
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(CONFIG_DIR)
                .join("pyenv-menu.log")
        })
    }
}
