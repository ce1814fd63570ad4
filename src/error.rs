use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the library.
#[derive(Debug, Error)]
pub enum Error {
    /// The external tool could not be spawned or exited non-zero.
    #[error("command `{command}` failed: {message}")]
    Execution { command: String, message: String },
    /// The startup version check failed, so the tool is treated as unreachable.
    #[error("{tool} is not available")]
    Unavailable { tool: String },
    /// No mode is selected, or the selected mode has no action.
    #[error("no action available in the current view")]
    NoAction,
    /// Config file could not be read.
    #[error("failed to read config from {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Config file is not valid TOML for the expected schema.
    #[error("failed to parse config from {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn execution(command: &str, message: impl Into<String>) -> Self {
        Self::Execution {
            command: command.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
