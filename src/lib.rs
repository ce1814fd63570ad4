use serde::Serialize;
use std::fmt;

pub mod config;
pub mod error;
pub mod system;
pub mod version_manager;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use system::{CommandRunner, ShellRunner};
pub use version_manager::{Notification, NotificationStyle, VersionManager, ViewState};

// Pseudo-version the tool reports for the interpreter outside its control
pub const SYSTEM_VERSION: &str = "system";

// Marker the tool prefixes to the active entry of `versions`
pub const ACTIVE_MARKER: char = '*';

// Menu modes selectable from the root list
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MenuMode {
    Current,
    Switch,
    Install,
    Uninstall,
}

impl MenuMode {
    pub const ALL: [MenuMode; 4] = [
        MenuMode::Current,
        MenuMode::Switch,
        MenuMode::Install,
        MenuMode::Uninstall,
    ];

    /// Subcommand whose output feeds the list for this mode.
    #[must_use]
    pub const fn list_subcommand(self) -> &'static str {
        match self {
            MenuMode::Current => "version",
            MenuMode::Switch | MenuMode::Uninstall => "versions",
            MenuMode::Install => "install --list",
        }
    }

    /// Parse raw tool output with the rule matching this mode.
    #[must_use]
    pub fn parse(self, output: &str) -> Vec<Version> {
        match self {
            MenuMode::Current => parse_current(output),
            MenuMode::Switch | MenuMode::Uninstall => parse_installed(output),
            MenuMode::Install => parse_installable(output),
        }
    }

    // The current mode is read-only
    #[must_use]
    pub const fn has_action(self) -> bool {
        !matches!(self, MenuMode::Current)
    }
}

impl fmt::Display for MenuMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuMode::Current => "current",
            MenuMode::Switch => "switch",
            MenuMode::Install => "install",
            MenuMode::Uninstall => "uninstall",
        };
        f.write_str(name)
    }
}

// A single version as reported by the external tool
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub name: String,
    pub is_current: bool,
}

impl Version {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_current: false,
        }
    }

    #[must_use]
    pub fn current(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_current: true,
        }
    }
}

// Parse `version` output: the first token is the active version
#[must_use]
pub fn parse_current(output: &str) -> Vec<Version> {
    output
        .split_whitespace()
        .next()
        .map(|name| vec![Version::current(name)])
        .unwrap_or_default()
}

// Parse `versions` output, flagging the entry carrying the active marker
#[must_use]
pub fn parse_installed(output: &str) -> Vec<Version> {
    output
        .lines()
        .filter_map(|line| {
            let (name, is_current) = strip_active_marker(line);
            entry_name(name).map(|name| Version {
                name: name.to_string(),
                is_current,
            })
        })
        .collect()
}

// Parse `install --list` output, which opens with a header line
#[must_use]
pub fn parse_installable(output: &str) -> Vec<Version> {
    drop_header(output)
        .filter_map(entry_name)
        .map(Version::new)
        .collect()
}

/// Strip the leading active marker and surrounding whitespace from a line.
///
/// Returns the remaining text and whether the marker was present.
#[must_use]
pub fn strip_active_marker(line: &str) -> (&str, bool) {
    let trimmed = line.trim();
    match trimmed.strip_prefix(ACTIVE_MARKER) {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    }
}

// Skip the first line of the output, whatever it holds
pub fn drop_header(output: &str) -> impl Iterator<Item = &str> {
    output.lines().skip(1)
}

/// Whether a trimmed name belongs in a version list.
///
/// Blank names and the `system` pseudo-version are excluded.
#[must_use]
pub fn is_listable(name: &str) -> bool {
    !name.is_empty() && name != SYSTEM_VERSION
}

// Reduce a line to its version token, dropping annotations like "(set by ...)"
fn entry_name(line: &str) -> Option<&str> {
    let name = line.split_whitespace().next().unwrap_or("");
    is_listable(name).then_some(name)
}
