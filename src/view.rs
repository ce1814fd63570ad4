//! Maps the view state onto selectable rows.
//!
//! Rows carry the action taken when they are chosen; front-ends render them
//! and hand the action back to the [`VersionManager`](crate::VersionManager).

use crate::version_manager::ViewState;
use crate::MenuMode;

pub const NAVIGATION_TITLE: &str = "Python Version Manager";
pub const SEARCH_PLACEHOLDER: &str = "Search Python versions...";

// Entry of the root menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub mode: MenuMode,
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const MAIN_MENU: [MenuItem; 4] = [
    MenuItem {
        mode: MenuMode::Current,
        title: "Show current Python version",
        subtitle: "Display the active Python version",
    },
    MenuItem {
        mode: MenuMode::Switch,
        title: "Switch Python version",
        subtitle: "Switch to another installed version",
    },
    MenuItem {
        mode: MenuMode::Install,
        title: "Install Python version",
        subtitle: "Install a new Python version",
    },
    MenuItem {
        mode: MenuMode::Uninstall,
        title: "Uninstall Python version",
        subtitle: "Remove an installed version",
    },
];

/// What choosing a row does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Enter a mode from the root menu.
    Select(MenuMode),
    /// Run the mode's action on a version.
    Apply { mode: MenuMode, version: String },
    /// Return to the root menu.
    Back,
    /// Open the installation guide.
    OpenHelp(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub subtitle: Option<String>,
    pub is_current: bool,
    pub label: &'static str,
    pub action: RowAction,
}

#[must_use]
pub const fn action_label(mode: MenuMode) -> &'static str {
    match mode {
        MenuMode::Current => "Back",
        MenuMode::Switch => "Switch to this version",
        MenuMode::Install => "Install this version",
        MenuMode::Uninstall => "Uninstall this version",
    }
}

// Title shown above the list
#[must_use]
pub fn navigation_title(state: &ViewState) -> String {
    match state.mode {
        Some(mode) => format!("{NAVIGATION_TITLE} / {mode}"),
        None => NAVIGATION_TITLE.to_string(),
    }
}

/// Rows for the given state.
///
/// An unavailable tool collapses everything into a single error row.
#[must_use]
pub fn rows(state: &ViewState, tool: &str, help_url: &str) -> Vec<Row> {
    if !state.available {
        return vec![Row {
            title: "Error".to_string(),
            subtitle: Some(format!("{tool} is not installed or configured correctly")),
            is_current: false,
            label: "Open installation guide",
            action: RowAction::OpenHelp(help_url.to_string()),
        }];
    }

    let Some(mode) = state.mode else {
        return MAIN_MENU
            .iter()
            .map(|item| Row {
                title: item.title.to_string(),
                subtitle: Some(item.subtitle.to_string()),
                is_current: false,
                label: "Select",
                action: RowAction::Select(item.mode),
            })
            .collect();
    };

    state
        .versions
        .iter()
        .map(|version| match mode {
            MenuMode::Current => Row {
                title: "Current Python version".to_string(),
                subtitle: Some(version.name.clone()),
                is_current: true,
                label: action_label(mode),
                action: RowAction::Back,
            },
            _ => Row {
                title: version.name.clone(),
                subtitle: None,
                is_current: version.is_current,
                label: action_label(mode),
                action: RowAction::Apply {
                    mode,
                    version: version.name.clone(),
                },
            },
        })
        .collect()
}

// Case-insensitive substring match on title and subtitle
#[must_use]
pub fn filter_rows(rows: Vec<Row>, query: &str) -> Vec<Row> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| {
            row.title.to_lowercase().contains(&query)
                || row
                    .subtitle
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&query))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Version;

    fn state_with(mode: MenuMode, versions: Vec<Version>) -> ViewState {
        ViewState {
            mode: Some(mode),
            versions,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_root_rows() {
        let rows = rows(&ViewState::default(), "pyenv", "https://example.com");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].action, RowAction::Select(MenuMode::Current));
        assert_eq!(rows[3].action, RowAction::Select(MenuMode::Uninstall));
    }

    #[test]
    fn test_unavailable_collapses_to_error_row() {
        let state = ViewState {
            available: false,
            ..ViewState::default()
        };
        let rows = rows(&state, "pyenv", "https://example.com/help");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].action,
            RowAction::OpenHelp("https://example.com/help".to_string())
        );
    }

    #[test]
    fn test_current_mode_is_read_only() {
        let state = state_with(MenuMode::Current, vec![Version::current("3.11.4")]);
        let rows = rows(&state, "pyenv", "");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subtitle.as_deref(), Some("3.11.4"));
        assert_eq!(rows[0].action, RowAction::Back);
    }

    #[test]
    fn test_action_rows_keep_order_and_labels() {
        let state = state_with(
            MenuMode::Uninstall,
            vec![Version::current("3.11.4"), Version::new("3.9.6")],
        );
        let rows = rows(&state, "pyenv", "");
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["3.11.4", "3.9.6"]);
        assert!(rows[0].is_current);
        assert_eq!(rows[1].label, "Uninstall this version");
        assert_eq!(
            rows[1].action,
            RowAction::Apply {
                mode: MenuMode::Uninstall,
                version: "3.9.6".to_string()
            }
        );
    }

    #[test]
    fn test_filter_rows() {
        let state = state_with(
            MenuMode::Install,
            vec![
                Version::new("3.12.0"),
                Version::new("pypy3.10-7.3.12"),
                Version::new("3.11.4"),
            ],
        );
        let all = rows(&state, "pyenv", "");
        assert_eq!(filter_rows(all.clone(), "").len(), 3);

        let filtered = filter_rows(all, "PyPy");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "pypy3.10-7.3.12");
    }
}
