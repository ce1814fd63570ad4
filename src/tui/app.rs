//! Terminal UI state and key handling.

use pyenv_menu::version_manager::PendingAction;
use pyenv_menu::view::{self, Row, RowAction};
use pyenv_menu::{system, CommandRunner, Notification, NotificationStyle, VersionManager};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

/// Blocking work to run after the screen has been redrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    Load,
    Complete(PendingAction),
    OpenHelp(String),
}

pub struct App<R: CommandRunner> {
    pub manager: VersionManager<R>,
    pub help_url: String,
    pub selected: usize,
    pub filter: String,
    pub filtering: bool,
    pub status: Option<Notification>,
    pub should_quit: bool,
}

impl<R: CommandRunner> App<R> {
    pub fn new(manager: VersionManager<R>, help_url: String) -> Self {
        let mut app = Self {
            manager,
            help_url,
            selected: 0,
            filter: String::new(),
            filtering: false,
            status: None,
            should_quit: false,
        };
        app.sync_notifications();
        app
    }

    // Rows currently on screen, after the search filter
    pub fn visible_rows(&self) -> Vec<Row> {
        let rows = view::rows(self.manager.state(), self.manager.tool(), &self.help_url);
        if self.manager.mode().is_some() {
            view::filter_rows(rows, &self.filter)
        } else {
            rows
        }
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.visible_rows().into_iter().nth(self.selected)
    }

    // Keep the latest notification for the status bar
    fn sync_notifications(&mut self) {
        if let Some(last) = self.manager.take_notifications().into_iter().last() {
            self.status = Some(last);
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_rows().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    fn reset_view(&mut self) {
        self.selected = 0;
        self.filter.clear();
        self.filtering = false;
    }

    pub fn select_next(&mut self) {
        let count = self.visible_rows().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.visible_rows().len();
        if count > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
        }
    }

    /// Handle a key press.
    ///
    /// Returns work that blocks on the external tool; the caller redraws so
    /// the loading state shows, then passes it to [`Self::run_deferred`].
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Deferred> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.filtering {
            self.handle_filter_key(key.code);
            return None;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('/') if self.manager.mode().is_some() => self.filtering = true,
            KeyCode::Enter => return self.activate_selected(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                if !self.go_back() && key.code == KeyCode::Esc {
                    self.should_quit = true;
                }
            }
            _ => {}
        }
        None
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.filter.clear();
                self.filtering = false;
            }
            KeyCode::Enter => self.filtering = false,
            KeyCode::Backspace => {
                self.filter.pop();
            }
            KeyCode::Char(c) => self.filter.push(c),
            _ => {}
        }
        self.clamp_selection();
    }

    fn go_back(&mut self) -> bool {
        if self.manager.back() {
            self.reset_view();
            true
        } else {
            false
        }
    }

    // Perform the selected row's action
    pub fn activate_selected(&mut self) -> Option<Deferred> {
        let row = self.selected_row()?;
        debug!(title = %row.title, action = ?row.action, "activate");

        let deferred = match row.action {
            RowAction::Select(mode) => {
                if !self.manager.enter_mode(mode) {
                    return None;
                }
                self.reset_view();
                Some(Deferred::Load)
            }
            RowAction::Apply { version, .. } => {
                self.manager.begin_action(&version).map(Deferred::Complete)
            }
            RowAction::Back => {
                self.go_back();
                None
            }
            RowAction::OpenHelp(url) => Some(Deferred::OpenHelp(url)),
        };
        self.sync_notifications();
        deferred
    }

    pub fn run_deferred(&mut self, deferred: Deferred) {
        match deferred {
            Deferred::Load => {
                self.manager.load_versions();
            }
            Deferred::Complete(pending) => {
                if let Err(e) = self.manager.complete_action(pending) {
                    debug!(error = %e, "action did not complete");
                }
            }
            Deferred::OpenHelp(url) => {
                if let Err(e) = system::open_url(&url) {
                    self.status = Some(Notification {
                        style: NotificationStyle::Failure,
                        title: format!("Could not open {url}"),
                        message: Some(e.to_string()),
                    });
                }
            }
        }
        self.sync_notifications();
        self.clamp_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyenv_menu::{Error, MenuMode, Result};
    use std::cell::RefCell;

    // Answers subcommands from a fixed table and records every call
    struct FakeRunner {
        calls: RefCell<Vec<String>>,
    }

    impl FakeRunner {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, subcommand: &str) -> Result<String> {
            self.calls.borrow_mut().push(subcommand.to_string());
            match subcommand {
                "--version" => Ok("pyenv 2.4.0".to_string()),
                "versions" => Ok("  system\n* 3.11.4 (set by /home/u/.pyenv/version)\n  3.9.6".to_string()),
                "global 3.9.6" => Ok(String::new()),
                other => Err(Error::Execution {
                    command: other.to_string(),
                    message: "unexpected".to_string(),
                }),
            }
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App<FakeRunner> {
        let mut manager = VersionManager::new(FakeRunner::new(), "pyenv");
        assert!(manager.probe());
        App::new(manager, "https://example.com".to_string())
    }

    fn press(app: &mut App<FakeRunner>, code: KeyCode) {
        if let Some(deferred) = app.handle_key(key(code)) {
            app.run_deferred(deferred);
        }
    }

    #[test]
    fn test_enter_defers_the_load() {
        let mut app = app();
        app.handle_key(key(KeyCode::Down));

        let deferred = app.handle_key(key(KeyCode::Enter));
        assert_eq!(deferred, Some(Deferred::Load));
        assert_eq!(app.manager.mode(), Some(MenuMode::Switch));
        assert!(app.manager.state().loading);

        app.run_deferred(Deferred::Load);
        assert!(!app.manager.state().loading);
        let names: Vec<_> = app.visible_rows().into_iter().map(|r| r.title).collect();
        assert_eq!(names, ["3.11.4", "3.9.6"]);
    }

    #[test]
    fn test_switch_flow_reloads_and_reports() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        let status = app.status.clone().map(|n| n.title);
        assert_eq!(status.as_deref(), Some("Switched to 3.9.6"));
        let calls = app.manager.runner().calls.borrow().clone();
        assert_eq!(calls, ["--version", "versions", "global 3.9.6", "versions"]);
    }

    #[test]
    fn test_filter_narrows_rows() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('/'));
        assert!(app.filtering);
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Enter);

        assert!(!app.filtering);
        let names: Vec<_> = app.visible_rows().into_iter().map(|r| r.title).collect();
        assert_eq!(names, ["3.9.6"]);
    }

    #[test]
    fn test_back_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.manager.mode(), Some(MenuMode::Current));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.manager.mode(), None);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    // Tool that is not installed at all
    #[derive(Default)]
    struct MissingTool {
        calls: RefCell<usize>,
    }

    impl CommandRunner for MissingTool {
        fn run(&self, subcommand: &str) -> Result<String> {
            *self.calls.borrow_mut() += 1;
            Err(Error::Execution {
                command: format!("pyenv {subcommand}"),
                message: "pyenv: command not found".to_string(),
            })
        }
    }

    #[test]
    fn test_missing_tool_starts_ui_on_help_row() -> anyhow::Result<()> {
        let help_url = "https://example.com/help";
        let mut manager = VersionManager::new(MissingTool::default(), "pyenv");
        crate::cli::check_tool(&mut manager, None, help_url)?;
        assert!(!manager.is_available());

        let mut app = App::new(manager, help_url.to_string());
        let status = app.status.clone().map(|n| n.title);
        assert_eq!(status.as_deref(), Some("pyenv is not available"));

        let rows = app.visible_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Error");

        // Navigation stays on the single error row
        assert_eq!(app.handle_key(key(KeyCode::Down)), None);
        assert_eq!(app.handle_key(key(KeyCode::Backspace)), None);
        assert_eq!(app.selected, 0);
        assert!(!app.should_quit);

        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Deferred::OpenHelp(help_url.to_string()))
        );
        assert_eq!(*app.manager.runner().calls.borrow(), 1);
        Ok(())
    }
}
