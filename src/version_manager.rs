use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::system::CommandRunner;
use crate::{MenuMode, Version};

// Notification severities surfaced to the user
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStyle {
    Success,
    InProgress,
    Failure,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub style: NotificationStyle,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Notification {
    fn success(title: String) -> Self {
        Self {
            style: NotificationStyle::Success,
            title,
            message: None,
        }
    }

    fn in_progress(title: String) -> Self {
        Self {
            style: NotificationStyle::InProgress,
            title,
            message: None,
        }
    }

    fn failure(title: impl Into<String>, error: &Error) -> Self {
        Self {
            style: NotificationStyle::Failure,
            title: title.into(),
            message: Some(error.to_string()),
        }
    }
}

/// Everything the views render from.
///
/// Never edited in place: each transition builds the next record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mode: Option<MenuMode>,
    pub versions: Vec<Version>,
    pub loading: bool,
    pub available: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: None,
            versions: Vec::new(),
            loading: false,
            available: true,
        }
    }
}

impl ViewState {
    // Enter a mode with an empty list pending its load
    fn entering(&self, mode: MenuMode) -> Self {
        Self {
            mode: Some(mode),
            versions: Vec::new(),
            loading: true,
            available: self.available,
        }
    }

    // Back to the root menu, discarding the list
    fn root(&self) -> Self {
        Self {
            mode: None,
            versions: Vec::new(),
            loading: false,
            available: self.available,
        }
    }

    fn busy(&self, loading: bool) -> Self {
        Self {
            loading,
            ..self.clone()
        }
    }

    fn loaded(&self, versions: Vec<Version>) -> Self {
        Self {
            versions,
            loading: false,
            ..self.clone()
        }
    }

    fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }
}

/// An action announced by [`VersionManager::begin_action`] and not yet run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    mode: MenuMode,
    version: String,
}

impl PendingAction {
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

// Subcommand mutating the tool's state for an action mode
#[must_use]
pub fn action_subcommand(mode: MenuMode, version: &str) -> Option<String> {
    let version = shell_words::quote(version);
    match mode {
        MenuMode::Current => None,
        MenuMode::Switch => Some(format!("global {version}")),
        MenuMode::Install => Some(format!("install {version}")),
        MenuMode::Uninstall => Some(format!("uninstall -f {version}")),
    }
}

// VersionManager owns the view state and drives the external tool
pub struct VersionManager<R: CommandRunner> {
    runner: R,
    tool: String,
    state: ViewState,
    probed: bool,
    notifications: Vec<Notification>,
}

impl<R: CommandRunner> VersionManager<R> {
    pub fn new(runner: R, tool: impl Into<String>) -> Self {
        Self {
            runner,
            tool: tool.into(),
            state: ViewState::default(),
            probed: false,
            notifications: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn mode(&self) -> Option<MenuMode> {
        self.state.mode
    }

    #[must_use]
    pub fn versions(&self) -> &[Version] {
        &self.state.versions
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state.available
    }

    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    // Notifications raised since the last call, oldest first
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, notification: Notification) {
        debug!(style = ?notification.style, title = %notification.title, "notify");
        self.notifications.push(notification);
    }

    // Every runner call goes through here so an unavailable tool is never invoked
    fn exec(&self, subcommand: &str) -> Result<String> {
        if !self.state.available {
            return Err(Error::Unavailable {
                tool: self.tool.clone(),
            });
        }
        self.runner.run(subcommand)
    }

    /// Check once that the tool responds to a version query.
    ///
    /// On failure the session is marked unavailable for good and a failure
    /// notification is raised. Later calls return the first result.
    pub fn probe(&mut self) -> bool {
        if self.probed {
            return self.state.available;
        }
        self.probed = true;

        match self.exec("--version") {
            Ok(version) => {
                info!(tool = %self.tool, %version, "tool available");
                true
            }
            Err(e) => {
                warn!(tool = %self.tool, error = %e, "tool unavailable");
                self.state = ViewState::unavailable();
                let title = format!("{} is not available", self.tool);
                self.notify(Notification::failure(title, &e));
                false
            }
        }
    }

    /// Switch from the root menu into `mode` without loading its list.
    ///
    /// Returns whether the transition happened; callers follow up with
    /// [`Self::load_versions`]. Use [`Self::select_mode`] to do both.
    pub fn enter_mode(&mut self, mode: MenuMode) -> bool {
        if !self.state.available || self.state.mode.is_some() {
            return false;
        }
        debug!(%mode, "entering mode");
        self.state = self.state.entering(mode);
        true
    }

    // Enter a mode and load its list
    pub fn select_mode(&mut self, mode: MenuMode) -> bool {
        if !self.enter_mode(mode) {
            return false;
        }
        self.load_versions();
        true
    }

    // Return to the root menu from any mode
    pub fn back(&mut self) -> bool {
        if self.state.mode.is_none() {
            return false;
        }
        self.state = self.state.root();
        true
    }

    /// Reload the list for the current mode.
    ///
    /// On failure the previous list stays and a notification is raised.
    /// The loading flag is cleared either way.
    pub fn load_versions(&mut self) -> bool {
        let Some(mode) = self.state.mode else {
            return false;
        };
        if !self.state.available {
            return false;
        }

        self.state = self.state.busy(true);
        match self.exec(mode.list_subcommand()) {
            Ok(output) => {
                let versions = mode.parse(&output);
                debug!(%mode, count = versions.len(), "loaded versions");
                self.state = self.state.loaded(versions);
                true
            }
            Err(e) => {
                warn!(%mode, error = %e, "failed to load versions");
                self.state = self.state.busy(false);
                self.notify(Notification::failure("Failed to load versions", &e));
                false
            }
        }
    }

    /// Announce an action on `version` for the current mode.
    ///
    /// Installing raises its in-progress notification here, before the
    /// long-running call. Returns `None` at the root, in the read-only
    /// current mode, or when the tool is unavailable.
    pub fn begin_action(&mut self, version: &str) -> Option<PendingAction> {
        let mode = self.state.mode.filter(|mode| mode.has_action())?;
        if !self.state.available {
            return None;
        }

        if mode == MenuMode::Install {
            self.notify(Notification::in_progress(format!("Installing {version}...")));
        }
        self.state = self.state.busy(true);

        Some(PendingAction {
            mode,
            version: version.to_string(),
        })
    }

    /// Run an announced action, then reload the list if it succeeded.
    ///
    /// # Errors
    ///
    /// Returns the runner's error after raising a failure notification; the
    /// list is not reloaded in that case.
    pub fn complete_action(&mut self, pending: PendingAction) -> Result<()> {
        let PendingAction { mode, version } = pending;
        let subcommand = action_subcommand(mode, &version).ok_or(Error::NoAction)?;

        if let Err(e) = self.exec(&subcommand) {
            warn!(%mode, %version, error = %e, "action failed");
            self.state = self.state.busy(false);
            self.notify(Notification::failure("Action failed", &e));
            return Err(e);
        }

        info!(%mode, %version, "action completed");
        let title = match mode {
            MenuMode::Switch => format!("Switched to {version}"),
            MenuMode::Install => format!("Installed {version}"),
            MenuMode::Uninstall => format!("Uninstalled {version}"),
            MenuMode::Current => return Err(Error::NoAction),
        };
        self.notify(Notification::success(title));
        self.load_versions();
        Ok(())
    }

    /// Run the current mode's action on `version` in one step
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoAction`] if the current view has no action, or the
    /// runner's error if the action fails.
    pub fn run_action(&mut self, version: &str) -> Result<()> {
        let pending = self.begin_action(version).ok_or(Error::NoAction)?;
        self.complete_action(pending)
    }
}
