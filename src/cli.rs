use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::tui;
use pyenv_menu::{
    CommandRunner, Config, MenuMode, Notification, NotificationStyle, ShellRunner, Version,
    VersionManager,
};

// CLI arguments parsing structure
#[derive(Parser)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Config file (defaults to ~/.config/pyenv-menu/config.toml)
    #[arg(short = 'c', long, env = "PYENV_MENU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Version-manager executable to drive
    #[arg(long, env = "PYENV_MENU_TOOL")]
    pub tool: Option<String>,

    /// Shell used to run the tool
    #[arg(long, env = "PYENV_MENU_SHELL")]
    pub shell: Option<PathBuf>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the active Python version
    Current,
    /// List installed versions
    List,
    /// List versions available to install
    Available,
    /// Set the global Python version
    Switch {
        /// Installed version to activate
        version: String,
    },
    /// Install a Python version
    Install {
        /// Version to install, as listed by `available`
        version: String,
    },
    /// Uninstall a Python version
    Uninstall {
        /// Installed version to remove
        version: String,
    },
}

// Structure for action output in JSON mode
#[derive(Serialize)]
struct ActionReport<'a> {
    notifications: &'a [Notification],
    versions: &'a [Version],
}

impl Cli {
    /// Config file values with command line overrides applied
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(tool) = &self.tool {
            config.tool.clone_from(tool);
        }
        if let Some(shell) = &self.shell {
            config.shell.clone_from(shell);
        }
        Ok(config)
    }
}

// Execute the selected command
pub fn execute_command(cli: &Cli, config: &Config) -> Result<()> {
    let runner = ShellRunner::new(config);
    let mut manager = VersionManager::new(runner, config.tool.as_str());

    check_tool(&mut manager, cli.command.as_ref(), &config.help_url)?;

    match &cli.command {
        None => tui::run(manager, config.help_url.clone()),
        Some(Commands::Current) => cmd_list(&mut manager, MenuMode::Current, cli.json),
        Some(Commands::List) => cmd_list(&mut manager, MenuMode::Switch, cli.json),
        Some(Commands::Available) => cmd_list(&mut manager, MenuMode::Install, cli.json),
        Some(Commands::Switch { version }) => {
            cmd_action(&mut manager, MenuMode::Switch, version, cli.json)
        }
        Some(Commands::Install { version }) => {
            cmd_action(&mut manager, MenuMode::Install, version, cli.json)
        }
        Some(Commands::Uninstall { version }) => {
            cmd_action(&mut manager, MenuMode::Uninstall, version, cli.json)
        }
    }
}

/// Check the tool responds before any command runs.
///
/// Scriptable subcommands fail outright when the tool is missing. The
/// interactive UI still starts, showing its error row with the help link.
pub(crate) fn check_tool<R: CommandRunner>(
    manager: &mut VersionManager<R>,
    command: Option<&Commands>,
    help_url: &str,
) -> Result<()> {
    if manager.probe() || command.is_none() {
        return Ok(());
    }

    print_notifications(&manager.take_notifications());
    eprintln!("see {help_url} for installation instructions");
    bail!("{} is not available", manager.tool());
}

// Enter a mode and load its list, failing if the load did
fn load_mode<R: CommandRunner>(manager: &mut VersionManager<R>, mode: MenuMode) -> Result<()> {
    if !manager.enter_mode(mode) {
        bail!("cannot enter {mode} mode");
    }
    let loaded = manager.load_versions();
    print_notifications(&manager.take_notifications());
    if !loaded {
        bail!("failed to load versions for {mode}");
    }
    Ok(())
}

fn cmd_list<R: CommandRunner>(
    manager: &mut VersionManager<R>,
    mode: MenuMode,
    json_output: bool,
) -> Result<()> {
    load_mode(manager, mode)?;
    let versions = manager.versions();

    if json_output {
        let json = serde_json::to_string_pretty(versions)
            .context("failed to serialize versions to JSON")?;
        println!("{json}");
        return Ok(());
    }

    if versions.is_empty() {
        println!("no versions found");
        return Ok(());
    }

    if mode == MenuMode::Current {
        for version in versions {
            println!("{}", version.name);
        }
        return Ok(());
    }

    for version in versions {
        print_version(version);
    }

    Ok(())
}

// Helper function to print a version with its active marker
fn print_version(version: &Version) {
    let marker = if version.is_current { "*" } else { " " };
    println!("  {marker} {}", version.name);
}

fn cmd_action<R: CommandRunner>(
    manager: &mut VersionManager<R>,
    mode: MenuMode,
    version: &str,
    json_output: bool,
) -> Result<()> {
    load_mode(manager, mode)?;
    cmd_verify_version(manager, mode, version)?;

    let mut notifications = Vec::new();
    let Some(pending) = manager.begin_action(version) else {
        bail!("no {mode} action available");
    };

    // Show the in-progress notice before a long install
    let announced = manager.take_notifications();
    if !json_output {
        print_notifications(&announced);
    }
    notifications.extend(announced);

    let result = manager.complete_action(pending);
    let finished = manager.take_notifications();

    if json_output {
        notifications.extend(finished);
        let report = ActionReport {
            notifications: &notifications,
            versions: manager.versions(),
        };
        let json = serde_json::to_string_pretty(&report)
            .context("failed to serialize action report to JSON")?;
        println!("{json}");
    } else {
        print_notifications(&finished);
    }

    result.with_context(|| format!("failed to {mode} {version}"))
}

// Check the version appears in the list the action applies to
fn cmd_verify_version<R: CommandRunner>(
    manager: &VersionManager<R>,
    mode: MenuMode,
    version: &str,
) -> Result<()> {
    if manager.versions().iter().any(|v| v.name == version) {
        return Ok(());
    }

    eprintln!("error: version {version} not found");
    let hint = match mode {
        MenuMode::Install => "available",
        _ => "list",
    };
    eprintln!("run `pyenv-menu {hint}` to see valid versions");
    bail!("unknown version: {version}");
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        match (notification.style, &notification.message) {
            (NotificationStyle::Failure, Some(message)) => {
                eprintln!("error: {}: {message}", notification.title);
            }
            (NotificationStyle::Failure, None) => eprintln!("error: {}", notification.title),
            _ => println!("{}", notification.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyenv_menu::{Error, Result};
    use std::cell::RefCell;

    // Runner answering only `--version`, recording every call
    struct VersionQueryOnly {
        available: bool,
        calls: RefCell<Vec<String>>,
    }

    impl VersionQueryOnly {
        fn new(available: bool) -> Self {
            Self {
                available,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for VersionQueryOnly {
        fn run(&self, subcommand: &str) -> Result<String> {
            self.calls.borrow_mut().push(subcommand.to_string());
            if self.available {
                Ok("pyenv 2.4.0".to_string())
            } else {
                Err(Error::Execution {
                    command: format!("pyenv {subcommand}"),
                    message: "pyenv: command not found".to_string(),
                })
            }
        }
    }

    #[test]
    fn test_missing_tool_fails_scripted_commands() {
        let runner = VersionQueryOnly::new(false);
        let mut manager = VersionManager::new(&runner, "pyenv");

        let result = check_tool(&mut manager, Some(&Commands::List), "https://example.com");
        assert!(result.is_err_and(|e| e.to_string() == "pyenv is not available"));
        assert_eq!(*runner.calls.borrow(), ["--version"]);
    }

    #[test]
    fn test_missing_tool_keeps_interactive_mode() {
        let runner = VersionQueryOnly::new(false);
        let mut manager = VersionManager::new(&runner, "pyenv");

        assert!(check_tool(&mut manager, None, "https://example.com").is_ok());
        assert!(!manager.is_available());
        // The failure stays queued for the UI's status line
        assert_eq!(manager.take_notifications().len(), 1);
    }

    #[test]
    fn test_available_tool_passes() {
        let runner = VersionQueryOnly::new(true);
        let mut manager = VersionManager::new(&runner, "pyenv");

        let command = Commands::Switch {
            version: "3.12.0".to_string(),
        };
        assert!(check_tool(&mut manager, Some(&command), "https://example.com").is_ok());
        assert!(check_tool(&mut manager, None, "https://example.com").is_ok());
        assert_eq!(runner.calls.borrow().len(), 1);
    }
}

