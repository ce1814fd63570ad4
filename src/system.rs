use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

// Executes subcommands of the external tool and returns trimmed stdout
pub trait CommandRunner {
    /// Run `<tool> <subcommand>`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Execution`] if the process cannot be spawned or exits non-zero.
    fn run(&self, subcommand: &str) -> Result<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, subcommand: &str) -> Result<String> {
        (**self).run(subcommand)
    }
}

/// Shell environment the tool runs in, prepared once per session.
///
/// The init preamble is still sourced before every invocation so each call
/// sees the tool's shims and hooks exactly as an interactive shell would.
#[derive(Debug, Clone)]
pub struct ShellEnvironment {
    pub shell: PathBuf,
    pub home: Option<PathBuf>,
    pub tool: String,
    pub preamble: String,
}

impl ShellEnvironment {
    #[must_use]
    pub fn prepare(config: &Config) -> Self {
        let tool = shell_words::quote(&config.tool).into_owned();

        let mut lines: Vec<String> = config.init_hooks.clone();
        lines.push(format!("eval \"$({tool} init -)\""));

        Self {
            shell: config.shell.clone(),
            home: dirs::home_dir(),
            tool,
            preamble: lines.join("\n"),
        }
    }

    // Full script for one invocation
    #[must_use]
    pub fn script(&self, subcommand: &str) -> String {
        format!("{}\n{} {subcommand}", self.preamble, self.tool)
    }
}

// Runs the tool through a shell after its init hook
#[derive(Debug, Clone)]
pub struct ShellRunner {
    env: ShellEnvironment,
}

impl ShellRunner {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            env: ShellEnvironment::prepare(config),
        }
    }

    #[must_use]
    pub fn environment(&self) -> &ShellEnvironment {
        &self.env
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, subcommand: &str) -> Result<String> {
        let command_line = format!("{} {subcommand}", self.env.tool);
        debug!(command = %command_line, shell = %self.env.shell.display(), "running");

        let mut command = Command::new(&self.env.shell);
        command
            .arg("-c")
            .arg(self.env.script(subcommand))
            .stdin(Stdio::null());
        if let Some(home) = &self.env.home {
            command.env("HOME", home);
        }

        let output = command.output().map_err(|e| {
            warn!(command = %command_line, error = %e, "failed to spawn shell");
            Error::execution(&command_line, e.to_string())
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                text => text.to_string(),
            };
            warn!(command = %command_line, status = %output.status, "command failed");
            return Err(Error::execution(&command_line, message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Open a URL with the platform's opener
///
/// # Errors
///
/// Returns [`Error::Execution`] if the opener cannot be spawned or reports failure.
pub fn open_url(url: &str) -> Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    let status = Command::new(opener)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| Error::execution(opener, e.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::execution(opener, format!("exited with {status}")))
    }
}
