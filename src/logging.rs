use std::fs;

use pyenv_menu::Config;
use tracing_subscriber::EnvFilter;

// Env var holding a full tracing filter, e.g. `pyenv_menu=debug`
const LOG_ENV: &str = "PYENV_MENU_LOG";

// Log to a file since the terminal UI owns stdout.
// Logging stays off unless -v is given or PYENV_MENU_LOG is set.
pub fn init(verbose: u8, config: &Config) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if verbose > 0 => {
            let level = match verbose {
                1 => "warn",
                2 => "info",
                _ => "debug",
            };
            EnvFilter::new(format!("pyenv_menu={level}"))
        }
        Err(_) => return,
    };

    let path = config.log_path();
    let (Some(dir), Some(file)) = (path.parent(), path.file_name()) else {
        eprintln!("warning: invalid log file path {}", path.display());
        return;
    };
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("warning: failed to create log directory {}: {e}", dir.display());
        return;
    }

    let file_appender = tracing_appender::rolling::never(dir, file);
    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
}
