use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod logging;
mod tui;

use cli::{execute_command, Cli};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = cli.load_config().context("failed to load configuration")?;
    logging::init(cli.verbose, &config);

    // Execute the appropriate command
    execute_command(&cli, &config).with_context(|| "command execution failed")
}
