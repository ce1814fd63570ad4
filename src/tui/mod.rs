//! Terminal user interface

mod app;
mod render;

use anyhow::Result;
use pyenv_menu::{CommandRunner, VersionManager};
use ratatui::crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use app::App;

/// Run the TUI application
pub fn run<R: CommandRunner>(manager: VersionManager<R>, help_url: String) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut app = App::new(manager, help_url);
    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<R: CommandRunner>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<R>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if let Some(deferred) = app.handle_key(key) {
                    // Show the loading state before blocking on the tool
                    terminal.draw(|frame| render::render(frame, app))?;
                    app.run_deferred(deferred);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
