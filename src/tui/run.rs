//! Terminal setup and teardown around the application loop.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::warn;

use crate::config::Config;
use crate::db::ProjectStore;
use crate::history::PathHistory;
use crate::launcher::SystemLauncher;
use crate::tui::{app::App, keys::TerminalKeys, screen::Screen};

/// Load the store, take over the terminal and run until the user exits.
pub fn run_tui(config: &Config) -> io::Result<()> {
    let store = ProjectStore::load(&config.projects_file(), PathHistory::new(config.history_file()));
    let current_dir = match std::env::current_dir() {
        Ok(dir) => dir.to_string_lossy().into_owned(),
        Err(e) => {
            warn!(error = %e, "cannot resolve current directory, using the data directory");
            config.data_dir.to_string_lossy().into_owned()
        }
    };
    let mut app = App::new(store, SystemLauncher::new(&config.editor), &current_dir);

    enable_raw_mode()?;
    let terminal = or_restore(open_terminal(), abandon_terminal)?;
    let mut screen = Screen::new(terminal, TerminalKeys);

    let result = app.run(&mut screen);

    disable_raw_mode()?;
    execute!(screen.terminal_mut().backend_mut(), LeaveAlternateScreen)?;
    screen.terminal_mut().show_cursor()?;

    result
}

fn open_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Best-effort teardown when the terminal could not be set up; the setup error wins.
fn abandon_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "failed to leave raw mode");
    }
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run `restore` if `result` failed, then pass `result` through.
fn or_restore<T>(result: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let result: io::Result<()> = or_restore(Err(io::Error::other("no tty")), || restored.set(true));

        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_successful_setup_leaves_terminal_alone() {
        let restored = Cell::new(false);
        let value = or_restore(Ok(7), || restored.set(true)).unwrap();

        assert_eq!(value, 7);
        assert!(!restored.get());
    }
}
