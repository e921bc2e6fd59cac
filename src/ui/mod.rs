//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane (structure,
//!   pseudo-code, step, history, stats, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! No simulation happens here: every frame reads the
//! [`PlaybackController`] and draws what it reports.

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;

use crate::playback::{PlaybackController, SystemClock};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Take over the terminal and run the player until the user quits
pub fn run(controller: PlaybackController<SystemClock>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let res = app.run(&mut terminal);

    // Restore the terminal even if the app failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
