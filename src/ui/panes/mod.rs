//! TUI pane rendering modules
//!
//! Every pane is a stateless `render_*` function over data borrowed from the
//! [`PlaybackController`](crate::playback::PlaybackController).  Scroll
//! offsets are the only state and live in [`App`](crate::ui::App).
//!
//! # Pane Modules
//!
//! - [`structure`]: canvas drawing of the laid-out snapshot
//! - [`code`]: generated pseudo-code with the current operation highlighted
//! - [`step`]: description and code line of the step on screen
//! - [`history`]: replay history including error entries
//! - [`stats`]: derived stats of the snapshot on screen
//! - [`status`]: status bar with keybindings and playback state

pub mod code;
pub mod history;
pub mod stats;
pub mod status;
pub mod step;
pub mod structure;

pub use code::{render_code_pane, CodeScrollState};
pub use history::render_history_pane;
pub use stats::render_stats_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use step::render_step_pane;
pub use structure::render_structure_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders};

/// Bordered, titled block styled by focus
fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least 1
fn inner_height(area: ratatui::layout::Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}
