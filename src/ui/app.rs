//! Main TUI application state and logic

use super::panes::{self, CodeScrollState, StatusRenderData};
use crate::layout;
use crate::operation::codegen::{self, GeneratedCode};
use crate::playback::{Clock, PlaybackController, PlaybackState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Structure,
    Code,
    History,
}

impl FocusedPane {
    /// Move focus to the next pane (structure -> history -> code)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Structure => FocusedPane::History,
            FocusedPane::History => FocusedPane::Code,
            FocusedPane::Code => FocusedPane::Structure,
        }
    }
}

/// The main application state
pub struct App<C: Clock> {
    pub controller: PlaybackController<C>,

    /// Pseudo-code for the controller's log
    pub code: GeneratedCode,

    pub focused_pane: FocusedPane,
    pub code_scroll: CodeScrollState,
    pub history_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Option<Instant>,
}

impl<C: Clock> App<C> {
    pub fn new(controller: PlaybackController<C>) -> Self {
        let code = codegen::generate(controller.kind(), controller.log().operations());
        App {
            controller,
            code,
            focused_pane: FocusedPane::Structure,
            code_scroll: CodeScrollState::default(),
            history_scroll: usize::MAX,
            should_quit: false,
            status_message: String::from("Ready! Press r to replay"),
            last_space_press: None,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            let was_running = self.controller.is_running();
            if self.controller.tick() {
                self.history_scroll = usize::MAX;
                if was_running && !self.controller.is_running() {
                    self.status_message = "Replay stopped".to_string();
                } else if !self.controller.is_auto_playing() && !self.controller.is_running() {
                    self.status_message = "Playback complete".to_string();
                }
            }

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Poll with a short timeout so replay and auto-play keep ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: structure | step | history
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(60),
                Constraint::Length(4),
                Constraint::Min(3),
            ])
            .split(columns[0]);

        // Right column: code | stats
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(8)])
            .split(columns[1]);

        let config = self.controller.config();
        let snapshot = self.controller.snapshot();
        let structure_layout = layout::layout(snapshot, &config.layout);
        let step = self.controller.current_step();

        panes::render_structure_pane(
            frame,
            left_rows[0],
            self.controller.kind(),
            &structure_layout,
            config.layout.node_radius,
            step,
            self.focused_pane == FocusedPane::Structure,
        );

        panes::render_step_pane(frame, left_rows[1], step);

        panes::render_history_pane(
            frame,
            left_rows[2],
            self.controller.history(),
            self.focused_pane == FocusedPane::History,
            &mut self.history_scroll,
        );

        let current_line = self
            .controller
            .current_operation()
            .and_then(|index| self.code.line_for(index));
        panes::render_code_pane(
            frame,
            right_rows[0],
            &self.code,
            current_line,
            self.focused_pane == FocusedPane::Code,
            &mut self.code_scroll,
        );

        panes::render_stats_pane(frame, right_rows[1], self.controller.stats());

        let (position, total) = self.controller.progress();
        let unit = match self.controller.state() {
            PlaybackState::SeekedAt { .. } => "Op",
            _ => "Step",
        };
        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                position,
                total,
                unit,
                is_replaying: self.controller.is_running(),
                is_auto_playing: self.controller.is_auto_playing(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        debug!(?key.code, "key");
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.seek_with(|c| c.step_backward(), "Stepped backward");
            }
            KeyCode::Right => {
                self.seek_with(|c| c.step_forward(), "Stepped forward");
            }
            KeyCode::Enter => {
                self.seek_with(|c| c.seek_end(), "Jumped to end");
            }
            KeyCode::Backspace => {
                self.seek_with(|c| c.seek_start(), "Jumped to start");
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.status_message = if self.controller.execute_all() {
                    self.history_scroll = usize::MAX;
                    "Replaying...".to_string()
                } else {
                    "Replay already running".to_string()
                };
            }
            KeyCode::Char(' ') => {
                // Debounce key repeat
                let debounced = self
                    .last_space_press
                    .map_or(true, |at| at.elapsed() >= Duration::from_millis(200));
                if debounced {
                    self.last_space_press = Some(Instant::now());
                    self.status_message = if self.controller.toggle_auto_play() {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Code => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.code_scroll.target_line_row {
                        self.code_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::History => {
                    self.history_scroll = self.history_scroll.saturating_sub(1);
                }
                FocusedPane::Structure => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Code => {
                    if let Some(row) = self.code_scroll.target_line_row {
                        self.code_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::History => {
                    self.history_scroll = self.history_scroll.saturating_add(1);
                }
                FocusedPane::Structure => {}
            },
            _ => {}
        }
    }

    fn seek_with(&mut self, seek: impl FnOnce(&mut PlaybackController<C>) -> bool, message: &str) {
        self.status_message = if seek(&mut self.controller) {
            message.to_string()
        } else {
            "Nothing to show: the log is empty".to_string()
        };
    }
}
