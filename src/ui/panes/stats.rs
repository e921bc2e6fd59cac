//! Stats pane

use super::pane_block;
use crate::stats::Stats;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Padding, Paragraph},
    Frame,
};

pub fn render_stats_pane(frame: &mut Frame, area: Rect, stats: &Stats) {
    let lines: Vec<Line> = stats
        .rows()
        .into_iter()
        .map(|(label, value)| {
            let value_style = if value == "null" {
                Style::default().fg(DEFAULT_THEME.comment)
            } else {
                Style::default().fg(DEFAULT_THEME.number)
            };
            Line::from(vec![
                Span::styled(format!("{:<8}", label), Style::default().fg(DEFAULT_THEME.type_name)),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let block = pane_block(" Stats ", false).padding(Padding::new(1, 0, 0, 0));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
