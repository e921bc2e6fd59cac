//! Replay history pane

use super::{inner_height, pane_block};
use crate::playback::HistoryEntry;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the history pane; `usize::MAX` as the offset pins it to the bottom
pub fn render_history_pane(
    frame: &mut Frame,
    area: Rect,
    history: &[HistoryEntry],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" History ", is_focused);

    if history.is_empty() {
        let paragraph = Paragraph::new("(press r to replay)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = inner_height(area);
    if history.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(history.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = history
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|entry| match entry {
            HistoryEntry::Step {
                operation_id,
                description,
            } => ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>4} ", operation_id.to_string()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(description.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
            ])),
            HistoryEntry::Error {
                operation_id,
                message,
            } => ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>4} ", operation_id.to_string()),
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("error: {}", message),
                    Style::default().fg(DEFAULT_THEME.error),
                ),
            ])),
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
