//! Current step pane

use super::pane_block;
use crate::engine::{Step, StepKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph, Wrap},
    Frame,
};

fn kind_badge(kind: StepKind) -> (&'static str, Color) {
    match kind {
        StepKind::Compare => ("COMPARE", DEFAULT_THEME.primary),
        StepKind::Mutate => ("MUTATE", DEFAULT_THEME.secondary),
        StepKind::Visit => ("VISIT", DEFAULT_THEME.success),
        StepKind::Info => ("INFO", DEFAULT_THEME.type_name),
        StepKind::NotFound => ("NOT FOUND", DEFAULT_THEME.error),
    }
}

pub fn render_step_pane(frame: &mut Frame, area: Rect, step: Option<&Step>) {
    let block = pane_block(" Step ", false).padding(Padding::new(1, 1, 0, 0));

    let Some(step) = step else {
        let paragraph = Paragraph::new("(no step)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let (label, color) = kind_badge(step.kind);
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", label),
                Style::default()
                    .bg(color)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}ms ", step.duration_ms),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled(step.description.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
        ]),
        Line::from(Span::styled(
            step.code_line.as_str(),
            Style::default().fg(DEFAULT_THEME.function),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
