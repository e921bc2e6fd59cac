//! Structure canvas pane
//!
//! Draws a [`StructureLayout`] with braille circles and lines.  Layout
//! coordinates grow downward while the canvas grows upward, so every `y` is
//! negated on the way in.

use super::pane_block;
use crate::engine::{Step, StructureKind};
use crate::layout::StructureLayout;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Paragraph,
    },
    Frame,
};

fn node_color(id: &str, value: &str, step: Option<&Step>) -> Color {
    match step {
        Some(step) if step.affected_node.as_deref() == Some(id) => DEFAULT_THEME.secondary,
        Some(step) if step.path.iter().any(|visited| visited == value) => DEFAULT_THEME.success,
        _ => DEFAULT_THEME.node,
    }
}

pub fn render_structure_pane(
    frame: &mut Frame,
    area: Rect,
    kind: StructureKind,
    layout: &StructureLayout,
    node_radius: f64,
    step: Option<&Step>,
    is_focused: bool,
) {
    let title = format!(" {} ", kind);
    let block = pane_block(&title, is_focused);

    let Some(bounds) = layout.bounds(node_radius * 2.0) else {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.min.x, bounds.max.x])
        .y_bounds([-bounds.max.y, -bounds.min.y])
        .paint(|ctx| {
            for connector in &layout.connectors {
                let color = if connector.back {
                    DEFAULT_THEME.back_edge
                } else {
                    DEFAULT_THEME.edge
                };
                ctx.draw(&CanvasLine::new(
                    connector.start.x,
                    -connector.start.y,
                    connector.end.x,
                    -connector.end.y,
                    color,
                ));
            }
            for node in &layout.nodes {
                ctx.draw(&Circle {
                    x: node.center.x,
                    y: -node.center.y,
                    radius: node_radius,
                    color: node_color(&node.id, &node.value, step),
                });
            }
            ctx.layer();
            for node in &layout.nodes {
                let color = node_color(&node.id, &node.value, step);
                // Labels start at the point given, so shift left by half their width
                let half_width = node.value.chars().count() as f64 * node_radius / 4.0;
                ctx.print(
                    node.center.x - half_width,
                    -node.center.y,
                    Span::styled(
                        node.value.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);
}
