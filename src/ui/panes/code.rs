//! Pseudo-code pane
//!
//! Shows the generated program with line numbers and keeps the line of the
//! operation on screen at a fixed visual row while stepping.

use super::{inner_height, pane_block};
use crate::operation::codegen::GeneratedCode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Highlighting for `var.method(args)` and `var = Class()` lines
fn highlight_code_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        if c == '"' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != '"' {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            end = (end + 1).min(chars.len());
            let stop = chars.get(end).map_or(line.len(), |&(byte, _)| byte);
            spans.push(Span::styled(
                &line[offset..stop],
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // A sign or decimal point inside a number literal is not a delimiter
        let continues_number = match c {
            '.' => is_numeric_prefix(&current_word),
            '-' => {
                current_word.is_empty()
                    && chars.get(i + 1).is_some_and(|&(_, next)| next.is_ascii_digit())
            }
            _ => false,
        };
        if !c.is_alphanumeric() && c != '_' && !continues_number {
            if !current_word.is_empty() {
                let style = word_style(&current_word, c == '(');
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }
            let style = match c {
                '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = word_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn is_numeric_prefix(word: &str) -> bool {
    !word.is_empty() && word.trim_start_matches('-').chars().all(|c| c.is_ascii_digit())
}

fn word_style(word: &str, is_call: bool) -> Style {
    if word.parse::<f64>().is_ok() {
        Style::default().fg(DEFAULT_THEME.number)
    } else if word.starts_with(|c: char| c.is_ascii_uppercase()) {
        Style::default().fg(DEFAULT_THEME.type_name)
    } else if is_call {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Scroll state for the code pane
#[derive(Debug, Default)]
pub struct CodeScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the pseudo-code pane; `current_line` is 0-based
pub fn render_code_pane(
    frame: &mut Frame,
    area: Rect,
    code: &GeneratedCode,
    current_line: Option<usize>,
    is_focused: bool,
    scroll_state: &mut CodeScrollState,
) {
    let block = pane_block(" Pseudo-code ", is_focused);
    let lines = code.lines();
    let total_lines = lines.len();
    let visible_height = inner_height(area);

    // Keep the current line at a fixed visual row, centred the first time
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(current) = current_line.filter(|&line| line < total_lines) {
        scroll_state.offset = current.saturating_sub(target_row);
        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_current = current_line == Some(idx);
            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content = highlight_code_line(line);
            if is_current {
                let background = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(background);
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", idx + 1), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_splits_calls_and_literals() {
        let line = highlight_code_line(r#"ll.insert_position("a b", -2.5)"#);
        assert_eq!(
            texts(&line),
            vec!["ll", ".", "insert_position", "(", "\"a b\"", ",", " ", "-2.5", ")"]
        );
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.function));
        assert_eq!(line.spans[7].style.fg, Some(DEFAULT_THEME.number));
    }

    #[test]
    fn test_highlight_constructor() {
        let line = highlight_code_line("tree = BinarySearchTree()");
        assert_eq!(line.spans[4].content, "BinarySearchTree");
        assert_eq!(line.spans[4].style.fg, Some(DEFAULT_THEME.type_name));
    }
}
