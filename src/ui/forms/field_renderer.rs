//! Draws a rendered field for whichever input kind it carries

use crate::state::{RenderedField, RenderedInput};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CURSOR: &str = "▌";
const MIN_BLOCK_ROWS: u16 = 3;

fn border_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn cursor_span(is_active: bool) -> Span<'static> {
    Span::styled(
        if is_active { CURSOR } else { "" },
        Style::default().fg(Color::Cyan),
    )
}

/// Rows a field needs, borders included
pub fn field_height(field: &RenderedField) -> u16 {
    let inner = match &field.input {
        RenderedInput::Line { .. } | RenderedInput::Date { .. } | RenderedInput::Choice { .. } => 1,
        RenderedInput::Block { value } => (value.lines().count() as u16 + 1).max(MIN_BLOCK_ROWS),
        RenderedInput::Checklist { options } => options.len().max(1) as u16,
    };
    inner + 2
}

/// Draw one form field. `option_cursor` only matters for an active checklist.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &RenderedField,
    is_active: bool,
    option_cursor: usize,
) {
    let title = match &field.input {
        RenderedInput::Date { .. } => format!(" {} (YYYY-MM-DD) ", field.label),
        _ => format!(" {} ", field.label),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    let content = match &field.input {
        RenderedInput::Line { value } | RenderedInput::Date { value } => {
            Paragraph::new(text_line(value, is_active))
        }
        RenderedInput::Block { value } => Paragraph::new(text_block(value, is_active)),
        RenderedInput::Choice { options, selected } if is_active => {
            Paragraph::new(choice_line(options, *selected))
        }
        RenderedInput::Choice { .. } => Paragraph::new(summary_line(field)),
        RenderedInput::Checklist { options } => {
            Paragraph::new(checklist_lines(options, is_active, option_cursor))
        }
    };

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

fn text_line(value: &str, is_active: bool) -> Line<'static> {
    if value.is_empty() && !is_active {
        return Line::from(Span::styled("(empty)", Style::default().fg(Color::DarkGray)));
    }
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(value.to_string(), style),
        cursor_span(is_active),
    ])
}

fn text_block(value: &str, is_active: bool) -> Vec<Line<'static>> {
    if value.is_empty() {
        return vec![text_line(value, is_active)];
    }
    let mut lines: Vec<Line> = value.split('\n').map(|l| Line::from(l.to_string())).collect();
    if let Some(last) = lines.last_mut() {
        last.spans.push(cursor_span(is_active));
    }
    lines
}

fn summary_line(field: &RenderedField) -> Line<'static> {
    match field.summary() {
        Some(value) => Line::from(value),
        None => Line::from(Span::styled("(not set)", Style::default().fg(Color::DarkGray))),
    }
}

fn choice_line(options: &[String], selected: Option<usize>) -> Line<'static> {
    let value = match selected.and_then(|i| options.get(i)) {
        Some(option) => Span::styled(
            option.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("(not set)", Style::default().fg(Color::DarkGray)),
    };

    let arrow = Style::default().fg(Color::Cyan);
    Line::from(vec![
        Span::styled("◀ ", arrow),
        value,
        Span::styled(" ▶", arrow),
        Span::styled(
            format!("  {} options", options.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn checklist_lines(options: &[(String, bool)], is_active: bool, cursor: usize) -> Vec<Line<'static>> {
    options
        .iter()
        .enumerate()
        .map(|(i, (option, checked))| {
            let mark = if *checked { "[x] " } else { "[ ] " };
            let style = if is_active && i == cursor {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if *checked {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!("{mark}{option}"), style))
        })
        .collect()
}
