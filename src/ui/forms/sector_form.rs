//! Sector survey form with its action panel

use super::field_renderer::{draw_field, field_height};
use crate::state::{FormButton, FormSession};
use crate::ui::components::{render_action_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the open form: fields on the left, actions on the right
pub fn draw(frame: &mut Frame, area: Rect, session: &FormSession) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form area
            Constraint::Length(20), // Action panel
        ])
        .split(area);

    draw_fields(frame, main_chunks[0], session);
    draw_action_panel(frame, main_chunks[1], session);
}

fn draw_fields(frame: &mut Frame, area: Rect, session: &FormSession) {
    let form_focused = !session.is_action_row_active();
    let block = Block::default()
        .title(format!(" {} ", session.definition().title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if form_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = session.rendered_fields();
    let heights: Vec<u16> = fields.iter().map(field_height).collect();
    let first = first_visible(&heights, session.active_field_index, inner.height);

    let bottom = inner.y + inner.height;
    let mut y = inner.y;
    for (index, field) in fields.iter().enumerate().skip(first) {
        let mut height = heights[index];
        if y + height > bottom {
            if index != first {
                break;
            }
            // Clip a field taller than the whole form area
            height = bottom - y;
        }
        let field_area = Rect {
            x: inner.x + 1,
            y,
            width: inner.width.saturating_sub(2),
            height,
        };
        let is_active = index == session.active_field_index;
        draw_field(frame, field_area, field, is_active, session.option_cursor);
        y += height;
    }

    if first > 0 {
        let more = Paragraph::new(Line::from(Span::styled(
            format!("↑ {first} more"),
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(
            more,
            Rect {
                x: area.x + area.width.saturating_sub(12),
                y: area.y,
                width: 10.min(area.width),
                height: 1,
            },
        );
    }
}

/// First field to draw so the active one fits in `available` rows
fn first_visible(heights: &[u16], active: usize, available: u16) -> usize {
    let active = active.min(heights.len().saturating_sub(1));
    let mut first = 0;
    while first < active {
        let used: u16 = heights[first..=active].iter().sum();
        if used <= available {
            break;
        }
        first += 1;
    }
    first
}

fn draw_action_panel(frame: &mut Frame, area: Rect, session: &FormSession) {
    let is_focused = session.is_action_row_active();

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Min(0),
        ])
        .split(inner);

    for (chunk, button, accent) in [
        (chunks[0], FormButton::Submit, Color::Green),
        (chunks[1], FormButton::Back, Color::Gray),
    ] {
        render_action_button(
            frame,
            chunk,
            button.label(),
            is_focused && session.selected_button == button,
            Some(accent),
        );
    }

    let answered = Paragraph::new(Line::from(Span::styled(
        format!(
            " {}/{} answered",
            session.answers().len(),
            session.definition().fields.len()
        ),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(answered, chunks[2]);
}
