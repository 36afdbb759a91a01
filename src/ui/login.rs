//! Login screen

use super::components::{render_button, BUTTON_HEIGHT};
use super::forms::draw_field;
use super::layout::{APP_TAGLINE, APP_TITLE};
use crate::app::App;
use crate::state::{RenderedField, RenderedInput};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PANEL_WIDTH: u16 = 50;
const PANEL_HEIGHT: u16 = 16;

/// Draw the centered sign-in panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let panel = Rect {
        x: area.x + area.width.saturating_sub(PANEL_WIDTH) / 2,
        y: area.y + area.height.saturating_sub(PANEL_HEIGHT) / 2,
        width: PANEL_WIDTH.min(area.width),
        height: PANEL_HEIGHT.min(area.height),
    };

    let block = Block::default()
        .title(" Sign in ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Heading
            Constraint::Length(3),             // Email
            Constraint::Length(3),             // Password
            Constraint::Length(1),             // Spacer
            Constraint::Length(BUTTON_HEIGHT), // Login button
            Constraint::Min(0),
        ])
        .horizontal_margin(1)
        .split(inner);

    let heading = Paragraph::new(vec![
        Line::styled(
            APP_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            APP_TAGLINE,
            Style::default().fg(Color::DarkGray),
        ),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[0]);

    let form = &app.state.login_form;
    let email = RenderedField {
        label: "Email".to_string(),
        input: RenderedInput::Line {
            value: form.email.clone(),
        },
    };
    let password = RenderedField {
        label: "Password".to_string(),
        input: RenderedInput::Line {
            value: "•".repeat(form.password.chars().count()),
        },
    };
    draw_field(frame, chunks[1], &email, form.active_field_index == 0, 0);
    draw_field(frame, chunks[2], &password, form.active_field_index == 1, 0);

    let button_area = Rect {
        x: chunks[4].x + chunks[4].width.saturating_sub(16) / 2,
        width: 16.min(chunks[4].width),
        ..chunks[4]
    };
    render_button(frame, button_area, "Login", form.is_button_active());
}
