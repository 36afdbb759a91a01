//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::{FieldKind, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const QUIT_HINT: &str = " ^C:quit ";
pub const APP_TITLE: &str = "Guuk Studio M&E Toolkit";
pub const APP_TAGLINE: &str = "For South Sudan Humanitarian Use";

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header with the current location
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {APP_TITLE} "),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    let location = match &app.state.current_view {
        View::Login => Some(APP_TAGLINE.to_string()),
        View::Dashboard => Some("Dashboard".to_string()),
        View::Form(_) => app
            .state
            .session
            .as_ref()
            .map(|s| format!("Dashboard › {}", s.definition().title)),
    };
    if let Some(location) = location {
        spans.push(Span::styled(
            format!(" {location}"),
            Style::default().fg(Color::Gray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    if app.state.is_authenticated() {
        let pending = app.state.pending_count;
        spans.push(if pending == 0 {
            Span::styled(" ● ", Style::default().fg(Color::Green))
        } else {
            Span::styled(format!(" ◌ {pending} pending "), Style::default().fg(Color::Yellow))
        });
    } else {
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        get_view_hints(app),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_width = QUIT_HINT.len() as u16;
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_width),
        width: quit_width.min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(QUIT_HINT).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match &app.state.current_view {
        View::Login => "Tab:next  Enter:login".to_string(),
        View::Dashboard => "j/k:nav  Enter:open  l:logout  q:quit".to_string(),
        View::Form(_) => {
            let field_hint = app
                .state
                .session
                .as_ref()
                .and_then(|s| s.current_field())
                .map(|f| kind_hint(f.kind))
                .unwrap_or("←/→:button  Enter:press");
            format!("Tab:next  {field_hint}  {SUBMIT_SHORTCUT}:submit  Esc:back")
        }
    }
}

fn kind_hint(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Date => "type to edit",
        FieldKind::Textarea => "Enter:newline",
        FieldKind::Select => "←/→:choose",
        FieldKind::Multiselect => "↑/↓:move  Space:toggle",
    }
}
