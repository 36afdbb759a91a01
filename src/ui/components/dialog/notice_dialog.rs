//! Notice dialog for submission outcomes, login failures and errors

use super::base::{render_dialog, DialogConfig};
use crate::state::{Notice, NoticeLevel};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

fn level_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

/// Render the oldest pending notice centered on the screen
pub fn render_notice_dialog(frame: &mut Frame, notice: &Notice) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::raw("Press "),
        Span::styled("Enter", key_style),
        Span::raw(" or "),
        Span::styled("Esc", key_style),
        Span::raw(" to dismiss"),
    ];

    let color = level_color(notice.level);
    render_dialog(
        frame,
        DialogConfig {
            title: notice.level.title(),
            title_color: color,
            border_color: color,
            message: &notice.message,
            hint: Some(hint),
            max_width: 60,
        },
    );
}
