//! Dashboard: sector form catalog and sync status

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Draw the sector list and the status panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(area);

    draw_catalog(frame, chunks[0], app);
    draw_status_panel(frame, chunks[1], app);
}

fn draw_catalog(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .catalog()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(entry.name.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Sector Forms ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default().with_selected(Some(app.state.selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_panel(frame: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::DarkGray);
    let email = app
        .state
        .identity
        .as_ref()
        .map(|i| i.email.as_str())
        .unwrap_or("-");

    let pending = app.state.pending_count;
    let pending_style = if pending > 0 {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut lines = vec![
        Line::from(Span::styled("Signed in as", label)),
        Line::from(email.to_string()),
        Line::from(""),
        Line::from(Span::styled("Pending offline submissions", label)),
        Line::from(Span::styled(pending.to_string(), pending_style)),
    ];
    if app.state.submissions_in_flight > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Sending {}...", app.state.submissions_in_flight),
            Style::default().fg(Color::Cyan),
        )));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(panel, area);
}
