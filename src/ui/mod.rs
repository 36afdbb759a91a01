//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;
mod login;

use crate::app::App;
use crate::state::View;
use components::render_notice_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    match (&app.state.current_view, &app.state.session) {
        (View::Login, _) => login::draw(frame, main_area, app),
        (View::Dashboard, _) => dashboard::draw(frame, main_area, app),
        (View::Form(_), Some(session)) => forms::draw_sector_form(frame, main_area, session),
        // No session means the form was just left; the next tick shows the dashboard
        (View::Form(_), None) => dashboard::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    if let Some(notice) = app.state.current_notice() {
        render_notice_dialog(frame, notice);
    }
}
