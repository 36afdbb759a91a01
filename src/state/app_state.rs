//! Application state definitions

use super::forms::{FormDefinition, FormSession, LoginForm};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Dashboard,
    /// Open form for a registered sector id
    Form(String),
}

impl View {
    pub fn is_form_view(&self) -> bool {
        matches!(self, Self::Form(_))
    }
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Sign-in input
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Severity of an advisory notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "Notice",
            Self::Warning => "Saved Offline",
            Self::Error => "Error",
        }
    }
}

/// Advisory message shown until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Main application state.
///
/// `session` is `Some` exactly while `current_view` is `View::Form`.
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Identity
    pub identity: Option<Identity>,
    pub login_form: LoginForm,

    // Form session
    pub session: Option<FormSession>,

    // Dashboard
    pub selected_index: usize,
    pub pending_count: usize,
    pub submissions_in_flight: usize,

    // Notices
    notices: VecDeque<Notice>,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Login -> Dashboard
    pub fn sign_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
        self.login_form.clear();
        self.session = None;
        self.reset_selection();
        self.current_view = View::Dashboard;
    }

    /// Any view -> Login, dropping identity and any open session
    pub fn sign_out(&mut self) {
        self.identity = None;
        self.session = None;
        self.login_form.clear();
        self.current_view = View::Login;
    }

    /// Dashboard -> Form(sector) with an empty answer set
    pub fn enter_form(&mut self, sector: &str, definition: FormDefinition) {
        self.session = Some(FormSession::new(sector, definition));
        self.current_view = View::Form(sector.to_string());
    }

    /// Form -> Dashboard, handing back the session that was open
    pub fn leave_form(&mut self) -> Option<FormSession> {
        self.current_view = View::Dashboard;
        self.session.take()
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    /// Oldest undismissed notice
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormSchemaRegistry;
    use pretty_assertions::assert_eq;

    fn identity() -> Identity {
        Identity {
            uid: "u-1".to_string(),
            email: "admin@guukstudio.com".to_string(),
        }
    }

    fn health() -> FormDefinition {
        FormSchemaRegistry::builtin().lookup("health").unwrap().clone()
    }

    #[test]
    fn test_default_view_is_login() {
        let state = AppState::default();
        assert_eq!(state.current_view, View::Login);
        assert!(!state.is_authenticated());
        assert!(state.session.is_none());
    }

    #[test]
    fn test_sign_in_goes_to_dashboard_and_clears_login_form() {
        let mut state = AppState::default();
        state.login_form.email = "admin@guukstudio.com".to_string();
        state.sign_in(identity());
        assert_eq!(state.current_view, View::Dashboard);
        assert!(state.login_form.email.is_empty());
        assert!(state.is_authenticated());
    }

    #[test]
    fn test_enter_and_leave_form() {
        let mut state = AppState::default();
        state.sign_in(identity());
        state.enter_form("health", health());
        assert_eq!(state.current_view, View::Form("health".to_string()));
        assert!(state.current_view.is_form_view());
        assert_eq!(state.session.as_ref().map(|s| s.sector()), Some("health"));

        let session = state.leave_form();
        assert!(session.is_some());
        assert!(state.session.is_none());
        assert_eq!(state.current_view, View::Dashboard);
    }

    #[test]
    fn test_sign_out_drops_open_session() {
        let mut state = AppState::default();
        state.sign_in(identity());
        state.enter_form("health", health());
        state.sign_out();
        assert_eq!(state.current_view, View::Login);
        assert!(state.session.is_none());
        assert!(state.identity.is_none());
    }

    #[test]
    fn test_selection_bounds() {
        let mut state = AppState::default();
        state.move_selection_up();
        assert_eq!(state.selected_index, 0);
        state.move_selection_down(3);
        state.move_selection_down(3);
        state.move_selection_down(3);
        assert_eq!(state.selected_index, 2);
        state.move_selection_down(0);
        assert_eq!(state.selected_index, 2);
    }

    #[test]
    fn test_notices_are_fifo() {
        let mut state = AppState::default();
        assert!(!state.has_notices());
        state.push_notice(NoticeLevel::Info, "first");
        state.push_notice(NoticeLevel::Error, "second");
        assert_eq!(state.current_notice().map(|n| n.message.as_str()), Some("first"));
        state.dismiss_notice();
        assert_eq!(state.current_notice().map(|n| n.level), Some(NoticeLevel::Error));
        state.dismiss_notice();
        assert!(!state.has_notices());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("a@b.c"));
    }
}
