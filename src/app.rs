//! Application state and core logic

use crate::backend::IdentityService;
use crate::error::SchemaError;
use crate::gateway::{
    PendingQueue, QueueReason, Submission, SubmissionChannel, SubmissionGateway,
    SubmissionOutcome, SubmissionReport,
};
use crate::state::{
    AppState, CatalogEntry, FieldKind, Form, FormButton, FormSchemaRegistry, Identity,
    NoticeLevel, View,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::watch;

const MSG_DELIVERED: &str = "Submitted successfully!";
const MSG_QUEUED_OFFLINE: &str = "Saved locally. Will sync when online.";
const MSG_QUEUED_FAILED: &str = "Error submitting form. Saving locally...";

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    registry: Arc<FormSchemaRegistry>,
    identity: Arc<dyn IdentityService>,
    identity_events: watch::Receiver<Option<Identity>>,
    submissions: SubmissionChannel,
    queue: PendingQueue,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create the app and start the submission worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        registry: Arc<FormSchemaRegistry>,
        identity: Arc<dyn IdentityService>,
        gateway: Arc<SubmissionGateway>,
    ) -> Self {
        let mut state = AppState::default();
        let mut identity_events = identity.subscribe();
        identity_events.mark_unchanged();

        if let Some(current) = identity.current_identity() {
            tracing::info!("Resuming session for {}", current.email);
            state.sign_in(current);
        }

        let queue = gateway.queue().clone();
        let mut app = Self {
            state,
            registry,
            identity,
            identity_events,
            submissions: SubmissionChannel::spawn(gateway),
            queue,
            quit: false,
        };
        app.refresh_pending_count();
        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Sectors shown on the dashboard, in display order
    pub fn catalog(&self) -> &[CatalogEntry] {
        self.registry.catalog()
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Notice dialog is modal
        if self.state.has_notices() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_notice();
            }
            return Ok(());
        }

        self.state.status_message = None;

        match self.state.current_view {
            View::Login => self.handle_login_key(key).await?,
            View::Dashboard => self.handle_dashboard_key(key).await?,
            View::Form(_) => self.handle_form_key(key),
        }
        Ok(())
    }

    async fn handle_login_key(&mut self, key: KeyEvent) -> Result<()> {
        let on_email = self.state.login_form.active_field() == 0;
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.login_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.login_form.prev_field(),
            KeyCode::Enter if on_email => self.state.login_form.next_field(),
            KeyCode::Enter => self.login().await,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.login_form.input_char(c)
            }
            KeyCode::Backspace => self.state.login_form.backspace(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        let count = self.catalog().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(count),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => {
                let Some(entry) = self.catalog().get(self.state.selected_index) else {
                    return Ok(());
                };
                let sector = entry.id.clone();
                if let Err(e) = self.select_sector(&sector) {
                    self.state.push_notice(NoticeLevel::Error, e.to_string());
                }
            }
            KeyCode::Char('l') => self.logout().await,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if crate::platform::is_submit_shortcut(&key) {
            self.submit();
            return;
        }
        if key.code == KeyCode::Esc {
            self.back();
            return;
        }

        let Some(session) = self.state.session.as_mut() else {
            return;
        };

        if session.is_action_row_active() {
            match key.code {
                KeyCode::Tab => session.next_field(),
                KeyCode::BackTab => session.prev_field(),
                KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                    session.selected_button = session.selected_button.toggle();
                }
                KeyCode::Enter => {
                    let button = session.selected_button;
                    match button {
                        FormButton::Submit => self.submit(),
                        FormButton::Back => self.back(),
                    }
                }
                _ => {}
            }
            return;
        }

        let on_multiselect = session
            .current_field()
            .is_some_and(|f| f.kind == FieldKind::Multiselect);

        match key.code {
            KeyCode::Tab => session.next_field(),
            KeyCode::BackTab => session.prev_field(),
            KeyCode::Left => session.cycle_select(false),
            KeyCode::Right => session.cycle_select(true),
            KeyCode::Up if on_multiselect => session.move_option_cursor(false),
            KeyCode::Down if on_multiselect => session.move_option_cursor(true),
            KeyCode::Up => session.prev_field(),
            KeyCode::Down => session.next_field(),
            KeyCode::Char(' ') if on_multiselect => session.toggle_current_option(),
            KeyCode::Enter if session.is_active_field_multiline() => session.input_char('\n'),
            KeyCode::Enter => session.next_field(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                session.input_char(c)
            }
            KeyCode::Backspace => session.backspace(),
            _ => {}
        }
    }

    /// Login -> Dashboard on success, advisory notice on failure
    pub async fn login(&mut self) {
        let credentials = self.state.login_form.credentials();
        match self.identity.sign_in(&credentials).await {
            Ok(identity) => {
                self.identity_events.mark_unchanged();
                tracing::info!("Login succeeded for {}", identity.email);
                self.state.status_message = Some(format!("Signed in as {}", identity.email));
                self.state.sign_in(identity);
                self.refresh_pending_count();
            }
            Err(e) => {
                tracing::info!("Login failed for {}: {e}", credentials.email);
                self.state.login_form.reset_password();
                self.state
                    .push_notice(NoticeLevel::Error, format!("Login failed: {e}"));
            }
        }
    }

    /// Dashboard -> Login, ending the session
    pub async fn logout(&mut self) {
        if let Err(e) = self.identity.sign_out().await {
            tracing::warn!("Sign-out did not complete cleanly: {e}");
            self.state
                .push_notice(NoticeLevel::Warning, format!("Sign-out incomplete: {e}"));
        }
        self.identity_events.mark_unchanged();
        tracing::info!("Logged out");
        self.state.sign_out();
    }

    /// Dashboard -> Form(sector) with a fresh answer set
    pub fn select_sector(&mut self, sector: &str) -> Result<(), SchemaError> {
        let definition = self.registry.lookup(sector).map_err(|e| {
            tracing::error!("Refusing to open form: {e}");
            e
        })?;
        tracing::info!("Opening {sector} form");
        self.state.enter_form(sector, definition.clone());
        Ok(())
    }

    /// Form -> Dashboard, discarding the answers
    pub fn back(&mut self) {
        if let Some(session) = self.state.leave_form() {
            tracing::info!("Discarded {} form", session.sector());
        }
    }

    /// Form -> Dashboard, handing a snapshot of the answers to the worker
    pub fn submit(&mut self) {
        let Some(session) = self.state.leave_form() else {
            return;
        };
        let sector = session.sector().to_string();
        let submission = Submission::new(&sector, session.into_answers(), self.state.identity.as_ref());
        tracing::info!("Submitting {sector} form as {}", submission.id());

        match self.submissions.send(submission) {
            Ok(()) => {
                self.state.submissions_in_flight += 1;
                self.state.status_message = Some("Submitting...".to_string());
            }
            Err(submission) => {
                tracing::error!(
                    "Submission worker stopped, queuing {} directly",
                    submission.id()
                );
                match self.queue.append(&submission) {
                    Ok(()) => self
                        .state
                        .push_notice(NoticeLevel::Warning, MSG_QUEUED_FAILED),
                    Err(e) => self.state.push_notice(
                        NoticeLevel::Error,
                        format!("Could not save {sector} submission: {e}"),
                    ),
                }
                self.refresh_pending_count();
            }
        }
    }

    /// Let submissions already handed to the worker finish before exit
    pub async fn shutdown(&mut self) {
        if self.state.submissions_in_flight > 0 {
            tracing::info!(
                "Waiting for {} submissions before exit",
                self.state.submissions_in_flight
            );
        }
        self.submissions.shutdown().await;
        self.poll_background();
    }

    /// Drain worker reports and identity changes; called once per tick
    pub fn poll_background(&mut self) {
        let mut finished = false;
        while let Some(report) = self.submissions.try_next_report() {
            self.apply_report(report);
            finished = true;
        }
        if finished {
            self.refresh_pending_count();
        }

        if self.identity_events.has_changed().unwrap_or(false) {
            let current = self.identity_events.borrow_and_update().clone();
            match current {
                None if self.state.is_authenticated() => {
                    if self.state.current_view.is_form_view() {
                        tracing::info!("Session ended with a form open, discarding answers");
                    }
                    tracing::info!("Session ended elsewhere, returning to login");
                    self.state.sign_out();
                }
                Some(identity) if !self.state.is_authenticated() => {
                    self.state.sign_in(identity);
                    self.refresh_pending_count();
                }
                _ => {}
            }
        }
    }

    fn apply_report(&mut self, report: SubmissionReport) {
        self.state.submissions_in_flight = self.state.submissions_in_flight.saturating_sub(1);
        match report.result {
            Ok(SubmissionOutcome::Delivered) => {
                self.state.push_notice(NoticeLevel::Info, MSG_DELIVERED)
            }
            Ok(SubmissionOutcome::Queued(QueueReason::Offline)) => self
                .state
                .push_notice(NoticeLevel::Warning, MSG_QUEUED_OFFLINE),
            Ok(SubmissionOutcome::Queued(QueueReason::DeliveryFailed(_))) => self
                .state
                .push_notice(NoticeLevel::Warning, MSG_QUEUED_FAILED),
            Err(e) => {
                tracing::error!(
                    "Submission {} for {} was lost: {e}",
                    report.submission_id,
                    report.sector
                );
                self.state.push_notice(
                    NoticeLevel::Error,
                    format!("Could not save {} submission: {e}", report.sector),
                );
            }
        }
    }

    fn refresh_pending_count(&mut self) {
        match self.queue.len() {
            Ok(count) => self.state.pending_count = count,
            Err(e) => tracing::warn!("Could not read pending queue: {e}"),
        }
    }
}
