//! Form session and login form state

use super::answers::AnswerSet;
use super::field::{render, FieldDescriptor, FieldEdit, FieldKind, RenderedField};
use super::registry::FormDefinition;
use crate::error::SchemaError;
use crate::state::Credentials;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Buttons on the action row of a sector form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormButton {
    #[default]
    Submit,
    Back,
}

impl FormButton {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Submit => Self::Back,
            Self::Back => Self::Submit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Back => "Back",
        }
    }
}

/// In-progress answers for one sector form.
///
/// Created on form entry and consumed on submit, so the answer set never
/// outlives the session.
#[derive(Debug, Clone)]
pub struct FormSession {
    sector: String,
    definition: FormDefinition,
    answers: AnswerSet,
    /// Index into the fields; `fields.len()` is the action row
    pub active_field_index: usize,
    /// Highlighted option within a multiselect field
    pub option_cursor: usize,
    pub selected_button: FormButton,
}

impl FormSession {
    pub fn new(sector: &str, definition: FormDefinition) -> Self {
        Self {
            sector: sector.to_string(),
            definition,
            answers: AnswerSet::new(),
            active_field_index: 0,
            option_cursor: 0,
            selected_button: FormButton::default(),
        }
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Hand over the answers, ending the session
    pub fn into_answers(self) -> AnswerSet {
        self.answers
    }

    pub fn is_action_row_active(&self) -> bool {
        self.active_field_index == self.definition.fields.len()
    }

    pub fn current_field(&self) -> Option<&FieldDescriptor> {
        self.definition.fields.get(self.active_field_index)
    }

    /// Whether Enter should insert a newline rather than move on
    pub fn is_active_field_multiline(&self) -> bool {
        self.current_field()
            .is_some_and(|f| f.kind == FieldKind::Textarea)
    }

    /// Apply an edit to a named field
    pub fn edit(&mut self, name: &str, edit: FieldEdit) -> Result<bool, SchemaError> {
        let field = self
            .definition
            .field(name)
            .ok_or_else(|| SchemaError::UnknownField {
                sector: self.sector.clone(),
                field: name.to_string(),
            })?;
        Ok(self.answers.apply(field, edit))
    }

    /// Apply an edit to the active field (no-op on the action row)
    fn edit_current(&mut self, edit: FieldEdit) {
        let Some(name) = self.current_field().map(|f| f.name.clone()) else {
            return;
        };
        if let Err(e) = self.edit(&name, edit) {
            tracing::error!("{e}");
        }
    }

    /// Type a character into the active text-like field
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.current_field() else {
            return;
        };
        if !field.kind.is_text_like() {
            return;
        }
        let mut value = self.answers.text(&field.name).to_string();
        value.push(c);
        self.edit_current(FieldEdit::Input(value));
    }

    /// Remove the last character of the active text-like field
    pub fn backspace(&mut self) {
        let Some(field) = self.current_field() else {
            return;
        };
        if !field.kind.is_text_like() {
            return;
        }
        let mut value = self.answers.text(&field.name).to_string();
        value.pop();
        self.edit_current(FieldEdit::Input(value));
    }

    /// Step a select field through unset, option 1..N, unset
    pub fn cycle_select(&mut self, forward: bool) {
        let Some(field) = self.current_field() else {
            return;
        };
        if field.kind != FieldKind::Select {
            return;
        }
        let count = field.options.len();
        let position = field
            .options
            .iter()
            .position(|o| o == self.answers.text(&field.name));
        let next = match (position, forward) {
            (None, true) => Some(0),
            (None, false) => count.checked_sub(1),
            (Some(i), true) if i + 1 < count => Some(i + 1),
            (Some(_), true) => None,
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        let value = next.map(|i| field.options[i].clone()).unwrap_or_default();
        self.edit_current(FieldEdit::Input(value));
    }

    /// Move the multiselect option cursor
    pub fn move_option_cursor(&mut self, down: bool) {
        let Some(field) = self.current_field() else {
            return;
        };
        let count = field.options.len();
        if field.kind != FieldKind::Multiselect || count == 0 {
            return;
        }
        self.option_cursor = if down {
            (self.option_cursor + 1) % count
        } else {
            (self.option_cursor + count - 1) % count
        };
    }

    /// Toggle the option under the cursor of the active multiselect
    pub fn toggle_current_option(&mut self) {
        let option = match self.current_field() {
            Some(field) if field.kind == FieldKind::Multiselect => {
                field.options.get(self.option_cursor).cloned()
            }
            _ => None,
        };
        if let Some(option) = option {
            self.edit_current(FieldEdit::Toggle(option));
        }
    }

    /// Every field rendered with its current answer
    pub fn rendered_fields(&self) -> Vec<RenderedField> {
        self.definition
            .fields
            .iter()
            .map(|f| render(f, self.answers.get(&f.name)))
            .collect()
    }
}

impl Form for FormSession {
    fn field_count(&self) -> usize {
        self.definition.fields.len() + 1 // fields + action row
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.definition.fields.len());
        self.option_cursor = 0;
    }
}

/// Email/password entry on the login screen
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// 0 = email, 1 = password, 2 = login button
    pub active_field_index: usize,
}

impl LoginForm {
    pub fn is_button_active(&self) -> bool {
        self.active_field_index == 2
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field_index {
            0 => self.email.push(c),
            1 => self.password.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field_index {
            0 => {
                self.email.pop();
            }
            1 => {
                self.password.pop();
            }
            _ => {}
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Clear the password, keeping the email for another attempt
    pub fn reset_password(&mut self) {
        self.password.clear();
        self.active_field_index = 1;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        3 // email, password, button
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(2);
    }
}
