//! Field descriptors and the per-kind field renderer
//!
//! `render` turns a descriptor plus its current answer into a UI-agnostic
//! [`RenderedInput`]; `on_edit` turns a user edit into the next answer.
//! Both dispatch on [`FieldKind`] with an exhaustive match, so adding a kind
//! is a compile error until every arm handles it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Input widget kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Date,
    Textarea,
    Select,
    /// Checkbox group; schema files may use the `checkbox` tag
    #[serde(alias = "checkbox")]
    Multiselect,
}

impl FieldKind {
    /// Whether the kind draws its value from `options`
    pub fn takes_options(&self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }

    /// Whether the value is typed character by character
    pub fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Date | Self::Textarea)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
        }
    }
}

/// A single field of a form definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub label: String,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    pub fn text(name: &str, label: &str) -> Self {
        Self::plain(name, label, FieldKind::Text)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::plain(name, label, FieldKind::Date)
    }

    pub fn textarea(name: &str, label: &str) -> Self {
        Self::plain(name, label, FieldKind::Textarea)
    }

    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self::with_options(name, label, FieldKind::Select, options)
    }

    pub fn multiselect(name: &str, label: &str, options: &[&str]) -> Self {
        Self::with_options(name, label, FieldKind::Multiselect, options)
    }

    fn plain(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            kind,
            options: Vec::new(),
        }
    }

    fn with_options(name: &str, label: &str, kind: FieldKind, options: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            kind,
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Value of an answered field
///
/// Serialized untagged: a JSON string for single values, an array for
/// multiselect sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(BTreeSet<String>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Choices(_) => None,
        }
    }

    pub fn as_choices(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Choices(set) => Some(set),
            Self::Text(_) => None,
        }
    }
}

/// A user edit routed to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Raw input replacing the previous value (text, date, textarea, select)
    Input(String),
    /// Flip membership of one option (multiselect)
    Toggle(String),
    /// Remove the answer
    Clear,
}

/// Outcome of applying an edit to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Set(AnswerValue),
    Unset,
    /// The edit does not fit the field kind; the answer is left as it was
    Ignored,
}

/// Compute the next answer for `field` after `edit`.
///
/// Empty input and empty sets produce [`EditResult::Unset`] so unset fields
/// stay absent from the answer set.
pub fn on_edit(field: &FieldDescriptor, current: Option<&AnswerValue>, edit: FieldEdit) -> EditResult {
    match (field.kind, edit) {
        (_, FieldEdit::Clear) => EditResult::Unset,
        (FieldKind::Text | FieldKind::Date | FieldKind::Textarea, FieldEdit::Input(raw)) => {
            if raw.is_empty() {
                EditResult::Unset
            } else {
                EditResult::Set(AnswerValue::Text(raw))
            }
        }
        (FieldKind::Select, FieldEdit::Input(raw)) => {
            if raw.is_empty() {
                EditResult::Unset
            } else if field.has_option(&raw) {
                EditResult::Set(AnswerValue::Text(raw))
            } else {
                EditResult::Ignored
            }
        }
        (FieldKind::Multiselect, FieldEdit::Toggle(option)) => {
            if !field.has_option(&option) {
                return EditResult::Ignored;
            }
            let mut set = current
                .and_then(AnswerValue::as_choices)
                .cloned()
                .unwrap_or_default();
            if !set.remove(&option) {
                set.insert(option);
            }
            if set.is_empty() {
                EditResult::Unset
            } else {
                EditResult::Set(AnswerValue::Choices(set))
            }
        }
        (FieldKind::Text | FieldKind::Date | FieldKind::Textarea | FieldKind::Select, FieldEdit::Toggle(_))
        | (FieldKind::Multiselect, FieldEdit::Input(_)) => EditResult::Ignored,
    }
}

/// UI-agnostic representation of a field's input widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedInput {
    Line { value: String },
    Date { value: String },
    Block { value: String },
    Choice { options: Vec<String>, selected: Option<usize> },
    Checklist { options: Vec<(String, bool)> },
}

/// A field ready to be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub label: String,
    pub input: RenderedInput,
}

impl RenderedField {
    /// Value text for single-line display, `None` when unanswered
    pub fn summary(&self) -> Option<String> {
        match &self.input {
            RenderedInput::Line { value }
            | RenderedInput::Date { value }
            | RenderedInput::Block { value } => (!value.is_empty()).then(|| value.clone()),
            RenderedInput::Choice { options, selected } => selected.map(|i| options[i].clone()),
            RenderedInput::Checklist { options } => {
                let checked: Vec<&str> = options
                    .iter()
                    .filter(|(_, on)| *on)
                    .map(|(o, _)| o.as_str())
                    .collect();
                (!checked.is_empty()).then(|| checked.join(", "))
            }
        }
    }
}

/// Render `field` with its current answer
pub fn render(field: &FieldDescriptor, current: Option<&AnswerValue>) -> RenderedField {
    let text = || {
        current
            .and_then(AnswerValue::as_text)
            .unwrap_or_default()
            .to_string()
    };

    let input = match field.kind {
        FieldKind::Text => RenderedInput::Line { value: text() },
        FieldKind::Date => RenderedInput::Date { value: text() },
        FieldKind::Textarea => RenderedInput::Block { value: text() },
        FieldKind::Select => {
            let chosen = current.and_then(AnswerValue::as_text);
            RenderedInput::Choice {
                options: field.options.clone(),
                selected: chosen.and_then(|c| field.options.iter().position(|o| o == c)),
            }
        }
        FieldKind::Multiselect => {
            let set = current.and_then(AnswerValue::as_choices);
            RenderedInput::Checklist {
                options: field
                    .options
                    .iter()
                    .map(|o| (o.clone(), set.is_some_and(|s| s.contains(o))))
                    .collect(),
            }
        }
    };

    RenderedField {
        label: field.label.clone(),
        input,
    }
}
