//! Answer set for the active form

use super::field::{on_edit, AnswerValue, EditResult, FieldDescriptor, FieldEdit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to answer. Unset fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AnswerValue> {
        self.0.get(name)
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Text value of a field, empty when unset
    pub fn text(&self, name: &str) -> &str {
        self.get(name)
            .and_then(AnswerValue::as_text)
            .unwrap_or_default()
    }

    /// Route an edit through the field renderer and write the result through.
    ///
    /// Returns false when the edit did not fit the field kind.
    pub fn apply(&mut self, field: &FieldDescriptor, edit: FieldEdit) -> bool {
        match on_edit(field, self.0.get(&field.name), edit) {
            EditResult::Set(value) => {
                self.0.insert(field.name.clone(), value);
                true
            }
            EditResult::Unset => {
                self.0.remove(&field.name);
                true
            }
            EditResult::Ignored => {
                tracing::warn!(
                    "Ignored edit on {} field '{}'",
                    field.kind.label(),
                    field.name
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn facility_type() -> FieldDescriptor {
        FieldDescriptor::select("type", "Type of Facility", &["PHCU", "PHCC", "Hospital"])
    }

    fn sanitation() -> FieldDescriptor {
        FieldDescriptor::multiselect("sanitation", "Sanitation Facilities", &["Toilet", "Handwashing", "Shower"])
    }

    #[test]
    fn test_select_then_unset_removes_key() {
        let field = facility_type();
        let mut answers = AnswerSet::new();

        assert!(answers.apply(&field, FieldEdit::Input("PHCC".to_string())));
        assert_eq!(serde_json::to_value(&answers).unwrap(), json!({"type": "PHCC"}));

        assert!(answers.apply(&field, FieldEdit::Input(String::new())));
        assert!(!answers.contains("type"));
        assert!(answers.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_membership_only_for_that_option() {
        let field = sanitation();
        let mut answers = AnswerSet::new();
        answers.apply(&field, FieldEdit::Toggle("Toilet".to_string()));
        answers.apply(&field, FieldEdit::Toggle("Shower".to_string()));
        let before = answers.clone();

        for option in ["Toilet", "Handwashing", "Shower"] {
            answers.apply(&field, FieldEdit::Toggle(option.to_string()));
            answers.apply(&field, FieldEdit::Toggle(option.to_string()));
            assert_eq!(answers, before, "double toggle of {option}");
        }
    }

    #[test]
    fn test_toggle_on_unset_field_then_back_leaves_it_absent() {
        let field = sanitation();
        let mut answers = AnswerSet::new();
        answers.apply(&field, FieldEdit::Toggle("Handwashing".to_string()));
        answers.apply(&field, FieldEdit::Toggle("Handwashing".to_string()));
        assert!(!answers.contains("sanitation"));
    }

    #[test]
    fn test_ignored_edit_keeps_previous_value() {
        let field = facility_type();
        let mut answers = AnswerSet::new();
        answers.apply(&field, FieldEdit::Input("PHCU".to_string()));
        assert!(!answers.apply(&field, FieldEdit::Input("Pharmacy".to_string())));
        assert_eq!(answers.text("type"), "PHCU");
    }

    #[test]
    fn test_multiselect_serializes_as_array() {
        let field = sanitation();
        let mut answers = AnswerSet::new();
        answers.apply(&field, FieldEdit::Toggle("Shower".to_string()));
        answers.apply(&field, FieldEdit::Toggle("Toilet".to_string()));
        assert_eq!(
            serde_json::to_value(&answers).unwrap(),
            json!({"sanitation": ["Shower", "Toilet"]})
        );
    }

    #[test]
    fn test_round_trips_mixed_values() {
        let json = json!({"incidentType": "Sexual", "referral": ["Legal", "Medical"]});
        let answers: AnswerSet = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(answers.text("incidentType"), "Sexual");
        assert_eq!(answers.get("referral").and_then(AnswerValue::as_choices).map(|s| s.len()), Some(2));
        assert_eq!(serde_json::to_value(&answers).unwrap(), json);
    }
}
