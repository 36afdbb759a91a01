//! Sector form definitions and the registry that serves them

use super::field::FieldDescriptor;
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A sector survey form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub title: String,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn validate(&self, sector: &str) -> Result<(), SchemaError> {
        if self.title.trim().is_empty() {
            return Err(SchemaError::MissingTitle(sector.to_string()));
        }
        if self.fields.is_empty() {
            return Err(SchemaError::EmptyForm(sector.to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    sector: sector.to_string(),
                    field: field.name.clone(),
                });
            }
            match (field.kind.takes_options(), field.options.is_empty()) {
                (true, true) => {
                    return Err(SchemaError::MissingOptions {
                        sector: sector.to_string(),
                        field: field.name.clone(),
                    })
                }
                (false, false) => {
                    return Err(SchemaError::UnexpectedOptions {
                        sector: sector.to_string(),
                        field: field.name.clone(),
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Dashboard entry pointing at a registered sector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// On-disk schema file layout
#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    catalog: Option<Vec<CatalogEntry>>,
    forms: BTreeMap<String, FormDefinition>,
}

/// Immutable sector id to form definition mapping, plus the ordered
/// dashboard catalog.
#[derive(Debug, Clone)]
pub struct FormSchemaRegistry {
    forms: BTreeMap<String, FormDefinition>,
    catalog: Vec<CatalogEntry>,
}

impl FormSchemaRegistry {
    /// Build and validate a registry
    pub fn new(
        forms: BTreeMap<String, FormDefinition>,
        catalog: Vec<CatalogEntry>,
    ) -> Result<Self, SchemaError> {
        for (sector, form) in &forms {
            form.validate(sector)?;
        }
        let registry = Self { forms, catalog };
        registry.verify_catalog()?;
        Ok(registry)
    }

    /// The health, WASH and GBV forms shipped with the toolkit
    pub fn builtin() -> Self {
        let mut forms = BTreeMap::new();
        forms.insert(
            "health".to_string(),
            FormDefinition {
                title: "Health Monitoring Form".to_string(),
                fields: vec![
                    FieldDescriptor::text("facility", "Facility Name"),
                    FieldDescriptor::date("date", "Date"),
                    FieldDescriptor::select("type", "Type of Facility", &["PHCU", "PHCC", "Hospital"]),
                    FieldDescriptor::textarea("services", "Services Offered"),
                    FieldDescriptor::text("officer", "Officer in Charge"),
                ],
            },
        );
        forms.insert(
            "wash".to_string(),
            FormDefinition {
                title: "WASH Assessment Form".to_string(),
                fields: vec![
                    FieldDescriptor::text("location", "Location"),
                    FieldDescriptor::select("waterSource", "Water Source Type", &["Borehole", "Well", "River"]),
                    FieldDescriptor::multiselect(
                        "sanitation",
                        "Sanitation Facilities",
                        &["Toilet", "Handwashing", "Shower"],
                    ),
                    FieldDescriptor::textarea("hygiene", "Hygiene Promotion Activities"),
                    FieldDescriptor::date("maintenanceDate", "Date of Last Maintenance"),
                ],
            },
        );
        forms.insert(
            "gbv".to_string(),
            FormDefinition {
                title: "Gender-Based Violence Reporting".to_string(),
                fields: vec![
                    FieldDescriptor::text("incidentLocation", "Incident Location"),
                    FieldDescriptor::select(
                        "incidentType",
                        "Type of Incident",
                        &["Physical", "Sexual", "Psychological"],
                    ),
                    FieldDescriptor::select("ageGroup", "Victim Age Group", &["Child", "Youth", "Adult", "Elderly"]),
                    FieldDescriptor::textarea("support", "Support Services Provided"),
                    FieldDescriptor::multiselect("referral", "Referral Made", &["Medical", "Legal", "Psychosocial"]),
                ],
            },
        );

        Self {
            forms,
            catalog: vec![
                CatalogEntry::new("health", "Health Monitoring"),
                CatalogEntry::new("wash", "WASH Assessment"),
                CatalogEntry::new("gbv", "Gender-Based Violence"),
            ],
        }
    }

    /// Parse and validate a JSON schema file.
    ///
    /// Without a `catalog` the dashboard lists every form, titled by its
    /// form title, in sector id order.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile =
            serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;
        let catalog = file.catalog.unwrap_or_else(|| {
            file.forms
                .iter()
                .map(|(id, form)| CatalogEntry::new(id, &form.title))
                .collect()
        });
        Self::new(file.forms, catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn lookup(&self, sector: &str) -> Result<&FormDefinition, SchemaError> {
        self.forms
            .get(sector)
            .ok_or_else(|| SchemaError::UnknownSector(sector.to_string()))
    }

    pub fn contains(&self, sector: &str) -> bool {
        self.forms.contains_key(sector)
    }

    /// Sectors offered on the dashboard, in display order
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Every dashboard entry must resolve to a registered form
    pub fn verify_catalog(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for entry in &self.catalog {
            if !seen.insert(entry.id.as_str()) {
                return Err(SchemaError::DuplicateSector(entry.id.clone()));
            }
            if !self.contains(&entry.id) {
                return Err(SchemaError::UnknownSector(entry.id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::FieldKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_catalog_resolves() {
        let registry = FormSchemaRegistry::builtin();
        assert!(registry.verify_catalog().is_ok());
        for entry in registry.catalog() {
            assert!(registry.lookup(&entry.id).is_ok(), "dangling sector {}", entry.id);
        }
    }

    #[test]
    fn test_builtin_forms_validate() {
        let registry = FormSchemaRegistry::builtin();
        for entry in registry.catalog() {
            registry.lookup(&entry.id).unwrap().validate(&entry.id).unwrap();
        }
    }

    #[test]
    fn test_lookup_unknown_sector() {
        let registry = FormSchemaRegistry::builtin();
        assert_eq!(
            registry.lookup("nutrition"),
            Err(SchemaError::UnknownSector("nutrition".to_string()))
        );
    }

    #[test]
    fn test_gbv_referral_is_multiselect() {
        let registry = FormSchemaRegistry::builtin();
        let form = registry.lookup("gbv").unwrap();
        let referral = form.field("referral").unwrap();
        assert_eq!(referral.kind, FieldKind::Multiselect);
        assert_eq!(referral.options, vec!["Medical", "Legal", "Psychosocial"]);
    }

    #[test]
    fn test_catalog_with_unregistered_sector_is_rejected() {
        let registry = FormSchemaRegistry::builtin();
        let mut catalog = registry.catalog().to_vec();
        catalog.push(CatalogEntry::new("finance", "Financial Audit Checklist"));
        let err = FormSchemaRegistry::new(registry.forms.clone(), catalog).unwrap_err();
        assert_eq!(err, SchemaError::UnknownSector("finance".to_string()));
    }

    #[test]
    fn test_duplicate_catalog_entry_is_rejected() {
        let registry = FormSchemaRegistry::builtin();
        let mut catalog = registry.catalog().to_vec();
        catalog.push(CatalogEntry::new("gbv", "GBV again"));
        let err = FormSchemaRegistry::new(registry.forms.clone(), catalog).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSector("gbv".to_string()));
    }

    mod schema_file {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_parses_field_kind_tags() {
            let json = r#"{
                "forms": {
                    "nutrition": {
                        "title": "Nutrition Surveillance",
                        "fields": [
                            {"label": "Site", "name": "site", "type": "text"},
                            {"label": "MUAC", "name": "muac", "type": "select", "options": ["Green", "Yellow", "Red"]},
                            {"label": "Programmes", "name": "programmes", "type": "checkbox", "options": ["OTP", "TSFP"]}
                        ]
                    }
                }
            }"#;
            let registry = FormSchemaRegistry::from_json(json).unwrap();
            assert_eq!(
                registry.catalog(),
                &[CatalogEntry::new("nutrition", "Nutrition Surveillance")]
            );
            let form = registry.lookup("nutrition").unwrap();
            assert_eq!(form.fields[2].kind, FieldKind::Multiselect);
        }

        #[test]
        fn test_explicit_catalog_keeps_order() {
            let json = r#"{
                "catalog": [{"id": "b", "name": "Second"}, {"id": "a", "name": "First"}],
                "forms": {
                    "a": {"title": "A", "fields": [{"label": "X", "name": "x", "kind": "text"}]},
                    "b": {"title": "B", "fields": [{"label": "Y", "name": "y", "kind": "date"}]}
                }
            }"#;
            let registry = FormSchemaRegistry::from_json(json).unwrap();
            let ids: Vec<&str> = registry.catalog().iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, vec!["b", "a"]);
        }

        #[test]
        fn test_duplicate_field_name_is_rejected() {
            let json = r#"{"forms": {"hr": {"title": "HR", "fields": [
                {"label": "Name", "name": "name", "type": "text"},
                {"label": "Name again", "name": "name", "type": "text"}
            ]}}}"#;
            assert_eq!(
                FormSchemaRegistry::from_json(json).unwrap_err(),
                SchemaError::DuplicateField {
                    sector: "hr".to_string(),
                    field: "name".to_string()
                }
            );
        }

        #[test]
        fn test_select_without_options_is_rejected() {
            let json = r#"{"forms": {"it": {"title": "IT", "fields": [
                {"label": "Device", "name": "device", "type": "select"}
            ]}}}"#;
            assert!(matches!(
                FormSchemaRegistry::from_json(json),
                Err(SchemaError::MissingOptions { .. })
            ));
        }

        #[test]
        fn test_text_with_options_is_rejected() {
            let json = r#"{"forms": {"it": {"title": "IT", "fields": [
                {"label": "Device", "name": "device", "type": "text", "options": ["Laptop"]}
            ]}}}"#;
            assert!(matches!(
                FormSchemaRegistry::from_json(json),
                Err(SchemaError::UnexpectedOptions { .. })
            ));
        }

        #[test]
        fn test_empty_form_is_rejected() {
            let json = r#"{"forms": {"audit": {"title": "Audit", "fields": []}}}"#;
            assert_eq!(
                FormSchemaRegistry::from_json(json).unwrap_err(),
                SchemaError::EmptyForm("audit".to_string())
            );
        }

        #[test]
        fn test_unknown_kind_is_a_parse_error() {
            let json = r#"{"forms": {"x": {"title": "X", "fields": [
                {"label": "F", "name": "f", "type": "slider"}
            ]}}}"#;
            assert!(matches!(FormSchemaRegistry::from_json(json), Err(SchemaError::Parse(_))));
        }

        #[test]
        fn test_from_file_reports_missing_path() {
            let err = FormSchemaRegistry::from_file(Path::new("/nonexistent/forms.json")).unwrap_err();
            assert!(matches!(err, SchemaError::Parse(msg) if msg.contains("forms.json")));
        }
    }
}
