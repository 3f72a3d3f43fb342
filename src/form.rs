//! Filter form snapshots and native GET serialization
//!
//! A `FilterForm` is the replay-side stand-in for the page's filter form:
//! named fields in document order, each with a current value and a disabled
//! flag. Submitting serializes every enabled field as a query string, the
//! same way a browser serializes a GET form.

use serde::{Deserialize, Serialize};

/// Control kind a field renders as, for reporting only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldControl {
    /// Free-text input
    #[default]
    Text,
    /// Dropdown select
    Select,
}

/// One named form control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    /// Current content; empty fields still serialize as `name=`
    #[serde(default)]
    pub value: String,
    /// Disabled fields are skipped at bind time and never serialize
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub control: FieldControl,
}

impl FormField {
    /// Build an enabled, empty text input
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            disabled: false,
            control: FieldControl::Text,
        }
    }

    /// Build an enabled, empty select
    pub fn select(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            disabled: false,
            control: FieldControl::Select,
        }
    }

    /// Set the field's value
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Mark the field disabled
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// A filter form: id, action path, and fields in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterForm {
    pub id: String,
    /// GET target the query string is appended to
    pub action: String,
    pub fields: Vec<FormField>,
}

impl FilterForm {
    /// Build an empty form
    pub fn new(id: &str, action: &str) -> Self {
        Self {
            id: id.to_string(),
            action: action.to_string(),
            fields: Vec::new(),
        }
    }

    /// Append a field, preserving document order
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Set a field's value. Returns false when no such field exists.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Enabled name/value pairs in document order
    pub fn enabled_pairs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter(|f| !f.disabled)
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect()
    }

    /// Serialize enabled fields as application/x-www-form-urlencoded
    pub fn query_string(&self) -> String {
        serde_urlencoded::to_string(self.enabled_pairs()).unwrap_or_default()
    }

    /// Full GET target: action plus query string
    pub fn submit_url(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            self.action.clone()
        } else {
            format!("{}?{}", self.action, query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> FilterForm {
        FilterForm::new("filtersForm", "/areas/")
            .with_field(FormField::text("q"))
            .with_field(FormField::select("order").with_value("name_asc"))
    }

    #[test]
    fn test_field_lookup() {
        let form = sample_form();
        assert!(form.field("q").is_some());
        assert!(form.field("order").is_some());
        assert!(form.field("missing").is_none());
    }

    #[test]
    fn test_set_value() {
        let mut form = sample_form();
        assert!(form.set_value("q", "eng"));
        assert_eq!(form.field("q").unwrap().value, "eng");
        assert!(!form.set_value("missing", "x"));
    }

    #[test]
    fn test_query_string_document_order() {
        let mut form = sample_form();
        form.set_value("q", "eng");
        assert_eq!(form.query_string(), "q=eng&order=name_asc");
    }

    #[test]
    fn test_query_string_keeps_empty_values() {
        let form = sample_form();
        assert_eq!(form.query_string(), "q=&order=name_asc");
    }

    #[test]
    fn test_query_string_skips_disabled_fields() {
        let form = FilterForm::new("filtersForm", "/trabajadores/")
            .with_field(FormField::text("q").with_value("ana"))
            .with_field(FormField::text("rut").with_value("1-9").disabled())
            .with_field(FormField::select("order").with_value("name_asc"));
        assert_eq!(form.query_string(), "q=ana&order=name_asc");
    }

    #[test]
    fn test_query_string_escapes_reserved_characters() {
        let mut form = sample_form();
        form.set_value("q", "a b&c=d");
        assert_eq!(form.query_string(), "q=a+b%26c%3Dd&order=name_asc");
    }

    #[test]
    fn test_submit_url_with_query() {
        let mut form = sample_form();
        form.set_value("q", "eng");
        assert_eq!(form.submit_url(), "/areas/?q=eng&order=name_asc");
    }

    #[test]
    fn test_submit_url_without_fields() {
        let form = FilterForm::new("filtersForm", "/areas/");
        assert_eq!(form.submit_url(), "/areas/");
    }

    #[test]
    fn test_all_fields_disabled_serializes_empty() {
        let form = FilterForm::new("filtersForm", "/areas/")
            .with_field(FormField::text("q").disabled());
        assert_eq!(form.query_string(), "");
        assert_eq!(form.submit_url(), "/areas/");
    }

    #[test]
    fn test_form_json_round_trip() {
        let form = sample_form();
        let json = serde_json::to_string(&form).unwrap();
        let back: FilterForm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn test_form_deserializes_with_defaults() {
        let json = r#"{"id":"filtersForm","action":"/areas/","fields":[{"name":"q"}]}"#;
        let form: FilterForm = serde_json::from_str(json).unwrap();
        let q = form.field("q").unwrap();
        assert_eq!(q.value, "");
        assert!(!q.disabled);
        assert_eq!(q.control, FieldControl::Text);
    }
}
