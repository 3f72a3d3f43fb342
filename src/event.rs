//! Field events for replayed form interactions
//!
//! Events mirror what the page sees from the user:
//! - `input`: the value of a text field changed (one event per edit)
//! - `change`: a select committed a new value
//! - `keyup`: a key was released inside a field

use serde::{Deserialize, Serialize};

/// Kind of DOM-level event a trace entry represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Text edit in an input field
    Input,
    /// Committed value change in a select
    Change,
    /// Key released inside a field
    KeyUp,
}

impl EventKind {
    /// Event name as it appears in traces and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::KeyUp => "keyup",
        }
    }
}

/// A single timestamped event against one named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEvent {
    /// Milliseconds since the start of the interaction
    pub at_ms: u64,
    /// Name of the field the event targets
    pub field: String,
    /// What happened
    pub kind: EventKind,
    /// Field content after the edit (omitted when the event carries no value)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    /// Released key, for keyup events
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key: Option<String>,
}

impl FieldEvent {
    /// Build an input event carrying the field's new value
    pub fn input(at_ms: u64, field: &str, value: &str) -> Self {
        Self {
            at_ms,
            field: field.to_string(),
            kind: EventKind::Input,
            value: Some(value.to_string()),
            key: None,
        }
    }

    /// Build a change event carrying the select's new value
    pub fn change(at_ms: u64, field: &str, value: &str) -> Self {
        Self {
            at_ms,
            field: field.to_string(),
            kind: EventKind::Change,
            value: Some(value.to_string()),
            key: None,
        }
    }

    /// Build a keyup event for the given key
    pub fn keyup(at_ms: u64, field: &str, key: &str) -> Self {
        Self {
            at_ms,
            field: field.to_string(),
            kind: EventKind::KeyUp,
            value: None,
            key: Some(key.to_string()),
        }
    }

    /// Attach a value to the event (keyup events may carry the field content)
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// True for a keyup whose key is exactly "Enter"
    pub fn is_enter(&self) -> bool {
        self.kind == EventKind::KeyUp && self.key.as_deref() == Some("Enter")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::Input.as_str(), "input");
        assert_eq!(EventKind::Change.as_str(), "change");
        assert_eq!(EventKind::KeyUp.as_str(), "keyup");
    }

    #[test]
    fn test_input_event_carries_value() {
        let event = FieldEvent::input(100, "q", "eng");
        assert_eq!(event.at_ms, 100);
        assert_eq!(event.field, "q");
        assert_eq!(event.kind, EventKind::Input);
        assert_eq!(event.value.as_deref(), Some("eng"));
        assert!(event.key.is_none());
    }

    #[test]
    fn test_keyup_enter_detection() {
        let enter = FieldEvent::keyup(50, "rut", "Enter");
        let tab = FieldEvent::keyup(50, "rut", "Tab");
        assert!(enter.is_enter());
        assert!(!tab.is_enter());
    }

    #[test]
    fn test_input_is_never_enter() {
        let event = FieldEvent::input(0, "q", "Enter");
        assert!(!event.is_enter());
    }

    #[test]
    fn test_keyup_with_value() {
        let event = FieldEvent::keyup(200, "rut", "Enter").with_value("12.345.678-9");
        assert_eq!(event.value.as_deref(), Some("12.345.678-9"));
        assert!(event.is_enter());
    }

    #[test]
    fn test_event_json_round_trip() {
        let event = FieldEvent::change(300, "order", "name_desc");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"change\""));
        let back: FieldEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let event = FieldEvent::keyup(10, "rut", "Enter");
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("value"));
        assert!(json.contains("\"key\":\"Enter\""));
    }

    #[test]
    fn test_event_deserializes_without_optionals() {
        let json = r#"{"at_ms":5,"field":"q","kind":"input"}"#;
        let event: FieldEvent = serde_json::from_str(json).unwrap();
        assert!(event.value.is_none());
        assert!(event.key.is_none());
    }
}
