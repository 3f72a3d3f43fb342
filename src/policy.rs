//! Trigger policies and binding expressions for -e bind=
//!
//! Supports:
//! - Debounced text inputs: -e bind=q:debounce or bind=q:debounce:300
//! - Immediate selects: -e bind=order:change
//! - Enter-key submission: -e bind=rut:enter

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::EventKind;

/// Form id every page gives its filter form
pub const FILTERS_FORM_ID: &str = "filtersForm";

/// Debounce window used when a rule does not name its own delay
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Errors from parsing a binding expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("Invalid binding expression: {expr}. Expected format: bind=FIELD:POLICY[,FIELD:POLICY...]")]
    MissingPrefix { expr: String },

    #[error("Empty binding expression: at least one FIELD:POLICY rule is required")]
    Empty,

    #[error("Malformed rule '{rule}': expected FIELD:POLICY")]
    MalformedRule { rule: String },

    #[error("Unknown policy '{policy}' for field '{field}': expected debounce, debounce:MS, change, or enter")]
    UnknownPolicy { field: String, policy: String },

    #[error("Invalid debounce delay '{delay}' for field '{field}': expected milliseconds")]
    InvalidDelay { field: String, delay: String },

    #[error("Duplicate rule for field '{field}'")]
    DuplicateField { field: String },
}

/// Result type for binding expression parsing
pub type Result<T> = std::result::Result<T, BindingError>;

/// How a bound field turns events into submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPolicy {
    /// Input events schedule a submission `delay_ms` out; newer input
    /// cancels and replaces the pending one
    DebouncedInput { delay_ms: u64 },
    /// Change events submit immediately
    Change,
    /// Keyup with key "Enter" submits immediately; other keys do nothing
    EnterKey,
}

impl TriggerPolicy {
    /// Policy name as written in binding expressions
    pub fn label(&self) -> &'static str {
        match self {
            TriggerPolicy::DebouncedInput { .. } => "debounce",
            TriggerPolicy::Change => "change",
            TriggerPolicy::EnterKey => "enter",
        }
    }

    /// Event kind this policy listens for
    pub fn listens_to(&self, kind: EventKind) -> bool {
        matches!(
            (self, kind),
            (TriggerPolicy::DebouncedInput { .. }, EventKind::Input)
                | (TriggerPolicy::Change, EventKind::Change)
                | (TriggerPolicy::EnterKey, EventKind::KeyUp)
        )
    }
}

/// One field bound to one trigger policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: String,
    pub policy: TriggerPolicy,
}

/// Everything a page attaches at load: the form id and its field rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSpec {
    pub form_id: String,
    pub rules: Vec<FieldRule>,
}

impl BindingSpec {
    /// Build an empty spec against the given form id
    pub fn new(form_id: &str) -> Self {
        Self {
            form_id: form_id.to_string(),
            rules: Vec::new(),
        }
    }

    /// Append a rule
    pub fn rule(mut self, field: &str, policy: TriggerPolicy) -> Self {
        self.rules.push(FieldRule {
            field: field.to_string(),
            policy,
        });
        self
    }

    /// Parse an expression like "bind=q:debounce,order:change" or
    /// "bind=q:debounce:300,rut:enter". Rules without an explicit delay get
    /// `default_delay_ms`. The spec targets the standard filters form.
    pub fn from_expr(expr: &str, default_delay_ms: u64) -> Result<Self> {
        let Some(rule_spec) = expr.strip_prefix("bind=") else {
            return Err(BindingError::MissingPrefix {
                expr: expr.to_string(),
            });
        };
        Self::from_rule_spec(rule_spec, default_delay_ms)
    }

    /// Parse the part after "bind="
    fn from_rule_spec(spec: &str, default_delay_ms: u64) -> Result<Self> {
        if spec.trim().is_empty() {
            return Err(BindingError::Empty);
        }

        let mut parsed = Self::new(FILTERS_FORM_ID);
        for part in spec.split(',') {
            let part = part.trim();
            let Some((field, policy_spec)) = part.split_once(':') else {
                return Err(BindingError::MalformedRule {
                    rule: part.to_string(),
                });
            };
            let field = field.trim();
            if field.is_empty() {
                return Err(BindingError::MalformedRule {
                    rule: part.to_string(),
                });
            }
            if parsed.rule_for(field).is_some() {
                return Err(BindingError::DuplicateField {
                    field: field.to_string(),
                });
            }

            let policy = if let Some(delay) = policy_spec.strip_prefix("debounce:") {
                let delay_ms =
                    delay
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| BindingError::InvalidDelay {
                            field: field.to_string(),
                            delay: delay.to_string(),
                        })?;
                TriggerPolicy::DebouncedInput { delay_ms }
            } else {
                match policy_spec.trim() {
                    "debounce" => TriggerPolicy::DebouncedInput {
                        delay_ms: default_delay_ms,
                    },
                    "change" => TriggerPolicy::Change,
                    "enter" => TriggerPolicy::EnterKey,
                    other => {
                        return Err(BindingError::UnknownPolicy {
                            field: field.to_string(),
                            policy: other.to_string(),
                        })
                    }
                }
            };

            parsed.rules.push(FieldRule {
                field: field.to_string(),
                policy,
            });
        }

        Ok(parsed)
    }

    /// Look up the rule for a field
    pub fn rule_for(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }
}

/// What triggered a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "lowercase")]
pub enum SubmitCause {
    /// A debounce window elapsed with no newer input on the field
    Debounce { field: String },
    /// A select committed a new value
    Change { field: String },
    /// Enter was released in the field
    Enter { field: String },
}

impl SubmitCause {
    /// Field the triggering rule was bound to
    pub fn field(&self) -> &str {
        match self {
            SubmitCause::Debounce { field }
            | SubmitCause::Change { field }
            | SubmitCause::Enter { field } => field,
        }
    }

    /// Trigger name for text and CSV output
    pub fn label(&self) -> &'static str {
        match self {
            SubmitCause::Debounce { .. } => "debounce",
            SubmitCause::Change { .. } => "change",
            SubmitCause::Enter { .. } => "enter",
        }
    }
}
