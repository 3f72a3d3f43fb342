//! Recorded interaction traces
//!
//! A trace is a JSON document: the page it was recorded on (or an explicit
//! form snapshot), an optional debounce override, and the timestamped
//! events. Traces come from files or stdin.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::event::{EventKind, FieldEvent};
use crate::form::FilterForm;
use crate::pages::Page;

/// Validation errors for a parsed trace
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Trace names neither a page nor a form; nothing to replay against")]
    NoBindTarget,

    #[error("Event {index} at {at_ms}ms goes back in time (previous event at {prev_ms}ms)")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        prev_ms: u64,
    },

    #[error("Keyup event {index} on '{field}' is missing a key")]
    MissingKey { index: usize, field: String },
}

/// A recorded interaction against one page's filter form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// Page the trace was recorded on; supplies the trigger table and a
    /// default form when no snapshot is given
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<Page>,
    /// Explicit form snapshot; wins over the page default
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub form: Option<FilterForm>,
    /// Debounce delay override for this trace
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub events: Vec<FieldEvent>,
}

impl Script {
    /// Check trace invariants: a bind target exists, timestamps never go
    /// backwards, keyup events carry their key.
    pub fn validate(&self) -> std::result::Result<(), ScriptError> {
        if self.page.is_none() && self.form.is_none() {
            return Err(ScriptError::NoBindTarget);
        }
        let mut prev_ms = 0u64;
        for (index, event) in self.events.iter().enumerate() {
            if event.at_ms < prev_ms {
                return Err(ScriptError::OutOfOrder {
                    index,
                    at_ms: event.at_ms,
                    prev_ms,
                });
            }
            prev_ms = event.at_ms;
            if event.kind == EventKind::KeyUp && event.key.is_none() {
                return Err(ScriptError::MissingKey {
                    index,
                    field: event.field.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a trace from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let script: Script = serde_json::from_str(json).context("Failed to parse trace JSON")?;
        script.validate()?;
        Ok(script)
    }

    /// Load a trace from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace file: {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Load a trace from stdin
    pub fn from_stdin() -> Result<Self> {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("Failed to read trace from stdin")?;
        Self::from_json(&json)
    }

    /// The form the replay runs against: the snapshot when present,
    /// otherwise the resolved page's form as first rendered.
    pub fn form_candidate(&self, page: Option<Page>) -> Option<FilterForm> {
        if let Some(form) = &self.form {
            return Some(form.clone());
        }
        page.or(self.page).map(|p| p.default_form())
    }
}
