//! Listener resolution and event handling for one filter form
//!
//! `bind` resolves a `BindingSpec` against the form once, at page load.
//! Missing forms, missing fields, and disabled fields are skipped silently;
//! misconfiguration must never surface to the page.

use crate::debounce::DebounceTimer;
use crate::event::FieldEvent;
use crate::form::FilterForm;
use crate::policy::{BindingSpec, SubmitCause, TriggerPolicy};

/// One resolved listener
#[derive(Debug, Clone)]
struct Binding {
    field: String,
    policy: TriggerPolicy,
    /// Timer slot, present only for debounced rules
    timer: Option<DebounceTimer>,
}

/// What the binder did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// No listener for this field and kind
    Ignored,
    /// A debounce deadline was set, replacing `superseded` if present
    Scheduled {
        deadline_ms: u64,
        superseded: Option<u64>,
    },
    /// An immediate trigger fired
    Submit(SubmitCause),
}

/// A debounce deadline popped from its slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTimer {
    pub field: String,
    pub deadline_ms: u64,
    /// Quiet window that elapsed before the deadline
    pub delay_ms: u64,
}

/// Listeners resolved against one form
#[derive(Debug)]
pub struct FilterBinder {
    bindings: Vec<Binding>,
}

impl FilterBinder {
    /// Resolve a spec against the document's form. A missing form or a form
    /// id mismatch yields an inert binder; rules naming absent or disabled
    /// fields are dropped.
    pub fn bind(form: Option<&FilterForm>, spec: &BindingSpec) -> Self {
        let mut bindings = Vec::new();

        let Some(form) = form else {
            tracing::debug!(form_id = %spec.form_id, "no form in document, nothing bound");
            return Self { bindings };
        };
        if form.id != spec.form_id {
            tracing::debug!(
                expected = %spec.form_id,
                found = %form.id,
                "form id mismatch, nothing bound"
            );
            return Self { bindings };
        }

        for rule in &spec.rules {
            match form.field(&rule.field) {
                None => {
                    tracing::debug!(field = %rule.field, "field not in form, rule skipped");
                }
                Some(field) if field.disabled => {
                    tracing::debug!(field = %rule.field, "field disabled, rule skipped");
                }
                Some(_) => {
                    let timer = match rule.policy {
                        TriggerPolicy::DebouncedInput { delay_ms } => {
                            Some(DebounceTimer::new(delay_ms))
                        }
                        _ => None,
                    };
                    bindings.push(Binding {
                        field: rule.field.clone(),
                        policy: rule.policy,
                        timer,
                    });
                }
            }
        }

        Self { bindings }
    }

    /// True when nothing was bound
    pub fn is_inert(&self) -> bool {
        self.bindings.is_empty()
    }

    /// True when the field has a listener
    pub fn is_bound(&self, field: &str) -> bool {
        self.bindings.iter().any(|b| b.field == field)
    }

    /// Bound field names, in rule order
    pub fn bound_fields(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.field.as_str()).collect()
    }

    /// Feed one event through the listeners. Scheduling and immediate
    /// triggers happen here; firing due deadlines is the caller's loop.
    pub fn handle_event(&mut self, event: &FieldEvent) -> EventOutcome {
        let Some(binding) = self.bindings.iter_mut().find(|b| b.field == event.field) else {
            return EventOutcome::Ignored;
        };
        if !binding.policy.listens_to(event.kind) {
            return EventOutcome::Ignored;
        }

        match binding.policy {
            TriggerPolicy::DebouncedInput { .. } => {
                let Some(timer) = binding.timer.as_mut() else {
                    return EventOutcome::Ignored;
                };
                let superseded = timer.schedule(event.at_ms);
                let deadline_ms = event.at_ms.saturating_add(timer.delay_ms());
                tracing::trace!(
                    field = %binding.field,
                    deadline_ms,
                    ?superseded,
                    "debounce scheduled"
                );
                EventOutcome::Scheduled {
                    deadline_ms,
                    superseded,
                }
            }
            TriggerPolicy::Change => {
                tracing::trace!(field = %binding.field, at_ms = event.at_ms, "change fired");
                EventOutcome::Submit(SubmitCause::Change {
                    field: binding.field.clone(),
                })
            }
            TriggerPolicy::EnterKey => {
                if event.is_enter() {
                    tracing::trace!(field = %binding.field, at_ms = event.at_ms, "enter fired");
                    EventOutcome::Submit(SubmitCause::Enter {
                        field: binding.field.clone(),
                    })
                } else {
                    EventOutcome::Ignored
                }
            }
        }
    }

    /// Earliest pending deadline across all slots
    pub fn next_deadline(&self) -> Option<u64> {
        self.bindings
            .iter()
            .filter_map(|b| b.timer.as_ref().and_then(DebounceTimer::deadline))
            .min()
    }

    /// Pop the earliest deadline strictly before `before_ms`
    pub fn take_due_before(&mut self, before_ms: u64) -> Option<DueTimer> {
        self.take_earliest(before_ms, false)
    }

    /// Pop the earliest deadline due at or before `now_ms`
    pub fn take_due(&mut self, now_ms: u64) -> Option<DueTimer> {
        self.take_earliest(now_ms, true)
    }

    /// Pop the earliest pending deadline regardless of the clock
    pub fn take_pending(&mut self) -> Option<DueTimer> {
        self.take_earliest(u64::MAX, true)
    }

    fn take_earliest(&mut self, limit_ms: u64, inclusive: bool) -> Option<DueTimer> {
        let mut best: Option<(usize, u64)> = None;
        for (index, binding) in self.bindings.iter().enumerate() {
            let Some(deadline) = binding.timer.as_ref().and_then(DebounceTimer::deadline) else {
                continue;
            };
            let due = if inclusive {
                deadline <= limit_ms
            } else {
                deadline < limit_ms
            };
            if due && best.map_or(true, |(_, earliest)| deadline < earliest) {
                best = Some((index, deadline));
            }
        }

        let (index, deadline_ms) = best?;
        let binding = &mut self.bindings[index];
        if let Some(timer) = binding.timer.as_mut() {
            timer.cancel();
        }
        let delay_ms = match binding.policy {
            TriggerPolicy::DebouncedInput { delay_ms } => delay_ms,
            _ => 0,
        };
        Some(DueTimer {
            field: binding.field.clone(),
            deadline_ms,
            delay_ms,
        })
    }

    /// Drop every pending deadline, returning the fields that held one.
    /// Navigation destroys the page's timers.
    pub fn clear_pending(&mut self) -> Vec<String> {
        let mut cleared = Vec::new();
        for binding in &mut self.bindings {
            if let Some(timer) = binding.timer.as_mut() {
                if timer.cancel().is_some() {
                    tracing::trace!(field = %binding.field, "pending deadline discarded");
                    cleared.push(binding.field.clone());
                }
            }
        }
        cleared
    }
}
