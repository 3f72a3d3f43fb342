//! Replay engine: applies events to the form and records submissions
//!
//! The session owns the form snapshot and the binder. Events update field
//! values first, then feed the listeners. A submission serializes the form
//! and, like real navigation, discards every pending deadline; the form
//! keeps its values because the list pages round-trip their filters.

use serde::{Deserialize, Serialize};

use crate::binder::{EventOutcome, FilterBinder};
use crate::event::FieldEvent;
use crate::form::FilterForm;
use crate::policy::{BindingSpec, SubmitCause};
use crate::script::Script;
use crate::stats::StatsTracker;

/// One recorded form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// When the submission fired, in trace milliseconds
    pub at_ms: u64,
    #[serde(flatten)]
    pub cause: SubmitCause,
    /// Form action the GET targets
    pub target: String,
    /// Query string serialized at submission time
    pub query: String,
    /// Wait between the triggering event and the submission (with -T)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

impl Submission {
    /// Full GET target: action plus query string
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.target.clone()
        } else {
            format!("{}?{}", self.target, self.query)
        }
    }
}

/// Everything a replay produced
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub submissions: Vec<Submission>,
    pub stats: StatsTracker,
}

/// A bound form with its listeners, ready to consume events
#[derive(Debug)]
pub struct ReplaySession {
    form: Option<FilterForm>,
    binder: FilterBinder,
    stats: StatsTracker,
    timing: bool,
    submissions: Vec<Submission>,
}

impl ReplaySession {
    /// Bind the spec against the form. A missing form yields a session that
    /// consumes events without ever submitting.
    pub fn bind(form: Option<FilterForm>, spec: &BindingSpec, timing: bool) -> Self {
        let binder = FilterBinder::bind(form.as_ref(), spec);
        Self {
            form,
            binder,
            stats: StatsTracker::new(),
            timing,
            submissions: Vec::new(),
        }
    }

    /// Current form snapshot
    pub fn form(&self) -> Option<&FilterForm> {
        self.form.as_ref()
    }

    /// Earliest pending debounce deadline
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.binder.next_deadline()
    }

    /// Feed one event. Deadlines due strictly before the event fire first;
    /// a deadline landing exactly on the event's timestamp waits, so an
    /// edit at the deadline still postpones it. Returns submissions in
    /// firing order.
    pub fn dispatch(&mut self, event: &FieldEvent) -> Vec<Submission> {
        let mut fired = Vec::new();

        while let Some(due) = self.binder.take_due_before(event.at_ms) {
            let cause = SubmitCause::Debounce {
                field: due.field.clone(),
            };
            if let Some(submission) = self.emit(due.deadline_ms, cause, due.delay_ms) {
                fired.push(submission);
            }
        }

        self.stats.record_event(&event.field);

        let Some(form) = self.form.as_mut() else {
            return fired;
        };
        match form.field(&event.field) {
            None => {
                tracing::trace!(field = %event.field, "event for unknown field ignored");
                return fired;
            }
            Some(field) if field.disabled => {
                tracing::trace!(field = %event.field, "event for disabled field ignored");
                return fired;
            }
            Some(_) => {}
        }
        if let Some(value) = &event.value {
            form.set_value(&event.field, value);
        }

        match self.binder.handle_event(event) {
            EventOutcome::Ignored => {}
            EventOutcome::Scheduled { superseded, .. } => {
                self.stats
                    .record_scheduled(&event.field, superseded.is_some());
            }
            EventOutcome::Submit(cause) => {
                if let Some(submission) = self.emit(event.at_ms, cause, 0) {
                    fired.push(submission);
                }
            }
        }

        fired
    }

    /// Fire every deadline due at or before `now_ms`. Used by the live
    /// runner when its timer wakes.
    pub fn fire_due(&mut self, now_ms: u64) -> Vec<Submission> {
        let mut fired = Vec::new();
        while let Some(due) = self.binder.take_due(now_ms) {
            let cause = SubmitCause::Debounce {
                field: due.field.clone(),
            };
            if let Some(submission) = self.emit(due.deadline_ms, cause, due.delay_ms) {
                fired.push(submission);
            }
        }
        fired
    }

    /// The trace is over: let the pending deadline, if any, run out
    pub fn finish(&mut self) -> Vec<Submission> {
        let mut fired = Vec::new();
        if let Some(due) = self.binder.take_pending() {
            let cause = SubmitCause::Debounce {
                field: due.field.clone(),
            };
            if let Some(submission) = self.emit(due.deadline_ms, cause, due.delay_ms) {
                fired.push(submission);
            }
        }
        fired
    }

    /// Consume the session into its report
    pub fn into_report(self) -> SessionReport {
        SessionReport {
            submissions: self.submissions,
            stats: self.stats,
        }
    }

    /// Serialize the form and record the submission. Navigation discards
    /// every other pending deadline.
    fn emit(&mut self, at_ms: u64, cause: SubmitCause, latency_ms: u64) -> Option<Submission> {
        let form = self.form.as_ref()?;
        let submission = Submission {
            at_ms,
            target: form.action.clone(),
            query: form.query_string(),
            latency_ms: self.timing.then_some(latency_ms),
            cause,
        };

        self.stats.record_submission(submission.cause.field());
        for field in self.binder.clear_pending() {
            self.stats.record_cancelled(&field);
        }
        tracing::debug!(
            at_ms,
            trigger = submission.cause.label(),
            url = %submission.url(),
            "form submitted"
        );

        self.submissions.push(submission.clone());
        Some(submission)
    }
}

/// Replay a whole script against a binding. The deadline still pending
/// after the last event fires at its scheduled time.
pub fn replay(
    script: &Script,
    form: Option<FilterForm>,
    spec: &BindingSpec,
    timing: bool,
) -> SessionReport {
    let mut session = ReplaySession::bind(form, spec, timing);
    for event in &script.events {
        session.dispatch(event);
    }
    session.finish();
    session.into_report()
}
