//! JSON output format for replay reports

use serde::{Deserialize, Serialize};

use crate::session::{SessionReport, Submission};
use crate::stats::StatsTracker;

/// A single recorded submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSubmission {
    /// When the submission fired, in trace milliseconds
    pub at_ms: u64,
    /// Trigger that fired: debounce, change, or enter
    pub trigger: String,
    /// Field the trigger was bound to
    pub field: String,
    /// Form action the GET targets
    pub target: String,
    /// Serialized query string
    pub query: String,
    /// Wait between the triggering event and the submission (with -T)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl From<&Submission> for JsonSubmission {
    fn from(submission: &Submission) -> Self {
        Self {
            at_ms: submission.at_ms,
            trigger: submission.cause.label().to_string(),
            field: submission.cause.field().to_string(),
            target: submission.target.clone(),
            query: submission.query.clone(),
            latency_ms: submission.latency_ms,
        }
    }
}

/// Per-field counters (if -c enabled)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFieldStats {
    pub field: String,
    pub events: u64,
    pub scheduled: u64,
    pub superseded: u64,
    pub cancelled: u64,
    pub submissions: u64,
}

/// Summary statistics for the replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Total events replayed
    pub total_events: u64,
    /// Total submissions fired
    pub total_submissions: u64,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Submissions in firing order
    pub submissions: Vec<JsonSubmission>,
    /// Summary statistics
    pub summary: JsonSummary,
    /// Per-field counters (if -c enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_stats: Option<Vec<JsonFieldStats>>,
}

impl JsonOutput {
    /// Create a new JSON output structure
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "criba-json-v1".to_string(),
            submissions: Vec::new(),
            summary: JsonSummary {
                total_events: 0,
                total_submissions: 0,
            },
            field_stats: None,
        }
    }

    /// Build the full document from a replay report
    pub fn from_report(report: &SessionReport, include_field_stats: bool) -> Self {
        let mut output = Self::new();
        for submission in &report.submissions {
            output.add_submission(submission);
        }
        output.summary.total_events = report.stats.totals().events;
        if include_field_stats {
            output.set_field_stats(&report.stats);
        }
        output
    }

    /// Add a submission to the output
    pub fn add_submission(&mut self, submission: &Submission) {
        self.summary.total_submissions += 1;
        self.submissions.push(JsonSubmission::from(submission));
    }

    /// Attach per-field counters, sorted by field name
    pub fn set_field_stats(&mut self, stats: &StatsTracker) {
        let mut fields: Vec<JsonFieldStats> = stats
            .stats_map()
            .iter()
            .map(|(field, s)| JsonFieldStats {
                field: field.clone(),
                events: s.events,
                scheduled: s.scheduled,
                superseded: s.superseded,
                cancelled: s.cancelled,
                submissions: s.submissions,
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        self.field_stats = Some(fields);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SubmitCause;

    fn sample_submission() -> Submission {
        Submission {
            at_ms: 700,
            cause: SubmitCause::Debounce {
                field: "q".to_string(),
            },
            target: "/areas/".to_string(),
            query: "q=eng&order=name_asc".to_string(),
            latency_ms: None,
        }
    }

    #[test]
    fn test_json_output_creation() {
        let output = JsonOutput::new();
        assert_eq!(output.format, "criba-json-v1");
        assert_eq!(output.submissions.len(), 0);
        assert_eq!(output.summary.total_submissions, 0);
    }

    #[test]
    fn test_add_submission() {
        let mut output = JsonOutput::new();
        output.add_submission(&sample_submission());
        assert_eq!(output.summary.total_submissions, 1);
        assert_eq!(output.submissions[0].trigger, "debounce");
        assert_eq!(output.submissions[0].field, "q");
    }

    #[test]
    fn test_json_serialization() {
        let mut output = JsonOutput::new();
        output.add_submission(&sample_submission());
        output.summary.total_events = 3;

        let json = output.to_json().unwrap();
        assert!(json.contains("\"format\": \"criba-json-v1\""));
        assert!(json.contains("\"trigger\": \"debounce\""));
        assert!(json.contains("\"query\": \"q=eng&order=name_asc\""));
        assert!(json.contains("\"total_events\": 3"));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let output = JsonOutput::new();
        let json = output.to_json().unwrap();
        assert!(!json.contains("field_stats"));

        let submission = JsonSubmission::from(&sample_submission());
        let json = serde_json::to_string(&submission).unwrap();
        assert!(!json.contains("latency_ms"));
    }

    #[test]
    fn test_latency_included_when_present() {
        let submission = Submission {
            latency_ms: Some(500),
            ..sample_submission()
        };
        let json = serde_json::to_string(&JsonSubmission::from(&submission)).unwrap();
        assert!(json.contains("\"latency_ms\":500"));
    }

    #[test]
    fn test_field_stats_sorted_by_name() {
        let mut stats = StatsTracker::new();
        stats.record_event("order");
        stats.record_event("q");
        stats.record_event("area");

        let mut output = JsonOutput::new();
        output.set_field_stats(&stats);
        let fields: Vec<&str> = output
            .field_stats
            .as_ref()
            .unwrap()
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(fields, vec!["area", "order", "q"]);
    }

    #[test]
    fn test_from_report() {
        let mut stats = StatsTracker::new();
        stats.record_event("q");
        stats.record_event("q");
        stats.record_submission("q");
        let report = SessionReport {
            submissions: vec![sample_submission()],
            stats,
        };

        let output = JsonOutput::from_report(&report, false);
        assert_eq!(output.summary.total_events, 2);
        assert_eq!(output.summary.total_submissions, 1);
        assert!(output.field_stats.is_none());

        let with_stats = JsonOutput::from_report(&report, true);
        assert_eq!(with_stats.field_stats.as_ref().unwrap().len(), 1);
    }
}
