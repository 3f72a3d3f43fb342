//! CSV output format for replay reports

use crate::session::Submission;
use crate::stats::StatsTracker;

/// CSV record for a single submission
#[derive(Debug, Clone)]
pub struct CsvSubmission {
    pub at_ms: u64,
    pub field: String,
    pub trigger: String,
    pub target: String,
    pub query: String,
    pub latency_ms: Option<u64>,
}

impl From<&Submission> for CsvSubmission {
    fn from(submission: &Submission) -> Self {
        Self {
            at_ms: submission.at_ms,
            field: submission.cause.field().to_string(),
            trigger: submission.cause.label().to_string(),
            target: submission.target.clone(),
            query: submission.query.clone(),
            latency_ms: submission.latency_ms,
        }
    }
}

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput {
    submissions: Vec<CsvSubmission>,
    include_timing: bool,
}

impl CsvOutput {
    /// Create a new CSV output formatter
    pub fn new(include_timing: bool) -> Self {
        Self {
            submissions: Vec::new(),
            include_timing,
        }
    }

    /// Add a submission to the output
    pub fn add_submission(&mut self, submission: &Submission) {
        self.submissions.push(CsvSubmission::from(submission));
    }

    /// Generate CSV header row based on enabled flags
    fn header(&self) -> String {
        let mut headers = vec!["at_ms", "field", "trigger", "target", "query"];

        if self.include_timing {
            headers.push("latency");
        }

        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format a submission as CSV row
    fn format_submission(&self, submission: &CsvSubmission) -> String {
        let mut fields = vec![
            submission.at_ms.to_string(),
            Self::escape_field(&submission.field),
            submission.trigger.clone(),
            Self::escape_field(&submission.target),
            Self::escape_field(&submission.query),
        ];

        if self.include_timing {
            if let Some(latency) = submission.latency_ms {
                fields.push(format!("{}ms", latency));
            } else {
                fields.push("".to_string());
            }
        }

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for submission in &self.submissions {
            output.push_str(&self.format_submission(submission));
            output.push('\n');
        }

        output
    }
}

/// CSV statistics output formatter (for -c mode)
#[derive(Debug)]
pub struct CsvStatsOutput {
    stats: Vec<CsvFieldStat>,
}

#[derive(Debug, Clone)]
pub struct CsvFieldStat {
    pub field: String,
    pub events: u64,
    pub scheduled: u64,
    pub superseded: u64,
    pub cancelled: u64,
    pub submissions: u64,
}

impl CsvStatsOutput {
    /// Create a new CSV stats output formatter
    pub fn new() -> Self {
        Self { stats: Vec::new() }
    }

    /// Build rows from a tracker, sorted by field name
    pub fn from_tracker(tracker: &StatsTracker) -> Self {
        let mut stats: Vec<CsvFieldStat> = tracker
            .stats_map()
            .iter()
            .map(|(field, s)| CsvFieldStat {
                field: field.clone(),
                events: s.events,
                scheduled: s.scheduled,
                superseded: s.superseded,
                cancelled: s.cancelled,
                submissions: s.submissions,
            })
            .collect();
        stats.sort_by(|a, b| a.field.cmp(&b.field));
        Self { stats }
    }

    /// Add a statistic row
    pub fn add_stat(&mut self, stat: CsvFieldStat) {
        self.stats.push(stat);
    }

    /// Generate CSV output for statistics
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("field,events,scheduled,superseded,cancelled,submissions\n");

        for stat in &self.stats {
            output.push_str(&format!(
                "{},{},{},{},{},{}\n",
                CsvOutput::escape_field(&stat.field),
                stat.events,
                stat.scheduled,
                stat.superseded,
                stat.cancelled,
                stat.submissions
            ));
        }

        output
    }
}

impl Default for CsvStatsOutput {
    fn default() -> Self {
        Self::new()
    }
}
