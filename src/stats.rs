//! Per-field interaction statistics for -c mode

use std::collections::HashMap;

/// Counters for a single field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Events seen for this field, listened to or not
    pub events: u64,
    /// Debounce deadlines set
    pub scheduled: u64,
    /// Deadlines replaced by a newer event on the same field
    pub superseded: u64,
    /// Pending deadlines discarded by navigation
    pub cancelled: u64,
    /// Submissions this field triggered
    pub submissions: u64,
}

/// Summary totals across all fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTotals {
    pub events: u64,
    pub scheduled: u64,
    pub superseded: u64,
    pub cancelled: u64,
    pub submissions: u64,
}

/// Tracks interaction statistics for all fields
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    /// Map from field name to statistics
    stats: HashMap<String, FieldStats>,
}

impl StatsTracker {
    /// Create a new statistics tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event targeting a field
    pub fn record_event(&mut self, field: &str) {
        self.stats.entry(field.to_string()).or_default().events += 1;
    }

    /// Record a debounce deadline being set, replacing an older one or not
    pub fn record_scheduled(&mut self, field: &str, superseded: bool) {
        let entry = self.stats.entry(field.to_string()).or_default();
        entry.scheduled += 1;
        if superseded {
            entry.superseded += 1;
        }
    }

    /// Record a pending deadline discarded by navigation
    pub fn record_cancelled(&mut self, field: &str) {
        self.stats.entry(field.to_string()).or_default().cancelled += 1;
    }

    /// Record a submission triggered by a field
    pub fn record_submission(&mut self, field: &str) {
        self.stats.entry(field.to_string()).or_default().submissions += 1;
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Get access to the stats map for export
    pub fn stats_map(&self) -> &HashMap<String, FieldStats> {
        &self.stats
    }

    /// Sum the counters across all fields
    pub fn totals(&self) -> StatTotals {
        let mut totals = StatTotals {
            events: 0,
            scheduled: 0,
            superseded: 0,
            cancelled: 0,
            submissions: 0,
        };
        for stats in self.stats.values() {
            totals.events += stats.events;
            totals.scheduled += stats.scheduled;
            totals.superseded += stats.superseded;
            totals.cancelled += stats.cancelled;
            totals.submissions += stats.submissions;
        }
        totals
    }

    /// Print the per-field summary table to stderr
    pub fn print_summary(&self) {
        if self.stats.is_empty() {
            eprintln!("No events replayed.");
            return;
        }

        let totals = self.totals();

        // Sort by event count (descending), then by name for stable output
        let mut sorted: Vec<_> = self.stats.iter().collect();
        sorted.sort_by(|a, b| b.1.events.cmp(&a.1.events).then_with(|| a.0.cmp(b.0)));

        let blank_if_zero = |n: u64| {
            if n > 0 {
                n.to_string()
            } else {
                String::new()
            }
        };

        eprintln!("% subs    events scheduled superseded cancelled   submits field");
        eprintln!("------ --------- --------- ---------- --------- --------- ----------------");

        for (name, stats) in sorted {
            let subs_percent = if totals.submissions > 0 {
                (stats.submissions as f64 / totals.submissions as f64) * 100.0
            } else {
                0.0
            };
            eprintln!(
                "{:6.2} {:>9} {:>9} {:>10} {:>9} {:>9} {}",
                subs_percent,
                stats.events,
                blank_if_zero(stats.scheduled),
                blank_if_zero(stats.superseded),
                blank_if_zero(stats.cancelled),
                stats.submissions,
                name
            );
        }

        eprintln!("------ --------- --------- ---------- --------- --------- ----------------");
        let total_percent = if totals.submissions > 0 { 100.0 } else { 0.0 };
        eprintln!(
            "{:6.2} {:>9} {:>9} {:>10} {:>9} {:>9} total",
            total_percent,
            totals.events,
            blank_if_zero(totals.scheduled),
            blank_if_zero(totals.superseded),
            blank_if_zero(totals.cancelled),
            totals.submissions
        );
    }
}
