//! Property-based tests for the parsers, the query serialization, and the
//! single-pending-deadline invariant of the debounce engine.

use proptest::prelude::*;

use criba::debounce::DebounceTimer;
use criba::event::FieldEvent;
use criba::form::{FilterForm, FormField};
use criba::pages::Page;
use criba::policy::{BindingSpec, TriggerPolicy, DEFAULT_DEBOUNCE_MS};
use criba::script::Script;
use criba::session::{replay, ReplaySession};

fn typing_script(times: &[u64]) -> Script {
    Script {
        page: Some(Page::Areas),
        form: None,
        delay_ms: None,
        events: times
            .iter()
            .enumerate()
            .map(|(i, &at_ms)| FieldEvent::input(at_ms, "q", &"x".repeat(i + 1)))
            .collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_arbitrary_expr_never_panics(expr in "\\PC*") {
        let _ = BindingSpec::from_expr(&expr, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn prop_valid_expr_round_trips(
        rules in prop::collection::vec(
            ("[a-z][a-z0-9_]{0,7}", 0usize..3, 1u64..10_000),
            1..6
        )
    ) {
        // dedupe field names up front; the parser rejects duplicates
        let mut seen = std::collections::HashSet::new();
        let rules: Vec<_> = rules
            .into_iter()
            .filter(|(field, _, _)| seen.insert(field.clone()))
            .collect();

        let expr = format!(
            "bind={}",
            rules
                .iter()
                .map(|(field, kind, delay)| match kind {
                    0 => format!("{field}:debounce:{delay}"),
                    1 => format!("{field}:change"),
                    _ => format!("{field}:enter"),
                })
                .collect::<Vec<_>>()
                .join(",")
        );

        let spec = BindingSpec::from_expr(&expr, DEFAULT_DEBOUNCE_MS).unwrap();
        prop_assert_eq!(spec.rules.len(), rules.len());
        for (field, kind, delay) in &rules {
            let expected = match kind {
                0 => TriggerPolicy::DebouncedInput { delay_ms: *delay },
                1 => TriggerPolicy::Change,
                _ => TriggerPolicy::EnterKey,
            };
            prop_assert_eq!(spec.rule_for(field).unwrap().policy, expected);
        }
    }

    #[test]
    fn prop_query_string_round_trips(
        values in prop::collection::vec("[ -~]{0,24}", 1..5)
    ) {
        let mut form = FilterForm::new("filtersForm", "/areas/");
        for (i, value) in values.iter().enumerate() {
            form = form.with_field(FormField::text(&format!("f{i}")).with_value(value));
        }

        let decoded: Vec<(String, String)> =
            serde_urlencoded::from_str(&form.query_string()).unwrap();
        let expected: Vec<(String, String)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("f{i}"), v.clone()))
            .collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn prop_at_most_one_pending_deadline(
        gaps in prop::collection::vec(0u64..2_000, 1..40)
    ) {
        let mut session = ReplaySession::bind(
            Some(Page::Areas.default_form()),
            &Page::Areas.binding_spec(DEFAULT_DEBOUNCE_MS),
            false,
        );

        let mut now = 0u64;
        for (i, gap) in gaps.iter().enumerate() {
            now += gap;
            session.dispatch(&FieldEvent::input(now, "q", &"x".repeat(i + 1)));
            // rapid input strictly replaces, never stacks
            prop_assert_eq!(session.next_deadline_ms(), Some(now + DEFAULT_DEBOUNCE_MS));
        }
    }

    #[test]
    fn prop_submission_count_matches_quiet_gaps(
        gaps in prop::collection::vec(1u64..2_000, 1..40)
    ) {
        let mut times = Vec::with_capacity(gaps.len() + 1);
        let mut now = 0u64;
        times.push(now);
        for gap in &gaps {
            now += gap;
            times.push(now);
        }

        let script = typing_script(&times);
        let spec = Page::Areas.binding_spec(DEFAULT_DEBOUNCE_MS);
        let form = script.form_candidate(None);
        let report = replay(&script, form, &spec, false);

        // a deadline survives only a gap strictly longer than the window
        // (an event landing exactly on the deadline still postpones it),
        // plus the trailing deadline after the last event
        let quiet_gaps = gaps.iter().filter(|&&gap| gap > DEFAULT_DEBOUNCE_MS).count();
        prop_assert_eq!(report.submissions.len(), quiet_gaps + 1);
    }

    #[test]
    fn prop_timer_schedule_is_cancel_then_set(
        times in prop::collection::vec(0u64..1_000_000, 1..50)
    ) {
        let mut timer = DebounceTimer::new(DEFAULT_DEBOUNCE_MS);
        for &now in &times {
            timer.schedule(now);
            prop_assert_eq!(timer.deadline(), Some(now + DEFAULT_DEBOUNCE_MS));
        }
        prop_assert!(timer.cancel().is_some());
        prop_assert!(!timer.is_pending());
    }

    #[test]
    fn prop_arbitrary_trace_json_never_panics(json in "\\PC{0,256}") {
        if let Ok(script) = Script::from_json(&json) {
            let page = script.page.unwrap_or(Page::Areas);
            let spec = page.binding_spec(DEFAULT_DEBOUNCE_MS);
            let form = script.form_candidate(None);
            let _ = replay(&script, form, &spec, false);
        }
    }
}
