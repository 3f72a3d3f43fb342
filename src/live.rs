//! Real-time replay on tokio timers
//!
//! Drives the same engine as the virtual-clock replay, but schedules
//! debounce deadlines on the wall clock and feeds trace events at their
//! recorded offsets.

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Duration, Instant};

use crate::event::FieldEvent;
use crate::form::FilterForm;
use crate::policy::BindingSpec;
use crate::script::Script;
use crate::session::{ReplaySession, SessionReport, Submission};

/// Send trace events into the channel at their recorded offsets
pub async fn feed(events: Vec<FieldEvent>, tx: mpsc::Sender<FieldEvent>) {
    let start = Instant::now();
    for event in events {
        sleep_until(start + Duration::from_millis(event.at_ms)).await;
        if tx.send(event).await.is_err() {
            break;
        }
    }
}

/// Drive a session from an event channel, firing deadlines in real time.
/// Arriving events are stamped with the wall-clock offset. The channel
/// closing ends the interaction; a still-pending deadline runs out before
/// the report is returned.
pub async fn run(
    mut session: ReplaySession,
    mut events: mpsc::Receiver<FieldEvent>,
    mut on_submission: impl FnMut(&Submission),
) -> SessionReport {
    let start = Instant::now();

    loop {
        tokio::select! {
            // events before timers, so an edit at the deadline still postpones
            biased;
            maybe_event = events.recv() => match maybe_event {
                Some(mut event) => {
                    event.at_ms = elapsed_ms(start);
                    for submission in session.dispatch(&event) {
                        on_submission(&submission);
                    }
                }
                None => break,
            },
            _ = deadline_sleep(start, session.next_deadline_ms()) => {
                for submission in session.fire_due(elapsed_ms(start)) {
                    on_submission(&submission);
                }
            }
        }
    }

    while let Some(deadline_ms) = session.next_deadline_ms() {
        sleep_until(start + Duration::from_millis(deadline_ms)).await;
        for submission in session.fire_due(elapsed_ms(start)) {
            on_submission(&submission);
        }
    }

    session.into_report()
}

/// Replay a whole trace in real time
pub async fn replay_live(
    script: Script,
    form: Option<FilterForm>,
    spec: &BindingSpec,
    timing: bool,
    on_submission: impl FnMut(&Submission),
) -> SessionReport {
    let session = ReplaySession::bind(form, spec, timing);
    let (tx, rx) = mpsc::channel(64);
    let feeder = tokio::spawn(feed(script.events, tx));
    let report = run(session, rx, on_submission).await;
    let _ = feeder.await;
    report
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

async fn deadline_sleep(start: Instant, deadline_ms: Option<u64>) {
    match deadline_ms {
        Some(ms) => sleep_until(start + Duration::from_millis(ms)).await,
        None => std::future::pending().await,
    }
}
