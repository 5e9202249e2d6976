use std::sync::mpsc;

use ratatui::widgets::TableState;
use tracing::warn;

use crate::guide::{Clock, EngineError, GuideEngine, Schedule, Service, Status, Subscriber};
use crate::http::RetryPolicy;
use crate::source::{FetchError, GuideLocation, load_schedule};

pub(super) type FetchResult = Result<Schedule, FetchError>;

pub(super) fn spawn_guide_fetch(location: &GuideLocation, tx: &mpsc::Sender<FetchResult>) {
    let location = location.clone();
    let tx = tx.clone();
    std::thread::spawn(move || {
        let result = load_schedule(&location, &RetryPolicy::default());
        let _ = tx.send(result);
    });
}

/// Latest finished fetch, if any completed since the last call.
pub(super) fn drain_fetch_results(rx: &mpsc::Receiver<FetchResult>) -> Option<FetchResult> {
    let mut latest = None;
    while let Ok(result) = rx.try_recv() {
        latest = Some(result);
    }
    latest
}

/// Applies a fetch outcome. Failures keep the last known schedule.
pub(super) fn apply_fetch_result(schedule: &mut Option<Schedule>, result: FetchResult) -> String {
    match result {
        Ok(fresh) => {
            let message = if fresh.is_empty() {
                status_info("Guide loaded, but it has no programmes today.")
            } else {
                status_info(&format!(
                    "Guide loaded: {} free-to-air, {} BBC programmes.",
                    fresh.fta.len(),
                    fresh.bbc.len()
                ))
            };
            *schedule = Some(fresh);
            message
        }
        Err(err) => {
            warn!(error = %err, "guide fetch failed, keeping last known guide");
            let kept = if schedule.is_some() {
                " Showing last loaded guide."
            } else {
                ""
            };
            status_error(&format!("{err}.{kept}"))
        }
    }
}

/// Re-derives the view from the current snapshot and keeps the selection on
/// the same row key when it survives.
pub(super) fn recompute_view<C: Clock>(
    engine: &mut GuideEngine<C>,
    schedule: Option<&Schedule>,
    service: Service,
    subscriber: Option<&Subscriber>,
    table_state: &mut TableState,
) -> Result<(), EngineError> {
    let preferred_key = table_state
        .selected()
        .and_then(|idx| engine.entries().get(idx))
        .map(|entry| entry.key.clone());

    let entries = engine.compute(schedule, service, subscriber)?;
    if entries.is_empty() {
        table_state.select(None);
        return Ok(());
    }

    if let Some(key) = preferred_key
        && let Some(idx) = entries.iter().position(|entry| entry.key == key)
    {
        table_state.select(Some(idx));
        return Ok(());
    }

    let first_live = entries
        .iter()
        .position(|entry| entry.status != Status::Finished)
        .unwrap_or(0);
    table_state.select(Some(first_live));
    Ok(())
}

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}
