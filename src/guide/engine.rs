use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, info};

use super::clock::Clock;
use super::filter::filter_rows;
use super::model::{Schedule, ScheduleRow, Service, Subscriber};
use super::sort::sort_rows;
use super::status::{Status, broadcast_window, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum EngineError {
    #[error("guide engine used before start")]
    NotStarted,
    #[error("guide engine used after teardown")]
    TornDown,
}

/// A row of the derived view with its live status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GuideEntry {
    pub(crate) key: String,
    pub(crate) row: ScheduleRow,
    pub(crate) status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    TornDown,
}

/// Derives the ordered, status-annotated guide view.
///
/// Snapshot changes go through [`GuideEngine::compute`], which filters and
/// sorts. Clock ticks go through [`GuideEngine::tick`], which only
/// re-classifies the rows already in place.
pub(crate) struct GuideEngine<C: Clock> {
    clock: C,
    interval: Duration,
    lifecycle: Lifecycle,
    rows: Vec<ScheduleRow>,
    entries: Vec<GuideEntry>,
    instant: DateTime<Tz>,
    day: NaiveDate,
    classifications: u64,
}

impl<C: Clock> GuideEngine<C> {
    pub(crate) fn new(clock: C, interval: Duration) -> Self {
        let instant = clock.now();
        Self {
            clock,
            interval,
            lifecycle: Lifecycle::Idle,
            rows: Vec::new(),
            entries: Vec::new(),
            instant,
            day: instant.date_naive(),
            classifications: 0,
        }
    }

    pub(crate) fn start(&mut self) -> Result<(), EngineError> {
        match self.lifecycle {
            Lifecycle::TornDown => return Err(EngineError::TornDown),
            Lifecycle::Running => return Ok(()),
            Lifecycle::Idle => {}
        }
        self.clock.start(self.interval);
        self.instant = self.clock.now();
        self.lifecycle = Lifecycle::Running;
        info!(interval_secs = self.interval.as_secs(), instant = %self.instant, "guide engine started");
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        match self.lifecycle {
            Lifecycle::Running => Ok(()),
            Lifecycle::Idle => Err(EngineError::NotStarted),
            Lifecycle::TornDown => Err(EngineError::TornDown),
        }
    }

    /// Replaces the snapshot. A missing schedule yields an empty view
    /// without classifying anything.
    pub(crate) fn compute(
        &mut self,
        schedule: Option<&Schedule>,
        service: Service,
        subscriber: Option<&Subscriber>,
    ) -> Result<&[GuideEntry], EngineError> {
        self.ensure_running()?;

        let Some(schedule) = schedule else {
            debug!("no schedule loaded yet");
            self.rows.clear();
            self.entries.clear();
            return Ok(&self.entries);
        };

        let raw = schedule.rows(service);
        self.rows = sort_rows(filter_rows(&raw, subscriber));
        debug!(
            service = service.label(),
            raw = raw.len(),
            kept = self.rows.len(),
            filtered = subscriber.is_some(),
            "recomputed guide rows"
        );
        self.instant = self.clock.now();
        self.day = self.instant.date_naive();
        self.classify_all();
        Ok(&self.entries)
    }

    /// Polls the clock and re-classifies on a tick. Returns whether the
    /// view changed instant.
    pub(crate) fn tick(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }
        let Some(instant) = self.clock.poll_tick() else {
            return false;
        };
        self.instant = instant;
        if !self.rows.is_empty() {
            self.classify_all();
        }
        debug!(instant = %instant, rows = self.rows.len(), "clock tick");
        true
    }

    // Once the clock passes midnight the snapshot describes yesterday, so
    // every readable row is over. Statuses only ever move forward.
    fn classify_all(&mut self) {
        let instant = self.instant;
        let rolled_over = instant.date_naive() > self.day;
        if rolled_over {
            debug!(day = %self.day, %instant, "guide snapshot is from a previous day");
        }
        self.entries = self
            .rows
            .iter()
            .map(|row| GuideEntry {
                key: row.key(),
                status: if !rolled_over {
                    classify(row, &instant)
                } else if broadcast_window(row).is_ok() {
                    Status::Finished
                } else {
                    Status::Unclassified
                },
                row: row.clone(),
            })
            .collect();
        self.classifications += 1;
        debug!(pass = self.classifications, rows = self.entries.len(), "classified guide rows");
    }

    pub(crate) fn entries(&self) -> &[GuideEntry] {
        &self.entries
    }

    pub(crate) fn instant(&self) -> DateTime<Tz> {
        self.instant
    }

    /// Number of classification passes run so far.
    #[cfg(test)]
    pub(crate) fn classifications(&self) -> u64 {
        self.classifications
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Stops the clock and drops the derived view. Idempotent.
    pub(crate) fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.clock.stop();
        self.rows.clear();
        self.entries.clear();
        self.lifecycle = Lifecycle::TornDown;
        info!("guide engine torn down");
    }
}

impl<C: Clock> Drop for GuideEngine<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
