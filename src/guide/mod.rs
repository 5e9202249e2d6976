//! Guide filtering and live-status engine.
//!
//! Pure transformations from a schedule snapshot plus an optional
//! subscriber into an ordered view, re-annotated with airing status on
//! every clock tick. Nothing in here performs I/O.

mod clock;
mod engine;
mod filter;
mod model;
mod sort;
mod status;
mod time_of_day;

#[cfg(test)]
pub(crate) mod fixtures;

pub(crate) use clock::{Clock, DEFAULT_TICK_INTERVAL, SystemClock};
pub(crate) use engine::{EngineError, GuideEngine, GuideEntry};
pub(crate) use model::{Schedule, ScheduleRow, Service, Subscriber};
pub(crate) use status::{MalformedTimeValue, Status, broadcast_window};
#[cfg(test)]
pub(crate) use clock::ManualClock;
