use chrono::Timelike;
use thiserror::Error;
use tracing::debug;

use super::model::ScheduleRow;
use super::time_of_day::{TimeOfDay, TimeParseError};

/// Live broadcast state of a row relative to the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Airing,
    Finished,
    /// Not started yet, or the row's window could not be read.
    Unclassified,
}

impl Status {
    pub(crate) fn class_name(self) -> Option<&'static str> {
        match self {
            Self::Airing => Some("airing"),
            Self::Finished => Some("finished"),
            Self::Unclassified => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {key} has malformed {field}")]
pub(crate) struct MalformedTimeValue {
    pub(crate) key: String,
    pub(crate) field: &'static str,
    #[source]
    pub(crate) source: TimeParseError,
}

/// Parsed `[start, end]` of a row.
pub(crate) fn broadcast_window(
    row: &ScheduleRow,
) -> Result<(TimeOfDay, TimeOfDay), MalformedTimeValue> {
    let parse = |raw: &str, field| {
        TimeOfDay::parse(raw).map_err(|source| MalformedTimeValue {
            key: row.key(),
            field,
            source,
        })
    };
    Ok((
        parse(&row.start_time, "start_time")?,
        parse(&row.end_time, "end_time")?,
    ))
}

/// Classifies `row` against the time of day of `instant`. The window is
/// `[start, end]` inclusive at both ends and resolved to the minute.
pub(crate) fn try_classify<T: Timelike>(
    row: &ScheduleRow,
    instant: &T,
) -> Result<Status, MalformedTimeValue> {
    let (start, end) = broadcast_window(row)?;
    if end < start {
        // Cross-midnight windows are not interpreted; compare literally.
        debug!(key = %row.key(), %start, %end, "inverted broadcast window");
    }

    let now = TimeOfDay::of(instant);
    Ok(if now > end {
        Status::Finished
    } else if now >= start {
        Status::Airing
    } else {
        Status::Unclassified
    })
}

/// Like [`try_classify`], but a malformed row is left unclassified instead
/// of failing. The warning for it is emitted once, when the snapshot is
/// parsed.
pub(crate) fn classify<T: Timelike>(row: &ScheduleRow, instant: &T) -> Status {
    match try_classify(row, instant) {
        Ok(status) => status,
        Err(err) => {
            debug!(key = %err.key, field = err.field, value = %err.source.input, "{err}");
            Status::Unclassified
        }
    }
}
