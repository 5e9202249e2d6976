use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day '{input}': expected H:MM or HH:MM")]
pub(crate) struct TimeParseError {
    pub(crate) input: String,
}

/// Minute-resolution wall-clock time within a single day.
///
/// Ordering is numeric on (hour, minute), so `2:05` sorts before `10:05`
/// regardless of zero padding in the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub(crate) fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, TimeParseError> {
        let err = || TimeParseError {
            input: raw.to_string(),
        };
        let trimmed = raw.trim();
        let (hour_str, minute_str) = trimmed.split_once(':').ok_or_else(err)?;

        if !(1..=2).contains(&hour_str.len()) || minute_str.len() != 2 {
            return Err(err());
        }
        if !hour_str.bytes().all(|b| b.is_ascii_digit())
            || !minute_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let hour = hour_str.parse::<u8>().map_err(|_| err())?;
        let minute = minute_str.parse::<u8>().map_err(|_| err())?;
        Self::new(hour, minute).ok_or_else(err)
    }

    /// Hour and minute of `instant`, seconds truncated.
    pub(crate) fn of<T: Timelike>(instant: &T) -> Self {
        Self {
            hour: instant.hour() as u8,
            minute: instant.minute() as u8,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
