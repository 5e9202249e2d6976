use chrono::DateTime;
use chrono_tz::Tz;

use crate::guide::{ScheduleRow, Status};

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

pub(crate) fn episode_label(row: &ScheduleRow) -> String {
    let season = row.season_number.trim();
    match (season.is_empty(), row.episode_number) {
        (true, 0) => "-".to_string(),
        (true, episode) => format!("E{episode}"),
        (false, 0) => format!("S{season}"),
        (false, episode) if season.parse::<u32>().is_ok() => format!("S{season} E{episode}"),
        (false, episode) => format!("{season} E{episode}"),
    }
}

pub(crate) fn status_label(status: Status) -> String {
    status
        .class_name()
        .map(str::to_ascii_uppercase)
        .unwrap_or_default()
}

/// One-line summary, e.g. `20:00: Vera is on ABC (Season 3, Episode 2: Blind Spot) (Repeat)`.
pub(crate) fn describe_row(row: &ScheduleRow) -> String {
    let mut message = format!("{}: {} is on {}", row.start_time, row.title, row.channel);
    if !row.season_number.is_empty() || row.episode_number != 0 {
        message.push_str(&format!(
            " (Season {}, Episode {}",
            if row.season_number.is_empty() {
                "Unknown"
            } else {
                row.season_number.as_str()
            },
            row.episode_number
        ));
        if !row.episode_title.is_empty() {
            message.push_str(&format!(": {}", row.episode_title));
        }
        message.push(')');
    }
    if row.repeat {
        message.push_str(" (Repeat)");
    }
    message
}

pub(crate) fn format_instant(instant: &DateTime<Tz>) -> String {
    instant.format("%a %d %b %H:%M %Z").to_string()
}

/// Renders an RFC 3339 timestamp on the guide's timezone, falling back to
/// the raw value.
pub(crate) fn format_added_at(raw: &str, tz: Tz) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
