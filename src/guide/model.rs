use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One broadcast slot as delivered by the guide endpoint.
///
/// Only the title, window and channel are required. Episode metadata is
/// display-only and decodes leniently so one odd row never rejects the
/// whole guide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ScheduleRow {
    pub(crate) title: String,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) channel: String,
    #[serde(default, deserialize_with = "season_label")]
    pub(crate) season_number: String,
    #[serde(default, deserialize_with = "episode_index")]
    pub(crate) episode_number: u32,
    #[serde(default, deserialize_with = "plain_text")]
    pub(crate) episode_title: String,
    #[serde(default, deserialize_with = "flag")]
    pub(crate) repeat: bool,
}

impl ScheduleRow {
    /// Stable identity for list diffing. Unique per snapshot.
    pub(crate) fn key(&self) -> String {
        format!("{}-{}", self.channel, self.start_time)
    }
}

const UNKNOWN_SEASON: &str = "Unknown";

// Seasons arrive as numbers, as labels such as "Unknown", or as -1 when the
// backend could not work one out.
fn season_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => match n.as_i64() {
            Some(season) if season >= 0 => season.to_string(),
            Some(_) => UNKNOWN_SEASON.to_string(),
            None => n.to_string(),
        },
        Value::String(label) => match label.trim().parse::<i64>() {
            Ok(season) if season < 0 => UNKNOWN_SEASON.to_string(),
            _ => label.trim().to_string(),
        },
        _ => String::new(),
    })
}

// Missing, null, blank, negative or non-numeric episodes all become 0.
fn episode_index<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
        Value::String(raw) => raw.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn plain_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        Value::String(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        ),
        _ => false,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct Schedule {
    #[serde(default)]
    pub(crate) date: Option<String>,
    #[serde(default, alias = "FTA")]
    pub(crate) fta: Vec<ScheduleRow>,
    #[serde(default, alias = "BBC")]
    pub(crate) bbc: Vec<ScheduleRow>,
}

impl Schedule {
    pub(crate) fn rows(&self, service: Service) -> Cow<'_, [ScheduleRow]> {
        match service {
            Service::Fta => Cow::Borrowed(&self.fta),
            Service::Bbc => Cow::Borrowed(&self.bbc),
            Service::All => Cow::Owned(self.fta.iter().chain(&self.bbc).cloned().collect()),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fta.is_empty() && self.bbc.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Service {
    Fta,
    Bbc,
    #[default]
    All,
}

impl Service {
    pub(crate) const ALL: [Self; 3] = [Self::Fta, Self::Bbc, Self::All];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Fta => "FREE TO AIR",
            Self::Bbc => "BBC CHANNELS",
            Self::All => "ALL",
        }
    }

    pub(crate) fn move_left(self) -> Self {
        match self {
            Self::Fta => Self::Fta,
            Self::Bbc => Self::Fta,
            Self::All => Self::Bbc,
        }
    }

    pub(crate) fn move_right(self) -> Self {
        match self {
            Self::Fta => Self::Bbc,
            Self::Bbc => Self::All,
            Self::All => Self::All,
        }
    }
}

/// A viewer and the show titles they follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subscriber {
    pub(crate) viewer: String,
    pub(crate) titles: Vec<String>,
}

impl Subscriber {
    pub(crate) fn new(viewer: impl Into<String>, titles: Vec<String>) -> Self {
        Self {
            viewer: viewer.into(),
            titles,
        }
    }
}
