use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

use crate::cli::GlobalArgs;
use crate::source::GuideLocation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown timezone '{0}' (expected an IANA name such as Australia/Sydney)")]
    InvalidTimezone(String),
    #[error("tick interval must be at least one second")]
    InvalidTickInterval,
    #[error("viewer name must not be empty")]
    EmptyViewer,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub location: Option<GuideLocation>,
    pub timezone: Tz,
    pub tick_interval: Duration,
    pub viewer: Option<String>,
    pub filter_by_subscriptions: bool,
}

impl Config {
    pub fn from_args(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let timezone = Tz::from_str(args.timezone.trim())
            .map_err(|_| ConfigError::InvalidTimezone(args.timezone.clone()))?;

        if args.tick_secs == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }

        let viewer = match args.viewer.as_deref().map(str::trim) {
            Some("") => return Err(ConfigError::EmptyViewer),
            Some(name) => Some(name.to_string()),
            None => None,
        };

        // A local file wins over the network endpoint.
        let location = match (&args.guide_file, &args.guide_url) {
            (Some(path), _) => Some(GuideLocation::File(PathBuf::from(path))),
            (None, Some(url)) if !url.trim().is_empty() => {
                Some(GuideLocation::Url(url.trim().to_string()))
            }
            _ => None,
        };

        Ok(Self {
            location,
            timezone,
            tick_interval: Duration::from_secs(args.tick_secs),
            filter_by_subscriptions: viewer.is_some() && !args.all,
            viewer,
        })
    }
}
