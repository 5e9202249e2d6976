use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::guide::{MalformedTimeValue, Schedule, ScheduleRow, broadcast_window};
use crate::http::{HttpError, RetryPolicy, get_text_with_retries};

/// Where today's schedule comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideLocation {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for GuideLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("guide request failed: {0}")]
    Http(#[from] HttpError),
    #[error("failed to read guide file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("guide payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub(crate) fn parse_schedule(raw: &str) -> Result<Schedule, FetchError> {
    let schedule: Schedule = serde_json::from_str(raw)?;
    for key in duplicate_keys(&schedule.fta).chain(duplicate_keys(&schedule.bbc)) {
        warn!(%key, "duplicate channel/start time in guide");
    }
    for err in malformed_windows(&schedule.fta).chain(malformed_windows(&schedule.bbc)) {
        warn!(key = %err.key, field = err.field, value = %err.source.input, "{err}");
    }
    Ok(schedule)
}

// Rows that will stay unclassified for the life of the snapshot.
fn malformed_windows(rows: &[ScheduleRow]) -> impl Iterator<Item = MalformedTimeValue> + '_ {
    rows.iter().filter_map(|row| broadcast_window(row).err())
}

fn duplicate_keys(rows: &[ScheduleRow]) -> impl Iterator<Item = String> + '_ {
    let mut seen = HashSet::new();
    rows.iter()
        .map(ScheduleRow::key)
        .filter(move |key| !seen.insert(key.clone()))
}

pub(crate) fn load_schedule(
    location: &GuideLocation,
    policy: &RetryPolicy,
) -> Result<Schedule, FetchError> {
    let raw = match location {
        GuideLocation::Url(url) => get_text_with_retries(url, policy)?,
        GuideLocation::File(path) => {
            std::fs::read_to_string(path).map_err(|source| FetchError::Read {
                path: path.clone(),
                source,
            })?
        }
    };
    let schedule = parse_schedule(&raw)?;
    info!(
        source = %location,
        fta = schedule.fta.len(),
        bbc = schedule.bbc.len(),
        "loaded guide"
    );
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::http::tests::{Behavior, TestServer, fast_policy};

    const GUIDE: &str = r#"{
        "date": "18/10/2026",
        "FTA": [
            {"title":"Maigret","start_time":"20:00","end_time":"21:00","channel":"ABC","season_number":1,"episode_number":2,"episode_title":"","repeat":false},
            {"title":"Vera","start_time":"21:00","end_time":"22:00","channel":"ABC","season_number":"Unknown","episode_number":1,"episode_title":"Blind Spot","repeat":true}
        ],
        "BBC": []
    }"#;

    #[test]
    fn loads_guide_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(GUIDE.as_bytes()).expect("write guide");

        let schedule = load_schedule(
            &GuideLocation::File(file.path().to_path_buf()),
            &RetryPolicy::default(),
        )
        .expect("guide loads");
        assert_eq!(schedule.fta.len(), 2);
        assert_eq!(schedule.fta[1].episode_title, "Blind Spot");
        assert!(schedule.bbc.is_empty());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let err = load_schedule(&GuideLocation::File(path.clone()), &RetryPolicy::default())
            .expect_err("missing file");
        assert!(matches!(err, FetchError::Read { path: p, .. } if p == path));
    }

    #[test]
    fn loads_guide_over_http() {
        let server = TestServer::spawn(vec![
            Behavior::Respond(503, "warming up".to_string()),
            Behavior::Respond(200, GUIDE.to_string()),
        ]);

        let schedule = load_schedule(&GuideLocation::Url(server.base_url.clone()), &fast_policy(2))
            .expect("guide loads");
        assert_eq!(schedule.fta[0].title, "Maigret");
        assert_eq!(server.request_count(), 2);
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        assert!(matches!(
            parse_schedule("<html>maintenance</html>"),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn finds_duplicate_row_keys() {
        let schedule = parse_schedule(
            r#"{"fta":[
                {"title":"A","start_time":"20:00","end_time":"21:00","channel":"ABC"},
                {"title":"B","start_time":"20:00","end_time":"20:30","channel":"ABC"},
                {"title":"C","start_time":"20:00","end_time":"21:00","channel":"SBS"}
            ]}"#,
        )
        .expect("duplicates are tolerated");
        assert_eq!(duplicate_keys(&schedule.fta).collect::<Vec<_>>(), ["ABC-20:00"]);
    }

    #[test]
    fn odd_metadata_in_one_row_keeps_the_rest_of_the_guide() {
        let schedule = parse_schedule(
            r#"{"fta":[
                {"title":"Maigret","start_time":"20:00","end_time":"21:00","channel":"ABC","season_number":1,"episode_number":2},
                {"title":"Vera","start_time":"21:00","end_time":"22:00","channel":"ABC","season_number":-1,"episode_number":null,"episode_title":null}
            ],"bbc":[
                {"title":"Lewis","start_time":"9:30","end_time":"10:30","channel":"UKTV","season_number":"","episode_number":""}
            ]}"#,
        )
        .expect("guide loads despite odd metadata");

        assert_eq!(schedule.fta.len(), 2);
        assert_eq!(schedule.fta[0].episode_number, 2);
        assert_eq!(schedule.fta[1].title, "Vera");
        assert_eq!(schedule.fta[1].season_number, "Unknown");
        assert_eq!(schedule.fta[1].episode_number, 0);
        assert_eq!(schedule.bbc[0].episode_number, 0);
    }

    #[test]
    fn malformed_windows_are_reported_once_per_row() {
        let schedule = parse_schedule(
            r#"{"fta":[
                {"title":"Maigret","start_time":"20:00","end_time":"21:00","channel":"ABC"},
                {"title":"Mystery","start_time":"20:00","end_time":"later","channel":"SBS"},
                {"title":"Late","start_time":"TBA","end_time":"23:00","channel":"SBS"}
            ]}"#,
        )
        .expect("malformed windows are tolerated");

        let reported: Vec<_> = malformed_windows(&schedule.fta)
            .map(|err| (err.key, err.field))
            .collect();
        assert_eq!(
            reported,
            [
                ("SBS-20:00".to_string(), "end_time"),
                ("SBS-TBA".to_string(), "start_time"),
            ]
        );
    }
}
