use super::model::{Schedule, ScheduleRow, Subscriber};

pub(crate) fn row(title: &str, start: &str, end: &str, channel: &str) -> ScheduleRow {
    ScheduleRow {
        title: title.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        channel: channel.to_string(),
        season_number: "1".to_string(),
        episode_number: 1,
        episode_title: String::new(),
        repeat: false,
    }
}

pub(crate) fn maigret_and_vera() -> Schedule {
    Schedule {
        date: None,
        fta: vec![
            row("Vera", "21:00", "22:00", "ABC"),
            row("Maigret", "20:00", "21:00", "ABC"),
        ],
        bbc: vec![row("Death in Paradise", "19:30", "20:30", "UKTV")],
    }
}

pub(crate) fn subscriber(titles: &[&str]) -> Subscriber {
    Subscriber::new(
        "viewer",
        titles.iter().map(|title| title.to_string()).collect(),
    )
}
