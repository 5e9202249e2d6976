use std::collections::HashSet;

use super::model::{ScheduleRow, Subscriber};

/// Narrows `rows` to the subscriber's titles. Matching is exact and
/// case-sensitive. Without a subscriber the input comes back unchanged.
pub(crate) fn filter_rows(rows: &[ScheduleRow], subscriber: Option<&Subscriber>) -> Vec<ScheduleRow> {
    let Some(subscriber) = subscriber else {
        return rows.to_vec();
    };

    let titles: HashSet<&str> = subscriber.titles.iter().map(String::as_str).collect();
    rows.iter()
        .filter(|row| titles.contains(row.title.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::guide::fixtures::{maigret_and_vera, row, subscriber};

    #[test]
    fn keeps_only_subscribed_titles() {
        let schedule = maigret_and_vera();
        let filtered = filter_rows(&schedule.fta, Some(&subscriber(&["Maigret"])));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Maigret");
    }

    #[test]
    fn absent_subscriber_is_identity() {
        let schedule = maigret_and_vera();
        assert_eq!(filter_rows(&schedule.fta, None), schedule.fta);
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let rows = vec![
            row("Maigret", "20:00", "21:00", "ABC"),
            row("maigret", "21:00", "22:00", "ABC"),
            row("Maigret's Christmas", "22:00", "23:00", "ABC"),
        ];
        let filtered = filter_rows(&rows, Some(&subscriber(&["Maigret"])));

        assert_eq!(filtered, vec![rows[0].clone()]);
    }

    #[test]
    fn no_matching_titles_yields_empty_list() {
        let schedule = maigret_and_vera();
        assert!(filter_rows(&schedule.fta, Some(&subscriber(&["Lewis"]))).is_empty());
        assert!(filter_rows(&schedule.fta, Some(&subscriber(&[]))).is_empty());
    }

    fn arb_rows() -> impl Strategy<Value = Vec<ScheduleRow>> {
        prop::collection::vec(
            (prop::sample::select(vec!["Vera", "Maigret", "Lewis", "Grantchester"]), 0u8..24),
            0..20,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(idx, (title, hour))| {
                    row(title, &format!("{hour}:00"), &format!("{hour}:30"), &format!("CH{idx}"))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn filtered_titles_are_always_subscribed(
            rows in arb_rows(),
            titles in prop::collection::vec(prop::sample::select(vec!["Vera", "Maigret", "Lewis"]), 0..3),
        ) {
            let sub = subscriber(&titles);
            let filtered = filter_rows(&rows, Some(&sub));

            prop_assert!(filtered.iter().all(|row| titles.contains(&row.title.as_str())));
            prop_assert_eq!(
                filtered.len(),
                rows.iter().filter(|row| titles.contains(&row.title.as_str())).count()
            );
        }

        #[test]
        fn filter_without_subscriber_preserves_input(rows in arb_rows()) {
            prop_assert_eq!(filter_rows(&rows, None), rows);
        }
    }
}
