use std::cmp::Ordering;

use super::model::ScheduleRow;
use super::time_of_day::TimeOfDay;

fn compare_start_times(a: &ScheduleRow, b: &ScheduleRow) -> Ordering {
    match (
        TimeOfDay::parse(&a.start_time),
        TimeOfDay::parse(&b.start_time),
    ) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

/// Ascending by start time, stable for equal times. Rows whose start time
/// does not parse go last in input order.
pub(crate) fn sort_rows(mut rows: Vec<ScheduleRow>) -> Vec<ScheduleRow> {
    rows.sort_by(compare_start_times);
    rows
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::guide::fixtures::row;

    fn titles(rows: &[ScheduleRow]) -> Vec<&str> {
        rows.iter().map(|row| row.title.as_str()).collect()
    }

    #[test]
    fn orders_unpadded_hours_numerically() {
        let sorted = sort_rows(vec![
            row("Late", "10:05", "11:00", "ABC"),
            row("Early", "2:05", "3:00", "SBS"),
            row("Morning", "9:05", "10:00", "Seven"),
        ]);
        assert_eq!(titles(&sorted), ["Early", "Morning", "Late"]);
    }

    #[test]
    fn equal_start_times_keep_input_order() {
        let sorted = sort_rows(vec![
            row("B", "20:00", "21:00", "Nine"),
            row("A", "19:00", "20:00", "ABC"),
            row("C", "20:00", "20:30", "Ten"),
            row("D", "20:00", "22:00", "Seven"),
        ]);
        assert_eq!(titles(&sorted), ["A", "B", "C", "D"]);
    }

    #[test]
    fn unparseable_start_times_sort_last() {
        let sorted = sort_rows(vec![
            row("Unknown", "TBA", "21:00", "ABC"),
            row("Later", "21:00", "22:00", "ABC"),
            row("Blank", "", "", "SBS"),
            row("Sooner", "6:00", "7:00", "SBS"),
        ]);
        assert_eq!(titles(&sorted), ["Sooner", "Later", "Unknown", "Blank"]);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<ScheduleRow>> {
        prop::collection::vec((0u8..24, prop::sample::select(vec![0u8, 15, 30, 45])), 0..30)
            .prop_map(|times| {
                times
                    .into_iter()
                    .enumerate()
                    .map(|(idx, (hour, minute))| {
                        row(
                            &format!("show-{idx}"),
                            &format!("{hour}:{minute:02}"),
                            "23:59",
                            &format!("CH{idx}"),
                        )
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn sort_is_idempotent(rows in arb_rows()) {
            let once = sort_rows(rows);
            prop_assert_eq!(sort_rows(once.clone()), once);
        }

        #[test]
        fn sort_is_ordered_and_stable(rows in arb_rows()) {
            let sorted = sort_rows(rows);
            for pair in sorted.windows(2) {
                let left = TimeOfDay::parse(&pair[0].start_time).unwrap();
                let right = TimeOfDay::parse(&pair[1].start_time).unwrap();
                prop_assert!(left <= right);
                if left == right {
                    // Titles carry the input index, so equal keys must stay ascending.
                    let index = |title: &str| title["show-".len()..].parse::<usize>().unwrap();
                    prop_assert!(index(&pair[0].title) < index(&pair[1].title));
                }
            }
        }
    }
}
