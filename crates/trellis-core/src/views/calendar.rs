//! Day buckets for the calendar view. A task can occur on several days:
//! its start, its end, and every day of the closed interval between them.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::task::Task;

/// Whether `task` belongs on `date`: start == date, end == date, or the
/// date falls inside the closed `[start, end]` interval when both bounds
/// are present. Tasks without either date never appear on the calendar.
pub fn occurs_on(task: &Task, date: NaiveDate) -> bool {
    match (task.start_date, task.end_date) {
        (Some(start), Some(end)) => start <= date && date <= end,
        (Some(start), None) => start == date,
        (None, Some(end)) => end == date,
        (None, None) => false,
    }
}

pub fn tasks_on<'a>(tasks: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
    tasks.iter().filter(|task| occurs_on(task, date)).collect()
}

/// One bucket per day of the given month, empty days included, for a
/// month-grid rendering. An invalid month yields an empty map.
pub fn month_buckets(tasks: &[Task], year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&Task>> {
    let mut buckets = BTreeMap::new();
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return buckets;
    };

    let mut day = first;
    while day.month() == month {
        buckets.insert(day, tasks_on(tasks, day));
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{month_buckets, occurs_on, tasks_on};
    use crate::task::{Category, Task, TaskDraft};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spanning(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Task {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Task::new(
            TaskDraft {
                title: "span".to_string(),
                description: String::new(),
                priority: Default::default(),
                category: Category::Integration,
                dependency: None,
                start_date: start,
                end_date: end,
            },
            now,
        )
        .unwrap()
    }

    #[test]
    fn interval_covers_every_day_inclusive() {
        let task = spanning(Some(date(2025, 1, 1)), Some(date(2025, 1, 3)));
        assert!(occurs_on(&task, date(2025, 1, 1)));
        assert!(occurs_on(&task, date(2025, 1, 2)));
        assert!(occurs_on(&task, date(2025, 1, 3)));
        assert!(!occurs_on(&task, date(2024, 12, 31)));
        assert!(!occurs_on(&task, date(2025, 1, 4)));
    }

    #[test]
    fn single_sided_dates_mark_exactly_one_day() {
        let started = spanning(Some(date(2025, 2, 10)), None);
        assert!(occurs_on(&started, date(2025, 2, 10)));
        assert!(!occurs_on(&started, date(2025, 2, 11)));

        let due = spanning(None, Some(date(2025, 2, 20)));
        assert!(occurs_on(&due, date(2025, 2, 20)));
        assert!(!occurs_on(&due, date(2025, 2, 19)));
    }

    #[test]
    fn dateless_tasks_never_appear() {
        let task = spanning(None, None);
        assert!(tasks_on(&[task], date(2025, 1, 1)).is_empty());
    }

    #[test]
    fn month_grid_has_every_day_and_only_that_month() {
        let task = spanning(Some(date(2025, 1, 30)), Some(date(2025, 2, 2)));
        let buckets = month_buckets(std::slice::from_ref(&task), 2025, 2);

        assert_eq!(buckets.len(), 28);
        assert_eq!(buckets[&date(2025, 2, 1)].len(), 1);
        assert_eq!(buckets[&date(2025, 2, 2)].len(), 1);
        assert!(buckets[&date(2025, 2, 3)].is_empty());
        assert!(!buckets.contains_key(&date(2025, 1, 31)));
    }

    #[test]
    fn invalid_month_yields_an_empty_grid() {
        assert!(month_buckets(&[], 2025, 13).is_empty());
    }
}
