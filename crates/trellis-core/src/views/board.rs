//! Status buckets shared by the kanban board, list, and table views.

use std::collections::BTreeMap;

use crate::task::{Status, Task};

/// Groups tasks by status. Every lane is present (possibly empty) and
/// tasks keep the canonical set's order within their lane.
pub fn group_by_status(tasks: &[Task]) -> BTreeMap<Status, Vec<&Task>> {
    let mut lanes: BTreeMap<Status, Vec<&Task>> = Status::LANES
        .iter()
        .map(|status| (*status, Vec::new()))
        .collect();
    for task in tasks {
        lanes.entry(task.status).or_default().push(task);
    }
    lanes
}

/// A single lane, for views that render one bucket at a time.
pub fn lane(tasks: &[Task], status: Status) -> Vec<&Task> {
    tasks.iter().filter(|task| task.status == status).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{group_by_status, lane};
    use crate::task::{Category, Status, Task, TaskDraft, TaskPatch};

    fn task(title: &str, status: Status) -> Task {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut task = Task::new(
            TaskDraft {
                title: title.to_string(),
                description: String::new(),
                priority: Default::default(),
                category: Category::Foundation,
                dependency: None,
                start_date: None,
                end_date: None,
            },
            now,
        )
        .unwrap();
        task.apply_patch(TaskPatch::status(status), now).unwrap();
        task
    }

    #[test]
    fn groups_preserve_canonical_order() {
        let tasks = vec![
            task("first", Status::Todo),
            task("doing", Status::InProgress),
            task("second", Status::Todo),
        ];
        let lanes = group_by_status(&tasks);

        let todo: Vec<_> = lanes[&Status::Todo].iter().map(|t| t.title.as_str()).collect();
        assert_eq!(todo, vec!["first", "second"]);
        assert_eq!(lanes[&Status::InProgress].len(), 1);
        assert!(lanes[&Status::Completed].is_empty());
    }

    #[test]
    fn grouping_is_idempotent() {
        let tasks = vec![
            task("a", Status::Todo),
            task("b", Status::Completed),
            task("c", Status::InProgress),
        ];
        let first = group_by_status(&tasks);
        let second = group_by_status(&tasks);
        for status in Status::LANES {
            let a: Vec<_> = first[&status].iter().map(|t| t.id).collect();
            let b: Vec<_> = second[&status].iter().map(|t| t.id).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn lane_matches_the_grouped_bucket() {
        let tasks = vec![task("a", Status::Todo), task("b", Status::InProgress)];
        let lanes = group_by_status(&tasks);
        let in_progress = lane(&tasks, Status::InProgress);
        assert_eq!(
            lanes[&Status::InProgress].iter().map(|t| t.id).collect::<Vec<_>>(),
            in_progress.iter().map(|t| t.id).collect::<Vec<_>>()
        );
    }
}
