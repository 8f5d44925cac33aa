//! Work-in-progress limit.

use crate::error::BoardError;
use crate::task::{Task, TaskStatus};

pub fn count_in_progress(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count()
}

/// Rejects entering IN_PROGRESS once `limit` tasks are already there.
///
/// `from` is the current status of the task being moved, `None` for a task
/// that is being created.
pub fn check_transition(
    tasks: &[Task],
    from: Option<TaskStatus>,
    to: TaskStatus,
    limit: u32,
) -> Result<(), BoardError> {
    if to != TaskStatus::InProgress || from == Some(TaskStatus::InProgress) {
        return Ok(());
    }
    if count_in_progress(tasks) >= limit as usize {
        return Err(BoardError::WipLimitReached { limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn task(id: u64, status: TaskStatus) -> Task {
        Task::sample(id, status)
    }

    #[fixture]
    fn two_in_progress() -> Vec<Task> {
        vec![
            task(1, TaskStatus::InProgress),
            task(2, TaskStatus::InProgress),
            task(3, TaskStatus::Todo),
            task(4, TaskStatus::Done),
        ]
    }

    #[rstest]
    fn counts_only_in_progress(two_in_progress: Vec<Task>) {
        assert_eq!(count_in_progress(&two_in_progress), 2);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(TaskStatus::Todo))]
    #[case(Some(TaskStatus::Done))]
    fn entering_a_full_column_is_rejected(
        two_in_progress: Vec<Task>,
        #[case] from: Option<TaskStatus>,
    ) {
        assert!(matches!(
            check_transition(&two_in_progress, from, TaskStatus::InProgress, 2),
            Err(BoardError::WipLimitReached { limit: 2 })
        ));
    }

    #[rstest]
    fn entering_below_the_limit_is_allowed(two_in_progress: Vec<Task>) {
        assert!(
            check_transition(&two_in_progress, Some(TaskStatus::Todo), TaskStatus::InProgress, 3)
                .is_ok()
        );
    }

    #[rstest]
    #[case(Some(TaskStatus::InProgress), TaskStatus::Done)]
    #[case(Some(TaskStatus::InProgress), TaskStatus::Todo)]
    #[case(None, TaskStatus::Todo)]
    #[case(Some(TaskStatus::Todo), TaskStatus::Done)]
    fn other_transitions_ignore_the_limit(
        two_in_progress: Vec<Task>,
        #[case] from: Option<TaskStatus>,
        #[case] to: TaskStatus,
    ) {
        assert!(check_transition(&two_in_progress, from, to, 1).is_ok());
    }
}
