//! Timed tasks - delayed actions advanced by the frame clock.
//!
//! Sequences that must wait before resuming (reloading, racking a weapon,
//! restoring normal time after a rest) schedule an action with a delay in
//! real seconds. The owner advances the scheduler once per tick and gets
//! back every action whose delay ran out, earliest due first.

use serde::{Deserialize, Serialize};

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimedTask<A> {
    id: TaskId,
    remaining: f32,
    action: A,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskScheduler<A> {
    tasks: Vec<TimedTask<A>>,
    next_id: u64,
}

impl<A> Default for TaskScheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TaskScheduler<A> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }

    /// Run `action` once `delay` seconds have been advanced.
    pub fn schedule(&mut self, delay: f32, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(TimedTask {
            id,
            remaining: delay.max(0.0),
            action,
        });
        id
    }

    /// Remove a pending task, returning its action.
    pub fn cancel(&mut self, id: TaskId) -> Option<A> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index).action)
    }

    /// Seconds left before a pending task completes.
    pub fn remaining(&self, id: TaskId) -> Option<f32> {
        self.tasks.iter().find(|t| t.id == id).map(|t| t.remaining)
    }

    /// Advance every task by `dt` seconds and return the completed actions.
    ///
    /// Actions come back in the order they fell due; tasks due at the same
    /// moment keep their scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.tasks.len());
        for mut task in self.tasks.drain(..) {
            task.remaining -= dt;
            if task.remaining <= 0.0 {
                due.push(task);
            } else {
                pending.push(task);
            }
        }
        self.tasks = pending;

        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining).then(a.id.cmp(&b.id)));
        due.into_iter().map(|t| t.action).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fires_after_delay() {
        let mut tasks = TaskScheduler::new();
        tasks.schedule(1.0, "reload");
        assert!(tasks.advance(0.5).is_empty());
        assert_eq!(tasks.advance(0.5), vec!["reload"]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_completion_order_follows_due_time() {
        let mut tasks = TaskScheduler::new();
        tasks.schedule(0.9, "late");
        tasks.schedule(0.2, "early");
        tasks.schedule(0.5, "middle");
        tasks.schedule(0.2, "early too");
        assert_eq!(tasks.advance(1.0), vec!["early", "early too", "middle", "late"]);
    }

    #[test]
    fn test_cancel_removes_task() {
        let mut tasks = TaskScheduler::new();
        let rack = tasks.schedule(0.4, "rack");
        tasks.schedule(0.4, "reload");
        assert_eq!(tasks.cancel(rack), Some("rack"));
        assert_eq!(tasks.cancel(rack), None);
        assert_eq!(tasks.advance(1.0), vec!["reload"]);
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut tasks = TaskScheduler::new();
        let id = tasks.schedule(3.0, ());
        tasks.advance(1.0);
        assert_eq!(tasks.remaining(id), Some(2.0));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut tasks = TaskScheduler::new();
        tasks.schedule(0.0, 7);
        tasks.schedule(-5.0, 8);
        assert_eq!(tasks.advance(0.0), vec![7, 8]);
    }
}
