//! One-shot deferred tasks.
//!
//! Used for the delayed auto-continue after a session ends. Scheduling hands
//! back a [`TaskId`]; cancelling drops the task so it can never fire. Like the
//! clock engine, nothing runs on its own: the owner calls
//! [`Deferred::take_due`] while polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
pub struct ScheduledTask<T> {
    pub id: TaskId,
    pub fire_at: DateTime<Utc>,
    pub payload: T,
}

/// Holds at most one pending task; scheduling a new one replaces the old.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    next_id: u64,
    pending: Option<ScheduledTask<T>>,
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: None,
        }
    }

    pub fn schedule(&mut self, fire_at: DateTime<Utc>, payload: T) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending = Some(ScheduledTask {
            id,
            fire_at,
            payload,
        });
        id
    }

    /// Cancel whatever is pending. Safe to call repeatedly.
    pub fn cancel(&mut self) -> Option<TaskId> {
        self.pending.take().map(|task| task.id)
    }

    pub fn pending(&self) -> Option<&ScheduledTask<T>> {
        self.pending.as_ref()
    }

    /// Remove and return the pending task if its time has come.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<ScheduledTask<T>> {
        match &self.pending {
            Some(task) if task.fire_at <= now => self.pending.take(),
            _ => None,
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn fires_once_when_due() {
        let mut deferred = Deferred::new();
        let id = deferred.schedule(at(2), "continue");
        assert!(deferred.take_due(at(1)).is_none());
        let task = deferred.take_due(at(2)).unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.payload, "continue");
        assert!(deferred.take_due(at(3)).is_none());
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut deferred = Deferred::new();
        let id = deferred.schedule(at(2), ());
        assert_eq!(deferred.cancel(), Some(id));
        assert_eq!(deferred.cancel(), None);
        assert!(deferred.take_due(at(10)).is_none());
    }

    #[test]
    fn reschedule_gets_fresh_id() {
        let mut deferred = Deferred::new();
        let first = deferred.schedule(at(2), 1);
        let second = deferred.schedule(at(4), 2);
        assert_ne!(first, second);
        assert!(deferred.take_due(at(3)).is_none());
        assert_eq!(deferred.take_due(at(4)).unwrap().payload, 2);
    }
}
