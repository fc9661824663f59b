//! Cooperative frame scheduler
//!
//! A single-threaded stand-in for a browser's animation-frame and timeout
//! queues. Tasks are plain values (usually an enum owned by the caller), not
//! closures: the owner drains due tasks each frame and dispatches them itself,
//! so no callback ever outlives or aliases the state it acts on.
//!
//! ```text
//! host event loop
//!     ↓ tick(now)
//! FrameScheduler::drain_due(now)
//!     ↓ [frame tasks queued before this drain] + [timers with due <= now]
//! owner dispatches each task (may queue more; they run next drain)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use sightline_animation::FrameScheduler;
//!
//! #[derive(Debug, PartialEq)]
//! enum Task { Step, Expire }
//!
//! let mut scheduler = FrameScheduler::new();
//! let now = Duration::ZERO;
//! scheduler.request_frame(Task::Step);
//! scheduler.set_timeout(now, Duration::from_millis(500), Task::Expire);
//!
//! let due: Vec<Task> = scheduler.drain_due(now).into_iter().map(|t| t.task).collect();
//! assert_eq!(due, vec![Task::Step]);
//!
//! let due: Vec<Task> = scheduler
//!     .drain_due(Duration::from_millis(500))
//!     .into_iter()
//!     .map(|t| t.task)
//!     .collect();
//! assert_eq!(due, vec![Task::Expire]);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::time::Duration;

new_key_type! {
    /// Handle to a queued task, usable for cancellation
    pub struct TaskId;
}

/// When a queued task becomes due
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// On the next drain, like an animation-frame callback
    NextFrame,
    /// Once the host clock reaches this timestamp
    At(Duration),
}

impl Trigger {
    fn due_at(&self, now: Duration) -> Option<Duration> {
        match *self {
            Trigger::NextFrame => Some(now),
            Trigger::At(deadline) if deadline <= now => Some(deadline),
            Trigger::At(_) => None,
        }
    }
}

struct Slot<T> {
    trigger: Trigger,
    seq: u64,
    task: T,
}

/// A task handed back by `drain_due`
#[derive(Debug)]
pub struct ScheduledTask<T> {
    pub id: TaskId,
    pub task: T,
}

/// Single-threaded queue of frame tasks and timeouts
pub struct FrameScheduler<T> {
    slots: SlotMap<TaskId, Slot<T>>,
    next_seq: u64,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for FrameScheduler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.slots.len())
            .finish()
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    fn push(&mut self, trigger: Trigger, task: T) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(Slot { trigger, seq, task })
    }

    /// Queue a task for the next frame
    pub fn request_frame(&mut self, task: T) -> TaskId {
        self.push(Trigger::NextFrame, task)
    }

    /// Queue a task due `delay` after `now`
    pub fn set_timeout(&mut self, now: Duration, delay: Duration, task: T) -> TaskId {
        self.push(Trigger::At(now.saturating_add(delay)), task)
    }

    /// Cancel a queued task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.slots.remove(id).is_some()
    }

    /// Drop every queued task
    pub fn clear(&mut self) {
        if !self.slots.is_empty() {
            tracing::debug!("FrameScheduler: clearing {} pending tasks", self.slots.len());
        }
        self.slots.clear();
    }

    pub fn has_pending(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.slots.contains_key(id)
    }

    /// Whether a frame task is waiting (the host should schedule a frame)
    pub fn wants_frame(&self) -> bool {
        self.slots
            .values()
            .any(|slot| slot.trigger == Trigger::NextFrame)
    }

    /// Earliest timer deadline, ignoring frame tasks
    pub fn next_deadline(&self) -> Option<Duration> {
        self.slots
            .values()
            .filter_map(|slot| match slot.trigger {
                Trigger::At(deadline) => Some(deadline),
                Trigger::NextFrame => None,
            })
            .min()
    }

    /// Remove and return every task due at `now`.
    ///
    /// Ordered by due time, then by the order they were queued. Tasks queued
    /// while the caller processes the result are not part of this batch.
    pub fn drain_due(&mut self, now: Duration) -> SmallVec<[ScheduledTask<T>; 4]> {
        let mut due: SmallVec<[(Duration, u64, TaskId); 4]> = self
            .slots
            .iter()
            .filter_map(|(id, slot)| slot.trigger.due_at(now).map(|at| (at, slot.seq, id)))
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        due.into_iter()
            .filter_map(|(_, _, id)| {
                self.slots
                    .remove(id)
                    .map(|slot| ScheduledTask { id, task: slot.task })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(s: &mut FrameScheduler<&'static str>, now: Duration) -> Vec<&'static str> {
        s.drain_due(now).into_iter().map(|t| t.task).collect()
    }

    #[test]
    fn test_frame_tasks_run_once() {
        let mut s = FrameScheduler::new();
        s.request_frame("a");
        assert!(s.wants_frame());
        assert_eq!(drain(&mut s, ms(0)), vec!["a"]);
        assert!(drain(&mut s, ms(16)).is_empty());
        assert!(!s.has_pending());
    }

    #[test]
    fn test_timeout_waits_for_deadline() {
        let mut s = FrameScheduler::new();
        s.set_timeout(ms(100), ms(50), "late");
        assert_eq!(s.next_deadline(), Some(ms(150)));
        assert!(drain(&mut s, ms(149)).is_empty());
        assert_eq!(drain(&mut s, ms(150)), vec!["late"]);
    }

    #[test]
    fn test_ordering_by_due_then_insertion() {
        let mut s = FrameScheduler::new();
        s.set_timeout(ms(0), ms(30), "t30");
        s.set_timeout(ms(0), ms(10), "t10");
        s.request_frame("frame");
        s.set_timeout(ms(0), ms(10), "t10b");
        assert_eq!(drain(&mut s, ms(40)), vec!["t10", "t10b", "t30", "frame"]);
    }

    #[test]
    fn test_cancel() {
        let mut s = FrameScheduler::new();
        let id = s.request_frame("x");
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(drain(&mut s, ms(0)).is_empty());
    }

    #[test]
    fn test_tasks_queued_during_dispatch_run_next_drain() {
        let mut s = FrameScheduler::new();
        s.request_frame("first");
        let batch = s.drain_due(ms(0));
        for _ in batch {
            s.request_frame("second");
        }
        assert_eq!(drain(&mut s, ms(16)), vec!["second"]);
    }

    #[test]
    fn test_clear() {
        let mut s = FrameScheduler::new();
        s.request_frame("a");
        s.set_timeout(ms(0), ms(5), "b");
        s.clear();
        assert!(!s.has_pending());
        assert_eq!(s.next_deadline(), None);
    }
}
