//! Deferred callbacks
//!
//! The controller never sleeps. Everything time-based (start delay, intro
//! end, fade steps, manual loop re-triggers) is a [`ScheduledTask`] handed to
//! a [`Scheduler`] and dispatched back to the controller when it is due.
//!
//! Scheduling is fire-and-forget: there is no cancellation handle. Tasks
//! that were superseded carry enough state (zone, generation) for the
//! controller to recognize and drop them.

use ambient_common::LogicalZone;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

/// Work the controller asked to be called back for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Start delay elapsed: play the intro (or go outside)
    StartIntro,

    /// Intro clip plus loop interval elapsed
    IntroFinished,

    /// Next step of the fade started under `generation`
    FadeStep { generation: u64 },

    /// Manual loop re-trigger for `zone`, scheduled by the cross-fade
    /// started under `generation`
    LoopAmbient { zone: LogicalZone, generation: u64 },
}

impl fmt::Display for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduledTask::StartIntro => f.write_str("StartIntro"),
            ScheduledTask::IntroFinished => f.write_str("IntroFinished"),
            ScheduledTask::FadeStep { generation } => write!(f, "FadeStep(gen {})", generation),
            ScheduledTask::LoopAmbient { zone, generation } => {
                write!(f, "LoopAmbient({}, gen {})", zone, generation)
            }
        }
    }
}

/// Host timer the controller posts delayed tasks to
pub trait Scheduler {
    /// Run `task` after `delay` seconds. Non-positive delays mean "as soon
    /// as possible", after tasks that are already due.
    fn schedule(&mut self, delay: f64, task: ScheduledTask);

    /// Current scheduler time in seconds
    fn now(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    due: f64,
    sequence: u64,
    task: ScheduledTask,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerEntry {}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest due first, ties in scheduling order
        self.due
            .total_cmp(&other.due)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Deterministic timer queue driven by an external clock
///
/// Time only moves when the host calls [`pop_due`](Self::pop_due) or
/// [`set_now`](Self::set_now). Tasks come out in due order; tasks with the
/// same due time come out in the order they were scheduled.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_sequence: u64,
    timers: BinaryHeap<Reverse<TimerEntry>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<f64> {
        self.timers.peek().map(|Reverse(entry)| entry.due)
    }

    /// Pop the earliest task if it is due at or before `until`, moving the
    /// clock to its due time
    pub fn pop_due(&mut self, until: f64) -> Option<ScheduledTask> {
        let due = self.next_due()?;
        if due > until {
            return None;
        }

        let Reverse(entry) = self.timers.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Move the clock forward without running anything; never moves back
    pub fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: f64, task: ScheduledTask) {
        // NaN and negative delays fire immediately
        let delay = if delay > 0.0 { delay } else { 0.0 };
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.timers.push(Reverse(TimerEntry {
            due: self.now + delay,
            sequence,
            task,
        }));
    }

    fn now(&self) -> f64 {
        self.now
    }
}
