//! Generation-guarded delayed transitions.
//!
//! A controller never sleeps. It hands out a `Deferred` describing what should
//! happen after `delay`, and whoever runs the event loop gives it back once the
//! delay has passed. Each `TimerSlot` keeps at most one live task; arming or
//! cancelling bumps its generation so older tasks are refused on return.

use std::time::Duration;

/// A task to hand back to its controller after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a deferred task does nothing unless it is fired"]
pub struct Deferred<T> {
    task: T,
    delay: Duration,
    generation: u64,
}

impl<T> Deferred<T> {
    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn into_task(self) -> T {
        self.task
    }
}

/// One pending-task cell for a slice of controller state.
#[derive(Debug, Default)]
pub struct TimerSlot {
    generation: u64,
    armed: bool,
}

impl TimerSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task`, invalidating whatever this slot held before.
    pub fn arm<T>(&mut self, task: T, delay: Duration) -> Deferred<T> {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        Deferred {
            task,
            delay,
            generation: self.generation,
        }
    }

    /// Invalidate the pending task, if any.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.armed = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.armed
    }

    /// Accept a returned task only if it is the one currently armed.
    ///
    /// A task is accepted at most once.
    pub fn take<T>(&mut self, deferred: &Deferred<T>) -> bool {
        if self.armed && deferred.generation == self.generation {
            self.armed = false;
            true
        } else {
            false
        }
    }
}
