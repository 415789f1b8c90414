use std::time::Duration;

use crate::clock::{ClockRef, VirtualClock};
use crate::queue::{EventKey, EventQueue};

/// Type-erased action executed when its event fires. The action receives the
/// scheduler so it can register or cancel further events.
type Action = Box<dyn FnOnce(&mut Scheduler)>;

/// Returned by [`Scheduler::cancel`] when the key's event has already
/// executed or was already cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event key no longer refers to a pending event")]
pub struct ExpiredKey;

/// Deterministic virtual-time scheduler.
///
/// Owns a [`VirtualClock`] and a queue of pending events. Registered actions
/// run in non-decreasing time order, with equal times resolved by insertion
/// order, so runs are reproducible given identical inputs. All run-loop
/// methods are synchronous calls on the caller's thread; there is no
/// started/stopped mode and no hidden state beyond the clock time and the
/// queue contents.
///
/// A currently executing event has already been removed from the queue, so an
/// action cancelling itself through its own key gets
/// `Err(`[`ExpiredKey`]`)`; the queue is never corrupted by it.
pub struct Scheduler {
    queue: EventQueue<Action>,
    clock: VirtualClock,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            queue: EventQueue::default(),
            clock: VirtualClock::new(),
        }
    }
}

impl Scheduler {
    /// Creates a scheduler with an empty queue and the clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Returns a read-only handle to the simulation clock.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        self.clock.clock_ref()
    }

    /// Returns the number of pending events.
    ///
    /// An event whose action is currently executing is no longer pending and
    /// is not counted.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Registers `action` to run at the absolute time `when`.
    ///
    /// `when` may lie in the past; such an event is immediately due and fires
    /// on the next advancing step without moving the clock backward.
    pub fn at<F>(&mut self, when: Duration, action: F) -> EventKey
    where
        F: FnOnce(&mut Scheduler) + 'static,
    {
        log::trace!("scheduling event at {:?} (now: {:?})", when, self.now());
        self.queue.insert(when, Box::new(action))
    }

    /// Registers `action` to run `delay` after the current time.
    ///
    /// Equivalent to `at(now() + delay, action)`.
    pub fn after<F>(&mut self, delay: Duration, action: F) -> EventKey
    where
        F: FnOnce(&mut Scheduler) + 'static,
    {
        self.at(self.now() + delay, action)
    }

    /// Cancels the pending event referenced by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpiredKey`] if the event has already executed or was
    /// already cancelled. Keys are never reused, so a stale key can never
    /// cancel a different event.
    pub fn cancel(&mut self, key: EventKey) -> Result<(), ExpiredKey> {
        match self.queue.remove(key) {
            Some(_) => {
                log::trace!("cancelled event at {:?}", key.when());
                Ok(())
            }
            None => Err(ExpiredKey),
        }
    }

    /// Executes the earliest pending event, advancing the clock to its time
    /// first.
    ///
    /// An overdue event (scheduled in the past) executes with the clock left
    /// where it is. Returns `false` without touching the clock if the queue
    /// is empty. This is the atomic unit of progress; the event is removed
    /// from the queue before its action runs.
    pub fn step_one(&mut self) -> bool {
        if let Some((when, action)) = self.queue.pop_first() {
            if when > self.now() {
                self.clock.advance_to(when);
            }
            log::trace!("executing event scheduled at {:?}", when);
            action(self);
            true
        } else {
            false
        }
    }

    /// Executes pending events until the queue is empty.
    ///
    /// Returns `true` if at least one event executed. Actions may schedule
    /// further events, which are picked up by the same call; an action chain
    /// that perpetually re-schedules makes this loop forever — bound such
    /// scenarios with [`step_while`](Self::step_while) or
    /// [`step_until`](Self::step_until) instead.
    pub fn step(&mut self) -> bool {
        let mut ran = false;
        while self.step_one() {
            ran = true;
        }
        ran
    }

    /// Executes pending events while `predicate()` returns `true`.
    ///
    /// The predicate is re-evaluated before each step, so a driver can halt
    /// the run as soon as some externally observed condition holds. Returns
    /// `true` if at least one event executed.
    pub fn step_while<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut() -> bool,
    {
        let mut ran = false;
        while predicate() && self.step_one() {
            ran = true;
        }
        ran
    }

    /// Executes every event scheduled at or before `until`, then sets the
    /// clock to exactly `until`.
    ///
    /// Events scheduled during the call also run if they land at or before
    /// `until`. The clock ends at `until` even if nothing executed. Returns
    /// `true` if events scheduled after `until` remain pending, `false` if
    /// the queue is empty when the call finishes.
    ///
    /// # Panics
    ///
    /// Panics if `until` is earlier than the current time.
    pub fn step_until(&mut self, until: Duration) -> bool {
        while let Some(when) = self.queue.next_time() {
            if when > until {
                self.clock.advance_to(until);
                return true;
            }
            self.step_one();
        }
        self.clock.advance_to(until);
        false
    }

    /// Executes every event scheduled within `amount` from now, then sets the
    /// clock forward by exactly `amount`.
    ///
    /// Equivalent to `step_until(now() + amount)`; see
    /// [`step_until`](Self::step_until) for the return value.
    pub fn step_for(&mut self, amount: Duration) -> bool {
        self.step_until(self.now() + amount)
    }
}
