use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Virtual simulation clock holding the current logical time.
///
/// The clock starts at zero and only ever moves forward. It is advanced
/// exclusively by the run-loop methods of [`Scheduler`](crate::Scheduler);
/// everything else observes it through [`now`](VirtualClock::now) or a shared
/// [`ClockRef`].
#[derive(Debug, Default)]
pub struct VirtualClock {
    time: Rc<Cell<Duration>>,
}

impl VirtualClock {
    /// Creates a clock set to time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.time.get()
    }

    /// Returns a read-only handle sharing this clock's time cell.
    #[must_use]
    pub fn clock_ref(&self) -> ClockRef {
        ClockRef {
            time: Rc::clone(&self.time),
        }
    }

    /// Jumps the clock forward to `time`.
    ///
    /// Going backward would break scenario reproducibility, so a target
    /// earlier than the current time is a programming error.
    ///
    /// # Panics
    ///
    /// Panics if `time` is earlier than the current time.
    pub(crate) fn advance_to(&self, time: Duration) {
        assert!(
            time >= self.time.get(),
            "virtual clock cannot move backward: current {:?}, requested {:?}",
            self.time.get(),
            time,
        );
        self.time.replace(time);
    }
}

/// A cheaply cloneable, read-only view of a [`VirtualClock`].
///
/// Hand this out to simulation components that need to observe the current
/// logical time without being able to mutate it.
#[derive(Debug, Clone)]
pub struct ClockRef {
    time: Rc<Cell<Duration>>,
}

impl ClockRef {
    /// Returns the current logical time.
    #[must_use]
    pub fn time(&self) -> Duration {
        self.time.get()
    }
}
