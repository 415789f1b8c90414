#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::default_trait_access)]

//! Deterministic virtual-time discrete-event scheduler.
//!
//! Actions are registered to run at logical time points, the simulation clock
//! advances only by executing due events in time order, and registered events
//! can be cancelled before they fire. Logical time is fully decoupled from
//! wall-clock time, so a multi-hour scenario runs in microseconds and the
//! event order is identical across runs given identical inputs.
//!
//! # Examples
//!
//! ```
//! # use std::cell::RefCell;
//! # use std::rc::Rc;
//! # use std::time::Duration;
//! # use simsched::Scheduler;
//! let mut scheduler = Scheduler::default();
//! let fired = Rc::new(RefCell::new(Vec::new()));
//!
//! for &secs in &[10, 5, 20] {
//!     let fired = Rc::clone(&fired);
//!     scheduler.at(Duration::from_secs(secs), move |_| {
//!         fired.borrow_mut().push(secs);
//!     });
//! }
//!
//! assert!(scheduler.step());
//! assert_eq!(*fired.borrow(), vec![5, 10, 20]);
//! assert_eq!(scheduler.now(), Duration::from_secs(20));
//! ```

pub use clock::{ClockRef, VirtualClock};
pub use queue::{EventKey, EventQueue};
pub use scheduler::{ExpiredKey, Scheduler};

mod clock;
mod queue;
mod scheduler;
