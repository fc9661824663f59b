//! Sightline Animation
//!
//! Time-based primitives for the navigation engine.
//!
//! # Features
//!
//! - **Easing**: Normalized easing curves, including the ease-out quintic
//!   curve used for programmatic scrolling
//! - **Frame Scheduler**: A single-threaded, cooperative queue of
//!   animation-frame tasks and timeouts, driven by host-supplied timestamps
//! - **Interpolation**: Linear interpolation for scalars and points
//!
//! Nothing here reads a wall clock. Every time-dependent call takes `now` as
//! a `Duration` since an arbitrary host epoch, which keeps the engine
//! deterministic under test.

pub mod easing;
pub mod scheduler;
pub mod values;

pub use easing::Easing;
pub use scheduler::{FrameScheduler, ScheduledTask, TaskId, Trigger};
pub use values::Interpolate;
