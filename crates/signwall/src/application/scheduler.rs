//! RotationScheduler: the per-surface timer contract.
//!
//! Every output surface owns exactly one scheduler.  The scheduler fires its
//! tick callback once per period until it is stopped.  It knows nothing about
//! pages or slots; the callback it is given decides what a tick means.
//!
//! # Marshaling (for beginners)
//!
//! Timers run on their own (a Tokio task in production), but surface state may
//! only be touched from the display loop.  The controller therefore never hands
//! a scheduler a closure that mutates a surface directly.  Instead the callback
//! posts a [`SurfaceTick`] message onto a channel, and the display loop feeds
//! that message back into [`Controller::handle_tick`](super::controller::Controller::handle_tick).
//! This keeps all mutation on one logical thread even though many timers exist.
//!
//! # Implementations
//!
//! - `infrastructure::scheduler::IntervalScheduler`: Tokio `interval` task.
//! - `infrastructure::scheduler::mock::ManualScheduler`: fires on demand (tests).

use std::time::Duration;

/// Callback invoked on every scheduler period.
///
/// A failing tick must contain its own failure; the scheduler keeps firing.
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Identifies one surface within one generation of the topology.
///
/// `generation` increases on every `apply()`.  A tick whose generation does not
/// match the controller's current generation belongs to a surface that has
/// already been torn down and is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceTick {
    pub generation: u64,
    pub surface: usize,
}

/// Periodic timer owned by a single surface.
pub trait RotationScheduler: Send {
    /// Starts firing `on_tick` every `period`.
    ///
    /// The first call happens one full period after `start`; the surface
    /// renders its initial content synchronously at construction.  Starting an
    /// already running scheduler replaces the previous timer.
    fn start(&mut self, period: Duration, on_tick: TickFn);

    /// Stops the timer.  Idempotent; safe on a never-started scheduler.
    fn stop(&mut self);

    /// Returns `true` between `start` and `stop`.
    fn is_running(&self) -> bool;
}

/// Creates one fresh scheduler per surface.  Schedulers are never shared.
pub trait SchedulerFactory: Send + Sync {
    fn create(&self) -> Box<dyn RotationScheduler>;
}
