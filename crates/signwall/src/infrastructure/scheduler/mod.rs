//! Tokio-backed rotation schedulers.
//!
//! Each [`IntervalScheduler`] runs one Tokio task around a
//! [`tokio::time::interval`].  The task does nothing but call the tick
//! callback; the callback in turn only posts a message to the display loop,
//! so a slow renderer can never stall a timer.
//!
//! # Timing
//!
//! - The interval's immediate first tick is skipped; the first callback fires
//!   one full period after `start`.
//! - Missed ticks are delayed rather than bursted: if the runtime was busy for
//!   three periods, the surface reloads once, not three times.
//! - `stop()` aborts the task.  An aborted task never fires again, even if it
//!   was mid-sleep.

pub mod mock;

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

use crate::application::scheduler::{RotationScheduler, SchedulerFactory, TickFn};

/// Smallest period handed to `tokio::time::interval`, which rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// One periodic Tokio task.
pub struct IntervalScheduler {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
        }
    }
}

impl RotationScheduler for IntervalScheduler {
    fn start(&mut self, period: Duration, mut on_tick: TickFn) {
        self.stop();
        let period = period.max(MIN_PERIOD);

        self.task = Some(self.runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // Skip the immediate first tick.

            loop {
                ticker.tick().await;
                trace!(?period, "scheduler tick");
                on_tick();
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Creates [`IntervalScheduler`]s on a fixed runtime.
#[derive(Debug, Clone)]
pub struct IntervalSchedulerFactory {
    runtime: Handle,
}

impl IntervalSchedulerFactory {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl SchedulerFactory for IntervalSchedulerFactory {
    fn create(&self) -> Box<dyn RotationScheduler> {
        Box::new(IntervalScheduler::new(self.runtime.clone()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
