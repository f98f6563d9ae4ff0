//! Manually driven scheduler for unit testing.
//!
//! Tests decide when a period elapses by calling [`ManualSchedulerFactory::fire_all`]
//! or [`ManualScheduler::fire`], so no test ever waits on a real clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::scheduler::{RotationScheduler, SchedulerFactory, TickFn};

/// Callback slots shared between a factory and the schedulers it created.
/// `Some` marks a running scheduler.
type Registry = Arc<Mutex<Vec<Option<TickFn>>>>;

/// A [`RotationScheduler`] that only ticks when told to.
pub struct ManualScheduler {
    id: usize,
    registry: Registry,
    period: Option<Duration>,
}

impl ManualScheduler {
    /// Creates a stand-alone scheduler not tracked by any factory.
    pub fn new() -> Self {
        let registry: Registry = Arc::new(Mutex::new(vec![None]));
        Self {
            id: 0,
            registry,
            period: None,
        }
    }

    /// Invokes the tick callback once.  Returns `false` when not running.
    pub fn fire(&self) -> bool {
        let mut registry = self.registry.lock().expect("lock poisoned");
        match registry.get_mut(self.id).and_then(Option::as_mut) {
            Some(on_tick) => {
                on_tick();
                true
            }
            None => false,
        }
    }

    /// The period passed to the last `start()`.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationScheduler for ManualScheduler {
    fn start(&mut self, period: Duration, on_tick: TickFn) {
        self.period = Some(period);
        self.registry.lock().expect("lock poisoned")[self.id] = Some(on_tick);
    }

    fn stop(&mut self) {
        self.registry.lock().expect("lock poisoned")[self.id] = None;
    }

    fn is_running(&self) -> bool {
        self.registry.lock().expect("lock poisoned")[self.id].is_some()
    }
}

/// Creates [`ManualScheduler`]s and can fire all running ones at once.
pub struct ManualSchedulerFactory {
    registry: Registry,
}

impl ManualSchedulerFactory {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of schedulers created so far.
    pub fn created(&self) -> usize {
        self.registry.lock().expect("lock poisoned").len()
    }

    /// Number of schedulers currently started and not stopped.
    pub fn running(&self) -> usize {
        self.registry
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Fires every running scheduler once, in creation order.
    pub fn fire_all(&self) {
        let mut registry = self.registry.lock().expect("lock poisoned");
        for on_tick in registry.iter_mut().flatten() {
            on_tick();
        }
    }
}

impl Default for ManualSchedulerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerFactory for ManualSchedulerFactory {
    fn create(&self) -> Box<dyn RotationScheduler> {
        let mut registry = self.registry.lock().expect("lock poisoned");
        registry.push(None);
        Box::new(ManualScheduler {
            id: registry.len() - 1,
            registry: Arc::clone(&self.registry),
            period: None,
        })
    }
}
