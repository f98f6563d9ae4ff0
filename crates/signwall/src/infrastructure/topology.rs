//! Monitor topology providers.
//!
//! [`StaticTopology`] serves a fixed list, normally built from `--monitor`
//! flags.  [`MockTopology`] can be changed or made to fail at runtime so
//! tests can simulate hot-plug events and enumeration errors.

use std::sync::Mutex;

use signwall_core::Monitor;

use crate::application::display_loop::{TopologyError, TopologyProvider};

/// A fixed, ordered monitor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTopology {
    monitors: Vec<Monitor>,
}

impl StaticTopology {
    /// The monitor assumed when none is configured: 1920×1080 at the origin.
    pub const FALLBACK_MONITOR: Monitor = Monitor {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    /// Uses `monitors`, or [`Self::FALLBACK_MONITOR`] when the list is empty.
    pub fn new(monitors: Vec<Monitor>) -> Self {
        if monitors.is_empty() {
            Self {
                monitors: vec![Self::FALLBACK_MONITOR],
            }
        } else {
            Self { monitors }
        }
    }
}

impl TopologyProvider for StaticTopology {
    fn monitors(&self) -> Result<Vec<Monitor>, TopologyError> {
        Ok(self.monitors.clone())
    }
}

/// Mutable topology for tests.
pub struct MockTopology {
    state: Mutex<Result<Vec<Monitor>, TopologyError>>,
}

impl MockTopology {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            state: Mutex::new(Ok(monitors)),
        }
    }

    /// Replaces the monitor list, clearing any injected failure.
    pub fn set_monitors(&self, monitors: Vec<Monitor>) {
        *self.state.lock().expect("lock poisoned") = Ok(monitors);
    }

    /// Makes every subsequent `monitors()` call fail with `reason`.
    pub fn fail_with(&self, reason: &str) {
        *self.state.lock().expect("lock poisoned") =
            Err(TopologyError::Enumeration(reason.to_string()));
    }
}

impl TopologyProvider for MockTopology {
    fn monitors(&self) -> Result<Vec<Monitor>, TopologyError> {
        self.state.lock().expect("lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_topology_falls_back_to_one_monitor() {
        let topology = StaticTopology::new(vec![]);
        assert_eq!(
            topology.monitors(),
            Ok(vec![StaticTopology::FALLBACK_MONITOR])
        );
    }

    #[test]
    fn test_static_topology_preserves_order() {
        let monitors = vec![
            Monitor::new(1920, 0, 1920, 1080),
            Monitor::new(0, 0, 1280, 1024),
        ];
        let topology = StaticTopology::new(monitors.clone());
        assert_eq!(topology.monitors(), Ok(monitors));
    }

    #[test]
    fn test_mock_topology_failure_then_recovery() {
        // Arrange
        let topology = MockTopology::new(vec![Monitor::new(0, 0, 800, 600)]);

        // Act / Assert
        topology.fail_with("xrandr timed out");
        assert_eq!(
            topology.monitors(),
            Err(TopologyError::Enumeration("xrandr timed out".to_string()))
        );
        topology.set_monitors(vec![]);
        assert_eq!(topology.monitors(), Ok(vec![]));
    }
}
