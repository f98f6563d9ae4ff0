//! The display loop: the one task allowed to touch surfaces.
//!
//! Commands (from the console, signal handlers or a future UI) and scheduler
//! ticks both arrive on channels.  The loop handles them strictly one at a
//! time, so the [`Controller`] never needs a lock.
//!
//! ```text
//!  console ──DisplayCommand──┐
//!                             ├──► run_display_loop ──► Controller
//!  schedulers ──SurfaceTick──┘
//! ```
//!
//! Commands win over ticks when both are ready: an `Apply` that is already
//! queued should not wait behind a burst of reloads for surfaces it is about
//! to tear down.

use std::sync::Arc;

use signwall_core::{Config, Monitor};
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, UnboundedReceiver};
use tracing::{debug, info, warn};

use super::controller::Controller;
use super::scheduler::SurfaceTick;

/// Errors raised while enumerating monitors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("display enumeration failed: {0}")]
    Enumeration(String),
}

/// Source of the ordered list of attached monitors.
pub trait TopologyProvider: Send + Sync {
    fn monitors(&self) -> Result<Vec<Monitor>, TopologyError>;
}

/// Requests handled by the display loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Rebuild every surface from this configuration.
    Apply(Config),
    /// Re-query monitors and rebuild with the current configuration.
    RefreshTopology,
    /// Dispose all surfaces and leave the loop.
    Shutdown,
}

/// Runs until a [`DisplayCommand::Shutdown`] arrives or every command sender
/// is dropped, then shuts the controller down and hands it back.
///
/// The controller's current configuration is applied once on entry.
pub async fn run_display_loop(
    mut controller: Controller,
    topology: Arc<dyn TopologyProvider>,
    mut commands: Receiver<DisplayCommand>,
    mut ticks: UnboundedReceiver<SurfaceTick>,
) -> Controller {
    controller.rebuild(&query_monitors(topology.as_ref()));
    let mut ticks_open = true;

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(DisplayCommand::Apply(config)) => {
                    controller.apply(config, &query_monitors(topology.as_ref()));
                }
                Some(DisplayCommand::RefreshTopology) => {
                    controller.rebuild(&query_monitors(topology.as_ref()));
                }
                Some(DisplayCommand::Shutdown) => {
                    info!("shutdown requested");
                    break;
                }
                None => {
                    debug!("command channel closed");
                    break;
                }
            },

            tick = ticks.recv(), if ticks_open => match tick {
                Some(tick) => {
                    controller.handle_tick(tick);
                }
                None => ticks_open = false,
            },
        }
    }

    controller.shutdown();
    controller
}

fn query_monitors(topology: &dyn TopologyProvider) -> Vec<Monitor> {
    topology.monitors().unwrap_or_else(|e| {
        warn!("{e}; continuing with no monitors");
        Vec::new()
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
