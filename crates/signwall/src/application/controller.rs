//! Controller: owns the live surfaces and rebuilds them on every configuration
//! or topology change.
//!
//! # Apply sequence
//!
//! ```text
//! apply(config, topology)
//!   1. stop every existing scheduler
//!   2. dispose every existing surface (renderer failures are collected)
//!   3. bump the generation counter
//!   4. plan_surfaces(config, topology)
//!   5. build one surface per plan, start its scheduler, present it
//! ```
//!
//! Steps 1 and 2 always complete before step 4 starts, so a tick from the old
//! topology can never reach a new surface.  A tick that was already queued on
//! the channel when its surface died carries the old generation and is dropped
//! by [`Controller::handle_tick`].
//!
//! The controller is single-threaded.  It is owned by the display loop and
//! every method takes `&mut self`; schedulers reach it only through the
//! [`SurfaceTick`] channel.

use std::sync::Arc;

use signwall_core::{plan_surfaces, Config, Monitor, Page};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace, warn};

use super::scheduler::{SchedulerFactory, SurfaceTick, TickFn};
use super::surface::{DisplayBackend, DisposeError, OutputSurface};

/// Summary of one `apply()`.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Generation of the surfaces that are now live.
    pub generation: u64,
    pub surfaces: usize,
    pub assigned_slots: usize,
    pub no_signal_slots: usize,
    /// Renderer release failures from tearing down the previous surfaces.
    pub dispose_failures: Vec<DisposeError>,
}

/// Builds, tracks and tears down output surfaces.
pub struct Controller {
    config: Config,
    backend: Arc<dyn DisplayBackend>,
    schedulers: Arc<dyn SchedulerFactory>,
    tick_sink: UnboundedSender<SurfaceTick>,
    surfaces: Vec<OutputSurface>,
    generation: u64,
}

impl Controller {
    /// Creates a controller with no surfaces.  Nothing is shown until the
    /// first [`apply`](Self::apply).
    pub fn new(
        config: Config,
        backend: Arc<dyn DisplayBackend>,
        schedulers: Arc<dyn SchedulerFactory>,
        tick_sink: UnboundedSender<SurfaceTick>,
    ) -> Self {
        Self {
            config,
            backend,
            schedulers,
            tick_sink,
            surfaces: Vec::new(),
            generation: 0,
        }
    }

    /// Tears down every surface and rebuilds from `config` over `topology`.
    ///
    /// Always succeeds: renderer release failures from the teardown are
    /// logged and reported, never propagated.
    pub fn apply(&mut self, config: Config, topology: &[Monitor]) -> ApplyReport {
        let dispose_failures = self.teardown();
        self.generation += 1;
        self.config = config;

        let period = self.config.refresh_period();
        for (id, plan) in plan_surfaces(&self.config, topology).into_iter().enumerate() {
            let mut surface = OutputSurface::build(
                id,
                plan,
                &self.config.pages,
                Arc::clone(&self.backend),
                self.schedulers.create(),
            );
            surface.start(period, self.tick_fn(id));
            surface.present();
            self.surfaces.push(surface);
        }

        let report = ApplyReport {
            generation: self.generation,
            surfaces: self.surfaces.len(),
            assigned_slots: self.count_slots(|no_signal| !no_signal),
            no_signal_slots: self.count_slots(|no_signal| no_signal),
            dispose_failures,
        };
        info!(
            generation = report.generation,
            mode = %self.config.mode,
            surfaces = report.surfaces,
            assigned = report.assigned_slots,
            no_signal = report.no_signal_slots,
            "configuration applied"
        );
        report
    }

    /// Re-applies the current configuration over a new topology.
    pub fn rebuild(&mut self, topology: &[Monitor]) -> ApplyReport {
        let config = self.config.clone();
        self.apply(config, topology)
    }

    /// Routes a marshaled scheduler tick to its surface.
    ///
    /// Returns `false` when the tick is stale (older generation) or names a
    /// surface that does not exist.
    pub fn handle_tick(&mut self, tick: SurfaceTick) -> bool {
        if tick.generation != self.generation {
            debug!(
                tick_generation = tick.generation,
                current = self.generation,
                "discarding stale tick"
            );
            return false;
        }
        match self.surfaces.iter_mut().find(|s| s.id() == tick.surface) {
            Some(surface) => {
                surface.tick();
                true
            }
            None => false,
        }
    }

    /// Stops and disposes every surface.  Pending ticks become stale.
    pub fn shutdown(&mut self) -> Vec<DisposeError> {
        let failures = self.teardown();
        self.generation += 1;
        info!(generation = self.generation, "display shut down");
        failures
    }

    /// Snapshot of the page mapping: one entry per surface, one cell per slot.
    pub fn assignment(&self) -> Vec<Vec<Option<Page>>> {
        self.surfaces.iter().map(OutputSurface::assignment).collect()
    }

    pub fn surfaces(&self) -> &[OutputSurface] {
        &self.surfaces
    }

    /// The configuration currently applied.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn teardown(&mut self) -> Vec<DisposeError> {
        // Every timer is silenced before any renderer is released.
        for surface in &mut self.surfaces {
            surface.stop();
        }
        let mut failures = Vec::new();
        for mut surface in self.surfaces.drain(..) {
            let report = surface.dispose();
            for failure in &report.failures {
                warn!("{failure}");
            }
            failures.extend(report.failures);
        }
        failures
    }

    fn tick_fn(&self, surface: usize) -> TickFn {
        let sink = self.tick_sink.clone();
        let tick = SurfaceTick {
            generation: self.generation,
            surface,
        };
        Box::new(move || {
            if sink.send(tick).is_err() {
                trace!(surface, "display loop closed; tick dropped");
            }
        })
    }

    fn count_slots(&self, want: impl Fn(bool) -> bool) -> usize {
        self.surfaces
            .iter()
            .flat_map(|s| s.slots())
            .filter(|slot| want(slot.is_no_signal()))
            .count()
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("generation", &self.generation)
            .field("surfaces", &self.surfaces)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::renderer::mock::{RecordingBackend, RendererCall};
    use crate::infrastructure::scheduler::mock::ManualSchedulerFactory;
    use signwall_core::DisplayMode;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    struct Harness {
        controller: Controller,
        backend: Arc<RecordingBackend>,
        schedulers: Arc<ManualSchedulerFactory>,
        ticks: UnboundedReceiver<SurfaceTick>,
    }

    fn harness(config: Config) -> Harness {
        let backend = Arc::new(RecordingBackend::new());
        let schedulers = Arc::new(ManualSchedulerFactory::new());
        let (tx, ticks) = mpsc::unbounded_channel();
        let controller = Controller::new(config, backend.clone(), schedulers.clone(), tx);
        Harness {
            controller,
            backend,
            schedulers,
            ticks,
        }
    }

    fn pages(n: usize) -> Vec<Page> {
        (0..n)
            .map(|i| Page::new(format!("P{i}"), format!("https://p{i}.example")))
            .collect()
    }

    fn monitors(n: usize) -> Vec<Monitor> {
        (0..n)
            .map(|i| Monitor::new(1920 * i as i32, 0, 1920, 1080))
            .collect()
    }

    fn multi(pages: Vec<Page>, slots: usize) -> Config {
        Config::new(pages, 1000, DisplayMode::Multi, slots).unwrap()
    }

    #[test]
    fn test_new_controller_has_no_surfaces() {
        let h = harness(Config::default());
        assert!(h.controller.surfaces().is_empty());
        assert_eq!(h.controller.generation(), 0);
    }

    #[test]
    fn test_apply_multi_reports_slot_counts() {
        // Arrange
        let mut h = harness(Config::default());

        // Act
        let report = h.controller.apply(multi(pages(5), 2), &monitors(3));

        // Assert
        assert_eq!(report.generation, 1);
        assert_eq!(report.surfaces, 3);
        assert_eq!(report.assigned_slots, 5);
        assert_eq!(report.no_signal_slots, 1);
        assert!(report.dispose_failures.is_empty());
        assert_eq!(h.backend.presented_surfaces(), vec![0, 1, 2]);
    }

    #[test]
    fn test_apply_starts_one_scheduler_per_surface() {
        let mut h = harness(Config::default());

        h.controller.apply(multi(pages(4), 2), &monitors(2));

        assert_eq!(h.schedulers.created(), 2);
        assert!(h.controller.surfaces().iter().all(|s| s.is_scheduled()));
    }

    #[test]
    fn test_reapply_disposes_previous_surfaces_first() {
        // Arrange
        let mut h = harness(Config::default());
        h.controller.apply(multi(pages(4), 2), &monitors(2));

        // Act
        h.controller.apply(multi(pages(4), 2), &monitors(1));

        // Assert: the four old renderers were released, the old schedulers stopped
        assert_eq!(h.backend.disposed_count(), 4);
        assert_eq!(h.backend.closed_surfaces(), vec![0, 1]);
        assert_eq!(h.schedulers.running(), 1);
        assert_eq!(h.controller.surfaces().len(), 1);
    }

    #[test]
    fn test_apply_is_idempotent_for_same_input() {
        let mut h = harness(Config::default());
        let cfg = multi(pages(7), 3);

        h.controller.apply(cfg.clone(), &monitors(3));
        let first = h.controller.assignment();
        h.controller.apply(cfg, &monitors(3));
        let second = h.controller.assignment();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scheduler_tick_is_marshaled_through_channel() {
        // Arrange
        let mut h = harness(Config::default());
        h.controller.apply(multi(pages(1), 1), &monitors(1));

        // Act: the timer fires; nothing happens until the tick is handled
        h.schedulers.fire_all();
        assert_eq!(h.backend.calls_for(0, 0).len(), 1);
        let tick = h.ticks.try_recv().expect("tick queued");
        let handled = h.controller.handle_tick(tick);

        // Assert
        assert!(handled);
        assert_eq!(h.backend.calls_for(0, 0).last(), Some(&RendererCall::Reload));
    }

    #[test]
    fn test_stale_tick_is_discarded_after_reapply() {
        // Arrange: a tick from generation 1 is still queued
        let mut h = harness(Config::default());
        h.controller.apply(multi(pages(2), 1), &monitors(2));
        h.schedulers.fire_all();
        let stale = h.ticks.try_recv().expect("tick queued");

        // Act
        h.controller.apply(multi(pages(2), 1), &monitors(2));
        let handled = h.controller.handle_tick(stale);

        // Assert: no new surface saw a reload
        assert!(!handled);
        for surface in 0..2 {
            assert!(!h.backend.calls_for(surface, 0).contains(&RendererCall::Reload));
        }
    }

    #[test]
    fn test_tick_for_unknown_surface_is_ignored() {
        let mut h = harness(Config::default());
        h.controller.apply(multi(pages(1), 1), &monitors(1));

        let handled = h.controller.handle_tick(SurfaceTick {
            generation: h.controller.generation(),
            surface: 9,
        });

        assert!(!handled);
    }

    #[test]
    fn test_single_mode_rotation_follows_tick_count() {
        // Arrange
        let cfg = Config::new(pages(3), 1000, DisplayMode::Single, 1).unwrap();
        let mut h = harness(cfg.clone());
        h.controller.apply(cfg, &[]);
        let generation = h.controller.generation();

        // Act: five ticks after the initial render
        for _ in 0..5 {
            h.controller.handle_tick(SurfaceTick { generation, surface: 0 });
        }

        // Assert: 5 mod 3 = 2
        let shown = h.controller.assignment()[0][0].clone();
        assert_eq!(shown, Some(pages(3)[2].clone()));
    }

    #[test]
    fn test_rebuild_reuses_current_config() {
        let mut h = harness(Config::default());
        h.controller.apply(multi(pages(4), 2), &monitors(1));

        let report = h.controller.rebuild(&monitors(2));

        assert_eq!(report.surfaces, 2);
        assert_eq!(report.assigned_slots, 4);
        assert_eq!(h.controller.config().slots_per_surface.get(), 2);
    }

    #[test]
    fn test_apply_reports_dispose_failures_and_continues() {
        // Arrange
        let mut h = harness(Config::default());
        h.controller.apply(multi(pages(2), 2), &monitors(1));
        h.backend.fail_dispose_for(0, 0);

        // Act
        let report = h.controller.apply(multi(pages(2), 2), &monitors(1));

        // Assert
        assert_eq!(report.dispose_failures.len(), 1);
        assert_eq!(report.dispose_failures[0].slot, 0);
        assert_eq!(report.surfaces, 1);
        assert_eq!(h.backend.disposed_count(), 2);
    }

    #[test]
    fn test_shutdown_disposes_everything_and_invalidates_ticks() {
        let mut h = harness(Config::default());
        h.controller.apply(multi(pages(2), 1), &monitors(2));
        let generation = h.controller.generation();

        let failures = h.controller.shutdown();

        assert!(failures.is_empty());
        assert!(h.controller.surfaces().is_empty());
        assert_eq!(h.schedulers.running(), 0);
        assert!(!h.controller.handle_tick(SurfaceTick { generation, surface: 0 }));
    }
}
