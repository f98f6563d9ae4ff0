//! OutputSurface and Slot: one display window and its grid of content cells.
//!
//! A surface is built from a [`SurfacePlan`] inside `Controller::apply` and
//! lives until the next `apply`.  It owns:
//!
//! - its [`Slot`]s, each bound to a [`SlotRenderer`] supplied by the
//!   [`DisplayBackend`] (no-signal slots get no renderer at all);
//! - its [`RotationScheduler`], which nobody else holds.
//!
//! # Tick behaviour
//!
//! ```text
//! Single:  render pages[current] into slot 0, current = (current + 1) % len
//! Multi:   reload every slot that carries a page; no-signal slots are inert
//! ```
//!
//! The single-mode surface performs its first tick synchronously while it is
//! being built, so the first page is visible before the first period elapses.
//!
//! # Disposal
//!
//! [`OutputSurface::dispose`] stops the scheduler first and then releases every
//! slot renderer.  A renderer that fails to release does not prevent the others
//! from being released; failures are collected into the [`DisposeReport`].  If
//! a surface is dropped without being disposed, `Drop` performs the same
//! release.

use std::sync::Arc;
use std::time::Duration;

use signwall_core::{CellPosition, DisplayMode, GridShape, Monitor, Page, SurfacePlan};
use thiserror::Error;
use tracing::{debug, warn};

use super::scheduler::{RotationScheduler, TickFn};

/// Error reported by a renderer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The renderer could not release its native resources.
    #[error("failed to release renderer: {0}")]
    Release(String),
}

/// A renderer failure recorded while disposing a surface.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("surface {surface} slot {slot}: {source}")]
pub struct DisposeError {
    pub surface: usize,
    pub slot: usize,
    #[source]
    pub source: RenderError,
}

/// Outcome of disposing one surface.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DisposeReport {
    pub surface: usize,
    /// Renderers released successfully.
    pub released: usize,
    pub failures: Vec<DisposeError>,
}

/// Where a slot sits: which surface, which cell index, which grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAddress {
    pub surface: usize,
    pub index: usize,
    pub position: CellPosition,
}

/// Content-rendering capability for one slot.
///
/// Implemented once per UI toolkit.  Calls are fire-and-forget: the engine
/// never inspects load results, and load failures are the renderer's concern.
pub trait SlotRenderer: Send {
    /// Shows `url` with `title` above it, replacing any previous content.
    fn set_content(&mut self, title: &str, url: &str);

    /// Reloads the current content in place.
    fn reload(&mut self);

    /// Releases native resources.  Called exactly once, after the surface's
    /// scheduler has been stopped.
    fn dispose(&mut self) -> Result<(), RenderError>;
}

/// Window-level capability: creates slot renderers and shows or closes surfaces.
pub trait DisplayBackend: Send + Sync {
    /// Creates the renderer bound to the slot at `address`.
    fn create_slot(&self, address: SlotAddress) -> Box<dyn SlotRenderer>;

    /// Makes `surface` visible.  No-signal cells are drawn as placeholders.
    fn present(&self, surface: &OutputSurface);

    /// Closes the window of a disposed surface.
    fn close(&self, surface: usize);
}

/// One addressable cell of a surface.
pub struct Slot {
    address: SlotAddress,
    page: Option<Page>,
    renderer: Option<Box<dyn SlotRenderer>>,
}

impl Slot {
    pub fn index(&self) -> usize {
        self.address.index
    }

    pub fn position(&self) -> CellPosition {
        self.address.position
    }

    /// The page currently shown, `None` for a no-signal slot.
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn is_no_signal(&self) -> bool {
        self.page.is_none()
    }

    fn render(&mut self, page: &Page) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_content(&page.title, &page.normalized_url());
        }
        self.page = Some(page.clone());
    }

    fn reload(&mut self) {
        if self.page.is_none() {
            return;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.reload();
        }
    }

    /// Releases the renderer.  A slot without a renderer releases trivially.
    fn release(&mut self) -> Result<bool, RenderError> {
        match self.renderer.take() {
            Some(mut renderer) => renderer.dispose().map(|()| true),
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("address", &self.address)
            .field("page", &self.page)
            .field("has_renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Per-mode rotation state.
#[derive(Debug)]
enum Rotation {
    /// Cyclic pointer into the full page list.
    Single { pages: Vec<Page>, current_index: usize },
    /// Fixed assignment; ticks only reload.
    Multi,
}

/// One display window.
pub struct OutputSurface {
    id: usize,
    geometry: Monitor,
    grid: GridShape,
    mode: DisplayMode,
    slots: Vec<Slot>,
    rotation: Rotation,
    scheduler: Box<dyn RotationScheduler>,
    backend: Arc<dyn DisplayBackend>,
    disposed: bool,
}

impl OutputSurface {
    /// Builds a surface from `plan` and renders its initial content.
    ///
    /// `pages` is the full page list; single-mode surfaces rotate through it.
    /// Multi-mode surfaces load each assigned page once here and only reload
    /// afterwards.  The scheduler is stored but not started.
    pub fn build(
        id: usize,
        plan: SurfacePlan,
        pages: &[Page],
        backend: Arc<dyn DisplayBackend>,
        scheduler: Box<dyn RotationScheduler>,
    ) -> Self {
        let slots = plan
            .cells
            .into_iter()
            .enumerate()
            .map(|(index, page)| {
                let address = SlotAddress {
                    surface: id,
                    index,
                    position: plan.grid.position(index),
                };
                // Single mode always needs a renderer to rotate into; in multi
                // mode only assigned cells get one.
                let needs_renderer = plan.mode == DisplayMode::Single || page.is_some();
                Slot {
                    address,
                    page: None,
                    renderer: needs_renderer.then(|| backend.create_slot(address)),
                }
                .with_assignment(plan.mode, page)
            })
            .collect();

        let rotation = match plan.mode {
            DisplayMode::Single => Rotation::Single {
                pages: pages.to_vec(),
                current_index: 0,
            },
            DisplayMode::Multi => Rotation::Multi,
        };

        let mut surface = Self {
            id,
            geometry: plan.geometry,
            grid: plan.grid,
            mode: plan.mode,
            slots,
            rotation,
            scheduler,
            backend,
            disposed: false,
        };
        surface.render_initial();
        surface
    }

    fn render_initial(&mut self) {
        match self.mode {
            DisplayMode::Single => self.tick(),
            DisplayMode::Multi => {
                for slot in &mut self.slots {
                    if let Some(page) = slot.page.clone() {
                        slot.render(&page);
                    }
                }
            }
        }
    }

    /// Handles one scheduler period.
    pub fn tick(&mut self) {
        match &mut self.rotation {
            Rotation::Single {
                pages,
                current_index,
            } => {
                if pages.is_empty() {
                    return;
                }
                let page = &pages[*current_index];
                debug!(surface = self.id, index = *current_index, title = %page.title, "rotating");
                if let Some(slot) = self.slots.first_mut() {
                    slot.render(page);
                }
                *current_index = (*current_index + 1) % pages.len();
            }
            Rotation::Multi => {
                debug!(surface = self.id, "reloading assigned slots");
                for slot in &mut self.slots {
                    slot.reload();
                }
            }
        }
    }

    /// Starts the surface's scheduler.
    pub fn start(&mut self, period: Duration, on_tick: TickFn) {
        self.scheduler.start(period, on_tick);
    }

    /// Stops the surface's scheduler.  Idempotent.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Asks the backend to show this surface.
    pub fn present(&self) {
        self.backend.present(self);
    }

    /// Stops the scheduler, then releases every slot renderer and closes the window.
    ///
    /// Never aborts part-way: every slot is attempted even when an earlier one
    /// fails.  Calling it again is a no-op returning an empty report.
    pub fn dispose(&mut self) -> DisposeReport {
        let mut report = DisposeReport {
            surface: self.id,
            ..DisposeReport::default()
        };
        if self.disposed {
            return report;
        }
        self.stop();

        for slot in &mut self.slots {
            match slot.release() {
                Ok(true) => report.released += 1,
                Ok(false) => {}
                Err(source) => report.failures.push(DisposeError {
                    surface: self.id,
                    slot: slot.index(),
                    source,
                }),
            }
        }
        self.backend.close(self.id);
        self.disposed = true;
        report
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn geometry(&self) -> Monitor {
        self.geometry
    }

    pub fn grid(&self) -> GridShape {
        self.grid
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Rotation pointer of a single-mode surface: the index rendered by the next tick.
    pub fn current_index(&self) -> Option<usize> {
        match self.rotation {
            Rotation::Single { current_index, .. } => Some(current_index),
            Rotation::Multi => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Pages per slot in cell order; `None` marks no-signal.
    pub fn assignment(&self) -> Vec<Option<Page>> {
        self.slots.iter().map(|s| s.page.clone()).collect()
    }
}

impl Slot {
    /// Multi-mode slots are bound to their page for life; single-mode slots
    /// start empty and are filled by the first tick.
    fn with_assignment(mut self, mode: DisplayMode, page: Option<Page>) -> Self {
        if mode == DisplayMode::Multi {
            self.page = page;
        }
        self
    }
}

impl std::fmt::Debug for OutputSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSurface")
            .field("id", &self.id)
            .field("geometry", &self.geometry)
            .field("grid", &self.grid)
            .field("mode", &self.mode)
            .field("slots", &self.slots)
            .field("rotation", &self.rotation)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Drop for OutputSurface {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        for failure in self.dispose().failures {
            warn!("renderer release failed during drop: {failure}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
