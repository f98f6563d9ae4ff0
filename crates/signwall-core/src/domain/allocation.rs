//! Allocation policy: which page goes into which surface slot.
//!
//! [`plan_surfaces`] turns a [`Config`] and an ordered monitor list into one
//! [`SurfacePlan`] per surface.  The plan is pure data; the application layer
//! turns it into live surfaces with renderers and timers.
//!
//! # Single mode
//!
//! Exactly one surface with one slot, placed at [`Monitor::DEFAULT_WINDOW`].
//! The slot initially holds the first page (or nothing when the page list is
//! empty); rotation through the remaining pages happens at tick time.
//!
//! # Multi mode: contiguous blocks
//!
//! Monitors are consumed in provider order with a cursor into the page list.
//! Each monitor takes the next contiguous block of pages, never every N-th
//! page:
//!
//! ```text
//! pages     = [A, B, C, D, E]     slots_per_surface = 2
//! monitor 0 → [A, B]
//! monitor 1 → [C, D]
//! monitor 2 → [E, no-signal]
//! ```
//!
//! A monitor takes up to `slots_per_surface` pages and the cursor advances by
//! the number actually taken.  Only the first
//! [`MAX_GRID_CAPACITY`](super::grid::MAX_GRID_CAPACITY) pages of a block fit
//! the grid; the rest of an oversized block is consumed but never shown.
//! Cells beyond the block are no-signal for the surface's lifetime.  Pages
//! left over after the last monitor are not placed anywhere.

use tracing::debug;

use super::config::{Config, DisplayMode};
use super::grid::{grid_shape, GridShape};
use super::monitor::Monitor;
use super::page::Page;

/// The planned content of one output surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacePlan {
    /// Window rectangle: the monitor in multi mode, the default window in single mode.
    pub geometry: Monitor,
    pub grid: GridShape,
    pub mode: DisplayMode,
    /// One entry per grid cell in row-major order; `None` is a no-signal cell.
    pub cells: Vec<Option<Page>>,
}

impl SurfacePlan {
    /// Number of cells that carry a page.
    pub fn assigned_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of no-signal cells.
    pub fn no_signal_count(&self) -> usize {
        self.cells.len() - self.assigned_count()
    }
}

/// Computes the surface plans for `config` over `topology`.
///
/// Returns an empty list in multi mode when `topology` is empty.  Single mode
/// ignores `topology` and always yields one plan.
pub fn plan_surfaces(config: &Config, topology: &[Monitor]) -> Vec<SurfacePlan> {
    let plans = match config.mode {
        DisplayMode::Single => vec![plan_single(&config.pages)],
        DisplayMode::Multi => plan_multi(&config.pages, config.slots_per_surface.get(), topology),
    };
    debug!(
        mode = %config.mode,
        monitors = topology.len(),
        surfaces = plans.len(),
        "surfaces planned"
    );
    plans
}

fn plan_single(pages: &[Page]) -> SurfacePlan {
    SurfacePlan {
        geometry: Monitor::DEFAULT_WINDOW,
        grid: GridShape::SINGLE,
        mode: DisplayMode::Single,
        cells: vec![pages.first().cloned()],
    }
}

fn plan_multi(pages: &[Page], slots_per_surface: usize, topology: &[Monitor]) -> Vec<SurfacePlan> {
    let grid = grid_shape(slots_per_surface);
    let mut cursor = 0;

    topology
        .iter()
        .map(|monitor| {
            let end = (cursor + slots_per_surface).min(pages.len());
            let block = &pages[cursor..end];
            cursor = end;

            let mut cells: Vec<Option<Page>> = block
                .iter()
                .take(grid.capacity())
                .cloned()
                .map(Some)
                .collect();
            cells.resize(grid.capacity(), None);

            SurfacePlan {
                geometry: *monitor,
                grid,
                mode: DisplayMode::Multi,
                cells,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
