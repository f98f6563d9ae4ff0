//! Display backends.
//!
//! [`TracingBackend`] is the headless backend the binary ships with: instead
//! of drawing windows it writes every window and renderer operation to the
//! `tracing` log.  A toolkit backend (webview, browser kiosk, ...) plugs in by
//! implementing [`DisplayBackend`] and [`SlotRenderer`] the same way.
//!
//! `mock` holds [`RecordingBackend`](mock::RecordingBackend) for tests.

pub mod mock;

use signwall_core::Page;
use tracing::{debug, info};

use crate::application::surface::{
    DisplayBackend, OutputSurface, RenderError, SlotAddress, SlotRenderer,
};

/// Placeholder text shown in cells without a page.
pub const NO_SIGNAL_LABEL: &str = "No Signal";

/// Backend that logs instead of drawing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBackend;

impl TracingBackend {
    pub fn new() -> Self {
        Self
    }
}

/// The caption drawn above a page: its title, or the URL when untitled.
pub fn caption(page: &Page) -> &str {
    if page.title.is_empty() {
        &page.url
    } else {
        &page.title
    }
}

impl DisplayBackend for TracingBackend {
    fn create_slot(&self, address: SlotAddress) -> Box<dyn SlotRenderer> {
        debug!(
            surface = address.surface,
            slot = address.index,
            row = address.position.row,
            col = address.position.col,
            "slot renderer created"
        );
        Box::new(TracingRenderer { address })
    }

    fn present(&self, surface: &OutputSurface) {
        let geometry = surface.geometry();
        let grid = surface.grid();
        let shape = format!("{}x{}", grid.rows, grid.cols);
        info!(
            surface = surface.id(),
            mode = %surface.mode(),
            geometry = %geometry,
            grid = %shape,
            "surface presented"
        );
        for (position, slot) in grid.cells().zip(surface.slots()) {
            let label = slot.page().map_or(NO_SIGNAL_LABEL, caption);
            info!(
                surface = surface.id(),
                row = position.row,
                col = position.col,
                "  [{label}]"
            );
        }
    }

    fn close(&self, surface: usize) {
        info!(surface, "surface closed");
    }
}

struct TracingRenderer {
    address: SlotAddress,
}

impl SlotRenderer for TracingRenderer {
    fn set_content(&mut self, title: &str, url: &str) {
        info!(
            surface = self.address.surface,
            slot = self.address.index,
            title,
            url,
            "load"
        );
    }

    fn reload(&mut self) {
        debug!(surface = self.address.surface, slot = self.address.index, "reload");
    }

    fn dispose(&mut self) -> Result<(), RenderError> {
        debug!(surface = self.address.surface, slot = self.address.index, "release");
        Ok(())
    }
}
