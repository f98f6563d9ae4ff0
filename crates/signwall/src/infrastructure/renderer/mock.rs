//! Recording display backend for unit testing.
//!
//! Every renderer call is appended to a shared log keyed by
//! `(surface, slot)`, so tests can assert exactly what each slot was told to
//! do without any UI toolkit.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use signwall_core::GridShape;

use crate::application::surface::{
    DisplayBackend, OutputSurface, RenderError, SlotAddress, SlotRenderer,
};

/// One call received by a slot renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererCall {
    SetContent { title: String, url: String },
    Reload,
    Dispose,
}

/// What the backend was shown when a surface was presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedSurface {
    pub surface: usize,
    pub grid: GridShape,
    /// Indices of cells drawn as "No Signal".
    pub no_signal: Vec<usize>,
}

type CallLog = Arc<Mutex<Vec<((usize, usize), RendererCall)>>>;
type FailSet = Arc<Mutex<HashSet<(usize, usize)>>>;

/// A [`DisplayBackend`] that records everything.
pub struct RecordingBackend {
    calls: CallLog,
    failing: FailSet,
    created: Mutex<Vec<SlotAddress>>,
    presented: Mutex<Vec<PresentedSurface>>,
    closed: Mutex<Vec<usize>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            created: Mutex::new(Vec::new()),
            presented: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
        }
    }

    /// Makes `dispose()` fail for the renderer at `(surface, slot)`.
    pub fn fail_dispose_for(&self, surface: usize, slot: usize) {
        self.failing
            .lock()
            .expect("lock poisoned")
            .insert((surface, slot));
    }

    /// All calls received by the renderer(s) at `(surface, slot)`, oldest first.
    pub fn calls_for(&self, surface: usize, slot: usize) -> Vec<RendererCall> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|(key, _)| *key == (surface, slot))
            .map(|(_, call)| call.clone())
            .collect()
    }

    /// URLs passed to `set_content` at `(surface, slot)`, oldest first.
    pub fn content_urls(&self, surface: usize, slot: usize) -> Vec<String> {
        self.calls_for(surface, slot)
            .into_iter()
            .filter_map(|call| match call {
                RendererCall::SetContent { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Number of renderers created.
    pub fn created_slots(&self) -> usize {
        self.created.lock().expect("lock poisoned").len()
    }

    /// Number of `dispose()` calls, failed ones included.
    pub fn disposed_count(&self) -> usize {
        self.calls
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|(_, call)| *call == RendererCall::Dispose)
            .count()
    }

    /// Surface ids passed to `present`, in call order.
    pub fn presented_surfaces(&self) -> Vec<usize> {
        self.presented().into_iter().map(|p| p.surface).collect()
    }

    pub fn presented(&self) -> Vec<PresentedSurface> {
        self.presented.lock().expect("lock poisoned").clone()
    }

    /// Surface ids passed to `close`, in call order.
    pub fn closed_surfaces(&self) -> Vec<usize> {
        self.closed.lock().expect("lock poisoned").clone()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for RecordingBackend {
    fn create_slot(&self, address: SlotAddress) -> Box<dyn SlotRenderer> {
        self.created.lock().expect("lock poisoned").push(address);
        Box::new(RecordingRenderer {
            key: (address.surface, address.index),
            calls: Arc::clone(&self.calls),
            failing: Arc::clone(&self.failing),
        })
    }

    fn present(&self, surface: &OutputSurface) {
        let no_signal = surface
            .slots()
            .iter()
            .filter(|slot| slot.is_no_signal())
            .map(|slot| slot.index())
            .collect();
        self.presented
            .lock()
            .expect("lock poisoned")
            .push(PresentedSurface {
                surface: surface.id(),
                grid: surface.grid(),
                no_signal,
            });
    }

    fn close(&self, surface: usize) {
        self.closed.lock().expect("lock poisoned").push(surface);
    }
}

struct RecordingRenderer {
    key: (usize, usize),
    calls: CallLog,
    failing: FailSet,
}

impl RecordingRenderer {
    fn record(&self, call: RendererCall) {
        self.calls.lock().expect("lock poisoned").push((self.key, call));
    }
}

impl SlotRenderer for RecordingRenderer {
    fn set_content(&mut self, title: &str, url: &str) {
        self.record(RendererCall::SetContent {
            title: title.to_string(),
            url: url.to_string(),
        });
    }

    fn reload(&mut self) {
        self.record(RendererCall::Reload);
    }

    fn dispose(&mut self) -> Result<(), RenderError> {
        self.record(RendererCall::Dispose);
        if self.failing.lock().expect("lock poisoned").contains(&self.key) {
            return Err(RenderError::Release(format!(
                "injected failure at surface {} slot {}",
                self.key.0, self.key.1
            )));
        }
        Ok(())
    }
}
