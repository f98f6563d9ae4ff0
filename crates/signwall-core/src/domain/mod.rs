//! Domain entities for signwall.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What lives here
//!
//! Domain code has no imports from OS APIs, timers, file systems, or UI
//! toolkits.  It can be compiled and tested on any machine without a display.
//! Everything that decides *what* is shown *where* belongs here; everything that
//! decides *when* (timers) or *how* (renderers) belongs to the outer layers of
//! the `signwall` crate.

/// Page → surface/slot assignment.
pub mod allocation;
/// Canonical configuration shape and display mode.
pub mod config;
/// Slot count → grid shape table.
pub mod grid;
/// Monitor rectangles.
pub mod monitor;
/// Pages and URL normalization.
pub mod page;
