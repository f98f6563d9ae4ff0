//! # signwall-core
//!
//! Shared domain library for signwall, an unattended signage wall that shows a
//! list of web pages across one or more monitors.
//!
//! This crate has zero dependencies on OS APIs, UI toolkits, timers, or the
//! file system.  It answers three questions:
//!
//! - **What is shown?**  [`Page`] and [`Config`]: the ordered page list, the
//!   display mode, the refresh interval, and the slots per monitor.
//!
//! - **In what shape?**  [`grid_shape`]: how many rows and columns a surface
//!   is split into for a given slot count.
//!
//! - **Where?**  [`plan_surfaces`]: the allocation policy that partitions the
//!   page list across monitors in contiguous blocks.
//!
//! The `signwall` crate builds live surfaces, timers, and renderers on top of
//! these answers.

pub mod domain;

pub use domain::allocation::{plan_surfaces, SurfacePlan};
pub use domain::config::{Config, ConfigError, DisplayMode, DEFAULT_REFRESH_INTERVAL_MS};
pub use domain::grid::{cell_position, grid_shape, CellPosition, GridShape, MAX_GRID_CAPACITY};
pub use domain::monitor::{Monitor, MonitorParseError};
pub use domain::page::{normalize_url, Page};
