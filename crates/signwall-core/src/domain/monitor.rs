//! Physical monitor geometry.
//!
//! A [`Monitor`] is an immutable snapshot of one display rectangle as reported
//! by the topology provider.  The engine consumes monitors in provider order
//! and never re-sorts them: the first monitor gets the first block of pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a monitor geometry string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonitorParseError {
    /// The string is not of the form `WIDTHxHEIGHT[+X+Y]`.
    #[error("invalid monitor geometry '{0}': expected WIDTHxHEIGHT[+X+Y]")]
    Format(String),

    /// Width or height is zero.
    #[error("invalid monitor geometry '{0}': width and height must be non-zero")]
    ZeroSize(String),
}

/// A rectangle in desktop coordinates.
///
/// `x` and `y` are the top-left corner and may be negative for monitors placed
/// left of or above the primary display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Monitor {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Monitor {
    /// Window rectangle used by the single-mode surface, which is not bound
    /// to a particular monitor.
    pub const DEFAULT_WINDOW: Monitor = Monitor {
        x: 100,
        y: 100,
        width: 800,
        height: 600,
    };

    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}{:+}{:+}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for Monitor {
    type Err = MonitorParseError;

    /// Parses an X11-style geometry string such as `1920x1080+1920+0` or
    /// `2560x1440-2560+0`.  The offset part is optional and defaults to `+0+0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MonitorParseError::Format(s.to_string());
        let text = s.trim();

        // Split "WxH" from the offsets at the first sign character.
        let offset_start = text.find(['+', '-']).unwrap_or(text.len());
        let (size, offsets) = text.split_at(offset_start);

        let (w, h) = size.split_once(['x', 'X']).ok_or_else(bad)?;
        let width: u32 = w.parse().map_err(|_| bad())?;
        let height: u32 = h.parse().map_err(|_| bad())?;
        if width == 0 || height == 0 {
            return Err(MonitorParseError::ZeroSize(s.to_string()));
        }

        let (x, y) = if offsets.is_empty() {
            (0, 0)
        } else {
            // The second offset starts at the next sign character after the first.
            let second = offsets[1..].find(['+', '-']).map(|i| i + 1).ok_or_else(bad)?;
            let (xs, ys) = offsets.split_at(second);
            let x: i32 = xs.parse().map_err(|_| bad())?;
            let y: i32 = ys.parse().map_err(|_| bad())?;
            (x, y)
        };

        Ok(Monitor::new(x, y, width, height))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
