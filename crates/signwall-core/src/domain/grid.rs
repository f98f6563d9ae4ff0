//! Grid layout planning for multi-slot surfaces.
//!
//! A surface that shows several pages at once is divided into an evenly sized
//! grid of cells.  The shape of that grid is an observable layout contract, so
//! it is a fixed table rather than a "closest to square" computation:
//!
//! | slots  | rows × cols |
//! |--------|-------------|
//! | ≤ 1    | 1 × 1       |
//! | 2      | 1 × 2       |
//! | 3–4    | 2 × 2       |
//! | 5–6    | 2 × 3       |
//! | 7–9    | 3 × 3       |
//! | 10–12  | 3 × 4       |
//! | 13–16  | 4 × 4       |
//! | > 16   | 4 × 4       |
//!
//! Requests above [`MAX_GRID_CAPACITY`] are clamped: the grid never grows past
//! 4 × 4, so not every requested slot is placeable.
//!
//! Cells are addressed by a zero-based index in row-major order; see
//! [`cell_position`].

use serde::{Deserialize, Serialize};

/// Largest number of cells a surface grid can hold.
pub const MAX_GRID_CAPACITY: usize = 16;

/// Rows and columns of a surface grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

/// Zero-based row/column of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl GridShape {
    /// The 1 × 1 grid used by single-mode surfaces.
    pub const SINGLE: GridShape = GridShape { rows: 1, cols: 1 };

    /// Total number of cells (`rows * cols`).
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns the row/column of the cell at `index`.
    pub fn position(&self, index: usize) -> CellPosition {
        cell_position(index, self.cols)
    }

    /// Iterates over every cell position in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPosition> + '_ {
        (0..self.capacity()).map(move |i| self.position(i))
    }
}

/// Returns the grid shape for a surface showing `slots` pages.
///
/// Total function: zero is treated like one, and anything above
/// [`MAX_GRID_CAPACITY`] gets the 4 × 4 grid.
pub fn grid_shape(slots: usize) -> GridShape {
    let (rows, cols) = match slots {
        0 | 1 => (1, 1),
        2 => (1, 2),
        3..=4 => (2, 2),
        5..=6 => (2, 3),
        7..=9 => (3, 3),
        10..=12 => (3, 4),
        _ => (4, 4),
    };
    GridShape { rows, cols }
}

/// Maps a row-major cell index to its row and column.
///
/// `cols` must be non-zero; every [`GridShape`] produced by [`grid_shape`]
/// satisfies this.
pub fn cell_position(index: usize, cols: usize) -> CellPosition {
    CellPosition {
        row: index / cols,
        col: index % cols,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: usize, cols: usize) -> GridShape {
        GridShape { rows, cols }
    }

    #[test]
    fn test_grid_shape_matches_layout_table() {
        let expected = [
            (1, shape(1, 1)),
            (2, shape(1, 2)),
            (3, shape(2, 2)),
            (4, shape(2, 2)),
            (5, shape(2, 3)),
            (6, shape(2, 3)),
            (7, shape(3, 3)),
            (8, shape(3, 3)),
            (9, shape(3, 3)),
            (10, shape(3, 4)),
            (11, shape(3, 4)),
            (12, shape(3, 4)),
            (13, shape(4, 4)),
            (14, shape(4, 4)),
            (15, shape(4, 4)),
            (16, shape(4, 4)),
            (17, shape(4, 4)),
            (18, shape(4, 4)),
            (19, shape(4, 4)),
            (20, shape(4, 4)),
        ];
        for (slots, want) in expected {
            assert_eq!(grid_shape(slots), want, "slots = {slots}");
        }
    }

    #[test]
    fn test_grid_shape_zero_slots_is_single_cell() {
        assert_eq!(grid_shape(0), GridShape::SINGLE);
    }

    #[test]
    fn test_grid_capacity_covers_clamped_request() {
        for slots in 1..=20 {
            let grid = grid_shape(slots);
            assert!(
                grid.capacity() >= slots.min(MAX_GRID_CAPACITY),
                "grid {grid:?} too small for {slots} slots"
            );
        }
    }

    #[test]
    fn test_grid_never_exceeds_max_capacity() {
        assert_eq!(grid_shape(usize::MAX).capacity(), MAX_GRID_CAPACITY);
    }

    #[test]
    fn test_cell_position_is_row_major() {
        // 2×3 grid: index 4 is second row, second column
        assert_eq!(cell_position(4, 3), CellPosition { row: 1, col: 1 });
        assert_eq!(cell_position(0, 3), CellPosition { row: 0, col: 0 });
        assert_eq!(cell_position(2, 3), CellPosition { row: 0, col: 2 });
        assert_eq!(cell_position(3, 3), CellPosition { row: 1, col: 0 });
    }

    #[test]
    fn test_cells_iterates_every_position_once() {
        let grid = grid_shape(5);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[5], CellPosition { row: 1, col: 2 });
    }
}
