//! The physical view of a tile or module: grid, ports, tile boxes, and wires.

use crate::grid::Grid;
use crate::path::WirePath;
use crate::ports::PortTable;
use serde::{Deserialize, Serialize};
use weave_common::{Coord, Mirror};

/// Bounding box of one tile inside a larger layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileFrame {
    /// South-west corner.
    pub origin: Coord,
    /// Height in cells.
    pub rows: usize,
    /// Width in cells.
    pub cols: usize,
}

impl TileFrame {
    /// The frame reflected inside a `rows` x `cols` grid.
    pub fn mirrored(self, rows: usize, cols: usize, mirror: Mirror) -> TileFrame {
        let row = if mirror.x {
            rows - self.origin.row - self.rows
        } else {
            self.origin.row
        };
        let col = if mirror.y {
            cols - self.origin.col - self.cols
        } else {
            self.origin.col
        };
        TileFrame {
            origin: Coord::new(row, col),
            ..self
        }
    }

    /// The frame shifted by `origin`.
    pub fn translated(self, origin: Coord) -> TileFrame {
        TileFrame {
            origin: self.origin.offset(origin),
            ..self
        }
    }
}

/// A grid together with everything placed on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Cell contents, including wire occupancy.
    pub grid: Grid,
    /// Port and PHY locations.
    pub ports: PortTable,
    /// Boxes of every tile contained in the layout.
    pub frames: Vec<TileFrame>,
    /// Every wire path drawn on the grid, including those of sub-modules.
    pub paths: Vec<WirePath>,
}

impl Layout {
    /// Number of rows of the underlying grid.
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns of the underlying grid.
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Returns a reflected copy. Labels are preserved.
    pub fn mirrored(&self, mirror: Mirror) -> Layout {
        if mirror.is_identity() {
            return self.clone();
        }
        let (rows, cols) = (self.rows(), self.cols());
        Layout {
            grid: self.grid.mirrored(mirror),
            ports: self.ports.mirrored(rows, cols, mirror),
            frames: self
                .frames
                .iter()
                .map(|f| f.mirrored(rows, cols, mirror))
                .collect(),
            paths: self
                .paths
                .iter()
                .map(|p| p.mirrored(rows, cols, mirror))
                .collect(),
        }
    }
}
