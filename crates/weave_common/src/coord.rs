//! Grid coordinates, routing axes, and mirror flags.
//!
//! Row 0 is the southern edge of a grid and column 0 its western edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position in a unit-cell grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Coord {
    /// Row index, growing northwards.
    pub row: usize,
    /// Column index, growing eastwards.
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate from a row and a column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns this coordinate shifted by `origin`.
    pub fn offset(self, origin: Coord) -> Coord {
        Coord::new(self.row + origin.row, self.col + origin.col)
    }

    /// Reflects this coordinate inside a `rows` x `cols` grid.
    ///
    /// An x mirror flips rows, a y mirror flips columns.
    pub fn mirrored(self, rows: usize, cols: usize, mirror: Mirror) -> Coord {
        let row = if mirror.x { rows - 1 - self.row } else { self.row };
        let col = if mirror.y { cols - 1 - self.col } else { self.col };
        Coord::new(row, col)
    }

    /// Returns the axis shared with `other`, or `None` if the two cells are
    /// neither in the same row nor in the same column.
    ///
    /// Identical coordinates are reported as horizontal.
    pub fn axis_to(self, other: Coord) -> Option<Axis> {
        if self.row == other.row {
            Some(Axis::Horizontal)
        } else if self.col == other.col {
            Some(Axis::Vertical)
        } else {
            None
        }
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction of a wire segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Axis {
    /// Travels along a row (east/west).
    Horizontal,
    /// Travels along a column (north/south).
    Vertical,
}

impl Axis {
    /// Returns the perpendicular axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "H"),
            Axis::Vertical => write!(f, "V"),
        }
    }
}

/// Mirror flags applied to a placed component.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Mirror {
    /// Flip rows (north/south swap).
    pub x: bool,
    /// Flip columns (east/west swap).
    pub y: bool,
}

impl Mirror {
    /// No reflection.
    pub const NONE: Mirror = Mirror { x: false, y: false };
    /// Row flip only.
    pub const X: Mirror = Mirror { x: true, y: false };
    /// Column flip only.
    pub const Y: Mirror = Mirror { x: false, y: true };

    /// Creates mirror flags.
    pub const fn new(x: bool, y: bool) -> Self {
        Self { x, y }
    }

    /// Returns `true` if neither axis is flipped.
    pub fn is_identity(self) -> bool {
        !self.x && !self.y
    }

    /// Combines two reflections. Flipping the same axis twice cancels out.
    pub fn then(self, other: Mirror) -> Mirror {
        Mirror::new(self.x ^ other.x, self.y ^ other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_rows_and_cols() {
        let c = Coord::new(1, 2);
        assert_eq!(c.mirrored(10, 5, Mirror::X), Coord::new(8, 2));
        assert_eq!(c.mirrored(10, 5, Mirror::Y), Coord::new(1, 2));
        assert_eq!(c.mirrored(10, 6, Mirror::Y), Coord::new(1, 3));
        assert_eq!(c.mirrored(10, 5, Mirror::NONE), c);
    }

    #[test]
    fn mirror_twice_is_identity() {
        let c = Coord::new(3, 7);
        let both = Mirror::new(true, true);
        assert_eq!(c.mirrored(9, 11, both).mirrored(9, 11, both), c);
    }

    #[test]
    fn axis_between_cells() {
        let a = Coord::new(4, 4);
        assert_eq!(a.axis_to(Coord::new(4, 9)), Some(Axis::Horizontal));
        assert_eq!(a.axis_to(Coord::new(0, 4)), Some(Axis::Vertical));
        assert_eq!(a.axis_to(Coord::new(5, 5)), None);
    }

    #[test]
    fn mirror_composition_cancels() {
        assert!(Mirror::X.then(Mirror::X).is_identity());
        assert_eq!(Mirror::X.then(Mirror::Y), Mirror::new(true, true));
    }

    #[test]
    fn offset_and_distance() {
        let c = Coord::new(2, 3).offset(Coord::new(10, 20));
        assert_eq!(c, Coord::new(12, 23));
        assert_eq!(c.manhattan(Coord::new(10, 20)), 5);
        assert_eq!(format!("{c}"), "(12, 23)");
    }
}
