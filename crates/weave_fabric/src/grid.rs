//! Rectangular unit-cell grids and wire occupancy.

use crate::cell::UnitCell;
use crate::path::{step_axis, WirePath};
use serde::{Deserialize, Serialize};
use weave_common::{Axis, Coord, Mirror, WeaveError, WeaveResult};

/// A `rows` x `cols` array of unit cells stored row-major, row 0 first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<UnitCell>,
}

/// Per-kind cell counts of a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCensus {
    /// Logic, port, and PHY cells.
    pub logic: usize,
    /// Cells carrying at least one wire.
    pub wire: usize,
    /// Unused cells.
    pub empty: usize,
    /// Sum of horizontal wire counts.
    pub h_wires: u64,
    /// Sum of vertical wire counts.
    pub v_wires: u64,
}

impl Grid {
    /// Creates a grid filled with `fill`.
    pub fn filled(rows: usize, cols: usize, fill: UnitCell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    /// Creates an empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, UnitCell::Empty)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if `at` lies inside the grid.
    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    /// Returns `true` if `at` lies on the outermost ring of cells.
    pub fn on_border(&self, at: Coord) -> bool {
        self.contains(at)
            && (at.row == 0 || at.col == 0 || at.row == self.rows - 1 || at.col == self.cols - 1)
    }

    fn index(&self, at: Coord) -> Option<usize> {
        self.contains(at).then(|| at.row * self.cols + at.col)
    }

    /// Returns the cell at `at`, or `None` outside the grid.
    pub fn get(&self, at: Coord) -> Option<UnitCell> {
        self.index(at).map(|i| self.cells[i])
    }

    /// Mutable access to the cell at `at`.
    pub fn get_mut(&mut self, at: Coord) -> Option<&mut UnitCell> {
        self.index(at).map(move |i| &mut self.cells[i])
    }

    /// Overwrites the cell at `at`. Returns `false` outside the grid.
    pub fn set(&mut self, at: Coord, cell: UnitCell) -> bool {
        match self.get_mut(at) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Iterates over `(coordinate, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, UnitCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Coord::new(i / self.cols, i % self.cols), *cell))
    }

    /// Copies every marker of `other` into this grid at `origin`.
    ///
    /// Wire cells of `other` are not copied: occupancy is re-derived from the
    /// paths that produced it. A marker landing on a non-empty cell is a
    /// collision.
    pub fn paste(&mut self, other: &Grid, origin: Coord, artifact: &str) -> WeaveResult<()> {
        if origin.row + other.rows > self.rows || origin.col + other.cols > self.cols {
            return Err(WeaveError::spec(
                artifact,
                format!(
                    "{}x{} block at {origin} does not fit into {}x{} grid",
                    other.rows, other.cols, self.rows, self.cols
                ),
            ));
        }
        for (at, cell) in other.iter() {
            if !cell.is_marker() {
                continue;
            }
            let target = at.offset(origin);
            let slot = self
                .get_mut(target)
                .ok_or_else(|| WeaveError::internal(format!("{target} outside pasted grid")))?;
            if *slot != UnitCell::Empty {
                return Err(WeaveError::collision(
                    artifact,
                    target,
                    format!("{cell:?} overlaps {slot:?}"),
                ));
            }
            *slot = cell;
        }
        Ok(())
    }

    /// Marks the interior cells of `path` as used and returns the number of
    /// collisions (increments of an already non-zero wire counter).
    ///
    /// A cell reached and left along the same axis counts once on that axis;
    /// a corner counts once on each axis.
    pub fn occupy(&mut self, path: &WirePath, artifact: &str) -> WeaveResult<u64> {
        let cells = path.cells(artifact)?;
        let mut collisions = 0;
        for w in cells.windows(3) {
            let (prev, at, next) = (w[0], w[1], w[2]);
            let axes = (step_axis(prev, at), step_axis(at, next));
            let slot = self.get_mut(at).ok_or_else(|| {
                WeaveError::spec(artifact, format!("wire cell {at} lies outside the grid"))
            })?;
            let (mut h, mut v) = match *slot {
                UnitCell::Empty => (0, 0),
                UnitCell::Wire { h, v } => (h, v),
                marker => {
                    return Err(WeaveError::collision(
                        artifact,
                        at,
                        format!("wire crosses {marker:?}"),
                    ))
                }
            };
            if axes.0 == Axis::Horizontal || axes.1 == Axis::Horizontal {
                collisions += u64::from(h > 0);
                h += 1;
            }
            if axes.0 == Axis::Vertical || axes.1 == Axis::Vertical {
                collisions += u64::from(v > 0);
                v += 1;
            }
            *slot = UnitCell::Wire { h, v };
        }
        Ok(collisions)
    }

    /// Returns a reflected copy of this grid.
    pub fn mirrored(&self, mirror: Mirror) -> Grid {
        let mut out = Grid::new(self.rows, self.cols);
        for (at, cell) in self.iter() {
            out.set(at.mirrored(self.rows, self.cols, mirror), cell);
        }
        out
    }

    /// Counts cells by kind.
    pub fn census(&self) -> CellCensus {
        let mut census = CellCensus::default();
        for cell in &self.cells {
            match *cell {
                UnitCell::Wire { h, v } => {
                    census.h_wires += u64::from(h);
                    census.v_wires += u64::from(v);
                    if h.max(v) > 0 {
                        census.wire += 1;
                    } else {
                        census.empty += 1;
                    }
                }
                UnitCell::Empty => census.empty += 1,
                _ => census.logic += 1,
            }
        }
        census
    }

    /// Highest wire count on a single axis of any cell.
    pub fn max_wire_count(&self) -> u32 {
        self.cells
            .iter()
            .map(|c| c.wire_count(Axis::Horizontal).max(c.wire_count(Axis::Vertical)))
            .max()
            .unwrap_or(0)
    }

    /// ASCII floorplan, north row first.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in (0..self.rows).rev() {
            for col in 0..self.cols {
                out.push(self.cells[row * self.cols + col].symbol());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_common::PortId;

    fn path(points: &[(usize, usize)]) -> WirePath {
        WirePath::new(points.iter().map(|&(r, c)| Coord::new(r, c)).collect())
    }

    #[test]
    fn get_set_and_bounds() {
        let mut g = Grid::new(3, 4);
        assert!(g.set(Coord::new(2, 3), UnitCell::Logic));
        assert_eq!(g.get(Coord::new(2, 3)), Some(UnitCell::Logic));
        assert_eq!(g.get(Coord::new(3, 0)), None);
        assert!(!g.set(Coord::new(0, 4), UnitCell::Logic));
        assert!(g.on_border(Coord::new(0, 1)));
        assert!(!g.on_border(Coord::new(1, 1)));
    }

    #[test]
    fn occupy_counts_axes_and_collisions() {
        let mut g = Grid::new(5, 5);
        let first = path(&[(1, 0), (1, 3), (4, 3)]);
        assert_eq!(g.occupy(&first, "t").unwrap(), 0);
        assert_eq!(g.get(Coord::new(1, 1)), Some(UnitCell::Wire { h: 1, v: 0 }));
        assert_eq!(g.get(Coord::new(1, 3)), Some(UnitCell::Wire { h: 1, v: 1 }));
        assert_eq!(g.get(Coord::new(3, 3)), Some(UnitCell::Wire { h: 0, v: 1 }));
        // End points are not marked.
        assert_eq!(g.get(Coord::new(1, 0)), Some(UnitCell::Empty));
        assert_eq!(g.get(Coord::new(4, 3)), Some(UnitCell::Empty));

        // Crosses (1, 2) vertically: different axis, no collision.
        let crossing = path(&[(0, 2), (2, 2)]);
        assert_eq!(g.occupy(&crossing, "t").unwrap(), 0);
        // Runs along row 1 again: two horizontal collisions.
        let parallel = path(&[(1, 0), (1, 3)]);
        assert_eq!(g.occupy(&parallel, "t").unwrap(), 2);
        assert_eq!(g.max_wire_count(), 2);
    }

    #[test]
    fn occupy_through_logic_is_collision() {
        let mut g = Grid::new(3, 3);
        g.set(Coord::new(1, 1), UnitCell::Logic);
        let err = g.occupy(&path(&[(1, 0), (1, 2)]), "top").unwrap_err();
        assert_eq!(err.location(), Some(Coord::new(1, 1)));
    }

    #[test]
    fn paste_detects_overlap() {
        let block = Grid::filled(2, 2, UnitCell::Logic);
        let mut g = Grid::new(4, 4);
        g.paste(&block, Coord::new(0, 0), "top").unwrap();
        g.paste(&block, Coord::new(2, 2), "top").unwrap();
        let err = g.paste(&block, Coord::new(1, 1), "top").unwrap_err();
        assert!(matches!(err, WeaveError::Collision { .. }));
        let err = g.paste(&block, Coord::new(3, 3), "top").unwrap_err();
        assert!(matches!(err, WeaveError::Spec { .. }));
    }

    #[test]
    fn mirror_moves_markers() {
        let mut g = Grid::new(3, 4);
        g.set(Coord::new(0, 0), UnitCell::MasterPort(PortId::from_raw(0)));
        let x = g.mirrored(Mirror::X);
        assert_eq!(x.get(Coord::new(2, 0)), Some(UnitCell::MasterPort(PortId::from_raw(0))));
        let y = g.mirrored(Mirror::Y);
        assert_eq!(y.get(Coord::new(0, 3)), Some(UnitCell::MasterPort(PortId::from_raw(0))));
        assert_eq!(x.mirrored(Mirror::X), g);
    }

    #[test]
    fn census_and_render() {
        let mut g = Grid::new(2, 3);
        g.set(Coord::new(0, 0), UnitCell::Logic);
        g.set(Coord::new(1, 2), UnitCell::Wire { h: 2, v: 1 });
        g.set(Coord::new(1, 1), UnitCell::Wire { h: 0, v: 0 });
        let census = g.census();
        assert_eq!(census.logic, 1);
        assert_eq!(census.wire, 1);
        assert_eq!(census.empty, 4);
        assert_eq!((census.h_wires, census.v_wires), (2, 1));
        assert_eq!(g.render(), "..+\n#..\n");
    }
}
