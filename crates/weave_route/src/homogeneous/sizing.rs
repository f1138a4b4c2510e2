//! Gap sizing from coarse routes.
//!
//! Every coarse route is walked on an intermediate grid that holds each tile
//! at full size and every gap as a single row or column. The walks tally
//! horizontal and vertical wires per cell; a gap row then needs as many fine
//! rows as the busiest cell on it carries horizontal wires, and likewise for
//! gap columns. The tally only accumulates counts, so routes are walked in
//! parallel.

use super::coarse::CoarseRoute;
use rayon::prelude::*;
use weave_common::{Axis, Coord, WeaveError, WeaveResult};

/// Fine size of every coarse row and column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GapSizes {
    /// Height of coarse rows `0..=2R`; odd entries are tile rows.
    pub rows: Vec<usize>,
    /// Width of coarse columns `0..=2C`; odd entries are tile columns.
    pub cols: Vec<usize>,
}

/// Maps coarse indices onto the intermediate grid.
#[derive(Clone, Copy, Debug)]
struct Frame {
    tile_rows: usize,
    tile_cols: usize,
    rows: usize,
    cols: usize,
}

impl Frame {
    fn row(&self, coarse: usize) -> i64 {
        ((coarse / 2) * (self.tile_rows + 1) + coarse % 2) as i64
    }

    fn col(&self, coarse: usize) -> i64 {
        ((coarse / 2) * (self.tile_cols + 1) + coarse % 2) as i64
    }
}

#[derive(Clone, Debug)]
struct Tally {
    cols: usize,
    h: Vec<u32>,
    v: Vec<u32>,
}

impl Tally {
    fn new(frame: Frame) -> Self {
        Self {
            cols: frame.cols,
            h: vec![0; frame.rows * frame.cols],
            v: vec![0; frame.rows * frame.cols],
        }
    }

    fn bump(&mut self, row: i64, col: i64, axis: Axis) -> WeaveResult<()> {
        let rows = self.h.len() / self.cols.max(1);
        let index = usize::try_from(row)
            .ok()
            .zip(usize::try_from(col).ok())
            .filter(|&(r, c)| r < rows && c < self.cols)
            .map(|(r, c)| r * self.cols + c)
            .ok_or_else(|| {
                WeaveError::internal(format!("coarse walk left the grid at ({row}, {col})"))
            })?;
        match axis {
            Axis::Horizontal => self.h[index] += 1,
            Axis::Vertical => self.v[index] += 1,
        }
        Ok(())
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (a, b) in self.h.iter_mut().zip(other.h) {
            *a += b;
        }
        for (a, b) in self.v.iter_mut().zip(other.v) {
            *a += b;
        }
        self
    }

    /// Walks one route, counting every cell its wire will need.
    ///
    /// The first hop starts next to the master port, the hop before last
    /// ends level with the slave port, and the last hop stops next to it.
    fn walk(&mut self, frame: Frame, route: &CoarseRoute) -> WeaveResult<()> {
        let pts = &route.points;
        let n = pts.len();
        let master = (
            frame.row(pts[0].row) + route.master_offset.row as i64,
            frame.col(pts[0].col) + route.master_offset.col as i64,
        );
        let slave = (
            frame.row(pts[n - 1].row) + route.slave_offset.row as i64,
            frame.col(pts[n - 1].col) + route.slave_offset.col as i64,
        );
        if n == 2 {
            self.jog(frame, (pts[0], pts[1]), master, slave)?;
        }
        let mut last = master;
        for i in 0..n - 1 {
            let (a, b) = (pts[i], pts[i + 1]);
            let first = i == 0;
            let penultimate = i + 3 == n;
            let final_hop = i + 2 == n;
            if a.row == b.row {
                let dir = signum(b.col, a.col)?;
                let (mut row, start) = if first {
                    (master.0, master.1 + dir)
                } else {
                    last
                };
                let mut end = frame.col(b.col);
                if penultimate {
                    end = slave.1;
                }
                if final_hop {
                    row = slave.0;
                    end = slave.1 - dir;
                }
                for col in inclusive(start, end, dir) {
                    self.bump(row, col, Axis::Horizontal)?;
                }
                last = (row, end);
            } else if a.col == b.col {
                let dir = signum(b.row, a.row)?;
                let (start, mut col) = if first {
                    (master.0 + dir, master.1)
                } else {
                    last
                };
                let mut end = frame.row(b.row);
                if penultimate {
                    end = slave.0;
                }
                if final_hop {
                    col = slave.1;
                    end = slave.0 - dir;
                }
                for row in inclusive(start, end, dir) {
                    self.bump(row, col, Axis::Vertical)?;
                }
                last = (end, col);
            } else {
                return Err(WeaveError::internal(format!(
                    "coarse hop {a} -> {b} changes row and column"
                )));
            }
        }
        Ok(())
    }

    /// Reserves a lane in the gap crossed by a straight route whose ports
    /// sit on different lines, so the wire can change lines there.
    fn jog(
        &mut self,
        frame: Frame,
        (a, b): (Coord, Coord),
        master: (i64, i64),
        slave: (i64, i64),
    ) -> WeaveResult<()> {
        if a.row == b.row && master.0 != slave.0 {
            let col = frame.col((a.col + b.col) / 2);
            let dir = if slave.0 > master.0 { 1 } else { -1 };
            for row in inclusive(master.0, slave.0, dir) {
                self.bump(row, col, Axis::Vertical)?;
            }
        } else if a.col == b.col && master.1 != slave.1 {
            let row = frame.row((a.row + b.row) / 2);
            let dir = if slave.1 > master.1 { 1 } else { -1 };
            for col in inclusive(master.1, slave.1, dir) {
                self.bump(row, col, Axis::Horizontal)?;
            }
        }
        Ok(())
    }
}

fn signum(to: usize, from: usize) -> WeaveResult<i64> {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => Ok(1),
        std::cmp::Ordering::Less => Ok(-1),
        std::cmp::Ordering::Equal => Err(WeaveError::internal("zero-length coarse hop")),
    }
}

/// `start, start + dir, ...` up to and including `end`; empty if `end` is behind.
pub(crate) fn inclusive(start: i64, end: i64, dir: i64) -> impl Iterator<Item = i64> {
    std::iter::successors(Some(start), move |&x| Some(x + dir))
        .take_while(move |&x| (end - x) * dir >= 0)
}

/// Sizes every gap of an `array_rows` x `array_cols` array.
pub(crate) fn size_gaps(
    routes: &[CoarseRoute],
    tile_rows: usize,
    tile_cols: usize,
    array_rows: usize,
    array_cols: usize,
) -> WeaveResult<GapSizes> {
    let frame = Frame {
        tile_rows,
        tile_cols,
        rows: array_rows * (tile_rows + 1) + 1,
        cols: array_cols * (tile_cols + 1) + 1,
    };
    let tally = routes
        .par_iter()
        .try_fold(
            || Tally::new(frame),
            |mut tally, route| {
                tally.walk(frame, route)?;
                Ok::<_, WeaveError>(tally)
            },
        )
        .try_reduce(|| Tally::new(frame), |a, b| Ok(a.merge(b)))?;

    let rows = (0..=2 * array_rows)
        .map(|k| {
            if k % 2 == 1 {
                return tile_rows;
            }
            let r = frame.row(k) as usize;
            (0..frame.cols)
                .map(|c| tally.h[r * frame.cols + c] as usize)
                .max()
                .unwrap_or(0)
        })
        .collect();
    let cols = (0..=2 * array_cols)
        .map(|k| {
            if k % 2 == 1 {
                return tile_cols;
            }
            let c = frame.col(k) as usize;
            (0..frame.rows)
                .map(|r| tally.v[r * frame.cols + c] as usize)
                .max()
                .unwrap_or(0)
        })
        .collect();
    Ok(GapSizes { rows, cols })
}
