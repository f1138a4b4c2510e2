//! Axis-aligned multi-hop wire paths.

use serde::{Deserialize, Serialize};
use weave_common::{Axis, Coord, Mirror, WeaveError, WeaveResult};

/// A connection drawn as a list of waypoints.
///
/// The first waypoint is a master port, the last a slave port, and every pair
/// of consecutive waypoints shares a row or a column. Cells strictly between
/// the end points are the wire cells the connection occupies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WirePath {
    waypoints: Vec<Coord>,
}

impl WirePath {
    /// Creates a path from its waypoints.
    pub fn new(waypoints: Vec<Coord>) -> Self {
        Self { waypoints }
    }

    /// The waypoints, master end first.
    pub fn waypoints(&self) -> &[Coord] {
        &self.waypoints
    }

    /// The master-port end of the path.
    pub fn source(&self) -> Option<Coord> {
        self.waypoints.first().copied()
    }

    /// The slave-port end of the path.
    pub fn destination(&self) -> Option<Coord> {
        self.waypoints.last().copied()
    }

    /// Checks that the path has two ends and only axis-aligned hops.
    pub fn validate(&self, artifact: &str) -> WeaveResult<()> {
        if self.waypoints.len() < 2 {
            return Err(WeaveError::spec(
                artifact,
                format!("connection needs at least two waypoints, got {}", self.waypoints.len()),
            ));
        }
        for hop in self.waypoints.windows(2) {
            if hop[0].axis_to(hop[1]).is_none() {
                return Err(WeaveError::spec(
                    artifact,
                    format!("hop {} -> {} is not axis-aligned", hop[0], hop[1]),
                ));
            }
        }
        Ok(())
    }

    /// Expands the waypoints into the full sequence of visited cells.
    pub fn cells(&self, artifact: &str) -> WeaveResult<Vec<Coord>> {
        self.validate(artifact)?;
        let mut cells = vec![self.waypoints[0]];
        for hop in self.waypoints.windows(2) {
            let (from, to) = (hop[0], hop[1]);
            if from.row == to.row {
                cells.extend(stride(from.col, to.col).map(|col| Coord::new(from.row, col)));
            } else {
                cells.extend(stride(from.row, to.row).map(|row| Coord::new(row, from.col)));
            }
        }
        Ok(cells)
    }

    /// Number of cell-to-cell steps along the path.
    pub fn length(&self) -> usize {
        self.waypoints.windows(2).map(|hop| hop[0].manhattan(hop[1])).sum()
    }

    /// Number of direction changes.
    pub fn corners(&self) -> usize {
        self.waypoints
            .windows(3)
            .filter(|w| w[0].axis_to(w[1]) != w[1].axis_to(w[2]))
            .count()
    }

    /// Signal delay given per-cell horizontal and vertical delays.
    pub fn delay(&self, delay_h: f64, delay_v: f64) -> f64 {
        self.waypoints
            .windows(2)
            .map(|hop| {
                hop[0].col.abs_diff(hop[1].col) as f64 * delay_h
                    + hop[0].row.abs_diff(hop[1].row) as f64 * delay_v
            })
            .sum()
    }

    /// The same path shifted by `origin`.
    pub fn translated(&self, origin: Coord) -> WirePath {
        WirePath::new(self.waypoints.iter().map(|c| c.offset(origin)).collect())
    }

    /// The same path reflected inside a `rows` x `cols` grid.
    pub fn mirrored(&self, rows: usize, cols: usize, mirror: Mirror) -> WirePath {
        WirePath::new(
            self.waypoints
                .iter()
                .map(|c| c.mirrored(rows, cols, mirror))
                .collect(),
        )
    }
}

/// Axis of the step between two adjacent cells.
pub(crate) fn step_axis(from: Coord, to: Coord) -> Axis {
    if from.row == to.row {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Indices after `from` up to and including `to`.
fn stride(from: usize, to: usize) -> Box<dyn Iterator<Item = usize>> {
    if to >= from {
        Box::new(from + 1..=to)
    } else {
        Box::new((to..from).rev())
    }
}
