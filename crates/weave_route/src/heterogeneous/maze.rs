//! Weighted grid search for one connection.
//!
//! A FIFO label-correcting search over the cells of a bounding box. A cell
//! keeps the best `(collisions, distance)` label seen so far and is revisited
//! whenever a strictly better one arrives. Turning costs the corner penalty
//! in distance and charges the wires already running through the turn cell
//! on the axis the search arrived on as collisions.

use std::collections::VecDeque;
use weave_common::{Axis, Coord};
use weave_fabric::Grid;

/// Neighbour offsets in expansion order.
const STEPS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Inclusive search window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Window {
    pub min: Coord,
    pub max: Coord,
}

impl Window {
    /// Bounding box of `a` and `b` grown by the detour margins, clipped to `grid`.
    pub fn around(a: Coord, b: Coord, detour_h: usize, detour_v: usize, grid: &Grid) -> Self {
        Self {
            min: Coord::new(
                a.row.min(b.row).saturating_sub(detour_v),
                a.col.min(b.col).saturating_sub(detour_h),
            ),
            max: Coord::new(
                (a.row.max(b.row) + detour_v).min(grid.rows().saturating_sub(1)),
                (a.col.max(b.col) + detour_h).min(grid.cols().saturating_sub(1)),
            ),
        }
    }

    fn contains(&self, at: Coord) -> bool {
        (self.min.row..=self.max.row).contains(&at.row) && (self.min.col..=self.max.col).contains(&at.col)
    }

    fn width(&self) -> usize {
        self.max.col - self.min.col + 1
    }

    fn index(&self, at: Coord) -> usize {
        (at.row - self.min.row) * self.width() + (at.col - self.min.col)
    }

    fn len(&self) -> usize {
        (self.max.row - self.min.row + 1) * self.width()
    }
}

#[derive(Clone, Copy, Debug)]
struct Best {
    collisions: u64,
    distance: u64,
    from: Option<(Coord, usize)>,
}

/// A found path with its predicted collisions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Found {
    pub waypoints: Vec<Coord>,
    pub collisions: u64,
}

fn axis_of(step: usize) -> Axis {
    if STEPS[step].0 == 0 {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Searches from `source` to `destination` inside `window`.
pub(crate) fn search(
    grid: &Grid,
    source: Coord,
    destination: Coord,
    window: Window,
    corner_penalty: u64,
) -> Option<Found> {
    let mut labels: Vec<Option<Best>> = vec![None; window.len()];
    labels[window.index(source)] = Some(Best {
        collisions: 0,
        distance: 0,
        from: None,
    });
    let mut queue = VecDeque::from([source]);

    while let Some(at) = queue.pop_front() {
        let Some(here) = labels[window.index(at)] else {
            continue;
        };
        let arrived = here.from.map(|(_, step)| step);
        for (step, &(dr, dc)) in STEPS.iter().enumerate() {
            let (Some(row), Some(col)) = (at.row.checked_add_signed(dr), at.col.checked_add_signed(dc)) else {
                continue;
            };
            let next = Coord::new(row, col);
            if !window.contains(next) {
                continue;
            }
            let axis = axis_of(step);
            let at_destination = next == destination;
            let step_collisions = match grid.get(next) {
                _ if at_destination => 0,
                Some(cell) if cell.is_routable() => u64::from(cell.wire_count(axis)),
                _ => continue,
            };
            let mut collisions = here.collisions + step_collisions;
            let mut distance = here.distance + 1;
            if let Some(came) = arrived.map(axis_of).filter(|&a| a != axis) {
                distance += corner_penalty;
                if let Some(cell) = grid.get(at) {
                    collisions += u64::from(cell.wire_count(came));
                }
            }
            let slot = &mut labels[window.index(next)];
            if slot.map_or(true, |l| (collisions, distance) < (l.collisions, l.distance)) {
                *slot = Some(Best {
                    collisions,
                    distance,
                    from: Some((at, step)),
                });
                if !at_destination {
                    queue.push_back(next);
                }
            }
        }
    }

    let reached = labels[window.index(destination)]?;
    let mut waypoints = vec![destination];
    let mut cursor = destination;
    let mut heading = None;
    while let Some((prev, step)) = labels[window.index(cursor)].and_then(|l| l.from) {
        if heading.is_some_and(|h| h != step) {
            waypoints.push(cursor);
        }
        heading = Some(step);
        cursor = prev;
    }
    waypoints.push(source);
    waypoints.reverse();
    Some(Found {
        waypoints,
        collisions: reached.collisions,
    })
}
