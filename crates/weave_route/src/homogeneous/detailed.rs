//! Detailed routing on the fine grid.
//!
//! Tiles and gaps are laid out at their final sizes. Each connection follows
//! its coarse route corner region by corner region: every cell of the next
//! corner region along the current line is a candidate turn, candidates that
//! turn onto the same line are reduced to the cheapest one measured at the
//! region border, and the last stage keeps only candidates level with the
//! slave port. Costs are `(collisions, length)` compared lexicographically.

use super::coarse::CoarseRoute;
use super::ArrayLink;
use super::sizing::{inclusive, GapSizes};
use std::collections::BTreeMap;
use weave_common::{Axis, Coord, WeaveError, WeaveResult};
use weave_fabric::{Grid, Tile, WirePath};

type Pt = (i64, i64);

/// Start offsets of every coarse row and column on the fine grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FineLayout {
    pub row_starts: Vec<usize>,
    pub col_starts: Vec<usize>,
    pub rows: usize,
    pub cols: usize,
}

fn starts(sizes: &[usize]) -> (Vec<usize>, usize) {
    let mut acc = 0;
    let starts = sizes
        .iter()
        .map(|&s| {
            let at = acc;
            acc += s;
            at
        })
        .collect();
    (starts, acc)
}

impl FineLayout {
    pub fn new(sizes: &GapSizes) -> Self {
        let (row_starts, rows) = starts(&sizes.rows);
        let (col_starts, cols) = starts(&sizes.cols);
        Self {
            row_starts,
            col_starts,
            rows,
            cols,
        }
    }

    /// Fine origin of the tile at array position `(row, col)`.
    pub fn tile_origin(&self, row: usize, col: usize) -> Coord {
        Coord::new(self.row_starts[2 * row + 1], self.col_starts[2 * col + 1])
    }
}

/// One routed connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DetailedRoute {
    pub path: WirePath,
    pub estimated_collisions: u64,
}

/// What became of one connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Routed(DetailedRoute),
    Blocked { reason: String },
}

/// Result of the detailed pass.
#[derive(Clone, Debug)]
pub(crate) struct Detailed {
    pub layout: FineLayout,
    pub grid: Grid,
    pub outcomes: Vec<Outcome>,
    pub collisions: u64,
}

#[derive(Clone, Copy, Debug)]
struct State {
    at: Pt,
    collisions: u64,
    length: u64,
    node: usize,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    state: State,
    turn: Pt,
}

/// Where and which way a stage turns.
#[derive(Clone, Copy, Debug)]
struct Turn {
    axis: Axis,
    dir: i64,
    border: i64,
}

/// A point on `axis` at `moving`, with the other coordinate held at `fixed`.
fn pt(axis: Axis, fixed: i64, moving: i64) -> Pt {
    match axis {
        Axis::Horizontal => (fixed, moving),
        Axis::Vertical => (moving, fixed),
    }
}

/// `(fixed, moving)` coordinates of `p` for travel along `axis`.
fn split(axis: Axis, p: Pt) -> (i64, i64) {
    match axis {
        Axis::Horizontal => (p.0, p.1),
        Axis::Vertical => (p.1, p.0),
    }
}

fn along(axis: Axis, c: Coord) -> usize {
    match axis {
        Axis::Horizontal => c.col,
        Axis::Vertical => c.row,
    }
}

fn direction(axis: Axis, from: Coord, to: Coord) -> i64 {
    if along(axis, to) > along(axis, from) {
        1
    } else {
        -1
    }
}

/// `start, start + dir, ...` stopping before `end`.
fn exclusive(start: i64, end: i64, dir: i64) -> impl Iterator<Item = i64> {
    std::iter::successors(Some(start), move |&x| Some(x + dir))
        .take_while(move |&x| (end - x) * dir > 0)
}

fn to_coord(p: Pt) -> WeaveResult<Coord> {
    match (usize::try_from(p.0), usize::try_from(p.1)) {
        (Ok(row), Ok(col)) => Ok(Coord::new(row, col)),
        _ => Err(WeaveError::internal(format!(
            "fine point ({}, {}) is negative",
            p.0, p.1
        ))),
    }
}

fn from_coord(c: Coord) -> Pt {
    (c.row as i64, c.col as i64)
}

struct Router<'a> {
    artifact: &'a str,
    layout: &'a FineLayout,
    sizes: &'a GapSizes,
    grid: Grid,
}

impl Router<'_> {
    /// Wire count on `axis` of a routable cell, `None` for blocked cells.
    fn cost(&self, p: Pt, axis: Axis) -> Option<u64> {
        let at = to_coord(p).ok()?;
        let cell = self.grid.get(at)?;
        cell.is_routable().then(|| u64::from(cell.wire_count(axis)))
    }

    /// Fine start and size of coarse index `k` along `axis`.
    fn region(&self, axis: Axis, k: usize) -> (i64, i64) {
        match axis {
            Axis::Horizontal => (self.layout.col_starts[k] as i64, self.sizes.cols[k] as i64),
            Axis::Vertical => (self.layout.row_starts[k] as i64, self.sizes.rows[k] as i64),
        }
    }

    /// Advances every frontier state through the corner region at `b`.
    fn stage(
        &self,
        frontier: &[State],
        nodes: &mut Vec<(Coord, Option<usize>)>,
        (a, b, c): (Coord, Coord, Coord),
    ) -> WeaveResult<Vec<State>> {
        let travel = a
            .axis_to(b)
            .ok_or_else(|| WeaveError::internal(format!("coarse hop {a} -> {b} is diagonal")))?;
        let turn_axis = travel.other();
        if b.axis_to(c) != Some(turn_axis) {
            return Err(WeaveError::internal(format!(
                "coarse route does not turn at {b}"
            )));
        }
        let dir = direction(travel, a, b);
        let next_dir = direction(turn_axis, b, c);

        let (t0, tsize) = self.region(travel, along(travel, b));
        let (near, far) = if dir > 0 {
            (t0, t0 + tsize)
        } else {
            (t0 + tsize - 1, t0 - 1)
        };
        let (n0, nsize) = self.region(turn_axis, along(turn_axis, b));
        let turn = Turn {
            axis: turn_axis,
            dir: next_dir,
            border: if next_dir > 0 { n0 + nsize - 1 } else { n0 },
        };

        let mut best: BTreeMap<i64, Candidate> = BTreeMap::new();
        for s in frontier {
            let (fixed, t) = split(travel, s.at);
            let (mut coll, mut len) = (s.collisions, s.length);
            for x in exclusive(t + dir, far, dir) {
                let here = pt(travel, fixed, x);
                let Some(step) = self.cost(here, travel) else {
                    break;
                };
                coll += step;
                len += 1;
                if (x - near) * dir < 0 {
                    continue;
                }
                let reached = State {
                    at: here,
                    collisions: coll,
                    length: len,
                    node: s.node,
                };
                let Some(state) = self.turn(reached, turn) else {
                    continue;
                };
                let better = best.get(&x).map_or(true, |o| {
                    (state.collisions, state.length) < (o.state.collisions, o.state.length)
                });
                if better {
                    best.insert(x, Candidate { state, turn: here });
                }
            }
        }

        let mut next = Vec::with_capacity(best.len());
        for o in best.into_values() {
            nodes.push((to_coord(o.turn)?, Some(o.state.node)));
            next.push(State {
                node: nodes.len() - 1,
                ..o.state
            });
        }
        Ok(next)
    }

    /// Turns at `from.at` and runs on to the region border; `None` if blocked.
    ///
    /// The turn cell is charged its wires on the new axis.
    fn turn(&self, from: State, turn: Turn) -> Option<State> {
        let (line, start) = split(turn.axis, from.at);
        let mut state = State {
            collisions: from.collisions + self.cost(from.at, turn.axis)?,
            ..from
        };
        for y in inclusive(start + turn.dir, turn.border, turn.dir) {
            let at = pt(turn.axis, line, y);
            state.collisions += self.cost(at, turn.axis)?;
            state.length += 1;
            state.at = at;
        }
        Some(state)
    }

    /// Runs the corner search for one connection.
    fn search(&self, route: &CoarseRoute, master: Pt, slave: Pt) -> WeaveResult<Option<(WirePath, u64)>> {
        let pts = &route.points;
        let n = pts.len();
        let mut nodes: Vec<(Coord, Option<usize>)> = vec![(to_coord(master)?, None)];
        let mut frontier = vec![State {
            at: master,
            collisions: 0,
            length: 0,
            node: 0,
        }];
        for i in 0..n.saturating_sub(2) {
            frontier = self.stage(&frontier, &mut nodes, (pts[i], pts[i + 1], pts[i + 2]))?;
            if frontier.is_empty() {
                return Ok(None);
            }
        }

        let (a, b) = (pts[n - 2], pts[n - 1]);
        let travel = a
            .axis_to(b)
            .ok_or_else(|| WeaveError::internal(format!("coarse hop {a} -> {b} is diagonal")))?;
        let dir = direction(travel, a, b);
        let (slave_fixed, slave_t) = split(travel, slave);

        let mut chosen: Option<(u64, u64, usize)> = None;
        'states: for s in &frontier {
            let (fixed, t) = split(travel, s.at);
            if fixed != slave_fixed || (slave_t - t) * dir <= 0 {
                continue;
            }
            let (mut coll, mut len) = (s.collisions, s.length);
            for x in exclusive(t + dir, slave_t, dir) {
                let Some(step) = self.cost(pt(travel, fixed, x), travel) else {
                    continue 'states;
                };
                coll += step;
                len += 1;
            }
            if chosen.map_or(true, |(c, l, _)| (coll, len) < (c, l)) {
                chosen = Some((coll, len, s.node));
            }
        }

        let Some((collisions, _, node)) = chosen else {
            return Ok(None);
        };
        let mut waypoints = vec![to_coord(slave)?];
        let mut cursor = Some(node);
        while let Some(i) = cursor {
            waypoints.push(nodes[i].0);
            cursor = nodes[i].1;
        }
        waypoints.reverse();
        Ok(Some((WirePath::new(waypoints), collisions)))
    }

    /// Three-segment route through the midpoint between the two ports.
    fn fallback(&self, route: &CoarseRoute, master: Coord, slave: Coord) -> WeaveResult<(WirePath, u64)> {
        let (first, last) = (route.points[0], route.points[route.points.len() - 1]);
        let points = if first.row == last.row {
            let mid = (master.col + slave.col) / 2;
            vec![master, Coord::new(master.row, mid), Coord::new(slave.row, mid), slave]
        } else if first.col == last.col {
            let mid = (master.row + slave.row) / 2;
            vec![master, Coord::new(mid, master.col), Coord::new(mid, slave.col), slave]
        } else {
            return Err(WeaveError::internal(format!(
                "unable to route {master} -> {slave}: coarse route {first} -> {last} is neither row- nor column-aligned"
            )));
        };
        let path = WirePath::new(simplify(points));
        let estimate = self.estimate(&path)?;
        Ok((path, estimate))
    }

    /// First cell strictly between the ends of `path` that no wire may enter.
    fn obstruction(&self, path: &WirePath) -> WeaveResult<Option<Coord>> {
        let cells = path.cells(self.artifact)?;
        let inner = cells.get(1..cells.len().saturating_sub(1)).unwrap_or(&[]);
        Ok(inner
            .iter()
            .copied()
            .find(|&at| !self.grid.get(at).is_some_and(|cell| cell.is_routable())))
    }

    /// Collisions `path` would cause if marked now.
    fn estimate(&self, path: &WirePath) -> WeaveResult<u64> {
        let cells = path.cells(self.artifact)?;
        let mut total = 0;
        for w in cells.windows(3) {
            let axes = [w[0].axis_to(w[1]), w[1].axis_to(w[2])];
            let Some(cell) = self.grid.get(w[1]) else {
                continue;
            };
            for axis in [Axis::Horizontal, Axis::Vertical] {
                if axes.contains(&Some(axis)) {
                    total += u64::from(cell.wire_count(axis));
                }
            }
        }
        Ok(total)
    }
}

/// Drops repeated and collinear waypoints.
fn simplify(points: Vec<Coord>) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(points.len());
    for p in points {
        if out.last() == Some(&p) {
            continue;
        }
        if out.len() >= 2 {
            let (a, b) = (out[out.len() - 2], out[out.len() - 1]);
            if a.axis_to(b).is_some() && a.axis_to(b) == b.axis_to(p) {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

/// Lays out the fine grid and routes every coarse route in order.
pub(crate) fn route_all(
    artifact: &str,
    tile: &Tile,
    sizes: &GapSizes,
    links: &[ArrayLink],
    routes: &[CoarseRoute],
    array_rows: usize,
    array_cols: usize,
) -> WeaveResult<Detailed> {
    let layout = FineLayout::new(sizes);
    let mut grid = Grid::new(layout.rows, layout.cols);
    for r in 0..array_rows {
        for c in 0..array_cols {
            grid.paste(&tile.layout().grid, layout.tile_origin(r, c), artifact)?;
        }
    }

    let mut router = Router {
        artifact,
        layout: &layout,
        sizes,
        grid,
    };
    let mut out = Vec::with_capacity(routes.len());
    let mut collisions = 0;
    for (link, route) in links.iter().zip(routes) {
        let master = layout
            .tile_origin(link.master.row, link.master.col)
            .offset(route.master_offset);
        let slave = layout
            .tile_origin(link.slave.row, link.slave.col)
            .offset(route.slave_offset);
        let (path, estimated_collisions) =
            match router.search(route, from_coord(master), from_coord(slave))? {
                Some(found) => found,
                None => {
                    let (path, estimate) = router.fallback(route, master, slave)?;
                    if let Some(at) = router.obstruction(&path)? {
                        out.push(Outcome::Blocked {
                            reason: format!(
                                "no corner route from {master} to {slave}, and the direct detour runs into {at}"
                            ),
                        });
                        continue;
                    }
                    (path, estimate)
                }
            };
        collisions += router.grid.occupy(&path, artifact)?;
        out.push(Outcome::Routed(DetailedRoute {
            path,
            estimated_collisions,
        }));
    }
    Ok(Detailed {
        grid: router.grid,
        layout,
        outcomes: out,
        collisions,
    })
}
