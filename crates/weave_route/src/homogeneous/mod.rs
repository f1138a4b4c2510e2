//! Router for a regular array of identical tiles.
//!
//! Routing runs in three strictly sequential phases: coarse routing on a
//! grid with one cell per tile and per gap, gap sizing from the coarse
//! routes, and detailed corner-minimizing routing on the fine grid.

mod coarse;
mod detailed;
mod sizing;

use crate::report::{RoutedConnection, RoutingReport, Unroutable};
use detailed::Outcome;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use weave_common::{ComponentId, Coord, Mirror, PortId, WeaveError, WeaveResult};
use weave_diagnostics::DiagnosticSink;
use weave_fabric::{
    Component, ComponentDescriptor, ComponentKind, Label, Module, ModuleBuilder, ModuleDescriptor,
    Terminal, Tile, WirePath,
};

/// A port of the tile at array position `(row, col)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePort {
    /// Array row, 0 at the south.
    pub row: usize,
    /// Array column, 0 at the west.
    pub col: usize,
    /// Port id within the tile.
    pub port: PortId,
}

impl TilePort {
    /// Creates a tile port reference.
    pub fn new(row: usize, col: usize, port: u32) -> Self {
        Self {
            row,
            col,
            port: PortId::from_raw(port),
        }
    }
}

/// A directed link from a master port to a slave port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayLink {
    /// Driving master port.
    pub master: TilePort,
    /// Receiving slave port.
    pub slave: TilePort,
}

impl ArrayLink {
    /// Creates a link.
    pub fn new(master: TilePort, slave: TilePort) -> Self {
        Self { master, slave }
    }
}

/// A routed array.
#[derive(Clone, Debug)]
pub struct ArrayRouting {
    name: String,
    tile: Tile,
    array_rows: usize,
    array_cols: usize,
    row_sizes: Vec<usize>,
    col_sizes: Vec<usize>,
    tile_origins: Vec<Coord>,
    paths: Vec<WirePath>,
    report: RoutingReport,
}

impl ArrayRouting {
    /// Fine height of every coarse row; odd entries are tile rows.
    pub fn row_sizes(&self) -> &[usize] {
        &self.row_sizes
    }

    /// Fine width of every coarse column; odd entries are tile columns.
    pub fn col_sizes(&self) -> &[usize] {
        &self.col_sizes
    }

    /// Fine grid height.
    pub fn rows(&self) -> usize {
        self.row_sizes.iter().sum()
    }

    /// Fine grid width.
    pub fn cols(&self) -> usize {
        self.col_sizes.iter().sum()
    }

    /// Origin of every tile, row-major; index `r * cols + c` is also the
    /// component id of tile `(r, c)`.
    pub fn tile_origins(&self) -> &[Coord] {
        &self.tile_origins
    }

    /// Paths of the routed links, in link order; unroutable links have none.
    pub fn paths(&self) -> &[WirePath] {
        &self.paths
    }

    /// Routing outcome.
    pub fn report(&self) -> &RoutingReport {
        &self.report
    }

    /// Size of the tile array.
    pub fn array_size(&self) -> (usize, usize) {
        (self.array_rows, self.array_cols)
    }

    /// Composes the routed array into a module.
    pub fn to_module(&self) -> WeaveResult<Module> {
        let mut builder = ModuleBuilder::new(self.name.clone(), self.rows(), self.cols());
        for &origin in &self.tile_origins {
            builder.add_component(Component::place(self.tile.clone(), origin, Mirror::NONE));
        }
        for path in &self.paths {
            builder.connect(path.clone());
        }
        builder.build()
    }

    /// The persisted form of the routed array.
    pub fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor {
            name: self.name.clone(),
            context: self.tile.context().clone(),
            n_rows: self.rows(),
            n_cols: self.cols(),
            components: self
                .tile_origins
                .iter()
                .enumerate()
                .map(|(i, &location)| ComponentDescriptor {
                    id: ComponentId::from_raw(i as u32),
                    kind: ComponentKind::Tile,
                    name: self.tile.name().to_string(),
                    location,
                    xmirror: false,
                    ymirror: false,
                })
                .collect(),
            connections: self.paths.clone(),
        }
    }
}

fn check_links(artifact: &str, tile: &Tile, rows: usize, cols: usize, links: &[ArrayLink]) -> WeaveResult<()> {
    if rows == 0 || cols == 0 {
        return Err(WeaveError::spec(artifact, format!("degenerate {rows}x{cols} tile array")));
    }
    for link in links {
        for (end, what) in [(link.master, "master"), (link.slave, "slave")] {
            if end.row >= rows || end.col >= cols {
                return Err(WeaveError::spec(
                    artifact,
                    format!(
                        "{what} tile ({}, {}) is outside the {rows}x{cols} array",
                        end.row, end.col
                    ),
                ));
            }
        }
        if tile.master_location(link.master.port).is_none() {
            return Err(WeaveError::spec(
                artifact,
                format!("tile '{}' has no master port {}", tile.name(), link.master.port.as_raw()),
            ));
        }
        if tile.slave_location(link.slave.port).is_none() {
            return Err(WeaveError::spec(
                artifact,
                format!("tile '{}' has no slave port {}", tile.name(), link.slave.port.as_raw()),
            ));
        }
    }
    let reused = |ports: Vec<TilePort>| {
        let unique: HashSet<TilePort> = ports.iter().copied().collect();
        ports.len() - unique.len()
    };
    let masters = reused(links.iter().map(|l| l.master).collect());
    if masters > 0 {
        return Err(WeaveError::spec(artifact, format!("{masters} master ports are used twice")));
    }
    let slaves = reused(links.iter().map(|l| l.slave).collect());
    if slaves > 0 {
        return Err(WeaveError::spec(artifact, format!("{slaves} slave ports are used twice")));
    }
    Ok(())
}

fn label(cols: usize, end: TilePort, terminal: Terminal) -> Label {
    Label::local(terminal).prefixed(ComponentId::from_raw((end.row * cols + end.col) as u32))
}

/// Places `tile` on a `rows` x `cols` array and routes `links` in order.
///
/// Structural problems with the links are fatal. Congestion is only
/// recorded in the report and flagged in `sink`.
pub fn route_array(
    name: &str,
    tile: &Tile,
    rows: usize,
    cols: usize,
    links: &[ArrayLink],
    sink: &DiagnosticSink,
) -> WeaveResult<ArrayRouting> {
    check_links(name, tile, rows, cols, links)?;

    let coarse = links
        .iter()
        .map(|link| coarse::route(name, tile, link))
        .collect::<WeaveResult<Vec<_>>>()?;
    let sizes = sizing::size_gaps(&coarse, tile.rows(), tile.cols(), rows, cols)?;
    let detailed = detailed::route_all(name, tile, &sizes, links, &coarse, rows, cols)?;

    let mut report = RoutingReport {
        collisions: detailed.collisions,
        max_wires_per_cell: detailed.grid.max_wire_count(),
        ..Default::default()
    };
    let mut paths = Vec::with_capacity(links.len());
    for (link, outcome) in links.iter().zip(detailed.outcomes) {
        let source = label(cols, link.master, Terminal::Master(link.master.port));
        let destination = label(cols, link.slave, Terminal::Slave(link.slave.port));
        match outcome {
            Outcome::Routed(route) => {
                paths.push(route.path.clone());
                report.routed.push(RoutedConnection {
                    source,
                    destination,
                    path: route.path,
                    estimated_collisions: route.estimated_collisions,
                });
            }
            Outcome::Blocked { reason } => report.fail(
                name,
                Unroutable {
                    source,
                    destination,
                    reason,
                },
                sink,
            ),
        }
    }
    report.flag_congestion(name, sink);

    let tile_origins = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .map(|(r, c)| detailed.layout.tile_origin(r, c))
        .collect();
    Ok(ArrayRouting {
        name: name.to_string(),
        tile: tile.clone(),
        array_rows: rows,
        array_cols: cols,
        row_sizes: sizes.rows,
        col_sizes: sizes.cols,
        tile_origins,
        paths,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn link(m: (usize, usize, u32), s: (usize, usize, u32)) -> ArrayLink {
        ArrayLink::new(TilePort::new(m.0, m.1, m.2), TilePort::new(s.0, s.1, s.2))
    }

    fn ring() -> Vec<ArrayLink> {
        vec![
            link((0, 0, 1), (0, 1, 3)),
            link((0, 1, 1), (0, 2, 3)),
            link((0, 2, 3), (0, 0, 1)),
        ]
    }

    #[test]
    fn ring_opens_gaps_for_the_wrap_link() {
        let sink = DiagnosticSink::new();
        let routed = route_array("ring", &fixtures::mesh_tile(), 1, 3, &ring(), &sink).unwrap();
        assert_eq!(routed.row_sizes(), &[0, 10, 1]);
        assert_eq!(routed.col_sizes(), &[0, 10, 1, 10, 1, 10, 0]);
        assert_eq!((routed.rows(), routed.cols()), (11, 32));
        assert_eq!(routed.tile_origins(), &[Coord::new(0, 0), Coord::new(0, 11), Coord::new(0, 22)]);

        let c = |r, c| Coord::new(r, c);
        assert_eq!(routed.paths()[0].waypoints(), &[c(1, 9), c(1, 11)]);
        assert_eq!(
            routed.paths()[2].waypoints(),
            &[c(8, 22), c(8, 21), c(10, 21), c(10, 10), c(8, 10), c(8, 9)]
        );
        assert_eq!(routed.paths()[2].length(), 17);
        assert_eq!(routed.report().collisions, 0);
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn ring_composes_into_a_module() {
        let sink = DiagnosticSink::new();
        let routed = route_array("ring", &fixtures::mesh_tile(), 1, 3, &ring(), &sink).unwrap();
        let module = routed.to_module().unwrap();
        assert_eq!(module.components().len(), 3);
        assert_eq!(module.connections().len(), 3);
        assert_eq!(module.collisions(), 0);
        let wrap = &routed.report().routed[2];
        assert_eq!(wrap.source.to_string(), "2/mp3");
        assert_eq!(wrap.destination.to_string(), "0/sp1");
        assert!(module.graph().shortest_delay(&wrap.source, &wrap.destination).is_some());

        let desc = routed.descriptor();
        assert_eq!(desc.components.len(), 3);
        assert_eq!(desc.components[2].location, Coord::new(0, 22));
        assert_eq!(desc.connections, routed.paths());
    }

    #[test]
    fn routing_is_deterministic() {
        let sink = DiagnosticSink::new();
        let tile = fixtures::mesh_tile();
        let a = route_array("ring", &tile, 1, 3, &ring(), &sink).unwrap();
        let b = route_array("ring", &tile, 1, 3, &ring(), &sink).unwrap();
        assert_eq!(a.paths(), b.paths());
        assert_eq!(a.row_sizes(), b.row_sizes());
        assert_eq!(a.col_sizes(), b.col_sizes());
    }

    #[test]
    fn reused_master_is_rejected() {
        let sink = DiagnosticSink::new();
        let links = vec![link((0, 0, 1), (0, 1, 3)), link((0, 0, 1), (0, 1, 0))];
        let err = route_array("bad", &fixtures::mesh_tile(), 1, 2, &links, &sink).unwrap_err();
        assert!(err.to_string().contains("1 master ports are used twice"));
    }

    #[test]
    fn out_of_range_links_are_rejected() {
        let sink = DiagnosticSink::new();
        let tile = fixtures::mesh_tile();
        let outside = vec![link((0, 0, 1), (0, 5, 3))];
        assert!(route_array("bad", &tile, 1, 2, &outside, &sink).is_err());
        let no_port = vec![link((0, 0, 9), (0, 1, 3))];
        assert!(route_array("bad", &tile, 1, 2, &no_port, &sink).is_err());
        assert!(route_array("bad", &tile, 0, 2, &[], &sink).is_err());
    }
}
