//! Conformance test helpers for the weave interconnect toolchain.
//!
//! Provides a reference project configuration, stock tiles, mesh link
//! generators, and pipeline wrappers that run a router and collect its
//! diagnostics for assertion in integration tests.

#![warn(missing_docs)]

use weave_common::Coord;
use weave_config::{resolve_context, ProjectConfig, ResolvedContext, RoutingConfig};
use weave_diagnostics::{Diagnostic, DiagnosticSink};
use weave_fabric::{
    embed_tile, Component, Face, Grid, PlacementMode, RawPort, RawTileDescriptor, Tile, UnitCell,
};
use weave_route::{
    route_array, route_placed, ArrayLink, ArrayRouting, PlacedRouting, PortLink, TilePort,
};

/// Reference `weave.toml`: 10-wire connections at 1 µm pitch, so one unit
/// cell is 0.01 mm square and holds 100 GE.
pub const CONFIG: &str = r#"
[project]
name = "conformance"

[context]
technology = "ref"
protocol = "bus"
bandwidth = 10
frequency = "1GHz"

[technologies.ref]
mm2_per_ge = 1e-6
mm_per_vertical_wire = 0.001
mm_per_horizontal_wire = 0.001
s_per_mm = 1e-10
w_per_mm2_logic = 2.0
w_per_mm2_wire = 1.0

[protocols.bus]
wires_per_bit = 1.0
"#;

/// Port id of the north-facing master and slave of [`mesh_tile`].
pub const NORTH: u32 = 0;
/// East-facing port id.
pub const EAST: u32 = 1;
/// South-facing port id.
pub const SOUTH: u32 = 2;
/// West-facing port id.
pub const WEST: u32 = 3;

/// The face opposite to the port id `face`.
pub fn opposite(face: u32) -> u32 {
    (face + 2) % 4
}

/// Parses [`CONFIG`].
pub fn make_config() -> ProjectConfig {
    weave_config::load_config_from_str(CONFIG).unwrap()
}

/// The default context of [`CONFIG`], resolved.
pub fn context() -> ResolvedContext {
    let config = make_config();
    let ctx = config.context.clone().unwrap();
    resolve_context(&config, &ctx).unwrap()
}

/// A raw tile of `side` x `side` cells with standard wiring.
pub fn raw_square(
    name: &str,
    side: usize,
    placement: PlacementMode,
    masters: Vec<RawPort>,
    slaves: Vec<RawPort>,
) -> RawTileDescriptor {
    RawTileDescriptor {
        name: name.into(),
        area: (side * side * 100) as f64,
        n_endpoints: 1,
        aspect_ratio: 1.0,
        port_placement: placement,
        master_ports: masters,
        slave_ports: slaves,
        phys: Vec::new(),
        connections: Vec::new(),
    }
    .with_standard_wiring()
}

/// 10x10 tile with one master and one slave port per face.
///
/// Masters: north (9, 1), east (1, 9), south (0, 8), west (8, 0).
/// Slaves: north (9, 8), east (8, 9), south (0, 1), west (1, 0).
/// Port ids count faces clockwise from north for both kinds.
pub fn mesh_raw() -> RawTileDescriptor {
    raw_square(
        "mesh",
        10,
        PlacementMode::Auto,
        vec![
            RawPort::on_face(NORTH, Face::North, -1),
            RawPort::on_face(EAST, Face::East, -1),
            RawPort::on_face(SOUTH, Face::South, 1),
            RawPort::on_face(WEST, Face::West, 1),
        ],
        vec![
            RawPort::on_face(0, Face::North, 1),
            RawPort::on_face(1, Face::East, 1),
            RawPort::on_face(2, Face::South, -1),
            RawPort::on_face(3, Face::West, -1),
        ],
    )
}

/// [`mesh_raw`], embedded.
pub fn mesh_tile() -> Tile {
    embed_tile(&mesh_raw(), &context()).unwrap()
}

/// Links every tile of a `rows` x `cols` mesh to each of its neighbours.
///
/// A master on one face drives the slave on the facing side of the
/// neighbour, so every tile pair gets one link per direction.
pub fn mesh_links(rows: usize, cols: usize) -> Vec<ArrayLink> {
    let mut links = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let mut link = |dr: isize, dc: isize, face: u32| {
                let (nr, nc) = (r as isize + dr, c as isize + dc);
                if nr >= 0 && nc >= 0 && (nr as usize) < rows && (nc as usize) < cols {
                    links.push(ArrayLink::new(
                        TilePort::new(r, c, face),
                        TilePort::new(nr as usize, nc as usize, opposite(face)),
                    ));
                }
            };
            link(1, 0, NORTH);
            link(0, 1, EAST);
            link(-1, 0, SOUTH);
            link(0, -1, WEST);
        }
    }
    links
}

/// Largest number of wires any cell carries on one axis.
pub fn max_wires_per_axis(grid: &Grid) -> u32 {
    grid.max_wire_count()
}

/// Number of port and PHY markers in a grid.
pub fn marker_count(grid: &Grid) -> usize {
    grid.iter()
        .filter(|(_, cell)| cell.is_marker() && *cell != UnitCell::Logic)
        .count()
}

/// Cells of `grid` holding `cell`.
pub fn cells_of(grid: &Grid, cell: UnitCell) -> Vec<Coord> {
    grid.iter().filter(|(_, c)| *c == cell).map(|(at, _)| at).collect()
}

/// Result of routing a tile array.
pub struct ArrayResult {
    /// The routed array.
    pub routing: ArrayRouting,
    /// All diagnostics emitted while routing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Routes `links` on a `rows` x `cols` array of `tile`.
pub fn array_pipeline(tile: &Tile, rows: usize, cols: usize, links: &[ArrayLink]) -> ArrayResult {
    let sink = DiagnosticSink::new();
    let routing = route_array("array", tile, rows, cols, links, &sink).unwrap();
    ArrayResult {
        routing,
        diagnostics: sink.take_all(),
    }
}

/// Result of routing placed components.
pub struct PlacedResult {
    /// The routed module and its report.
    pub routed: PlacedRouting,
    /// All diagnostics emitted while routing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Places `components` in a `rows` x `cols` module and routes `links` with
/// the default router settings.
pub fn placed_pipeline(
    rows: usize,
    cols: usize,
    components: Vec<Component>,
    links: &[(&str, &str)],
) -> PlacedResult {
    let mut builder = weave_fabric::ModuleBuilder::new("placed", rows, cols);
    for c in components {
        builder.add_component(c);
    }
    let links: Vec<PortLink> = links
        .iter()
        .map(|(s, d)| PortLink::new(s.parse().unwrap(), d.parse().unwrap()))
        .collect();
    let sink = DiagnosticSink::new();
    let routed = route_placed(builder, &links, &RoutingConfig::default(), &sink).unwrap();
    PlacedResult {
        routed,
        diagnostics: sink.take_all(),
    }
}
