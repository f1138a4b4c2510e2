//! Embedded tiles: immutable, grid-backed routing elements.

use crate::cell::UnitCell;
use crate::descriptor::{ConnectionDescriptor, EmbeddedTileDescriptor, PhyDescriptor, PlacedPort};
use crate::graph::LogicalGraph;
use crate::grid::Grid;
use crate::label::{Label, Terminal};
use crate::layout::{Layout, TileFrame};
use crate::placement::face_of;
use crate::ports::PortTable;
use crate::stats::AreaPower;
use crate::unit::UnitCellModel;
use weave_common::{Coord, EndpointId, Mirror, PhyId, PortId, WeaveError, WeaveResult};
use weave_config::{FabricContext, ResolvedContext};

/// A tile placed on its own unit-cell grid.
///
/// Every cell is logic except the port and PHY markers. The logical graph has
/// one vertex per router, endpoint, port, and PHY, and one edge per internal
/// connection; every internal edge costs half a tile crossing in each
/// direction.
#[derive(Clone, Debug)]
pub struct Tile {
    name: String,
    context: FabricContext,
    unit: UnitCellModel,
    n_endpoints: u32,
    connections: Vec<ConnectionDescriptor>,
    layout: Layout,
    graph: LogicalGraph,
    stats: AreaPower,
}

/// Checks that `ids` are exactly `0..ids.len()` in some order.
pub(crate) fn check_contiguous(artifact: &str, what: &str, ids: &[u32]) -> WeaveResult<()> {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    for (expected, id) in sorted.iter().enumerate() {
        if *id as usize != expected {
            return Err(WeaveError::spec(
                artifact,
                format!("{what} ids must be contiguous from 0, found {sorted:?}"),
            ));
        }
    }
    Ok(())
}

impl Tile {
    /// Builds a tile from its embedded descriptor.
    ///
    /// Fails eagerly on non-contiguous ids, ports off the border, markers out
    /// of bounds or on top of each other, and connections to missing vertices.
    pub fn from_descriptor(desc: &EmbeddedTileDescriptor, ctx: &ResolvedContext) -> WeaveResult<Tile> {
        let name = desc.name.as_str();
        if desc.context != ctx.context {
            return Err(WeaveError::spec(
                name,
                format!(
                    "tile was embedded for {}/{} but is being built for {}/{}",
                    desc.context.technology,
                    desc.context.protocol,
                    ctx.context.technology,
                    ctx.context.protocol
                ),
            ));
        }
        let (rows, cols) = (desc.n_rows, desc.n_cols);
        if rows == 0 || cols == 0 {
            return Err(WeaveError::spec(name, format!("degenerate {rows}x{cols} tile")));
        }

        let ids = |ports: &[PlacedPort]| ports.iter().map(|p| p.id.as_raw()).collect::<Vec<_>>();
        check_contiguous(name, "master port", &ids(&desc.master_ports))?;
        check_contiguous(name, "slave port", &ids(&desc.slave_ports))?;
        let phy_ids: Vec<u32> = desc.phys.iter().map(|p| p.id.as_raw()).collect();
        check_contiguous(name, "PHY", &phy_ids)?;

        let mut masters = desc.master_ports.clone();
        masters.sort_by_key(|p| p.id);
        let mut slaves = desc.slave_ports.clone();
        slaves.sort_by_key(|p| p.id);
        let mut phys = desc.phys.clone();
        phys.sort_by_key(|p| p.id);

        let mut grid = Grid::filled(rows, cols, UnitCell::Logic);
        let mut ports = PortTable::new();
        for port in &masters {
            place_port(&mut grid, name, port, UnitCell::MasterPort(port.id))?;
            ports.push_master(Label::local(Terminal::Master(port.id)), port.location);
        }
        for port in &slaves {
            place_port(&mut grid, name, port, UnitCell::SlavePort(port.id))?;
            ports.push_slave(Label::local(Terminal::Slave(port.id)), port.location);
        }
        for phy in &phys {
            place_marker(&mut grid, name, phy.location, UnitCell::Phy(phy.id))?;
            ports.push_phy(Label::local(Terminal::Phy(phy.id)), phy.location, phy.direction);
        }

        let exists = |t: Terminal| match t {
            Terminal::Router => true,
            Terminal::Endpoint(id) => id.as_raw() < desc.n_endpoints,
            Terminal::Master(id) => id.index() < masters.len(),
            Terminal::Slave(id) => id.index() < slaves.len(),
            Terminal::Phy(id) => id.index() < phys.len(),
        };
        for c in &desc.connections {
            for t in [c.from, c.to] {
                if !exists(t) {
                    return Err(WeaveError::spec(
                        name,
                        format!("connection {} -> {} references missing {t}", c.from, c.to),
                    ));
                }
            }
        }

        let unit = UnitCellModel::new(ctx);
        let mut graph = LogicalGraph::new();
        graph.add_vertex(Label::local(Terminal::Router));
        for i in 0..desc.n_endpoints {
            graph.add_vertex(Label::local(Terminal::Endpoint(EndpointId::from_raw(i))));
        }
        for entry in ports.masters().iter().chain(ports.slaves()) {
            graph.add_vertex(entry.label.clone());
        }
        for entry in ports.phys() {
            graph.add_vertex(entry.label.clone());
        }
        let delay = rows as f64 * unit.delay_v / 2.0 + cols as f64 * unit.delay_h / 2.0;
        for c in &desc.connections {
            graph.add_edge(&Label::local(c.from), &Label::local(c.to), delay)?;
        }

        Ok(Tile {
            name: desc.name.clone(),
            context: desc.context.clone(),
            unit,
            n_endpoints: desc.n_endpoints,
            connections: desc.connections.clone(),
            layout: Layout {
                grid,
                ports,
                frames: vec![TileFrame {
                    origin: Coord::new(0, 0),
                    rows,
                    cols,
                }],
                paths: Vec::new(),
            },
            graph,
            stats: AreaPower::tile(rows, cols, &unit),
        })
    }

    /// Tile name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Context the tile was embedded for.
    pub fn context(&self) -> &FabricContext {
        &self.context
    }

    /// Unit cell of the tile's context.
    pub fn unit(&self) -> &UnitCellModel {
        &self.unit
    }

    /// Height in cells.
    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    /// Width in cells.
    pub fn cols(&self) -> usize {
        self.layout.cols()
    }

    /// Number of local endpoints.
    pub fn n_endpoints(&self) -> u32 {
        self.n_endpoints
    }

    /// Internal wiring.
    pub fn connections(&self) -> &[ConnectionDescriptor] {
        &self.connections
    }

    /// Grid, ports, and frame.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Logical graph with local labels.
    pub fn graph(&self) -> &LogicalGraph {
        &self.graph
    }

    /// Area and power.
    pub fn stats(&self) -> &AreaPower {
        &self.stats
    }

    /// Location of master port `id`.
    pub fn master_location(&self, id: PortId) -> Option<Coord> {
        self.layout.ports.masters().get(id.index()).map(|p| p.location)
    }

    /// Location of slave port `id`.
    pub fn slave_location(&self, id: PortId) -> Option<Coord> {
        self.layout.ports.slaves().get(id.index()).map(|p| p.location)
    }

    /// A reflected copy of this tile. Labels and the graph are unchanged.
    pub fn mirrored(&self, mirror: Mirror) -> Tile {
        Tile {
            layout: self.layout.mirrored(mirror),
            ..self.clone()
        }
    }

    /// The persisted form of this tile, reflecting its current orientation.
    pub fn descriptor(&self) -> EmbeddedTileDescriptor {
        let placed = |entries: &[crate::ports::PortEntry]| -> Vec<PlacedPort> {
            entries
                .iter()
                .filter_map(|e| match e.label.terminal {
                    Terminal::Master(id) | Terminal::Slave(id) => Some(PlacedPort {
                        id,
                        location: e.location,
                    }),
                    _ => None,
                })
                .collect()
        };
        let phys = self
            .layout
            .ports
            .phys()
            .iter()
            .enumerate()
            .map(|(i, e)| PhyDescriptor {
                id: match e.label.terminal {
                    Terminal::Phy(id) => id,
                    _ => PhyId::from_raw(i as u32),
                },
                location: e.location,
                direction: e.direction,
            })
            .collect();
        EmbeddedTileDescriptor {
            name: self.name.clone(),
            context: self.context.clone(),
            n_rows: self.rows(),
            n_cols: self.cols(),
            n_endpoints: self.n_endpoints,
            master_ports: placed(self.layout.ports.masters()),
            slave_ports: placed(self.layout.ports.slaves()),
            phys,
            connections: self.connections.clone(),
        }
    }
}

fn place_port(grid: &mut Grid, artifact: &str, port: &PlacedPort, marker: UnitCell) -> WeaveResult<()> {
    if face_of(port.location, grid.rows(), grid.cols()).is_none() {
        return Err(WeaveError::spec(
            artifact,
            format!(
                "port {} at {} is not on the border of a {}x{} tile",
                port.id,
                port.location,
                grid.rows(),
                grid.cols()
            ),
        ));
    }
    place_marker(grid, artifact, port.location, marker)
}

fn place_marker(grid: &mut Grid, artifact: &str, at: Coord, marker: UnitCell) -> WeaveResult<()> {
    match grid.get(at) {
        None => Err(WeaveError::spec(
            artifact,
            format!("{marker:?} at {at} is outside the {}x{} tile", grid.rows(), grid.cols()),
        )),
        Some(UnitCell::Logic) => {
            grid.set(at, marker);
            Ok(())
        }
        Some(other) => Err(WeaveError::collision(
            artifact,
            at,
            format!("{marker:?} placed on top of {other:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PhyDirection;
    use crate::unit::fixtures;

    fn port(id: u32, row: usize, col: usize) -> PlacedPort {
        PlacedPort {
            id: PortId::from_raw(id),
            location: Coord::new(row, col),
        }
    }

    fn descriptor() -> EmbeddedTileDescriptor {
        EmbeddedTileDescriptor {
            name: "t".into(),
            context: fixtures::context().context,
            n_rows: 4,
            n_cols: 6,
            n_endpoints: 1,
            master_ports: vec![port(0, 3, 2)],
            slave_ports: vec![port(1, 1, 0), port(0, 0, 4)],
            phys: vec![PhyDescriptor {
                id: PhyId::from_raw(0),
                location: Coord::new(2, 2),
                direction: PhyDirection::Out,
            }],
            connections: vec![
                ConnectionDescriptor {
                    from: Terminal::Router,
                    to: Terminal::Master(PortId::from_raw(0)),
                },
                ConnectionDescriptor {
                    from: Terminal::Slave(PortId::from_raw(1)),
                    to: Terminal::Router,
                },
            ],
        }
    }

    #[test]
    fn builds_grid_ports_and_graph() {
        let ctx = fixtures::context();
        let tile = Tile::from_descriptor(&descriptor(), &ctx).unwrap();
        let census = tile.layout().grid.census();
        assert_eq!(census.logic, 24);
        assert_eq!(
            tile.layout().grid.get(Coord::new(0, 4)),
            Some(UnitCell::SlavePort(PortId::from_raw(0)))
        );
        // Slaves are ordered by id.
        assert_eq!(tile.slave_location(PortId::from_raw(1)), Some(Coord::new(1, 0)));
        // r, ep0, mp0, sp0, sp1, p0
        assert_eq!(tile.graph().vertex_count(), 6);
        assert_eq!(tile.graph().edge_count(), 2);
        let (_, _, delay) = tile.graph().edges().next().unwrap();
        let unit = tile.unit();
        assert!((delay - (4.0 * unit.delay_v / 2.0 + 6.0 * unit.delay_h / 2.0)).abs() < 1e-15);
    }

    #[test]
    fn non_contiguous_ids_rejected() {
        let mut d = descriptor();
        d.slave_ports[1].id = PortId::from_raw(2);
        let err = Tile::from_descriptor(&d, &fixtures::context()).unwrap_err();
        assert!(matches!(err, WeaveError::Spec { .. }));
    }

    #[test]
    fn interior_port_rejected() {
        let mut d = descriptor();
        d.master_ports[0].location = Coord::new(1, 1);
        assert!(Tile::from_descriptor(&d, &fixtures::context()).is_err());
    }

    #[test]
    fn phy_on_port_collides() {
        let mut d = descriptor();
        d.phys[0].location = Coord::new(3, 2);
        let err = Tile::from_descriptor(&d, &fixtures::context()).unwrap_err();
        assert_eq!(err.location(), Some(Coord::new(3, 2)));
    }

    #[test]
    fn dangling_connection_rejected() {
        let mut d = descriptor();
        d.connections.push(ConnectionDescriptor {
            from: Terminal::Endpoint(EndpointId::from_raw(3)),
            to: Terminal::Router,
        });
        assert!(Tile::from_descriptor(&d, &fixtures::context()).is_err());
    }

    #[test]
    fn context_mismatch_rejected() {
        let mut d = descriptor();
        d.context.technology = "other".into();
        assert!(Tile::from_descriptor(&d, &fixtures::context()).is_err());
    }

    #[test]
    fn mirror_twice_restores_ports() {
        let tile = Tile::from_descriptor(&descriptor(), &fixtures::context()).unwrap();
        for mirror in [Mirror::X, Mirror::Y, Mirror::new(true, true)] {
            let once = tile.mirrored(mirror);
            assert_eq!(once.rows(), tile.rows());
            let twice = once.mirrored(mirror);
            assert_eq!(twice.layout(), tile.layout());
        }
        let x = tile.mirrored(Mirror::X);
        assert_eq!(x.master_location(PortId::from_raw(0)), Some(Coord::new(0, 2)));
        assert_eq!(x.descriptor().master_ports[0].location, Coord::new(0, 2));
    }

    #[test]
    fn descriptor_roundtrip() {
        let ctx = fixtures::context();
        let tile = Tile::from_descriptor(&descriptor(), &ctx).unwrap();
        let again = Tile::from_descriptor(&tile.descriptor(), &ctx).unwrap();
        assert_eq!(again.layout(), tile.layout());
        assert_eq!(again.descriptor(), tile.descriptor());
    }
}
