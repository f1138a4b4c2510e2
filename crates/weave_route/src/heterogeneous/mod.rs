//! Router for explicitly placed tiles and modules.
//!
//! Components are placed (and possibly mirrored) by the caller through a
//! [`ModuleBuilder`]. Connections are routed one at a time in the given
//! order, each over the occupancy left by the ones before it, so the result
//! depends on the order but is deterministic for a fixed order.

mod maze;

use crate::report::{RoutedConnection, RoutingReport, Unroutable};
use maze::Window;
use serde::{Deserialize, Serialize};
use weave_common::{WeaveError, WeaveResult};
use weave_config::RoutingConfig;
use weave_diagnostics::DiagnosticSink;
use weave_fabric::{Label, Module, ModuleBuilder, WirePath};

/// A connection between two ports of placed components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortLink {
    /// Master port, e.g. `0/mp1`.
    pub source: Label,
    /// Slave port, e.g. `3.1/sp0`.
    pub destination: Label,
}

impl PortLink {
    /// Creates a link.
    pub fn new(source: Label, destination: Label) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// A routed module and what happened while routing it.
#[derive(Clone, Debug)]
pub struct PlacedRouting {
    /// The composed module with every routed connection.
    pub module: Module,
    /// Routing outcome.
    pub report: RoutingReport,
}

/// Routes `links` between the components already added to `builder`.
///
/// Unknown or misdirected labels are fatal. A connection with no path is
/// skipped, recorded in the report, and flagged in `sink`.
pub fn route_placed(
    mut builder: ModuleBuilder,
    links: &[PortLink],
    settings: &RoutingConfig,
    sink: &DiagnosticSink,
) -> WeaveResult<PlacedRouting> {
    let name = builder.name().to_string();
    let floorplan = builder.floorplan()?;
    let ports = &floorplan.layout.ports;
    let mut grid = floorplan.layout.grid.clone();
    let mut report = RoutingReport::default();

    for link in links {
        let source = ports
            .location_of(&link.source)
            .filter(|_| link.source.is_master())
            .ok_or_else(|| {
                WeaveError::spec(name.as_str(), format!("{} is not a master port", link.source))
            })?;
        let destination = ports
            .location_of(&link.destination)
            .filter(|_| link.destination.is_slave())
            .ok_or_else(|| {
                WeaveError::spec(name.as_str(), format!("{} is not a slave port", link.destination))
            })?;

        let window = Window::around(source, destination, settings.detour_h, settings.detour_v, &grid);
        let Some(found) = maze::search(&grid, source, destination, window, settings.corner_penalty)
        else {
            report.fail(
                &name,
                Unroutable {
                    source: link.source.clone(),
                    destination: link.destination.clone(),
                    reason: format!(
                        "no free path from {source} to {destination} within {} to {}",
                        window.min, window.max
                    ),
                },
                sink,
            );
            continue;
        };

        let path = WirePath::new(found.waypoints);
        report.collisions += grid.occupy(&path, &name)?;
        builder.connect(path.clone());
        report.routed.push(RoutedConnection {
            source: link.source.clone(),
            destination: link.destination.clone(),
            path,
            estimated_collisions: found.collisions,
        });
    }

    report.max_wires_per_cell = grid.max_wire_count();
    report.flag_congestion(&name, sink);
    let module = builder.build()?;
    Ok(PlacedRouting { module, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use weave_common::{Coord, Mirror};
    use weave_diagnostics::codes;
    use weave_fabric::{Component, Tile};

    fn label(s: &str) -> Label {
        s.parse().unwrap()
    }

    fn place(tiles: &[(usize, usize)], rows: usize, cols: usize) -> ModuleBuilder {
        let tile: Tile = fixtures::mesh_tile();
        let mut builder = ModuleBuilder::new("placed", rows, cols);
        for &(r, c) in tiles {
            builder.add_component(Component::place(tile.clone(), Coord::new(r, c), Mirror::NONE));
        }
        builder
    }

    #[test]
    fn facing_ports_route_straight() {
        // East master of tile 0 at (1, 9); west slave of tile 1 at (1, 20).
        let sink = DiagnosticSink::new();
        let links = [PortLink::new(label("0/mp1"), label("1/sp3"))];
        let routed = route_placed(place(&[(0, 0), (0, 20)], 10, 30), &links, &RoutingConfig::default(), &sink)
            .unwrap();
        let path = &routed.report.routed[0].path;
        assert_eq!(path.waypoints(), &[Coord::new(1, 9), Coord::new(1, 20)]);
        assert_eq!(routed.module.connections().len(), 1);
        assert!(routed.report.is_complete());
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn blocked_link_is_skipped_and_reported() {
        let sink = DiagnosticSink::new();
        let links = [
            PortLink::new(label("0/mp1"), label("2/sp2")),
            PortLink::new(label("1/mp1"), label("2/sp3")),
        ];
        // Tile 1 abuts tile 0, so the east master of tile 0 is walled in.
        let routed = route_placed(
            place(&[(0, 0), (0, 10), (0, 30)], 10, 40),
            &links,
            &RoutingConfig::default(),
            &sink,
        )
        .unwrap();
        assert_eq!(routed.report.unroutable.len(), 1);
        assert_eq!(routed.report.routed.len(), 1);
        assert_eq!(routed.module.connections().len(), 1);
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, codes::UNROUTABLE);
    }

    #[test]
    fn wrong_port_kind_is_fatal() {
        let sink = DiagnosticSink::new();
        let links = [PortLink::new(label("1/sp3"), label("0/mp1"))];
        let err = route_placed(place(&[(0, 0), (0, 20)], 10, 30), &links, &RoutingConfig::default(), &sink)
            .unwrap_err();
        assert!(matches!(err, WeaveError::Spec { .. }));
    }
}
