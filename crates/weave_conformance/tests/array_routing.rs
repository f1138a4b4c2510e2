//! Homogeneous routing of regular tile arrays.

use weave_common::Coord;
use weave_conformance::{
    array_pipeline, context, max_wires_per_axis, mesh_links, mesh_tile, raw_square, EAST, WEST,
};
use weave_fabric::{embed_tile, PlacementMode, RawPort, Tile};
use weave_route::{ArrayLink, TilePort};

fn ring() -> Vec<ArrayLink> {
    let link = |m: (usize, u32), s: (usize, u32)| {
        ArrayLink::new(TilePort::new(0, m.0, m.1), TilePort::new(0, s.0, s.1))
    };
    vec![link((0, EAST), (1, WEST)), link((1, EAST), (2, WEST)), link((2, WEST), (0, EAST))]
}

#[test]
fn two_by_two_mesh_routes_every_link() {
    let links = mesh_links(2, 2);
    assert_eq!(links.len(), 8);

    let result = array_pipeline(&mesh_tile(), 2, 2, &links);
    let routing = &result.routing;
    assert_eq!(routing.report().routed.len(), 8);
    assert!(routing.report().unroutable.is_empty());
    assert!(result.diagnostics.is_empty());
    assert_eq!((routing.rows(), routing.cols()), (20, 20));

    let module = routing.to_module().unwrap();
    assert!(max_wires_per_axis(&module.layout().grid) <= 1);
    assert_eq!(module.collisions(), 0);
    for path in routing.paths() {
        assert_eq!(path.corners(), 0, "{:?}", path.waypoints());
    }
}

#[test]
fn every_mesh_port_is_used_once() {
    let links = mesh_links(3, 3);
    // 12 neighbour pairs, one link each way.
    assert_eq!(links.len(), 24);
    let mut masters: Vec<_> = links.iter().map(|l| l.master).collect();
    masters.sort_by_key(|p| (p.row, p.col, p.port));
    masters.dedup();
    assert_eq!(masters.len(), 24);

    let result = array_pipeline(&mesh_tile(), 3, 3, &links);
    assert!(result.routing.report().is_complete());
}

#[test]
fn ring_wrap_link_opens_channels() {
    let result = array_pipeline(&mesh_tile(), 1, 3, &ring());
    let routing = &result.routing;
    assert_eq!(routing.row_sizes(), &[0, 10, 1]);
    assert_eq!(routing.col_sizes(), &[0, 10, 1, 10, 1, 10, 0]);
    assert_eq!(
        routing.tile_origins(),
        &[Coord::new(0, 0), Coord::new(0, 11), Coord::new(0, 22)]
    );

    let c = Coord::new;
    assert_eq!(
        routing.paths()[2].waypoints(),
        &[c(8, 22), c(8, 21), c(10, 21), c(10, 10), c(8, 10), c(8, 9)]
    );
    assert_eq!(routing.report().collisions, 0);
}

#[test]
fn array_routing_is_deterministic() {
    let tile = mesh_tile();
    let links = mesh_links(2, 3);
    let a = array_pipeline(&tile, 2, 3, &links).routing;
    let b = array_pipeline(&tile, 2, 3, &links).routing;
    assert_eq!(a.paths(), b.paths());
    assert_eq!(a.row_sizes(), b.row_sizes());
    assert_eq!(a.col_sizes(), b.col_sizes());
    assert_eq!(a.descriptor(), b.descriptor());
}

/// 10x10 tile whose east master (1, 9) and west slave (8, 0) sit on
/// different rows.
fn skew_tile() -> Tile {
    let raw = raw_square(
        "skew",
        10,
        PlacementMode::Manual,
        vec![RawPort::at(0, Coord::new(1, 9))],
        vec![RawPort::at(0, Coord::new(8, 0))],
    );
    embed_tile(&raw, &context()).unwrap()
}

#[test]
fn misaligned_neighbours_jog_in_the_gap() {
    let link = ArrayLink::new(TilePort::new(0, 0, 0), TilePort::new(0, 1, 0));
    let result = array_pipeline(&skew_tile(), 1, 2, &[link]);
    let routing = &result.routing;
    assert!(routing.report().is_complete());
    assert!(result.diagnostics.is_empty());
    assert_eq!(routing.col_sizes(), &[0, 10, 1, 10, 0]);
    assert_eq!(routing.tile_origins()[1], Coord::new(0, 11));

    let c = |r, c| Coord::new(r, c);
    assert_eq!(routing.paths()[0].waypoints(), &[c(1, 9), c(1, 10), c(8, 10), c(8, 11)]);
    assert_eq!(routing.to_module().unwrap().collisions(), 0);
}
