//! Tile embedding: sizing, port placement, and face capacity.

use weave_common::{Coord, PhyId, PortId, WeaveError};
use weave_conformance::{cells_of, context, marker_count, mesh_raw, mesh_tile, raw_square};
use weave_fabric::{
    embed_descriptor, embed_tile, Face, PhyDescriptor, PhyDirection, PlacementMode, RawPort, UnitCell,
};

#[test]
fn mesh_tile_is_ten_by_ten() {
    let tile = mesh_tile();
    assert_eq!((tile.rows(), tile.cols()), (10, 10));
    assert!((tile.stats().total_area_mm2 - 0.01).abs() < 1e-12);
}

#[test]
fn aspect_ratio_shapes_the_tile() {
    let mut raw = mesh_raw();
    raw.aspect_ratio = 4.0;
    raw.master_ports.clear();
    raw.slave_ports.clear();
    let tile = embed_tile(&raw.with_standard_wiring(), &context()).unwrap();
    assert_eq!((tile.rows(), tile.cols()), (20, 5));
}

#[test]
fn one_marker_per_port_and_phy() {
    let mut raw = mesh_raw();
    raw.phys = vec![
        PhyDescriptor {
            id: PhyId::from_raw(0),
            location: Coord::new(4, 4),
            direction: PhyDirection::In,
        },
        PhyDescriptor {
            id: PhyId::from_raw(1),
            location: Coord::new(5, 5),
            direction: PhyDirection::Out,
        },
    ];
    let tile = embed_tile(&raw.with_standard_wiring(), &context()).unwrap();
    let grid = &tile.layout().grid;
    assert_eq!(marker_count(grid), 4 + 4 + 2);
    assert_eq!(cells_of(grid, UnitCell::Phy(PhyId::from_raw(1))), vec![Coord::new(5, 5)]);
}

#[test]
fn ports_sit_on_the_border() {
    let tile = mesh_tile();
    let grid = &tile.layout().grid;
    for (at, cell) in grid.iter() {
        if matches!(cell, UnitCell::MasterPort(_) | UnitCell::SlavePort(_)) {
            assert!(grid.on_border(at), "port at {at} is inside the tile");
        }
    }
    assert_eq!(tile.master_location(PortId::from_raw(0)), Some(Coord::new(9, 1)));
    assert_eq!(tile.slave_location(PortId::from_raw(3)), Some(Coord::new(1, 0)));
}

#[test]
fn auto_placement_never_shares_a_cell() {
    let desc = embed_descriptor(&mesh_raw(), &context()).unwrap();
    let mut cells: Vec<Coord> = desc
        .master_ports
        .iter()
        .chain(&desc.slave_ports)
        .map(|p| p.location)
        .collect();
    cells.sort();
    cells.dedup();
    assert_eq!(cells.len(), 8);
}

#[test]
fn face_holds_length_minus_two_ports() {
    let north = |n: u32| (0..n).map(|i| RawPort::on_face(i, Face::North, -1)).collect::<Vec<_>>();

    let fits = raw_square("six", 6, PlacementMode::Auto, north(4), Vec::new());
    let tile = embed_tile(&fits, &context()).unwrap();
    assert_eq!(tile.cols(), 6);

    let crowded = raw_square("six", 6, PlacementMode::Auto, north(6), Vec::new());
    let err = embed_tile(&crowded, &context()).unwrap_err();
    assert!(matches!(err, WeaveError::Capacity { ref artifact, .. } if artifact == "six"));
}

#[test]
fn manual_ports_must_touch_the_border() {
    let inside = raw_square(
        "pinned",
        10,
        PlacementMode::Manual,
        vec![RawPort::at(0, Coord::new(5, 5))],
        Vec::new(),
    );
    assert!(matches!(embed_tile(&inside, &context()).unwrap_err(), WeaveError::Spec { .. }));
}

#[test]
fn non_contiguous_port_ids_are_rejected() {
    let raw = raw_square(
        "gappy",
        10,
        PlacementMode::Auto,
        vec![RawPort::on_face(0, Face::North, -1), RawPort::on_face(2, Face::East, -1)],
        Vec::new(),
    );
    assert!(matches!(embed_tile(&raw, &context()).unwrap_err(), WeaveError::Spec { .. }));
}
