//! Tile embedding: from an abstract tile to a placed, grid-sized tile.

use crate::descriptor::{EmbeddedTileDescriptor, RawTileDescriptor};
use crate::placement::place_ports;
use crate::tile::{check_contiguous, Tile};
use crate::unit::UnitCellModel;
use weave_common::{WeaveError, WeaveResult};
use weave_config::ResolvedContext;

/// Size of a tile before and after quantization to unit cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileFootprint {
    /// Logic, router, and PHY area, in GE.
    pub area_ge: f64,
    /// The same area in mm².
    pub area_mm2: f64,
    /// Height in cells.
    pub rows: usize,
    /// Width in cells.
    pub cols: usize,
}

/// Computes the cell dimensions of `raw` in `ctx`.
///
/// The router has one input per endpoint and slave port and one output per
/// endpoint and master port. Height and width follow from the total area and
/// the aspect ratio (height over width) and are rounded to whole cells.
pub fn footprint(raw: &RawTileDescriptor, ctx: &ResolvedContext) -> WeaveResult<TileFootprint> {
    let name = raw.name.as_str();
    if !(raw.aspect_ratio.is_finite() && raw.aspect_ratio > 0.0) {
        return Err(WeaveError::spec(
            name,
            format!("aspect ratio must be positive, got {}", raw.aspect_ratio),
        ));
    }
    if !(raw.area.is_finite() && raw.area >= 0.0) {
        return Err(WeaveError::spec(name, format!("invalid logic area {}", raw.area)));
    }

    let bw = ctx.context.bandwidth;
    let inputs = raw.n_endpoints + raw.slave_ports.len() as u32;
    let outputs = raw.n_endpoints + raw.master_ports.len() as u32;
    let area_ge = raw.area
        + ctx.protocol.router_area_ge(inputs, outputs, bw)
        + raw.phys.len() as f64 * ctx.protocol.phy_area_ge(bw);
    let area_mm2 = area_ge * ctx.technology.mm2_per_ge;

    let height_mm = (raw.aspect_ratio * area_mm2).sqrt();
    let width_mm = (area_mm2 / raw.aspect_ratio).sqrt();
    let unit = UnitCellModel::new(ctx);
    let rows = (height_mm / unit.height_mm).round() as usize;
    let cols = (width_mm / unit.width_mm).round() as usize;
    if rows == 0 || cols == 0 {
        return Err(WeaveError::spec(
            name,
            format!("{area_ge} GE rounds to a degenerate {rows}x{cols} tile"),
        ));
    }
    Ok(TileFootprint {
        area_ge,
        area_mm2,
        rows,
        cols,
    })
}

/// Sizes `raw`, places its ports, and returns the embedded descriptor.
pub fn embed_descriptor(
    raw: &RawTileDescriptor,
    ctx: &ResolvedContext,
) -> WeaveResult<EmbeddedTileDescriptor> {
    let name = raw.name.as_str();
    let ids = |ports: &[crate::descriptor::RawPort]| {
        ports.iter().map(|p| p.id.as_raw()).collect::<Vec<_>>()
    };
    check_contiguous(name, "master port", &ids(&raw.master_ports))?;
    check_contiguous(name, "slave port", &ids(&raw.slave_ports))?;

    let size = footprint(raw, ctx)?;
    let placed = place_ports(
        name,
        size.rows,
        size.cols,
        raw.port_placement,
        &raw.master_ports,
        &raw.slave_ports,
    )?;
    Ok(EmbeddedTileDescriptor {
        name: raw.name.clone(),
        context: ctx.context.clone(),
        n_rows: size.rows,
        n_cols: size.cols,
        n_endpoints: raw.n_endpoints,
        master_ports: placed.masters,
        slave_ports: placed.slaves,
        phys: raw.phys.clone(),
        connections: raw.connections.clone(),
    })
}

/// Embeds `raw` and builds the resulting tile.
pub fn embed_tile(raw: &RawTileDescriptor, ctx: &ResolvedContext) -> WeaveResult<Tile> {
    Tile::from_descriptor(&embed_descriptor(raw, ctx)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::UnitCell;
    use crate::descriptor::{Face, PhyDescriptor, PlacementMode, RawPort};
    use crate::ports::PhyDirection;
    use crate::unit::fixtures;
    use weave_common::{Coord, PhyId};

    fn mesh_tile(area: f64) -> RawTileDescriptor {
        RawTileDescriptor {
            name: "mesh".into(),
            area,
            n_endpoints: 1,
            aspect_ratio: 1.0,
            port_placement: PlacementMode::Auto,
            master_ports: vec![
                RawPort::on_face(0, Face::North, -1),
                RawPort::on_face(1, Face::East, -1),
                RawPort::on_face(2, Face::South, 1),
                RawPort::on_face(3, Face::West, 1),
            ],
            slave_ports: vec![
                RawPort::on_face(0, Face::North, 1),
                RawPort::on_face(1, Face::East, 1),
                RawPort::on_face(2, Face::South, -1),
                RawPort::on_face(3, Face::West, -1),
            ],
            phys: vec![PhyDescriptor {
                id: PhyId::from_raw(0),
                location: Coord::new(5, 5),
                direction: PhyDirection::In,
            }],
            connections: Vec::new(),
        }
        .with_standard_wiring()
    }

    #[test]
    fn square_tile_dimensions() {
        // 10 000 GE at 1e-6 mm² each on 0.01 mm cells.
        let size = footprint(&mesh_tile(10_000.0), &fixtures::context()).unwrap();
        assert_eq!((size.rows, size.cols), (10, 10));
    }

    #[test]
    fn aspect_ratio_stretches_rows() {
        let mut raw = mesh_tile(10_000.0);
        raw.aspect_ratio = 4.0;
        let size = footprint(&raw, &fixtures::context()).unwrap();
        assert_eq!((size.rows, size.cols), (20, 5));
    }

    #[test]
    fn router_and_phy_area_count() {
        let mut ctx = fixtures::context();
        ctx.protocol.router_base_ge = 5_000.0;
        ctx.protocol.phy_base_ge = 1_250.0;
        let raw = mesh_tile(10_000.0);
        let size = footprint(&raw, &ctx).unwrap();
        assert_eq!(size.area_ge, 16_250.0);
        // sqrt(0.01625) / 0.01 is about 12.75
        assert_eq!((size.rows, size.cols), (13, 13));
    }

    #[test]
    fn embedded_tile_has_every_marker() {
        let tile = embed_tile(&mesh_tile(10_000.0), &fixtures::context()).unwrap();
        let grid = &tile.layout().grid;
        let markers = grid
            .iter()
            .filter(|(_, c)| !matches!(c, UnitCell::Logic | UnitCell::Empty | UnitCell::Wire { .. }))
            .count();
        assert_eq!(markers, 4 + 4 + 1);
        for entry in tile.layout().ports.masters().iter().chain(tile.layout().ports.slaves()) {
            assert!(grid.on_border(entry.location));
        }
        // r + ep0 + 8 ports + p0, standard wiring: 2 + 4 + 4 + 1 edges
        assert_eq!(tile.graph().vertex_count(), 11);
        assert_eq!(tile.graph().edge_count(), 11);
    }

    #[test]
    fn over_capacity_face() {
        let mut raw = mesh_tile(3_600.0);
        raw.master_ports = (0..6).map(|i| RawPort::on_face(i, Face::North, -1)).collect();
        raw.slave_ports.clear();
        raw.phys.clear();
        raw.connections.clear();
        let size = footprint(&raw, &fixtures::context()).unwrap();
        assert_eq!(size.cols, 6);
        let err = embed_descriptor(&raw, &fixtures::context()).unwrap_err();
        assert!(matches!(err, WeaveError::Capacity { .. }));
    }

    #[test]
    fn degenerate_inputs() {
        let mut raw = mesh_tile(10_000.0);
        raw.aspect_ratio = 0.0;
        assert!(footprint(&raw, &fixtures::context()).is_err());
        let raw = mesh_tile(0.0);
        assert!(matches!(
            footprint(&raw, &fixtures::context()).unwrap_err(),
            WeaveError::Spec { .. }
        ));
    }

    #[test]
    fn duplicate_port_ids_rejected() {
        let mut raw = mesh_tile(10_000.0);
        raw.master_ports[3].id = weave_common::PortId::from_raw(0);
        assert!(embed_descriptor(&raw, &fixtures::context()).is_err());
    }
}
