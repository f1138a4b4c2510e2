//! Coarse routing: one cell per tile and one per gap.
//!
//! Tile `(r, c)` of the array sits at coarse cell `(2r + 1, 2c + 1)`; even
//! coarse rows and columns are the gaps between tiles. A coarse route leaves
//! the master's tile through the face the port sits on, crosses the gaps,
//! and enters the slave's tile through the slave's face.

use super::ArrayLink;
use weave_common::{Coord, WeaveError, WeaveResult};
use weave_fabric::{face_of, Face, Tile};

/// A link routed on the coarse grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CoarseRoute {
    /// Coarse waypoints, master tile first and slave tile last.
    pub points: Vec<Coord>,
    /// Master port cell inside its tile.
    pub master_offset: Coord,
    /// Slave port cell inside its tile.
    pub slave_offset: Coord,
}

fn tile_cell(row: usize, col: usize) -> Coord {
    Coord::new(2 * row + 1, 2 * col + 1)
}

/// The coarse cell just outside `face` of the tile at `at`.
fn beyond(at: Coord, face: Face) -> Coord {
    match face {
        Face::North => Coord::new(at.row + 1, at.col),
        Face::South => Coord::new(at.row - 1, at.col),
        Face::East => Coord::new(at.row, at.col + 1),
        Face::West => Coord::new(at.row, at.col - 1),
    }
}

fn port_face(artifact: &str, tile: &Tile, location: Coord, what: &str) -> WeaveResult<Face> {
    face_of(location, tile.rows(), tile.cols()).ok_or_else(|| {
        WeaveError::spec(
            artifact,
            format!("{what} at {location} is not on the border of tile '{}'", tile.name()),
        )
    })
}

/// Routes `link` on the coarse grid.
pub(crate) fn route(artifact: &str, tile: &Tile, link: &ArrayLink) -> WeaveResult<CoarseRoute> {
    let missing = |what: &str| {
        WeaveError::spec(artifact, format!("tile '{}' has no {what}", tile.name()))
    };
    let master_offset = tile
        .master_location(link.master.port)
        .ok_or_else(|| missing(&format!("master port {}", link.master.port.as_raw())))?;
    let slave_offset = tile
        .slave_location(link.slave.port)
        .ok_or_else(|| missing(&format!("slave port {}", link.slave.port.as_raw())))?;
    let master_face = port_face(artifact, tile, master_offset, "master port")?;
    let slave_face = port_face(artifact, tile, slave_offset, "slave port")?;

    let start = tile_cell(link.master.row, link.master.col);
    let end = tile_cell(link.slave.row, link.slave.col);
    let exit = beyond(start, master_face);
    let entry = beyond(end, slave_face);

    let middle = match (master_face.is_horizontal(), slave_face.is_horizontal()) {
        (true, true) if exit.row == entry.row => Vec::new(),
        (true, true) => {
            let col = if end.col >= start.col { exit.col + 1 } else { exit.col - 1 };
            vec![Coord::new(exit.row, col), Coord::new(entry.row, col)]
        }
        (false, false) if exit.col == entry.col => Vec::new(),
        (false, false) => {
            let row = if end.row >= start.row { exit.row + 1 } else { exit.row - 1 };
            vec![Coord::new(row, exit.col), Coord::new(row, entry.col)]
        }
        (true, false) => vec![Coord::new(exit.row, entry.col)],
        (false, true) => vec![Coord::new(entry.row, exit.col)],
    };

    let points = if middle.is_empty() && exit == entry {
        vec![start, end]
    } else {
        let mut points = vec![start, exit];
        points.extend(middle);
        points.push(entry);
        points.push(end);
        points
    };
    Ok(CoarseRoute {
        points,
        master_offset,
        slave_offset,
    })
}
