//! Port placement on tile borders.
//!
//! In manual mode every port already names a border cell and placement only
//! validates it. In auto mode ports are distributed evenly along the face
//! they request, keeping the four corner cells free: `align = -1` ports are
//! packed from the low end of the face (column 1 or row 1) upwards and
//! `align = +1` ports from the high end downwards. Opposite faces share one
//! spacing so that ports of neighbouring tiles line up.

use crate::descriptor::{Face, PlacedPort, PlacementMode, RawPort};
use std::collections::HashMap;
use weave_common::{Coord, PortId, WeaveError, WeaveResult};

/// Whether a port drives or receives traffic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortKind {
    /// Outgoing port.
    Master,
    /// Incoming port.
    Slave,
}

impl PortKind {
    fn tag(self, id: PortId) -> String {
        match self {
            PortKind::Master => format!("master port {id}"),
            PortKind::Slave => format!("slave port {id}"),
        }
    }
}

/// Result of placing a tile's ports, in request order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedPorts {
    /// Master ports.
    pub masters: Vec<PlacedPort>,
    /// Slave ports.
    pub slaves: Vec<PlacedPort>,
}

/// Returns the face a border cell belongs to, checking south, north, west,
/// then east. Corner cells resolve to the first match.
pub fn face_of(location: Coord, rows: usize, cols: usize) -> Option<Face> {
    if location.row >= rows || location.col >= cols {
        None
    } else if location.row == 0 {
        Some(Face::South)
    } else if location.row == rows - 1 {
        Some(Face::North)
    } else if location.col == 0 {
        Some(Face::West)
    } else if location.col == cols - 1 {
        Some(Face::East)
    } else {
        None
    }
}

/// Places `masters` and `slaves` on the border of a `rows` x `cols` tile.
pub fn place_ports(
    artifact: &str,
    rows: usize,
    cols: usize,
    mode: PlacementMode,
    masters: &[RawPort],
    slaves: &[RawPort],
) -> WeaveResult<PlacedPorts> {
    let requests: Vec<(PortKind, &RawPort)> = masters
        .iter()
        .map(|p| (PortKind::Master, p))
        .chain(slaves.iter().map(|p| (PortKind::Slave, p)))
        .collect();

    let locations = match mode {
        PlacementMode::Manual => manual_locations(artifact, rows, cols, &requests)?,
        PlacementMode::Auto => auto_locations(artifact, rows, cols, &requests)?,
    };

    let mut taken: HashMap<Coord, String> = HashMap::new();
    for ((kind, port), location) in requests.iter().zip(&locations) {
        let tag = kind.tag(port.id);
        if let Some(other) = taken.insert(*location, tag.clone()) {
            return Err(WeaveError::collision(
                artifact,
                *location,
                format!("{tag} placed on top of {other}"),
            ));
        }
    }

    let (m, s) = locations.split_at(masters.len());
    let placed = |ports: &[RawPort], cells: &[Coord]| -> Vec<PlacedPort> {
        ports
            .iter()
            .zip(cells)
            .map(|(p, &location)| PlacedPort {
                id: p.id,
                location,
            })
            .collect()
    };
    Ok(PlacedPorts {
        masters: placed(masters, m),
        slaves: placed(slaves, s),
    })
}

fn manual_locations(
    artifact: &str,
    rows: usize,
    cols: usize,
    requests: &[(PortKind, &RawPort)],
) -> WeaveResult<Vec<Coord>> {
    requests
        .iter()
        .map(|(kind, port)| {
            let tag = kind.tag(port.id);
            let location = match (port.location, port.face) {
                (Some(location), None) => location,
                _ => {
                    return Err(WeaveError::spec(
                        artifact,
                        format!("{tag}: manual placement needs a location and no face"),
                    ))
                }
            };
            if face_of(location, rows, cols).is_none() {
                return Err(WeaveError::spec(
                    artifact,
                    format!("{tag} at {location} is not on the border of a {rows}x{cols} tile"),
                ));
            }
            Ok(location)
        })
        .collect()
}

fn auto_locations(
    artifact: &str,
    rows: usize,
    cols: usize,
    requests: &[(PortKind, &RawPort)],
) -> WeaveResult<Vec<Coord>> {
    let mut hints = Vec::with_capacity(requests.len());
    let mut counts: HashMap<Face, usize> = HashMap::new();
    for (kind, port) in requests {
        let tag = kind.tag(port.id);
        let (face, align) = match (port.face, port.align, port.location) {
            (Some(face), Some(align), None) => (face, align),
            _ => {
                return Err(WeaveError::spec(
                    artifact,
                    format!("{tag}: auto placement needs a face and an alignment"),
                ))
            }
        };
        if align != -1 && align != 1 {
            return Err(WeaveError::spec(
                artifact,
                format!("{tag}: alignment must be -1 or +1, got {align}"),
            ));
        }
        *counts.entry(face).or_default() += 1;
        hints.push((face, align));
    }

    let face_len = |face: Face| if face.is_horizontal() { cols } else { rows };
    for face in Face::ALL {
        let requested = counts.get(&face).copied().unwrap_or(0);
        let usable = face_len(face).saturating_sub(2);
        if requested > usable {
            return Err(WeaveError::capacity(
                artifact,
                format!("{face} face has room for {usable} ports, {requested} requested"),
            ));
        }
    }

    let count = |face: Face| counts.get(&face).copied().unwrap_or(0);
    let spacing = |face: Face| {
        let usable = face_len(face).saturating_sub(2);
        let busiest = if face.is_horizontal() {
            count(Face::North).max(count(Face::South))
        } else {
            count(Face::East).max(count(Face::West))
        };
        usable / busiest.max(1)
    };

    // Next free index from the low and the high end of each face.
    let mut cursors: HashMap<Face, (usize, usize)> = Face::ALL
        .iter()
        .map(|&f| (f, (1, face_len(f).saturating_sub(2))))
        .collect();

    hints
        .into_iter()
        .map(|(face, align)| {
            let step = spacing(face);
            let cursor = cursors
                .get_mut(&face)
                .ok_or_else(|| WeaveError::internal(format!("no cursor for {face} face")))?;
            let index = if align < 0 {
                let i = cursor.0;
                cursor.0 += step;
                i
            } else {
                let i = cursor.1;
                cursor.1 = cursor.1.saturating_sub(step);
                i
            };
            Ok(match face {
                Face::North => Coord::new(rows - 1, index),
                Face::South => Coord::new(0, index),
                Face::East => Coord::new(index, cols - 1),
                Face::West => Coord::new(index, 0),
            })
        })
        .collect()
}
