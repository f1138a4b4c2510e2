//! Unit cells, the atoms of every physical layout.

use serde::{Deserialize, Serialize};
use weave_common::{Axis, PhyId, PortId};

/// The content of one unit cell.
///
/// A cell holds either a single marker (logic, a port, a PHY) or a pair of
/// wire counters. Markers never share a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCell {
    /// Free space that wires may use.
    #[default]
    Empty,
    /// Tile logic.
    Logic,
    /// A master (outgoing) port.
    MasterPort(PortId),
    /// A slave (incoming) port.
    SlavePort(PortId),
    /// A chip-boundary PHY.
    Phy(PhyId),
    /// Routing wires: number of horizontal and vertical wires through the cell.
    Wire {
        /// Horizontal wire count.
        h: u32,
        /// Vertical wire count.
        v: u32,
    },
}

impl UnitCell {
    /// Returns `true` if wires may pass through this cell.
    pub fn is_routable(self) -> bool {
        matches!(self, UnitCell::Empty | UnitCell::Wire { .. })
    }

    /// Returns `true` for logic, port, and PHY markers.
    pub fn is_marker(self) -> bool {
        !self.is_routable()
    }

    /// Number of wires using this cell along `axis`.
    pub fn wire_count(self, axis: Axis) -> u32 {
        match (self, axis) {
            (UnitCell::Wire { h, .. }, Axis::Horizontal) => h,
            (UnitCell::Wire { v, .. }, Axis::Vertical) => v,
            _ => 0,
        }
    }

    /// Returns `true` for a wire cell carrying at least one wire.
    pub fn is_wired(self) -> bool {
        matches!(self, UnitCell::Wire { h, v } if h.max(v) > 0)
    }

    /// One-character rendering used by the ASCII floorplan dump.
    pub fn symbol(self) -> char {
        match self {
            UnitCell::Empty => '.',
            UnitCell::Logic => '#',
            UnitCell::MasterPort(_) => 'M',
            UnitCell::SlavePort(_) => 'S',
            UnitCell::Phy(_) => 'P',
            UnitCell::Wire { h, v } => match (h > 0, v > 0) {
                (true, true) => '+',
                (true, false) => '-',
                (false, true) => '|',
                (false, false) => '.',
            },
        }
    }
}
