//! Persisted descriptor records for raw tiles, embedded tiles, and modules.
//!
//! Descriptors are the typed, serializable form of every artifact. Raw tiles
//! are written by hand or by topology generators; embedded tiles and modules
//! are produced by the embedder and the routers.

use crate::label::Terminal;
use crate::path::WirePath;
use crate::ports::PhyDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use weave_common::{ComponentId, Coord, EndpointId, PhyId, PortId};
use weave_config::FabricContext;

/// How the ports of a raw tile are positioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Every port names a face and an alignment.
    Auto,
    /// Every port names an explicit border cell.
    Manual,
}

/// A side of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// Top row.
    North,
    /// Rightmost column.
    East,
    /// Bottom row.
    South,
    /// Leftmost column.
    West,
}

impl Face {
    /// All faces in a fixed order.
    pub const ALL: [Face; 4] = [Face::North, Face::East, Face::South, Face::West];

    /// Returns `true` for north and south.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Face::North | Face::South)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::North => "north",
            Face::East => "east",
            Face::South => "south",
            Face::West => "west",
        };
        f.write_str(name)
    }
}

/// A port request in a raw tile.
///
/// In auto mode `face` and `align` are set; in manual mode `location` is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPort {
    /// Port id, contiguous from zero per kind.
    pub id: PortId,
    /// Requested face.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<Face>,
    /// `-1` packs from the low end of the face, `+1` from the high end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<i8>,
    /// Explicit border cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coord>,
}

impl RawPort {
    /// A port placed automatically on `face`.
    pub fn on_face(id: u32, face: Face, align: i8) -> Self {
        Self {
            id: PortId::from_raw(id),
            face: Some(face),
            align: Some(align),
            location: None,
        }
    }

    /// A port pinned to `location`.
    pub fn at(id: u32, location: Coord) -> Self {
        Self {
            id: PortId::from_raw(id),
            face: None,
            align: None,
            location: Some(location),
        }
    }
}

/// A PHY of a tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhyDescriptor {
    /// PHY id, contiguous from zero.
    pub id: PhyId,
    /// Cell inside the tile.
    pub location: Coord,
    /// Traffic direction.
    pub direction: PhyDirection,
}

/// A directed connection inside a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Driving vertex.
    pub from: Terminal,
    /// Receiving vertex.
    pub to: Terminal,
}

/// An abstract tile before embedding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTileDescriptor {
    /// Tile name.
    pub name: String,
    /// Logic area excluding router and PHYs, in GE.
    pub area: f64,
    /// Number of local endpoints attached to the router.
    pub n_endpoints: u32,
    /// Height divided by width.
    pub aspect_ratio: f64,
    /// How `master_ports` and `slave_ports` are positioned.
    pub port_placement: PlacementMode,
    /// Outgoing ports.
    #[serde(default)]
    pub master_ports: Vec<RawPort>,
    /// Incoming ports.
    #[serde(default)]
    pub slave_ports: Vec<RawPort>,
    /// Chip-boundary PHYs.
    #[serde(default)]
    pub phys: Vec<PhyDescriptor>,
    /// Internal wiring between router, endpoints, ports, and PHYs.
    #[serde(default)]
    pub connections: Vec<ConnectionDescriptor>,
}

impl RawTileDescriptor {
    /// Replaces the internal wiring with the standard single-router wiring.
    ///
    /// Every endpoint talks to the router in both directions, the router
    /// drives every master port, every slave port drives the router, inbound
    /// PHYs drive the router and the router drives outbound PHYs.
    pub fn with_standard_wiring(mut self) -> Self {
        let router = Terminal::Router;
        let mut connections = Vec::new();
        for i in 0..self.n_endpoints {
            let ep = Terminal::Endpoint(EndpointId::from_raw(i));
            connections.push(ConnectionDescriptor { from: ep, to: router });
            connections.push(ConnectionDescriptor { from: router, to: ep });
        }
        for port in &self.master_ports {
            connections.push(ConnectionDescriptor {
                from: router,
                to: Terminal::Master(port.id),
            });
        }
        for port in &self.slave_ports {
            connections.push(ConnectionDescriptor {
                from: Terminal::Slave(port.id),
                to: router,
            });
        }
        for phy in &self.phys {
            let p = Terminal::Phy(phy.id);
            connections.push(match phy.direction {
                PhyDirection::In => ConnectionDescriptor { from: p, to: router },
                PhyDirection::Out => ConnectionDescriptor { from: router, to: p },
            });
        }
        self.connections = connections;
        self
    }
}

/// A port at a concrete cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPort {
    /// Port id.
    pub id: PortId,
    /// Border cell.
    pub location: Coord,
}

/// A tile embedded into the unit-cell grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedTileDescriptor {
    /// Tile name.
    pub name: String,
    /// Context the tile was sized for.
    pub context: FabricContext,
    /// Height in cells.
    pub n_rows: usize,
    /// Width in cells.
    pub n_cols: usize,
    /// Number of local endpoints.
    pub n_endpoints: u32,
    /// Outgoing ports.
    pub master_ports: Vec<PlacedPort>,
    /// Incoming ports.
    pub slave_ports: Vec<PlacedPort>,
    /// Chip-boundary PHYs.
    #[serde(default)]
    pub phys: Vec<PhyDescriptor>,
    /// Internal wiring.
    #[serde(default)]
    pub connections: Vec<ConnectionDescriptor>,
}

/// Whether a component refers to a tile or to a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// An embedded tile.
    Tile,
    /// A composed module.
    Module,
}

/// One placement inside a module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Position in the component list.
    pub id: ComponentId,
    /// Tile or module.
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Name of the referenced tile or module.
    pub name: String,
    /// South-west corner in the module grid.
    pub location: Coord,
    /// Flip rows before placing.
    #[serde(default)]
    pub xmirror: bool,
    /// Flip columns before placing.
    #[serde(default)]
    pub ymirror: bool,
}

/// A module: placed components and routed connections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Module name.
    pub name: String,
    /// Context shared by all components.
    pub context: FabricContext,
    /// Height in cells.
    pub n_rows: usize,
    /// Width in cells.
    pub n_cols: usize,
    /// Placed components.
    pub components: Vec<ComponentDescriptor>,
    /// Routed connections, master end first.
    #[serde(default)]
    pub connections: Vec<WirePath>,
}
