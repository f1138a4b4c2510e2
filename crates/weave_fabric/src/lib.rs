//! Physical fabric model for the weave interconnect toolchain.
//!
//! Everything here lives on a grid of unit cells. A raw tile description is
//! sized and given port locations by [`embed`], turned into a [`Tile`] with a
//! marker grid and a logical graph, and composed with other tiles and
//! modules into a [`Module`] by [`ModuleBuilder`]. Tiles and modules can be
//! reflected with [`Mirror`](weave_common::Mirror) at placement time.

#![warn(missing_docs)]

pub mod cell;
pub mod descriptor;
pub mod embed;
pub mod graph;
pub mod grid;
pub mod label;
pub mod layout;
pub mod module;
pub mod path;
pub mod placement;
pub mod ports;
pub mod stats;
pub mod tile;
pub mod unit;

pub use cell::UnitCell;
pub use descriptor::{
    ComponentDescriptor, ComponentKind, ConnectionDescriptor, EmbeddedTileDescriptor, Face,
    ModuleDescriptor, PhyDescriptor, PlacedPort, PlacementMode, RawPort, RawTileDescriptor,
};
pub use embed::{embed_descriptor, embed_tile, footprint, TileFootprint};
pub use graph::{EdgeExport, GraphExport, LogicalGraph};
pub use grid::{CellCensus, Grid};
pub use label::{Label, Terminal};
pub use layout::{Layout, TileFrame};
pub use module::{Block, Component, Floorplan, Module, ModuleBuilder};
pub use path::WirePath;
pub use placement::{face_of, place_ports, PlacedPorts, PortKind};
pub use ports::{PhyDirection, PhyEntry, PortEntry, PortTable};
pub use stats::AreaPower;
pub use tile::Tile;
pub use unit::UnitCellModel;
