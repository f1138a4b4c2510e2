//! Routers that turn placed tiles and modules into wired modules.
//!
//! [`route_array`] handles a regular array of identical tiles: it sizes the
//! gaps between tile rows and columns from a coarse routing pass and then
//! routes every link corner by corner. [`route_placed`] handles arbitrary
//! placements with a per-connection shortest-path search over the fine grid.
//! Both record unroutable connections and congestion in a
//! [`RoutingReport`] and in the diagnostic sink.

#![warn(missing_docs)]

pub mod heterogeneous;
pub mod homogeneous;
pub mod report;

pub use heterogeneous::{route_placed, PlacedRouting, PortLink};
pub use homogeneous::{route_array, ArrayLink, ArrayRouting, TilePort};
pub use report::{RoutedConnection, RoutingReport, Unroutable};
