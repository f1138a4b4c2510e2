//! Shared foundational types used across the weave interconnect toolchain.
//!
//! This crate provides grid coordinates and axes, mirror flags, typed port
//! identifiers, content hashing, frequency values, and the common error type
//! shared by the embedding and routing crates.

#![warn(missing_docs)]

pub mod coord;
pub mod frequency;
pub mod hash;
pub mod ids;
pub mod result;

pub use coord::{Axis, Coord, Mirror};
pub use frequency::{Frequency, ParseFrequencyError};
pub use hash::ContentHash;
pub use ids::{ComponentId, EndpointId, PhyId, PortId};
pub use result::{WeaveError, WeaveResult};
