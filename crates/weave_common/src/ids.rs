//! Typed indices for ports, PHYs, endpoints, and placed components.
//!
//! Port and PHY ids are local to a tile and contiguous from zero. Component
//! ids are positions in a module's component list.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the index as a `usize` for table lookups.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Id of a master or slave port within its tile.
    PortId
);

define_id!(
    /// Id of a PHY within its tile.
    PhyId
);

define_id!(
    /// Id of a local endpoint attached to a tile's router.
    EndpointId
);

define_id!(
    /// Position of a component within its parent module.
    ComponentId
);
