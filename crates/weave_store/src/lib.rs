//! Persistence for weave descriptors.
//!
//! Raw tiles, embedded tiles, and modules are stored as checksummed JSON
//! files keyed by name under a project's store directory. The [`Library`]
//! turns stored names back into owned [`Tile`](weave_fabric::Tile) and
//! [`Module`](weave_fabric::Module) values, building nested modules
//! recursively.

#![warn(missing_docs)]

pub mod envelope;
pub mod error;
pub mod library;
pub mod store;

pub use envelope::{Envelope, FORMAT_VERSION};
pub use error::StoreError;
pub use library::Library;
pub use store::{ArtifactKind, DescriptorStore};
