//! Parsing and validation of `weave.toml` project configuration files.
//!
//! The configuration names the descriptor store, the default fabric context,
//! the technology and protocol parameter tables used to size unit cells and
//! routers, and the heterogeneous router's cost knobs.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_context, ResolvedContext};
pub use types::*;
