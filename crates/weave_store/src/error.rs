//! Error types for descriptor storage.

use std::path::PathBuf;
use weave_common::WeaveError;
use weave_config::ConfigError;

/// Errors raised while reading, writing, or resolving stored descriptors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing a descriptor file.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A descriptor file is not valid JSON or does not match its schema.
    #[error("malformed descriptor {path}: {reason}")]
    Serialization {
        /// The descriptor file path.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The stored checksum does not match the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The descriptor file path.
        path: PathBuf,
        /// The checksum recorded in the file.
        expected: String,
        /// The checksum of the payload as read.
        actual: String,
    },

    /// The descriptor was written by an incompatible format version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The descriptor file path.
        path: PathBuf,
        /// The supported format version.
        expected: u32,
        /// The version found in the file.
        actual: u32,
    },

    /// No descriptor of this kind has the requested name.
    #[error("no {kind} named '{name}'")]
    NotFound {
        /// Which kind of descriptor was looked up.
        kind: &'static str,
        /// The requested name.
        name: String,
    },

    /// A descriptor name cannot be used as a file name.
    #[error("invalid descriptor name '{0}'")]
    InvalidName(String),

    /// A module contains itself, directly or through sub-modules.
    #[error("module reference cycle: {}", chain.join(" -> "))]
    Cycle {
        /// Module names from the outermost to the repeated one.
        chain: Vec<String>,
    },

    /// A descriptor names a technology or protocol the project lacks.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Building a tile or module from its descriptor failed.
    #[error(transparent)]
    Fabric(#[from] WeaveError),
}
