//! Common result and error types for embedding, composition, and routing.

use crate::coord::Coord;

/// The standard result type for fallible fabric operations.
pub type WeaveResult<T> = Result<T, WeaveError>;

/// A fatal error raised while embedding, composing, or routing.
///
/// Every variant names the artifact (tile, module, or routing job) it was
/// raised for. Recoverable routing failures are not errors: they are collected
/// in a routing report instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeaveError {
    /// Malformed input: non-contiguous ids, bad faces, illegal waypoints.
    #[error("{artifact}: {message}")]
    Spec {
        /// Name of the offending artifact.
        artifact: String,
        /// What is wrong with it.
        message: String,
    },

    /// More ports were requested on a face than it can hold.
    #[error("{artifact}: capacity exceeded: {message}")]
    Capacity {
        /// Name of the offending artifact.
        artifact: String,
        /// Which face and how many ports.
        message: String,
    },

    /// Two markers claimed the same cell, or a wire crossed logic.
    #[error("{artifact}: collision at {location}: {message}")]
    Collision {
        /// Name of the offending artifact.
        artifact: String,
        /// The contested cell.
        location: Coord,
        /// What collided.
        message: String,
    },

    /// An invariant the toolchain itself should uphold was broken.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the broken invariant.
        message: String,
    },
}

impl WeaveError {
    /// Creates a [`WeaveError::Spec`].
    pub fn spec(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Spec {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    /// Creates a [`WeaveError::Capacity`].
    pub fn capacity(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Capacity {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    /// Creates a [`WeaveError::Collision`].
    pub fn collision(
        artifact: impl Into<String>,
        location: Coord,
        message: impl Into<String>,
    ) -> Self {
        Self::Collision {
            artifact: artifact.into(),
            location,
            message: message.into(),
        }
    }

    /// Creates a [`WeaveError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the artifact this error was raised for, if any.
    pub fn artifact(&self) -> Option<&str> {
        match self {
            Self::Spec { artifact, .. }
            | Self::Capacity { artifact, .. }
            | Self::Collision { artifact, .. } => Some(artifact),
            Self::Internal { .. } => None,
        }
    }

    /// Returns the cell this error points at, if any.
    pub fn location(&self) -> Option<Coord> {
        match self {
            Self::Collision { location, .. } => Some(*location),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = WeaveError::spec("mesh_tile", "port ids are not contiguous");
        assert_eq!(err.to_string(), "mesh_tile: port ids are not contiguous");

        let err = WeaveError::capacity("t", "north face holds 4 ports, 6 requested");
        assert_eq!(
            err.to_string(),
            "t: capacity exceeded: north face holds 4 ports, 6 requested"
        );

        let err = WeaveError::collision("top", Coord::new(3, 4), "logic overlaps logic");
        assert_eq!(err.to_string(), "top: collision at (3, 4): logic overlaps logic");
        assert_eq!(err.location(), Some(Coord::new(3, 4)));

        let err = WeaveError::internal("coarse path is not aligned");
        assert_eq!(err.to_string(), "internal error: coarse path is not aligned");
        assert_eq!(err.artifact(), None);
    }

    #[test]
    fn artifact_accessor() {
        let err = WeaveError::spec("router_tile", "bad face");
        assert_eq!(err.artifact(), Some("router_tile"));
        assert_eq!(err.location(), None);
    }
}
