//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Structural errors in tiles and modules, prefixed with `E`.
    Error,
    /// Routing failures, prefixed with `R`.
    Routing,
    /// Congestion and other advisory findings, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Routing => 'R',
            Category::Warning => 'W',
        }
    }
}

/// A category prefix plus a numeric identifier, displayed as e.g. `E101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Codes emitted by the weave crates.
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// Malformed tile, module, or routing input.
    pub const SPEC: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
    /// A port face is over capacity.
    pub const CAPACITY: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
    /// Overlapping markers or a wire crossing logic.
    pub const COLLISION: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);
    /// A broken toolchain invariant.
    pub const INTERNAL: DiagnosticCode = DiagnosticCode::new(Category::Error, 199);
    /// A connection could not be routed.
    pub const UNROUTABLE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 201);
    /// A routing pass placed more than one wire per axis in some cells.
    pub const CONGESTION: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Routing.prefix(), 'R');
        assert_eq!(Category::Warning.prefix(), 'W');
    }

    #[test]
    fn display_format() {
        assert_eq!(codes::SPEC.to_string(), "E101");
        assert_eq!(codes::UNROUTABLE.to_string(), "R201");
        assert_eq!(DiagnosticCode::new(Category::Warning, 7).to_string(), "W007");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&codes::CONGESTION).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, codes::CONGESTION);
    }
}
