//! Structured diagnostic messages pointing at artifacts and grid cells.

use crate::code::{codes, DiagnosticCode};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use weave_common::{Coord, WeaveError};

/// Where a diagnostic applies: an artifact and optionally one of its cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Tile, module, or routing job name.
    pub artifact: String,
    /// Grid cell within the artifact, if the problem is localized.
    pub location: Option<Coord>,
}

impl Site {
    /// A site covering a whole artifact.
    pub fn artifact(name: impl Into<String>) -> Self {
        Self {
            artifact: name.into(),
            location: None,
        }
    }

    /// A site at a single cell of an artifact.
    pub fn cell(name: impl Into<String>, location: Coord) -> Self {
        Self {
            artifact: name.into(),
            location: Some(location),
        }
    }
}

/// A structured diagnostic message.
///
/// Each diagnostic carries a severity, a code, a message, an optional site,
/// and any number of notes and help lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The artifact and cell the diagnostic refers to.
    pub site: Option<Site>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            site: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message)
    }

    /// Creates a new note.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Note, code, message)
    }

    /// Attaches the artifact and cell this diagnostic refers to.
    pub fn at(mut self, site: Site) -> Self {
        self.site = Some(site);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

impl From<&WeaveError> for Diagnostic {
    fn from(err: &WeaveError) -> Self {
        let (code, message) = match err {
            WeaveError::Spec { message, .. } => (codes::SPEC, message.clone()),
            WeaveError::Capacity { message, .. } => (codes::CAPACITY, message.clone()),
            WeaveError::Collision { message, .. } => (codes::COLLISION, message.clone()),
            WeaveError::Internal { message } => (codes::INTERNAL, message.clone()),
        };
        let diag = Diagnostic::error(code, message);
        match (err.artifact(), err.location()) {
            (Some(artifact), Some(location)) => diag.at(Site::cell(artifact, location)),
            (Some(artifact), None) => diag.at(Site::artifact(artifact)),
            _ => diag.with_help("this is a bug in weave; please report it"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::warning(codes::CONGESTION, "3 wire collisions")
            .at(Site::cell("mesh", Coord::new(4, 5)))
            .with_note("collisions are counted per axis")
            .with_help("enlarge the routing channels");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.site.as_ref().unwrap().location, Some(Coord::new(4, 5)));
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn from_collision_error_keeps_location() {
        let err = WeaveError::collision("top", Coord::new(1, 2), "logic overlaps logic");
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.code, codes::COLLISION);
        assert!(diag.severity.is_error());
        assert_eq!(diag.site, Some(Site::cell("top", Coord::new(1, 2))));
    }

    #[test]
    fn from_internal_error_has_no_site() {
        let diag = Diagnostic::from(&WeaveError::internal("oops"));
        assert_eq!(diag.code, codes::INTERNAL);
        assert!(diag.site.is_none());
        assert_eq!(diag.help.len(), 1);
    }
}
