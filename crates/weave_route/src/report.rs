//! Outcome of a routing pass.

use serde::{Deserialize, Serialize};
use weave_diagnostics::{codes, Diagnostic, DiagnosticSink, Site};
use weave_fabric::{Label, WirePath};

/// A connection the router drew.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutedConnection {
    /// Master port the wire starts at.
    pub source: Label,
    /// Slave port the wire ends at.
    pub destination: Label,
    /// The drawn path.
    pub path: WirePath,
    /// Collisions the router predicted when it chose the path.
    pub estimated_collisions: u64,
}

/// A connection the router could not draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unroutable {
    /// Master port of the connection.
    pub source: Label,
    /// Slave port of the connection.
    pub destination: Label,
    /// Why no path was found.
    pub reason: String,
}

/// Routed and failed connections of one pass, in routing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingReport {
    /// Connections with a path.
    pub routed: Vec<RoutedConnection>,
    /// Connections without one.
    pub unroutable: Vec<Unroutable>,
    /// Wire collisions recorded while marking the routed paths.
    pub collisions: u64,
    /// Highest per-axis wire count of any cell after routing.
    pub max_wires_per_cell: u32,
}

impl RoutingReport {
    /// Returns `true` when every connection was routed.
    pub fn is_complete(&self) -> bool {
        self.unroutable.is_empty()
    }

    /// Summed length of all routed paths, in cell steps.
    pub fn total_length(&self) -> usize {
        self.routed.iter().map(|r| r.path.length()).sum()
    }

    /// Summed number of corners of all routed paths.
    pub fn total_corners(&self) -> usize {
        self.routed.iter().map(|r| r.path.corners()).sum()
    }

    /// Records an unroutable connection and reports it.
    pub(crate) fn fail(&mut self, artifact: &str, failure: Unroutable, sink: &DiagnosticSink) {
        sink.emit(
            Diagnostic::warning(
                codes::UNROUTABLE,
                format!(
                    "no path from {} to {}",
                    failure.source, failure.destination
                ),
            )
            .at(Site::artifact(artifact))
            .with_note(failure.reason.clone()),
        );
        self.unroutable.push(failure);
    }

    /// Reports congestion once per pass if any wires collided.
    pub(crate) fn flag_congestion(&self, artifact: &str, sink: &DiagnosticSink) {
        if self.collisions == 0 {
            return;
        }
        sink.emit(
            Diagnostic::warning(
                codes::CONGESTION,
                format!(
                    "{} wire collisions, up to {} wires per cell on one axis",
                    self.collisions, self.max_wires_per_cell
                ),
            )
            .at(Site::artifact(artifact))
            .with_help("widen the detour margins or reorder the connections"),
        );
    }
}
