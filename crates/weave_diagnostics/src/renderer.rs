//! Human-readable rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Formats a diagnostic for some output target.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// warning[R201]: connection 3 (0/mp1 -> 2/sp3) could not be routed
///   --> mesh_4x4 @ (12, 40)
///    = note: destination is outside the detour window
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: String) -> String {
        if !self.color {
            return text;
        }
        let ansi = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{ansi}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = self.paint(diag.severity, format!("{}[{}]", diag.severity, diag.code));
        out.push_str(&format!(": {}\n", diag.message));

        if let Some(site) = &diag.site {
            match site.location {
                Some(cell) => out.push_str(&format!("  --> {} @ {cell}\n", site.artifact)),
                None => out.push_str(&format!("  --> {}\n", site.artifact)),
            }
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::codes;
    use crate::diagnostic::Site;
    use weave_common::Coord;

    #[test]
    fn render_with_cell_site() {
        let diag = Diagnostic::error(codes::COLLISION, "wire crosses logic")
            .at(Site::cell("top", Coord::new(3, 9)));
        let out = TerminalRenderer::new(false).render(&diag);
        assert!(out.starts_with("error[E103]: wire crosses logic\n"));
        assert!(out.contains("  --> top @ (3, 9)"));
    }

    #[test]
    fn render_notes_and_help() {
        let diag = Diagnostic::warning(codes::CONGESTION, "2 collisions")
            .at(Site::artifact("mesh"))
            .with_note("first at (1, 1)")
            .with_help("reorder connections");
        let out = TerminalRenderer::new(false).render(&diag);
        assert!(out.contains("warning[W301]: 2 collisions"));
        assert!(out.contains("  --> mesh\n"));
        assert!(out.contains("= note: first at (1, 1)"));
        assert!(out.contains("= help: reorder connections"));
    }

    #[test]
    fn color_wraps_header() {
        let diag = Diagnostic::note(codes::CONGESTION, "x");
        let out = TerminalRenderer::new(true).render(&diag);
        assert!(out.starts_with("\x1b[1;36mnote[W301]\x1b[0m"));
    }
}
