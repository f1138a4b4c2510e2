//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Embedding and routing report recoverable problems (unroutable connections,
//! wire congestion) as structured [`Diagnostic`]s accumulated in a thread-safe
//! [`DiagnosticSink`]. Fatal errors are converted to diagnostics at the tool
//! boundary so that both kinds render the same way.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{codes, Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Site};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
