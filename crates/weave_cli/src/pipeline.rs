//! Shared helpers for CLI commands.
//!
//! Project root discovery, library loading, JSON input files, and diagnostic
//! rendering.

use std::error::Error;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use weave_common::WeaveError;
use weave_config::{load_config_file, CONFIG_FILE_NAME};
use weave_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use weave_store::{DescriptorStore, Library, StoreError};

use crate::{GlobalArgs, ReportFormat};

/// Walks up from `start` looking for the nearest directory containing `weave.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Locates the configuration file named by `--config`, or the nearest
/// `weave.toml` above the current directory.
pub fn resolve_config_path(global: &GlobalArgs) -> Result<PathBuf, Box<dyn Error>> {
    match &global.config {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_dir() {
                Ok(p.join(CONFIG_FILE_NAME))
            } else {
                Ok(p)
            }
        }
        None => Ok(find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE_NAME)),
    }
}

/// Loads the project configuration and opens its descriptor store.
///
/// The store directory is relative to the directory holding the
/// configuration file.
pub fn open_library(global: &GlobalArgs) -> Result<Library, Box<dyn Error>> {
    let config_path = resolve_config_path(global)?;
    let config = load_config_file(&config_path)?;
    let project_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let store = DescriptorStore::new(&project_dir.join(&config.project.store));
    if global.verbose {
        eprintln!("     Store {}", store.root().display());
    }
    Ok(Library::new(store, config))
}

/// Reads and deserializes a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("malformed {}: {e}", path.display()).into())
}

/// Prints a JSON value to stdout.
pub fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
    );
}

/// Renders everything collected in `sink`. Text goes to stderr; JSON
/// diagnostics are returned for embedding in the command's JSON output.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs, format: ReportFormat) -> Value {
    let diagnostics = sink.take_all();
    match format {
        ReportFormat::Text => {
            if !global.quiet {
                let renderer = TerminalRenderer::new(global.color);
                for diag in &diagnostics {
                    eprintln!("{}", renderer.render(diag));
                }
            }
            Value::Null
        }
        ReportFormat::Json => serde_json::to_value(&diagnostics).unwrap_or(Value::Null),
    }
}

/// Prints a fatal error. Fabric errors render as diagnostics.
pub fn render_fatal(err: &(dyn Error + 'static), global: &GlobalArgs) {
    let fabric = match err.downcast_ref::<StoreError>() {
        Some(StoreError::Fabric(e)) => Some(e),
        _ => err.downcast_ref::<WeaveError>(),
    };
    match fabric {
        Some(e) => eprintln!("{}", TerminalRenderer::new(global.color).render(&Diagnostic::from(e))),
        None => eprintln!("error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use crate::fixtures::CONFIG;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: config.map(|p| p.display().to_string()),
        }
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), CONFIG).unwrap();
        let sub = tmp.path().join("components").join("tiles");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(find_project_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_missing() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("could not find weave.toml"));
    }

    #[test]
    fn config_directory_resolves_to_file() {
        let tmp = TempDir::new().unwrap();
        let path = resolve_config_path(&global(Some(tmp.path()))).unwrap();
        assert_eq!(path, tmp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn store_is_relative_to_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("alt.toml");
        fs::write(&path, CONFIG).unwrap();
        let lib = open_library(&global(Some(&path))).unwrap();
        assert_eq!(lib.store().root(), tmp.path().join("components"));
    }

    #[test]
    fn read_json_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        fs::write(&path, "[").unwrap();
        let err = read_json::<Vec<u32>>(&path).unwrap_err();
        assert!(err.to_string().contains("links.json"));
    }

    #[test]
    fn json_diagnostics_drain_sink() {
        let sink = DiagnosticSink::new();
        sink.emit(Diagnostic::warning(weave_diagnostics::codes::CONGESTION, "2 collisions"));
        let value = render_diagnostics(&sink, &global(None), ReportFormat::Json);
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert!(sink.diagnostics().is_empty());
    }
}
