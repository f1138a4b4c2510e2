//! `weave array`: route a regular array of identical tiles.

use serde_json::json;
use weave_diagnostics::DiagnosticSink;
use weave_route::{route_array, ArrayLink, RoutingReport};

use crate::pipeline::{open_library, print_json, read_json, render_diagnostics};
use crate::{ArrayArgs, GlobalArgs, ReportFormat};

/// Runs the `weave array` command.
///
/// Returns exit code 0 when every link was routed and 1 otherwise.
pub fn run(args: &ArrayArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let library = open_library(global)?;
    let tile = library.tile(&args.tile)?;
    let links: Vec<ArrayLink> = read_json(&args.links)?;
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| format!("{}_{}x{}", args.tile, args.rows, args.cols));

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "    Routing {name}: {}x{} array of {}, {} link(s)",
            args.rows,
            args.cols,
            args.tile,
            links.len()
        );
    }

    let sink = DiagnosticSink::new();
    let routing = route_array(&name, &tile, args.rows, args.cols, &links, &sink)?;
    let module = routing.to_module()?;
    let saved = if args.dry_run {
        None
    } else {
        Some(library.save_module(&module)?)
    };

    let report = routing.report();
    let diagnostics = render_diagnostics(&sink, global, args.format);
    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                eprintln!("   Row gaps {:?}", routing.row_sizes());
                eprintln!("   Col gaps {:?}", routing.col_sizes());
                print_summary(report, routing.rows(), routing.cols());
                if let Some(path) = &saved {
                    eprintln!("      Wrote {}", path.display());
                }
            }
        }
        ReportFormat::Json => print_json(&json!({
            "name": name,
            "rows": routing.rows(),
            "cols": routing.cols(),
            "row_sizes": routing.row_sizes(),
            "col_sizes": routing.col_sizes(),
            "tile_origins": routing.tile_origins(),
            "report": report,
            "stats": module.stats(),
            "diagnostics": diagnostics,
        })),
    }

    Ok(if report.is_complete() { 0 } else { 1 })
}

/// Prints the one-line routing summary shared by `array` and `place`.
pub fn print_summary(report: &RoutingReport, rows: usize, cols: usize) {
    eprintln!(
        "   Result: {rows}x{cols} cells, {} routed, {} unroutable, {} collision(s), wire length {}",
        report.routed.len(),
        report.unroutable.len(),
        report.collisions,
        report.total_length()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed;
    use crate::fixtures::project;
    use crate::EmbedArgs;
    use weave_route::TilePort;
    use weave_store::DescriptorStore;

    fn embed_mesh(global: &GlobalArgs) {
        let args = EmbedArgs {
            names: vec!["mesh".into()],
            format: ReportFormat::Text,
        };
        embed::run(&args, global).unwrap();
    }

    fn args(links: std::path::PathBuf, dry_run: bool) -> ArrayArgs {
        ArrayArgs {
            tile: "mesh".into(),
            rows: 1,
            cols: 2,
            links,
            name: None,
            dry_run,
            format: ReportFormat::Json,
        }
    }

    #[test]
    fn routes_and_saves_pair() {
        let (tmp, global) = project();
        embed_mesh(&global);
        let links = vec![
            ArrayLink::new(TilePort::new(0, 0, 1), TilePort::new(0, 1, 3)),
            ArrayLink::new(TilePort::new(0, 1, 3), TilePort::new(0, 0, 1)),
        ];
        let path = tmp.path().join("links.json");
        std::fs::write(&path, serde_json::to_string(&links).unwrap()).unwrap();

        assert_eq!(run(&args(path, false), &global).unwrap(), 0);
        let store = DescriptorStore::new(&tmp.path().join("components"));
        let module = store.load_module("mesh_1x2").unwrap();
        assert_eq!(module.components.len(), 2);
        assert_eq!(module.connections.len(), 2);
    }

    #[test]
    fn dry_run_saves_nothing() {
        let (tmp, global) = project();
        embed_mesh(&global);
        let path = tmp.path().join("links.json");
        std::fs::write(&path, "[]").unwrap();
        assert_eq!(run(&args(path, true), &global).unwrap(), 0);
        let store = DescriptorStore::new(&tmp.path().join("components"));
        assert!(!store.contains(weave_store::ArtifactKind::Module, "mesh_1x2"));
    }

    #[test]
    fn port_out_of_range_is_fatal() {
        let (tmp, global) = project();
        embed_mesh(&global);
        let links = vec![ArrayLink::new(TilePort::new(0, 0, 1), TilePort::new(0, 5, 3))];
        let path = tmp.path().join("links.json");
        std::fs::write(&path, serde_json::to_string(&links).unwrap()).unwrap();
        assert!(run(&args(path, true), &global).is_err());
    }
}
