//! `weave place`: route connections between freely placed blocks.

use serde::Deserialize;
use serde_json::json;
use weave_common::Mirror;
use weave_diagnostics::DiagnosticSink;
use weave_fabric::{Component, ComponentDescriptor, ModuleBuilder};
use weave_route::{route_placed, PortLink};

use crate::array::print_summary;
use crate::pipeline::{open_library, print_json, read_json, render_diagnostics};
use crate::{GlobalArgs, PlaceArgs, ReportFormat};

/// A placement job read from JSON.
///
/// Components use the stored module schema; links name a master port and a
/// slave port by hierarchical label, such as `"0/mp1"` and `"2.1/sp0"`.
#[derive(Debug, Deserialize)]
pub struct PlacementJob {
    /// Name of the resulting module.
    pub name: String,
    /// Module height in cells.
    pub n_rows: usize,
    /// Module width in cells.
    pub n_cols: usize,
    /// Tiles and modules to place, in id order.
    pub components: Vec<ComponentDescriptor>,
    /// Connections to route, in routing order.
    #[serde(default)]
    pub links: Vec<PortLink>,
}

/// Runs the `weave place` command.
///
/// Returns exit code 0 when every link was routed and 1 otherwise.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let library = open_library(global)?;
    let mut job: PlacementJob = read_json(&args.job)?;
    job.components.sort_by_key(|c| c.id);

    let mut builder = ModuleBuilder::new(job.name.clone(), job.n_rows, job.n_cols);
    for c in &job.components {
        let block = library.block(c.kind, &c.name)?;
        builder.add_component(Component::place(block, c.location, Mirror::new(c.xmirror, c.ymirror)));
    }

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "    Routing {}: {} component(s), {} link(s)",
            job.name,
            job.components.len(),
            job.links.len()
        );
    }

    let sink = DiagnosticSink::new();
    let routed = route_placed(builder, &job.links, &library.config().routing, &sink)?;
    let saved = if args.dry_run {
        None
    } else {
        Some(library.save_module(&routed.module)?)
    };

    let diagnostics = render_diagnostics(&sink, global, args.format);
    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print_summary(&routed.report, routed.module.rows(), routed.module.cols());
                if global.verbose {
                    for r in &routed.report.routed {
                        eprintln!("      {} -> {}: {:?}", r.source, r.destination, r.path.waypoints());
                    }
                }
                if let Some(path) = &saved {
                    eprintln!("      Wrote {}", path.display());
                }
            }
        }
        ReportFormat::Json => print_json(&json!({
            "name": job.name,
            "report": routed.report,
            "stats": routed.module.stats(),
            "diagnostics": diagnostics,
        })),
    }

    Ok(if routed.report.is_complete() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::project;
    use crate::{embed, EmbedArgs};
    use weave_store::DescriptorStore;

    const JOB: &str = r#"{
        "name": "pair",
        "n_rows": 10,
        "n_cols": 30,
        "components": [
            { "id": 0, "type": "tile", "name": "mesh", "location": { "row": 0, "col": 0 } },
            { "id": 1, "type": "tile", "name": "mesh", "location": { "row": 0, "col": 20 } }
        ],
        "links": [
            { "source": "0/mp1", "destination": "1/sp3" }
        ]
    }"#;

    fn setup() -> (tempfile::TempDir, GlobalArgs, std::path::PathBuf) {
        let (tmp, global) = project();
        let args = EmbedArgs {
            names: Vec::new(),
            format: ReportFormat::Text,
        };
        embed::run(&args, &global).unwrap();
        let job = tmp.path().join("job.json");
        (tmp, global, job)
    }

    #[test]
    fn routes_straight_link() {
        let (tmp, global, job) = setup();
        std::fs::write(&job, JOB).unwrap();
        let args = PlaceArgs {
            job,
            dry_run: false,
            format: ReportFormat::Text,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        let module = DescriptorStore::new(&tmp.path().join("components"))
            .load_module("pair")
            .unwrap();
        assert_eq!(module.connections.len(), 1);
        assert_eq!(module.connections[0].waypoints().len(), 2);
    }

    #[test]
    fn overlapping_components_are_fatal() {
        let (_tmp, global, job) = setup();
        std::fs::write(&job, JOB.replace("\"col\": 20", "\"col\": 5")).unwrap();
        let args = PlaceArgs {
            job,
            dry_run: true,
            format: ReportFormat::Json,
        };
        assert!(run(&args, &global).is_err());
    }
}
