//! `weave report`: summarize a stored module.

use serde_json::json;
use weave_fabric::{Block, Module};

use crate::pipeline::{open_library, print_json};
use crate::{GlobalArgs, ReportArgs, ReportFormat};

/// Wire length and longest single connection over a module's own paths.
fn wiring(module: &Module) -> (usize, usize) {
    module
        .connections()
        .iter()
        .map(|p| p.length())
        .fold((0, 0), |(total, longest), len| (total + len, longest.max(len)))
}

/// Counts leaf tiles below `module`.
fn tile_count(module: &Module) -> usize {
    module
        .components()
        .iter()
        .map(|c| match c.block() {
            Block::Tile(_) => 1,
            Block::Module(m) => tile_count(m),
        })
        .sum()
}

/// Runs the `weave report` command.
pub fn run(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let library = open_library(global)?;
    let module = library.module(&args.name)?;
    let stats = module.stats();
    let graph = module.graph();
    let (wire_length, longest) = wiring(&module);

    match args.format {
        ReportFormat::Text => {
            println!("{}: {}x{} cells", module.name(), module.rows(), module.cols());
            println!(
                "  components {} ({} tiles), connections {}, collisions {}",
                module.components().len(),
                tile_count(&module),
                module.connections().len(),
                module.collisions()
            );
            println!("  wire length {wire_length} cells, longest {longest}");
            println!(
                "  area {:.6} mm2 (logic {:.6}, wire {:.6}, empty {:.6})",
                stats.total_area_mm2, stats.logic_area_mm2, stats.wire_area_mm2, stats.empty_area_mm2
            );
            println!(
                "  power {:.6} W (logic {:.6}, wire {:.6})",
                stats.total_power_w(),
                stats.logic_power_w,
                stats.wire_power_w
            );
            println!("  graph {} vertices, {} edges", graph.vertex_count(), graph.edge_count());
            if args.graph && !global.quiet {
                eprintln!("note: --graph is only included in JSON output");
            }
        }
        ReportFormat::Json => {
            let mut value = json!({
                "name": module.name(),
                "rows": module.rows(),
                "cols": module.cols(),
                "components": module.components().len(),
                "tiles": tile_count(&module),
                "connections": module.connections().len(),
                "collisions": module.collisions(),
                "wire_length": wire_length,
                "longest_connection": longest,
                "stats": stats,
                "vertices": graph.vertex_count(),
                "edges": graph.edge_count(),
            });
            if args.graph {
                value["graph"] = serde_json::to_value(graph.export())?;
            }
            print_json(&value);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::project;
    use crate::{array, embed, ArrayArgs, EmbedArgs};
    use weave_route::{ArrayLink, TilePort};

    fn routed_project() -> (tempfile::TempDir, GlobalArgs) {
        let (tmp, global) = project();
        embed::run(
            &EmbedArgs {
                names: Vec::new(),
                format: ReportFormat::Text,
            },
            &global,
        )
        .unwrap();
        // East-west ring on three tiles; the wrap link back to tile 0 runs
        // around the south side and opens one-cell gaps.
        let links = vec![
            ArrayLink::new(TilePort::new(0, 0, 1), TilePort::new(0, 1, 3)),
            ArrayLink::new(TilePort::new(0, 1, 1), TilePort::new(0, 2, 3)),
            ArrayLink::new(TilePort::new(0, 2, 3), TilePort::new(0, 0, 1)),
        ];
        let path = tmp.path().join("links.json");
        std::fs::write(&path, serde_json::to_string(&links).unwrap()).unwrap();
        let args = ArrayArgs {
            tile: "mesh".into(),
            rows: 1,
            cols: 3,
            links: path,
            name: Some("ring".into()),
            dry_run: false,
            format: ReportFormat::Text,
        };
        array::run(&args, &global).unwrap();
        (tmp, global)
    }

    #[test]
    fn reports_stored_module() {
        let (_tmp, global) = routed_project();
        let args = ReportArgs {
            name: "ring".into(),
            graph: true,
            format: ReportFormat::Json,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }

    #[test]
    fn counts_leaf_tiles_and_wiring() {
        let (_tmp, global) = routed_project();
        let module = open_library(&global).unwrap().module("ring").unwrap();
        assert_eq!(tile_count(&module), 3);
        assert_eq!(module.connections().len(), 3);
        // Two straight hops across a gap plus the wrap-around.
        assert_eq!(wiring(&module), (2 + 2 + 17, 17));
    }

    #[test]
    fn missing_module() {
        let (_tmp, global) = project();
        let args = ReportArgs {
            name: "nope".into(),
            graph: false,
            format: ReportFormat::Text,
        };
        assert!(run(&args, &global).is_err());
    }
}
