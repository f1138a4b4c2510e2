//! `weave embed`: size raw tiles and place their ports.

use serde_json::json;
use weave_store::ArtifactKind;

use crate::pipeline::{open_library, print_json};
use crate::{EmbedArgs, GlobalArgs, ReportFormat};

/// Runs the `weave embed` command.
///
/// Every named raw tile (or every stored one) is embedded in the project's
/// default context and saved as an embedded tile. Stops at the first tile
/// that fails to embed.
pub fn run(args: &EmbedArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let library = open_library(global)?;
    let ctx = library.default_context()?;
    let names = if args.names.is_empty() {
        library.store().list(ArtifactKind::RawTile)?
    } else {
        args.names.clone()
    };
    if names.is_empty() && !global.quiet {
        eprintln!("warning: no raw tiles in {}", library.store().root().display());
    }

    let mut embedded = Vec::new();
    for name in &names {
        let (tile, path) = library.embed(name, &ctx)?;
        if !global.quiet && args.format == ReportFormat::Text {
            eprintln!(
                "   Embedded {name}: {}x{} cells, {:.6} mm2",
                tile.rows(),
                tile.cols(),
                tile.stats().total_area_mm2
            );
            if global.verbose {
                eprintln!("      Wrote {}", path.display());
            }
        }
        embedded.push(json!({
            "name": name,
            "rows": tile.rows(),
            "cols": tile.cols(),
            "stats": tile.stats(),
            "path": path.display().to_string(),
        }));
    }

    if args.format == ReportFormat::Json {
        print_json(&json!({ "tiles": embedded }));
    }
    Ok(0)
}
