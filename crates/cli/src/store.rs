//! Graph file store: one JSON document per graph, loaded whole and written
//! back whole. The CLI owns locking by convention (one writer at a time).

use std::path::Path;

use brokerbase_graph::EntityGraph;

use crate::exit_codes::{EXIT_GRAPH_CORRUPT, EXIT_GRAPH_IO};
use crate::CliError;

/// Load a graph file. A missing file is an empty graph, so a first import
/// needs no bootstrap step.
pub fn load_graph(path: &Path) -> Result<EntityGraph, CliError> {
    if !path.exists() {
        return Ok(EntityGraph::new());
    }
    let data = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_GRAPH_IO,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    })?;
    serde_json::from_str(&data).map_err(|e| CliError {
        code: EXIT_GRAPH_CORRUPT,
        message: format!("{} is not a valid graph file: {e}", path.display()),
        hint: Some("restore from a backup or point --graph at a fresh path".to_string()),
    })
}

/// Write the graph via a sibling temp file, then rename, so a crash mid-write
/// never leaves a truncated graph behind.
pub fn save_graph(path: &Path, graph: &EntityGraph) -> Result<(), CliError> {
    let io_err = |e: std::io::Error| CliError {
        code: EXIT_GRAPH_IO,
        message: format!("cannot write {}: {e}", path.display()),
        hint: None,
    };

    let json = serde_json::to_string_pretty(graph).map_err(|e| CliError {
        code: EXIT_GRAPH_IO,
        message: format!("cannot serialize graph: {e}"),
        hint: None,
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}
