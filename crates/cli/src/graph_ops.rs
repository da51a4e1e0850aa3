//! `bbase recompute` and `bbase dedup` — maintenance over an existing graph.

use std::path::PathBuf;

use crate::exit_codes::EXIT_ERROR;
use crate::store;
use crate::CliError;

/// Run the migrations and the derive pass, then write the graph back.
pub fn cmd_recompute(graph_path: PathBuf, json_output: bool) -> Result<(), CliError> {
    let mut graph = store::load_graph(&graph_path)?;

    let migration = brokerbase_import::maintain::migrate(&mut graph);
    let maintenance = brokerbase_import::maintain::recompute_all(&mut graph);
    store::save_graph(&graph_path, &graph)?;

    if json_output {
        let out = serde_json::json!({
            "migration": migration,
            "maintenance": maintenance,
        });
        println!("{}", serde_json::to_string_pretty(&out).map_err(json_err)?);
    }
    eprintln!(
        "recompute: {} companies scanned, {} potentials changed, {} statuses fixed, {} org numbers rewritten, {} segments seeded",
        maintenance.companies_scanned,
        maintenance.potentials_changed,
        maintenance.statuses_fixed,
        migration.org_numbers_rewritten,
        migration.segments_seeded,
    );
    Ok(())
}

/// List collapsed person identities. Read-only; `--all` includes singletons.
pub fn cmd_dedup(graph_path: PathBuf, json_output: bool, all: bool) -> Result<(), CliError> {
    let graph = store::load_graph(&graph_path)?;
    let people = if all {
        brokerbase_import::dedup::collapse(&graph)
    } else {
        brokerbase_import::dedup::duplicates(&graph)
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&people).map_err(json_err)?);
        return Ok(());
    }

    for person in &people {
        eprintln!(
            "{}  ({} records across {} companies)",
            if person.display_name.is_empty() { &person.key } else { &person.display_name },
            person.record_count(),
            person.company_ids.len(),
        );
    }
    eprintln!(
        "dedup: {} agent records, {} identities listed",
        graph.agents.len(),
        people.len(),
    );
    Ok(())
}

fn json_err(e: serde_json::Error) -> CliError {
    CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    }
}
