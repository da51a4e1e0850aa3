use brokerbase_graph::EntityGraph;
use chrono::Utc;

use crate::error::ImportError;
use crate::mapping::ImportMapping;
use crate::merge;
use crate::maintain;
use crate::model::{ImportMeta, ImportReport, ImportRow, ImportSummary, RowValues};
use crate::resolve::GraphIndex;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run one reconciliation pass: merge every row into the graph, then re-derive
/// statuses and potential values. Fails before the first mutation when the
/// mapping cannot support a run, so a rejected pass leaves the graph intact.
pub fn run(
    graph: &mut EntityGraph,
    mapping: &ImportMapping,
    rows: &[ImportRow],
) -> Result<ImportReport, ImportError> {
    let missing = mapping.missing_for_run();
    if !missing.is_empty() {
        return Err(ImportError::MappingNotRunnable { missing });
    }

    let mut index = GraphIndex::build(graph);
    let mut summary = ImportSummary::default();

    for row in rows {
        let values = RowValues::extract(row, mapping);
        if !values.has_company() {
            summary.skipped_rows += 1;
            continue;
        }
        let outcome = merge::merge_row(graph, &mut index, &values);
        summary.created_brands += outcome.created_brand as usize;
        summary.created_companies += outcome.created_company as usize;
        summary.created_agents += outcome.created_agent as usize;
        summary.updated_companies += outcome.updated_company as usize;
        summary.updated_agents += outcome.updated_agent as usize;
    }

    maintain::recompute_all(graph);

    Ok(ImportReport {
        meta: ImportMeta {
            engine_version: ENGINE_VERSION.to_string(),
            run_at: Utc::now().to_rfc3339(),
        },
        summary,
    })
}

// ---------------------------------------------------------------------------
// Integration tests
// ---------------------------------------------------------------------------
