//! `brokerbase-import` — spreadsheet→entity-graph reconciliation engine.
//!
//! Pure engine crate: receives pre-parsed rows, mutates a borrowed entity
//! graph, returns a run report. No CLI or IO dependencies.

pub mod catalog;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod maintain;
pub mod mapping;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod resolve;

pub use catalog::{FieldKey, SynonymCatalog};
pub use dedup::PersonIdentity;
pub use engine::run;
pub use error::ImportError;
pub use maintain::{MaintenanceReport, MigrationReport, PotentialKind};
pub use mapping::ImportMapping;
pub use model::{ImportReport, ImportRow, ImportSummary};
