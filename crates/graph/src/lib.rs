//! `brokerbase-graph` — the three-level entity graph (brand → company → agent).
//!
//! Plain owned data, no I/O. The import engine mutates a graph passed by
//! reference; the caller owns persistence and commit semantics.

pub mod graph;
pub mod model;

pub use graph::EntityGraph;
pub use model::{
    Agent, Brand, CentralContract, Company, CustomerStatus, Id, License, LicenseStatus, Segment,
};
