use std::collections::HashMap;

use brokerbase_graph::{Agent, EntityGraph, Id};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Identity key
// ---------------------------------------------------------------------------

/// Key under which agent records of the same human collapse. Falls through
/// email, full name, phone digits, and finally the record's own id, so an
/// agent with no usable key stays a singleton instead of pooling with other
/// key-less records.
pub fn identity_key(agent: &Agent) -> String {
    if let Some(email) = agent.email.as_deref().map(str::trim) {
        if !email.is_empty() {
            return email.to_lowercase();
        }
    }
    let name = format!("{} {}", agent.first_name.trim(), agent.last_name.trim());
    let name = name.trim().to_lowercase();
    if !name.is_empty() {
        return name;
    }
    if let Some(phone) = agent.phone.as_deref() {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        if !digits.is_empty() {
            return digits;
        }
    }
    agent.id.as_str().to_string()
}

// ---------------------------------------------------------------------------
// Collapse
// ---------------------------------------------------------------------------

/// One human as seen across agent records. Purely a report row; the stored
/// records are never merged.
#[derive(Debug, Clone, Serialize)]
pub struct PersonIdentity {
    pub key: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub agent_ids: Vec<Id>,
    pub company_ids: Vec<Id>,
}

impl PersonIdentity {
    pub fn record_count(&self) -> usize {
        self.agent_ids.len()
    }
}

/// Group every agent record by identity key, in first-seen order.
pub fn collapse(graph: &EntityGraph) -> Vec<PersonIdentity> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, PersonIdentity> = HashMap::new();

    for agent in &graph.agents {
        let key = identity_key(agent);
        let entry = by_key.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            PersonIdentity {
                key,
                display_name: format!("{} {}", agent.first_name, agent.last_name)
                    .trim()
                    .to_string(),
                email: None,
                agent_ids: Vec::new(),
                company_ids: Vec::new(),
            }
        });
        entry.agent_ids.push(agent.id.clone());
        if !entry.company_ids.contains(&agent.company_id) {
            entry.company_ids.push(agent.company_id.clone());
        }
        if entry.email.is_none() {
            entry.email = agent.email.clone().filter(|e| !e.is_empty());
        }
    }

    order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect()
}

/// Only the identities backed by more than one record.
pub fn duplicates(graph: &EntityGraph) -> Vec<PersonIdentity> {
    collapse(graph)
        .into_iter()
        .filter(|p| p.record_count() > 1)
        .collect()
}
