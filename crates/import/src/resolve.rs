use std::collections::HashMap;

use brokerbase_graph::{Agent, Company, EntityGraph, Id};

// ---------------------------------------------------------------------------
// Identity keys
// ---------------------------------------------------------------------------

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn agent_name_key(first: &str, last: &str, company_id: &Id) -> (String, String, Id) {
    (name_key(first), name_key(last), company_id.clone())
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Resolution index over one graph, built once per pass and kept current as
/// the pass creates entities. Blank keys are never indexed, so two records
/// with missing emails can never collide. Also carries id→vec-position maps
/// so mutation targets are fetched without re-scanning the collections.
#[derive(Debug, Default)]
pub struct GraphIndex {
    brand_by_name: HashMap<String, Id>,
    company_by_org: HashMap<String, Id>,
    company_by_name_brand: HashMap<(String, Option<Id>), Id>,
    agent_by_email: HashMap<String, Id>,
    agent_by_name_company: HashMap<(String, String, Id), Id>,
    company_pos: HashMap<Id, usize>,
    agent_pos: HashMap<Id, usize>,
}

impl GraphIndex {
    pub fn build(graph: &EntityGraph) -> Self {
        let mut index = Self::default();
        for brand in &graph.brands {
            index.register_brand(&brand.name, &brand.id);
        }
        for (pos, company) in graph.companies.iter().enumerate() {
            index.register_company(company, pos);
        }
        for (pos, agent) in graph.agents.iter().enumerate() {
            index.register_agent(agent, pos);
        }
        index
    }

    // -- registration ---------------------------------------------------------

    pub fn register_brand(&mut self, name: &str, id: &Id) {
        let key = name_key(name);
        if !key.is_empty() {
            self.brand_by_name.entry(key).or_insert_with(|| id.clone());
        }
    }

    pub fn register_company(&mut self, company: &Company, pos: usize) {
        self.company_pos.insert(company.id.clone(), pos);
        if let Some(org) = company.org_number.as_deref().filter(|o| !o.is_empty()) {
            self.company_by_org
                .entry(org.to_string())
                .or_insert_with(|| company.id.clone());
        }
        let key = name_key(&company.name);
        if !key.is_empty() {
            self.company_by_name_brand
                .entry((key, company.brand_id.clone()))
                .or_insert_with(|| company.id.clone());
        }
    }

    /// Record an org number learned mid-pass (fill-once on an existing company).
    pub fn register_org_number(&mut self, org: &str, id: &Id) {
        if !org.is_empty() {
            self.company_by_org
                .entry(org.to_string())
                .or_insert_with(|| id.clone());
        }
    }

    pub fn register_agent(&mut self, agent: &Agent, pos: usize) {
        self.agent_pos.insert(agent.id.clone(), pos);
        if let Some(email) = agent.email.as_deref().filter(|e| !e.is_empty()) {
            self.agent_by_email
                .entry(email.to_lowercase())
                .or_insert_with(|| agent.id.clone());
        }
        if !(agent.first_name.is_empty() && agent.last_name.is_empty()) {
            self.agent_by_name_company
                .entry(agent_name_key(
                    &agent.first_name,
                    &agent.last_name,
                    &agent.company_id,
                ))
                .or_insert_with(|| agent.id.clone());
        }
    }

    /// Record an email learned mid-pass on an existing agent.
    pub fn register_email(&mut self, email: &str, id: &Id) {
        if !email.is_empty() {
            self.agent_by_email
                .entry(email.to_lowercase())
                .or_insert_with(|| id.clone());
        }
    }

    // -- positions --------------------------------------------------------------

    /// Vec position of a company known to this index.
    pub fn company_position(&self, id: &Id) -> Option<usize> {
        self.company_pos.get(id).copied()
    }

    /// Vec position of an agent known to this index.
    pub fn agent_position(&self, id: &Id) -> Option<usize> {
        self.agent_pos.get(id).copied()
    }

    // -- resolution -------------------------------------------------------------

    pub fn resolve_brand(&self, name: &str) -> Option<&Id> {
        let key = name_key(name);
        if key.is_empty() {
            return None;
        }
        self.brand_by_name.get(&key)
    }

    /// Org number wins over the (name, brand) fallback, so a renamed company
    /// with a stable org number resolves to its existing record.
    pub fn resolve_company(&self, org_number: &str, name: &str, brand_id: Option<&Id>) -> Option<&Id> {
        if !org_number.is_empty() {
            if let Some(id) = self.company_by_org.get(org_number) {
                return Some(id);
            }
        }
        let key = name_key(name);
        if key.is_empty() {
            return None;
        }
        self.company_by_name_brand.get(&(key, brand_id.cloned()))
    }

    /// Email wins over the (name, company) fallback, even when the email
    /// match belongs to another company; the merge step moves the agent.
    pub fn resolve_agent(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        company_id: &Id,
    ) -> Option<&Id> {
        if !email.is_empty() {
            if let Some(id) = self.agent_by_email.get(&email.to_lowercase()) {
                return Some(id);
            }
        }
        if first_name.is_empty() && last_name.is_empty() {
            return None;
        }
        self.agent_by_name_company
            .get(&agent_name_key(first_name, last_name, company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerbase_graph::Brand;

    fn sample_graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        let brand_id = graph.insert_brand(Brand::new("Länsförsäkringar Fastighetsförmedling"));

        let mut company = Company::new("LF Uppsala");
        company.brand_id = Some(brand_id.clone());
        company.org_number = Some("5566778899".to_string());
        let company_id = graph.insert_company(company);

        let mut agent = Agent::new("Anna", "Berg", company_id);
        agent.email = Some("anna.berg@lf.se".to_string());
        graph.insert_agent(agent);
        graph
    }

    #[test]
    fn org_number_beats_name_match() {
        let graph = sample_graph();
        let index = GraphIndex::build(&graph);
        let by_org = index.resolve_company("5566778899", "Totally Renamed", None);
        assert_eq!(by_org, Some(&graph.companies[0].id));
    }

    #[test]
    fn name_match_is_scoped_to_brand() {
        let graph = sample_graph();
        let index = GraphIndex::build(&graph);
        let brand_id = graph.brands[0].id.clone();
        assert!(index.resolve_company("", "lf uppsala", Some(&brand_id)).is_some());
        assert!(index.resolve_company("", "lf uppsala", None).is_none());
    }

    #[test]
    fn email_beats_name_and_crosses_companies() {
        let mut graph = sample_graph();
        let other = graph.insert_company(Company::new("Annat Kontor"));
        let index = GraphIndex::build(&graph);
        let hit = index.resolve_agent("ANNA.BERG@LF.SE", "Ny", "Person", &other);
        assert_eq!(hit, Some(&graph.agents[0].id));
    }

    #[test]
    fn blank_keys_never_match() {
        let mut graph = sample_graph();
        graph.agents[0].email = Some(String::new());
        let index = GraphIndex::build(&graph);
        let company_id = graph.companies[0].id.clone();
        assert!(index.resolve_agent("", "", "", &company_id).is_none());
        assert!(index.resolve_company("", "", None).is_none());
        assert!(index.resolve_brand("").is_none());
    }

    #[test]
    fn positions_stay_current_as_entities_register() {
        let mut graph = sample_graph();
        let mut index = GraphIndex::build(&graph);
        assert_eq!(index.company_position(&graph.companies[0].id), Some(0));
        assert_eq!(index.agent_position(&graph.agents[0].id), Some(0));

        let late = Company::new("Sent Tillagt Kontor");
        index.register_company(&late, graph.companies.len());
        let late_id = graph.insert_company(late);
        assert_eq!(index.company_position(&late_id), Some(1));
        assert_eq!(&graph.companies[1].id, &late_id);
    }

    #[test]
    fn brand_lookup_is_case_insensitive() {
        let graph = sample_graph();
        let index = GraphIndex::build(&graph);
        assert!(index
            .resolve_brand("länsförsäkringar fastighetsförmedling")
            .is_some());
    }
}
