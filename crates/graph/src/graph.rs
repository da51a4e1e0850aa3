use serde::{Deserialize, Serialize};

use crate::model::{Agent, Brand, Company, Id, Segment};

/// The in-memory entity graph. Owned exclusively by one reconciliation pass
/// at a time; the caller owns locking and persistence around it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityGraph {
    #[serde(default)]
    pub brands: Vec<Brand>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -- lookups ------------------------------------------------------------

    pub fn brand(&self, id: &Id) -> Option<&Brand> {
        self.brands.iter().find(|b| &b.id == id)
    }

    pub fn brand_mut(&mut self, id: &Id) -> Option<&mut Brand> {
        self.brands.iter_mut().find(|b| &b.id == id)
    }

    pub fn company(&self, id: &Id) -> Option<&Company> {
        self.companies.iter().find(|c| &c.id == id)
    }

    pub fn company_mut(&mut self, id: &Id) -> Option<&mut Company> {
        self.companies.iter_mut().find(|c| &c.id == id)
    }

    pub fn agent(&self, id: &Id) -> Option<&Agent> {
        self.agents.iter().find(|a| &a.id == id)
    }

    pub fn agent_mut(&mut self, id: &Id) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| &a.id == id)
    }

    pub fn agents_of_company<'a>(&'a self, company_id: &'a Id) -> impl Iterator<Item = &'a Agent> {
        self.agents.iter().filter(move |a| &a.company_id == company_id)
    }

    pub fn companies_of_brand<'a>(&'a self, brand_id: &'a Id) -> impl Iterator<Item = &'a Company> {
        self.companies
            .iter()
            .filter(move |c| c.brand_id.as_ref() == Some(brand_id))
    }

    // -- mutation -----------------------------------------------------------

    pub fn insert_brand(&mut self, brand: Brand) -> Id {
        let id = brand.id.clone();
        self.brands.push(brand);
        id
    }

    pub fn insert_company(&mut self, company: Company) -> Id {
        let id = company.id.clone();
        self.companies.push(company);
        id
    }

    pub fn insert_agent(&mut self, agent: Agent) -> Id {
        let id = agent.id.clone();
        self.agents.push(agent);
        id
    }

    /// Remove a company and every agent it owns.
    pub fn remove_company(&mut self, id: &Id) {
        self.agents.retain(|a| &a.company_id != id);
        self.companies.retain(|c| &c.id != id);
    }

    /// Remove a brand, its companies, and their agents.
    pub fn remove_brand(&mut self, id: &Id) {
        let owned: Vec<Id> = self
            .companies
            .iter()
            .filter(|c| c.brand_id.as_ref() == Some(id))
            .map(|c| c.id.clone())
            .collect();
        for company_id in &owned {
            self.remove_company(company_id);
        }
        self.brands.retain(|b| &b.id != id);
    }

    pub fn remove_agent(&mut self, id: &Id) {
        self.agents.retain(|a| &a.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agent, Brand, Company};

    fn graph_with_brand() -> (EntityGraph, Id) {
        let mut graph = EntityGraph::new();
        let brand_id = graph.insert_brand(Brand::new("Svensk Fastighetsförmedling"));
        (graph, brand_id)
    }

    #[test]
    fn cascading_brand_delete() {
        let (mut graph, brand_id) = graph_with_brand();

        let mut company = Company::new("SF Uppsala");
        company.brand_id = Some(brand_id.clone());
        let company_id = graph.insert_company(company);
        graph.insert_agent(Agent::new("Anna", "Berg", company_id.clone()));

        let other_id = graph.insert_company(Company::new("Oberoende Mäklarna"));
        graph.insert_agent(Agent::new("Bo", "Ek", other_id.clone()));

        graph.remove_brand(&brand_id);

        assert!(graph.brands.is_empty());
        assert!(graph.company(&company_id).is_none());
        assert!(graph.company(&other_id).is_some());
        assert_eq!(graph.agents.len(), 1);
        assert_eq!(graph.agents[0].first_name, "Bo");
    }

    #[test]
    fn company_delete_removes_agents() {
        let mut graph = EntityGraph::new();
        let company_id = graph.insert_company(Company::new("Mäklarhuset Täby"));
        graph.insert_agent(Agent::new("Cia", "Dal", company_id.clone()));
        graph.insert_agent(Agent::new("Dan", "Alm", company_id.clone()));

        graph.remove_company(&company_id);
        assert!(graph.agents.is_empty());
    }

    #[test]
    fn agents_of_company_filters() {
        let mut graph = EntityGraph::new();
        let a = graph.insert_company(Company::new("A"));
        let b = graph.insert_company(Company::new("B"));
        graph.insert_agent(Agent::new("Eva", "Falk", a.clone()));
        graph.insert_agent(Agent::new("Fia", "Gren", b.clone()));

        assert_eq!(graph.agents_of_company(&a).count(), 1);
        assert_eq!(graph.agents_of_company(&b).count(), 1);
    }
}
