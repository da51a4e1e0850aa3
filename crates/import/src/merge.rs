use brokerbase_graph::{
    Agent, Brand, Company, CustomerStatus, EntityGraph, Id, LicenseStatus,
};

use crate::model::RowValues;
use crate::resolve::GraphIndex;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What one merged row did to the graph. An update is only reported when a
/// stored field actually changed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowOutcome {
    pub created_brand: bool,
    pub created_company: bool,
    pub created_agent: bool,
    pub updated_company: bool,
    pub updated_agent: bool,
}

// ---------------------------------------------------------------------------
// Field policies
// ---------------------------------------------------------------------------

fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Descriptive fields: the latest non-empty cell wins.
fn overwrite_nonempty(slot: &mut Option<String>, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if slot.as_deref() == Some(value) {
        return false;
    }
    *slot = Some(value.to_string());
    true
}

/// Identifier fields: written once, then frozen.
fn fill_once(slot: &mut Option<String>, value: &str) -> bool {
    if value.is_empty() || slot.as_deref().is_some_and(|s| !s.is_empty()) {
        return false;
    }
    *slot = Some(value.to_string());
    true
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge one normalized row into the graph. The caller has already checked
/// `values.has_company()`; rows without a company never reach this point.
pub fn merge_row(
    graph: &mut EntityGraph,
    index: &mut GraphIndex,
    values: &RowValues,
) -> RowOutcome {
    let mut outcome = RowOutcome::default();

    let brand_id = upsert_brand(graph, index, values, &mut outcome);
    let company_id = upsert_company(graph, index, values, brand_id, &mut outcome);
    if values.has_agent_name() {
        upsert_agent(graph, index, values, &company_id, &mut outcome);
    }

    outcome
}

fn upsert_brand(
    graph: &mut EntityGraph,
    index: &mut GraphIndex,
    values: &RowValues,
    outcome: &mut RowOutcome,
) -> Option<Id> {
    if values.brand.is_empty() {
        return None;
    }
    if let Some(id) = index.resolve_brand(&values.brand) {
        return Some(id.clone());
    }
    let brand = Brand::new(values.brand.clone());
    let id = brand.id.clone();
    index.register_brand(&brand.name, &id);
    graph.insert_brand(brand);
    outcome.created_brand = true;
    Some(id)
}

fn upsert_company(
    graph: &mut EntityGraph,
    index: &mut GraphIndex,
    values: &RowValues,
    brand_id: Option<Id>,
    outcome: &mut RowOutcome,
) -> Id {
    let existing = index
        .resolve_company(&values.org_number, &values.company, brand_id.as_ref())
        .cloned();

    let Some(id) = existing else {
        let mut company = Company::new(values.company.clone());
        company.brand_id = brand_id;
        apply_company_fields(&mut company, values);
        let id = company.id.clone();
        index.register_company(&company, graph.companies.len());
        graph.insert_company(company);
        outcome.created_company = true;
        return id;
    };

    let mut learned_org = None;
    let pos = index.company_position(&id);
    if let Some(company) = pos.and_then(|p| graph.companies.get_mut(p)) {
        let mut changed = false;

        // A brand learned later is attached once; existing ownership is kept.
        if company.brand_id.is_none() {
            if let Some(brand_id) = brand_id {
                company.brand_id = Some(brand_id);
                changed = true;
            }
        }
        if fill_once(&mut company.org_number, &values.org_number) {
            learned_org = company.org_number.clone();
            changed = true;
        }

        changed |= apply_company_fields(company, values);
        outcome.updated_company = changed;
    }
    if let Some(org) = learned_org {
        index.register_org_number(&org, &id);
    }
    id
}

/// Shared between create and update: everything except identity and brand
/// ownership, which the caller handles.
fn apply_company_fields(company: &mut Company, values: &RowValues) -> bool {
    let mut changed = false;

    changed |= overwrite_nonempty(&mut company.city, &values.city);
    changed |= overwrite_nonempty(&mut company.county, &values.county);
    changed |= overwrite_nonempty(&mut company.pipeline_stage, &values.pipeline);
    changed |= fill_once(&mut company.customer_number, &values.customer_number);
    if company.org_number.is_none() {
        changed |= fill_once(&mut company.org_number, &values.org_number);
    }

    if let Some(payment) = values.payment {
        changed |= set_if_changed(&mut company.payment, payment.max(0.0));
    }
    if let Some(status) = values.status {
        changed |= set_if_changed(&mut company.status, status);
    }
    if let Some(central) = values.central_contract {
        changed |= set_if_changed(&mut company.central_contract, central);
    }

    // Paying companies are customers no matter what the status cell said.
    if company.payment > 0.0 {
        changed |= set_if_changed(&mut company.status, CustomerStatus::Customer);
    }

    changed
}

fn upsert_agent(
    graph: &mut EntityGraph,
    index: &mut GraphIndex,
    values: &RowValues,
    company_id: &Id,
    outcome: &mut RowOutcome,
) {
    let existing = index
        .resolve_agent(&values.email, &values.first_name, &values.last_name, company_id)
        .cloned();

    let Some(id) = existing else {
        let mut agent = Agent::new(
            values.first_name.clone(),
            values.last_name.clone(),
            company_id.clone(),
        );
        apply_agent_fields(&mut agent, values);
        index.register_agent(&agent, graph.agents.len());
        graph.insert_agent(agent);
        outcome.created_agent = true;
        return;
    };

    let mut learned_email = None;
    let pos = index.agent_position(&id);
    if let Some(agent) = pos.and_then(|p| graph.agents.get_mut(p)) {
        let mut changed = false;

        // An email match may live at another office; the row's company wins.
        changed |= set_if_changed(&mut agent.company_id, company_id.clone());

        if !values.first_name.is_empty() || !values.last_name.is_empty() {
            changed |= set_if_changed(&mut agent.first_name, values.first_name.clone());
            changed |= set_if_changed(&mut agent.last_name, values.last_name.clone());
        }
        let had_email = agent.email.as_deref().is_some_and(|e| !e.is_empty());
        changed |= apply_agent_fields(agent, values);
        if !had_email {
            learned_email = agent.email.clone();
        }

        outcome.updated_agent = changed;
    }
    if let Some(email) = learned_email {
        index.register_email(&email, &id);
    }
}

fn apply_agent_fields(agent: &mut Agent, values: &RowValues) -> bool {
    let mut changed = false;

    changed |= overwrite_nonempty(&mut agent.email, &values.email);
    changed |= overwrite_nonempty(&mut agent.phone, &values.phone);
    if let Some(status) = values.status {
        changed |= set_if_changed(&mut agent.status, status);
    }

    // License keys merge independently; absent keys leave stored values alone.
    if let Some(status) = values.license_status {
        changed |= set_if_changed(&mut agent.license.status, status);
    }
    if !values.product.is_empty() {
        changed |= overwrite_nonempty(&mut agent.license.product_type, &values.product);
        // A named product with no license cell implies an active license.
        if values.license_status.is_none() && agent.license.status == LicenseStatus::None {
            agent.license.status = LicenseStatus::Active;
            changed = true;
        }
    }

    changed
}
