use std::collections::{HashMap, HashSet};

use brokerbase_graph::{Company, CustomerStatus, EntityGraph, Id, LicenseStatus, Segment};
use serde::Serialize;

use crate::normalize;

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Monthly package price by office size. Offices under the smallest band
/// have no package and therefore no computable potential.
pub const PRICING_TIERS: [(usize, usize, f64); 5] = [
    (4, 6, 849.0),
    (7, 9, 1099.0),
    (10, 15, 1649.0),
    (16, 20, 2099.0),
    (21, usize::MAX, 2449.0),
];

pub fn tier_price(total_agents: usize) -> Option<f64> {
    PRICING_TIERS
        .iter()
        .find(|(min, max, _)| (*min..=*max).contains(&total_agents))
        .map(|(_, _, price)| *price)
}

// ---------------------------------------------------------------------------
// Potential
// ---------------------------------------------------------------------------

/// Why a company carries (or does not carry) a potential value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialKind {
    /// Covered by a brand-level or company-level central contract.
    CentrallyCovered,
    /// Not yet a customer, office large enough for a package.
    NewCustomer,
    /// Customer with unlicensed agents on the floor.
    UpsellUnlicensed,
    /// Customer paying below the price of its size band.
    Underpriced,
    NoOpportunity,
}

impl std::fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CentrallyCovered => write!(f, "centrally_covered"),
            Self::NewCustomer => write!(f, "new_customer"),
            Self::UpsellUnlicensed => write!(f, "upsell_unlicensed"),
            Self::Underpriced => write!(f, "underpriced"),
            Self::NoOpportunity => write!(f, "no_opportunity"),
        }
    }
}

fn is_customer(company: &Company) -> bool {
    company.status == CustomerStatus::Customer || company.payment > 0.0
}

/// Compute one company's potential from the live agent roster. Pure; the
/// stored `potential_value` is only ever this function's output.
pub fn classify_potential(graph: &EntityGraph, company: &Company) -> (PotentialKind, f64) {
    let brand_covered = company
        .brand_id
        .as_ref()
        .and_then(|id| graph.brand(id))
        .is_some_and(|b| b.has_central_contract());
    let (total, licensed) = graph.agents_of_company(&company.id).fold((0, 0), |(t, l), a| {
        (t + 1, l + (a.license.status == LicenseStatus::Active) as usize)
    });
    classify(company, brand_covered, total, licensed)
}

fn classify(
    company: &Company,
    brand_covered: bool,
    total: usize,
    licensed: usize,
) -> (PotentialKind, f64) {
    if company.central_contract || brand_covered {
        return (PotentialKind::CentrallyCovered, 0.0);
    }
    let Some(tier) = tier_price(total) else {
        return (PotentialKind::NoOpportunity, 0.0);
    };

    if !is_customer(company) {
        return (PotentialKind::NewCustomer, tier);
    }
    // Negative values are kept: an overpaying, under-licensed office is a
    // pricing signal, not a zero.
    if licensed < total {
        return (PotentialKind::UpsellUnlicensed, tier - company.payment);
    }
    if company.payment < tier {
        return (PotentialKind::Underpriced, tier - company.payment);
    }
    (PotentialKind::NoOpportunity, 0.0)
}

// ---------------------------------------------------------------------------
// Maintenance pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    pub companies_scanned: usize,
    pub potentials_changed: usize,
    pub statuses_fixed: usize,
}

/// Re-derive every company's status coherence and potential value. Runs once
/// after each import pass and on demand; always safe to re-run.
///
/// Agent counts and brand coverage are gathered in one sweep each before the
/// company loop, so the pass stays linear in companies + agents.
pub fn recompute_all(graph: &mut EntityGraph) -> MaintenanceReport {
    let mut report = MaintenanceReport {
        companies_scanned: graph.companies.len(),
        ..MaintenanceReport::default()
    };

    let mut agent_counts: HashMap<Id, (usize, usize)> = HashMap::new();
    for agent in &graph.agents {
        let entry = agent_counts.entry(agent.company_id.clone()).or_default();
        entry.0 += 1;
        entry.1 += (agent.license.status == LicenseStatus::Active) as usize;
    }
    let covered_brands: HashSet<Id> = graph
        .brands
        .iter()
        .filter(|b| b.has_central_contract())
        .map(|b| b.id.clone())
        .collect();

    for company in &mut graph.companies {
        if company.payment > 0.0 && company.status != CustomerStatus::Customer {
            company.status = CustomerStatus::Customer;
            report.statuses_fixed += 1;
        }

        let brand_covered = company
            .brand_id
            .as_ref()
            .is_some_and(|id| covered_brands.contains(id));
        let (total, licensed) = agent_counts.get(&company.id).copied().unwrap_or((0, 0));
        let (_, value) = classify(company, brand_covered, total, licensed);
        if (company.potential_value - value).abs() > f64::EPSILON {
            company.potential_value = value;
            report.potentials_changed += 1;
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Migrations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub segments_seeded: usize,
    pub org_numbers_rewritten: usize,
}

/// One-off graph repairs, each guarded by its own precondition so a second
/// run is a no-op.
pub fn migrate(graph: &mut EntityGraph) -> MigrationReport {
    let mut report = MigrationReport::default();
    report.segments_seeded = seed_segments(graph);
    report.org_numbers_rewritten = canonicalize_org_numbers(graph);
    report
}

/// Seed the two stock segments into an empty segment list.
fn seed_segments(graph: &mut EntityGraph) -> usize {
    if !graph.segments.is_empty() {
        return 0;
    }
    for (id, name) in [("real-estate", "Fastighetsmäklare"), ("banking", "Bank")] {
        graph.segments.push(Segment {
            id: Id::from(id),
            name: name.to_string(),
        });
    }
    graph.segments.len()
}

/// Rewrite stored org numbers to the ten-digit canonical form. A number that
/// no longer canonicalizes, or that would collide with another company, is
/// cleared rather than kept wrong.
fn canonicalize_org_numbers(graph: &mut EntityGraph) -> usize {
    let mut rewritten = 0;
    let mut seen: Vec<String> = Vec::new();

    for company in &mut graph.companies {
        let Some(raw) = company.org_number.clone() else {
            continue;
        };
        let canonical = normalize::canonical_org_number(&raw);
        let next = if canonical.is_empty() || seen.contains(&canonical) {
            None
        } else {
            seen.push(canonical.clone());
            Some(canonical)
        };
        if company.org_number != next {
            company.org_number = next;
            rewritten += 1;
        }
    }

    rewritten
}
