use std::collections::BTreeMap;

use brokerbase_graph::{CustomerStatus, LicenseStatus};
use serde::Serialize;

use crate::catalog::FieldKey;
use crate::mapping::ImportMapping;
use crate::normalize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One parsed sheet row: header → raw cell text. The caller owns reading the
/// tabular source; the engine never sees files.
pub type ImportRow = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Normalized row
// ---------------------------------------------------------------------------

/// One row after mapping + normalization. Empty strings mean "not present";
/// `Option` fields distinguish "unspecified" from an explicit value.
#[derive(Debug, Clone, Default)]
pub struct RowValues {
    pub brand: String,
    pub company: String,
    pub org_number: String,
    pub customer_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub county: String,
    pub pipeline: String,
    pub status: Option<CustomerStatus>,
    pub license_status: Option<LicenseStatus>,
    pub product: String,
    pub payment: Option<f64>,
    pub central_contract: Option<bool>,
}

impl RowValues {
    /// Extract and normalize one row through the committed mapping.
    pub fn extract(row: &ImportRow, mapping: &ImportMapping) -> Self {
        let raw = |key: FieldKey| -> &str {
            mapping
                .source_for(key)
                .and_then(|header| row.get(header))
                .map(String::as_str)
                .unwrap_or("")
                .trim()
        };

        let mut first_name = raw(FieldKey::FirstName).to_string();
        let mut last_name = raw(FieldKey::LastName).to_string();
        if first_name.is_empty() && last_name.is_empty() {
            let (first, last) = normalize::split_full_name(raw(FieldKey::FullName));
            first_name = first;
            last_name = last;
        } else if last_name.is_empty() && first_name.contains(char::is_whitespace) {
            // A lone "Mäklare Namn"-style column mapped to first name.
            let (first, last) = normalize::split_full_name(&first_name);
            first_name = first;
            last_name = last;
        }

        let status_raw = raw(FieldKey::Status);
        let license_raw = raw(FieldKey::License);
        let payment_raw = raw(FieldKey::Payment);

        Self {
            brand: raw(FieldKey::Brand).to_string(),
            company: raw(FieldKey::Company).to_string(),
            org_number: normalize::canonical_org_number(raw(FieldKey::OrgNumber)),
            customer_number: normalize::canonical_org_number(raw(FieldKey::CustomerNumber)),
            first_name,
            last_name,
            email: raw(FieldKey::Email).to_lowercase(),
            phone: raw(FieldKey::Phone).to_string(),
            city: raw(FieldKey::City).to_string(),
            county: raw(FieldKey::County).to_string(),
            pipeline: raw(FieldKey::Pipeline).to_string(),
            status: (!status_raw.is_empty()).then(|| normalize::parse_status(status_raw)),
            license_status: (!license_raw.is_empty())
                .then(|| normalize::parse_license_status(license_raw)),
            product: raw(FieldKey::Product).to_string(),
            payment: (!payment_raw.is_empty()).then(|| normalize::parse_money(payment_raw)),
            central_contract: normalize::parse_boolish(raw(FieldKey::CentralContract)),
        }
    }

    /// Rows without a company name are skipped entirely.
    pub fn has_company(&self) -> bool {
        !self.company.is_empty()
    }

    /// Company-only rows update the company but perform no agent resolution.
    pub fn has_agent_name(&self) -> bool {
        !self.first_name.is_empty() || !self.last_name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Per-level create/update counters for one reconciliation pass. Skipped rows
/// are counted but excluded from every other counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created_brands: usize,
    pub created_companies: usize,
    pub created_agents: usize,
    pub updated_companies: usize,
    pub updated_agents: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub meta: ImportMeta,
    pub summary: ImportSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SynonymCatalog;

    fn row(pairs: &[(&str, &str)]) -> ImportRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mapping_for(headers: &[&str]) -> ImportMapping {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        ImportMapping::guess(&headers, &SynonymCatalog::default())
    }

    #[test]
    fn extract_normalizes_each_field() {
        let mapping = mapping_for(&[
            "Företag", "Org.nr", "Förnamn", "Efternamn", "E-post", "Månadspris",
        ]);
        let values = RowValues::extract(
            &row(&[
                ("Företag", " Mäklarhuset Täby "),
                ("Org.nr", "556677-8899"),
                ("Förnamn", "Anna"),
                ("Efternamn", "Berg"),
                ("E-post", "Anna.Berg@Example.SE"),
                ("Månadspris", "1 099 kr"),
            ]),
            &mapping,
        );
        assert_eq!(values.company, "Mäklarhuset Täby");
        assert_eq!(values.org_number, "5566778899");
        assert_eq!(values.email, "anna.berg@example.se");
        assert_eq!(values.payment, Some(1099.0));
        assert!(values.has_company());
        assert!(values.has_agent_name());
    }

    #[test]
    fn full_name_column_is_split() {
        let mapping = mapping_for(&["Företag", "Mäklare Namn"]);
        let values = RowValues::extract(
            &row(&[("Företag", "X"), ("Mäklare Namn", "Anna Maria Berg")]),
            &mapping,
        );
        assert_eq!(values.first_name, "Anna Maria");
        assert_eq!(values.last_name, "Berg");
    }

    #[test]
    fn unmapped_cells_stay_unspecified() {
        let mapping = mapping_for(&["Företag", "Namn"]);
        let values = RowValues::extract(&row(&[("Företag", "X"), ("Namn", "A B")]), &mapping);
        assert_eq!(values.status, None);
        assert_eq!(values.payment, None);
        assert_eq!(values.central_contract, None);
    }

    #[test]
    fn empty_company_cell_marks_row_skippable() {
        let mapping = mapping_for(&["Företag", "Namn"]);
        let values = RowValues::extract(&row(&[("Företag", "  "), ("Namn", "A B")]), &mapping);
        assert!(!values.has_company());
    }
}
