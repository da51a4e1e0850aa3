//! Header→field mapping: best-guess proposal from the synonym catalog,
//! manual override, and the runnable gate that protects the graph from a
//! half-configured run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{FieldKey, SynonymCatalog};

/// A transient field-key → source-column assignment. Produced by [`guess`],
/// reviewable and editable by the caller before committing a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportMapping {
    assignments: BTreeMap<FieldKey, String>,
}

impl ImportMapping {
    /// Propose a mapping for the observed headers.
    ///
    /// Per field, synonyms are tried in catalog order against lowercased
    /// headers; the first header containing the synonym wins. When several
    /// headers match one synonym the first in column order wins, silently.
    /// Always overridable via [`assign`].
    ///
    /// [`assign`]: ImportMapping::assign
    pub fn guess(headers: &[String], catalog: &SynonymCatalog) -> Self {
        let lowered: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (i, h.to_lowercase()))
            .collect();

        let mut assignments = BTreeMap::new();
        for (key, synonyms) in catalog.iter() {
            'synonyms: for synonym in synonyms {
                for (i, header_lc) in &lowered {
                    if header_lc.contains(synonym.as_str()) {
                        assignments.insert(key, headers[*i].clone());
                        break 'synonyms;
                    }
                }
            }
        }
        Self { assignments }
    }

    /// Manually map a field to a source column, replacing any guess.
    pub fn assign(&mut self, key: FieldKey, header: impl Into<String>) {
        self.assignments.insert(key, header.into());
    }

    /// Drop a field from the mapping.
    pub fn clear(&mut self, key: FieldKey) {
        self.assignments.remove(&key);
    }

    pub fn source_for(&self, key: FieldKey) -> Option<&str> {
        self.assignments.get(&key).map(String::as_str)
    }

    pub fn is_mapped(&self, key: FieldKey) -> bool {
        self.assignments.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.assignments.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Runnable gate: a company-name column, plus some agent-name source
    /// (first or last, or a full-name column).
    pub fn is_runnable(&self) -> bool {
        self.missing_for_run().is_empty()
    }

    /// The fields whose absence blocks a run. Empty means runnable.
    pub fn missing_for_run(&self) -> Vec<FieldKey> {
        let mut missing = Vec::new();
        if !self.is_mapped(FieldKey::Company) {
            missing.push(FieldKey::Company);
        }
        let has_name = self.is_mapped(FieldKey::FirstName)
            || self.is_mapped(FieldKey::LastName)
            || self.is_mapped(FieldKey::FullName);
        if !has_name {
            missing.push(FieldKey::FullName);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn english_headers_map_and_are_runnable() {
        let catalog = SynonymCatalog::default();
        let mapping = ImportMapping::guess(
            &headers(&["Company", "First", "Last", "Email"]),
            &catalog,
        );
        assert_eq!(mapping.source_for(FieldKey::Company), Some("Company"));
        assert_eq!(mapping.source_for(FieldKey::FirstName), Some("First"));
        assert_eq!(mapping.source_for(FieldKey::LastName), Some("Last"));
        assert_eq!(mapping.source_for(FieldKey::Email), Some("Email"));
        assert!(mapping.is_runnable());
    }

    #[test]
    fn swedish_headers_map() {
        let catalog = SynonymCatalog::default();
        let mapping = ImportMapping::guess(
            &headers(&[
                "Varumärke",
                "Företag",
                "Org.nr",
                "Förnamn",
                "Efternamn",
                "E-post",
                "Ort",
                "Månadspris",
            ]),
            &catalog,
        );
        assert_eq!(mapping.source_for(FieldKey::Brand), Some("Varumärke"));
        assert_eq!(mapping.source_for(FieldKey::Company), Some("Företag"));
        assert_eq!(mapping.source_for(FieldKey::OrgNumber), Some("Org.nr"));
        assert_eq!(mapping.source_for(FieldKey::City), Some("Ort"));
        assert_eq!(mapping.source_for(FieldKey::Payment), Some("Månadspris"));
        assert!(mapping.is_runnable());
    }

    #[test]
    fn first_matching_header_wins_in_column_order() {
        let catalog = SynonymCatalog::default();
        let mapping = ImportMapping::guess(
            &headers(&["Telefon arbete", "Telefon mobil"]),
            &catalog,
        );
        assert_eq!(mapping.source_for(FieldKey::Phone), Some("Telefon arbete"));
    }

    #[test]
    fn synonym_priority_beats_column_order() {
        // "kundstatus" is a more specific status synonym than "kund", so the
        // later column still wins the status slot.
        let catalog = SynonymCatalog::default();
        let mapping = ImportMapping::guess(&headers(&["Kund", "Kundstatus"]), &catalog);
        assert_eq!(mapping.source_for(FieldKey::Status), Some("Kundstatus"));
    }

    #[test]
    fn unmatched_headers_leave_fields_unmapped() {
        let catalog = SynonymCatalog::default();
        let mapping = ImportMapping::guess(&headers(&["Zzz", "Qqq"]), &catalog);
        assert!(mapping.is_empty());
        assert!(!mapping.is_runnable());
    }

    #[test]
    fn full_name_alone_satisfies_the_name_requirement() {
        let catalog = SynonymCatalog::default();
        let mapping =
            ImportMapping::guess(&headers(&["Företag", "Mäklare Namn"]), &catalog);
        assert!(mapping.is_mapped(FieldKey::FullName));
        assert!(mapping.is_runnable());
    }

    #[test]
    fn manual_override_and_clear() {
        let catalog = SynonymCatalog::default();
        let mut mapping = ImportMapping::guess(&headers(&["Company", "Namn"]), &catalog);
        mapping.assign(FieldKey::City, "Column F");
        assert_eq!(mapping.source_for(FieldKey::City), Some("Column F"));

        mapping.clear(FieldKey::FullName);
        assert!(!mapping.is_runnable());
        assert_eq!(mapping.missing_for_run(), vec![FieldKey::FullName]);
    }

    #[test]
    fn missing_company_blocks_run() {
        let catalog = SynonymCatalog::default();
        let mapping = ImportMapping::guess(&headers(&["Förnamn", "Efternamn"]), &catalog);
        assert_eq!(mapping.missing_for_run(), vec![FieldKey::Company]);
    }
}
