use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

// ---------------------------------------------------------------------------
// Field catalog
// ---------------------------------------------------------------------------

/// Semantic target fields a source column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Brand,
    Company,
    OrgNumber,
    CustomerNumber,
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    City,
    County,
    Status,
    License,
    Product,
    Pipeline,
    Potential,
    Payment,
    ActiveAgents,
    CentralContract,
}

impl FieldKey {
    pub const ALL: [FieldKey; 19] = [
        Self::Brand,
        Self::Company,
        Self::OrgNumber,
        Self::CustomerNumber,
        Self::FirstName,
        Self::LastName,
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::City,
        Self::County,
        Self::Status,
        Self::License,
        Self::Product,
        Self::Pipeline,
        Self::Potential,
        Self::Payment,
        Self::ActiveAgents,
        Self::CentralContract,
    ];
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Brand => "brand",
            Self::Company => "company",
            Self::OrgNumber => "org_number",
            Self::CustomerNumber => "customer_number",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::City => "city",
            Self::County => "county",
            Self::Status => "status",
            Self::License => "license",
            Self::Product => "product",
            Self::Pipeline => "pipeline",
            Self::Potential => "potential",
            Self::Payment => "payment",
            Self::ActiveAgents => "active_agents",
            Self::CentralContract => "central_contract",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Synonym catalog
// ---------------------------------------------------------------------------

/// Ordered synonym dictionary driving header→field guessing.
///
/// Kept as declarative data, not control flow, so locale variants extend
/// without touching resolution logic. Synonyms are tried in list order;
/// earlier entries are more specific.
#[derive(Debug, Clone)]
pub struct SynonymCatalog {
    entries: Vec<(FieldKey, Vec<String>)>,
}

/// TOML shape for locale overrides: listed fields replace their built-in
/// synonym lists, unlisted fields keep the defaults.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    synonyms: BTreeMap<FieldKey, Vec<String>>,
}

impl Default for SynonymCatalog {
    fn default() -> Self {
        let entry = |key: FieldKey, syns: &[&str]| {
            (key, syns.iter().map(|s| s.to_string()).collect())
        };
        Self {
            entries: vec![
                entry(
                    FieldKey::Brand,
                    &[
                        "varumärke", "varumarke", "kedjetillhörighet", "kedjetillhorighet",
                        "kedja", "brand", "franchise", "märke", "marke",
                    ],
                ),
                entry(
                    FieldKey::Company,
                    &[
                        "mäklarföretag", "maklarforetag", "företag", "foretag", "byrå",
                        "byra", "kontor", "office", "company", "agentur",
                    ],
                ),
                entry(
                    FieldKey::OrgNumber,
                    &[
                        "organisationsnummer", "organisationsnr", "orgnummer", "org nr",
                        "org-nr", "org.nr", "orgnr", "org",
                    ],
                ),
                entry(
                    FieldKey::CustomerNumber,
                    &[
                        "kundnummer", "kundnr", "kund-nr", "kund nr", "kund-id", "kund id",
                        "kundid",
                    ],
                ),
                entry(
                    FieldKey::FirstName,
                    &["förnamn", "fornamn", "tilltalsnamn", "first", "given"],
                ),
                entry(
                    FieldKey::LastName,
                    &["efternamn", "surname", "family", "last"],
                ),
                entry(
                    FieldKey::FullName,
                    &[
                        "mäklare namn", "maklare namn", "fullständigt namn",
                        "fullstandigt namn", "namn", "name",
                    ],
                ),
                entry(FieldKey::Email, &["e-post", "epost", "email", "mejl", "mail"]),
                entry(FieldKey::Phone, &["telefon", "mobil", "phone", "cell", "tel"]),
                entry(FieldKey::City, &["stad", "ort", "city", "kommun", "location"]),
                entry(FieldKey::County, &["län", "lan", "county"]),
                entry(
                    FieldKey::Status,
                    &[
                        "kundstatus", "status", "kategori", "är kund", "ar kund",
                        "kund idag", "kund",
                    ],
                ),
                entry(
                    FieldKey::License,
                    &["licensstatus", "licens", "license", "abonnemang", "abo"],
                ),
                entry(
                    FieldKey::Product,
                    &[
                        "licenstyp", "license type", "produkt", "produkter", "paket",
                        "plan", "artikel",
                    ],
                ),
                entry(
                    FieldKey::Pipeline,
                    &["pipeline", "affärssteg", "affarssteg", "steg", "stage"],
                ),
                entry(
                    FieldKey::Potential,
                    &[
                        "potentiellt värde", "potentiellt varde", "dealvärde", "dealvarde",
                        "potential", "värde", "varde",
                    ],
                ),
                entry(
                    FieldKey::Payment,
                    &[
                        "månadspris", "manadspris", "månadsavgift", "manadsavgift",
                        "årsavgift", "arsavgift", "abonnemangsavgift", "kreditbelopp",
                        "pris", "avgift", "belopp", "mrr", "arr",
                    ],
                ),
                entry(
                    FieldKey::ActiveAgents,
                    &[
                        "aktiva mäklare", "aktiva maklare", "antal aktiva",
                        "antal mäklare", "antal maklare", "# mäklare", "# maklare",
                        "agents count",
                    ],
                ),
                entry(
                    FieldKey::CentralContract,
                    &["centralavtal", "centralt avtal", "central agreement", "central"],
                ),
            ],
        }
    }
}

impl SynonymCatalog {
    /// Built-in defaults with per-field overrides from a TOML document.
    pub fn from_toml(input: &str) -> Result<Self, ImportError> {
        let file: CatalogFile =
            toml::from_str(input).map_err(|e| ImportError::ConfigParse(e.to_string()))?;
        let mut catalog = Self::default();
        for (key, synonyms) in file.synonyms {
            catalog.set_synonyms(key, synonyms);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        for (key, synonyms) in &self.entries {
            if synonyms.is_empty() {
                return Err(ImportError::ConfigValidation(format!(
                    "field '{key}' has an empty synonym list"
                )));
            }
            if synonyms.iter().any(|s| s.trim().is_empty()) {
                return Err(ImportError::ConfigValidation(format!(
                    "field '{key}' has a blank synonym"
                )));
            }
        }
        Ok(())
    }

    pub fn set_synonyms(&mut self, key: FieldKey, synonyms: Vec<String>) {
        let lowered: Vec<String> = synonyms.iter().map(|s| s.to_lowercase()).collect();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = lowered;
        } else {
            self.entries.push((key, lowered));
        }
    }

    pub fn synonyms(&self, key: FieldKey) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, s)| s.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &[String])> {
        self.entries.iter().map(|(k, s)| (*k, s.as_slice()))
    }
}
