use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Opaque entity id. Immutable once assigned; the only stable foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    NotContacted,
    Prospect,
    Customer,
}

impl Default for CustomerStatus {
    fn default() -> Self {
        Self::NotContacted
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotContacted => write!(f, "not_contacted"),
            Self::Prospect => write!(f, "prospect"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    None,
    Trial,
    Active,
}

impl Default for LicenseStatus {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Trial => write!(f, "trial"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// Per-agent license package. Merged key-by-key on import: only keys present
/// in the incoming row are written, the rest preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub status: LicenseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Brand-level agreement covering all owned companies' billing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralContract {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrr: Option<f64>,
}

/// Franchise/chain-level entity owning multiple companies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub central_contract: Option<CentralContract>,
}

impl Brand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            segment_id: None,
            central_contract: None,
        }
    }

    pub fn has_central_contract(&self) -> bool {
        self.central_contract.as_ref().is_some_and(|c| c.active)
    }
}

/// A billable business unit, optionally under a brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
    /// Monthly recurring amount currently billed. Always >= 0.
    #[serde(default)]
    pub payment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_stage: Option<String>,
    /// Derived upsell/new-business value. Recomputed by the maintenance pass;
    /// never hand-set persistently.
    #[serde(default)]
    pub potential_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<String>,
    /// Company-level central coverage (beyond any brand-level contract).
    #[serde(default)]
    pub central_contract: bool,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            brand_id: None,
            segment_id: None,
            city: None,
            county: None,
            status: CustomerStatus::default(),
            payment: 0.0,
            pipeline_stage: None,
            potential_value: 0.0,
            org_number: None,
            customer_number: None,
            central_contract: false,
        }
    }
}

/// One person-per-company record. The same human may hold several of these;
/// they are collapsed at report time only, never merged in storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub company_id: Id,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    pub license: License,
}

impl Agent {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        company_id: Id,
    ) -> Self {
        Self {
            id: Id::generate(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            company_id,
            status: CustomerStatus::default(),
            license: License::default(),
        }
    }
}

/// Market segment referenced by brands and companies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: Id,
    pub name: String,
}

impl Segment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
        }
    }
}
