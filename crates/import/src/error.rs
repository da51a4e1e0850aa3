use std::fmt;

use crate::catalog::FieldKey;

#[derive(Debug)]
pub enum ImportError {
    /// TOML parse / deserialization error in a synonym catalog.
    ConfigParse(String),
    /// Catalog validation error (empty synonym list, duplicate field, ...).
    ConfigValidation(String),
    /// The mapping fails the runnable gate; nothing has been mutated.
    MappingNotRunnable { missing: Vec<FieldKey> },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "catalog parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "catalog validation error: {msg}"),
            Self::MappingNotRunnable { missing } => {
                let fields: Vec<String> = missing.iter().map(|k| k.to_string()).collect();
                write!(f, "mapping not runnable: missing {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for ImportError {}
