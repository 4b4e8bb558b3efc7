use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::Category;
use super::units::Unit;

/// Data error that aborts the calculation of a scope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmissionError {
    #[error("invalid {quantity} {value} for '{label}': expected a non-negative, finite number")]
    InvalidAmount {
        label: String,
        quantity: &'static str,
        value: f64,
    },
    #[error("unit '{unit}' is not valid for {category}")]
    InvalidUnit { category: Category, unit: Unit },
    #[error("no emission factor registered for {category}/{subtype} and no override supplied")]
    UnknownFactor { category: Category, subtype: String },
    #[error("{quantity} for '{label}' exceeds the representable range")]
    Overflow {
        label: String,
        quantity: &'static str,
    },
    #[error("only one {category} record may be supplied per footprint")]
    DuplicateRecord { category: Category },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionScope {
    Scope1,
    Scope2,
    Scope3,
}

impl EmissionScope {
    pub const fn ordered() -> [Self; 3] {
        [Self::Scope1, Self::Scope2, Self::Scope3]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Scope1 => "scope1",
            Self::Scope2 => "scope2",
            Self::Scope3 => "scope3",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Scope1 => "Scope 1 (direct)",
            Self::Scope2 => "Scope 2 (purchased energy)",
            Self::Scope3 => "Scope 3 (value chain)",
        }
    }
}

impl fmt::Display for EmissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A footprint could not be assembled because one of its scopes failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{scope} calculation failed: {source}")]
pub struct FootprintError {
    pub scope: EmissionScope,
    #[source]
    pub source: EmissionError,
}

impl FootprintError {
    pub fn new(scope: EmissionScope, source: EmissionError) -> Self {
        Self { scope, source }
    }
}
