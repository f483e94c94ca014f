//! Regimen classification models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The temporal shape of a dosing regimen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegimenType {
    /// Multiple sequential frequency phases (e.g. "4x daily, then 3x daily")
    Tapering,
    /// One phase with a known end date
    ShortTerm,
    /// No determinable end; treated as ongoing
    Chronic,
}

impl fmt::Display for RegimenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tapering => write!(f, "tapering"),
            Self::ShortTerm => write!(f, "short_term"),
            Self::Chronic => write!(f, "chronic"),
        }
    }
}

impl FromStr for RegimenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tapering" => Ok(Self::Tapering),
            "short_term" | "short-term" => Ok(Self::ShortTerm),
            "chronic" => Ok(Self::Chronic),
            other => Err(format!("unknown regimen type: {}", other)),
        }
    }
}

/// Outcome of classifying an instruction string.
///
/// Total over all inputs: every string, including the empty string, maps to
/// exactly one shape, with `reason` naming the lexical rule that fired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegimenClassification {
    /// The regimen shape
    pub regimen_type: RegimenType,
    /// Which rule fired, in plain language
    pub reason: String,
}

impl RegimenClassification {
    /// Build a classification from a shape and its firing rule.
    pub fn new(regimen_type: RegimenType, reason: impl Into<String>) -> Self {
        Self {
            regimen_type,
            reason: reason.into(),
        }
    }
}
