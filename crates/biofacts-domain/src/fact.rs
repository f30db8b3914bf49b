//! Fact records
//!
//! A fact record is one structured claim pulled out of biographical text.
//! Records have no identity beyond their position in the extraction output.

use crate::confidence::ConfidenceBand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence assigned when the model omits one or returns a non-number
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// How central a fact is to the subject's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Core biographical or personality information
    High,
    /// Supporting detail
    #[default]
    Medium,
    /// Incidental detail
    Low,
}

impl Importance {
    /// All levels, highest first
    pub const ALL: [Importance; 3] = [Importance::High, Importance::Medium, Importance::Low];

    /// Parse a label case-insensitively, `None` for anything unrecognised
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Importance::High),
            "medium" => Some(Importance::Medium),
            "low" => Some(Importance::Low),
            _ => None,
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    /// Category name the fact belongs to
    pub category: String,

    /// The factual statement
    pub fact: String,

    /// Model-reported confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Supporting text from the source
    pub evidence: String,

    /// Importance to the subject's profile
    pub importance: Importance,

    /// Whether the fact can be checked against external sources
    pub verifiable: bool,
}

impl FactRecord {
    /// Create a fact record
    ///
    /// Confidence is clamped into [0.0, 1.0]; NaN becomes [`DEFAULT_CONFIDENCE`].
    pub fn new(
        category: impl Into<String>,
        fact: impl Into<String>,
        confidence: f64,
        evidence: impl Into<String>,
        importance: Importance,
        verifiable: bool,
    ) -> Self {
        Self {
            category: category.into(),
            fact: fact.into(),
            confidence: normalize_confidence(confidence),
            evidence: evidence.into(),
            importance,
            verifiable,
        }
    }

    /// The confidence band this fact falls into
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::classify(self.confidence)
    }
}

/// Clamp a confidence into [0.0, 1.0]
pub fn normalize_confidence(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_CONFIDENCE
    } else {
        value.clamp(0.0, 1.0)
    }
}
