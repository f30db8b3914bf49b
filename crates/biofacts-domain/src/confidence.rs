//! Confidence bands
//!
//! A fact's confidence is a single value in [0, 1]. Reports group facts into
//! three bands:
//! - High: confidence >= 0.8
//! - Medium: 0.6 <= confidence < 0.8
//! - Low: everything else

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the high band
pub const HIGH_THRESHOLD: f64 = 0.8;

/// Lower bound of the medium band
pub const MEDIUM_THRESHOLD: f64 = 0.6;

/// Confidence bucket used by summary reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// confidence >= 0.8
    High,
    /// 0.6 <= confidence < 0.8
    Medium,
    /// confidence < 0.6
    Low,
}

impl ConfidenceBand {
    /// All bands, highest first
    pub const ALL: [ConfidenceBand; 3] =
        [ConfidenceBand::High, ConfidenceBand::Medium, ConfidenceBand::Low];

    /// Classify a confidence value
    ///
    /// Total over `f64`: NaN falls through every comparison and lands in `Low`.
    pub fn classify(confidence: f64) -> Self {
        if confidence >= HIGH_THRESHOLD {
            ConfidenceBand::High
        } else if confidence >= MEDIUM_THRESHOLD {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// The inclusive lower bound of the band
    pub fn lower_bound(&self) -> f64 {
        match self {
            ConfidenceBand::High => HIGH_THRESHOLD,
            ConfidenceBand::Medium => MEDIUM_THRESHOLD,
            ConfidenceBand::Low => 0.0,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-band counts over a set of confidence values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandCounts {
    /// Facts in the high band
    pub high: usize,
    /// Facts in the medium band
    pub medium: usize,
    /// Facts in the low band
    pub low: usize,
}

impl BandCounts {
    /// Count a sequence of confidence values
    pub fn tally<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut counts = Self::default();
        for value in values {
            counts.record(ConfidenceBand::classify(value));
        }
        counts
    }

    /// Add one value in the given band
    pub fn record(&mut self, band: ConfidenceBand) {
        match band {
            ConfidenceBand::High => self.high += 1,
            ConfidenceBand::Medium => self.medium += 1,
            ConfidenceBand::Low => self.low += 1,
        }
    }

    /// Count for a single band
    pub fn get(&self, band: ConfidenceBand) -> usize {
        match band {
            ConfidenceBand::High => self.high,
            ConfidenceBand::Medium => self.medium,
            ConfidenceBand::Low => self.low,
        }
    }

    /// Sum across all bands
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}
