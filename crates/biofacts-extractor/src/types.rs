//! Result types for extraction runs

use biofacts_domain::{FactRecord, TrainingPair};
use std::path::PathBuf;

/// What a single category request produced
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    /// The model returned a non-empty array
    Extracted(usize),
    /// The model returned a valid, empty array
    Empty,
    /// The request or the parse failed; the category contributed nothing
    Failed(FailureReason),
}

/// Why a category yielded nothing
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// Transport, authentication or provider-side failure
    Transport(String),
    /// Response was not a JSON array
    Format(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Transport(msg) => write!(f, "transport: {}", msg),
            FailureReason::Format(msg) => write!(f, "format: {}", msg),
        }
    }
}

impl CategoryOutcome {
    /// Whether the category failed
    pub fn is_failure(&self) -> bool {
        matches!(self, CategoryOutcome::Failed(_))
    }

    /// Number of facts the category contributed
    pub fn fact_count(&self) -> usize {
        match self {
            CategoryOutcome::Extracted(n) => *n,
            _ => 0,
        }
    }
}

/// Per-category record of an extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    /// Category name
    pub category: String,

    /// Result of the request
    pub outcome: CategoryOutcome,
}

/// Facts from every category plus how each category fared
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// All facts, in category order then response order
    pub facts: Vec<FactRecord>,

    /// One entry per category, in request order
    pub categories: Vec<CategoryReport>,
}

impl ExtractionReport {
    /// Categories whose request or parse failed
    pub fn failed_categories(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| c.outcome.is_failure())
    }

    /// Whether every category failed
    pub fn all_failed(&self) -> bool {
        !self.categories.is_empty() && self.categories.iter().all(|c| c.outcome.is_failure())
    }
}

/// How the training-pair step ended
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// Pairs produced by the model
    Synthesized(usize),
    /// Pairs built from facts without a model call
    Derived(usize),
    /// Pair generation disabled
    Skipped,
    /// Synthesis request or parse failed
    Failed(String),
}

/// Files written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    /// Fact table
    pub facts_csv: PathBuf,

    /// Training pairs, absent when there were none to write
    pub training_jsonl: Option<PathBuf>,

    /// Summary report
    pub summary_md: PathBuf,
}

/// Result of a full pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Extracted facts (empty when nothing was extracted)
    pub facts: Vec<FactRecord>,

    /// Training pairs (empty when nothing was extracted or generation failed)
    pub training_pairs: Vec<TrainingPair>,

    /// Per-category outcomes
    pub categories: Vec<CategoryReport>,

    /// How the training-pair step ended
    pub pairs: PairOutcome,

    /// Files written, `None` when zero facts short-circuited the run
    pub artifacts: Option<WrittenArtifacts>,
}
