//! Writers for the fact table and training-pair artifacts
//!
//! All writes truncate and replace the target file.

use crate::error::ExtractorError;
use biofacts_domain::{FactRecord, Importance, TrainingPair};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Column order of the fact table
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "category",
    "fact",
    "confidence",
    "evidence",
    "importance",
    "verifiable",
    "extraction_source",
];

/// One row of the fact table
#[derive(Debug, Serialize, Deserialize)]
struct FactRow {
    id: usize,
    category: String,
    fact: String,
    confidence: f64,
    evidence: String,
    importance: String,
    #[serde(deserialize_with = "lenient_bool")]
    verifiable: bool,
    extraction_source: String,
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"))
}

/// Write facts as CSV with a header row
///
/// `id` is the 1-based row position. Returns the number of rows written.
pub fn write_facts_csv(
    path: impl AsRef<Path>,
    facts: &[FactRecord],
    extraction_source: &str,
) -> Result<usize, ExtractorError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    for (idx, fact) in facts.iter().enumerate() {
        writer.serialize(FactRow {
            id: idx + 1,
            category: fact.category.clone(),
            fact: fact.fact.clone(),
            confidence: fact.confidence,
            evidence: fact.evidence.clone(),
            importance: fact.importance.as_str().to_string(),
            verifiable: fact.verifiable,
            extraction_source: extraction_source.to_string(),
        })?;
    }
    writer.flush()?;

    info!("Saved {} facts to {}", facts.len(), path.display());
    Ok(facts.len())
}

/// Contents of a fact table read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct FactTable {
    /// Rows in file order
    pub facts: Vec<FactRecord>,

    /// `extraction_source` of the first row that has one
    pub extraction_source: Option<String>,
}

/// Read a fact table written by [`write_facts_csv`]
///
/// Rows come back in file order; `id` is dropped.
pub fn read_fact_table(path: impl AsRef<Path>) -> Result<FactTable, ExtractorError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let mut facts = Vec::new();
    let mut extraction_source = None;
    for row in reader.deserialize::<FactRow>() {
        let row = row?;
        if extraction_source.is_none() && !row.extraction_source.is_empty() {
            extraction_source = Some(row.extraction_source.clone());
        }
        let importance = Importance::from_label(&row.importance).unwrap_or_else(|| {
            warn!("Row {}: unknown importance '{}', using medium", row.id, row.importance);
            Importance::Medium
        });
        facts.push(FactRecord::new(
            row.category,
            row.fact,
            row.confidence,
            row.evidence,
            importance,
            row.verifiable,
        ));
    }
    Ok(FactTable {
        facts,
        extraction_source,
    })
}

/// Read only the facts of a fact table
pub fn read_facts_csv(path: impl AsRef<Path>) -> Result<Vec<FactRecord>, ExtractorError> {
    read_fact_table(path).map(|table| table.facts)
}

/// Write training pairs as line-delimited JSON
///
/// Returns the number of lines written.
pub fn write_training_jsonl(
    path: impl AsRef<Path>,
    pairs: &[TrainingPair],
) -> Result<usize, ExtractorError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    for pair in pairs {
        serde_json::to_writer(&mut writer, pair)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!("Saved {} training pairs to {}", pairs.len(), path.display());
    Ok(pairs.len())
}
