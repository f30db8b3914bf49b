//! Biofacts Extractor
//!
//! Turns a biography into a categorized fact table, fine-tuning pairs and a
//! summary report using a hosted language model.
//!
//! # Overview
//!
//! The extractor walks a fixed, ordered list of categories and sends one
//! structured-extraction request per category. Each response is stripped of
//! markdown fences and parsed as a JSON array of fact records. A failing
//! category is recorded and skipped; the run continues with the next one.
//!
//! # Architecture
//!
//! ```text
//! Text → Prompt (per category) → LLM → Parser → Facts ─┬→ CSV
//!                                                     ├→ Training pairs → JSONL
//!                                                     └→ Summary report
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use biofacts_extractor::{ExtractorConfig, FactExtractor, OutputPaths};
//! use biofacts_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OpenAiProvider::new(std::env::var("OPENAI_API_KEY")?, "gpt-4o-mini")?;
//! let extractor = FactExtractor::new(llm, ExtractorConfig::default());
//!
//! let biography = std::fs::read_to_string("bio_marcus_chen.md")?;
//! let outcome = extractor.run(&biography, &OutputPaths::in_dir(".")).await?;
//!
//! println!("Facts: {}", outcome.facts.len());
//! println!("Training pairs: {}", outcome.training_pairs.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod output;
mod parser;
mod prompt;
mod summary;
mod types;


pub use config::{
    ExtractorConfig, OutputPaths, PairSource, DEFAULT_FACTS_FILE, DEFAULT_SUMMARY_FILE,
    DEFAULT_TRAINING_FILE,
};
pub use error::ExtractorError;
pub use extractor::FactExtractor;
pub use output::{
    read_fact_table, read_facts_csv, write_facts_csv, write_training_jsonl, FactTable, CSV_HEADER,
};
pub use parser::{parse_fact_response, parse_training_pairs, strip_code_fence};
pub use summary::{SummaryReport, SummaryStats};
pub use types::{
    CategoryOutcome, CategoryReport, ExtractionReport, FailureReason, PairOutcome,
    PipelineOutcome, WrittenArtifacts,
};
