//! Biofacts Domain Layer
//!
//! This crate contains the data model shared by every other crate in the
//! workspace. It performs no I/O and defines the trait boundary to the hosted
//! language model.
//!
//! ## Key Concepts
//!
//! - **Fact record**: a single claim extracted from biographical text, tagged
//!   with confidence, importance and verifiability
//! - **Category**: a fixed topical bucket that scopes one extraction request
//! - **Confidence band**: the high/medium/low bucket a confidence falls into
//! - **Training pair**: an instruction/response example for fine-tuning
//!
//! ## Architecture
//!
//! - Pure data types and derivations only
//! - Provider implementations live in `biofacts-llm`
//! - The extraction pipeline lives in `biofacts-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod confidence;
pub mod fact;
pub mod training;
pub mod traits;

// Re-exports for convenience
pub use category::{default_categories, CategorySpec};
pub use confidence::{BandCounts, ConfidenceBand};
pub use fact::{FactRecord, Importance, DEFAULT_CONFIDENCE};
pub use training::{ChatMessage, ChatRole, TrainingPair};
pub use traits::{CompletionRequest, LlmProvider};
