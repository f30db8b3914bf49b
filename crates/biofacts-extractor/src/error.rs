//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model output was not the expected JSON array
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Biography text is empty
    #[error("Input text is empty")]
    EmptyInput,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Filesystem error while writing or reading artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular file error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
