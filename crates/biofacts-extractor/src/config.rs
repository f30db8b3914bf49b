//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where training pairs come from after fact extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairSource {
    /// Ask the model to write conversation pairs from a sample of facts
    #[default]
    Synthesize,
    /// Build one instruction pair per fact without calling the model
    Derive,
    /// Produce no training pairs
    None,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Person the biography describes, used in prompts and the report
    pub subject: String,

    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Sampling temperature for per-category extraction
    pub extraction_temperature: f32,

    /// Sampling temperature for training-pair synthesis
    pub synthesis_temperature: f32,

    /// Output token ceiling for every request
    pub max_tokens: u32,

    /// Flat pause between category requests (milliseconds)
    pub category_delay_ms: u64,

    /// Number of facts shown to the model when synthesizing pairs
    pub synthesis_sample_size: usize,

    /// Lower end of the requested number of synthesized pairs
    pub min_pairs: usize,

    /// Upper end of the requested number of synthesized pairs
    pub max_pairs: usize,

    /// How training pairs are produced
    pub pair_source: PairSource,

    /// Override for the CSV `extraction_source` column
    pub extraction_source: Option<String>,
}

impl ExtractorConfig {
    /// Get the inter-category delay as a Duration
    pub fn category_delay(&self) -> Duration {
        Duration::from_millis(self.category_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("subject must not be empty".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        for (name, value) in [
            ("extraction_temperature", self.extraction_temperature),
            ("synthesis_temperature", self.synthesis_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(format!("{} {} out of range [0.0, 2.0]", name, value));
            }
        }
        if self.min_pairs > self.max_pairs {
            return Err(format!(
                "min_pairs {} exceeds max_pairs {}",
                self.min_pairs, self.max_pairs
            ));
        }
        if self.pair_source == PairSource::Synthesize && self.synthesis_sample_size == 0 {
            return Err("synthesis_sample_size must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            subject: "Dr. Marcus Chen".to_string(),
            max_text_length: 200_000,
            extraction_temperature: 0.3,
            synthesis_temperature: 0.5,
            max_tokens: 4000,
            category_delay_ms: 1000,
            synthesis_sample_size: 20,
            min_pairs: 50,
            max_pairs: 100,
            pair_source: PairSource::Synthesize,
            extraction_source: None,
        }
    }
}

/// Default file name for the fact table
pub const DEFAULT_FACTS_FILE: &str = "bio.csv";

/// Default file name for training pairs
pub const DEFAULT_TRAINING_FILE: &str = "bio_training_data.jsonl";

/// Default file name for the summary report
pub const DEFAULT_SUMMARY_FILE: &str = "bio_extraction_summary.md";

/// Locations of the three artifacts a run writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Row-per-fact CSV
    pub facts_csv: PathBuf,

    /// Line-delimited JSON training pairs
    pub training_jsonl: PathBuf,

    /// Markdown summary report
    pub summary_md: PathBuf,
}

impl OutputPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            facts_csv: dir.join(DEFAULT_FACTS_FILE),
            training_jsonl: dir.join(DEFAULT_TRAINING_FILE),
            summary_md: dir.join(DEFAULT_SUMMARY_FILE),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.category_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_max_text_length() {
        let mut config = ExtractorConfig::default();
        config.max_text_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = ExtractorConfig::default();
        config.extraction_temperature = 2.5;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.synthesis_temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_pair_range() {
        let mut config = ExtractorConfig::default();
        config.min_pairs = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_sample_only_matters_when_synthesizing() {
        let mut config = ExtractorConfig::default();
        config.synthesis_sample_size = 0;
        assert!(config.validate().is_err());

        config.pair_source = PairSource::Derive;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::default();
        config.pair_source = PairSource::Derive;
        config.extraction_source = Some("local".to_string());
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.subject, parsed.subject);
        assert_eq!(config.max_tokens, parsed.max_tokens);
        assert_eq!(parsed.pair_source, PairSource::Derive);
        assert_eq!(parsed.extraction_source.as_deref(), Some("local"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml(
            r#"
            subject = "Ada Lovelace"
            category_delay_ms = 0
            pair_source = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.subject, "Ada Lovelace");
        assert_eq!(config.category_delay_ms, 0);
        assert_eq!(config.pair_source, PairSource::None);
        assert_eq!(config.max_tokens, 4000);
    }

    #[test]
    fn test_output_paths_in_dir() {
        let paths = OutputPaths::in_dir("/tmp/out");
        assert_eq!(paths.facts_csv, PathBuf::from("/tmp/out/bio.csv"));
        assert_eq!(paths.training_jsonl, PathBuf::from("/tmp/out/bio_training_data.jsonl"));
        assert_eq!(paths.summary_md, PathBuf::from("/tmp/out/bio_extraction_summary.md"));
    }
}
