//! Core extraction pipeline

use crate::config::{ExtractorConfig, OutputPaths, PairSource};
use crate::error::ExtractorError;
use crate::output::{write_facts_csv, write_training_jsonl};
use crate::parser::{parse_fact_response, parse_training_pairs};
use crate::prompt::{PromptBuilder, SynthesisPromptBuilder};
use crate::summary::SummaryReport;
use crate::types::{
    CategoryOutcome, CategoryReport, ExtractionReport, FailureReason, PairOutcome,
    PipelineOutcome, WrittenArtifacts,
};
use biofacts_domain::{default_categories, CategorySpec, FactRecord, LlmProvider, TrainingPair};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Extracts categorized facts from biographical text
///
/// Categories are processed one at a time, in order, with a flat pause
/// between requests. A failing category is recorded and skipped; it never
/// aborts the run.
pub struct FactExtractor<L>
where
    L: LlmProvider,
{
    llm: L,
    config: ExtractorConfig,
    categories: Vec<CategorySpec>,
}

impl<L> FactExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an extractor over the default category list
    pub fn new(llm: L, config: ExtractorConfig) -> Self {
        Self {
            llm,
            config,
            categories: default_categories(),
        }
    }

    /// Replace the category list
    pub fn with_categories(mut self, categories: Vec<CategorySpec>) -> Self {
        self.categories = categories;
        self
    }

    /// Categories in request order
    pub fn categories(&self) -> &[CategorySpec] {
        &self.categories
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Label written to the `extraction_source` column
    pub fn extraction_source(&self) -> String {
        self.config
            .extraction_source
            .clone()
            .unwrap_or_else(|| self.llm.source_label())
    }

    fn check_text(&self, text: &str) -> Result<(), ExtractorError> {
        if text.trim().is_empty() {
            return Err(ExtractorError::EmptyInput);
        }
        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_text_length));
        }
        Ok(())
    }

    async fn call_llm(
        &self,
        request: &biofacts_domain::CompletionRequest,
    ) -> Result<String, ExtractorError> {
        self.llm
            .complete(request)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))
    }

    /// Extract facts for a single category
    ///
    /// Never fails: transport and format errors are logged and reported as
    /// [`CategoryOutcome::Failed`] with no facts.
    pub async fn extract_category(
        &self,
        text: &str,
        category: &CategorySpec,
    ) -> (Vec<FactRecord>, CategoryOutcome) {
        let request = PromptBuilder::new(text, category)
            .request(self.config.extraction_temperature, self.config.max_tokens);

        debug!("Prompt length for '{}': {} chars", category.name, request.user_content().len());

        let response = match self.call_llm(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error extracting facts for category {}: {}", category.name, e);
                return (Vec::new(), CategoryOutcome::Failed(FailureReason::Transport(e.to_string())));
            }
        };

        debug!("LLM response length: {} chars", response.len());

        match parse_fact_response(&response, &category.name) {
            Ok(facts) if facts.is_empty() => (facts, CategoryOutcome::Empty),
            Ok(facts) => {
                let count = facts.len();
                (facts, CategoryOutcome::Extracted(count))
            }
            Err(e) => {
                warn!("Error parsing facts for category {}: {}", category.name, e);
                (Vec::new(), CategoryOutcome::Failed(FailureReason::Format(e.to_string())))
            }
        }
    }

    /// Extract facts across every category
    ///
    /// Facts are concatenated in category order without deduplication.
    pub async fn extract_all(&self, text: &str) -> Result<ExtractionReport, ExtractorError> {
        self.check_text(text)?;

        let mut report = ExtractionReport::default();
        let delay = self.config.category_delay();

        for (idx, category) in self.categories.iter().enumerate() {
            if idx > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            info!(
                "Extracting facts for category: {} ({}/{})",
                category.name,
                idx + 1,
                self.categories.len()
            );

            let (facts, outcome) = self.extract_category(text, category).await;
            report.facts.extend(facts);
            report.categories.push(CategoryReport {
                category: category.name.clone(),
                outcome,
            });
        }

        info!(
            "Extraction complete: {} facts, {} of {} categories failed",
            report.facts.len(),
            report.failed_categories().count(),
            report.categories.len()
        );

        Ok(report)
    }

    /// Ask the model for conversation pairs built from a sample of `facts`
    pub async fn synthesize_training_pairs(
        &self,
        facts: &[FactRecord],
    ) -> Result<Vec<TrainingPair>, ExtractorError> {
        if facts.is_empty() {
            return Ok(Vec::new());
        }

        let request = SynthesisPromptBuilder::new(&self.config.subject, facts)
            .with_sample_size(self.config.synthesis_sample_size)
            .with_pair_range(self.config.min_pairs, self.config.max_pairs)
            .request(self.config.synthesis_temperature, self.config.max_tokens)?;

        let response = self.call_llm(&request).await?;
        let pairs = parse_training_pairs(&response)?;

        info!("Synthesized {} training pairs", pairs.len());
        Ok(pairs)
    }

    /// Build one instruction pair per fact, without calling the model
    pub fn derive_training_pairs(&self, facts: &[FactRecord]) -> Vec<TrainingPair> {
        facts
            .iter()
            .map(|fact| TrainingPair::from_fact(fact, &self.config.subject))
            .collect()
    }

    async fn training_pairs(&self, facts: &[FactRecord]) -> (Vec<TrainingPair>, PairOutcome) {
        match self.config.pair_source {
            PairSource::Synthesize => match self.synthesize_training_pairs(facts).await {
                Ok(pairs) => {
                    let count = pairs.len();
                    (pairs, PairOutcome::Synthesized(count))
                }
                Err(e) => {
                    warn!("Error generating training pairs: {}", e);
                    (Vec::new(), PairOutcome::Failed(e.to_string()))
                }
            },
            PairSource::Derive => {
                let pairs = self.derive_training_pairs(facts);
                let count = pairs.len();
                (pairs, PairOutcome::Derived(count))
            }
            PairSource::None => (Vec::new(), PairOutcome::Skipped),
        }
    }

    /// Run the full pipeline and write its artifacts
    ///
    /// With zero extracted facts nothing is written and the outcome carries
    /// empty fact and pair lists. Otherwise the fact table and summary are
    /// always written and the training file is written when there are pairs.
    pub async fn run(
        &self,
        text: &str,
        paths: &OutputPaths,
    ) -> Result<PipelineOutcome, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;

        info!("Starting biography information extraction ({} chars)", text.chars().count());
        let report = self.extract_all(text).await?;

        if report.facts.is_empty() {
            if report.all_failed() {
                warn!("Every category failed; check the API key and endpoint");
            } else {
                warn!("No facts were extracted");
            }
            return Ok(PipelineOutcome {
                facts: Vec::new(),
                training_pairs: Vec::new(),
                categories: report.categories,
                pairs: PairOutcome::Skipped,
                artifacts: None,
            });
        }

        let source = self.extraction_source();
        write_facts_csv(&paths.facts_csv, &report.facts, &source)?;

        let (training_pairs, pairs) = self.training_pairs(&report.facts).await;
        let training_jsonl = if training_pairs.is_empty() {
            None
        } else {
            write_training_jsonl(&paths.training_jsonl, &training_pairs)?;
            Some(paths.training_jsonl.clone())
        };

        let artifacts = WrittenArtifacts {
            facts_csv: paths.facts_csv.clone(),
            training_jsonl,
            summary_md: paths.summary_md.clone(),
        };

        SummaryReport::new(&self.config.subject, &report.facts, training_pairs.len())
            .with_extraction_source(source)
            .with_outcomes(&report.categories)
            .with_artifacts(&artifacts)
            .write(&paths.summary_md)?;

        Ok(PipelineOutcome {
            facts: report.facts,
            training_pairs,
            categories: report.categories,
            pairs,
            artifacts: Some(artifacts),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biofacts_llm::MockProvider;

    fn quiet_config() -> ExtractorConfig {
        ExtractorConfig {
            category_delay_ms: 0,
            ..ExtractorConfig::default()
        }
    }

    #[tokio::test]
    async fn test_extract_category_empty_array() {
        let extractor = FactExtractor::new(MockProvider::new("[]"), quiet_config());
        let category = CategorySpec::new("education", "schools");

        let (facts, outcome) = extractor.extract_category("Some text", &category).await;
        assert!(facts.is_empty());
        assert_eq!(outcome, CategoryOutcome::Empty);
    }

    #[tokio::test]
    async fn test_extract_category_transport_failure() {
        let mut llm = MockProvider::default();
        llm.add_error("category: education");
        let extractor = FactExtractor::new(llm, quiet_config());
        let category = CategorySpec::new("education", "schools");

        let (facts, outcome) = extractor.extract_category("Some text", &category).await;
        assert!(facts.is_empty());
        assert!(matches!(outcome, CategoryOutcome::Failed(FailureReason::Transport(_))));
    }

    #[tokio::test]
    async fn test_extract_category_format_failure() {
        let extractor = FactExtractor::new(MockProvider::new("I could not find anything."), quiet_config());
        let category = CategorySpec::new("education", "schools");

        let (_, outcome) = extractor.extract_category("Some text", &category).await;
        assert!(matches!(outcome, CategoryOutcome::Failed(FailureReason::Format(_))));
    }

    #[tokio::test]
    async fn test_extract_category_array_of_strings_is_format_failure() {
        let llm = MockProvider::new(r#"["Born in Taipei in 1978", "PhD from Stanford"]"#);
        let extractor = FactExtractor::new(llm, quiet_config());
        let category = CategorySpec::new("education", "schools");

        let (facts, outcome) = extractor.extract_category("Some text", &category).await;
        assert!(facts.is_empty());
        assert!(matches!(outcome, CategoryOutcome::Failed(FailureReason::Format(_))));
    }

    #[tokio::test]
    async fn test_extract_all_rejects_empty_text() {
        let extractor = FactExtractor::new(MockProvider::default(), quiet_config());
        let result = extractor.extract_all("   \n").await;
        assert!(matches!(result, Err(ExtractorError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_extract_all_text_too_long() {
        let config = ExtractorConfig {
            max_text_length: 10,
            ..quiet_config()
        };
        let llm = MockProvider::default();
        let extractor = FactExtractor::new(llm.clone(), config);

        let result = extractor.extract_all(&"a".repeat(11)).await;
        assert!(matches!(result, Err(ExtractorError::TextTooLong(11, 10))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_requests_use_configured_sampling() {
        let llm = MockProvider::default();
        let extractor = FactExtractor::new(llm.clone(), quiet_config())
            .with_categories(vec![CategorySpec::new("education", "schools")]);

        extractor.extract_all("bio").await.unwrap();

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.3);
        assert_eq!(requests[0].max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_synthesize_skips_call_without_facts() {
        let llm = MockProvider::default();
        let extractor = FactExtractor::new(llm.clone(), quiet_config());

        let pairs = extractor.synthesize_training_pairs(&[]).await.unwrap();
        assert!(pairs.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_extraction_source_override() {
        let extractor = FactExtractor::new(MockProvider::default(), quiet_config());
        assert_eq!(extractor.extraction_source(), "mock");

        let config = ExtractorConfig {
            extraction_source: Some("openai_gpt4".to_string()),
            ..quiet_config()
        };
        let extractor = FactExtractor::new(MockProvider::default(), config);
        assert_eq!(extractor.extraction_source(), "openai_gpt4");
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let config = ExtractorConfig {
            max_tokens: 0,
            ..quiet_config()
        };
        let extractor = FactExtractor::new(MockProvider::default(), config);
        let dir = tempfile::tempdir().unwrap();

        let result = extractor.run("bio", &OutputPaths::in_dir(dir.path())).await;
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
