//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use biofacts_domain::LlmProvider;
use biofacts_extractor::{ExtractorConfig, FactExtractor, OutputPaths, PipelineOutcome};
use biofacts_llm::openai::DEFAULT_MODEL;
use biofacts_llm::OpenAiProvider;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    mut config: ExtractorConfig,
    formatter: &Formatter,
) -> Result<PipelineOutcome> {
    let text = read_biography(&args.input)?;

    apply_overrides(&args, &mut config);
    config.validate().map_err(CliError::Config)?;

    let api_key = args
        .api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            CliError::Config("No API key: pass --api-key or set OPENAI_API_KEY".to_string())
        })?;
    let model = args.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let mut provider = OpenAiProvider::new(api_key, model)?;
    if let Some(endpoint) = args.endpoint {
        provider = provider.with_endpoint(endpoint);
    }
    if let Some(max_attempts) = args.max_attempts {
        provider = provider.with_max_attempts(max_attempts);
    }

    fs::create_dir_all(&args.output_dir)?;
    let paths = OutputPaths::in_dir(&args.output_dir);
    let extractor = FactExtractor::new(provider, config);

    run_pipeline(&extractor, &text, &paths, formatter).await
}

/// Run the pipeline with any provider and print the results.
pub async fn run_pipeline<L>(
    extractor: &FactExtractor<L>,
    text: &str,
    paths: &OutputPaths,
    formatter: &Formatter,
) -> Result<PipelineOutcome>
where
    L: LlmProvider,
    L::Error: Display,
{
    info!("Extracting with source '{}'", extractor.extraction_source());
    let outcome = extractor.run(text, paths).await?;

    println!("{}", formatter.outcome_table(&outcome.categories));

    match &outcome.artifacts {
        Some(artifacts) => {
            println!(
                "{}",
                formatter.success(&format!("Extracted {} facts", outcome.facts.len()))
            );
            println!("{}", formatter.pair_outcome(&outcome.pairs));
            println!("{}", formatter.artifacts(artifacts));
        }
        None if !outcome.categories.is_empty()
            && outcome.categories.iter().all(|c| c.outcome.is_failure()) =>
        {
            println!(
                "{}",
                formatter.warning("Every category failed; no files were written")
            );
        }
        None => {
            println!("{}", formatter.warning("No facts extracted; no files were written"));
        }
    }

    Ok(outcome)
}

/// Read the biography, reporting a missing file as invalid input.
pub fn read_biography(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(CliError::InvalidInput(format!(
            "Biography file not found: {}",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)?;
    info!("Loaded biography from {} ({} chars)", path.display(), text.chars().count());
    Ok(text)
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_overrides(args: &ExtractArgs, config: &mut ExtractorConfig) {
    if let Some(subject) = &args.subject {
        config.subject = subject.clone();
    }
    if let Some(delay_ms) = args.delay_ms {
        config.category_delay_ms = delay_ms;
    }
    if let Some(pairs) = args.pairs {
        config.pair_source = pairs.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PairsArg;
    use biofacts_extractor::PairSource;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(input: PathBuf) -> ExtractArgs {
        ExtractArgs {
            input,
            output_dir: PathBuf::from("."),
            model: None,
            endpoint: None,
            api_key: None,
            delay_ms: None,
            pairs: None,
            subject: None,
            max_attempts: None,
        }
    }

    #[test]
    fn test_read_missing_biography() {
        let dir = tempdir().unwrap();
        let result = read_biography(&dir.path().join("bio_marcus_chen.md"));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_overrides() {
        let mut extract_args = args(PathBuf::from("bio.md"));
        extract_args.subject = Some("Ada Lovelace".to_string());
        extract_args.delay_ms = Some(0);
        extract_args.pairs = Some(PairsArg::None);

        let mut config = ExtractorConfig::default();
        apply_overrides(&extract_args, &mut config);
        assert_eq!(config.subject, "Ada Lovelace");
        assert_eq!(config.category_delay_ms, 0);
        assert_eq!(config.pair_source, PairSource::None);
    }

    #[test]
    fn test_overrides_keep_config_values() {
        let mut config = ExtractorConfig {
            category_delay_ms: 250,
            ..ExtractorConfig::default()
        };
        apply_overrides(&args(PathBuf::from("bio.md")), &mut config);
        assert_eq!(config.category_delay_ms, 250);
        assert_eq!(config.pair_source, PairSource::Synthesize);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bio.md");
        fs::write(&input, "Marcus Chen was born in Taipei.").unwrap();

        let mut extract_args = args(input);
        extract_args.api_key = Some("  ".to_string());
        extract_args.output_dir = dir.path().join("out");

        let result =
            execute_extract(extract_args, ExtractorConfig::default(), &Formatter::new(false)).await;
        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(!dir.path().join("out").exists());
    }
}
