//! Report command implementation.

use crate::cli::ReportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use biofacts_extractor::{
    read_fact_table, ExtractorConfig, SummaryReport, WrittenArtifacts, DEFAULT_SUMMARY_FILE,
};
use std::path::PathBuf;

/// Execute the report command.
///
/// Rebuilds the markdown summary from an existing fact table. The training
/// pair count is not recorded in the table, so the report shows zero.
pub fn execute_report(
    args: ReportArgs,
    config: &ExtractorConfig,
    formatter: &Formatter,
) -> Result<PathBuf> {
    if !args.facts.is_file() {
        return Err(CliError::InvalidInput(format!(
            "Fact table not found: {}",
            args.facts.display()
        )));
    }

    let table = read_fact_table(&args.facts)?;
    let subject = args.subject.as_deref().unwrap_or(&config.subject);
    let summary_md = args.output.unwrap_or_else(|| {
        args.facts
            .parent()
            .map(|dir| dir.join(DEFAULT_SUMMARY_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SUMMARY_FILE))
    });
    let artifacts = WrittenArtifacts {
        facts_csv: args.facts,
        training_jsonl: None,
        summary_md,
    };

    let mut report = SummaryReport::new(subject, &table.facts, 0).with_artifacts(&artifacts);
    if let Some(source) = &table.extraction_source {
        report = report.with_extraction_source(source.clone());
    }
    report.write(&artifacts.summary_md)?;

    println!("{}", formatter.stats_table(&report.stats()));
    println!(
        "{}",
        formatter.success(&format!("Report written to {}", artifacts.summary_md.display()))
    );
    Ok(artifacts.summary_md.clone())
}
