//! Human-readable summary of an extraction run
//!
//! The report is markdown with fixed section headers so it can be diffed
//! between runs.

use crate::config::OutputPaths;
use crate::error::ExtractorError;
use crate::types::{CategoryOutcome, CategoryReport, WrittenArtifacts};
use biofacts_domain::category::title_case;
use biofacts_domain::{BandCounts, ConfidenceBand, FactRecord, Importance};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Number of high-confidence facts quoted in the report
pub const SAMPLE_FACT_COUNT: usize = 5;

/// Aggregate counts over a fact set
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Total number of facts
    pub total_facts: usize,

    /// Facts per category, sorted by name
    pub by_category: BTreeMap<String, usize>,

    /// Facts per confidence band
    pub confidence: BandCounts,

    /// Facts per importance level (all three levels always present)
    pub importance: BTreeMap<Importance, usize>,

    /// Facts marked verifiable
    pub verifiable: usize,

    /// Facts marked subjective / not verifiable
    pub unverifiable: usize,
}

impl SummaryStats {
    /// Compute statistics over `facts`
    pub fn from_facts(facts: &[FactRecord]) -> Self {
        let mut by_category = BTreeMap::new();
        let mut importance: BTreeMap<Importance, usize> =
            Importance::ALL.iter().map(|level| (*level, 0)).collect();
        let mut confidence = BandCounts::default();
        let mut verifiable = 0;

        for fact in facts {
            *by_category.entry(fact.category.clone()).or_insert(0) += 1;
            *importance.entry(fact.importance).or_insert(0) += 1;
            confidence.record(fact.band());
            if fact.verifiable {
                verifiable += 1;
            }
        }

        Self {
            total_facts: facts.len(),
            by_category,
            confidence,
            importance,
            verifiable,
            unverifiable: facts.len() - verifiable,
        }
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Markdown report over a finished extraction
pub struct SummaryReport<'a> {
    subject: &'a str,
    facts: &'a [FactRecord],
    training_pairs: usize,
    extraction_source: String,
    generated_at: String,
    outcomes: Option<&'a [CategoryReport]>,
    artifacts: Option<&'a WrittenArtifacts>,
}

impl<'a> SummaryReport<'a> {
    /// Create a report timestamped with the local time
    pub fn new(subject: &'a str, facts: &'a [FactRecord], training_pairs: usize) -> Self {
        Self {
            subject,
            facts,
            training_pairs,
            extraction_source: "LLM extraction".to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            outcomes: None,
            artifacts: None,
        }
    }

    /// Override the generation timestamp
    pub fn with_timestamp(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    /// Name the extraction method shown under "Extraction Results"
    pub fn with_extraction_source(mut self, source: impl Into<String>) -> Self {
        self.extraction_source = source.into();
        self
    }

    /// Include per-category outcomes
    pub fn with_outcomes(mut self, outcomes: &'a [CategoryReport]) -> Self {
        self.outcomes = Some(outcomes);
        self
    }

    /// List the files actually written under "Generated Files"
    ///
    /// Without this the default file names are listed, and the training file
    /// only when there are training pairs.
    pub fn with_artifacts(mut self, artifacts: &'a WrittenArtifacts) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Statistics the report is built from
    pub fn stats(&self) -> SummaryStats {
        SummaryStats::from_facts(self.facts)
    }

    /// Render the markdown document
    pub fn render(&self) -> String {
        let stats = self.stats();
        let total = stats.total_facts;
        let mut out: Vec<String> = Vec::new();

        out.push(format!("# {} - Biography Extraction Summary", self.subject));
        out.push(format!("*Generated on {}*\n", self.generated_at));

        out.push("## Extraction Results".to_string());
        out.push(format!("- **Total Facts Extracted:** {}", total));
        out.push(format!("- **Training Pairs Generated:** {}", self.training_pairs));
        out.push(format!("- **Extraction Method:** {}\n", self.extraction_source));

        out.push("## Facts by Category".to_string());
        for (category, count) in &stats.by_category {
            out.push(format!("- **{}:** {} facts", title_case(category), count));
        }
        out.push(String::new());

        out.push("## Quality Metrics".to_string());
        out.push("### Confidence Distribution".to_string());
        for band in ConfidenceBand::ALL {
            let count = stats.confidence.get(band);
            out.push(format!(
                "- **{} Confidence (≥{:.1}):** {} facts ({:.1}%)",
                title_case(band.as_str()),
                band.lower_bound(),
                count,
                percent(count, total)
            ));
        }
        out.push(String::new());

        out.push("### Importance Distribution".to_string());
        for (level, count) in &stats.importance {
            out.push(format!(
                "- **{} Importance:** {} facts ({:.1}%)",
                title_case(level.as_str()),
                count,
                percent(*count, total)
            ));
        }
        out.push(String::new());

        out.push("### Verifiability".to_string());
        out.push(format!(
            "- **Verifiable Facts:** {} ({:.1}%)",
            stats.verifiable,
            percent(stats.verifiable, total)
        ));
        out.push(format!(
            "- **Subjective/Opinion Facts:** {} ({:.1}%)\n",
            stats.unverifiable,
            percent(stats.unverifiable, total)
        ));

        if let Some(outcomes) = self.outcomes {
            out.push("## Category Outcomes".to_string());
            for report in outcomes {
                let status = match &report.outcome {
                    CategoryOutcome::Extracted(n) => format!("{} facts", n),
                    CategoryOutcome::Empty => "no facts found".to_string(),
                    CategoryOutcome::Failed(reason) => format!("FAILED ({})", reason),
                };
                out.push(format!("- **{}:** {}", title_case(&report.category), status));
            }
            out.push(String::new());
        }

        out.push("## Sample Extracted Facts".to_string());
        let samples = self
            .facts
            .iter()
            .filter(|f| f.band() == ConfidenceBand::High)
            .take(SAMPLE_FACT_COUNT);
        for (idx, fact) in samples.enumerate() {
            out.push(format!("**{}.** {}", idx + 1, fact.fact));
            out.push(format!("   - *Category:* {}", fact.category));
            out.push(format!("   - *Confidence:* {}", fact.confidence));
            out.push(String::new());
        }

        out.push("## Generated Files".to_string());
        let defaults = OutputPaths::in_dir("");
        let (facts_csv, training_jsonl, summary_md) = match self.artifacts {
            Some(written) => (
                written.facts_csv.as_path(),
                written.training_jsonl.as_deref(),
                written.summary_md.as_path(),
            ),
            None => (
                defaults.facts_csv.as_path(),
                (self.training_pairs > 0).then_some(defaults.training_jsonl.as_path()),
                defaults.summary_md.as_path(),
            ),
        };
        out.push(format!(
            "- **{}** - Structured facts in CSV format for analysis",
            file_name(facts_csv)
        ));
        if let Some(training_jsonl) = training_jsonl {
            out.push(format!(
                "- **{}** - Training pairs in JSONL format for fine-tuning",
                file_name(training_jsonl)
            ));
        }
        out.push(format!(
            "- **{}** - This analysis report\n",
            file_name(summary_md)
        ));

        out.push("## Recommendations for Fine-Tuning".to_string());
        out.push("1. **Review high-confidence facts** for accuracy before training".to_string());
        out.push("2. **Expand training pairs** with additional conversation scenarios".to_string());
        out.push(
            "3. **Balance fact types** - ensure mix of biographical and personality data".to_string(),
        );
        out.push("4. **Validate model responses** against extracted personality traits".to_string());
        out.push(format!(
            "5. **Consider temporal context** - {}'s views may have evolved over time",
            self.subject
        ));

        out.join("\n")
    }

    /// Render and write the report, replacing any existing file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ExtractorError> {
        let path = path.as_ref();
        std::fs::write(path, self.render())?;
        info!("Summary report saved to {}", path.display());
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
