//! Output formatting for the CLI.

use biofacts_domain::{CategorySpec, ConfidenceBand};
use biofacts_extractor::{
    CategoryOutcome, CategoryReport, PairOutcome, SummaryStats, WrittenArtifacts,
};
use colored::{Color, Colorize};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format per-category outcomes as a table.
    pub fn outcome_table(&self, reports: &[CategoryReport]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Category", "Facts", "Status"]);

        for report in reports {
            let status = match &report.outcome {
                CategoryOutcome::Extracted(_) => self.colorize("extracted", Color::Green),
                CategoryOutcome::Empty => self.colorize("empty", Color::Yellow),
                CategoryOutcome::Failed(reason) => {
                    self.colorize(&format!("failed ({})", reason), Color::Red)
                }
            };
            builder.push_record([
                report.category.clone(),
                report.outcome.fact_count().to_string(),
                status,
            ]);
        }

        Self::finish(builder)
    }

    /// Format the category list as a table.
    pub fn categories_table(&self, categories: &[CategorySpec]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["#", "Name", "Title"]);

        for (idx, category) in categories.iter().enumerate() {
            builder.push_record([(idx + 1).to_string(), category.name.clone(), category.title()]);
        }

        Self::finish(builder)
    }

    /// Format fact-table statistics as a table.
    pub fn stats_table(&self, stats: &SummaryStats) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Count"]);

        builder.push_record(["Total facts".to_string(), stats.total_facts.to_string()]);
        for (category, count) in &stats.by_category {
            builder.push_record([format!("  {}", category), count.to_string()]);
        }
        for band in ConfidenceBand::ALL {
            builder.push_record([
                format!("{} confidence", band.as_str()),
                stats.confidence.get(band).to_string(),
            ]);
        }
        builder.push_record(["Verifiable".to_string(), stats.verifiable.to_string()]);
        builder.push_record(["Subjective".to_string(), stats.unverifiable.to_string()]);

        Self::finish(builder)
    }

    /// Describe how the training-pair step ended.
    pub fn pair_outcome(&self, outcome: &PairOutcome) -> String {
        match outcome {
            PairOutcome::Synthesized(n) => self.success(&format!("Synthesized {} training pair(s)", n)),
            PairOutcome::Derived(n) => self.success(&format!("Derived {} training pair(s)", n)),
            PairOutcome::Skipped => self.info("Training pairs skipped"),
            PairOutcome::Failed(reason) => {
                self.warning(&format!("Training pair generation failed: {}", reason))
            }
        }
    }

    /// List the files a run wrote.
    pub fn artifacts(&self, artifacts: &WrittenArtifacts) -> String {
        let mut lines = vec![self.success("Generated files:")];
        lines.push(format!("  {}", artifacts.facts_csv.display()));
        if let Some(jsonl) = &artifacts.training_jsonl {
            lines.push(format!("  {}", jsonl.display()));
        }
        lines.push(format!("  {}", artifacts.summary_md.display()));
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Color::Red)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Color::Yellow)
    }

    fn finish(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biofacts_domain::{default_categories, FactRecord, Importance};
    use biofacts_extractor::FailureReason;
    use std::path::PathBuf;

    fn reports() -> Vec<CategoryReport> {
        vec![
            CategoryReport {
                category: "education".to_string(),
                outcome: CategoryOutcome::Extracted(4),
            },
            CategoryReport {
                category: "health_wellness".to_string(),
                outcome: CategoryOutcome::Empty,
            },
            CategoryReport {
                category: "relationships".to_string(),
                outcome: CategoryOutcome::Failed(FailureReason::Transport("timeout".to_string())),
            },
        ]
    }

    #[test]
    fn test_outcome_table() {
        let output = Formatter::new(false).outcome_table(&reports());
        assert!(output.contains("education"));
        assert!(output.contains("extracted"));
        assert!(output.contains("empty"));
        assert!(output.contains("failed (transport: timeout)"));
    }

    #[test]
    fn test_categories_table_lists_all() {
        let categories = default_categories();
        let output = Formatter::new(false).categories_table(&categories);
        for category in &categories {
            assert!(output.contains(&category.name));
        }
        assert!(output.contains("Personal Demographics"));
    }

    #[test]
    fn test_stats_table() {
        let facts = vec![
            FactRecord::new("education", "PhD", 0.9, "", Importance::High, true),
            FactRecord::new("education", "BSc", 0.4, "", Importance::Low, false),
        ];
        let output = Formatter::new(false).stats_table(&SummaryStats::from_facts(&facts));
        assert!(output.contains("Total facts"));
        assert!(output.contains("education"));
    }

    #[test]
    fn test_artifacts_without_training_file() {
        let artifacts = WrittenArtifacts {
            facts_csv: PathBuf::from("out/bio.csv"),
            training_jsonl: None,
            summary_md: PathBuf::from("out/bio_extraction_summary.md"),
        };
        let output = Formatter::new(false).artifacts(&artifacts);
        assert!(output.contains("out/bio.csv"));
        assert!(!output.contains("jsonl"));
    }

    #[test]
    fn test_no_color_is_plain() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("bad"), "✗ bad");
        assert_eq!(
            formatter.pair_outcome(&PairOutcome::Skipped),
            "ℹ Training pairs skipped"
        );
    }
}
