//! Analytics report types with JSON persistence and markdown output.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::correlation::{correlation_matrix, rank_correlations, CorrelationMatrix, CorrelationRanking};
use crate::distribution::{analyze_distribution, DistributionAnalysis};
use crate::input::{numeric_field, numeric_records, RawRecord};
use crate::insights::{generate_insights, truncate_insights, Insight};
use crate::model::InsightSources;
use crate::quality::{score_data_quality, DataQualityMetrics};
use crate::statistics::{calculate_statistics, StatisticalMetrics};

/// A complete analytics report over one record batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub title: String,
    /// Record field the statistics and distribution describe.
    pub field: String,
    #[serde(default)]
    pub statistics: Option<StatisticalMetrics>,
    #[serde(default)]
    pub distribution: Option<DistributionAnalysis>,
    #[serde(default)]
    pub correlation: Option<CorrelationMatrix>,
    #[serde(default)]
    pub correlation_ranking: Option<CorrelationRanking>,
    #[serde(default)]
    pub quality: Option<DataQualityMetrics>,
    /// Most urgent first.
    #[serde(default)]
    pub insights: Vec<Insight>,
}

impl AnalyticsReport {
    /// An empty report stamped with a fresh id and the current time.
    pub fn new(title: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: title.into(),
            field: field.into(),
            statistics: None,
            distribution: None,
            correlation: None,
            correlation_ranking: None,
            quality: None,
            insights: Vec::new(),
        }
    }

    /// Run every analysis that has data and collect the results.
    ///
    /// A field with no numeric values leaves statistics and distribution
    /// unset; correlation is skipped when a configured variable is absent.
    pub fn compile(
        title: impl Into<String>,
        field: &str,
        records: &[RawRecord],
        sources: &InsightSources,
        config: &AnalyticsConfig,
    ) -> Result<Self> {
        let mut report = Self::new(title, field);

        match numeric_field(records, field) {
            Ok(values) => {
                report.statistics = Some(calculate_statistics(&values));
                report.distribution =
                    Some(analyze_distribution(&values, &config.distribution_options()));
            }
            Err(e) if e.is_empty_input() => {
                tracing::warn!(field, "no numeric values; skipping statistics");
            }
            Err(e) => return Err(e.into()),
        }

        if !records.is_empty() {
            match numeric_records(records, &config.correlation_variables) {
                Ok(projected) => {
                    let matrix = correlation_matrix(&projected, &config.correlation_variables);
                    report.correlation_ranking = Some(rank_correlations(&matrix));
                    report.correlation = Some(matrix);
                }
                Err(e) => tracing::warn!(error = %e, "skipping correlation"),
            }
            report.quality = Some(score_data_quality(records, &config.quality));
        }

        report.insights = truncate_insights(
            generate_insights(sources, &config.insights),
            config.max_insights,
        );
        Ok(report)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalyticsReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        let _ = writeln!(md, "# {}\n", self.title);
        let _ = writeln!(
            md,
            "Field `{}`, generated {}\n",
            self.field,
            self.created_at.format("%Y-%m-%d %H:%M UTC")
        );

        if let Some(s) = &self.statistics {
            md.push_str("## Statistics\n\n");
            md.push_str("| Metric | Value |\n");
            md.push_str("|--------|-------|\n");
            let mode = s.mode.map_or_else(|| "-".to_string(), |m| format!("{m:.1}"));
            let rows = [
                ("Count", s.count.to_string()),
                ("Mean", format!("{:.2}", s.mean)),
                ("Median", format!("{:.2}", s.median)),
                ("Mode", mode),
                ("Std. deviation", format!("{:.2}", s.standard_deviation)),
                ("Range", format!("{:.1} - {:.1}", s.range.min, s.range.max)),
                (
                    "IQR",
                    format!(
                        "{:.1} - {:.1}",
                        s.interquartile_range.q1, s.interquartile_range.q3
                    ),
                ),
                ("CV", format!("{:.1}%", s.coefficient_of_variation)),
                (
                    "Skewness",
                    format!("{:.3} ({})", s.skewness, s.shape().label()),
                ),
                ("Kurtosis", format!("{:.3}", s.kurtosis)),
                (
                    "95% CI",
                    format!(
                        "{:.2} - {:.2}",
                        s.confidence_interval.lower, s.confidence_interval.upper
                    ),
                ),
            ];
            for (label, value) in rows {
                let _ = writeln!(md, "| {label} | {value} |");
            }
            md.push('\n');
        }

        if let Some(d) = &self.distribution {
            md.push_str("## Distribution\n\n");
            md.push_str("| Range | Count | % | Cumulative % |\n");
            md.push_str("|-------|-------|---|--------------|\n");
            for bin in &d.histogram.bins {
                let _ = writeln!(
                    md,
                    "| {} | {} | {:.1} | {:.1} |",
                    bin.range_label, bin.count, bin.percentage, bin.cumulative_percentage
                );
            }
            let b = &d.box_plot;
            let _ = writeln!(
                md,
                "\nBox plot: min {:.1}, Q1 {:.1}, median {:.1}, Q3 {:.1}, max {:.1}, {} outlier(s)",
                b.min,
                b.q1,
                b.median,
                b.q3,
                b.max,
                b.outliers.len()
            );
            let _ = writeln!(
                md,
                "Bands: {} low, {} medium, {} high\n",
                d.bands.low, d.bands.medium, d.bands.high
            );
        }

        if let Some(c) = self.correlation.as_ref().filter(|c| !c.is_empty()) {
            md.push_str("## Correlation\n\n");
            let _ = writeln!(md, "| | {} |", c.variables.join(" | "));
            let _ = writeln!(md, "|---|{}", "---|".repeat(c.len()));
            for (name, row) in c.variables.iter().zip(&c.matrix) {
                let cells: Vec<String> = row.iter().map(|r| format!("{r:.2}")).collect();
                let _ = writeln!(md, "| {name} | {} |", cells.join(" | "));
            }
            md.push('\n');
        }

        if let Some(q) = &self.quality {
            md.push_str("## Data Quality\n\n");
            let _ = writeln!(
                md,
                "**Overall:** {} ({:?}) over {} records\n",
                q.overall_score(),
                q.grade(),
                q.total_records
            );
            let _ = writeln!(
                md,
                "Completeness {}, accuracy {}, consistency {}\n",
                q.data_completeness, q.data_accuracy, q.data_consistency
            );
            for m in &q.missing_values {
                let _ = writeln!(
                    md,
                    "- {}: {} missing ({:.1}%, {})",
                    m.field, m.count, m.percentage, m.severity.label()
                );
            }
            for o in &q.outliers {
                let _ = writeln!(md, "- {}: {} outlier(s). {}", o.field, o.count, o.description);
            }
            md.push('\n');
        }

        if !self.insights.is_empty() {
            md.push_str("## Insights\n\n");
            for i in &self.insights {
                let _ = writeln!(
                    md,
                    "- **[{}] {}**: {}",
                    i.priority.label(),
                    i.title,
                    i.description
                );
                if let Some(rec) = &i.recommendation {
                    let _ = writeln!(md, "  - {rec}");
                }
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_records_str;
    use crate::model::{CollegeDashboard, CollegeSummary};
    use std::path::PathBuf;

    fn records() -> Vec<RawRecord> {
        let json = r#"[
            {"student_id": "S1", "percentage": 40, "cgpa": 4.1, "program_id": "P", "semester": 1, "gender": "F"},
            {"student_id": "S2", "percentage": 50, "cgpa": 5.0, "program_id": "P", "semester": 1, "gender": "M"},
            {"student_id": "S3", "percentage": 60, "cgpa": 6.2, "program_id": "P", "semester": 1, "gender": "F"},
            {"student_id": "S4", "percentage": 70, "cgpa": 6.9, "program_id": "P", "semester": 1},
            {"student_id": "S5", "percentage": 80, "cgpa": 8.1, "program_id": "P", "semester": 1, "gender": "M"},
            {"student_id": "S6", "percentage": 90, "cgpa": 9.0, "program_id": "P", "semester": 1, "gender": "F"}
        ]"#;
        parse_records_str(json, &PathBuf::from("records.json")).unwrap()
    }

    fn low_pass_sources() -> InsightSources {
        InsightSources {
            college: Some(CollegeDashboard {
                summary: Some(CollegeSummary {
                    pass_percentage: Some(65.0),
                    total_students_appeared: 6,
                    ..Default::default()
                }),
                trends: vec![],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn compile_runs_every_analysis() {
        let report = AnalyticsReport::compile(
            "Semester 1",
            "percentage",
            &records(),
            &low_pass_sources(),
            &AnalyticsConfig::default(),
        )
        .unwrap();

        let stats = report.statistics.as_ref().unwrap();
        assert_eq!(stats.count, 6);
        assert!((stats.mean - 65.0).abs() < 1e-9);
        assert_eq!(report.distribution.as_ref().unwrap().histogram.count, 6);

        let matrix = report.correlation.as_ref().unwrap();
        assert_eq!(matrix.variables, vec!["percentage", "cgpa"]);
        assert!(matrix.get("percentage", "cgpa").unwrap() > 0.99);
        assert_eq!(report.correlation_ranking.as_ref().unwrap().pairs.len(), 1);

        let quality = report.quality.as_ref().unwrap();
        assert_eq!(quality.missing_values.len(), 1);
        assert_eq!(quality.missing_values[0].field, "Gender");

        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].id, "low-pass-rate");
    }

    #[test]
    fn compile_tolerates_missing_field_and_variable() {
        let mut config = AnalyticsConfig::default();
        config.correlation_variables = vec!["percentage".into(), "attendance".into()];
        let report = AnalyticsReport::compile(
            "Sparse",
            "attendance",
            &records(),
            &InsightSources::default(),
            &config,
        )
        .unwrap();
        assert!(report.statistics.is_none());
        assert!(report.distribution.is_none());
        assert!(report.correlation.is_none());
        assert!(report.quality.is_some());
        assert!(report.insights.is_empty());
    }

    #[test]
    fn compile_with_no_records() {
        let report = AnalyticsReport::compile(
            "Empty",
            "percentage",
            &[],
            &InsightSources::default(),
            &AnalyticsConfig::default(),
        )
        .unwrap();
        assert!(report.statistics.is_none());
        assert!(report.correlation.is_none());
        assert!(report.quality.is_none());
    }

    #[test]
    fn json_roundtrip() {
        let report = AnalyticsReport::compile(
            "Semester 1",
            "percentage",
            &records(),
            &low_pass_sources(),
            &AnalyticsConfig::default(),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = AnalyticsReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.statistics, report.statistics);
        assert_eq!(loaded.insights, report.insights);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"correlationRanking\""));
    }

    #[test]
    fn save_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = AnalyticsReport::new("Blocked", "percentage")
            .save_json(&blocker.join("report.json"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to create directory"));
    }

    #[test]
    fn markdown_output() {
        let report = AnalyticsReport::compile(
            "Semester 1",
            "percentage",
            &records(),
            &low_pass_sources(),
            &AnalyticsConfig::default(),
        )
        .unwrap();
        let md = report.to_markdown();
        assert!(md.starts_with("# Semester 1"));
        assert!(md.contains("## Statistics"));
        assert!(md.contains("| Mean | 65.00 |"));
        assert!(md.contains("## Correlation"));
        assert!(md.contains("## Data Quality"));
        assert!(md.contains("[high] Pass Rate Below Target"));
    }

    #[test]
    fn markdown_for_empty_report() {
        let md = AnalyticsReport::new("Nothing", "percentage").to_markdown();
        assert!(md.contains("# Nothing"));
        assert!(!md.contains("## Statistics"));
        assert!(!md.contains("## Insights"));
    }
}
