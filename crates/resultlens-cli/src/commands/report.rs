//! The `resultlens report` command.

use std::path::PathBuf;

use anyhow::Result;

use resultlens_core::config::load_config_from;
use resultlens_core::input::load_records;
use resultlens_core::report::AnalyticsReport;
use resultlens_report::html::{write_html_report_with, HtmlOptions};

use super::insights::SourcePaths;

pub fn execute(
    input: PathBuf,
    field: String,
    title: Option<String>,
    sources: SourcePaths,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let records = load_records(&input)?;
    let sources = sources.load()?;

    let title = title.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "results".to_string());
        format!("Result analytics: {stem}")
    });

    let report = AnalyticsReport::compile(title, &field, &records, &sources, &config)?;

    if let Some(stats) = &report.statistics {
        eprintln!(
            "{}: {} values, mean {:.2}, median {:.2}",
            field, stats.count, stats.mean, stats.median
        );
    }
    if let Some(q) = &report.quality {
        eprintln!("Data quality: {} / 100", q.overall_score());
    }
    eprintln!("{} insight(s)", report.insights.len());

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                let options = HtmlOptions {
                    bands: config.bands,
                    ..HtmlOptions::default()
                };
                write_html_report_with(&report, &options, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("report-{timestamp}.md"));
                std::fs::write(&path, report.to_markdown())?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                tracing::warn!(format = %fmt, "unknown report format, skipping");
            }
        }
    }

    Ok(())
}
