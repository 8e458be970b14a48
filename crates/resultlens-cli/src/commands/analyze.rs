//! The `resultlens analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use resultlens_core::config::load_config_from;
use resultlens_core::distribution::{analyze_distribution, DistributionAnalysis};
use resultlens_core::input::{load_records, numeric_field};
use resultlens_core::statistics::{calculate_statistics, StatisticalMetrics};

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    field: &'a str,
    statistics: &'a StatisticalMetrics,
    distribution: &'a DistributionAnalysis,
}

pub fn execute(
    input: PathBuf,
    field: String,
    bins: Option<usize>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let records = load_records(&input)?;
    let values = numeric_field(&records, &field)?;

    let mut options = config.distribution_options();
    if let Some(bins) = bins {
        options.bins = bins;
    }

    let statistics = calculate_statistics(&values);
    let distribution = analyze_distribution(&values, &options);

    match format.as_str() {
        "json" => {
            let output = AnalyzeOutput {
                field: &field,
                statistics: &statistics,
                distribution: &distribution,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("{field}: {} values\n", statistics.count);
            print_statistics(&statistics);
            print_histogram(&distribution);

            let b = &distribution.box_plot;
            println!(
                "\nBox plot: {:.1} | {:.1} [{:.1}] {:.1} | {:.1}",
                b.min, b.q1, b.median, b.q3, b.max
            );
            if !b.outliers.is_empty() {
                let listed: Vec<String> = b.outliers.iter().map(|o| format!("{o}")).collect();
                println!("Outliers: {}", listed.join(", "));
            }
            println!(
                "Bands: {} low, {} medium, {} high",
                distribution.bands.low, distribution.bands.medium, distribution.bands.high
            );
        }
    }

    Ok(())
}

fn print_statistics(s: &StatisticalMetrics) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);

    let mode = s.mode.map_or_else(|| "-".to_string(), |m| format!("{m:.1}"));
    let rows = [
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
        ("Skewness", format!("{:.3} ({})", s.skewness, s.shape().label())),
        ("Kurtosis", format!("{:.3}", s.kurtosis)),
        (
            "95% CI",
            format!(
                "{:.2} - {:.2}",
                s.confidence_interval.lower, s.confidence_interval.upper
            ),
        ),
        (
            "P10/P50/P90",
            format!(
                "{:.1} / {:.1} / {:.1}",
                s.percentiles.p10, s.percentiles.p50, s.percentiles.p90
            ),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    println!("{table}");
}

fn print_histogram(d: &DistributionAnalysis) {
    let mut table = Table::new();
    table.set_header(vec!["Range", "Count", "%", "Cumulative %"]);

    for bin in &d.histogram.bins {
        table.add_row(vec![
            Cell::new(&bin.range_label),
            Cell::new(bin.count),
            Cell::new(format!("{:.1}", bin.percentage)),
            Cell::new(format!("{:.1}", bin.cumulative_percentage)),
        ]);
    }

    println!("\n{table}");
}
