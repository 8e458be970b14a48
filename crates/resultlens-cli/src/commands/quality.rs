//! The `resultlens quality` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use resultlens_core::config::load_config_from;
use resultlens_core::input::load_records;
use resultlens_core::quality::score_data_quality;

pub fn execute(input: PathBuf, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let records = load_records(&input)?;
    let metrics = score_data_quality(&records, &config.quality);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
        _ => {
            println!(
                "Data quality: {} / 100 ({:?}) over {} records",
                metrics.overall_score(),
                metrics.grade(),
                metrics.total_records
            );

            let mut table = Table::new();
            table.set_header(vec!["Completeness", "Accuracy", "Consistency"]);
            table.add_row(vec![
                Cell::new(format!("{}%", metrics.data_completeness)),
                Cell::new(format!("{}%", metrics.data_accuracy)),
                Cell::new(format!("{}%", metrics.data_consistency)),
            ]);
            println!("{table}");

            if !metrics.missing_values.is_empty() {
                let mut table = Table::new();
                table.set_header(vec!["Field", "Missing", "%", "Severity"]);
                for m in &metrics.missing_values {
                    table.add_row(vec![
                        Cell::new(&m.field),
                        Cell::new(m.count),
                        Cell::new(format!("{:.1}", m.percentage)),
                        Cell::new(m.severity.label()),
                    ]);
                }
                println!("\n{table}");
            }

            for o in &metrics.outliers {
                println!("{}: {} outlier(s). {}", o.field, o.count, o.description);
            }

            let critical = metrics.critical_issues().count();
            if critical > 0 {
                println!("\n{critical} field(s) with high-severity gaps");
            }
        }
    }

    Ok(())
}
