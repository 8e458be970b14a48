//! The `resultlens correlate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use resultlens_core::config::load_config_from;
use resultlens_core::correlation::{
    correlation_matrix, rank_correlations, CorrelationMatrix, CorrelationRanking,
};
use resultlens_core::input::{load_records, numeric_records};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CorrelateOutput<'a> {
    correlation: &'a CorrelationMatrix,
    ranking: &'a CorrelationRanking,
}

pub fn execute(
    input: PathBuf,
    variables: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let variables: Vec<String> = match variables {
        Some(list) => list
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
        None => config.correlation_variables.clone(),
    };
    if variables.len() < 2 {
        anyhow::bail!("need at least two variables to correlate");
    }

    let records = load_records(&input)?;
    let projected = numeric_records(&records, &variables)?;
    let matrix = correlation_matrix(&projected, &variables);
    let ranking = rank_correlations(&matrix);

    match format.as_str() {
        "json" => {
            let output = CorrelateOutput {
                correlation: &matrix,
                ranking: &ranking,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            let mut table = Table::new();
            let mut header = vec![String::new()];
            header.extend(matrix.variables.iter().cloned());
            table.set_header(header);
            for (name, row) in matrix.variables.iter().zip(&matrix.matrix) {
                let mut cells = vec![Cell::new(name)];
                cells.extend(row.iter().map(|r| Cell::new(format!("{r:.2}"))));
                table.add_row(cells);
            }
            println!("{table}");

            if !ranking.pairs.is_empty() {
                println!("\nStrongest pairs:");
                for p in ranking.pairs.iter().take(5) {
                    println!(
                        "  {} / {}: {:+.2} ({})",
                        p.first,
                        p.second,
                        p.value,
                        p.strength.label()
                    );
                }
            }
        }
    }

    Ok(())
}
