//! The `resultlens insights` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::de::DeserializeOwned;

use resultlens_core::config::load_config_from;
use resultlens_core::input::load_json_file;
use resultlens_core::insights::{generate_insights, truncate_insights, Insight};
use resultlens_core::model::InsightSources;

/// Dashboard summary files given on the command line.
pub struct SourcePaths {
    pub college: Option<PathBuf>,
    pub programs: Option<PathBuf>,
    pub subjects: Option<PathBuf>,
}

impl SourcePaths {
    pub fn is_empty(&self) -> bool {
        self.college.is_none() && self.programs.is_none() && self.subjects.is_none()
    }

    /// Load every given summary file.
    pub fn load(&self) -> Result<InsightSources> {
        Ok(InsightSources {
            college: load_optional(self.college.as_deref())?,
            programs: load_optional(self.programs.as_deref())?,
            subjects: load_optional(self.subjects.as_deref())?,
        })
    }
}

fn load_optional<T: DeserializeOwned>(path: Option<&Path>) -> Result<Option<T>> {
    path.map(load_json_file::<T>).transpose()
}

pub fn execute(
    paths: SourcePaths,
    max: Option<usize>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if paths.is_empty() {
        anyhow::bail!("at least one of --college, --programs or --subjects is required");
    }

    let config = load_config_from(config_path.as_deref())?;
    let sources = paths.load()?;
    let insights = truncate_insights(
        generate_insights(&sources, &config.insights),
        max.unwrap_or(config.max_insights),
    );

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&insights)?);
        }
        _ => print_insights(&insights),
    }

    Ok(())
}

fn print_insights(insights: &[Insight]) {
    if insights.is_empty() {
        println!("No insights. Results are within expected ranges.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Priority", "Title", "Metric"]);
    for i in insights {
        let metric = i
            .metric
            .as_ref()
            .map(|m| format!("{}: {}{}", m.label, m.value, m.unit.as_deref().unwrap_or("")))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(i.priority.label()),
            Cell::new(&i.title),
            Cell::new(metric),
        ]);
    }
    println!("{table}");

    for i in insights {
        println!("\n{}: {}", i.title, i.description);
        if let Some(rec) = &i.recommendation {
            println!("  -> {rec}");
        }
    }
}
