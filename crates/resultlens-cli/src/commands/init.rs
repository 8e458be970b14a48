//! The `resultlens init` command.

use std::path::Path;

use anyhow::{Context, Result};

use resultlens_core::config::{AnalyticsConfig, CONFIG_FILE_NAME};

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
        return Ok(());
    }

    let body = AnalyticsConfig::default().to_toml()?;
    std::fs::write(CONFIG_FILE_NAME, format!("{HEADER}{body}"))
        .with_context(|| format!("failed to write {CONFIG_FILE_NAME}"))?;
    println!("Created {CONFIG_FILE_NAME}");

    println!("\nNext steps:");
    println!("  1. Export result records from the results API as JSON");
    println!("  2. Run: resultlens analyze --input results.json --field percentage");
    println!("  3. Run: resultlens report --input results.json --format all");

    Ok(())
}

const HEADER: &str = "# resultlens configuration\n\
# Environment overrides: RESULTLENS_BINS, RESULTLENS_MAX_INSIGHTS\n\n";
