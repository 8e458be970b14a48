//! resultlens CLI — analytics commands over exported result files.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "resultlens", version, about = "Examination result analytics")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Descriptive statistics and distribution of one numeric field
    Analyze {
        /// JSON file with result records
        #[arg(long)]
        input: PathBuf,

        /// Record field to analyze
        #[arg(long, default_value = "percentage")]
        field: String,

        /// Histogram bins (overrides config)
        #[arg(long)]
        bins: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Correlation matrix across numeric fields
    Correlate {
        /// JSON file with result records
        #[arg(long)]
        input: PathBuf,

        /// Fields to correlate (comma-separated, default from config)
        #[arg(long)]
        variables: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Data-quality scores for a record file
    Quality {
        /// JSON file with result records
        #[arg(long)]
        input: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Rule-based insights from dashboard summaries
    Insights {
        /// College dashboard JSON
        #[arg(long)]
        college: Option<PathBuf>,

        /// Program dashboard JSON
        #[arg(long)]
        programs: Option<PathBuf>,

        /// Subject dashboard JSON
        #[arg(long)]
        subjects: Option<PathBuf>,

        /// Maximum insights to show (overrides config)
        #[arg(long)]
        max: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Full analytics report written to disk
    Report {
        /// JSON file with result records
        #[arg(long)]
        input: PathBuf,

        /// Record field to analyze
        #[arg(long, default_value = "percentage")]
        field: String,

        /// Report title (default: derived from the input file name)
        #[arg(long)]
        title: Option<String>,

        /// College dashboard JSON
        #[arg(long)]
        college: Option<PathBuf>,

        /// Program dashboard JSON
        #[arg(long)]
        programs: Option<PathBuf>,

        /// Subject dashboard JSON
        #[arg(long)]
        subjects: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all (comma-separated)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Create a starter config file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("resultlens=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Analyze {
            input,
            field,
            bins,
            format,
        } => commands::analyze::execute(input, field, bins, format, config),
        Commands::Correlate {
            input,
            variables,
            format,
        } => commands::correlate::execute(input, variables, format, config),
        Commands::Quality { input, format } => commands::quality::execute(input, format, config),
        Commands::Insights {
            college,
            programs,
            subjects,
            max,
            format,
        } => commands::insights::execute(
            commands::insights::SourcePaths {
                college,
                programs,
                subjects,
            },
            max,
            format,
            config,
        ),
        Commands::Report {
            input,
            field,
            title,
            college,
            programs,
            subjects,
            output,
            format,
        } => commands::report::execute(
            input,
            field,
            title,
            commands::insights::SourcePaths {
                college,
                programs,
                subjects,
            },
            output,
            format,
            config,
        ),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
