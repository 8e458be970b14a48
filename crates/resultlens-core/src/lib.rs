//! resultlens-core — Result-analytics computation engine.
//!
//! Pure functions that turn per-learner examination results into descriptive
//! statistics, distribution summaries, correlation matrices, data-quality
//! scores and rule-based insights, plus the config, input and report layers
//! the CLI builds on.

pub mod config;
pub mod correlation;
pub mod distribution;
pub mod error;
pub mod input;
pub mod insights;
pub mod model;
pub mod quality;
pub mod report;
pub mod statistics;

pub use config::AnalyticsConfig;
pub use error::InputError;
pub use report::AnalyticsReport;
