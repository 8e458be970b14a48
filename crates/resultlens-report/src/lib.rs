//! resultlens-report — HTML rendering of analytics reports.
//!
//! JSON and markdown output live on [`resultlens_core::report::AnalyticsReport`];
//! this crate adds the self-contained HTML page.

pub mod html;

pub use html::{generate_html, write_html_report, HtmlOptions};
