//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined and SVG charts.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use resultlens_core::correlation::{ColorScale, CorrelationMatrix};
use resultlens_core::distribution::{BandThresholds, DistributionAnalysis, PerformanceBand};
use resultlens_core::insights::{Insight, InsightType};
use resultlens_core::quality::{DataQualityMetrics, QualityGrade};
use resultlens_core::report::AnalyticsReport;
use resultlens_core::statistics::StatisticalMetrics;

/// Rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOptions {
    /// Band boundaries used to color histogram bars.
    pub bands: BandThresholds,
    pub color_scale: ColorScale,
}

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report with default options.
pub fn generate_html(report: &AnalyticsReport) -> String {
    generate_html_with(report, &HtmlOptions::default())
}

/// Generate an HTML report from an analytics report.
pub fn generate_html_with(report: &AnalyticsReport, options: &HtmlOptions) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>resultlens report: {}</title>",
        html_escape(&report.title)
    );
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    let _ = writeln!(html, "<h1>{}</h1>", html_escape(&report.title));
    let _ = writeln!(
        html,
        "<p class=\"meta\">Field <strong>{}</strong> | {}</p>",
        html_escape(&report.field),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    html.push_str("</header>\n");

    if let Some(stats) = &report.statistics {
        html.push_str(&statistics_section(stats));
    }
    if let Some(dist) = &report.distribution {
        html.push_str(&distribution_section(dist, &options.bands));
    }
    if let Some(matrix) = report.correlation.as_ref().filter(|m| !m.is_empty()) {
        html.push_str(&heatmap_section(matrix, options.color_scale));
    }
    if let Some(quality) = &report.quality {
        html.push_str(&quality_section(quality));
    }
    if !report.insights.is_empty() {
        html.push_str(&insights_section(&report.insights));
    }

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AnalyticsReport, path: &Path) -> Result<()> {
    write_html_report_with(report, &HtmlOptions::default(), path)
}

/// Write an HTML report to a file with explicit options.
pub fn write_html_report_with(
    report: &AnalyticsReport,
    options: &HtmlOptions,
    path: &Path,
) -> Result<()> {
    let html = generate_html_with(report, options);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn statistics_section(s: &StatisticalMetrics) -> String {
    let mut out = String::from("<section class=\"statistics\">\n<h2>Statistics</h2>\n");
    out.push_str("<table class=\"summary\">\n<tbody>\n");
    let mode = s.mode.map_or_else(|| "-".to_string(), |m| format!("{m:.1}"));
    let rows = [
        ("Count", s.count.to_string()),
        ("Mean", format!("{:.2}", s.mean)),
        ("Median", format!("{:.2}", s.median)),
        ("Mode", mode),
        ("Std. deviation", format!("{:.2}", s.standard_deviation)),
        ("Variance", format!("{:.2}", s.variance)),
        ("Range", format!("{:.1} – {:.1}", s.range.min, s.range.max)),
        (
            "Interquartile range",
            format!(
                "{:.1} – {:.1}",
                s.interquartile_range.q1, s.interquartile_range.q3
            ),
        ),
        ("Coefficient of variation", format!("{:.1}%", s.coefficient_of_variation)),
        ("Skewness", format!("{:.3} ({})", s.skewness, s.shape().label())),
        ("Kurtosis", format!("{:.3}", s.kurtosis)),
        (
            "95% confidence interval",
            format!(
                "{:.2} – {:.2} (±{:.2})",
                s.confidence_interval.lower,
                s.confidence_interval.upper,
                s.margin_of_error()
            ),
        ),
        (
            "Percentiles (10/25/50/75/90)",
            format!(
                "{:.1} / {:.1} / {:.1} / {:.1} / {:.1}",
                s.percentiles.p10,
                s.percentiles.p25,
                s.percentiles.p50,
                s.percentiles.p75,
                s.percentiles.p90
            ),
        ),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "<tr><th>{label}</th><td>{value}</td></tr>");
    }
    out.push_str("</tbody></table>\n</section>\n");
    out
}

fn band_color(band: PerformanceBand) -> &'static str {
    match band {
        PerformanceBand::Low => "#ef4444",
        PerformanceBand::Medium => "#eab308",
        PerformanceBand::High => "#22c55e",
    }
}

fn distribution_section(dist: &DistributionAnalysis, bands: &BandThresholds) -> String {
    let mut out = String::from("<section class=\"distribution\">\n<h2>Distribution</h2>\n");
    out.push_str(&histogram_svg(dist, bands));
    out.push_str(&box_plot_svg(dist));
    let _ = writeln!(
        out,
        "<p class=\"bands\"><span class=\"low\">Below {:.0}: {}</span> <span class=\"medium\">{:.0}–{:.0}: {}</span> <span class=\"high\">{:.0}+: {}</span></p>",
        bands.low,
        dist.bands.low,
        bands.low,
        bands.medium,
        dist.bands.medium,
        bands.medium,
        dist.bands.high
    );
    out.push_str("</section>\n");
    out
}

fn histogram_svg(dist: &DistributionAnalysis, bands: &BandThresholds) -> String {
    let bar_width = 40;
    let gap = 6;
    let chart_height = 200.0;
    let label_height = 40;

    let bins = &dist.histogram.bins;
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
    let width = bins.len() * (bar_width + gap) + gap;

    let mut svg = format!(
        "<svg class=\"histogram\" width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        width,
        chart_height as usize + label_height
    );

    for (i, bin) in bins.iter().enumerate() {
        let x = gap + i * (bar_width + gap);
        let height = bin.count as f64 / max_count * chart_height;
        let y = chart_height - height;
        let midpoint = (bin.start + bin.end) / 2.0;
        let color = band_color(PerformanceBand::classify(midpoint, bands));

        let _ = writeln!(
            svg,
            "  <rect x=\"{x}\" y=\"{y:.1}\" width=\"{bar_width}\" height=\"{height:.1}\" fill=\"{color}\" fill-opacity=\"0.8\" rx=\"3\"><title>{}: {} ({:.1}%)</title></rect>",
            html_escape(&bin.range_label),
            bin.count,
            bin.percentage
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"currentColor\" text-anchor=\"middle\">{}</text>",
            x + bar_width / 2,
            chart_height as usize + 14,
            html_escape(&bin.range_label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn box_plot_svg(dist: &DistributionAnalysis) -> String {
    let b = &dist.box_plot;
    let width = 500.0;
    let pad = 20.0;

    let lo = b.outliers.iter().copied().fold(b.min, f64::min);
    let hi = b.outliers.iter().copied().fold(b.max, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let scale = |v: f64| pad + (v - lo) / span * (width - 2.0 * pad);

    let mut svg = format!(
        "<svg class=\"box-plot\" width=\"{width}\" height=\"80\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    let _ = writeln!(
        svg,
        "  <line x1=\"{:.1}\" y1=\"40\" x2=\"{:.1}\" y2=\"40\" stroke=\"currentColor\"/>",
        scale(b.min),
        scale(b.max)
    );
    let _ = writeln!(
        svg,
        "  <rect x=\"{:.1}\" y=\"25\" width=\"{:.1}\" height=\"30\" fill=\"#a78bfa\" fill-opacity=\"0.5\" stroke=\"currentColor\"/>",
        scale(b.q1),
        scale(b.q3) - scale(b.q1)
    );
    for v in [b.min, b.median, b.max] {
        let _ = writeln!(
            svg,
            "  <line x1=\"{x:.1}\" y1=\"25\" x2=\"{x:.1}\" y2=\"55\" stroke=\"currentColor\" stroke-width=\"2\"/>",
            x = scale(v)
        );
    }
    let _ = writeln!(
        svg,
        "  <circle cx=\"{:.1}\" cy=\"40\" r=\"3\" fill=\"#7c3aed\"><title>mean {:.2}</title></circle>",
        scale(b.mean),
        b.mean
    );
    for o in &b.outliers {
        let _ = writeln!(
            svg,
            "  <circle class=\"outlier\" cx=\"{:.1}\" cy=\"40\" r=\"4\" fill=\"none\" stroke=\"#ef4444\"><title>{o}</title></circle>",
            scale(*o)
        );
    }
    svg.push_str("</svg>\n");
    svg
}

fn heatmap_section(matrix: &CorrelationMatrix, scale: ColorScale) -> String {
    let mut out = String::from("<section class=\"correlation\">\n<h2>Correlation</h2>\n");
    out.push_str("<table class=\"heatmap\">\n<thead><tr><th></th>");
    for v in &matrix.variables {
        let _ = write!(out, "<th>{}</th>", html_escape(v));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for (name, row) in matrix.variables.iter().zip(&matrix.matrix) {
        let _ = write!(out, "<tr><th>{}</th>", html_escape(name));
        for &r in row {
            let text = if ColorScale::needs_light_text(r) {
                "#fff"
            } else {
                "#1a1a1a"
            };
            let _ = write!(
                out,
                "<td style=\"background:{};color:{text}\">{r:.2}</td>",
                scale.color(r).to_css()
            );
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody></table>\n</section>\n");
    out
}

fn quality_section(q: &DataQualityMetrics) -> String {
    let grade_class = match q.grade() {
        QualityGrade::Excellent => "pass",
        QualityGrade::Fair => "warn",
        QualityGrade::Poor => "fail",
    };
    let mut out = String::from("<section class=\"quality\">\n<h2>Data Quality</h2>\n");
    let _ = writeln!(
        out,
        "<p class=\"score {grade_class}\">Overall {} / 100 over {} records (updated {})</p>",
        q.overall_score(),
        q.total_records,
        q.last_updated
    );
    out.push_str("<table class=\"summary\">\n<tbody>\n");
    for (label, score) in [
        ("Completeness", q.data_completeness),
        ("Accuracy", q.data_accuracy),
        ("Consistency", q.data_consistency),
    ] {
        let _ = writeln!(out, "<tr><th>{label}</th><td>{score}%</td></tr>");
    }
    out.push_str("</tbody></table>\n");

    if !q.missing_values.is_empty() {
        out.push_str("<h3>Missing values</h3>\n<ul>\n");
        for m in &q.missing_values {
            let _ = writeln!(
                out,
                "<li class=\"severity-{}\">{}: {} ({:.1}%)</li>",
                m.severity.label(),
                html_escape(&m.field),
                m.count,
                m.percentage
            );
        }
        out.push_str("</ul>\n");
    }
    if !q.outliers.is_empty() {
        out.push_str("<h3>Outliers</h3>\n<ul>\n");
        for o in &q.outliers {
            let _ = writeln!(
                out,
                "<li>{}: {} ({})</li>",
                html_escape(&o.field),
                o.count,
                html_escape(&o.description)
            );
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");
    out
}

fn insight_class(kind: InsightType) -> &'static str {
    match kind {
        InsightType::Success => "pass",
        InsightType::Warning => "warn",
        InsightType::Danger => "fail",
        InsightType::Info | InsightType::Trend => "info",
    }
}

fn insights_section(insights: &[Insight]) -> String {
    let mut out = String::from("<section class=\"insights\">\n<h2>Insights</h2>\n");
    for i in insights {
        let _ = writeln!(
            out,
            "<article class=\"insight {}\">\n<h3>{} <small>{} priority</small></h3>\n<p>{}</p>",
            insight_class(i.kind),
            html_escape(&i.title),
            i.priority.label(),
            html_escape(&i.description)
        );
        if let Some(m) = &i.metric {
            let _ = writeln!(
                out,
                "<p class=\"metric\">{}: {}{}</p>",
                html_escape(&m.label),
                html_escape(&m.value),
                html_escape(m.unit.as_deref().unwrap_or(""))
            );
        }
        if let Some(rec) = &i.recommendation {
            let _ = writeln!(out, "<p class=\"recommendation\">{}</p>", html_escape(rec));
        }
        out.push_str("</article>\n");
    }
    out.push_str("</section>\n");
    out
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; --info: #dbeafe; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; --info: #1e3a8a; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.heatmap td { text-align: center; min-width: 4rem; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
.info { background: var(--info); }
.insight { border-radius: 8px; padding: 0.5rem 1rem; margin: 0.75rem 0; }
.insight small { font-weight: normal; color: #6b7280; }
.recommendation { font-style: italic; }
.severity-high { color: #dc2626; font-weight: bold; }
.severity-medium { color: #ca8a04; }
.severity-low { color: #6b7280; }
.bands .low { color: #dc2626; }
.bands .medium { color: #ca8a04; }
.bands .high { color: #16a34a; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { display: block; margin: 1rem 0; }
"#;
