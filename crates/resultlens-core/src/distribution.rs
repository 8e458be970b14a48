//! Histogram binning, box-plot summary and performance bands.

use serde::{Deserialize, Serialize};

use crate::statistics::{mean, percentile, sorted_copy};

/// Multiplier applied to the IQR to place the box-plot fences.
const FENCE_FACTOR: f64 = 1.5;

/// Upper bound on histogram bins. Larger requests are clamped.
pub const MAX_BINS: usize = 1_000;

/// Options for [`analyze_distribution`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionOptions {
    /// Number of equal-width histogram bins.
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Thresholds splitting values into low / medium / high bands.
    #[serde(default)]
    pub bands: BandThresholds,
}

fn default_bins() -> usize {
    10
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            bands: BandThresholds::default(),
        }
    }
}

/// Caller-supplied band thresholds: `< low`, `[low, medium)`, `>= medium`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    pub low: f64,
    pub medium: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            low: 40.0,
            medium: 60.0,
        }
    }
}

/// Which performance band a value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBand {
    Low,
    Medium,
    High,
}

impl PerformanceBand {
    pub fn classify(value: f64, thresholds: &BandThresholds) -> Self {
        if value < thresholds.low {
            PerformanceBand::Low
        } else if value < thresholds.medium {
            PerformanceBand::Medium
        } else {
            PerformanceBand::High
        }
    }
}

/// A single histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Display label, e.g. `"40-45"`.
    pub range_label: String,
    /// Inclusive lower edge.
    pub start: f64,
    /// Exclusive upper edge (inclusive for the last bin).
    pub end: f64,
    pub count: usize,
    /// Share of the sample in this bin, 0–100.
    pub percentage: f64,
    /// Share of the sample in this and all earlier bins, 0–100.
    pub cumulative_percentage: f64,
}

/// Equal-width histogram of a sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    /// Number of values binned; equals the sum of bin counts.
    pub count: usize,
    pub bins: Vec<HistogramBin>,
}

/// Five-number summary with fence-clamped whiskers and the values outside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    /// Sample minimum clamped up to the lower fence.
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Sample maximum clamped down to the upper fence.
    pub max: f64,
    pub mean: f64,
    /// Every value outside the fences, in input order.
    pub outliers: Vec<f64>,
}

impl BoxPlotSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    pub fn lower_fence(&self) -> f64 {
        self.q1 - FENCE_FACTOR * self.iqr()
    }

    pub fn upper_fence(&self) -> f64 {
        self.q3 + FENCE_FACTOR * self.iqr()
    }
}

/// How many values fall into each performance band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Histogram, box plot and band counts computed over the same sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionAnalysis {
    pub histogram: DistributionSummary,
    pub box_plot: BoxPlotSummary,
    pub bands: BandCounts,
}

/// Run every distribution summary over `values`.
pub fn analyze_distribution(values: &[f64], options: &DistributionOptions) -> DistributionAnalysis {
    let analysis = DistributionAnalysis {
        histogram: histogram(values, options.bins),
        box_plot: box_plot(values),
        bands: band_counts(values, &options.bands),
    };
    tracing::debug!(
        count = values.len(),
        bins = analysis.histogram.bins.len(),
        outliers = analysis.box_plot.outliers.len(),
        "distribution analyzed"
    );
    analysis
}

/// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// `bins == 0` is treated as a single bin and requests above [`MAX_BINS`]
/// are clamped to it. An empty sample has no bins. When every value is
/// identical the width is zero and all values land in the last bin, whose
/// upper edge is inclusive.
pub fn histogram(values: &[f64], bins: usize) -> DistributionSummary {
    if values.is_empty() {
        return DistributionSummary::default();
    }

    let bins = bins.clamp(1, MAX_BINS);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &value in values {
        counts[bin_index(value, min, width, bins)] += 1;
    }

    let total = values.len() as f64;
    let mut cumulative = 0usize;
    let bins = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            cumulative += count;
            let start = min + i as f64 * width;
            let end = if i == bins - 1 {
                max
            } else {
                min + (i + 1) as f64 * width
            };
            HistogramBin {
                range_label: range_label(start, end, width),
                start,
                end,
                count,
                percentage: count as f64 / total * 100.0,
                cumulative_percentage: cumulative as f64 / total * 100.0,
            }
        })
        .collect();

    DistributionSummary {
        count: values.len(),
        bins,
    }
}

/// `40-50` for whole-number bins, one decimal once bins are narrower than
/// one unit, and `to` as separator when an edge is negative.
fn range_label(start: f64, end: f64, width: f64) -> String {
    let precision = if width < 1.0 { 1 } else { 0 };
    let separator = if start < 0.0 || end < 0.0 { " to " } else { "-" };
    format!("{start:.precision$}{separator}{end:.precision$}")
}

/// Locate the bin for `value`, checking the estimate against the exact bin
/// edges so the assignment agrees with the `[start, end)` ranges.
fn bin_index(value: f64, min: f64, width: f64, bins: usize) -> usize {
    let last = bins - 1;
    if width <= 0.0 || !width.is_finite() {
        return last;
    }
    let edge = |i: usize| min + i as f64 * width;
    let mut idx = (((value - min) / width).floor().max(0.0) as usize).min(last);
    while idx > 0 && value < edge(idx) {
        idx -= 1;
    }
    while idx < last && value >= edge(idx + 1) {
        idx += 1;
    }
    idx
}

/// Box-plot summary using interpolated quartiles and 1.5×IQR fences.
pub fn box_plot(values: &[f64]) -> BoxPlotSummary {
    if values.is_empty() {
        return BoxPlotSummary::default();
    }

    let sorted = sorted_copy(values);
    let q1 = percentile(&sorted, 25.0);
    let median = percentile(&sorted, 50.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    let lower_fence = q1 - FENCE_FACTOR * iqr;
    let upper_fence = q3 + FENCE_FACTOR * iqr;

    let outliers = values
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    BoxPlotSummary {
        min: sorted[0].max(lower_fence),
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1].min(upper_fence),
        mean: mean(values),
        outliers,
    }
}

/// Count values per performance band.
pub fn band_counts(values: &[f64], thresholds: &BandThresholds) -> BandCounts {
    values
        .iter()
        .fold(BandCounts::default(), |mut acc, &v| {
            match PerformanceBand::classify(v, thresholds) {
                PerformanceBand::Low => acc.low += 1,
                PerformanceBand::Medium => acc.medium += 1,
                PerformanceBand::High => acc.high += 1,
            }
            acc
        })
}
