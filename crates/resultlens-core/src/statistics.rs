//! Descriptive statistics over a single numeric sample.
//!
//! [`calculate_statistics`] is a total function: an empty sample, a constant
//! sample or a tiny sample all produce a fully populated
//! [`StatisticalMetrics`] with neutral values where a measure is undefined.

use serde::{Deserialize, Serialize};

/// z-score for a two-sided 95% confidence interval.
const Z_95: f64 = 1.96;

/// Skewness magnitude above which a distribution is labelled skewed.
const SKEW_LABEL_THRESHOLD: f64 = 0.5;

/// Descriptive statistics for one numeric sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalMetrics {
    pub mean: f64,
    pub median: f64,
    /// Most frequent value after rounding to one decimal place, `None` when
    /// every rounded value is unique.
    pub mode: Option<f64>,
    /// Population standard deviation.
    pub standard_deviation: f64,
    /// Population variance (divides by `count`).
    pub variance: f64,
    pub range: ValueRange,
    pub interquartile_range: Quartiles,
    /// Standard deviation as a percentage of the mean.
    pub coefficient_of_variation: f64,
    /// Bias-corrected sample skewness.
    pub skewness: f64,
    /// Bias-corrected excess kurtosis.
    pub kurtosis: f64,
    pub count: usize,
    pub sum: f64,
    /// 95% confidence interval on the mean.
    pub confidence_interval: ConfidenceInterval,
    pub percentiles: Percentiles,
}

/// Smallest and largest value of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// First and third quartile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

impl Quartiles {
    /// The interquartile range, `q3 - q1`.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// The fixed percentile points reported for every sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Coarse description of a distribution's asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionShape {
    RightSkewed,
    LeftSkewed,
    Symmetric,
}

impl DistributionShape {
    pub fn label(&self) -> &'static str {
        match self {
            DistributionShape::RightSkewed => "Right-skewed",
            DistributionShape::LeftSkewed => "Left-skewed",
            DistributionShape::Symmetric => "Symmetric",
        }
    }
}

impl StatisticalMetrics {
    /// Classify the sample's skewness.
    pub fn shape(&self) -> DistributionShape {
        if self.skewness > SKEW_LABEL_THRESHOLD {
            DistributionShape::RightSkewed
        } else if self.skewness < -SKEW_LABEL_THRESHOLD {
            DistributionShape::LeftSkewed
        } else {
            DistributionShape::Symmetric
        }
    }

    /// Half-width of the 95% confidence interval.
    pub fn margin_of_error(&self) -> f64 {
        (self.confidence_interval.upper - self.confidence_interval.lower) / 2.0
    }

    /// Signed difference between this sample's mean and a baseline value.
    pub fn difference_from(&self, baseline: f64) -> f64 {
        self.mean - baseline
    }
}

/// Compute descriptive statistics for a sample.
///
/// Returns all-zero metrics (with `mode == None`) for an empty sample.
pub fn calculate_statistics(values: &[f64]) -> StatisticalMetrics {
    let count = values.len();
    if count == 0 {
        return StatisticalMetrics::default();
    }

    let sorted = sorted_copy(values);
    let n = count as f64;
    let sum: f64 = values.iter().sum();
    let mean = sum / n;

    // A constant sample has zero spread; computing it from `mean` can leave
    // a rounding residue that would blow up skewness and kurtosis.
    let is_constant = sorted[0] == sorted[count - 1];
    let variance = if is_constant {
        0.0
    } else {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
    };
    let standard_deviation = variance.sqrt();

    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let percentiles = Percentiles {
        p10: percentile(&sorted, 10.0),
        p25: percentile(&sorted, 25.0),
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
    };

    let coefficient_of_variation = if mean == 0.0 {
        0.0
    } else {
        standard_deviation / mean * 100.0
    };

    let skewness = if count > 2 && standard_deviation > 0.0 {
        let cubes: f64 = values
            .iter()
            .map(|x| ((x - mean) / standard_deviation).powi(3))
            .sum();
        n / ((n - 1.0) * (n - 2.0)) * cubes
    } else {
        0.0
    };

    let kurtosis = if count > 3 && standard_deviation > 0.0 {
        let fourths: f64 = values
            .iter()
            .map(|x| ((x - mean) / standard_deviation).powi(4))
            .sum();
        (n * (n + 1.0)) / ((n - 1.0) * (n - 2.0) * (n - 3.0)) * fourths
            - 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0))
    } else {
        0.0
    };

    let standard_error = standard_deviation / n.sqrt();

    StatisticalMetrics {
        mean,
        median,
        mode: mode(&sorted),
        standard_deviation,
        variance,
        range: ValueRange {
            min: sorted[0],
            max: sorted[count - 1],
        },
        interquartile_range: Quartiles {
            q1: percentiles.p25,
            q3: percentiles.p75,
        },
        coefficient_of_variation,
        skewness,
        kurtosis,
        count,
        sum,
        confidence_interval: ConfidenceInterval {
            lower: mean - Z_95 * standard_error,
            upper: mean + Z_95 * standard_error,
        },
        percentiles,
    }
}

/// Percentile by linear interpolation between order statistics.
///
/// `sorted` must be in ascending order. The fractional index is
/// `(p / 100) * (len - 1)`. Returns `0.0` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (p / 100.0 * (sorted.len() - 1) as f64).clamp(0.0, (sorted.len() - 1) as f64);
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let (lo, hi) = (sorted[lower], sorted[upper]);
    // Keep the result inside its bracket so neighbouring percentiles stay ordered.
    (lo + (hi - lo) * (index - lower as f64)).max(lo).min(hi)
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean.
pub(crate) fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Round half up to one decimal place.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Rounding is monotone, so equal rounded values form contiguous runs in a
/// sorted sample; the first longest run wins.
fn mode(sorted: &[f64]) -> Option<f64> {
    let rounded: Vec<f64> = sorted.iter().copied().map(round_to_tenth).collect();
    let mut best: Option<(f64, usize)> = None;
    for run in rounded.chunk_by(|a, b| a == b) {
        match best {
            Some((_, freq)) if run.len() <= freq => {}
            _ => best = Some((run[0], run.len())),
        }
    }
    match best {
        Some((value, freq)) if freq > 1 => Some(value),
        _ => None,
    }
}
