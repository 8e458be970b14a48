//! Pearson correlation matrix over named numeric variables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Correlation above which (or below the negative of which) a pair is reported as strong.
const STRONG_THRESHOLD: f64 = 0.5;

/// How many strong pairs of each sign the ranking keeps.
const STRONG_PAIR_LIMIT: usize = 3;

/// One observation: variable name → value. A missing variable reads as `0`.
pub type NumericRecord = HashMap<String, f64>;

/// Square, symmetric correlation matrix with a unit diagonal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    /// `matrix[i][j]` is the correlation between `variables[i]` and `variables[j]`.
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Look up the correlation between two variables by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| v == a)?;
        let j = self.variables.iter().position(|v| v == b)?;
        Some(self.matrix[i][j])
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Build the correlation matrix of `variables` across `records`.
///
/// Each unordered pair is computed once and mirrored. With no records the
/// result is the empty matrix.
pub fn correlation_matrix<S: AsRef<str>>(
    records: &[NumericRecord],
    variables: &[S],
) -> CorrelationMatrix {
    if records.is_empty() {
        return CorrelationMatrix::default();
    }

    let columns: Vec<Vec<f64>> = variables
        .iter()
        .map(|var| {
            records
                .iter()
                .map(|r| {
                    r.get(var.as_ref())
                        .copied()
                        .filter(|v| v.is_finite())
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    let k = variables.len();
    let mut matrix = vec![vec![0.0; k]; k];
    for i in 0..k {
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    tracing::debug!(records = records.len(), variables = k, "correlation matrix computed");

    CorrelationMatrix {
        variables: variables.iter().map(|v| v.as_ref().to_string()).collect(),
        matrix,
    }
}

/// Pearson correlation coefficient of two equally long series.
///
/// Returns `0` when the series are empty, differ in length, or either has
/// zero variance. The result is clamped to `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() || is_constant(x) || is_constant(y) {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denominator = (sxx * syy).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (sxy / denominator).clamp(-1.0, 1.0)
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Qualitative strength of a correlation, by absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl CorrelationStrength {
    pub fn from_value(r: f64) -> Self {
        let abs = r.abs();
        if abs >= 0.8 {
            CorrelationStrength::VeryStrong
        } else if abs >= 0.6 {
            CorrelationStrength::Strong
        } else if abs >= 0.4 {
            CorrelationStrength::Moderate
        } else if abs >= 0.2 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::VeryWeak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::VeryStrong => "Very Strong",
            CorrelationStrength::Strong => "Strong",
            CorrelationStrength::Moderate => "Moderate",
            CorrelationStrength::Weak => "Weak",
            CorrelationStrength::VeryWeak => "Very Weak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl CorrelationDirection {
    pub fn from_value(r: f64) -> Self {
        if r > 0.0 {
            CorrelationDirection::Positive
        } else if r < 0.0 {
            CorrelationDirection::Negative
        } else {
            CorrelationDirection::None
        }
    }
}

/// An off-diagonal cell of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub value: f64,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
}

/// Off-diagonal pairs ordered by strength.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationRanking {
    /// Every pair, sorted by `|r|` descending; ties keep variable order.
    pub pairs: Vec<CorrelationPair>,
    pub strong_positive: Vec<CorrelationPair>,
    pub strong_negative: Vec<CorrelationPair>,
}

/// Rank all unordered variable pairs of `matrix` by absolute correlation.
pub fn rank_correlations(matrix: &CorrelationMatrix) -> CorrelationRanking {
    let k = matrix.variables.len();
    let mut pairs = Vec::with_capacity(k * k.saturating_sub(1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let value = matrix.matrix[i][j];
            pairs.push(CorrelationPair {
                first: matrix.variables[i].clone(),
                second: matrix.variables[j].clone(),
                value,
                strength: CorrelationStrength::from_value(value),
                direction: CorrelationDirection::from_value(value),
            });
        }
    }
    pairs.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));

    let strong_positive = pairs
        .iter()
        .filter(|p| p.value > STRONG_THRESHOLD)
        .take(STRONG_PAIR_LIMIT)
        .cloned()
        .collect();
    let strong_negative = pairs
        .iter()
        .filter(|p| p.value < -STRONG_THRESHOLD)
        .take(STRONG_PAIR_LIMIT)
        .cloned()
        .collect();

    CorrelationRanking {
        pairs,
        strong_positive,
        strong_negative,
    }
}

/// Heatmap color mapping for correlation values.
///
/// Only `Diverging` is used by the dashboard; `Sequential` is kept for
/// callers that want magnitude-only shading but has not been checked
/// against real usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScale {
    /// Red (−1) through white (0) to blue (+1).
    #[default]
    Diverging,
    /// Light to dark blue by absolute value.
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// CSS `rgb(r, g, b)` notation.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

impl ColorScale {
    pub fn color(&self, r: f64) -> Rgb {
        let r = if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 };
        let scale = |v: f64| (v * 255.0).round() as u8;
        match self {
            ColorScale::Diverging if r >= 0.0 => {
                let fade = 255 - scale(r);
                Rgb(fade, fade, 255)
            }
            ColorScale::Diverging => {
                let fade = 255 - scale(r.abs());
                Rgb(255, fade, fade)
            }
            ColorScale::Sequential => {
                let level = scale(1.0 - r.abs());
                Rgb(level, level, 255)
            }
        }
    }

    /// Whether text drawn over this cell should be light.
    pub fn needs_light_text(r: f64) -> bool {
        r.abs() > STRONG_THRESHOLD
    }
}
