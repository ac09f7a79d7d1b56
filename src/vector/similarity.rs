//! Similarity measures over dense numeric vectors.
//!
//! Sums are accumulated in `f64` and narrowed to `f32` at the end, which keeps
//! `cosine_similarity(u, u)` at exactly 1.0 for ordinary inputs.

use serde::{Deserialize, Serialize};

use crate::error::{FalcataError, Result};

/// Dot product over the common length of `a` and `b`.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum::<f64>() as f32
}

/// Euclidean (L2) norm.
pub fn l2_norm(a: &[f32]) -> f32 {
    a.iter().map(|x| *x as f64 * *x as f64).sum::<f64>().sqrt() as f32
}

/// Cosine of the angle between `a` and `b`, in `[-1.0, 1.0]`.
///
/// Returns `0.0` when either vector has zero magnitude, and also when the
/// lengths differ; callers that must reject mismatched input check
/// dimensions first.
///
/// ```text
///            a · b
/// cos(θ) = ─────────
///          ‖a‖ × ‖b‖
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    ((dot / (norm_a * norm_b).sqrt()) as f32).clamp(-1.0, 1.0)
}

/// Subtract the mean from every value.
fn mean_centered(values: &[f32]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mean = values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64;
    values.iter().map(|v| *v as f64 - mean).collect()
}

/// Centered cross product and the two centered norms.
fn centered_moments(a: &[f32], b: &[f32]) -> (f64, f64, f64) {
    let da = mean_centered(a);
    let db = mean_centered(b);

    let numerator: f64 = da.iter().zip(db.iter()).map(|(x, y)| x * y).sum();
    let norm_a = da.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = db.iter().map(|y| y * y).sum::<f64>().sqrt();

    (numerator, norm_a, norm_b)
}

/// Textbook Pearson correlation coefficient, in `[-1.0, 1.0]`.
///
/// `0.0` when either side has zero variance.
pub fn pearson_correlation(a: &[f32], b: &[f32]) -> f32 {
    let (numerator, norm_a, norm_b) = centered_moments(a, b);
    let denominator = norm_a * norm_b;
    if denominator == 0.0 {
        return 0.0;
    }
    ((numerator / denominator) as f32).clamp(-1.0, 1.0)
}

/// Mean-centered correlation normalized by the *sum* of the centered norms.
///
/// `Σ(Δa·Δb) / (‖Δa‖ + ‖Δb‖)`. Unlike Pearson this is not bounded to
/// `[-1, 1]`; it grows with the spread of the ratings. `0.0` when both sides
/// are constant.
pub fn simplified_correlation(a: &[f32], b: &[f32]) -> f32 {
    let (numerator, norm_a, norm_b) = centered_moments(a, b);
    let denominator = norm_a + norm_b;
    if denominator == 0.0 {
        return 0.0;
    }
    (numerator / denominator) as f32
}

/// Similarity measure used to compare two paired samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// [`simplified_correlation`].
    #[default]
    Simplified,
    /// [`pearson_correlation`].
    Pearson,
    /// [`cosine_similarity`].
    Cosine,
}

impl SimilarityMetric {
    /// Calculate the similarity of `a` and `b` with this metric.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            SimilarityMetric::Simplified => simplified_correlation(a, b),
            SimilarityMetric::Pearson => pearson_correlation(a, b),
            SimilarityMetric::Cosine => cosine_similarity(a, b),
        }
    }

    /// Get the name of this similarity metric.
    pub fn name(&self) -> &'static str {
        match self {
            SimilarityMetric::Simplified => "simplified",
            SimilarityMetric::Pearson => "pearson",
            SimilarityMetric::Cosine => "cosine",
        }
    }

    /// Parse a similarity metric from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "simplified" => Ok(SimilarityMetric::Simplified),
            "pearson" => Ok(SimilarityMetric::Pearson),
            "cosine" => Ok(SimilarityMetric::Cosine),
            _ => Err(FalcataError::invalid_argument(format!(
                "Unknown similarity metric: {s}"
            ))),
        }
    }
}
