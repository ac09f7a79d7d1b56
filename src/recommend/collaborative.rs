//! User-based collaborative filtering.
//!
//! Users are rows of a rating matrix; a rating of zero (or a negative value,
//! or a missing trailing column) means the user did not rate that item.
//! Neighbours are compared only on items both users rated.

use std::fs;
use std::path::Path;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{FalcataError, Result};
use crate::vector::similarity::SimilarityMetric;

/// Minimum number of co-rated items for two users to be comparable.
pub const MIN_CO_RATED: usize = 2;

/// Whether a cell holds an actual rating.
fn is_rated(value: f32) -> bool {
    value > 0.0
}

/// Ratings of both users on the items both of them rated.
///
/// Rows of different length are compared over their common prefix.
pub fn co_rated(a: &[f32], b: &[f32]) -> (Vec<f32>, Vec<f32>) {
    a.iter()
        .zip(b.iter())
        .filter(|(x, y)| is_rated(**x) && is_rated(**y))
        .map(|(x, y)| (*x, *y))
        .unzip()
}

/// A similar user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub user_index: usize,
    pub similarity: f32,
}

/// Nearest neighbours of a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeighborResult {
    /// Neighbours ordered by descending similarity.
    pub neighbors: Vec<Neighbor>,
    /// Mean similarity over `neighbors`, 0 when empty.
    pub avg_similarity: f32,
}

/// A predicted rating for an item the user has not rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScore {
    pub item_index: usize,
    pub score: f32,
}

/// Find the `k` users most similar to `target` using the sum-of-norms
/// correlation.
pub fn find_neighbors(target: usize, matrix: &[Vec<f32>], k: usize) -> Result<NeighborResult> {
    find_neighbors_with(target, matrix, k, SimilarityMetric::Simplified)
}

/// Find the `k` users most similar to `target` under `metric`.
///
/// Users sharing fewer than [`MIN_CO_RATED`] rated items with the target are
/// left out entirely. Equal similarities keep row order.
pub fn find_neighbors_with(
    target: usize,
    matrix: &[Vec<f32>],
    k: usize,
    metric: SimilarityMetric,
) -> Result<NeighborResult> {
    let target_row = matrix.get(target).ok_or_else(|| {
        FalcataError::invalid_argument(format!(
            "target user {target} out of range (matrix has {} users)",
            matrix.len()
        ))
    })?;

    if k == 0 {
        return Ok(NeighborResult::default());
    }

    let mut neighbors: Vec<Neighbor> = matrix
        .iter()
        .enumerate()
        .filter(|(user_index, _)| *user_index != target)
        .filter_map(|(user_index, row)| {
            let (mine, theirs) = co_rated(target_row, row);
            if mine.len() < MIN_CO_RATED {
                trace!("user {user_index} skipped: {} co-rated items", mine.len());
                return None;
            }
            Some(Neighbor {
                user_index,
                similarity: metric.similarity(&mine, &theirs),
            })
        })
        .collect();

    // stable sort, descending
    neighbors.sort_by(|a, b| {
        b.similarity.total_cmp(&a.similarity)
    });
    neighbors.truncate(k);

    let avg_similarity = if neighbors.is_empty() {
        0.0
    } else {
        neighbors.iter().map(|n| n.similarity).sum::<f32>() / neighbors.len() as f32
    };

    debug!(
        "neighbors target={} users={} k={} metric={} found={}",
        target,
        matrix.len(),
        k,
        metric.name(),
        neighbors.len()
    );

    Ok(NeighborResult {
        neighbors,
        avg_similarity,
    })
}

/// Predict ratings for items `target` has not rated.
///
/// Each prediction is the similarity-weighted average of the ratings given by
/// positively correlated neighbours. Results are ordered by descending score,
/// ties by item index, and cut to `limit`.
pub fn recommend_items(
    target: usize,
    matrix: &[Vec<f32>],
    k: usize,
    limit: usize,
    metric: SimilarityMetric,
) -> Result<Vec<ItemScore>> {
    let result = find_neighbors_with(target, matrix, k, metric)?;
    let target_row = &matrix[target];
    let item_count = matrix.iter().map(Vec::len).max().unwrap_or(0);

    let mut scores: Vec<ItemScore> = (0..item_count)
        .filter(|&item| !target_row.get(item).copied().is_some_and(is_rated))
        .filter_map(|item| {
            let mut weighted = 0.0f32;
            let mut weight = 0.0f32;
            for neighbor in result.neighbors.iter().filter(|n| n.similarity > 0.0) {
                if let Some(&rating) = matrix[neighbor.user_index].get(item)
                    && is_rated(rating)
                {
                    weighted += neighbor.similarity * rating;
                    weight += neighbor.similarity;
                }
            }
            (weight > 0.0).then(|| ItemScore {
                item_index: item,
                score: weighted / weight,
            })
        })
        .collect();

    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.item_index.cmp(&b.item_index))
    });
    scores.truncate(limit);

    Ok(scores)
}

/// Configuration for the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Number of neighbours.
    pub k: usize,
    /// Similarity used to rank neighbours.
    pub metric: SimilarityMetric,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        RecommendConfig {
            k: 5,
            metric: SimilarityMetric::Simplified,
        }
    }
}

/// A user-item rating matrix, one row per user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingMatrix {
    rows: Vec<Vec<f32>>,
}

impl From<Vec<Vec<f32>>> for RatingMatrix {
    fn from(rows: Vec<Vec<f32>>) -> Self {
        RatingMatrix { rows }
    }
}

impl RatingMatrix {
    /// Load a JSON array of rating rows.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn num_users(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, user: usize) -> Option<&[f32]> {
        self.rows.get(user).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }
}

/// Neighbour search and item recommendation over an owned matrix.
#[derive(Debug, Clone, Default)]
pub struct CollaborativeFilter {
    matrix: RatingMatrix,
    config: RecommendConfig,
}

impl CollaborativeFilter {
    pub fn new(matrix: RatingMatrix) -> Self {
        Self::with_config(matrix, RecommendConfig::default())
    }

    pub fn with_config(matrix: RatingMatrix, config: RecommendConfig) -> Self {
        CollaborativeFilter { matrix, config }
    }

    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    /// Neighbours of `target` with the configured `k` and metric.
    pub fn find_neighbors(&self, target: usize) -> Result<NeighborResult> {
        find_neighbors_with(target, self.matrix.rows(), self.config.k, self.config.metric)
    }

    /// Up to `limit` predicted ratings for items `target` has not rated.
    pub fn recommend_items(&self, target: usize, limit: usize) -> Result<Vec<ItemScore>> {
        recommend_items(
            target,
            self.matrix.rows(),
            self.config.k,
            limit,
            self.config.metric,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> Vec<Vec<f32>> {
        vec![
            vec![5.0, 3.0, 0.0, 1.0],
            vec![4.0, 0.0, 0.0, 1.0], // only 2 co-rated with user 0
            vec![1.0, 1.0, 0.0, 5.0],
            vec![1.0, 0.0, 0.0, 4.0],
            vec![0.0, 1.0, 5.0, 4.0],
            vec![5.0, 0.0, 0.0, 0.0], // only 1 co-rated with user 0
        ]
    }

    #[test]
    fn test_neighbors_totally_ordered_with_nan_similarity() {
        let mut matrix = sample_matrix();
        matrix[3][0] = f32::INFINITY;
        matrix.push(vec![2.0, 4.0, 0.0, 3.0]);

        let result = find_neighbors(0, &matrix, 10).unwrap();
        assert_eq!(result.neighbors.len(), 5);
        assert!(result.neighbors.iter().any(|n| n.similarity.is_nan()));
        assert!(result.neighbors.windows(2).all(|pair| {
            pair[0].similarity.total_cmp(&pair[1].similarity) != std::cmp::Ordering::Less
        }));
    }

    #[test]
    fn test_co_rated() {
        let (a, b) = co_rated(&[5.0, 0.0, 3.0, 2.0], &[1.0, 2.0, 0.0, 4.0]);
        assert_eq!(a, vec![5.0, 2.0]);
        assert_eq!(b, vec![1.0, 4.0]);

        let (a, b) = co_rated(&[1.0, 2.0, 3.0], &[1.0]);
        assert_eq!((a.len(), b.len()), (1, 1));
    }

    #[test]
    fn test_find_neighbors_skips_sparse_overlap() {
        let result = find_neighbors(0, &sample_matrix(), 10).unwrap();
        let users: Vec<usize> = result.neighbors.iter().map(|n| n.user_index).collect();

        assert!(!users.contains(&0));
        assert!(!users.contains(&5));
        assert_eq!(users.len(), 4);
        assert!(
            result
                .neighbors
                .windows(2)
                .all(|w| w[0].similarity >= w[1].similarity)
        );
    }

    #[test]
    fn test_sum_of_norms_value() {
        // user 0 vs user 1 on items 0 and 3: [5, 1] vs [4, 1]
        // Δ = [2, -2] and [1.5, -1.5]; Σ = 6; norms 2√2 + 1.5√2 = 3.5√2
        let result = find_neighbors(0, &sample_matrix(), 10).unwrap();
        let user1 = result.neighbors.iter().find(|n| n.user_index == 1).unwrap();
        let expected = 6.0 / (3.5 * 2f32.sqrt());
        assert!((user1.similarity - expected).abs() < 1e-5);
    }

    #[test]
    fn test_truncation_and_average() {
        let result = find_neighbors(0, &sample_matrix(), 1).unwrap();
        assert_eq!(result.neighbors.len(), 1);
        assert_eq!(result.neighbors[0].user_index, 1);
        assert!((result.avg_similarity - result.neighbors[0].similarity).abs() < 1e-6);
    }

    #[test]
    fn test_zero_k_is_empty() {
        let result = find_neighbors(0, &sample_matrix(), 0).unwrap();
        assert!(result.neighbors.is_empty());
        assert_eq!(result.avg_similarity, 0.0);
    }

    #[test]
    fn test_target_out_of_range() {
        let err = find_neighbors(6, &sample_matrix(), 3).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = find_neighbors(0, &[], 0).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_constant_ratings_score_zero() {
        let matrix = vec![vec![3.0, 3.0, 3.0], vec![2.0, 2.0, 2.0]];
        let result = find_neighbors(0, &matrix, 5).unwrap();

        assert_eq!(result.neighbors.len(), 1);
        assert_eq!(result.neighbors[0].similarity, 0.0);
    }

    #[test]
    fn test_pearson_metric_is_bounded() {
        let result =
            find_neighbors_with(0, &sample_matrix(), 10, SimilarityMetric::Pearson).unwrap();
        assert!(
            result
                .neighbors
                .iter()
                .all(|n| (-1.0..=1.0).contains(&n.similarity))
        );
    }

    #[test]
    fn test_recommend_items() {
        let matrix = vec![
            vec![5.0, 4.0, 0.0, 0.0],
            vec![5.0, 4.0, 2.0, 0.0],
            vec![4.0, 5.0, 0.0, 3.0],
        ];
        let filter = CollaborativeFilter::new(RatingMatrix::from(matrix));
        let items = filter.recommend_items(0, 10).unwrap();

        // user 1 correlates positively, user 2 negatively; only item 2 is
        // predicted from a positive neighbour
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_index, 2);
        assert!((items[0].score - 2.0).abs() < 1e-6);
    }
}
