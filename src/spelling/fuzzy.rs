//! Approximate string matching against a candidate list.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::spelling::levenshtein::edit_distance_within;

/// A candidate that is close enough to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    /// The candidate text.
    pub text: String,
    /// Edit distance from the query.
    pub distance: usize,
    /// `1 - distance / max(len(query), len(text))`.
    pub similarity: f64,
    /// `similarity * 100`.
    pub confidence: f64,
}

/// Matches ordered by ascending distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatchResult {
    pub matches: Vec<FuzzyMatch>,
}

impl FuzzyMatchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// The closest match, if any.
    pub fn best(&self) -> Option<&FuzzyMatch> {
        self.matches.first()
    }
}

/// Keep every candidate whose edit distance to `query` is strictly below
/// `threshold`.
///
/// The result is sorted by distance; candidates at the same distance keep
/// their input order. A threshold of 0 matches nothing.
pub fn fuzzy_match<S: AsRef<str>>(
    query: &str,
    candidates: &[S],
    threshold: usize,
) -> FuzzyMatchResult {
    let Some(max_distance) = threshold.checked_sub(1) else {
        return FuzzyMatchResult::default();
    };

    let query_len = query.chars().count();
    let mut matches: Vec<FuzzyMatch> = candidates
        .iter()
        .filter_map(|candidate| {
            let text = candidate.as_ref();
            let distance = edit_distance_within(query, text, max_distance)?;
            trace!("fuzzy candidate {text:?} distance={distance}");

            let max_len = query_len.max(text.chars().count());
            let similarity = if max_len == 0 {
                1.0
            } else {
                1.0 - distance as f64 / max_len as f64
            };

            Some(FuzzyMatch {
                text: text.to_string(),
                distance,
                similarity,
                confidence: similarity * 100.0,
            })
        })
        .collect();

    // stable: equal distances keep input order
    matches.sort_by_key(|m| m.distance);

    debug!(
        "fuzzy query={:?} threshold={} candidates={} matches={}",
        query,
        threshold,
        candidates.len(),
        matches.len()
    );

    FuzzyMatchResult { matches }
}

/// Configuration for fuzzy matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Exclusive upper bound on edit distance.
    pub threshold: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        FuzzyConfig { threshold: 3 }
    }
}

/// A query bound to a threshold, reusable across candidate lists.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    query: String,
    config: FuzzyConfig,
}

impl FuzzyMatcher {
    /// Create a matcher with the default threshold.
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self::with_config(query, FuzzyConfig::default())
    }

    /// Create a matcher with a custom configuration.
    pub fn with_config<S: Into<String>>(query: S, config: FuzzyConfig) -> Self {
        FuzzyMatcher {
            query: query.into(),
            config,
        }
    }

    /// Get the query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the threshold.
    pub fn threshold(&self) -> usize {
        self.config.threshold
    }

    /// Rank `candidates` against the query.
    pub fn matches<S: AsRef<str>>(&self, candidates: &[S]) -> FuzzyMatchResult {
        fuzzy_match(&self.query, candidates, self.config.threshold)
    }

    /// Whether `candidate` would be kept.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.config
            .threshold
            .checked_sub(1)
            .and_then(|max| edit_distance_within(&self.query, candidate, max))
            .is_some()
    }
}
