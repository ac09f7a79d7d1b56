//! Autocomplete engine built on top of [`PrefixTrie`].

use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::autocomplete::trie::{Candidate, PrefixTrie, Term};
use crate::error::{FalcataError, Result};

/// Configuration for the autocomplete engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Limit used by [`AutocompleteEngine::suggest_default`].
    pub default_limit: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        AutocompleteConfig { default_limit: 10 }
    }
}

/// Completions for a prefix.
///
/// `suggestions` and `frequencies` are parallel sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestResult {
    /// Completed terms, in ranking order.
    pub suggestions: Vec<String>,
    /// Frequency of each completed term.
    pub frequencies: Vec<u64>,
    /// Frequency-weighted average rank (1-based), truncated.
    pub quality_score: u64,
}

impl SuggestResult {
    /// Build a result from ranked candidates.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        let quality_score = quality_score(&candidates);
        let (suggestions, frequencies) = candidates
            .into_iter()
            .map(|candidate| (candidate.term, candidate.frequency))
            .unzip();

        SuggestResult {
            suggestions,
            frequencies,
            quality_score,
        }
    }

    /// Whether no completion was found.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Number of completions.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }
}

/// `Σ frequency × (rank + 1) / Σ frequency`, truncated. 0 for no matches.
///
/// Accumulated in `u128`: saturated trie frequencies overflow a `u64` sum.
/// The quotient never exceeds the number of candidates.
fn quality_score(candidates: &[Candidate]) -> u64 {
    let total: u128 = candidates.iter().map(|c| u128::from(c.frequency)).sum();
    if total == 0 {
        return 0;
    }

    let weighted: u128 = candidates
        .iter()
        .enumerate()
        .map(|(rank, c)| u128::from(c.frequency) * (rank as u128 + 1))
        .sum();

    u64::try_from(weighted / total).unwrap_or(u64::MAX)
}

fn check_limit(limit: usize) -> Result<()> {
    if limit < 1 {
        return Err(FalcataError::invalid_argument(
            "autocomplete limit must be at least 1",
        ));
    }
    Ok(())
}

/// Frequency-aware prefix completion.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteEngine {
    trie: PrefixTrie,
    config: AutocompleteConfig,
}

impl AutocompleteEngine {
    /// Create an empty engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty engine with a custom configuration.
    pub fn with_config(config: AutocompleteConfig) -> Self {
        AutocompleteEngine {
            trie: PrefixTrie::new(),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &AutocompleteConfig {
        &self.config
    }

    /// Add `frequency` occurrences of `term` to the index.
    pub fn insert(&mut self, term: &str, frequency: u64) {
        self.trie.insert(term, frequency);
    }

    /// Add many terms at once.
    pub fn insert_all<I: IntoIterator<Item = Term>>(&mut self, terms: I) {
        self.trie.insert_all(terms);
    }

    /// Complete `prefix` with up to `limit` terms in lexicographic order.
    ///
    /// An unknown prefix yields an empty result. `limit` of zero is rejected.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Result<SuggestResult> {
        check_limit(limit)?;

        let candidates = self.trie.completions(prefix, limit);
        debug!(
            "autocomplete prefix={:?} limit={} matches={}",
            prefix,
            limit,
            candidates.len()
        );

        Ok(SuggestResult::from_candidates(candidates))
    }

    /// Same as [`suggest`](Self::suggest) with the configured default limit.
    pub fn suggest_default(&self, prefix: &str) -> Result<SuggestResult> {
        self.suggest(prefix, self.config.default_limit)
    }

    /// Complete `prefix` with the `limit` most frequent terms.
    ///
    /// Ties are broken lexicographically.
    pub fn suggest_by_frequency(&self, prefix: &str, limit: usize) -> Result<SuggestResult> {
        check_limit(limit)?;

        let mut candidates = self.trie.all_completions(prefix);
        candidates.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.term.cmp(&b.term))
        });
        candidates.truncate(limit);

        debug!(
            "autocomplete (by frequency) prefix={:?} limit={} matches={}",
            prefix,
            limit,
            candidates.len()
        );

        Ok(SuggestResult::from_candidates(candidates))
    }

    /// Accumulated frequency of `term`.
    pub fn frequency(&self, term: &str) -> u64 {
        self.trie.frequency(term)
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.trie.len()
    }

    /// Borrow the underlying trie.
    pub fn trie(&self) -> &PrefixTrie {
        &self.trie
    }
}

/// An [`AutocompleteEngine`] shared between threads.
///
/// Inserts take the write lock; suggestions take the read lock, so any number
/// of readers proceed concurrently between writes.
#[derive(Debug, Clone, Default)]
pub struct SharedAutocomplete {
    inner: Arc<RwLock<AutocompleteEngine>>,
}

impl SharedAutocomplete {
    /// Wrap an engine for shared use.
    pub fn new(engine: AutocompleteEngine) -> Self {
        SharedAutocomplete {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn insert(&self, term: &str, frequency: u64) {
        self.inner.write().insert(term, frequency);
    }

    pub fn suggest(&self, prefix: &str, limit: usize) -> Result<SuggestResult> {
        self.inner.read().suggest(prefix, limit)
    }

    pub fn suggest_by_frequency(&self, prefix: &str, limit: usize) -> Result<SuggestResult> {
        self.inner.read().suggest_by_frequency(prefix, limit)
    }

    /// Copy of the current trie, readable without holding the lock.
    pub fn snapshot(&self) -> PrefixTrie {
        self.inner.read().trie().clone()
    }
}
