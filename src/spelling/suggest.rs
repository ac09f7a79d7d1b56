//! "Did you mean?" suggestions from a [`SpellingDictionary`].

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::spelling::dictionary::SpellingDictionary;
use crate::spelling::levenshtein::edit_distance_within;

/// A spelling suggestion with a score indicating confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested word.
    pub word: String,
    /// Confidence score (higher is better, 0.0 to 1.0).
    pub score: f64,
    /// Edit distance from the original word.
    pub distance: usize,
    /// Frequency of the suggested word in the dictionary.
    pub frequency: u64,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(word: String, score: f64, distance: usize, frequency: u64) -> Self {
        Suggestion {
            word,
            score,
            distance,
            frequency,
        }
    }

    /// Ranking order: closer first, then more frequent, then alphabetical.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.frequency.cmp(&self.frequency))
            .then_with(|| self.word.cmp(&other.word))
    }
}

/// Configuration for spelling suggestion generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Maximum edit distance to consider (inclusive).
    pub max_distance: usize,
    /// Maximum number of suggestions to return.
    pub max_suggestions: usize,
    /// Minimum frequency threshold for suggestions.
    pub min_frequency: u64,
    /// Weight for edit distance in scoring (0.0 to 1.0).
    pub distance_weight: f64,
    /// Weight for word frequency in scoring (0.0 to 1.0).
    pub frequency_weight: f64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            max_distance: 2,
            max_suggestions: 5,
            min_frequency: 1,
            distance_weight: 0.6,
            frequency_weight: 0.4,
        }
    }
}

/// Suggests dictionary words close to a possibly misspelled word.
#[derive(Debug, Clone)]
pub struct SpellingSuggester {
    dictionary: SpellingDictionary,
    config: SuggestionConfig,
}

impl SpellingSuggester {
    /// Create a new suggester with the given dictionary.
    pub fn new(dictionary: SpellingDictionary) -> Self {
        Self::with_config(dictionary, SuggestionConfig::default())
    }

    /// Create a new suggester with custom configuration.
    pub fn with_config(dictionary: SpellingDictionary, config: SuggestionConfig) -> Self {
        SpellingSuggester { dictionary, config }
    }

    /// Get the dictionary.
    pub fn dictionary(&self) -> &SpellingDictionary {
        &self.dictionary
    }

    /// Check if a word exists in the dictionary.
    pub fn is_correct(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    /// Get suggestions for a potentially misspelled word.
    ///
    /// A word already in the dictionary is returned as the only suggestion
    /// with distance 0 and score 1.0.
    pub fn suggest(&self, word: &str) -> Vec<Suggestion> {
        let word_lower = word.to_lowercase();

        let frequency = self.dictionary.frequency(&word_lower);
        if self.dictionary.contains(&word_lower) {
            return vec![Suggestion::new(word_lower, 1.0, 0, frequency)];
        }

        let mut suggestions: Vec<Suggestion> = self
            .dictionary
            .iter()
            .filter(|&(_, frequency)| frequency >= self.config.min_frequency)
            .filter_map(|(candidate, frequency)| {
                let distance =
                    edit_distance_within(&word_lower, candidate, self.config.max_distance)?;
                let score = self.calculate_score(distance, frequency);
                Some(Suggestion::new(candidate.to_string(), score, distance, frequency))
            })
            .collect();

        suggestions.sort_by(Suggestion::rank_cmp);
        suggestions.truncate(self.config.max_suggestions);

        debug!(
            "spelling word={:?} dictionary={} suggestions={}",
            word,
            self.dictionary.word_count(),
            suggestions.len()
        );

        suggestions
    }

    /// The best correction for `word`, or `None` if it is already spelled
    /// correctly or nothing is close enough.
    pub fn did_you_mean(&self, word: &str) -> Option<String> {
        if self.is_correct(word) {
            return None;
        }
        self.suggest(word).into_iter().next().map(|s| s.word)
    }

    /// Calculate a confidence score for a suggestion.
    fn calculate_score(&self, distance: usize, frequency: u64) -> f64 {
        // Distance score (closer distance = higher score)
        let distance_score = 1.0 / (1.0 + distance as f64);

        // Logarithmic so very common words do not dominate
        let total = self.dictionary.total_frequency();
        let frequency_score = if frequency == 0 || total <= 1 {
            0.0
        } else {
            (frequency as f64).ln() / (total as f64).ln()
        };

        (distance_score * self.config.distance_weight
            + frequency_score * self.config.frequency_weight)
            .clamp(0.0, 1.0)
    }
}
