//! Configuration for all engines.
//!
//! Each engine owns its config struct; [`DiscoveryConfig`] bundles them so a
//! single JSON file can tune everything. Missing sections and fields fall
//! back to their defaults.
//!
//! ```json
//! {
//!   "autocomplete": { "default_limit": 8 },
//!   "fuzzy": { "threshold": 2 },
//!   "recommend": { "k": 10, "metric": "pearson" }
//! }
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::autocomplete::AutocompleteConfig;
use crate::error::{FalcataError, Result};
use crate::recommend::RecommendConfig;
use crate::search::FacetConfig;
use crate::spelling::{FuzzyConfig, SuggestionConfig};
use crate::vector::SemanticConfig;

/// Configuration for every engine in the crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub autocomplete: AutocompleteConfig,
    pub fuzzy: FuzzyConfig,
    pub spelling: SuggestionConfig,
    pub semantic: SemanticConfig,
    pub recommend: RecommendConfig,
    pub facets: FacetConfig,
}

impl DiscoveryConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DiscoveryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("loading configuration from {}", path.as_ref().display());
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Reject values that would make an engine unusable.
    pub fn validate(&self) -> Result<()> {
        if self.autocomplete.default_limit == 0 {
            return Err(FalcataError::config(
                "autocomplete.default_limit must be at least 1",
            ));
        }
        if self.spelling.max_suggestions == 0 {
            return Err(FalcataError::config(
                "spelling.max_suggestions must be at least 1",
            ));
        }
        if self.facets.page_size == 0 {
            return Err(FalcataError::config("facets.page_size must be at least 1"));
        }
        if self.facets.score_field.is_empty() {
            return Err(FalcataError::config("facets.score_field must not be empty"));
        }
        if let Some(floor) = self.semantic.min_similarity
            && !(-1.0..=1.0).contains(&floor)
        {
            return Err(FalcataError::config(format!(
                "semantic.min_similarity must be within [-1, 1], got {floor}"
            )));
        }
        Ok(())
    }
}
