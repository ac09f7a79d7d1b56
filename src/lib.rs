//! # Falcata
//!
//! An in-memory search and discovery core for Rust.
//!
//! ## Features
//!
//! - Prefix autocomplete over a frequency-counting trie
//! - Levenshtein-based fuzzy matching and spelling suggestions
//! - Cosine-ranked semantic search over embeddings
//! - User-based collaborative filtering
//! - Equality filters with facet counts
//!
//! Every engine is a plain synchronous call over caller-supplied data; none
//! depends on another, so they can be composed freely (for example, fixing a
//! typo with [`spelling::fuzzy_match`] before completing it with
//! [`autocomplete::AutocompleteEngine`]).

pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod error;
pub mod recommend;
pub mod search;
pub mod spelling;
pub mod vector;

pub mod prelude {
    pub use crate::autocomplete::{AutocompleteEngine, SharedAutocomplete, SuggestResult};
    pub use crate::config::DiscoveryConfig;
    pub use crate::error::{FalcataError, Result};
    pub use crate::recommend::{CollaborativeFilter, RatingMatrix, find_neighbors};
    pub use crate::search::{FacetDefinition, FacetedSearch, apply_filters, build_facets};
    pub use crate::spelling::{SpellingSuggester, edit_distance, fuzzy_match};
    pub use crate::vector::{SemanticSearchEngine, cosine_similarity, semantic_search};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
