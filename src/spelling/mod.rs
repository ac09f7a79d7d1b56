//! Edit distance, fuzzy matching and spelling suggestions.
//!
//! This module provides the Levenshtein family of distances, a fuzzy matcher
//! that ranks near-miss strings against a query, and a dictionary-backed
//! "Did you mean?" suggester.

pub mod dictionary;
pub mod fuzzy;
pub mod levenshtein;
pub mod suggest;

// Re-export commonly used types
pub use dictionary::*;
pub use fuzzy::*;
pub use levenshtein::*;
pub use suggest::*;
