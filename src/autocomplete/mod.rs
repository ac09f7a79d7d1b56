//! Prefix autocomplete.
//!
//! [`PrefixTrie`] is the index; [`AutocompleteEngine`] ranks completions and
//! validates limits; [`SharedAutocomplete`] puts an engine behind a
//! read-write lock for concurrent use.

pub mod engine;
pub mod trie;

pub use engine::*;
pub use trie::*;
