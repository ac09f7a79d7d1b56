//! Vector similarity and semantic search.
//!
//! This module provides:
//! - Similarity measures over dense vectors (cosine, Pearson and the
//!   sum-of-norms correlation used for neighbour selection)
//! - An insertion-ordered embedding corpus
//! - Cosine-ranked semantic search over that corpus

pub mod semantic;
pub mod similarity;

pub use semantic::*;
pub use similarity::*;
