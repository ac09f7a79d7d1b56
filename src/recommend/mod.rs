//! Collaborative-filtering recommendation.

pub mod collaborative;

pub use collaborative::*;
