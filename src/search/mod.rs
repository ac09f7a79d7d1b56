//! Filtered result sets and facet aggregation.

pub mod facet;

pub use self::facet::*;
