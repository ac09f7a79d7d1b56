//! Faceted search: equality filtering and per-field value counts.
//!
//! Items are JSON objects. Filtering is a conjunction of exact field
//! equalities; facets count how often each value of a field occurs among the
//! items that survive the filters.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A searchable item: a JSON object keyed by field name.
pub type Record = Map<String, Value>;

/// Field → required value. Every pair must match.
pub type FilterSet = Map<String, Value>;

/// Value → occurrence count for one facet.
pub type FacetCounts = BTreeMap<String, u64>;

/// Describes one facet to collect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDefinition {
    /// Name the counts are reported under.
    pub name: String,
    /// Record field the facet summarizes.
    pub field: String,
}

impl FacetDefinition {
    pub fn new<N: Into<String>, F: Into<String>>(name: N, field: F) -> Self {
        FacetDefinition {
            name: name.into(),
            field: field.into(),
        }
    }

    /// A facet named after the field it summarizes.
    pub fn for_field<F: Into<String>>(field: F) -> Self {
        let field = field.into();
        FacetDefinition {
            name: field.clone(),
            field,
        }
    }

    /// Parse `name:field`, or a bare `field`.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((name, field)) => FacetDefinition::new(name, field),
            None => FacetDefinition::for_field(spec),
        }
    }
}

/// Facet counts keyed by facet name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetResults {
    pub facets: BTreeMap<String, FacetCounts>,
}

impl FacetResults {
    /// Create empty facet results.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Counts for one facet.
    pub fn get(&self, name: &str) -> Option<&FacetCounts> {
        self.facets.get(name)
    }

    /// Number of counted occurrences in one facet.
    pub fn total(&self, name: &str) -> u64 {
        self.get(name).map(|counts| counts.values().sum()).unwrap_or(0)
    }

    /// The `limit` most frequent values of a facet, ties alphabetical.
    pub fn top_values(&self, name: &str, limit: usize) -> Vec<(String, u64)> {
        let mut values: Vec<(String, u64)> = self
            .get(name)
            .map(|counts| counts.iter().map(|(v, c)| (v.clone(), *c)).collect())
            .unwrap_or_default();
        values.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        values.truncate(limit);
        values
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

/// Whether `item` carries every field/value pair in `filters`.
pub fn matches_filters(item: &Record, filters: &FilterSet) -> bool {
    filters
        .iter()
        .all(|(field, expected)| item.get(field) == Some(expected))
}

/// Keep only the items that match every filter.
///
/// Values compare as JSON, so `4` and `"4"` are different values.
pub fn apply_filters<'a>(items: &'a [Record], filters: &FilterSet) -> Vec<&'a Record> {
    items
        .iter()
        .filter(|item| matches_filters(item, filters))
        .collect()
}

/// Facet key for a scalar value. Strings are used verbatim, everything else
/// as its JSON text.
fn facet_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Count the values of each facet's field over `items`.
///
/// Items without the field (or with `null`) contribute nothing. An array
/// counts each of its elements once.
pub fn build_facets<'a, I>(items: I, definitions: &[FacetDefinition]) -> FacetResults
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut facets: BTreeMap<String, FacetCounts> = definitions
        .iter()
        .map(|definition| (definition.name.clone(), FacetCounts::new()))
        .collect();

    for item in items {
        for definition in definitions {
            let Some(value) = item.get(&definition.field) else {
                continue;
            };
            let counts = facets.entry(definition.name.clone()).or_default();

            let values: &[Value] = match value {
                Value::Array(elements) => elements.as_slice(),
                scalar => std::slice::from_ref(scalar),
            };
            for key in values.iter().filter_map(facet_key) {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    FacetResults { facets }
}

/// Configuration for faceted search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetConfig {
    /// Maximum number of items returned in `results`.
    pub page_size: usize,
    /// Numeric field averaged into `avg_score`.
    pub score_field: String,
}

impl Default for FacetConfig {
    fn default() -> Self {
        FacetConfig {
            page_size: 20,
            score_field: "score".to_string(),
        }
    }
}

/// Response of [`FacetedSearch::search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetedSearchResponse {
    /// The query, echoed back.
    pub query: String,
    /// Number of items that passed the filters.
    pub total: usize,
    /// First page of matching items.
    pub results: Vec<Record>,
    /// Facet counts over all matching items.
    pub facets: FacetResults,
    /// `Σ score / (total + 1)` over all matching items.
    pub avg_score: f64,
}

/// `Σ score / (count + 1)`.
///
/// Not the arithmetic mean: the divisor is one more than the item count.
/// Items without a numeric score add nothing to the sum but still count.
pub fn biased_average_score(items: &[&Record], score_field: &str) -> f64 {
    let mut missing = 0usize;
    let sum: f64 = items
        .iter()
        .map(|item| match item.get(score_field).and_then(Value::as_f64) {
            Some(score) => score,
            None => {
                missing += 1;
                0.0
            }
        })
        .sum();

    if missing > 0 {
        warn!("{missing} item(s) without a numeric {score_field:?} field counted as 0");
    }

    sum / (items.len() + 1) as f64
}

/// Filters items, pages them and collects facets.
#[derive(Debug, Clone, Default)]
pub struct FacetedSearch {
    definitions: Vec<FacetDefinition>,
    config: FacetConfig,
}

impl FacetedSearch {
    /// Create a faceted search with the default configuration.
    pub fn new(definitions: Vec<FacetDefinition>) -> Self {
        Self::with_config(definitions, FacetConfig::default())
    }

    /// Create a faceted search with a custom configuration.
    pub fn with_config(definitions: Vec<FacetDefinition>, config: FacetConfig) -> Self {
        FacetedSearch {
            definitions,
            config,
        }
    }

    pub fn definitions(&self) -> &[FacetDefinition] {
        &self.definitions
    }

    /// Filter `items`, return the first page and facet counts over every
    /// match.
    pub fn search(
        &self,
        query: &str,
        filters: &FilterSet,
        items: &[Record],
    ) -> FacetedSearchResponse {
        let filtered = apply_filters(items, filters);
        let facets = build_facets(filtered.iter().copied(), &self.definitions);
        let avg_score = biased_average_score(&filtered, &self.config.score_field);

        debug!(
            "faceted search query={:?} filters={} items={} matched={}",
            query,
            filters.len(),
            items.len(),
            filtered.len()
        );

        FacetedSearchResponse {
            query: query.to_string(),
            total: filtered.len(),
            results: filtered
                .iter()
                .take(self.config.page_size)
                .map(|item| (*item).clone())
                .collect(),
            facets,
            avg_score,
        }
    }
}
