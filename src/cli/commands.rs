//! Command implementations for Falcata CLI.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use crate::autocomplete::{AutocompleteEngine, SuggestResult, Term};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::DiscoveryConfig;
use crate::error::{FalcataError, Result};
use crate::recommend::{CollaborativeFilter, ItemScore, NeighborResult, RatingMatrix};
use crate::search::{FacetDefinition, FacetedSearch, FacetedSearchResponse, FilterSet, Record};
use crate::spelling::{
    FuzzyMatchResult, FuzzyMatcher, SpellingDictionary, SpellingSuggester, Suggestion,
    parse_frequency_line,
};
use crate::vector::{EmbeddingCorpus, SemanticSearchEngine, SemanticSearchResult};

/// Execute a CLI command.
pub fn execute_command(args: FalcataArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Complete(complete_args) => complete(complete_args, config, &args),
        Command::Fuzzy(fuzzy_args) => fuzzy(fuzzy_args, config, &args),
        Command::Spell(spell_args) => spell(spell_args, config, &args),
        Command::Semantic(semantic_args) => semantic(semantic_args, config, &args),
        Command::Recommend(recommend_args) => recommend(recommend_args, config, &args),
        Command::Facets(facets_args) => facets(facets_args, config, &args),
    }
}

fn load_config(args: &FalcataArgs) -> Result<DiscoveryConfig> {
    match &args.config {
        Some(path) => DiscoveryConfig::from_file(path),
        None => Ok(DiscoveryConfig::default()),
    }
}

/// Complete a prefix.
fn complete(args: &CompleteArgs, config: DiscoveryConfig, cli_args: &FalcataArgs) -> Result<()> {
    let mut engine = AutocompleteEngine::with_config(config.autocomplete);
    engine.insert_all(load_terms(&args.terms_file)?);
    info!("indexed {} terms", engine.term_count());

    let limit = args.limit.unwrap_or(engine.config().default_limit);
    let result: SuggestResult = if args.by_frequency {
        engine.suggest_by_frequency(&args.prefix, limit)?
    } else {
        engine.suggest(&args.prefix, limit)?
    };

    output_result("Completions", &result, cli_args)
}

/// Rank candidates by edit distance.
fn fuzzy(args: &FuzzyArgs, mut config: DiscoveryConfig, cli_args: &FalcataArgs) -> Result<()> {
    if let Some(threshold) = args.threshold {
        config.fuzzy.threshold = threshold;
    }
    let candidates = load_lines(&args.candidates_file)?;
    info!("loaded {} candidates", candidates.len());

    let result: FuzzyMatchResult =
        FuzzyMatcher::with_config(args.query.clone(), config.fuzzy).matches(&candidates);

    output_result("Fuzzy matches", &result, cli_args)
}

#[derive(Debug, Serialize)]
struct SpellReport {
    word: String,
    correct: bool,
    did_you_mean: Option<String>,
    suggestions: Vec<Suggestion>,
}

/// Suggest spelling corrections.
fn spell(args: &SpellArgs, mut config: DiscoveryConfig, cli_args: &FalcataArgs) -> Result<()> {
    if let Some(max_distance) = args.max_distance {
        config.spelling.max_distance = max_distance;
    }
    let dictionary = SpellingDictionary::load_from_frequency_file(&args.dictionary_file)?;
    let suggester = SpellingSuggester::with_config(dictionary, config.spelling);

    let report = SpellReport {
        word: args.word.clone(),
        correct: suggester.is_correct(&args.word),
        did_you_mean: suggester.did_you_mean(&args.word),
        suggestions: suggester.suggest(&args.word),
    };

    output_result("Spelling", &report, cli_args)
}

/// Rank an embedding corpus.
fn semantic(args: &SemanticArgs, config: DiscoveryConfig, cli_args: &FalcataArgs) -> Result<()> {
    let corpus = EmbeddingCorpus::load_json(&args.corpus_file)?;
    let top_k = args.top_k.unwrap_or(config.semantic.top_k);
    let engine = SemanticSearchEngine::with_config(corpus, config.semantic);

    let result: SemanticSearchResult = engine.search(&args.query, top_k)?;

    output_result("Semantic search", &result, cli_args)
}

#[derive(Debug, Serialize)]
struct RecommendReport {
    #[serde(flatten)]
    neighbors: NeighborResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<ItemScore>>,
}

/// Find neighbours and, optionally, recommend items.
fn recommend(
    args: &RecommendArgs,
    mut config: DiscoveryConfig,
    cli_args: &FalcataArgs,
) -> Result<()> {
    if let Some(k) = args.k {
        config.recommend.k = k;
    }
    if let Some(metric) = args.metric {
        config.recommend.metric = metric.into();
    }

    let matrix = RatingMatrix::load_json(&args.matrix_file)?;
    info!("loaded ratings for {} users", matrix.num_users());
    let filter = CollaborativeFilter::with_config(matrix, config.recommend);

    let report = RecommendReport {
        neighbors: filter.find_neighbors(args.user)?,
        items: args
            .items
            .map(|limit| filter.recommend_items(args.user, limit))
            .transpose()?,
    };

    output_result("Neighbours", &report, cli_args)
}

/// Filter items and count facets.
fn facets(args: &FacetsArgs, config: DiscoveryConfig, cli_args: &FalcataArgs) -> Result<()> {
    let content = fs::read_to_string(&args.items_file)?;
    let items: Vec<Record> = serde_json::from_str(&content)?;
    info!("loaded {} items", items.len());

    let mut filters = FilterSet::new();
    for filter in &args.filters {
        let (field, value) = parse_filter(filter)?;
        filters.insert(field, value);
    }
    let definitions: Vec<FacetDefinition> =
        args.facets.iter().map(|spec| FacetDefinition::parse(spec)).collect();

    let response: FacetedSearchResponse = FacetedSearch::with_config(definitions, config.facets)
        .search(&args.query, &filters, &items);

    output_result("Faceted search", &response, cli_args)
}

/// Read a terms file: `term [frequency]` per line; a missing frequency
/// counts as 1.
pub fn load_terms<P: AsRef<Path>>(path: P) -> Result<Vec<Term>> {
    let content = fs::read_to_string(path.as_ref())?;
    let mut terms = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_frequency_line(trimmed) {
            Some((term, frequency)) => terms.push(Term::new(term, frequency)),
            None if !trimmed.contains(char::is_whitespace) => terms.push(Term::new(trimmed, 1)),
            None => {
                return Err(FalcataError::invalid_argument(format!(
                    "{}:{}: expected \"term [frequency]\", got {trimmed:?}",
                    path.as_ref().display(),
                    line_num + 1
                )));
            }
        }
    }

    debug!("read {} terms from {}", terms.len(), path.as_ref().display());
    Ok(terms)
}

/// Read non-empty, trimmed lines.
pub fn load_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse `field=value`. The value is read as JSON when possible so that
/// `count=3` and `in_stock=true` match numbers and booleans; anything else
/// is a string.
pub fn parse_filter(spec: &str) -> Result<(String, Value)> {
    let (field, raw) = spec.split_once('=').ok_or_else(|| {
        FalcataError::invalid_argument(format!("filter must look like field=value, got {spec:?}"))
    })?;
    if field.is_empty() {
        return Err(FalcataError::invalid_argument(format!(
            "filter has an empty field name: {spec:?}"
        )));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}
