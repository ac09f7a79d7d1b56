//! Command line argument parsing for Falcata CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::vector::SimilarityMetric;

/// Falcata - in-memory autocomplete, fuzzy matching, semantic search,
/// recommendation and facets
#[derive(Parser, Debug, Clone)]
#[command(name = "falcata")]
#[command(about = "An in-memory search and discovery toolkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Falcata Contributors")]
#[command(long_about = None)]
pub struct FalcataArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// JSON configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", env = "FALCATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FalcataArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Complete a prefix from a terms file
    Complete(CompleteArgs),

    /// Rank candidates by edit distance to a query
    Fuzzy(FuzzyArgs),

    /// Suggest spelling corrections from a dictionary
    Spell(SpellArgs),

    /// Rank an embedding corpus against a query vector
    Semantic(SemanticArgs),

    /// Find similar users and recommend items
    Recommend(RecommendArgs),

    /// Filter items and count facet values
    Facets(FacetsArgs),
}

/// Arguments for prefix completion
#[derive(Parser, Debug, Clone)]
pub struct CompleteArgs {
    /// Terms file with one "term [frequency]" per line
    #[arg(value_name = "TERMS_FILE")]
    pub terms_file: PathBuf,

    /// Prefix to complete
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Maximum number of completions
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Rank by frequency instead of alphabetically
    #[arg(long)]
    pub by_frequency: bool,
}

/// Arguments for fuzzy matching
#[derive(Parser, Debug, Clone)]
pub struct FuzzyArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Candidates file with one candidate per line
    #[arg(value_name = "CANDIDATES_FILE")]
    pub candidates_file: PathBuf,

    /// Exclusive maximum edit distance
    #[arg(short, long)]
    pub threshold: Option<usize>,
}

/// Arguments for spelling suggestions
#[derive(Parser, Debug, Clone)]
pub struct SpellArgs {
    /// Dictionary file with one "word frequency" per line
    #[arg(value_name = "DICTIONARY_FILE")]
    pub dictionary_file: PathBuf,

    /// Word to check
    #[arg(value_name = "WORD")]
    pub word: String,

    /// Maximum edit distance (inclusive)
    #[arg(long)]
    pub max_distance: Option<usize>,
}

/// Arguments for semantic search
#[derive(Parser, Debug, Clone)]
pub struct SemanticArgs {
    /// JSON array of {"id": ..., "embedding": [...]} objects
    #[arg(value_name = "CORPUS_FILE")]
    pub corpus_file: PathBuf,

    /// Query embedding (comma-separated)
    #[arg(
        long,
        required = true,
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub query: Vec<f32>,

    /// Number of results
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Arguments for collaborative filtering
#[derive(Parser, Debug, Clone)]
pub struct RecommendArgs {
    /// JSON array of rating rows
    #[arg(value_name = "MATRIX_FILE")]
    pub matrix_file: PathBuf,

    /// Index of the target user
    #[arg(value_name = "USER")]
    pub user: usize,

    /// Number of neighbours
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Neighbour similarity metric
    #[arg(short, long)]
    pub metric: Option<MetricArg>,

    /// Also recommend up to this many unrated items
    #[arg(long, value_name = "N")]
    pub items: Option<usize>,
}

/// Arguments for faceted search
#[derive(Parser, Debug, Clone)]
pub struct FacetsArgs {
    /// JSON array of item objects
    #[arg(value_name = "ITEMS_FILE")]
    pub items_file: PathBuf,

    /// Query text echoed in the response
    #[arg(long, default_value = "")]
    pub query: String,

    /// Equality filter as field=value (repeatable)
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Facet as name:field or field (repeatable)
    #[arg(long = "facet", value_name = "NAME:FIELD")]
    pub facets: Vec<String>,
}

/// Similarity metrics selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricArg {
    /// Mean-centered, normalized by the sum of norms
    Simplified,
    /// Textbook Pearson correlation
    Pearson,
    /// Cosine similarity
    Cosine,
}

impl From<MetricArg> for SimilarityMetric {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::Simplified => SimilarityMetric::Simplified,
            MetricArg::Pearson => SimilarityMetric::Pearson,
            MetricArg::Cosine => SimilarityMetric::Cosine,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
