//! Embedding-based semantic ranking.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FalcataError, Result};
use crate::vector::similarity::cosine_similarity;

/// A document identifier with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub embedding: Vec<f32>,
}

impl Document {
    pub fn new<S: Into<String>>(id: S, embedding: Vec<f32>) -> Self {
        Document {
            id: id.into(),
            embedding,
        }
    }

    /// Get the dimensionality of the embedding.
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// Insertion-ordered embedding store in which every vector has the same
/// dimension.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingCorpus {
    documents: Vec<Document>,
    positions: AHashMap<String, usize>,
}

impl EmbeddingCorpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from documents, rejecting mixed dimensions.
    pub fn from_documents<I: IntoIterator<Item = Document>>(documents: I) -> Result<Self> {
        let mut corpus = EmbeddingCorpus::new();
        for document in documents {
            corpus.add(document)?;
        }
        Ok(corpus)
    }

    /// Load a JSON array of `{"id": ..., "embedding": [...]}` objects.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let documents: Vec<Document> = serde_json::from_str(&content)?;
        let corpus = Self::from_documents(documents)?;
        debug!(
            "loaded {} embeddings from {}",
            corpus.len(),
            path.as_ref().display()
        );
        Ok(corpus)
    }

    /// Add a document.
    ///
    /// Re-adding an existing id replaces its embedding but keeps its original
    /// position, so tie-breaking by insertion order is unaffected.
    pub fn add(&mut self, document: Document) -> Result<()> {
        if let Some(expected) = self.dimension()
            && document.dimension() != expected
        {
            return Err(FalcataError::dimension_mismatch(
                expected,
                document.dimension(),
            ));
        }

        match self.positions.get(&document.id) {
            Some(&position) => self.documents[position] = document,
            None => {
                self.positions
                    .insert(document.id.clone(), self.documents.len());
                self.documents.push(document);
            }
        }
        Ok(())
    }

    /// Look up a document's embedding by id.
    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.positions
            .get(id)
            .map(|&position| self.documents[position].embedding.as_slice())
    }

    /// Shared dimension of the corpus, `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.documents.first().map(Document::dimension)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticHit {
    pub document_id: String,
    pub similarity: f32,
}

/// Ranked documents for a query embedding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchResult {
    /// Hits ordered by descending similarity.
    pub results: Vec<SemanticHit>,
    /// Mean similarity over `results`, 0 when empty.
    pub avg_similarity: f32,
    /// Number of documents scored.
    pub total_searched: usize,
}

/// Rank `corpus` by cosine similarity to `query` and keep the best `top_k`.
///
/// Every document must have the query's dimension and only finite
/// components; otherwise the whole call fails before anything is scored.
/// Documents with equal similarity keep their corpus order.
pub fn semantic_search(
    query: &[f32],
    corpus: &[Document],
    top_k: usize,
) -> Result<SemanticSearchResult> {
    semantic_search_with_floor(query, corpus, top_k, None)
}

fn semantic_search_with_floor(
    query: &[f32],
    corpus: &[Document],
    top_k: usize,
    min_similarity: Option<f32>,
) -> Result<SemanticSearchResult> {
    if let Some(document) = corpus.iter().find(|d| d.dimension() != query.len()) {
        return Err(FalcataError::invalid_argument(format!(
            "Vector dimension mismatch: query has {}, document {:?} has {}",
            query.len(),
            document.id,
            document.dimension()
        )));
    }

    if let Some(document) = corpus
        .iter()
        .find(|d| d.embedding.iter().any(|x| !x.is_finite()))
    {
        return Err(FalcataError::invalid_argument(format!(
            "document {:?} has a non-finite embedding component",
            document.id
        )));
    }
    if query.iter().any(|x| !x.is_finite()) {
        return Err(FalcataError::invalid_argument(
            "query embedding has a non-finite component",
        ));
    }

    // Indexed parallel iterators collect in input order.
    let mut results: Vec<SemanticHit> = corpus
        .par_iter()
        .map(|document| SemanticHit {
            document_id: document.id.clone(),
            similarity: cosine_similarity(query, &document.embedding),
        })
        .collect();

    if let Some(floor) = min_similarity {
        results.retain(|hit| hit.similarity >= floor);
    }

    // stable sort, descending
    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    results.truncate(top_k);

    let avg_similarity = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|hit| hit.similarity).sum::<f32>() / results.len() as f32
    };

    debug!(
        "semantic search dimension={} corpus={} top_k={} returned={}",
        query.len(),
        corpus.len(),
        top_k,
        results.len()
    );

    Ok(SemanticSearchResult {
        results,
        avg_similarity,
        total_searched: corpus.len(),
    })
}

/// Configuration for semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Number of results returned by [`SemanticSearchEngine::search_default`].
    pub top_k: usize,
    /// Drop hits below this similarity before truncating.
    pub min_similarity: Option<f32>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        SemanticConfig {
            top_k: 10,
            min_similarity: None,
        }
    }
}

/// Semantic search over an owned [`EmbeddingCorpus`].
#[derive(Debug, Clone, Default)]
pub struct SemanticSearchEngine {
    corpus: EmbeddingCorpus,
    config: SemanticConfig,
}

impl SemanticSearchEngine {
    pub fn new(corpus: EmbeddingCorpus) -> Self {
        Self::with_config(corpus, SemanticConfig::default())
    }

    pub fn with_config(corpus: EmbeddingCorpus, config: SemanticConfig) -> Self {
        SemanticSearchEngine { corpus, config }
    }

    /// Add a document to the corpus.
    pub fn add_document(&mut self, document: Document) -> Result<()> {
        self.corpus.add(document)
    }

    pub fn corpus(&self) -> &EmbeddingCorpus {
        &self.corpus
    }

    /// Rank the corpus against `query`.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<SemanticSearchResult> {
        if let Some(expected) = self.corpus.dimension()
            && query.len() != expected
        {
            return Err(FalcataError::dimension_mismatch(expected, query.len()));
        }

        semantic_search_with_floor(
            query,
            self.corpus.documents(),
            top_k,
            self.config.min_similarity,
        )
    }

    /// Rank the corpus with the configured `top_k`.
    pub fn search_default(&self, query: &[f32]) -> Result<SemanticSearchResult> {
        self.search(query, self.config.top_k)
    }
}
