use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::retrievers::RetrieverError;
use crate::schemas::{Document, Retriever};

/// BM25 parameters
#[derive(Debug, Clone)]
pub struct BM25Params {
    /// k1 parameter (term frequency saturation)
    pub k1: f64,
    /// b parameter (length normalization)
    pub b: f64,
}

impl Default for BM25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Configuration for BM25 retriever
#[derive(Debug, Clone)]
pub struct BM25RetrieverConfig {
    pub params: BM25Params,
    /// Maximum number of documents to return
    pub top_k: usize,
}

impl Default for BM25RetrieverConfig {
    fn default() -> Self {
        Self {
            params: BM25Params::default(),
            top_k: 3,
        }
    }
}

/// BM25 retriever over an in-memory set of chunks.
///
/// Like a nearest-neighbour search it always answers with up to `top_k`
/// documents: when fewer chunks match the query, the remainder is filled with
/// unmatched chunks in index order.
#[derive(Debug)]
pub struct BM25Retriever {
    config: BM25RetrieverConfig,
    documents: Vec<Document>,
    // term -> (document_id, term_frequency)
    inverted_index: HashMap<String, Vec<(usize, usize)>>,
    doc_lengths: Vec<usize>,
    avg_doc_length: f64,
}

impl BM25Retriever {
    pub fn new(documents: Vec<Document>) -> Self {
        Self::with_config(documents, BM25RetrieverConfig::default())
    }

    pub fn with_config(documents: Vec<Document>, config: BM25RetrieverConfig) -> Self {
        let mut retriever = Self {
            config,
            documents,
            inverted_index: HashMap::new(),
            doc_lengths: Vec::new(),
            avg_doc_length: 0.0,
        };
        retriever.build_index();
        retriever
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn build_index(&mut self) {
        self.inverted_index.clear();
        self.doc_lengths = Vec::with_capacity(self.documents.len());

        for (doc_id, doc) in self.documents.iter().enumerate() {
            let tokens = Self::tokenize(&doc.page_content);
            self.doc_lengths.push(tokens.len());

            let mut term_counts: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *term_counts.entry(token).or_insert(0) += 1;
            }
            for (term, count) in term_counts {
                self.inverted_index
                    .entry(term)
                    .or_default()
                    .push((doc_id, count));
            }
        }

        if !self.documents.is_empty() {
            let total_length: usize = self.doc_lengths.iter().sum();
            self.avg_doc_length = total_length as f64 / self.documents.len() as f64;
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    /// BM25 term score with the non-negative (Lucene) IDF.
    fn bm25_score(&self, doc_freq: usize, doc_id: usize, term_freq: usize) -> f64 {
        let total_docs = self.documents.len() as f64;
        let df = doc_freq as f64;
        let idf = (1.0 + (total_docs - df + 0.5) / (df + 0.5)).ln();

        let doc_length = self.doc_lengths[doc_id] as f64;
        let tf = term_freq as f64;
        let (k1, b) = (self.config.params.k1, self.config.params.b);
        let avg = if self.avg_doc_length > 0.0 {
            self.avg_doc_length
        } else {
            1.0
        };

        idf * tf * (k1 + 1.0) / (tf + k1 * (1.0 - b + b * doc_length / avg))
    }

    /// Rank documents for `query`, best first, as `(doc_id, score)`.
    pub fn rank(&self, query: &str) -> Vec<(usize, f64)> {
        let mut doc_scores: HashMap<usize, f64> = HashMap::new();
        for term in Self::tokenize(query) {
            if let Some(postings) = self.inverted_index.get(&term) {
                for &(doc_id, term_freq) in postings {
                    *doc_scores.entry(doc_id).or_insert(0.0) +=
                        self.bm25_score(postings.len(), doc_id, term_freq);
                }
            }
        }

        let mut scored: Vec<(usize, f64)> = doc_scores.into_iter().collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored
    }
}

#[async_trait]
impl Retriever for BM25Retriever {
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, RetrieverError> {
        let mut ranked = self.rank(query);
        ranked.truncate(self.config.top_k);

        if ranked.len() < self.config.top_k {
            let filler: Vec<(usize, f64)> = (0..self.documents.len())
                .filter(|id| !ranked.iter().any(|(r, _)| r == id))
                .take(self.config.top_k - ranked.len())
                .map(|id| (id, 0.0))
                .collect();
            ranked.extend(filler);
        }

        Ok(ranked
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.documents.get(doc_id).map(|doc| {
                    let mut doc = doc.clone();
                    doc.metadata
                        .insert("bm25_score".to_string(), Value::from(score));
                    doc
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Document> {
        vec![
            Document::new("The borrow checker enforces ownership rules."),
            Document::new("Cargo is the Rust package manager and build tool."),
            Document::new("Rust was first announced by Mozilla in 2010."),
            Document::new("Graydon Hoare started Rust as a personal project."),
        ]
    }

    #[tokio::test]
    async fn test_best_match_first() {
        let retriever = BM25Retriever::new(docs());
        let results = retriever
            .get_relevant_documents("who announced rust at mozilla")
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].page_content.contains("Mozilla"));
    }

    #[tokio::test]
    async fn test_unmatched_query_still_fills_top_k() {
        let retriever = BM25Retriever::new(docs()).with_top_k(2);
        let results = retriever.get_relevant_documents("zebra").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].page_content, docs()[0].page_content);
    }

    #[test]
    fn test_single_document_scores_positive() {
        let retriever = BM25Retriever::new(vec![Document::new("rust rust language")]);
        let ranked = retriever.rank("rust");
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].1 > 0.0);
    }
}
