use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use kbrag_core::corpus::Corpus;
use kbrag_core::traits::VectorSearcher;
use kbrag_core::types::{CategoryFilter, DocId, SearchHit};
use kbrag_text::{Analyzer, InvertedIndex};

use crate::scoring;
use crate::vocab::Vocabulary;

/// Lexical vector strategy: one unit-length TF-IDF vector per document,
/// scored against the query by cosine similarity.
pub struct TfIdfIndex {
    analyzer: Arc<Analyzer>,
    vocabulary: Vocabulary,
    vectors: Vec<Vec<f32>>,
    categories: Vec<String>,
}

impl TfIdfIndex {
    pub fn build(corpus: &Corpus, analyzer: Arc<Analyzer>) -> Self {
        let index = InvertedIndex::build(corpus, &analyzer);
        Self::build_with_index(corpus, analyzer, &index)
    }

    /// Build over a keyword index already made from the same corpus; its keys
    /// join the vocabulary.
    #[instrument(skip_all, fields(documents = corpus.len()))]
    pub fn build_with_index(corpus: &Corpus, analyzer: Arc<Analyzer>, index: &InvertedIndex) -> Self {
        let streams: Vec<Vec<String>> =
            corpus.entries().par_iter().map(|e| analyzer.vector_terms(&e.full_text())).collect();
        let vocabulary = Vocabulary::build_with_keys(&streams, index.terms());
        let vectors: Vec<Vec<f32>> = streams.par_iter().map(|terms| vocabulary.weigh(terms)).collect();
        let empty = vectors.iter().filter(|v| v.iter().all(|x| *x == 0.0)).count();
        info!(documents = vectors.len(), vocabulary = vocabulary.len(), zero_vectors = empty, "tf-idf index built");
        let categories = corpus.entries().iter().map(|e| e.category.clone()).collect();
        Self { analyzer, vocabulary, vectors, categories }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn document_vector(&self, id: DocId) -> Option<&[f32]> {
        self.vectors.get(id.0).map(Vec::as_slice)
    }

    /// Query vector in the document space; zero when no query term is known.
    pub fn vectorize(&self, query: &str) -> Vec<f32> {
        self.vocabulary.weigh(&self.analyzer.vector_terms(query))
    }
}

impl VectorSearcher for TfIdfIndex {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    #[instrument(skip_all, fields(query_len = query.len(), top_k = top_k))]
    fn search_vector(&self, query: &str, top_k: usize, filter: Option<&CategoryFilter>) -> Vec<SearchHit> {
        let q = self.vectorize(query);
        let hits = scoring::rank(&q, &self.vectors, &self.categories, top_k, filter);
        debug!(candidates = hits.len(), "tf-idf search");
        hits
    }
}
