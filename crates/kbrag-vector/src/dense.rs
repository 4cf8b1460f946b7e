//! Embedding-backed vector strategy.
//!
//! Documents and queries are folded through the same normalizer as the
//! lexical path before embedding, so accents and punctuation never split
//! a term into two hashes.

use tracing::{info, instrument, warn};

use kbrag_core::corpus::Corpus;
use kbrag_core::error::{Error, Result};
use kbrag_core::traits::{Embedder, VectorSearcher};
use kbrag_core::types::{CategoryFilter, SearchHit};
use kbrag_text::normalize::normalize_text;

use crate::scoring;

pub struct DenseIndex<E: Embedder> {
    embedder: E,
    vectors: Vec<Vec<f32>>,
    categories: Vec<String>,
}

impl<E: Embedder> DenseIndex<E> {
    /// Embed every document. Fails if the embedder errors or returns vectors
    /// of the wrong count or width.
    pub fn build(corpus: &Corpus, embedder: E) -> Result<Self> {
        let texts: Vec<String> = corpus.entries().iter().map(|e| normalize_text(&e.full_text())).collect();
        let vectors = embedder.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!("expected {} vectors, got {}", texts.len(), vectors.len())));
        }
        if let Some(bad) = vectors.iter().position(|v| v.len() != embedder.dim()) {
            return Err(Error::Embedding(format!("vector for document #{bad} has width {}, expected {}", vectors[bad].len(), embedder.dim())));
        }
        info!(documents = vectors.len(), dim = embedder.dim(), "dense index built");
        let categories = corpus.entries().iter().map(|e| e.category.clone()).collect();
        Ok(Self { embedder, vectors, categories })
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    fn embed_query(&self, query: &str) -> Vec<f32> {
        match self.embedder.embed_batch(&[normalize_text(query)]) {
            Ok(mut v) if v.len() == 1 && v[0].len() == self.embedder.dim() => v.remove(0),
            Ok(v) => {
                warn!(vectors = v.len(), "embedder returned an unexpected shape; scoring as zero");
                vec![0.0; self.embedder.dim()]
            }
            Err(e) => {
                warn!(error = %e, "query embedding failed; scoring as zero");
                vec![0.0; self.embedder.dim()]
            }
        }
    }
}

impl<E: Embedder> VectorSearcher for DenseIndex<E> {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn dimensions(&self) -> usize {
        self.embedder.dim()
    }

    #[instrument(skip_all, fields(query_len = query.len(), top_k = top_k))]
    fn search_vector(&self, query: &str, top_k: usize, filter: Option<&CategoryFilter>) -> Vec<SearchHit> {
        let q = self.embed_query(query);
        scoring::rank(&q, &self.vectors, &self.categories, top_k, filter)
    }
}
