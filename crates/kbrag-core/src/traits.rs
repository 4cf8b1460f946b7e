use crate::error::Result;
use crate::types::{CategoryFilter, SearchHit};

/// Dense text encoder used by the embedding-backed vector strategy.
///
/// Implementations must return L2-normalized vectors of length `dim()`.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }
}

/// Vector-similarity half of hybrid retrieval.
///
/// Scoring never fails: degenerate queries produce zero scores.
pub trait VectorSearcher: Send + Sync {
    /// Short backend label for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Width of the document vectors (vocabulary size for TF-IDF).
    fn dimensions(&self) -> usize;

    /// Cosine scores for documents allowed by `filter`, best first, ties in
    /// corpus order, at most `top_k` entries.
    fn search_vector(&self, query: &str, top_k: usize, filter: Option<&CategoryFilter>) -> Vec<SearchHit>;
}
