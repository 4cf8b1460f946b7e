use rayon::prelude::*;
use std::cmp::Ordering;

use kbrag_core::types::{passes, CategoryFilter, DocId, SearchHit, SourceKind};

pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum::<f64>() as f32
}

/// Score every document that passes `filter` against `query`, best first.
/// Rayon's indexed collect keeps corpus order, and the stable sort then
/// keeps it among ties.
pub(crate) fn rank(
    query: &[f32],
    vectors: &[Vec<f32>],
    categories: &[String],
    top_k: usize,
    filter: Option<&CategoryFilter>,
) -> Vec<SearchHit> {
    if top_k == 0 {
        return Vec::new();
    }
    let mut hits: Vec<SearchHit> = vectors
        .par_iter()
        .zip(categories.par_iter())
        .enumerate()
        .filter(|(_, (_, category))| passes(filter, category))
        .map(|(i, (vector, _))| SearchHit {
            id: DocId(i),
            score: dot(query, vector),
            source: SourceKind::Vector,
        })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(top_k);
    hits
}
