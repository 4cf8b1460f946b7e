//! Score fusion for the hybrid engine.
//!
//! Every document that passes the category filter is a candidate, so
//! zero-scoring documents still fill the remaining slots. The fused score
//! is `vector * wv + keyword * wk`, then intent boosts and the potency
//! override are applied on top.

use std::cmp::Ordering;

use kbrag_core::config::RankingWeights;
use kbrag_core::corpus::Corpus;
use kbrag_core::types::{passes, CategoryFilter, DocId, SearchHit, SourceKind};
use kbrag_text::normalize::normalize_text;

use crate::intent::{IntentDetector, CONCENTRATION};

const CONCENTRATION_TERM: &str = "concentracion";
const CONCENTRATE_TERMS: &[&str] = &["concentrado", "potente"];

/// Per-document text the ranker inspects directly.
#[derive(Debug, Clone)]
struct DocView {
    category: String,
    question: String,
    answer: String,
}

#[derive(Debug, Clone)]
pub struct Ranker {
    docs: Vec<DocView>,
    weights: RankingWeights,
}

impl Ranker {
    pub fn build(corpus: &Corpus, weights: RankingWeights) -> Self {
        let docs = corpus
            .entries()
            .iter()
            .map(|e| DocView {
                category: e.category.clone(),
                question: normalize_text(&e.question),
                answer: normalize_text(&e.answer),
            })
            .collect();
        Self { docs, weights }
    }

    pub fn fuse(&self, vector: f32, keyword: f32) -> f32 {
        self.weights.vector * vector + self.weights.keyword * keyword
    }

    /// Potency override: a document that states its concentration in the
    /// question is never crowded out by generic relevance.
    pub fn concentration_override(&self, score: f32, question: &str, answer: &str) -> f32 {
        let w = &self.weights;
        if question.contains(CONCENTRATION_TERM) {
            (score * w.concentration_question_factor).max(w.concentration_question_floor)
        } else if CONCENTRATE_TERMS.iter().any(|t| question.contains(t)) {
            (score * w.concentrate_question_factor).max(w.concentrate_question_floor)
        } else if answer.contains(CONCENTRATION_TERM) || CONCENTRATE_TERMS.iter().any(|t| answer.contains(t)) {
            score * w.concentration_answer_factor
        } else {
            score
        }
    }

    /// Fuse both result lists into the final top-`top_k` ranking.
    pub fn rank(
        &self,
        keyword: &[SearchHit],
        vector: &[SearchHit],
        intent: Option<&str>,
        detector: &IntentDetector,
        filter: Option<&CategoryFilter>,
        top_k: usize,
    ) -> Vec<SearchHit> {
        let n = self.docs.len();
        let mut kw = vec![0f32; n];
        let mut vs = vec![0f32; n];
        for hit in keyword.iter().filter(|h| h.id.0 < n) {
            kw[hit.id.0] = hit.score;
        }
        for hit in vector.iter().filter(|h| h.id.0 < n) {
            vs[hit.id.0] = hit.score;
        }

        let mut hits: Vec<SearchHit> = self
            .docs
            .iter()
            .enumerate()
            .filter(|(_, d)| passes(filter, &d.category))
            .map(|(i, doc)| {
                let mut score = self.fuse(vs[i], kw[i]);
                if let Some(label) = intent {
                    if detector.matches_category(label, &doc.category) {
                        score *= self.weights.intent_boost;
                    }
                    if label == CONCENTRATION {
                        score = self.concentration_override(score, &doc.question, &doc.answer);
                    }
                }
                SearchHit { id: DocId(i), score, source: SourceKind::Hybrid }
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(top_k);
        hits.retain(|h| passes(filter, &self.docs[h.id.0].category));
        hits
    }
}
