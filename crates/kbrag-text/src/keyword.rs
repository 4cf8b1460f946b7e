//! Weighted keyword search over the inverted index.
//!
//! Query tokens (unstemmed ∪ stemmed) are "direct"; synonyms reached only
//! through expansion are "indirect" and weigh less. High-value domain terms
//! get a multiplier, documents whose question mentions the query get a
//! per-match boost, and the result is normalized so the best hit is 1.0.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

use kbrag_core::config::RankingWeights;
use kbrag_core::corpus::Corpus;
use kbrag_core::types::{passes, CategoryFilter, DocId, SearchHit, SourceKind};

use crate::analyzer::Analyzer;
use crate::index::InvertedIndex;

/// Terms whose matches carry extra weight: potency, pregnancy,
/// cardiovascular and price vocabulary.
const HIGH_VALUE_TERMS: &[&str] = &[
    "concentracion", "concentrado", "potente", "potencia", "embarazo", "embarazada", "gestacion", "cardiovascular",
    "corazon", "cardiaco", "precio", "caro", "costo", "costoso", "barato", "economico",
];

pub struct KeywordIndex {
    index: InvertedIndex,
    analyzer: Arc<Analyzer>,
    high_value: HashSet<String>,
    weights: RankingWeights,
}

impl KeywordIndex {
    pub fn build(corpus: &Corpus, analyzer: Arc<Analyzer>, weights: RankingWeights) -> Self {
        let index = InvertedIndex::build(corpus, &analyzer);
        let high_value = HIGH_VALUE_TERMS.iter().flat_map(|t| [(*t).to_string(), analyzer.stem(t)]).collect();
        Self { index, analyzer, high_value, weights }
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn is_high_value(&self, token: &str) -> bool {
        self.high_value.contains(token)
    }

    /// Top `top_k` documents by normalized keyword score. Documents with no
    /// matching token are omitted; ties keep corpus order.
    #[instrument(skip_all, fields(query_len = query.len(), top_k = top_k))]
    pub fn search_keywords(&self, query: &str, top_k: usize, filter: Option<&CategoryFilter>) -> Vec<SearchHit> {
        if top_k == 0 {
            return Vec::new();
        }
        let mut direct: BTreeSet<String> = self.analyzer.normalize(query, false).into_iter().collect();
        direct.extend(self.analyzer.normalize(query, true));
        if direct.is_empty() {
            return Vec::new();
        }
        let indirect: BTreeSet<String> = direct
            .iter()
            .flat_map(|t| self.analyzer.synonyms_of(t).iter())
            .filter(|s| !direct.contains(s.as_str()))
            .cloned()
            .collect();

        let n = self.index.doc_count();
        let mut scores = vec![0.0f32; n];
        let mut matched = vec![false; n];
        let weighted = direct.iter().map(|t| (t, self.weights.direct)).chain(indirect.iter().map(|t| (t, self.weights.indirect)));
        for (token, base) in weighted {
            let weight = if self.is_high_value(token) { base * self.weights.high_value } else { base };
            for &id in self.index.lookup(token) {
                if !passes(filter, self.index.category(id)) {
                    continue;
                }
                scores[id.0] += weight;
                matched[id.0] = true;
            }
        }

        let boost_tokens: Vec<&String> =
            direct.iter().filter(|t| t.chars().count() > self.weights.question_boost_min_len).collect();
        for (i, score) in scores.iter_mut().enumerate() {
            if !matched[i] {
                continue;
            }
            let question = self.index.question(DocId(i));
            let hits = boost_tokens.iter().filter(|t| question.contains(t.as_str())).count();
            if hits > 0 {
                *score *= 1.0 + self.weights.question_boost * hits as f32;
            }
        }

        let max = scores.iter().zip(&matched).filter(|(_, m)| **m).map(|(s, _)| *s).fold(0.0f32, f32::max);
        if max <= 0.0 {
            return Vec::new();
        }
        let mut hits: Vec<SearchHit> = scores
            .iter()
            .enumerate()
            .filter(|(i, _)| matched[*i])
            .map(|(i, s)| SearchHit { id: DocId(i), score: s / max, source: SourceKind::Keyword })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        debug!(direct = direct.len(), indirect = indirect.len(), matched = hits.len(), "keyword search");
        hits.truncate(top_k);
        hits
    }
}
