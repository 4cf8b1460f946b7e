//! Shared vocabulary and IDF table for TF-IDF vectors.
//!
//! `idf(t) = ln(N / (df(t) + 1))`. Terms present in every document (or in
//! all but one) get a zero or negative weight, which down-weights them.
//!
//! Positions also cover the keyword index keys, so every indexed token has
//! a slot. Keys that never occur in a vector term stream have `df = 0` and
//! are skipped when weighing, so they never move a score.

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    positions: HashMap<String, usize>,
    idf: Vec<f64>,
    df: Vec<usize>,
    doc_count: usize,
}

impl Vocabulary {
    /// Build from one term stream per document. Positions follow sorted
    /// token order so two builds over the same corpus are identical.
    pub fn build(streams: &[Vec<String>]) -> Self {
        Self::build_with_keys(streams, std::iter::empty())
    }

    /// Like [`Vocabulary::build`], with extra `keys` given positions too.
    pub fn build_with_keys<'a, I>(streams: &'a [Vec<String>], keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut sorted: BTreeSet<&str> = streams.iter().flatten().map(String::as_str).collect();
        sorted.extend(keys);
        let positions: HashMap<String, usize> =
            sorted.into_iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect();

        let mut df = vec![0usize; positions.len()];
        for stream in streams {
            let distinct: BTreeSet<usize> = stream.iter().filter_map(|t| positions.get(t).copied()).collect();
            for pos in distinct {
                df[pos] += 1;
            }
        }
        let n = streams.len() as f64;
        let idf = df.iter().map(|d| (n / (*d as f64 + 1.0)).ln()).collect();
        Self { positions, idf, df, doc_count: streams.len() }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    pub fn position(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.position(term).map(|p| self.idf[p])
    }

    /// Documents whose vector term stream contains `term`.
    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.position(term).map(|p| self.df[p])
    }

    /// TF-IDF vector of a term stream, L2-normalized. Out-of-vocabulary and
    /// index-only terms are ignored; a stream with no weight left yields the
    /// zero vector.
    pub fn weigh(&self, terms: &[String]) -> Vec<f32> {
        let mut tf = vec![0f64; self.len()];
        for pos in terms.iter().filter_map(|t| self.position(t)).filter(|p| self.df[*p] > 0) {
            tf[pos] += 1.0;
        }
        let weighted: Vec<f64> = tf.iter().zip(&self.idf).map(|(f, w)| f * w).collect();
        let norm = weighted.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            return vec![0.0; self.len()];
        }
        weighted.iter().map(|x| (x / norm) as f32).collect()
    }
}
