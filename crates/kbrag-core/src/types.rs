//! Domain types shared by the lexical, vector and hybrid engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Position of an entry in the loaded corpus.
///
/// Stable for the lifetime of a corpus snapshot; a reload assigns fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub usize);

impl DocId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single knowledge-base entry.
///
/// - `question`: the canonical question the entry answers
/// - `answer`: the curated answer text handed to the caller
/// - `category`: fine-grained topic (e.g. `objeciones_precio`)
///
/// Field names also accept the source data's Spanish spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaEntry {
    #[serde(alias = "pregunta")]
    pub question: String,
    #[serde(alias = "respuesta")]
    pub answer: String,
    #[serde(alias = "categoria")]
    pub category: String,
}

impl QaEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, category: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into(), category: category.into() }
    }

    /// Text indexed for the entry: question and answer joined by a space.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }
}

/// Indicates which engine produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Keyword,
    Vector,
    Hybrid,
}

/// The minimal surface returned by every engine.
///
/// `score` is engine-specific but higher is always better. `source` labels
/// the origin engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: DocId,
    pub score: f32,
    pub source: SourceKind,
}

/// A ranked entry borrowed from the engine's corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub id: DocId,
    pub entry: &'a QaEntry,
    pub score: f32,
}

/// Allow-list of corpus categories.
///
/// An empty filter allows everything, matching how callers pass "no
/// categories" to mean "search the whole corpus".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter(BTreeSet<String>);

impl CategoryFilter {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(categories.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn allows(&self, category: &str) -> bool {
        self.0.is_empty() || self.0.contains(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// `true` when no filter is given or the filter allows `category`.
pub fn passes(filter: Option<&CategoryFilter>, category: &str) -> bool {
    filter.map_or(true, |f| f.allows(category))
}
