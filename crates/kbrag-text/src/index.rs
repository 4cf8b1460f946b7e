use std::collections::{BTreeSet, HashMap};
use tracing::info;

use kbrag_core::corpus::Corpus;
use kbrag_core::types::DocId;

use crate::analyzer::Analyzer;

/// Token → documents map built once per corpus snapshot.
///
/// Each document is registered under the distinct tokens of both the
/// unstemmed and the stemmed stream of `question + " " + answer`. Synonyms
/// are never indexed; they are applied on the query side only.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
    questions: Vec<String>,
    categories: Vec<String>,
}

impl InvertedIndex {
    pub fn build(corpus: &Corpus, analyzer: &Analyzer) -> Self {
        let mut postings: HashMap<String, Vec<DocId>> = HashMap::new();
        let mut questions = Vec::with_capacity(corpus.len());
        let mut categories = Vec::with_capacity(corpus.len());
        for (id, entry) in corpus.iter() {
            let text = entry.full_text();
            let mut terms: BTreeSet<String> = analyzer.normalize(&text, false).into_iter().collect();
            terms.extend(analyzer.normalize(&text, true));
            // Documents arrive in id order, so every posting list stays sorted.
            for term in terms {
                postings.entry(term).or_default().push(id);
            }
            questions.push(analyzer.normalize_text(&entry.question));
            categories.push(entry.category.clone());
        }
        info!(documents = corpus.len(), terms = postings.len(), "inverted index built");
        Self { postings, questions, categories }
    }

    /// Documents containing `token`, ascending by id.
    pub fn lookup(&self, token: &str) -> &[DocId] {
        self.postings.get(token).map_or(&[], Vec::as_slice)
    }

    /// Every indexed token, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    /// Number of distinct indexed tokens.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn doc_count(&self) -> usize {
        self.questions.len()
    }

    /// Normalized question text of a document (stopwords kept).
    pub fn question(&self, id: DocId) -> &str {
        self.questions.get(id.0).map_or("", String::as_str)
    }

    pub fn category(&self, id: DocId) -> &str {
        self.categories.get(id.0).map_or("", String::as_str)
    }
}
