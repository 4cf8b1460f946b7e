use crate::normalize;
use crate::stemmer::Stemmer;
use crate::synonyms::SynonymTable;

/// Default cap on synonyms appended per token.
pub const DEFAULT_MAX_SYNONYMS: usize = 3;

/// Text pipeline shared by the inverted index, the keyword searcher and the
/// TF-IDF vectorizer so all of them see identical tokens.
#[derive(Debug, Clone)]
pub struct Analyzer {
    stemmer: Stemmer,
    synonyms: SynonymTable,
    max_synonyms: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Stemmer::default(), SynonymTable::default(), DEFAULT_MAX_SYNONYMS)
    }
}

impl Analyzer {
    pub fn new(stemmer: Stemmer, synonyms: SynonymTable, max_synonyms: usize) -> Self {
        Self { stemmer, synonyms, max_synonyms }
    }

    pub fn with_max_synonyms(mut self, max_synonyms: usize) -> Self {
        self.max_synonyms = max_synonyms;
        self
    }

    pub fn stemmer(&self) -> &Stemmer {
        &self.stemmer
    }

    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token)
    }

    /// Normalized content tokens, optionally stemmed.
    pub fn normalize(&self, text: &str, stem: bool) -> Vec<String> {
        let tokens = normalize::tokenize(text);
        if stem {
            tokens.iter().map(|t| self.stemmer.stem(t)).collect()
        } else {
            tokens
        }
    }

    /// Normalized text with stopwords kept, for substring checks.
    pub fn normalize_text(&self, text: &str) -> String {
        normalize::normalize_text(text)
    }

    /// Synonyms of a normalized token, capped at the configured fan-out.
    pub fn synonyms_of(&self, token: &str) -> &[String] {
        self.synonyms.related(token, self.max_synonyms)
    }

    pub fn expand(&self, tokens: &[String]) -> Vec<String> {
        self.synonyms.expand(tokens, self.max_synonyms)
    }

    /// Term stream used for TF-IDF vectors: normalize, expand, then stem.
    /// Documents and queries both go through this so the spaces match.
    pub fn vector_terms(&self, text: &str) -> Vec<String> {
        self.expand(&self.normalize(text, false)).iter().map(|t| self.stemmer.stem(t)).collect()
    }
}
