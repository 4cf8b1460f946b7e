use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use kbrag_core::config::{Config, RetrievalSettings, VectorBackend};
use kbrag_core::corpus::Corpus;
use kbrag_core::error::Result;
use kbrag_core::traits::VectorSearcher;
use kbrag_core::types::{CategoryFilter, Ranked, SearchHit};
use kbrag_embed::get_default_embedder;
use kbrag_text::{Analyzer, KeywordIndex};
use kbrag_vector::{DenseIndex, TfIdfIndex};

use crate::intent::IntentDetector;
use crate::ranker::Ranker;
use crate::routing::{self, BusinessCategory};

/// Snapshot summary for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub documents: usize,
    /// Width of the vector space (TF-IDF vocabulary or embedding dim).
    pub vocabulary: usize,
    /// Distinct inverted-index keys.
    pub index_terms: usize,
    pub categories: usize,
    pub backend: &'static str,
}

/// Hybrid retrieval over one immutable corpus snapshot.
///
/// Every structure is built in [`RetrievalEngine::build`]; queries only
/// read, so a shared `&RetrievalEngine` serves any number of threads.
pub struct RetrievalEngine {
    corpus: Corpus,
    settings: RetrievalSettings,
    keyword: KeywordIndex,
    vector: Box<dyn VectorSearcher>,
    intents: IntentDetector,
    ranker: Ranker,
    categories: BTreeSet<String>,
}

impl RetrievalEngine {
    #[instrument(skip_all, fields(documents = corpus.len(), backend = ?settings.backend))]
    pub fn build(corpus: Corpus, settings: RetrievalSettings) -> Result<Self> {
        let analyzer = Arc::new(Analyzer::default().with_max_synonyms(settings.weights.max_synonyms));
        let keyword = KeywordIndex::build(&corpus, Arc::clone(&analyzer), settings.weights.clone());
        let vector: Box<dyn VectorSearcher> = match settings.backend {
            VectorBackend::Tfidf => Box::new(TfIdfIndex::build_with_index(&corpus, analyzer, keyword.index())),
            VectorBackend::Dense => Box::new(DenseIndex::build(&corpus, get_default_embedder(settings.embedding_dim)?)?),
        };
        let ranker = Ranker::build(&corpus, settings.weights.clone());
        let categories = corpus.categories();
        info!(
            documents = corpus.len(),
            index_terms = keyword.index().len(),
            dimensions = vector.dimensions(),
            categories = categories.len(),
            backend = vector.name(),
            "retrieval engine ready"
        );
        Ok(Self { corpus, settings, keyword, vector, intents: IntentDetector::default(), ranker, categories })
    }

    /// Load the configured corpus (relative paths resolve against `base`)
    /// and build.
    pub fn from_config(config: &Config, base: &Path) -> anyhow::Result<Self> {
        let settings = config.retrieval()?;
        let path = settings.corpus_path_from(base);
        info!(path = %path.display(), "loading corpus");
        let corpus = Corpus::load(&path)?;
        Ok(Self::build(corpus, settings)?)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    /// Hybrid search. Empty queries and `top_k == 0` return nothing; an
    /// empty filter means no filter.
    #[instrument(skip_all, fields(query_len = query.len(), top_k = top_k))]
    pub fn search(&self, query: &str, top_k: usize, filter: Option<&CategoryFilter>) -> Vec<Ranked<'_>> {
        if top_k == 0 || query.trim().is_empty() || self.corpus.is_empty() {
            return Vec::new();
        }
        let filter = filter.filter(|f| !f.is_empty());
        let n = self.corpus.len();
        let (keyword, vector) = rayon::join(
            || self.keyword.search_keywords(query, n, filter),
            || self.vector.search_vector(query, n, filter),
        );
        let intent = self.intents.detect(query);
        debug!(keyword = keyword.len(), vector = vector.len(), intent = ?intent, "fusing");
        self.ranker
            .rank(&keyword, &vector, intent, &self.intents, filter, top_k)
            .into_iter()
            .filter_map(|hit| self.corpus.get(hit.id).map(|entry| Ranked { id: hit.id, entry, score: hit.score }))
            .collect()
    }

    pub fn search_keywords(&self, query: &str, top_k: usize, filter: Option<&CategoryFilter>) -> Vec<SearchHit> {
        self.keyword.search_keywords(query, top_k, filter)
    }

    pub fn search_vector(&self, query: &str, top_k: usize, filter: Option<&CategoryFilter>) -> Vec<SearchHit> {
        self.vector.search_vector(query, top_k, filter)
    }

    /// Distinct categories of the loaded corpus.
    pub fn get_categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn detect_intent(&self, query: &str) -> Option<&str> {
        self.intents.detect(query)
    }

    pub fn classify_intent_rules(&self, message: &str) -> BusinessCategory {
        routing::classify_intent_rules(message)
    }

    /// Search within an agent's scope, retrying over the whole corpus when
    /// the scoped best score is below `fallback_min_score`.
    pub fn search_for(&self, category: BusinessCategory, query: &str, top_k: usize) -> Vec<Ranked<'_>> {
        let scoped = self.search(query, top_k, Some(&category.scope()));
        match scoped.first() {
            Some(best) if best.score >= self.settings.fallback_min_score => scoped,
            _ => {
                debug!(%category, "scoped search below threshold, retrying unfiltered");
                self.search(query, top_k, None)
            }
        }
    }

    /// Classify the message, then run [`RetrievalEngine::search_for`].
    pub fn search_routed(&self, query: &str, top_k: usize) -> (BusinessCategory, Vec<Ranked<'_>>) {
        let category = self.classify_intent_rules(query);
        (category, self.search_for(category, query, top_k))
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            documents: self.corpus.len(),
            vocabulary: self.vector.dimensions(),
            index_terms: self.keyword.index().len(),
            categories: self.categories.len(),
            backend: self.vector.name(),
        }
    }
}
