use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Wrap an already-assembled figment (tests, embedding applications).
    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed `[retrieval]` section; absent keys fall back to defaults.
    pub fn retrieval(&self) -> anyhow::Result<RetrievalSettings> {
        if self.figment.find_value("retrieval").is_err() {
            return Ok(RetrievalSettings::default());
        }
        self.get("retrieval")
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.retrieval()?;
        if settings.default_top_k == 0 {
            anyhow::bail!("retrieval.default_top_k must be at least 1");
        }
        if settings.backend == VectorBackend::Dense && settings.embedding_dim == 0 {
            anyhow::bail!("retrieval.embedding_dim must be positive for the dense backend");
        }
        let w = &settings.weights;
        if w.vector < 0.0 || w.keyword < 0.0 {
            anyhow::bail!("retrieval.weights fusion weights must be non-negative");
        }
        Ok(())
    }
}

/// Which engine scores the vector half of the hybrid ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    #[default]
    Tfidf,
    Dense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub corpus_path: String,
    pub default_top_k: usize,
    /// Results below this score are not handed to the caller as context.
    pub min_score: f32,
    /// Results at or above this score count as strong evidence.
    pub strong_score: f32,
    /// A category-scoped search whose best hit is below this score is
    /// retried over the whole corpus.
    pub fallback_min_score: f32,
    pub backend: VectorBackend,
    pub embedding_dim: usize,
    pub weights: RankingWeights,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            corpus_path: "knowledge_base.json".to_string(),
            default_top_k: 5,
            min_score: 0.1,
            strong_score: 0.35,
            fallback_min_score: 0.1,
            backend: VectorBackend::Tfidf,
            embedding_dim: 256,
            weights: RankingWeights::default(),
        }
    }
}

impl RetrievalSettings {
    /// Corpus location with `~`/env vars expanded, relative to `base`.
    pub fn corpus_path_from(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.corpus_path)
    }
}

/// Empirically tuned ranking constants.
///
/// Defaults reproduce the production tuning; treat them as knobs, not as
/// derived weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Keyword weight of a token taken from the query itself.
    pub direct: f32,
    /// Keyword weight of a token reached only through a synonym.
    pub indirect: f32,
    /// Multiplier for high-value domain terms.
    pub high_value: f32,
    /// Per-match increment of the question-field boost.
    pub question_boost: f32,
    /// Direct tokens must be longer than this to count for the question boost.
    pub question_boost_min_len: usize,
    /// Maximum synonyms appended per token.
    pub max_synonyms: usize,
    pub vector: f32,
    pub keyword: f32,
    /// Multiplier when a document's category matches the detected intent.
    pub intent_boost: f32,
    pub concentration_question_factor: f32,
    pub concentration_question_floor: f32,
    pub concentrate_question_factor: f32,
    pub concentrate_question_floor: f32,
    pub concentration_answer_factor: f32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            direct: 2.0,
            indirect: 1.0,
            high_value: 1.5,
            question_boost: 0.3,
            question_boost_min_len: 3,
            max_synonyms: 3,
            vector: 0.6,
            keyword: 0.4,
            intent_boost: 1.2,
            concentration_question_factor: 4.0,
            concentration_question_floor: 0.5,
            concentrate_question_factor: 3.0,
            concentrate_question_floor: 0.4,
            concentration_answer_factor: 2.0,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
