//! Suffix-stripping stemmer for Spanish morphology.
//!
//! Deliberately light: one pass over a longest-first suffix list, no
//! recoding rules. Brand and technical vocabulary is protected through an
//! exception set so product names are never truncated.

use std::collections::HashSet;

/// Inflectional and derivational endings, already accent-folded.
const SUFFIXES: &[&str] = &[
    "amientos", "imientos", "aciones", "uciones", "amiento", "imiento", "idades", "ancias", "adoras", "adores",
    "logias", "ismos", "istas", "ables", "ibles", "iendo", "mente", "acion", "ucion", "adora", "ancia", "logia",
    "ador", "idad", "ismo", "ista", "able", "ible", "osas", "osos", "ivas", "ivos", "ando", "ados", "adas", "idos",
    "idas", "osa", "oso", "iva", "ivo", "ada", "ado", "ida", "ido", "ar", "er", "ir", "es", "os", "as", "o", "a",
    "e", "s",
];

/// Brand and technical tokens that must never be stemmed.
const EXCEPTIONS: &[&str] = &[
    "omega", "omega3", "natural", "essential", "complex", "intense", "resolving", "index", "puro", "dha", "epa",
    "rtg", "ifos", "prm", "gmp", "beps", "biopharm", "omia", "triglicerido",
];

/// Tokens shorter than this are returned unchanged.
const MIN_STEM_INPUT: usize = 4;
/// A suffix is only removed if at least this many characters remain.
const MIN_REMAINDER: usize = 3;

#[derive(Debug, Clone)]
pub struct Stemmer {
    suffixes: Vec<String>,
    exceptions: HashSet<String>,
}

impl Default for Stemmer {
    fn default() -> Self {
        Self::new(SUFFIXES.iter().copied(), EXCEPTIONS.iter().copied())
    }
}

impl Stemmer {
    /// Build a stemmer from custom tables. Suffixes are ordered longest
    /// first; equal lengths keep the given order.
    pub fn new<S, E>(suffixes: S, exceptions: E) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let mut suffixes: Vec<String> = suffixes.into_iter().map(Into::into).collect();
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        Self { suffixes, exceptions: exceptions.into_iter().map(Into::into).collect() }
    }

    pub fn is_exception(&self, token: &str) -> bool {
        self.exceptions.contains(token)
    }

    pub fn stem(&self, token: &str) -> String {
        if self.is_exception(token) || token.chars().count() < MIN_STEM_INPUT {
            return token.to_string();
        }
        for suffix in &self.suffixes {
            if let Some(rest) = token.strip_suffix(suffix.as_str()) {
                if rest.chars().count() >= MIN_REMAINDER {
                    return rest.to_string();
                }
            }
        }
        token.to_string()
    }
}
