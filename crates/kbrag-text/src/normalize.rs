//! Lowercasing, accent folding, punctuation stripping and stopword removal.
//!
//! Only the token stream is folded; stored entry text is never modified.
use once_cell::sync::Lazy;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Spanish function words, compared after folding.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "el", "la", "los", "las", "de", "del", "en", "un", "una", "y", "a", "que", "es", "por", "para", "con", "se",
        "su", "al", "lo", "como", "mas", "pero", "sus", "le", "ya", "o", "cual", "cuales", "donde", "cuando",
    ]
    .into_iter()
    .collect()
});

/// Tokens of this many characters or fewer are dropped.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Combining diacritical marks block, stripped after NFD decomposition.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercase and fold accents, leaving everything else in place.
///
/// Precomposed and decomposed input fold to the same text; `ñ` becomes `n`.
pub fn fold(text: &str) -> String {
    text.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Lowercase, fold, replace non-word characters with spaces and collapse
/// whitespace. Stopwords are kept, so phrases survive for substring checks.
pub fn normalize_text(text: &str) -> String {
    let spaced: String = fold(text).chars().map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' }).collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Ordered, unstemmed content tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_text(text)
        .split(' ')
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS && !is_stopword(t))
        .map(str::to_string)
        .collect()
}
