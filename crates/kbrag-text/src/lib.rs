//! kbrag-text
//!
//! Lexical side of retrieval: normalization, stemming, synonym expansion,
//! the inverted index and weighted keyword search.
pub mod analyzer;
pub mod index;
pub mod keyword;
pub mod normalize;
pub mod stemmer;
pub mod synonyms;

pub use analyzer::Analyzer;
pub use index::InvertedIndex;
pub use keyword::KeywordIndex;
pub use stemmer::Stemmer;
pub use synonyms::SynonymTable;
