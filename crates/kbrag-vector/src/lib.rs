pub mod dense;
pub mod tfidf;
pub mod vocab;

mod scoring;

pub use dense::DenseIndex;
pub use tfidf::TfIdfIndex;
pub use vocab::Vocabulary;
