use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use kbrag_core::corpus::Corpus;
use kbrag_core::error::{Error, Result};
use kbrag_core::traits::{Embedder, VectorSearcher};
use kbrag_core::types::{CategoryFilter, DocId, QaEntry, SourceKind};
use kbrag_embed::{get_default_embedder, HashingEmbedder};
use kbrag_text::{Analyzer, InvertedIndex};
use kbrag_vector::{DenseIndex, TfIdfIndex, Vocabulary};

fn fixture() -> Corpus {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf();
    Corpus::load(&root.join("test_data/knowledge_base.json")).expect("fixture")
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt()
}

#[test]
fn vocabulary_positions_are_sorted_and_idf_follows_formula() {
    let streams = vec![
        vec!["omega".to_string(), "dosis".to_string()],
        vec!["omega".to_string(), "precio".to_string(), "precio".to_string()],
        vec!["capsula".to_string()],
    ];
    let vocab = Vocabulary::build(&streams);
    assert_eq!(vocab.len(), 4);
    assert_eq!(vocab.doc_count(), 3);
    assert_eq!(vocab.position("capsula"), Some(0));
    assert_eq!(vocab.position("dosis"), Some(1));
    assert_eq!(vocab.position("omega"), Some(2));
    assert_eq!(vocab.position("precio"), Some(3));
    assert!(vocab.position("nada").is_none());
    // df(omega) = 2 => ln(3/3) = 0; df(precio) = 1 despite repetition.
    assert_eq!(vocab.idf("omega"), Some(0.0));
    assert!((vocab.idf("precio").unwrap() - (1.5f64).ln()).abs() < 1e-12);
}

#[test]
fn index_only_keys_get_positions_but_no_weight() {
    let streams = vec![
        vec!["dha".to_string(), "omega".to_string()],
        vec!["epa".to_string(), "omega".to_string()],
        vec!["capsula".to_string()],
    ];
    let plain = Vocabulary::build(&streams);
    let vocab = Vocabulary::build_with_keys(&streams, ["omegas", "omega"]);
    assert_eq!(vocab.len(), 5);
    assert_eq!(vocab.position("omegas"), Some(4));
    assert_eq!(vocab.document_frequency("omegas"), Some(0));
    assert_eq!(vocab.document_frequency("omega"), Some(2));

    let query = vec!["omegas".to_string(), "dha".to_string()];
    let v = vocab.weigh(&query);
    assert_eq!(v[vocab.position("omegas").unwrap()], 0.0);
    assert!((v[vocab.position("dha").unwrap()] - 1.0).abs() < 1e-6);
    let p = plain.weigh(&query);
    assert!((p[plain.position("dha").unwrap()] - 1.0).abs() < 1e-6);
}

#[test]
fn every_inverted_index_key_is_in_the_vocabulary() {
    let corpus = fixture();
    let analyzer = Arc::new(Analyzer::default());
    let index = InvertedIndex::build(&corpus, &analyzer);
    let tfidf = TfIdfIndex::build_with_index(&corpus, Arc::clone(&analyzer), &index);
    for term in index.terms() {
        assert!(tfidf.vocabulary().position(term).is_some(), "{term} missing from vocabulary");
    }
    assert!(tfidf.vocabulary().len() >= index.len());
}

#[test]
fn fixture_document_vectors_are_unit_length() {
    let corpus = fixture();
    let index = TfIdfIndex::build(&corpus, Arc::new(Analyzer::default()));
    assert!(!index.vocabulary().is_empty());
    for (id, _) in corpus.iter() {
        let v = index.document_vector(id).expect("vector");
        assert_eq!(v.len(), index.vocabulary().len());
        assert!((norm(v) - 1.0).abs() < 1e-6, "document {id} has norm {}", norm(v));
    }
}

#[test]
fn matching_document_ranks_first() {
    let corpus = fixture();
    let index = TfIdfIndex::build(&corpus, Arc::new(Analyzer::default()));
    let hits = index.search_vector("metales pesados", 3, None);
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].id, DocId(9));
    assert_eq!(hits[0].source, SourceKind::Vector);
    assert!(hits[0].score > 0.0 && hits[0].score <= 1.0 + 1e-6);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn filter_restricts_candidates() {
    let corpus = fixture();
    let index = TfIdfIndex::build(&corpus, Arc::new(Analyzer::default()));
    let filter = CategoryFilter::new(["objeciones_precio", "objeciones_seguridad"]);
    let hits = index.search_vector("omega", corpus.len(), Some(&filter));
    assert_eq!(hits.len(), 2);
    for hit in &hits {
        let category = &corpus.get(hit.id).unwrap().category;
        assert!(filter.allows(category));
    }
    assert!(index.search_vector("omega", 0, None).is_empty());
}

#[test]
fn unknown_query_scores_every_document_zero_in_corpus_order() {
    let corpus = fixture();
    let index = TfIdfIndex::build(&corpus, Arc::new(Analyzer::default()));
    assert!(index.vectorize("zzzz qqqq").iter().all(|x| *x == 0.0));
    let hits = index.search_vector("zzzz qqqq", 4, None);
    let ids: Vec<usize> = hits.iter().map(|h| h.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(hits.iter().all(|h| h.score == 0.0));
}

#[test]
fn documents_with_only_zero_weight_terms_get_zero_vectors() {
    // N = 2 and every term appears once: idf = ln(2 / 2) = 0.
    let corpus = Corpus::from_entries(vec![
        QaEntry::new("alfa", "beta", "a"),
        QaEntry::new("gamma", "delta", "b"),
    ])
    .unwrap();
    let index = TfIdfIndex::build(&corpus, Arc::new(Analyzer::default()));
    assert!(index.document_vector(DocId(0)).unwrap().iter().all(|x| *x == 0.0));
    let stopwords_only = Corpus::from_entries(vec![QaEntry::new("de la", "el", "a")]).unwrap();
    let index = TfIdfIndex::build(&stopwords_only, Arc::new(Analyzer::default()));
    assert!(index.vocabulary().is_empty());
    assert!(index.document_vector(DocId(0)).unwrap().is_empty());
}

#[test]
fn empty_corpus_builds_and_returns_nothing() {
    let corpus = Corpus::from_entries(Vec::new()).unwrap();
    let index = TfIdfIndex::build(&corpus, Arc::new(Analyzer::default()));
    assert!(index.search_vector("omega", 5, None).is_empty());
}

#[test]
fn dense_index_scores_identical_text_at_one() {
    let corpus = Corpus::from_entries(vec![
        QaEntry::new("Dosis en embarazo", "Dos cápsulas diarias.", "dosificacion"),
        QaEntry::new("Metales pesados", "Destilación molecular.", "seguridad"),
        QaEntry::new("Precio por miligramo", "Compare el costo diario.", "precio"),
    ])
    .unwrap();
    let index = DenseIndex::build(&corpus, HashingEmbedder::new(512).unwrap()).expect("dense");
    assert_eq!(index.name(), "dense");
    let hits = index.search_vector("Metales pesados Destilación molecular.", 3, None);
    assert_eq!(hits[0].id, DocId(1));
    assert!((hits[0].score - 1.0).abs() < 1e-5);
    assert!(hits[1].score < hits[0].score);
}

struct FlakyEmbedder {
    inner: HashingEmbedder,
    fail: AtomicBool,
}

impl Embedder for FlakyEmbedder {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Embedding("backend offline".into()));
        }
        self.inner.embed_batch(texts)
    }
}

#[test]
fn dense_index_accepts_the_boxed_default_embedder() {
    let corpus = fixture();
    let index = DenseIndex::build(&corpus, get_default_embedder(128).expect("embedder")).expect("dense");
    assert_eq!(index.dimensions(), 128);
    let hits = index.search_vector("metales pesados", 3, None);
    assert_eq!(hits.len(), 3);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn dense_build_failure_is_an_error_but_query_failure_degrades() {
    let corpus = fixture();
    let broken = FlakyEmbedder { inner: HashingEmbedder::new(64).unwrap(), fail: AtomicBool::new(true) };
    assert!(matches!(DenseIndex::build(&corpus, broken), Err(Error::Embedding(_))));

    let flaky = FlakyEmbedder { inner: HashingEmbedder::new(64).unwrap(), fail: AtomicBool::new(false) };
    let index = DenseIndex::build(&corpus, flaky).expect("dense");
    index.embedder().fail.store(true, Ordering::SeqCst);
    let hits = index.search_vector("omega", 5, None);
    assert_eq!(hits.len(), 5);
    assert!(hits.iter().all(|h| h.score == 0.0));
}

const POOL: &[&str] = &["omega", "dosis", "capsula", "precio", "embarazo", "lote", "marca", "cerebro"];

proptest! {
    #[test]
    fn document_vectors_are_unit_or_zero(docs in prop::collection::vec(prop::collection::vec(0usize..8, 1..6), 1..7)) {
        let entries = docs
            .iter()
            .map(|words| {
                let text: Vec<&str> = words.iter().map(|i| POOL[*i]).collect();
                QaEntry::new(text.join(" "), "ok", "c")
            })
            .collect();
        let corpus = Corpus::from_entries(entries).unwrap();
        let index = TfIdfIndex::build(&corpus, Arc::new(Analyzer::default()));
        for (id, _) in corpus.iter() {
            let v = index.document_vector(id).unwrap();
            let n = norm(v);
            prop_assert!(n == 0.0 || (n - 1.0).abs() < 1e-6, "norm {}", n);
        }
    }
}
