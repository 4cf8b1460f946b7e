use std::sync::Arc;

use kbrag_core::config::RankingWeights;
use kbrag_core::corpus::Corpus;
use kbrag_core::types::{CategoryFilter, DocId, QaEntry, SourceKind};
use kbrag_text::{Analyzer, InvertedIndex, KeywordIndex};

fn scenario_corpus() -> Corpus {
    Corpus::from_entries(vec![
        QaEntry::new("Dosis de Natural DHA en embarazo", "Una cápsula al día durante la gestación.", "productos"),
        QaEntry::new("Es muy caro el tratamiento", "Compare el costo diario por miligramo.", "objeciones"),
        QaEntry::new("Cómo presento a un cardiólogo", "Abra con el beneficio cardiovascular.", "argumentos"),
    ])
    .expect("corpus")
}

fn keyword_index(corpus: &Corpus) -> KeywordIndex {
    KeywordIndex::build(corpus, Arc::new(Analyzer::default()), RankingWeights::default())
}

#[test]
fn index_registers_both_stemmed_and_unstemmed_tokens() {
    let corpus = scenario_corpus();
    let index = InvertedIndex::build(&corpus, &Analyzer::default());
    assert_eq!(index.lookup("embarazo"), &[DocId(0)]);
    assert_eq!(index.lookup("embaraz"), &[DocId(0)]);
    assert_eq!(index.lookup("caro"), &[DocId(1)]);
    assert_eq!(index.lookup("car"), &[DocId(1)]);
    assert!(index.lookup("gestacion").contains(&DocId(0)), "answer text is indexed too");
    assert!(index.lookup("prenatal").is_empty(), "synonyms are never indexed");
    assert_eq!(index.doc_count(), 3);
    assert_eq!(index.question(DocId(2)), "como presento a un cardiologo");
}

#[test]
fn price_query_ranks_price_objection_first() {
    let corpus = scenario_corpus();
    let kw = keyword_index(&corpus);
    let hits = kw.search_keywords("qué tan caro es", 5, None);
    assert_eq!(hits[0].id, DocId(1));
    assert_eq!(hits[0].score, 1.0, "best keyword hit is normalized to 1.0");
    assert_eq!(hits[0].source, SourceKind::Keyword);
    assert!(hits.iter().all(|h| h.score > 0.0 && h.score <= 1.0));
}

#[test]
fn synonym_only_matches_score_below_direct_matches() {
    let corpus = Corpus::from_entries(vec![
        QaEntry::new("Suplemento prenatal", "Fórmula para la etapa prenatal.", "productos"),
        QaEntry::new("Omega en embarazo", "Indicado durante el embarazo.", "productos"),
    ])
    .expect("corpus");
    let kw = keyword_index(&corpus);
    let hits = kw.search_keywords("embarazo", 5, None);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, DocId(1), "direct match outranks synonym match");
    assert!(hits[1].score < hits[0].score);
}

#[test]
fn high_value_terms_and_question_boost_are_applied() {
    let corpus = Corpus::from_entries(vec![
        QaEntry::new("Información general", "Hablamos del precio y del envase.", "a"),
        QaEntry::new("Información general", "Hablamos del envase y del sabor.", "a"),
        QaEntry::new("Preguntas sobre el envase", "Detalles del envase.", "a"),
    ])
    .expect("corpus");
    let kw = keyword_index(&corpus);
    assert!(kw.is_high_value("precio"));
    assert!(kw.is_high_value("preci"), "stemmed forms count as high value");

    // doc0: precio (2.0 * 1.5) + envase (2.0), doc1: envase only.
    let hits = kw.search_keywords("precio envase", 5, None);
    assert_eq!(hits[0].id, DocId(0));

    // doc2 mentions "envase" and its stem "envas" in the question: 1 + 2 * 0.3.
    let hits = kw.search_keywords("envase", 5, None);
    assert_eq!(hits[0].id, DocId(2));
    assert_eq!(hits[1].id, DocId(0), "ties keep corpus order");
    assert_eq!(hits[2].id, DocId(1));
    assert!((hits[1].score - 1.0 / 1.6).abs() < 1e-6);
}

#[test]
fn filter_excludes_other_categories_before_normalization() {
    let corpus = scenario_corpus();
    let kw = keyword_index(&corpus);
    let filter = CategoryFilter::new(["argumentos"]);
    let hits = kw.search_keywords("caro cardiólogo", 5, Some(&filter));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, DocId(2));
    assert_eq!(hits[0].score, 1.0);
}

#[test]
fn no_match_or_degenerate_query_returns_empty() {
    let corpus = scenario_corpus();
    let kw = keyword_index(&corpus);
    assert!(kw.search_keywords("", 5, None).is_empty());
    assert!(kw.search_keywords("de la el", 5, None).is_empty());
    assert!(kw.search_keywords("xilofono", 5, None).is_empty());
    assert!(kw.search_keywords("caro", 0, None).is_empty());
}
