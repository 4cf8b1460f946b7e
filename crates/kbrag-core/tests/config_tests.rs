use figment::providers::{Format, Toml};
use figment::Figment;
use std::path::Path;

use kbrag_core::config::{resolve_with_base, Config, VectorBackend};

#[test]
fn defaults_reproduce_tuned_constants() {
    let config = Config::from_figment(Figment::new()).expect("config");
    let settings = config.retrieval().expect("retrieval");
    assert_eq!(settings.default_top_k, 5);
    assert_eq!(settings.backend, VectorBackend::Tfidf);
    let w = settings.weights;
    assert_eq!((w.direct, w.indirect, w.high_value), (2.0, 1.0, 1.5));
    assert_eq!((w.vector, w.keyword), (0.6, 0.4));
    assert_eq!(w.question_boost, 0.3);
    assert_eq!(w.max_synonyms, 3);
    assert_eq!((w.concentration_question_factor, w.concentration_question_floor), (4.0, 0.5));
    assert_eq!((w.concentrate_question_factor, w.concentrate_question_floor), (3.0, 0.4));
    assert_eq!(w.concentration_answer_factor, 2.0);
}

#[test]
fn toml_overrides_merge_over_defaults() {
    let toml = r#"
        [retrieval]
        corpus_path = "data/kb.json"
        default_top_k = 8
        backend = "dense"

        [retrieval.weights]
        vector = 0.5
        keyword = 0.5
    "#;
    let config = Config::from_figment(Figment::new().merge(Toml::string(toml))).expect("config");
    let settings = config.retrieval().expect("retrieval");
    assert_eq!(settings.default_top_k, 8);
    assert_eq!(settings.backend, VectorBackend::Dense);
    assert_eq!(settings.weights.vector, 0.5);
    assert_eq!(settings.weights.direct, 2.0, "untouched weights keep defaults");
    assert_eq!(settings.corpus_path_from(Path::new("/srv")), Path::new("/srv/data/kb.json"));

    let top_k: usize = config.get("retrieval.default_top_k").expect("get");
    assert_eq!(top_k, 8);
}

#[test]
fn zero_top_k_is_rejected() {
    let toml = "[retrieval]\ndefault_top_k = 0\n";
    assert!(Config::from_figment(Figment::new().merge(Toml::string(toml))).is_err());
}

#[test]
fn absolute_paths_are_kept() {
    assert_eq!(resolve_with_base(Path::new("/base"), "/abs/kb.json"), Path::new("/abs/kb.json"));
    assert_eq!(resolve_with_base(Path::new("/base"), "rel/kb.json"), Path::new("/base/rel/kb.json"));
}
