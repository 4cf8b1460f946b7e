use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use figment::providers::{Format, Toml};
use figment::Figment;
use tempfile::TempDir;

use kbrag_core::config::{Config, RetrievalSettings};
use kbrag_core::corpus::Corpus;
use kbrag_core::types::{DocId, QaEntry};
use kbrag_hybrid::{EngineHandle, RetrievalEngine};

fn fixture_path() -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf();
    root.join("test_data/knowledge_base.json")
}

fn small_engine() -> RetrievalEngine {
    let corpus = Corpus::from_entries(vec![
        QaEntry::new("Dosis en embarazo", "Dos cápsulas diarias.", "dosificacion_posologia"),
        QaEntry::new("Es muy caro", "Compare el costo diario.", "objeciones_precio"),
    ])
    .unwrap();
    RetrievalEngine::build(corpus, RetrievalSettings::default()).unwrap()
}

#[test]
fn engine_builds_from_configuration() {
    let tmp = TempDir::new().unwrap();
    fs::copy(fixture_path(), tmp.path().join("kb.json")).unwrap();
    let figment = Figment::new().merge(Toml::string(
        r#"
        [retrieval]
        corpus_path = "kb.json"
        default_top_k = 3

        [retrieval.weights]
        intent_boost = 1.5
        "#,
    ));
    let config = Config::from_figment(figment).unwrap();
    let engine = RetrievalEngine::from_config(&config, tmp.path()).expect("engine");
    assert_eq!(engine.corpus().len(), 16);
    assert_eq!(engine.settings().default_top_k, 3);
    assert_eq!(engine.settings().weights.intent_boost, 1.5);
    assert_eq!(engine.settings().weights.vector, 0.6, "unset weights keep defaults");
}

#[test]
fn missing_corpus_prevents_startup() {
    let tmp = TempDir::new().unwrap();
    let figment = Figment::new().merge(Toml::string("[retrieval]\ncorpus_path = \"absent.json\""));
    let config = Config::from_figment(figment).unwrap();
    assert!(RetrievalEngine::from_config(&config, tmp.path()).is_err());
}

#[test]
fn reload_swaps_snapshot_and_keeps_old_readers_alive() {
    let handle = EngineHandle::new(small_engine());
    let before = handle.current();
    assert_eq!(before.corpus().len(), 2);

    handle.reload_from(&fixture_path()).expect("reload");
    let after = handle.current();
    assert_eq!(after.corpus().len(), 16);
    // The reader that grabbed the old snapshot still sees it.
    assert_eq!(before.corpus().len(), 2);
    assert_eq!(before.search("caro", 1, None)[0].id, DocId(1));
}

#[test]
fn failed_reload_keeps_serving_previous_snapshot() {
    let handle = EngineHandle::new(small_engine());
    assert!(handle.reload_from(&PathBuf::from("/definitely/not/here.json")).is_err());
    assert_eq!(handle.current().corpus().len(), 2);
}

#[test]
fn concurrent_threads_see_identical_rankings() {
    let engine = RetrievalEngine::build(Corpus::load(&fixture_path()).unwrap(), RetrievalSettings::default()).unwrap();
    let queries = ["es muy caro", "dosis en embarazo", "metales pesados", "producto más concentrado", ""];
    let expected: Vec<Vec<(DocId, f32)>> =
        queries.iter().map(|q| engine.search(q, 5, None).iter().map(|r| (r.id, r.score)).collect()).collect();

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..20 {
                    for (q, want) in queries.iter().zip(&expected) {
                        let got: Vec<(DocId, f32)> = engine.search(q, 5, None).iter().map(|r| (r.id, r.score)).collect();
                        assert_eq!(&got, want);
                    }
                }
            });
        }
    });
}

#[tokio::test]
async fn async_tasks_share_the_handle_during_reload() {
    let handle = Arc::new(EngineHandle::new(small_engine()));
    let mut tasks = Vec::new();
    for i in 0..16 {
        let handle = Arc::clone(&handle);
        tasks.push(tokio::spawn(async move {
            let engine = handle.current();
            let results = engine.search("caro", 1, None);
            (i, engine.corpus().len(), results.first().map(|r| r.entry.category.clone()))
        }));
    }
    handle.reload_from(&fixture_path()).expect("reload");
    for task in tasks {
        let (_, documents, top) = task.await.expect("task");
        assert!(documents == 2 || documents == 16);
        assert_eq!(top.as_deref(), Some("objeciones_precio"));
    }
    assert_eq!(handle.current().corpus().len(), 16);
}
