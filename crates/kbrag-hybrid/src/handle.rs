use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use kbrag_core::corpus::Corpus;
use kbrag_core::error::Result;

use crate::engine::RetrievalEngine;

/// Shared access to the live engine with atomic snapshot replacement.
///
/// Readers clone the current `Arc` and keep using it even if a reload
/// swaps in a new snapshot mid-query.
pub struct EngineHandle {
    current: RwLock<Arc<RetrievalEngine>>,
}

impl EngineHandle {
    pub fn new(engine: RetrievalEngine) -> Self {
        Self { current: RwLock::new(Arc::new(engine)) }
    }

    pub fn current(&self) -> Arc<RetrievalEngine> {
        Arc::clone(&self.current.read())
    }

    /// Build a replacement from `corpus` with the current settings and swap
    /// it in. On failure the old snapshot stays in service.
    pub fn reload(&self, corpus: Corpus) -> Result<()> {
        let settings = self.current().settings().clone();
        let engine = RetrievalEngine::build(corpus, settings)?;
        let documents = engine.corpus().len();
        *self.current.write() = Arc::new(engine);
        info!(documents, "engine snapshot replaced");
        Ok(())
    }

    pub fn reload_from(&self, path: &Path) -> Result<()> {
        self.reload(Corpus::load(path)?)
    }
}
