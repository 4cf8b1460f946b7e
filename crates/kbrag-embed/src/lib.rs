//! Offline text embedders for the dense vector strategy.
//!
//! The hashing embedder needs no model files: every token is hashed into a
//! fixed-size bucket vector which is then L2-normalized. It is the default
//! dense encoder and the one used by tests.

use std::hash::{Hash, Hasher};
use tracing::{debug, info};
use twox_hash::XxHash64;

use kbrag_core::error::{Error, Result};
use kbrag_core::traits::Embedder;

/// Feature-hashing embedder over lowercase whitespace tokens.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    seed: u64,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        Self::with_seed(dim, 0)
    }

    pub fn with_seed(dim: usize, seed: u64) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig("embedding dimension must be positive".into()));
        }
        Ok(Self { dim, seed })
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            let mut hasher = XxHash64::with_seed(self.seed);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            // Signed feature hashing keeps unrelated tokens from all adding up.
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            let magnitude = 0.5 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += sign * magnitude;
        }
        let norm = v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x = (f64::from(*x) / norm) as f32;
            }
        }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(count = texts.len(), dim = self.dim, "hashing embed batch");
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Embedder used when the dense backend is configured.
pub fn get_default_embedder(dim: usize) -> Result<Box<dyn Embedder>> {
    info!(dim, "using hashing embedder");
    Ok(Box::new(HashingEmbedder::new(dim)?))
}
