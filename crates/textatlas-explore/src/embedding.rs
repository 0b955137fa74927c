//! Embedding service trait and implementations.
//!
//! - `EmbeddingService` abstracts the backend that turns text batches into
//!   fixed-dimensional vectors.
//! - `MockEmbedding` derives deterministic vectors from word hashes, so texts
//!   sharing vocabulary land near each other. Useful for tests and offline
//!   runs without a real model.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use textatlas_core::error::{AtlasError, Result};

/// Service for embedding batches of text.
///
/// Implementations must return one vector per input text, in input order,
/// all of the dimensionality reported by [`EmbeddingService::dimensions`].
pub trait EmbeddingService: Send + Sync {
    /// Embed every text in the batch, preserving order.
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>>> + Send;

    /// Return the dimensionality of vectors produced by this service.
    fn dimensions(&self) -> usize;
}

/// Object-safe version of [`EmbeddingService`] for dynamic dispatch.
///
/// Because `EmbeddingService::embed_batch` returns `impl Future` it is not
/// object-safe. This trait uses a boxed future instead, allowing
/// `Box<dyn DynEmbeddingService>` to be stored in structs without generics.
///
/// A blanket implementation is provided so that every `EmbeddingService`
/// automatically implements `DynEmbeddingService`.
pub trait DynEmbeddingService: Send + Sync {
    /// Embed every text in the batch, preserving order (boxed future).
    fn embed_batch_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<Vec<f32>>>> + Send + 'a>>;

    /// Return the dimensionality of vectors produced by this service.
    fn dimensions(&self) -> usize;
}

/// Blanket impl: any `EmbeddingService` automatically implements `DynEmbeddingService`.
impl<T: EmbeddingService> DynEmbeddingService for T {
    fn embed_batch_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<Vec<f32>>>> + Send + 'a>>
    {
        Box::pin(self.embed_batch(texts))
    }

    fn dimensions(&self) -> usize {
        EmbeddingService::dimensions(self)
    }
}

// ---------------------------------------------------------------------------
// MockEmbedding - deterministic word-hash vectors for testing
// ---------------------------------------------------------------------------

/// Mock embedding service built on word hashes.
///
/// Each lowercased word hashes to a fixed pseudo-random vector; a text embeds
/// as the average of its word vectors, L2-normalized. Identical texts always
/// produce identical vectors, and texts sharing most of their vocabulary end
/// up close together, which is enough structure for the projection and
/// clustering stages to act on.
#[derive(Debug, Clone)]
pub struct MockEmbedding {
    dimensions: usize,
}

impl MockEmbedding {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn text_vector(&self, text: &str) -> Vec<f32> {
        let words: Vec<String> = text.split_whitespace().map(|w| w.to_lowercase()).collect();
        let mut pooled = vec![0.0f32; self.dimensions];
        for word in &words {
            for (dim, slot) in pooled.iter_mut().enumerate() {
                let mut hasher = DefaultHasher::new();
                word.hash(&mut hasher);
                dim.hash(&mut hasher);
                let h = hasher.finish();
                *slot += (((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0) as f32;
            }
        }
        if !words.is_empty() {
            for slot in &mut pooled {
                *slot /= words.len() as f32;
            }
        }

        // L2-normalize to unit vectors, matching what real embedding models
        // return.
        let norm: f32 = pooled.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for slot in &mut pooled {
                *slot /= norm;
            }
        }
        pooled
    }
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new(32)
    }
}

impl EmbeddingService for MockEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                if text.trim().is_empty() {
                    return Err(AtlasError::Embedding(format!(
                        "cannot embed empty text at index {}",
                        index
                    )));
                }
                Ok(self.text_vector(text))
            })
            .collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
