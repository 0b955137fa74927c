//! Text corpus exploration pipeline.
//!
//! Drives a batch of text chunks through embedding, 2D projection, density
//! clustering, and cluster labeling, producing a tabular
//! [`ExplorationResult`](textatlas_core::types::ExplorationResult) ready for
//! a visualization sink:
//!
//! - [`EmbeddingService`]: async trait over the embedding backend, with an
//!   object-safe [`DynEmbeddingService`] twin and a [`MockEmbedding`] for
//!   tests
//! - [`Explorer`]: the orchestrator owning the configured pipeline stages

pub mod embedding;
pub mod orchestrator;

pub use embedding::{DynEmbeddingService, EmbeddingService, MockEmbedding};
pub use orchestrator::Explorer;
