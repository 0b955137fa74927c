//! Spatial mapping for text embeddings.
//!
//! Turns batches of high-dimensional embedding vectors into a 2D map and
//! finds the dense regions on it:
//!
//! - [`Projector`]: seeded neighbor-graph layout of embeddings into 2D
//! - [`DensityClusterer`]: HDBSCAN-style clustering of the projected points
//! - [`neighbors`]: shared brute-force k-nearest-neighbor search
//!
//! Both stages are deterministic for a fixed configuration, so a repeated
//! run over the same corpus reproduces the same map.

pub mod cluster;
pub mod neighbors;
pub mod project;

pub use cluster::DensityClusterer;
pub use project::Projector;
