//! Seeded 2D layout of embedding batches.
//!
//! The reducer builds a symmetrized k-nearest-neighbor graph over the input
//! vectors with weights decaying from each point's nearest-neighbor distance,
//! scatters an initial layout from a seeded RNG, and refines it by stochastic
//! gradient descent: attraction along graph edges, sampled repulsion against
//! random points, learning rate decaying linearly to zero.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use textatlas_core::config::ProjectionConfig;
use textatlas_core::error::{AtlasError, Result};
use textatlas_core::types::Projection;

use crate::neighbors;

/// Half-width of the initial random layout square.
const INIT_SPREAD: f32 = 10.0;
/// Per-axis cap on a single gradient step.
const MAX_STEP: f32 = 4.0;
/// Repulsion scale relative to attraction.
const REPULSION_STRENGTH: f32 = 0.5;
/// Keeps the repulsion force finite for near-coincident points.
const REPULSION_EPSILON: f32 = 0.1;
/// Floor for the local weight falloff scale.
const MIN_SIGMA: f32 = 1e-3;

/// Maps batches of embedding vectors to 2D coordinates.
///
/// Deterministic: two calls with the same seed and input produce identical
/// coordinates, and output order matches input order 1:1.
pub struct Projector {
    config: ProjectionConfig,
}

impl Projector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ProjectionConfig::default())
    }

    /// Project the batch to one `Projection` per input vector.
    ///
    /// Requires at least 2 vectors of uniform, non-zero dimension with
    /// finite values; anything else fails with [`AtlasError::Projection`]
    /// naming the offending index.
    pub fn project(&self, embeddings: &[Vec<f32>]) -> Result<Vec<Projection>> {
        validate(embeddings)?;
        let n = embeddings.len();
        let k = self.config.n_neighbors.clamp(1, n - 1);

        let edges = build_edges(embeddings, k);
        debug!(
            points = n,
            neighbors = k,
            edges = edges.len(),
            "Built neighborhood graph"
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut layout: Vec<(f32, f32)> = (0..n)
            .map(|_| {
                (
                    rng.random_range(-INIT_SPREAD..INIT_SPREAD),
                    rng.random_range(-INIT_SPREAD..INIT_SPREAD),
                )
            })
            .collect();

        let epochs = self.config.epochs.max(1);
        for epoch in 0..epochs {
            let alpha = self.config.learning_rate * (1.0 - epoch as f32 / epochs as f32);
            for &(i, j, weight) in &edges {
                // Pull the endpoints together along the edge.
                let dx = layout[j].0 - layout[i].0;
                let dy = layout[j].1 - layout[i].1;
                let d2 = dx * dx + dy * dy;
                let pull = alpha * weight * d2 / (1.0 + d2);
                let step_x = clip(pull * dx);
                let step_y = clip(pull * dy);
                layout[i].0 += step_x;
                layout[i].1 += step_y;
                layout[j].0 -= step_x;
                layout[j].1 -= step_y;

                // Push the edge head away from sampled points elsewhere.
                for _ in 0..self.config.negative_samples {
                    let other = rng.random_range(0..n);
                    if other == i {
                        continue;
                    }
                    let dx = layout[i].0 - layout[other].0;
                    let dy = layout[i].1 - layout[other].1;
                    let d2 = dx * dx + dy * dy;
                    let push = alpha * REPULSION_STRENGTH / (REPULSION_EPSILON + d2);
                    layout[i].0 += clip(push * dx);
                    layout[i].1 += clip(push * dy);
                }
            }
        }

        info!(points = n, epochs, "Projection complete");
        Ok(layout
            .into_iter()
            .map(|(x, y)| Projection::new(x, y))
            .collect())
    }
}

fn validate(embeddings: &[Vec<f32>]) -> Result<()> {
    if embeddings.len() < 2 {
        return Err(AtlasError::Projection(format!(
            "need at least 2 vectors, got {}",
            embeddings.len()
        )));
    }
    let dim = embeddings[0].len();
    if dim == 0 {
        return Err(AtlasError::Projection(
            "vectors must have non-zero dimension".to_string(),
        ));
    }
    for (index, vector) in embeddings.iter().enumerate() {
        if vector.len() != dim {
            return Err(AtlasError::Projection(format!(
                "dimension mismatch at index {}: expected {}, got {}",
                index,
                dim,
                vector.len()
            )));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(AtlasError::Projection(format!(
                "non-finite value at index {}",
                index
            )));
        }
    }
    Ok(())
}

/// Symmetrized kNN edges as `(i, j, weight)` with `i < j`, sorted by the
/// pair, so downstream iteration order is fixed.
///
/// A directed weight decays exponentially with distance beyond the source's
/// nearest neighbor, scaled by the mean neighborhood spread. Directed pairs
/// combine with the probabilistic union `a + b - a*b`.
fn build_edges(embeddings: &[Vec<f32>], k: usize) -> Vec<(usize, usize, f32)> {
    let lists = neighbors::knn(embeddings, k);

    let mut directed: BTreeMap<(usize, usize), f32> = BTreeMap::new();
    for (i, list) in lists.iter().enumerate() {
        if list.is_empty() {
            continue;
        }
        let rho = list[0].1;
        let sigma = (list.iter().map(|&(_, d)| d - rho).sum::<f32>() / list.len() as f32)
            .max(MIN_SIGMA);
        for &(j, d) in list {
            let weight = (-((d - rho).max(0.0)) / sigma).exp();
            directed.insert((i, j), weight);
        }
    }

    let mut edges: BTreeMap<(usize, usize), f32> = BTreeMap::new();
    for (&(i, j), &w_ij) in &directed {
        let key = (i.min(j), i.max(j));
        if edges.contains_key(&key) {
            continue;
        }
        let w_ji = directed.get(&(j, i)).copied().unwrap_or(0.0);
        edges.insert(key, w_ij + w_ji - w_ij * w_ji);
    }
    edges.into_iter().map(|((i, j), w)| (i, j, w)).collect()
}

fn clip(step: f32) -> f32 {
    step.clamp(-MAX_STEP, MAX_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_embeddings(n: usize, dim: usize) -> Vec<Vec<f32>> {
        (0..n)
            .map(|i| (0..dim).map(|d| ((i * 7 + d * 3) % 13) as f32).collect())
            .collect()
    }

    #[test]
    fn test_project_output_shape() {
        let embeddings = grid_embeddings(10, 8);
        let projections = Projector::with_defaults().project(&embeddings).unwrap();
        assert_eq!(projections.len(), 10);
        for p in &projections {
            assert!(p.x.is_finite());
            assert!(p.y.is_finite());
        }
    }

    #[test]
    fn test_project_deterministic_for_seed() {
        let embeddings = grid_embeddings(12, 6);
        let projector = Projector::with_defaults();
        let first = projector.project(&embeddings).unwrap();
        let second = projector.project(&embeddings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_project_seed_changes_layout() {
        let embeddings = grid_embeddings(12, 6);
        let default_seed = Projector::with_defaults().project(&embeddings).unwrap();
        let other_seed = Projector::new(ProjectionConfig {
            seed: 7,
            ..ProjectionConfig::default()
        })
        .project(&embeddings)
        .unwrap();
        assert_ne!(default_seed, other_seed);
    }

    #[test]
    fn test_project_single_vector_fails() {
        let err = Projector::with_defaults()
            .project(&[vec![1.0, 2.0]])
            .unwrap_err();
        assert!(matches!(err, AtlasError::Projection(_)));
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_project_empty_batch_fails() {
        let err = Projector::with_defaults().project(&[]).unwrap_err();
        assert!(matches!(err, AtlasError::Projection(_)));
    }

    #[test]
    fn test_project_dimension_mismatch_names_index() {
        let err = Projector::with_defaults()
            .project(&[vec![1.0, 2.0], vec![1.0, 2.0, 3.0]])
            .unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_project_zero_dimension_fails() {
        let err = Projector::with_defaults()
            .project(&[vec![], vec![]])
            .unwrap_err();
        assert!(matches!(err, AtlasError::Projection(_)));
    }

    #[test]
    fn test_project_non_finite_value_names_index() {
        let err = Projector::with_defaults()
            .project(&[vec![1.0, 2.0], vec![f32::NAN, 0.0]])
            .unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_project_separates_distant_groups() {
        // Two tight groups far apart in 4D; with a small neighborhood every
        // graph edge stays inside its own group.
        let mut embeddings = Vec::new();
        for i in 0..6 {
            embeddings.push(vec![i as f32 * 0.01, 0.0, 0.0, 0.0]);
        }
        for i in 0..6 {
            embeddings.push(vec![100.0 + i as f32 * 0.01, 100.0, 100.0, 100.0]);
        }

        let projector = Projector::new(ProjectionConfig {
            n_neighbors: 3,
            epochs: 100,
            ..ProjectionConfig::default()
        });
        let layout = projector.project(&embeddings).unwrap();

        let dist = |a: &Projection, b: &Projection| {
            ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
        };
        let mut intra = Vec::new();
        let mut inter = Vec::new();
        for i in 0..12 {
            for j in (i + 1)..12 {
                let d = dist(&layout[i], &layout[j]);
                if (i < 6) == (j < 6) {
                    intra.push(d);
                } else {
                    inter.push(d);
                }
            }
        }
        let mean = |v: &[f32]| v.iter().sum::<f32>() / v.len() as f32;
        assert!(
            mean(&intra) < mean(&inter),
            "expected grouped points closer than cross-group points"
        );
    }
}
