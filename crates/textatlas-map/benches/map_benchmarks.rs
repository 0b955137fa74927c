//! Benchmark tests for the spatial mapping stages.
//!
//! Measures the two heavy pipeline steps over realistic corpus sizes:
//! projecting a few hundred embedding vectors to 2D, and density-clustering
//! the resulting layout. Both are O(n^2) in the point count, so these numbers
//! bound how large an exploration run stays interactive.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use textatlas_core::config::{ClusteringConfig, ProjectionConfig};
use textatlas_core::types::Projection;
use textatlas_map::{DensityClusterer, Projector};

/// Generate embedding vectors drawn from a handful of well-separated
/// centroids, mimicking a corpus with clear topical groups.
fn generate_embeddings(count: usize, dim: usize, groups: usize) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let base = (i % groups) as f32 * 10.0;
            (0..dim)
                .map(|_| base + rng.random_range(-0.5..0.5))
                .collect()
        })
        .collect()
}

/// Generate a 2D layout of dense blobs plus uniform strays, the shape the
/// clusterer sees after projection.
fn generate_points(count: usize) -> Vec<Projection> {
    let mut rng = StdRng::seed_from_u64(11);
    (0..count)
        .map(|i| {
            if i % 10 == 9 {
                // Every tenth point is a stray.
                Projection::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0))
            } else {
                let center = ((i % 4) as f32) * 20.0;
                Projection::new(
                    center + rng.random_range(-0.5..0.5),
                    center + rng.random_range(-0.5..0.5),
                )
            }
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    // Pre-generate inputs to exclude generation time from measurements.
    let small = generate_embeddings(50, 32, 4);
    let medium = generate_embeddings(200, 32, 4);
    let projector = Projector::new(ProjectionConfig {
        epochs: 50,
        ..ProjectionConfig::default()
    });

    let mut group = c.benchmark_group("projection");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("project_50x32", |b| {
        b.iter(|| projector.project(&small).unwrap());
    });

    group.bench_function("project_200x32", |b| {
        b.iter(|| projector.project(&medium).unwrap());
    });

    group.finish();
}

fn bench_clustering(c: &mut Criterion) {
    let small = generate_points(100);
    let large = generate_points(500);
    let clusterer = DensityClusterer::new(ClusteringConfig::default());

    let mut group = c.benchmark_group("clustering");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("cluster_100_points", |b| {
        b.iter(|| clusterer.cluster(&small).unwrap());
    });

    group.bench_function("cluster_500_points", |b| {
        b.iter(|| clusterer.cluster(&large).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_projection, bench_clustering);
criterion_main!(benches);
