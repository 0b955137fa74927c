//! Density-based clustering of 2D layouts.
//!
//! The clusterer follows the HDBSCAN recipe: smooth each point's density via
//! a core distance, replace raw distances with mutual reachability, span the
//! points with a minimum spanning tree, and cut the tree at the largest
//! weight gap. Connected components that survive the cut and meet the size
//! floor become clusters; everything else is noise.

use std::collections::HashMap;

use tracing::{debug, info};

use textatlas_core::config::ClusteringConfig;
use textatlas_core::error::{AtlasError, Result};
use textatlas_core::types::{ClusterId, Projection};

use crate::neighbors;

/// The largest MST weight gap must reach this fraction of the maximum edge
/// weight to count as a real density boundary.
const MIN_GAP_FRACTION: f32 = 0.1;

/// Assigns a [`ClusterId`] to every projected point.
///
/// Points in dense regions share a cluster id; sparse points get
/// [`ClusterId::NOISE`]. Ids are dense non-negative integers issued in
/// first-encounter order over the input, so output is deterministic.
pub struct DensityClusterer {
    config: ClusteringConfig,
}

impl DensityClusterer {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ClusteringConfig::default())
    }

    /// Cluster the points, returning one id per input in input order.
    ///
    /// Empty input yields an empty labeling; fewer points than
    /// `min_cluster_size` yields all noise. Invalid parameters or non-finite
    /// coordinates fail with [`AtlasError::Clustering`].
    pub fn cluster(&self, points: &[Projection]) -> Result<Vec<ClusterId>> {
        let min_cluster_size = self.config.min_cluster_size;
        if min_cluster_size < 2 {
            return Err(AtlasError::Clustering(format!(
                "min_cluster_size must be at least 2, got {}",
                min_cluster_size
            )));
        }
        let min_samples = self.config.min_samples.unwrap_or(min_cluster_size);
        if min_samples < 1 || min_samples > min_cluster_size {
            return Err(AtlasError::Clustering(format!(
                "min_samples must be in 1..={}, got {}",
                min_cluster_size, min_samples
            )));
        }
        for (index, point) in points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(AtlasError::Clustering(format!(
                    "non-finite coordinate at index {}",
                    index
                )));
            }
        }

        let n = points.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        if n < min_cluster_size {
            return Ok(vec![ClusterId::NOISE; n]);
        }

        let coords: Vec<Vec<f32>> = points.iter().map(|p| vec![p.x, p.y]).collect();
        let core = core_distances(&coords, min_samples);
        let reach = mutual_reachability(&coords, &core);
        let mst = build_mst(&reach);

        let mut weights: Vec<f32> = mst.iter().map(|&(_, _, w)| w).collect();
        weights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let threshold = gap_threshold(&weights);
        debug!(threshold, edges = mst.len(), "Cutting spanning tree");

        let mut parents: Vec<usize> = (0..n).collect();
        for &(a, b, weight) in &mst {
            if weight <= threshold {
                union(&mut parents, a, b);
            }
        }

        let mut component_sizes: HashMap<usize, usize> = HashMap::new();
        for i in 0..n {
            let root = find(&mut parents, i);
            *component_sizes.entry(root).or_insert(0) += 1;
        }

        let mut ids_by_root: HashMap<usize, ClusterId> = HashMap::new();
        let mut next_id = 0i32;
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let root = find(&mut parents, i);
            if component_sizes[&root] >= min_cluster_size {
                let id = *ids_by_root.entry(root).or_insert_with(|| {
                    let id = ClusterId(next_id);
                    next_id += 1;
                    id
                });
                labels.push(id);
            } else {
                labels.push(ClusterId::NOISE);
            }
        }

        let noise = labels.iter().filter(|l| l.is_noise()).count();
        info!(
            points = n,
            clusters = next_id,
            noise,
            "Clustering complete"
        );
        Ok(labels)
    }
}

/// Distance from each point to its `min_samples`-th nearest sample, where a
/// point counts as its own first sample.
fn core_distances(coords: &[Vec<f32>], min_samples: usize) -> Vec<f32> {
    let others = min_samples - 1;
    if others == 0 {
        return vec![0.0; coords.len()];
    }
    neighbors::knn(coords, others)
        .iter()
        .map(|list| list.last().map(|&(_, d)| d).unwrap_or(0.0))
        .collect()
}

fn mutual_reachability(coords: &[Vec<f32>], core: &[f32]) -> Vec<Vec<f32>> {
    let n = coords.len();
    let mut reach = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = neighbors::euclidean(&coords[i], &coords[j]);
            let r = d.max(core[i]).max(core[j]);
            reach[i][j] = r;
            reach[j][i] = r;
        }
    }
    reach
}

/// Prim's algorithm over the dense reachability matrix.
///
/// Returns `n - 1` edges as `(tree_vertex, added_vertex, weight)`. Ties pick
/// the lowest vertex index, keeping the tree deterministic.
fn build_mst(reach: &[Vec<f32>]) -> Vec<(usize, usize, f32)> {
    let n = reach.len();
    let mut in_tree = vec![false; n];
    let mut min_dist = vec![f32::MAX; n];
    let mut min_edge = vec![0usize; n];

    in_tree[0] = true;
    for j in 1..n {
        min_dist[j] = reach[0][j];
    }

    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    for _ in 1..n {
        let mut best = usize::MAX;
        for j in 0..n {
            if !in_tree[j] && (best == usize::MAX || min_dist[j] < min_dist[best]) {
                best = j;
            }
        }
        edges.push((min_edge[best], best, min_dist[best]));
        in_tree[best] = true;
        for j in 0..n {
            if !in_tree[j] && reach[best][j] < min_dist[j] {
                min_dist[j] = reach[best][j];
                min_edge[j] = best;
            }
        }
    }
    edges
}

/// Pick the cut weight from the sorted MST edge weights.
///
/// Uses the largest gap between consecutive weights when it is significant
/// (at least [`MIN_GAP_FRACTION`] of the maximum weight, and not the very
/// first gap, which would split off single points). Otherwise falls back to
/// the 75th-percentile weight so uniformly spread inputs still merge.
fn gap_threshold(sorted: &[f32]) -> f32 {
    if sorted.is_empty() {
        return f32::MAX;
    }
    let mut gap_idx = 0;
    let mut max_gap = 0.0f32;
    for i in 0..sorted.len() - 1 {
        let gap = sorted[i + 1] - sorted[i];
        if gap > max_gap {
            max_gap = gap;
            gap_idx = i;
        }
    }
    let max_weight = sorted[sorted.len() - 1];
    if gap_idx >= 1 && max_gap >= MIN_GAP_FRACTION * max_weight {
        return sorted[gap_idx];
    }
    let p75 = ((sorted.len() as f32) * 0.75) as usize;
    sorted[p75.min(sorted.len() - 1)]
}

fn find(parents: &mut [usize], mut x: usize) -> usize {
    while parents[x] != x {
        parents[x] = parents[parents[x]];
        x = parents[x];
    }
    x
}

fn union(parents: &mut [usize], a: usize, b: usize) {
    let root_a = find(parents, a);
    let root_b = find(parents, b);
    if root_a != root_b {
        parents[root_b] = root_a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> Projection {
        Projection::new(x, y)
    }

    /// Five points packed around the origin, a far pair, and scattered
    /// strays. Only the packed five have enough mutual density to cluster.
    fn dense_group_among_strays() -> Vec<Projection> {
        vec![
            point(0.0, 0.0),
            point(0.1, 0.0),
            point(0.0, 0.1),
            point(-0.1, 0.0),
            point(0.0, -0.1),
            point(10.0, 10.0),
            point(10.15, 10.0),
            point(20.0, 0.0),
            point(0.0, 20.0),
            point(-20.0, 0.0),
            point(0.0, -20.0),
            point(25.0, 25.0),
        ]
    }

    #[test]
    fn test_cluster_dense_group_among_strays() {
        let points = dense_group_among_strays();
        let labels = DensityClusterer::with_defaults().cluster(&points).unwrap();

        assert_eq!(labels.len(), 12);
        for i in 0..5 {
            assert_eq!(labels[i], ClusterId(0), "packed point {} should cluster", i);
        }
        for i in 5..12 {
            assert!(labels[i].is_noise(), "stray point {} should be noise", i);
        }
    }

    #[test]
    fn test_cluster_two_groups_get_distinct_ids() {
        let mut points = Vec::new();
        for &(dx, dy) in &[(0.0, 0.0), (0.1, 0.0), (0.0, 0.1), (-0.1, 0.0), (0.0, -0.1)] {
            points.push(point(dx, dy));
        }
        for &(dx, dy) in &[(0.0, 0.0), (0.1, 0.0), (0.0, 0.1), (-0.1, 0.0), (0.0, -0.1)] {
            points.push(point(50.0 + dx, 50.0 + dy));
        }

        let labels = DensityClusterer::with_defaults().cluster(&points).unwrap();

        // Ids are issued in first-encounter order.
        assert_eq!(labels[..5], vec![ClusterId(0); 5][..]);
        assert_eq!(labels[5..], vec![ClusterId(1); 5][..]);
    }

    #[test]
    fn test_cluster_empty_input() {
        let labels = DensityClusterer::with_defaults().cluster(&[]).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn test_cluster_fewer_points_than_min_cluster_size() {
        let points = vec![point(0.0, 0.0), point(0.1, 0.0), point(0.2, 0.0)];
        let labels = DensityClusterer::with_defaults().cluster(&points).unwrap();
        assert_eq!(labels, vec![ClusterId::NOISE; 3]);
    }

    #[test]
    fn test_cluster_coincident_points_form_one_cluster() {
        let points = vec![point(1.0, 1.0); 6];
        let labels = DensityClusterer::with_defaults().cluster(&points).unwrap();
        assert_eq!(labels, vec![ClusterId(0); 6]);
    }

    #[test]
    fn test_cluster_min_cluster_size_too_small() {
        for bad in [0, 1] {
            let clusterer = DensityClusterer::new(ClusteringConfig {
                min_cluster_size: bad,
                min_samples: None,
            });
            let err = clusterer.cluster(&[point(0.0, 0.0)]).unwrap_err();
            assert!(matches!(err, AtlasError::Clustering(_)));
            assert!(err.to_string().contains("min_cluster_size"));
        }
    }

    #[test]
    fn test_cluster_min_samples_out_of_range() {
        for bad in [0, 6] {
            let clusterer = DensityClusterer::new(ClusteringConfig {
                min_cluster_size: 5,
                min_samples: Some(bad),
            });
            let err = clusterer.cluster(&[point(0.0, 0.0)]).unwrap_err();
            assert!(matches!(err, AtlasError::Clustering(_)));
            assert!(err.to_string().contains("min_samples"));
        }
    }

    #[test]
    fn test_cluster_min_samples_within_range_accepted() {
        let clusterer = DensityClusterer::new(ClusteringConfig {
            min_cluster_size: 5,
            min_samples: Some(2),
        });
        let labels = clusterer.cluster(&dense_group_among_strays()).unwrap();
        assert_eq!(labels.len(), 12);
    }

    #[test]
    fn test_cluster_non_finite_coordinate_names_index() {
        let points = vec![point(0.0, 0.0), point(1.0, 1.0), point(f32::NAN, 0.0)];
        let err = DensityClusterer::with_defaults().cluster(&points).unwrap_err();
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn test_cluster_deterministic() {
        let points = dense_group_among_strays();
        let clusterer = DensityClusterer::with_defaults();
        let first = clusterer.cluster(&points).unwrap();
        let second = clusterer.cluster(&points).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_gap_threshold_significant_gap() {
        let weights = vec![0.2, 0.2, 0.2, 0.2, 14.1, 20.0];
        assert_eq!(gap_threshold(&weights), 0.2);
    }

    #[test]
    fn test_gap_threshold_uniform_weights_fall_back() {
        // No significant gap; the 75th-percentile weight keeps the tree
        // mostly connected.
        let weights = vec![1.0, 1.1, 1.2, 1.3];
        assert_eq!(gap_threshold(&weights), 1.3);
    }

    #[test]
    fn test_mst_spans_all_points() {
        let reach = vec![
            vec![0.0, 1.0, 4.0],
            vec![1.0, 0.0, 2.0],
            vec![4.0, 2.0, 0.0],
        ];
        let mst = build_mst(&reach);
        assert_eq!(mst.len(), 2);
        let total: f32 = mst.iter().map(|&(_, _, w)| w).sum();
        assert_eq!(total, 3.0);
    }
}
