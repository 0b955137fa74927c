//! Brute-force nearest-neighbor helpers shared by the projector and the
//! clusterer. Batches here are small enough that the quadratic scan beats an
//! index structure.

use std::cmp::Ordering;

/// Euclidean distance between two equal-length vectors.
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// The `k` nearest neighbors of every vector as `(index, distance)` pairs,
/// ascending by distance. Ties break on the lower index, so the result is
/// deterministic for a given input.
pub fn knn(vectors: &[Vec<f32>], k: usize) -> Vec<Vec<(usize, f32)>> {
    let n = vectors.len();
    let mut lists = Vec::with_capacity(n);
    for i in 0..n {
        let mut dists: Vec<(usize, f32)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, euclidean(&vectors[i], &vectors[j])))
            .collect();
        dists.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        dists.truncate(k);
        lists.push(dists);
    }
    lists
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_knn_orders_by_distance() {
        let vectors = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 0.0],
        ];
        let lists = knn(&vectors, 2);
        assert_eq!(lists[0].len(), 2);
        assert_eq!(lists[0][0].0, 1);
        assert_eq!(lists[0][1].0, 2);
        // The farthest point's nearest neighbor is the 3.0 one.
        assert_eq!(lists[3][0].0, 2);
    }

    #[test]
    fn test_knn_excludes_self() {
        let vectors = vec![vec![0.0], vec![0.0], vec![0.0]];
        let lists = knn(&vectors, 3);
        for (i, list) in lists.iter().enumerate() {
            assert_eq!(list.len(), 2);
            assert!(list.iter().all(|&(j, _)| j != i));
        }
    }

    #[test]
    fn test_knn_tie_break_on_index() {
        // Points 1 and 2 are equidistant from point 0.
        let vectors = vec![vec![0.0], vec![1.0], vec![-1.0]];
        let lists = knn(&vectors, 2);
        assert_eq!(lists[0][0].0, 1);
        assert_eq!(lists[0][1].0, 2);
    }
}
