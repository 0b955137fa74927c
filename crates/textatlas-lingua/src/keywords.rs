//! Graph-based term ranking.
//!
//! Terms are nodes; co-occurrence within a sliding window forms weighted,
//! undirected edges; scores come from a PageRank iteration over the graph.

use std::collections::HashMap;

const DAMPING: f64 = 0.85;
const MAX_ITERATIONS: usize = 100;
const CONVERGENCE_EPSILON: f64 = 1.0e-6;

/// Rank the given term sequence by graph centrality.
///
/// `terms` is the document's candidate terms in order of appearance; each
/// pair of terms closer than `window_size` positions adds 1 to their edge
/// weight. Returns every distinct term with its score, descending, ties kept
/// in first-appearance order. Deterministic for a given input.
pub fn rank_terms(terms: &[String], window_size: usize) -> Vec<(String, f64)> {
    if terms.is_empty() {
        return Vec::new();
    }
    let window_size = window_size.max(2);

    // Node ids in first-appearance order keep iteration deterministic.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut nodes: Vec<&str> = Vec::new();
    for term in terms {
        if !index.contains_key(term.as_str()) {
            index.insert(term, nodes.len());
            nodes.push(term);
        }
    }
    let n = nodes.len();

    // Accumulate co-occurrence counts, then freeze into sorted adjacency
    // lists so the score summation order is fixed.
    let mut weight_maps: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];
    for (i, term) in terms.iter().enumerate() {
        let a = index[term.as_str()];
        let end = (i + window_size).min(terms.len());
        for other in &terms[i + 1..end] {
            let b = index[other.as_str()];
            if a == b {
                continue;
            }
            *weight_maps[a].entry(b).or_insert(0.0) += 1.0;
            *weight_maps[b].entry(a).or_insert(0.0) += 1.0;
        }
    }
    let adjacency: Vec<Vec<(usize, f64)>> = weight_maps
        .into_iter()
        .map(|map| {
            let mut edges: Vec<(usize, f64)> = map.into_iter().collect();
            edges.sort_by_key(|(neighbor, _)| *neighbor);
            edges
        })
        .collect();
    let out_weight: Vec<f64> = adjacency
        .iter()
        .map(|edges| edges.iter().map(|(_, w)| w).sum())
        .collect();

    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![(1.0 - DAMPING) / n as f64; n];
        for (node, edges) in adjacency.iter().enumerate() {
            for &(neighbor, weight) in edges {
                // Edges are symmetric, so out_weight[neighbor] is non-zero.
                next[node] += DAMPING * scores[neighbor] * weight / out_weight[neighbor];
            }
        }
        let delta: f64 = scores
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).abs())
            .sum();
        scores = next;
        if delta < CONVERGENCE_EPSILON {
            break;
        }
    }

    let mut ranked: Vec<(String, f64)> = nodes
        .into_iter()
        .map(str::to_string)
        .zip(scores)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_terms(&[], 10).is_empty());
    }

    #[test]
    fn test_single_term() {
        let ranked = rank_terms(&terms(&["solo"]), 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, "solo");
    }

    #[test]
    fn test_hub_term_ranks_first() {
        // "graph" co-occurs with every other term and most often.
        let seq = terms(&[
            "graph", "node", "graph", "edge", "graph", "weight", "graph", "score",
        ]);
        let ranked = rank_terms(&seq, 3);
        assert_eq!(ranked[0].0, "graph");
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn test_returns_all_distinct_terms() {
        let seq = terms(&["alpha", "beta", "gamma", "alpha"]);
        let ranked = rank_terms(&seq, 10);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let seq = terms(&[
            "cluster", "label", "prompt", "cluster", "noise", "label", "prompt", "noise",
            "cluster", "point",
        ]);
        let first = rank_terms(&seq, 10);
        let second = rank_terms(&seq, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_limits_edges() {
        // With the minimum window only adjacent terms connect, so the middle
        // term bridges both ends and ranks first.
        let seq = terms(&["left", "middle", "right"]);
        let ranked = rank_terms(&seq, 2);
        assert_eq!(ranked[0].0, "middle");
    }

    #[test]
    fn test_repeated_term_adds_no_self_edge() {
        let seq = terms(&["alone", "alone"]);
        let ranked = rank_terms(&seq, 2);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, "alone");
    }
}
