//! Clustering, characteristic path length and the small-world index ω
//!
//! All three are measured on the largest connected component:
//!
//!   C = (1/n) Σᵢ cᵢ,   cᵢ = 2·tᵢ / (kᵢ(kᵢ-1))      (cᵢ = 0 when kᵢ < 2)
//!   L = mean shortest-path length over ordered pairs
//!   ω = (C / C_rand) / (L / L_rand)
//!
//! where C_rand, L_rand come from a connected G(n, m) graph with the same
//! node and edge count.

use std::collections::VecDeque;

use ndarray::Array2;

use super::components::{is_connected, largest_component_subgraph};
use crate::network::gnm_random;
use crate::random::RandomSource;

/// Attempts at drawing a connected reference graph before giving up
pub const REFERENCE_ATTEMPTS: usize = 5;

/// Clustering C, path length L and small-world index ω
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallWorldMetrics {
    pub clustering: f64,
    pub path_length: f64,
    pub omega: f64,
}

impl SmallWorldMetrics {
    /// All-NaN sentinel for graphs where the metrics are not computable
    pub fn undefined() -> Self {
        Self {
            clustering: f64::NAN,
            path_length: f64::NAN,
            omega: f64::NAN,
        }
    }

    /// True only when all three values are numbers
    pub fn is_defined(&self) -> bool {
        !(self.clustering.is_nan() || self.path_length.is_nan() || self.omega.is_nan())
    }
}

/// Compute C, L, ω on the largest connected component.
///
/// Returns [`SmallWorldMetrics::undefined`] when the component has fewer
/// than two nodes or no edges, when no connected reference graph is found
/// in [`REFERENCE_ATTEMPTS`] draws (a draw that fails to place m edges
/// counts as a failed attempt), or when L, C_rand or L_rand is zero.
pub fn small_world<R: RandomSource + ?Sized>(adjacency: &Array2<u8>, rng: &mut R) -> SmallWorldMetrics {
    let lcc = largest_component_subgraph(adjacency);
    let n = lcc.nrows();
    if n < 2 {
        return SmallWorldMetrics::undefined();
    }

    let clustering = average_clustering(&lcc);
    let path_length = match average_shortest_path_length(&lcc) {
        Some(l) => l,
        None => return SmallWorldMetrics::undefined(),
    };

    let m = edge_count(&lcc);
    if m == 0 {
        return SmallWorldMetrics::undefined();
    }

    let reference = (0..REFERENCE_ATTEMPTS)
        .filter_map(|_| gnm_random(n, m, &mut *rng))
        .find(is_connected);
    let reference = match reference {
        Some(graph) => graph,
        None => return SmallWorldMetrics::undefined(),
    };

    let clustering_rand = average_clustering(&reference);
    let path_length_rand = match average_shortest_path_length(&reference) {
        Some(l) => l,
        None => return SmallWorldMetrics::undefined(),
    };

    if path_length == 0.0 || clustering_rand == 0.0 || path_length_rand == 0.0 {
        return SmallWorldMetrics::undefined();
    }

    SmallWorldMetrics {
        clustering,
        path_length,
        omega: (clustering / clustering_rand) / (path_length / path_length_rand),
    }
}

/// Mean local clustering coefficient; 0.0 for an empty graph
pub fn average_clustering(adjacency: &Array2<u8>) -> f64 {
    let n = adjacency.nrows();
    if n == 0 {
        return 0.0;
    }

    let neighbors = neighbor_lists(adjacency);
    let mut total = 0.0;

    for nbrs in &neighbors {
        let k = nbrs.len();
        if k < 2 {
            continue;
        }
        let mut triangles = 0usize;
        for (a, &u) in nbrs.iter().enumerate() {
            for &v in &nbrs[a + 1..] {
                if adjacency[[u, v]] != 0 {
                    triangles += 1;
                }
            }
        }
        total += 2.0 * triangles as f64 / (k * (k - 1)) as f64;
    }

    total / n as f64
}

/// Mean BFS distance over all ordered pairs.
///
/// `None` for an empty or disconnected graph; 0.0 for a single node.
pub fn average_shortest_path_length(adjacency: &Array2<u8>) -> Option<f64> {
    let n = adjacency.nrows();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(0.0);
    }

    let neighbors = neighbor_lists(adjacency);
    let mut total: usize = 0;
    let mut dist = vec![usize::MAX; n];
    let mut queue = VecDeque::with_capacity(n);

    for source in 0..n {
        dist.iter_mut().for_each(|d| *d = usize::MAX);
        dist[source] = 0;
        queue.clear();
        queue.push_back(source);
        let mut reached = 1;

        while let Some(u) = queue.pop_front() {
            for &v in &neighbors[u] {
                if dist[v] == usize::MAX {
                    dist[v] = dist[u] + 1;
                    total += dist[v];
                    reached += 1;
                    queue.push_back(v);
                }
            }
        }

        if reached < n {
            return None;
        }
    }

    Some(total as f64 / (n * (n - 1)) as f64)
}

fn neighbor_lists(adjacency: &Array2<u8>) -> Vec<Vec<usize>> {
    adjacency
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, edge)| **edge != 0)
                .map(|(j, _)| j)
                .collect()
        })
        .collect()
}

fn edge_count(adjacency: &Array2<u8>) -> usize {
    adjacency.iter().filter(|&&edge| edge != 0).count() / 2
}
