//! Adaptive rewiring: replace the most dissimilar neighbour with the most
//! similar node, then prune isolated nodes
//!
//! ## Rule
//!
//! For a pivot i with distances dⱼ = |xⱼ - xᵢ| (dᵢ = ∞):
//!
//! - farthest = argmax over neighbours of dⱼ (first maximum wins)
//! - nearest  = argmin over all j of dⱼ (first minimum wins)
//!
//! If i has neighbours and nearest is not one of them, edge i–nearest is
//! added and edge i–farthest removed. The pivot keeps its degree; nearest
//! gains one and farthest loses one, possibly dropping to zero.
//!
//! Every node with degree zero is then removed permanently.

use tracing::debug;

use super::Network;
use crate::random::RandomSource;

/// The edge exchange performed around a pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSwap {
    /// Node that gained an edge to the pivot
    pub nearest: usize,
    /// Node that lost its edge to the pivot
    pub farthest: usize,
}

/// What one rewiring call did. Indices refer to the network before pruning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewireReport {
    /// Pivot node, `None` only for an empty network
    pub pivot: Option<usize>,
    /// Edge exchange, if the rewire condition held
    pub swap: Option<EdgeSwap>,
    /// Nodes removed by pruning
    pub pruned: usize,
}

impl RewireReport {
    pub fn rewired(&self) -> bool {
        self.swap.is_some()
    }
}

/// One rewiring event around a uniformly random pivot, followed by pruning.
pub fn rewire<R: RandomSource + ?Sized>(network: &mut Network, rng: &mut R) -> RewireReport {
    if network.is_empty() {
        return RewireReport::default();
    }
    let pivot = rng.pick(network.len());
    rewire_at(network, pivot)
}

/// One rewiring event around a given pivot, followed by pruning.
///
/// If no other node sits at a distance strictly below infinity (n ≤ 1, or
/// every distance is non-finite) the network is returned untouched and no
/// pruning happens.
pub fn rewire_at(network: &mut Network, pivot: usize) -> RewireReport {
    let mut report = RewireReport {
        pivot: Some(pivot),
        ..RewireReport::default()
    };

    let distances = distances_from(network, pivot);
    let farthest = farthest_neighbor(network, pivot, &distances);
    let nearest = match nearest_node(&distances) {
        Some(j) => j,
        None => return report,
    };

    if let Some(farthest) = farthest {
        if !network.has_edge(pivot, nearest) {
            network.connect(pivot, nearest);
            network.disconnect(pivot, farthest);
            report.swap = Some(EdgeSwap { nearest, farthest });
            debug!(pivot, nearest, farthest, "rewired edge");
        }
    }

    report.pruned = network.prune_isolated();
    if report.pruned > 0 {
        debug!(pruned = report.pruned, remaining = network.len(), "pruned isolated nodes");
    }

    report
}

/// |xⱼ - xᵢ| for every j, with the pivot itself at +∞
fn distances_from(network: &Network, pivot: usize) -> Vec<f64> {
    let state = network.state();
    let origin = state[pivot];

    state
        .iter()
        .enumerate()
        .map(|(j, &x)| if j == pivot { f64::INFINITY } else { (x - origin).abs() })
        .collect()
}

/// First neighbour with the largest distance
fn farthest_neighbor(network: &Network, pivot: usize, distances: &[f64]) -> Option<usize> {
    network.neighbors(pivot).fold(None, |best, j| match best {
        Some(b) if distances[j] > distances[b] => Some(j),
        Some(b) => Some(b),
        None => Some(j),
    })
}

/// First node with the smallest distance strictly below +∞
fn nearest_node(distances: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_distance = f64::INFINITY;

    for (j, &d) in distances.iter().enumerate() {
        if d < best_distance {
            best_distance = d;
            best = Some(j);
        }
    }

    best
}
