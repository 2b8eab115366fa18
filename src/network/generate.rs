//! Random graph and state generation
//!
//! - G(n, p): each unordered pair i<j linked independently with probability p
//! - G(n, m): uniform over simple graphs with exactly m edges (reference
//!   graphs for the small-world index)

use ndarray::{Array1, Array2};

use super::Network;
use crate::error::CmlResult;
use crate::random::RandomSource;

/// Erdős–Rényi G(n, p) adjacency: upper triangle drawn, then mirrored.
pub fn erdos_renyi<R: RandomSource + ?Sized>(n: usize, p: f64, rng: &mut R) -> Array2<u8> {
    let mut adjacency = Array2::zeros((n, n));

    for i in 0..n {
        for j in i + 1..n {
            if rng.unit() < p {
                adjacency[[i, j]] = 1;
                adjacency[[j, i]] = 1;
            }
        }
    }

    adjacency
}

/// Draws allowed per possible pair before [`gnm_random`] gives up
const GNM_DRAWS_PER_PAIR: usize = 100;

/// G(n, m) adjacency by rejection sampling of node pairs.
///
/// When `m` reaches the number of possible pairs the complete graph is
/// returned directly. `None` if `m` distinct pairs were not found within
/// `GNM_DRAWS_PER_PAIR` draws per possible pair.
pub fn gnm_random<R: RandomSource + ?Sized>(n: usize, m: usize, rng: &mut R) -> Option<Array2<u8>> {
    let mut adjacency = Array2::zeros((n, n));
    if n < 2 {
        return Some(adjacency);
    }

    let max_edges = n * (n - 1) / 2;
    if m >= max_edges {
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    adjacency[[i, j]] = 1;
                }
            }
        }
        return Some(adjacency);
    }

    let max_draws = GNM_DRAWS_PER_PAIR * max_edges;
    let mut placed = 0;
    let mut draws = 0;
    while placed < m {
        if draws == max_draws {
            return None;
        }
        draws += 1;

        let u = rng.pick(n);
        let v = rng.pick(n);
        if u == v || adjacency[[u, v]] != 0 {
            continue;
        }
        adjacency[[u, v]] = 1;
        adjacency[[v, u]] = 1;
        placed += 1;
    }

    Some(adjacency)
}

/// Independent uniform states in `[low, high)`
pub fn uniform_states<R: RandomSource + ?Sized>(
    n: usize,
    low: f64,
    high: f64,
    rng: &mut R,
) -> Array1<f64> {
    Array1::from_iter((0..n).map(|_| rng.uniform(low, high)))
}

impl Network {
    /// Fresh G(n, p) network with uniform states in [-1, 1)
    pub fn random<R: RandomSource + ?Sized>(n: usize, p: f64, rng: &mut R) -> CmlResult<Self> {
        let adjacency = erdos_renyi(n, p, rng);
        let state = uniform_states(n, -1.0, 1.0, rng);
        Network::new(adjacency, state)
    }

    /// Redraw every state uniformly in [-1, 1)
    pub fn randomize_states<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> CmlResult<()> {
        let state = uniform_states(self.len(), -1.0, 1.0, rng);
        self.set_state(state)
    }
}
