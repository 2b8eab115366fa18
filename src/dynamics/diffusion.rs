//! Diffusive coupling step
//!
//! One coupled update of every node given the current topology:
//!
//!   mapped   = f(x)
//!   coupling = A · mapped
//!   x'ᵢ      = (1-ε)·mappedᵢ + (ε/kᵢ)·couplingᵢ     (kᵢ > 0)
//!   x'ᵢ      = (1-ε)·mappedᵢ                         (kᵢ = 0)

use ndarray::{Array1, Array2};

use super::map::logistic_map_array;

/// Per-run coupling parameters. Immutable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingParams {
    /// Map parameter a
    pub a: f64,
    /// Coupling strength ε
    pub epsilon: f64,
    /// Diffusion sub-iterations T per outer step
    pub inner_steps: usize,
}

impl CouplingParams {
    pub fn new(a: f64, epsilon: f64, inner_steps: usize) -> Self {
        Self { a, epsilon, inner_steps }
    }
}

/// Single coupled update. Inputs are not modified.
///
/// `adjacency` is a binary n×n matrix and `degree[i]` its i-th row sum;
/// both must match `state` in length.
pub fn diffuse(
    state: &Array1<f64>,
    adjacency: &Array2<u8>,
    degree: &Array1<usize>,
    epsilon: f64,
    a: f64,
) -> Array1<f64> {
    let n = state.len();
    debug_assert_eq!(adjacency.dim(), (n, n));
    debug_assert_eq!(degree.len(), n);

    let mapped = logistic_map_array(state, a);
    let mut next = Array1::zeros(n);

    for i in 0..n {
        let local = (1.0 - epsilon) * mapped[i];

        next[i] = if degree[i] > 0 {
            let coupling: f64 = adjacency
                .row(i)
                .iter()
                .zip(mapped.iter())
                .filter(|(edge, _)| **edge != 0)
                .map(|(_, m)| *m)
                .sum();
            local + (epsilon / degree[i] as f64) * coupling
        } else {
            local
        };
    }

    next
}

/// Apply [`diffuse`] `params.inner_steps` times and return the final state.
pub fn iterate(
    state: &Array1<f64>,
    adjacency: &Array2<u8>,
    degree: &Array1<usize>,
    params: &CouplingParams,
) -> Array1<f64> {
    let mut current = state.clone();
    for _ in 0..params.inner_steps {
        current = diffuse(&current, adjacency, degree, params.epsilon, params.a);
    }
    current
}
