//! Adaptive Coupled Map Network
//!
//! N quadratic maps coupled diffusively over a graph that rewires itself
//! from the state dynamics. One outer step is:
//!
//! 1. (optional) redraw all states uniformly in [-1, 1)
//! 2. T diffusion sub-iterations  x ← (1-ε)f(x) + (ε/k)·A f(x)
//! 3. one rewiring event on the resulting states, then pruning
//!
//! ## Collapse
//!
//! Pruning can shrink the network to one node or none. The system is then
//! terminal: further steps are no-ops.

use ndarray::Array1;
use tracing::warn;

use super::traits::DynamicalSystem;
use crate::dynamics::{iterate, CouplingParams};
use crate::error::CmlResult;
use crate::network::{rewire, Network, RewireReport};
use crate::random::RandomSource;

/// Snapshot of an adaptive coupled map network
#[derive(Debug, Clone)]
pub struct CoupledMapState {
    /// Node states xᵢ
    pub states: Array1<f64>,
    /// Current node count n
    pub n_nodes: usize,
    /// Current undirected edge count
    pub n_edges: usize,
    /// Mean degree 2E/n
    pub mean_degree: f64,
    /// Outer steps taken
    pub time: usize,
    /// Nodes pruned since the start of the run
    pub pruned_total: usize,
}

/// Coupled maps on a self-rewiring network
#[derive(Debug, Clone)]
pub struct CoupledMapNetwork {
    network: Network,
    params: CouplingParams,
    /// Redraw states at the start of every outer step
    resample_states: bool,
    time: usize,
    pruned_total: usize,
    last_report: RewireReport,
}

impl CoupledMapNetwork {
    /// Wrap an existing network
    pub fn new(network: Network, params: CouplingParams) -> Self {
        Self {
            network,
            params,
            resample_states: false,
            time: 0,
            pruned_total: 0,
            last_report: RewireReport::default(),
        }
    }

    /// Fresh G(n, p) network with uniform states in [-1, 1)
    pub fn random<R: RandomSource + ?Sized>(
        n: usize,
        p: f64,
        params: CouplingParams,
        rng: &mut R,
    ) -> CmlResult<Self> {
        Ok(Self::new(Network::random(n, p, rng)?, params))
    }

    /// Redraw the states before each outer step instead of carrying them over
    pub fn with_state_resampling(mut self, enabled: bool) -> Self {
        self.resample_states = enabled;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Outer steps taken so far
    pub fn time(&self) -> usize {
        self.time
    }

    /// Outcome of the most recent rewiring event
    pub fn last_report(&self) -> &RewireReport {
        &self.last_report
    }

    /// T diffusion iterations on the current network, without rewiring
    pub fn diffused_state(&self) -> Array1<f64> {
        iterate(
            self.network.state(),
            self.network.adjacency(),
            self.network.degree(),
            &self.params,
        )
    }
}

impl DynamicalSystem for CoupledMapNetwork {
    type State = CoupledMapState;

    fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        if self.is_terminal() {
            return;
        }

        if self.resample_states {
            if let Err(err) = self.network.randomize_states(rng) {
                warn!(%err, "state resampling failed");
            }
        }

        let next = self.diffused_state();
        if let Err(err) = self.network.set_state(next) {
            // Diffusion preserves length; unreachable unless arrays diverged.
            warn!(%err, "diffusion produced a mismatched state vector");
            return;
        }

        self.last_report = rewire(&mut self.network, rng);
        self.pruned_total += self.last_report.pruned;
        self.time += 1;
    }

    fn state(&self) -> CoupledMapState {
        CoupledMapState {
            states: self.network.state().clone(),
            n_nodes: self.network.len(),
            n_edges: self.network.edge_count(),
            mean_degree: self.network.mean_degree(),
            time: self.time,
            pruned_total: self.pruned_total,
        }
    }

    fn n_elements(&self) -> usize {
        self.network.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::diffuse;
    use crate::random::{ScriptedSource, SeededSource};
    use ndarray::array;

    #[test]
    fn test_step_diffuses_then_rewires() {
        let net = Network::from_edges(
            &[(0, 1), (1, 2), (2, 3), (3, 0)],
            array![0.0, 0.1, 0.9, 1.0],
        )
        .unwrap();
        let params = CouplingParams::new(1.4, 0.3, 2);
        let mut system = CoupledMapNetwork::new(net.clone(), params);

        let once = diffuse(net.state(), net.adjacency(), net.degree(), 0.3, 1.4);
        let twice = diffuse(&once, net.adjacency(), net.degree(), 0.3, 1.4);

        let mut rng = ScriptedSource::picks(vec![0]);
        system.step(&mut rng);

        assert_eq!(system.time(), 1);
        assert_eq!(system.last_report().pivot, Some(0));
        // Rewiring never touches state values, only their indices.
        if system.last_report().pruned == 0 {
            assert_eq!(system.network().state(), &twice);
        }
        assert!(system.network().is_consistent());
    }

    #[test]
    fn test_size_never_grows() {
        let mut rng = SeededSource::from_seed(2024);
        let params = CouplingParams::new(1.9, 0.4, 5);
        let mut system = CoupledMapNetwork::random(60, 0.08, params, &mut rng).unwrap();

        let mut previous = system.n_elements();
        for _ in 0..300 {
            system.step(&mut rng);
            let n = system.n_elements();
            assert!(n <= previous);
            assert!(system.network().is_consistent());
            previous = n;
        }

        let snapshot = system.state();
        assert_eq!(snapshot.n_nodes, previous);
        assert_eq!(snapshot.states.len(), previous);
        assert_eq!(60 - snapshot.pruned_total, previous);
    }

    #[test]
    fn test_collapsed_system_is_terminal() {
        let net = Network::new(array![[0u8]], array![0.2]).unwrap();
        let mut system = CoupledMapNetwork::new(net, CouplingParams::new(1.5, 0.2, 3));
        let mut rng = ScriptedSource::default();

        assert!(system.is_terminal());
        assert_eq!(system.run(10, &mut rng), 0);
        assert_eq!(system.time(), 0);
        assert_eq!(system.network().state(), &array![0.2]);
    }

    #[test]
    fn test_resampling_redraws_before_diffusion() {
        let net = Network::from_edges(&[(0, 1)], array![5.0, 5.0]).unwrap();
        let mut system = CoupledMapNetwork::new(net, CouplingParams::new(1.0, 0.0, 0))
            .with_state_resampling(true);
        // Units 0.25 and 0.75 map to -0.5 and 0.5
        let mut rng = ScriptedSource::new(vec![0], vec![0.25, 0.75]);

        system.step(&mut rng);

        assert_eq!(system.network().state(), &array![-0.5, 0.5]);
    }
}
