//! Analysis Module: Network Metrics at Sampling Points
//!
//! Read-only measurements of the current topology, taken every K outer
//! steps by the simulation loop:
//!
//! - **Small-world profile**: clustering C, path length L and
//!   ω = (C/C_rand)/(L/L_rand), on the largest connected component
//! - **Community sizes**: Louvain partition → (s1, s2, ⟨s⟩, σ_s, n_s)
//!
//! Degenerate graphs never fail a run: small-world metrics fall back to a
//! NaN sentinel and community statistics to an all-zero sentinel.

mod components;
mod small_world;
mod community;

pub use components::{connected_components, is_connected, largest_component, largest_component_subgraph};
pub use small_world::{
    SmallWorldMetrics,
    REFERENCE_ATTEMPTS,
    average_clustering,
    average_shortest_path_length,
    small_world,
};
pub use community::{CommunityStats, LouvainConfig, Partition, louvain};

use ndarray::Array2;
use tracing::warn;

use crate::random::{RandomSource, SeededSource};

/// Graph measurements consumed by the simulation loop
pub trait GraphAnalysis {
    /// (C, L, ω) on the largest connected component, or the NaN sentinel
    fn clustering_and_path(&mut self, adjacency: &Array2<u8>) -> SmallWorldMetrics;

    /// Community size statistics, or the all-zero sentinel
    fn community_size_stats(&mut self, adjacency: &Array2<u8>) -> CommunityStats;
}

/// Default analysis backend: BFS/triangle metrics plus Louvain
#[derive(Debug, Clone)]
pub struct NetworkAnalyzer<R = SeededSource> {
    /// Source for reference random graphs
    rng: R,
    louvain: LouvainConfig,
}

impl<R: RandomSource> NetworkAnalyzer<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            louvain: LouvainConfig::default(),
        }
    }

    pub fn with_louvain(mut self, config: LouvainConfig) -> Self {
        self.louvain = config;
        self
    }
}

impl<R: RandomSource> GraphAnalysis for NetworkAnalyzer<R> {
    fn clustering_and_path(&mut self, adjacency: &Array2<u8>) -> SmallWorldMetrics {
        small_world(adjacency, &mut self.rng)
    }

    fn community_size_stats(&mut self, adjacency: &Array2<u8>) -> CommunityStats {
        if adjacency.iter().all(|&edge| edge == 0) {
            return CommunityStats::zero();
        }

        match louvain(adjacency, &self.louvain) {
            Ok(partition) => CommunityStats::from_sizes(&partition.community_sizes()),
            Err(err) => {
                warn!(%err, "community detection failed, recording zero sizes");
                CommunityStats::zero()
            }
        }
    }
}
