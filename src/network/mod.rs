//! Network Module: Co-evolving Topology
//!
//! The network is an undirected simple graph whose node count shrinks over
//! a run. Adjacency, degree and state are held in a single [`Network`]
//! aggregate and compacted together whenever nodes are pruned.
//!
//! ## Per-step topology update
//!
//! 1. Pick a pivot node uniformly at random
//! 2. Swap its most dissimilar neighbour for its most similar node
//! 3. Remove every node left with zero edges
//!
//! Pruned nodes never return, so n is monotonically non-increasing.

mod graph;
mod generate;
mod rewire;

pub use graph::Network;
pub use generate::{erdos_renyi, gnm_random, uniform_states};
pub use rewire::{EdgeSwap, RewireReport, rewire, rewire_at};
