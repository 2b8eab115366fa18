//! Systems Module: Dynamical Models Driven by the Simulation Loop
//!
//! - **CoupledMapNetwork**: quadratic maps with diffusive coupling on an
//!   adaptively rewired, self-pruning graph

mod traits;
mod coupled_map;

pub use traits::DynamicalSystem;
pub use coupled_map::{CoupledMapNetwork, CoupledMapState};
