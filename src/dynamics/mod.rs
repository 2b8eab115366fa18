//! Dynamics Module: Local Chaotic Map and Diffusive Coupling
//!
//! Each node carries a scalar state x ∈ ℝ updated by the quadratic
//! (logistic-type) map
//!
//!   f(x) = 1 - a·x²
//!
//! and coupled to its current neighbours through degree-normalised
//! diffusion:
//!
//!   xᵢ' = (1 - ε)·f(xᵢ) + (ε / kᵢ) Σⱼ Aᵢⱼ f(xⱼ)
//!
//! Isolated nodes (kᵢ = 0) receive no diffusive term.
//!
//! ## Regimes
//!
//! - ε → 0: independent chaotic maps (for a near 2)
//! - ε → 1: each node is driven entirely by its neighbourhood mean,
//!   favouring synchronised clusters

mod map;
mod diffusion;

pub use map::{logistic_map, logistic_map_array};
pub use diffusion::{CouplingParams, diffuse, iterate};
