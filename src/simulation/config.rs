//! Simulation configuration
//!
//! Read once from a JSON file and passed by value into the runner. Key
//! names follow the experiment files:
//!
//! ```json
//! {
//!   "N": 500, "T": 10, "a": 1.9, "time_steps": 100000,
//!   "epsilon": [0.1, 0.2, 0.3], "p": 0.02, "num_simulations": 5,
//!   "options": { "save_matrix": true, "save_states": false }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dynamics::CouplingParams;
use crate::error::{CmlError, CmlResult};

/// Artifact and dynamics toggles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Write the adjacency matrix at every sampling point
    #[serde(default)]
    pub save_matrix: bool,
    /// Write the state vector at every sampling point
    #[serde(default)]
    pub save_states: bool,
    /// Redraw uniform states before every outer step
    #[serde(default)]
    pub resample_states: bool,
}

/// Immutable parameters of a full sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Initial node count
    #[serde(rename = "N")]
    pub n_nodes: usize,
    /// Diffusion sub-iterations per outer step
    #[serde(rename = "T")]
    pub inner_steps: usize,
    /// Map parameter
    pub a: f64,
    /// Outer step budget (steps 0..=time_steps are executed)
    pub time_steps: usize,
    /// Coupling strengths to sweep
    pub epsilon: Vec<f64>,
    /// Initial edge probability
    pub p: f64,
    /// Independent repeats per coupling value
    pub num_simulations: usize,
    /// Sampling period K in outer steps
    #[serde(default = "SimulationConfig::default_sample_every")]
    pub sample_every: usize,
    /// Master seed; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub options: OutputOptions,
}

impl SimulationConfig {
    fn default_sample_every() -> usize {
        1000
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> CmlResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration string
    pub fn from_json(text: &str) -> CmlResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CmlResult<()> {
        if self.n_nodes == 0 {
            return Err(CmlError::InvalidConfig("N must be positive".into()));
        }
        if self.inner_steps == 0 {
            return Err(CmlError::InvalidConfig("T must be positive".into()));
        }
        if !self.a.is_finite() {
            return Err(CmlError::InvalidConfig(format!("a must be finite, got {}", self.a)));
        }
        if self.epsilon.is_empty() {
            return Err(CmlError::InvalidConfig("epsilon list is empty".into()));
        }
        if let Some(eps) = self.epsilon.iter().find(|e| !e.is_finite()) {
            return Err(CmlError::InvalidConfig(format!("epsilon must be finite, got {}", eps)));
        }
        if !(0.0..=1.0).contains(&self.p) {
            return Err(CmlError::InvalidConfig(format!("p must lie in [0, 1], got {}", self.p)));
        }
        if self.num_simulations == 0 {
            return Err(CmlError::InvalidConfig("num_simulations must be positive".into()));
        }
        if self.sample_every == 0 {
            return Err(CmlError::InvalidConfig("sample_every must be positive".into()));
        }
        Ok(())
    }

    /// Coupling parameters for one value of the sweep
    pub fn coupling(&self, epsilon: f64) -> CouplingParams {
        CouplingParams::new(self.a, epsilon, self.inner_steps)
    }

    /// Default results directory, `results_p{p:.3}`
    pub fn default_results_dir(&self) -> PathBuf {
        PathBuf::from(format!("results_p{:.3}", self.p))
    }
}
