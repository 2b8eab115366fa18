//! Simulation Module: Sweeps, Configuration and Result Output
//!
//! ```text
//! SimulationConfig ──► SimulationRunner ──► GraphAnalysis (every K steps)
//!                           │
//!                           └──► ResultSink (CSV log, matrix/state files)
//! ```

mod config;
mod sink;
mod runner;

pub use config::{OutputOptions, SimulationConfig};
pub use sink::{
    CsvResultSink,
    MemorySink,
    MetricRow,
    ResultSink,
    CSV_HEADER,
    METRICS_FILE,
    read_matrix,
    read_states,
    write_matrix,
    write_states,
};
pub use runner::{RunSummary, SimulationRunner};
