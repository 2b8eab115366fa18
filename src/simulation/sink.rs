//! Result persistence: metric log plus optional matrix/state artifacts
//!
//! Layout under the results directory:
//!
//! ```text
//! results_p0.020/
//! ├── network_metrics.txt
//! └── simulation_1/
//!     ├── networks/eps_0.100/matrix_eps_0.100_step_1000.txt
//!     └── states/eps_0.100/states_eps_0.100_step_1000.txt
//! ```
//!
//! Matrices are comma-delimited integers, one row per line. States are one
//! value per line in scientific notation.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};

use super::config::SimulationConfig;
use crate::analysis::{CommunityStats, SmallWorldMetrics};
use crate::error::{CmlError, CmlResult};

/// Header line of the metric log
pub const CSV_HEADER: &str =
    "epsilon,simulation,time_step,clustering,path_length,omega,s1,s2,mean_size,std_size,num_communities,N";

/// File name of the metric log inside the results directory
pub const METRICS_FILE: &str = "network_metrics.txt";

/// One sampled row of the metric log
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub epsilon: f64,
    /// 1-based simulation index
    pub simulation: usize,
    pub time_step: usize,
    pub clustering: f64,
    pub path_length: f64,
    pub omega: f64,
    pub s1: usize,
    pub s2: usize,
    pub mean_size: f64,
    pub std_size: f64,
    pub num_communities: usize,
    /// Node count at the sampling point
    pub n_nodes: usize,
}

impl MetricRow {
    pub fn new(
        epsilon: f64,
        simulation: usize,
        time_step: usize,
        metrics: &SmallWorldMetrics,
        communities: &CommunityStats,
        n_nodes: usize,
    ) -> Self {
        Self {
            epsilon,
            simulation,
            time_step,
            clustering: metrics.clustering,
            path_length: metrics.path_length,
            omega: metrics.omega,
            s1: communities.largest,
            s2: communities.second,
            mean_size: communities.mean_size,
            std_size: communities.std_size,
            num_communities: communities.count,
            n_nodes,
        }
    }

    /// CSV line without trailing newline, columns as in [`CSV_HEADER`]
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            self.epsilon,
            self.simulation,
            self.time_step,
            self.clustering,
            self.path_length,
            self.omega,
            self.s1,
            self.s2,
            self.mean_size,
            self.std_size,
            self.num_communities,
            self.n_nodes,
        )
    }
}

/// Destination for sampled results
pub trait ResultSink {
    /// Append one metric row
    fn record(&mut self, row: &MetricRow) -> CmlResult<()>;

    /// Persist the adjacency matrix of a sampling point
    fn save_matrix(
        &mut self,
        simulation: usize,
        epsilon: f64,
        step: usize,
        adjacency: &Array2<u8>,
    ) -> CmlResult<()>;

    /// Persist the state vector of a sampling point
    fn save_states(
        &mut self,
        simulation: usize,
        epsilon: f64,
        step: usize,
        states: &Array1<f64>,
    ) -> CmlResult<()>;

    fn flush(&mut self) -> CmlResult<()> {
        Ok(())
    }
}

/// File-backed sink writing the layout described in the module docs
pub struct CsvResultSink {
    root: PathBuf,
    writer: BufWriter<File>,
}

impl CsvResultSink {
    /// Create the results tree for `config` and open the metric log.
    ///
    /// Artifact folders for every (simulation, epsilon) pair are created up
    /// front when the matching option is enabled.
    pub fn create(root: impl AsRef<Path>, config: &SimulationConfig) -> CmlResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        for simulation in 1..=config.num_simulations {
            let sim_dir = simulation_dir(&root, simulation);
            for &eps in &config.epsilon {
                if config.options.save_matrix {
                    fs::create_dir_all(sim_dir.join("networks").join(eps_label(eps)))?;
                }
                if config.options.save_states {
                    fs::create_dir_all(sim_dir.join("states").join(eps_label(eps)))?;
                }
            }
            fs::create_dir_all(&sim_dir)?;
        }

        let file = File::create(root.join(METRICS_FILE))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", CSV_HEADER)?;

        Ok(Self { root, writer })
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.root.join(METRICS_FILE)
    }

    pub fn matrix_path(&self, simulation: usize, epsilon: f64, step: usize) -> PathBuf {
        simulation_dir(&self.root, simulation)
            .join("networks")
            .join(eps_label(epsilon))
            .join(format!("matrix_{}_step_{}.txt", eps_label(epsilon), step))
    }

    pub fn states_path(&self, simulation: usize, epsilon: f64, step: usize) -> PathBuf {
        simulation_dir(&self.root, simulation)
            .join("states")
            .join(eps_label(epsilon))
            .join(format!("states_{}_step_{}.txt", eps_label(epsilon), step))
    }
}

impl ResultSink for CsvResultSink {
    fn record(&mut self, row: &MetricRow) -> CmlResult<()> {
        writeln!(self.writer, "{}", row.to_csv())?;
        Ok(())
    }

    fn save_matrix(
        &mut self,
        simulation: usize,
        epsilon: f64,
        step: usize,
        adjacency: &Array2<u8>,
    ) -> CmlResult<()> {
        let path = self.matrix_path(simulation, epsilon, step);
        ensure_parent(&path)?;
        write_matrix(&path, adjacency)
    }

    fn save_states(
        &mut self,
        simulation: usize,
        epsilon: f64,
        step: usize,
        states: &Array1<f64>,
    ) -> CmlResult<()> {
        let path = self.states_path(simulation, epsilon, step);
        ensure_parent(&path)?;
        write_states(&path, states)
    }

    fn flush(&mut self) -> CmlResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink, useful for tests and programmatic sweeps
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub rows: Vec<MetricRow>,
    pub matrices: Vec<(usize, f64, usize, Array2<u8>)>,
    pub states: Vec<(usize, f64, usize, Array1<f64>)>,
}

impl ResultSink for MemorySink {
    fn record(&mut self, row: &MetricRow) -> CmlResult<()> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn save_matrix(
        &mut self,
        simulation: usize,
        epsilon: f64,
        step: usize,
        adjacency: &Array2<u8>,
    ) -> CmlResult<()> {
        self.matrices.push((simulation, epsilon, step, adjacency.clone()));
        Ok(())
    }

    fn save_states(
        &mut self,
        simulation: usize,
        epsilon: f64,
        step: usize,
        states: &Array1<f64>,
    ) -> CmlResult<()> {
        self.states.push((simulation, epsilon, step, states.clone()));
        Ok(())
    }
}

fn simulation_dir(root: &Path, simulation: usize) -> PathBuf {
    root.join(format!("simulation_{}", simulation))
}

fn eps_label(epsilon: f64) -> String {
    format!("eps_{:.3}", epsilon)
}

fn ensure_parent(path: &Path) -> CmlResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write a binary matrix as comma-delimited integers
pub fn write_matrix(path: &Path, adjacency: &Array2<u8>) -> CmlResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for row in adjacency.rows() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(w, "{}", line.join(","))?;
    }
    w.flush()?;
    Ok(())
}

/// Parse a matrix written by [`write_matrix`]
pub fn read_matrix(path: &Path) -> CmlResult<Array2<u8>> {
    let reader = BufReader::new(File::open(path)?);
    let mut values = Vec::new();
    let mut n_rows = 0;
    let mut n_cols: Option<usize> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split(',')
            .map(|field| {
                field.trim().parse::<u8>().map_err(|e| CmlError::Parse {
                    line: idx + 1,
                    reason: format!("{:?}: {}", field, e),
                })
            })
            .collect::<CmlResult<Vec<u8>>>()?;

        match n_cols {
            Some(cols) if cols != row.len() => {
                return Err(CmlError::Parse {
                    line: idx + 1,
                    reason: format!("expected {} columns, found {}", cols, row.len()),
                });
            }
            _ => n_cols = Some(row.len()),
        }
        values.extend(row);
        n_rows += 1;
    }

    Array2::from_shape_vec((n_rows, n_cols.unwrap_or(0)), values).map_err(|e| CmlError::Parse {
        line: n_rows,
        reason: e.to_string(),
    })
}

/// Write a state vector, one value per line
pub fn write_states(path: &Path, states: &Array1<f64>) -> CmlResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for x in states {
        writeln!(w, "{:.18e}", x)?;
    }
    w.flush()?;
    Ok(())
}

/// Parse a state vector written by [`write_states`]
pub fn read_states(path: &Path) -> CmlResult<Array1<f64>> {
    let reader = BufReader::new(File::open(path)?);
    let mut states = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = line.parse::<f64>().map_err(|e| CmlError::Parse {
            line: idx + 1,
            reason: format!("{:?}: {}", line, e),
        })?;
        states.push(value);
    }

    Ok(Array1::from(states))
}
