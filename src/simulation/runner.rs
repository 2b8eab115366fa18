//! Parameter sweep driver
//!
//! For every simulation index and every coupling value a fresh G(N, p)
//! network is grown and advanced through `time_steps + 1` outer steps.
//! After each step whose index is a multiple of `sample_every` the network
//! is measured and a row is handed to the sink.
//!
//! Once a run collapses to one node or none it stops advancing, but the
//! remaining sampling points are still recorded from the frozen network.

use tracing::{info, warn};

use super::config::SimulationConfig;
use super::sink::{MetricRow, ResultSink};
use crate::analysis::GraphAnalysis;
use crate::error::CmlResult;
use crate::random::SeededSource;
use crate::systems::{CoupledMapNetwork, DynamicalSystem};

/// Outcome of one (simulation, epsilon) run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// 1-based simulation index
    pub simulation: usize,
    pub epsilon: f64,
    /// Outer steps actually executed
    pub steps_taken: usize,
    pub final_nodes: usize,
    pub final_edges: usize,
    /// First step index after which the network was terminal
    pub collapsed_at: Option<usize>,
    /// Rows written to the sink
    pub samples: usize,
}

impl RunSummary {
    pub fn collapsed(&self) -> bool {
        self.collapsed_at.is_some()
    }
}

/// Sequential sweep over simulations × coupling values
pub struct SimulationRunner<A, S> {
    config: SimulationConfig,
    analysis: A,
    sink: S,
    /// Master source; every run forks its own stream
    rng: SeededSource,
}

impl<A: GraphAnalysis, S: ResultSink> SimulationRunner<A, S> {
    pub fn new(config: SimulationConfig, analysis: A, sink: S, rng: SeededSource) -> Self {
        Self {
            config,
            analysis,
            sink,
            rng,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run the full sweep and flush the sink.
    ///
    /// Fails on the first metric-log error; artifact errors are only logged.
    pub fn run(&mut self) -> CmlResult<Vec<RunSummary>> {
        let epsilons = self.config.epsilon.clone();
        let mut summaries = Vec::with_capacity(self.config.num_simulations * epsilons.len());

        for simulation in 1..=self.config.num_simulations {
            for &epsilon in &epsilons {
                summaries.push(self.run_single(simulation, epsilon)?);
            }
        }

        self.sink.flush()?;
        Ok(summaries)
    }

    /// One run for a given simulation index and coupling value
    pub fn run_single(&mut self, simulation: usize, epsilon: f64) -> CmlResult<RunSummary> {
        let mut rng = self.rng.fork();
        let params = self.config.coupling(epsilon);
        let mut system =
            CoupledMapNetwork::random(self.config.n_nodes, self.config.p, params, &mut rng)?
                .with_state_resampling(self.config.options.resample_states);

        let mut steps_taken = 0;
        let mut collapsed_at = None;
        let mut samples = 0;

        for step in 0..=self.config.time_steps {
            if !system.is_terminal() {
                system.step(&mut rng);
                steps_taken += 1;

                if system.is_terminal() {
                    warn!(
                        simulation,
                        epsilon,
                        step,
                        nodes = system.n_elements(),
                        "network collapsed, freezing run"
                    );
                    collapsed_at = Some(step);
                }
            }

            if step % self.config.sample_every == 0 {
                self.sample(&system, simulation, epsilon, step)?;
                samples += 1;
            }
        }

        let network = system.network();
        Ok(RunSummary {
            simulation,
            epsilon,
            steps_taken,
            final_nodes: network.len(),
            final_edges: network.edge_count(),
            collapsed_at,
            samples,
        })
    }

    fn sample(
        &mut self,
        system: &CoupledMapNetwork,
        simulation: usize,
        epsilon: f64,
        step: usize,
    ) -> CmlResult<()> {
        let network = system.network();
        let adjacency = network.adjacency();

        let metrics = self.analysis.clustering_and_path(adjacency);
        let communities = self.analysis.community_size_stats(adjacency);
        let row = MetricRow::new(epsilon, simulation, step, &metrics, &communities, network.len());

        info!(
            epsilon,
            step,
            clustering = row.clustering,
            path_length = row.path_length,
            omega = row.omega,
            s1 = row.s1,
            s2 = row.s2,
            mean_size = row.mean_size,
            std_size = row.std_size,
            num_communities = row.num_communities,
            simulation,
            n = row.n_nodes,
            "sample"
        );

        self.sink.record(&row)?;

        if self.config.options.save_matrix {
            if let Err(err) = self.sink.save_matrix(simulation, epsilon, step, adjacency) {
                warn!(%err, simulation, epsilon, step, "could not save adjacency matrix");
            }
        }
        if self.config.options.save_states {
            if let Err(err) = self.sink.save_states(simulation, epsilon, step, network.state()) {
                warn!(%err, simulation, epsilon, step, "could not save states");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{CommunityStats, NetworkAnalyzer, SmallWorldMetrics};
    use crate::error::CmlError;
    use crate::simulation::config::OutputOptions;
    use crate::simulation::sink::MemorySink;
    use ndarray::{Array1, Array2};

    fn config(n: usize, time_steps: usize, sample_every: usize) -> SimulationConfig {
        SimulationConfig {
            n_nodes: n,
            inner_steps: 3,
            a: 1.9,
            time_steps,
            epsilon: vec![0.1, 0.4],
            p: 0.2,
            num_simulations: 2,
            sample_every,
            seed: Some(11),
            options: OutputOptions::default(),
        }
    }

    /// Analysis stub returning sentinels
    struct NullAnalysis;

    impl GraphAnalysis for NullAnalysis {
        fn clustering_and_path(&mut self, _adjacency: &Array2<u8>) -> SmallWorldMetrics {
            SmallWorldMetrics::undefined()
        }

        fn community_size_stats(&mut self, _adjacency: &Array2<u8>) -> CommunityStats {
            CommunityStats::zero()
        }
    }

    /// Sink whose artifact writes always fail
    #[derive(Default)]
    struct FlakyArtifacts {
        rows: usize,
    }

    impl ResultSink for FlakyArtifacts {
        fn record(&mut self, _row: &MetricRow) -> CmlResult<()> {
            self.rows += 1;
            Ok(())
        }

        fn save_matrix(&mut self, _: usize, _: f64, _: usize, _: &Array2<u8>) -> CmlResult<()> {
            Err(CmlError::Io(std::io::Error::other("disk full")))
        }

        fn save_states(&mut self, _: usize, _: f64, _: usize, _: &Array1<f64>) -> CmlResult<()> {
            Err(CmlError::Io(std::io::Error::other("disk full")))
        }
    }

    /// Sink whose metric log always fails
    struct BrokenLog;

    impl ResultSink for BrokenLog {
        fn record(&mut self, _row: &MetricRow) -> CmlResult<()> {
            Err(CmlError::Io(std::io::Error::other("closed")))
        }

        fn save_matrix(&mut self, _: usize, _: f64, _: usize, _: &Array2<u8>) -> CmlResult<()> {
            Ok(())
        }

        fn save_states(&mut self, _: usize, _: f64, _: usize, _: &Array1<f64>) -> CmlResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sampling_schedule() {
        // Steps 0..=10 sampled at 0, 5, 10
        let mut runner = SimulationRunner::new(
            config(20, 10, 5),
            NullAnalysis,
            MemorySink::default(),
            SeededSource::from_seed(1),
        );

        let summaries = runner.run().unwrap();
        let sink = runner.into_sink();

        assert_eq!(summaries.len(), 4);
        assert_eq!(sink.rows.len(), 12);
        assert!(sink.matrices.is_empty());

        let steps: Vec<usize> = sink.rows[..3].iter().map(|r| r.time_step).collect();
        assert_eq!(steps, vec![0, 5, 10]);

        let order: Vec<(usize, f64)> = sink.rows.iter().step_by(3).map(|r| (r.simulation, r.epsilon)).collect();
        assert_eq!(order, vec![(1, 0.1), (1, 0.4), (2, 0.1), (2, 0.4)]);

        for summary in &summaries {
            assert_eq!(summary.samples, 3);
            assert!(summary.final_nodes <= 20);
        }
    }

    #[test]
    fn test_collapsed_run_keeps_sampling() {
        let mut runner = SimulationRunner::new(
            config(1, 4, 2),
            NetworkAnalyzer::new(SeededSource::from_seed(0)),
            MemorySink::default(),
            SeededSource::from_seed(3),
        );

        let summary = runner.run_single(1, 0.3).unwrap();

        assert_eq!(summary.steps_taken, 0);
        assert_eq!(summary.final_nodes, 1);
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.collapsed_at, None);
        assert!(!summary.collapsed());

        for row in &runner.sink().rows {
            assert!(row.clustering.is_nan());
            assert!(row.omega.is_nan());
            assert_eq!(row.num_communities, 0);
            assert_eq!(row.n_nodes, 1);
        }
    }

    #[test]
    fn test_mid_run_collapse_freezes_and_keeps_sampling() {
        // p = 0: the first rewire finds every node isolated and prunes all of them
        let mut cfg = config(10, 10, 2);
        cfg.p = 0.0;
        let mut runner = SimulationRunner::new(
            cfg,
            NetworkAnalyzer::new(SeededSource::from_seed(0)),
            MemorySink::default(),
            SeededSource::from_seed(21),
        );

        let summary = runner.run_single(1, 0.3).unwrap();

        assert_eq!(summary.steps_taken, 1);
        assert_eq!(summary.collapsed_at, Some(0));
        assert!(summary.collapsed());
        assert_eq!(summary.final_nodes, 0);
        assert_eq!(summary.final_edges, 0);
        assert_eq!(summary.samples, 6);

        let rows = &runner.sink().rows;
        assert_eq!(rows.len(), 6);
        for (k, row) in rows.iter().enumerate() {
            assert_eq!(row.to_csv(), format!("0.3,1,{},NaN,NaN,NaN,0,0,0,0,0,0", 2 * k));
        }
    }

    #[test]
    fn test_same_seed_same_rows() {
        let run = || {
            let mut rng = SeededSource::from_seed(99);
            let analyzer = NetworkAnalyzer::new(rng.fork());
            let mut runner = SimulationRunner::new(config(25, 20, 10), analyzer, MemorySink::default(), rng);
            runner.run().unwrap();
            runner
                .into_sink()
                .rows
                .iter()
                .map(MetricRow::to_csv)
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_artifacts_are_best_effort() {
        let mut cfg = config(15, 4, 2);
        cfg.options.save_matrix = true;
        cfg.options.save_states = true;
        let mut runner = SimulationRunner::new(
            cfg,
            NullAnalysis,
            FlakyArtifacts::default(),
            SeededSource::from_seed(5),
        );

        assert!(runner.run().is_ok());
        assert_eq!(runner.sink().rows, 12);
    }

    #[test]
    fn test_metric_log_failure_aborts() {
        let mut runner = SimulationRunner::new(
            config(15, 4, 2),
            NullAnalysis,
            BrokenLog,
            SeededSource::from_seed(5),
        );

        assert!(matches!(runner.run(), Err(CmlError::Io(_))));
    }

    #[test]
    fn test_artifacts_follow_options() {
        let mut cfg = config(12, 2, 1);
        cfg.num_simulations = 1;
        cfg.epsilon = vec![0.2];
        cfg.options.save_states = true;
        let mut runner = SimulationRunner::new(
            cfg,
            NullAnalysis,
            MemorySink::default(),
            SeededSource::from_seed(8),
        );

        runner.run().unwrap();
        let sink = runner.into_sink();

        assert!(sink.matrices.is_empty());
        assert_eq!(sink.states.len(), 3);
        for ((_, _, step, states), row) in sink.states.iter().zip(&sink.rows) {
            assert_eq!(*step, row.time_step);
            assert_eq!(states.len(), row.n_nodes);
        }
    }
}
