use std::fs;

use adaptive_cml::simulation::{read_matrix, read_states, CSV_HEADER};
use adaptive_cml::{
    CsvResultSink,
    NetworkAnalyzer,
    SeededSource,
    SimulationConfig,
    SimulationRunner,
};
use tempfile::tempdir;

const CONFIG: &str = r#"{
    "N": 30, "T": 5, "a": 1.9, "time_steps": 40,
    "epsilon": [0.1, 0.35], "p": 0.15, "num_simulations": 2,
    "sample_every": 20, "seed": 7,
    "options": { "save_matrix": true, "save_states": true }
}"#;

#[test]
fn test_sweep_writes_metric_log_and_artifacts() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, CONFIG).unwrap();
    let config = SimulationConfig::from_file(&config_path).unwrap();
    let results = dir.path().join(config.default_results_dir());

    let sink = CsvResultSink::create(&results, &config).unwrap();
    let mut master = SeededSource::from_optional_seed(config.seed);
    let analyzer = NetworkAnalyzer::new(master.fork());
    let mut runner = SimulationRunner::new(config, analyzer, sink, master);

    let summaries = runner.run().unwrap();
    assert_eq!(summaries.len(), 4);

    // Steps 0, 20, 40 for 2 simulations x 2 couplings
    let log = fs::read_to_string(results.join("network_metrics.txt")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 1 + 12);

    for line in &lines[1..] {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 12);
        let eps: f64 = fields[0].parse().unwrap();
        let sim: usize = fields[1].parse().unwrap();
        let step: usize = fields[2].parse().unwrap();
        let n: usize = fields[11].parse().unwrap();
        assert!(eps == 0.1 || eps == 0.35);
        assert!(sim == 1 || sim == 2);
        assert!(step % 20 == 0 && step <= 40);
        assert!(n <= 30);

        let eps_dir = format!("eps_{:.3}", eps);
        let matrix_path = results
            .join(format!("simulation_{}", sim))
            .join("networks")
            .join(&eps_dir)
            .join(format!("matrix_{}_step_{}.txt", eps_dir, step));
        let matrix = read_matrix(&matrix_path).unwrap();
        assert_eq!(matrix.dim(), (n, n));

        let states_path = results
            .join(format!("simulation_{}", sim))
            .join("states")
            .join(&eps_dir)
            .join(format!("states_{}_step_{}.txt", eps_dir, step));
        assert_eq!(read_states(&states_path).unwrap().len(), n);
    }
}

#[test]
fn test_seeded_sweeps_are_reproducible() {
    let run = || {
        let dir = tempdir().unwrap();
        let mut config = SimulationConfig::from_json(CONFIG).unwrap();
        config.options.save_matrix = false;
        config.options.save_states = false;

        let sink = CsvResultSink::create(dir.path(), &config).unwrap();
        let mut master = SeededSource::from_optional_seed(config.seed);
        let analyzer = NetworkAnalyzer::new(master.fork());
        let mut runner = SimulationRunner::new(config, analyzer, sink, master);
        runner.run().unwrap();

        fs::read_to_string(dir.path().join("network_metrics.txt")).unwrap()
    };

    assert_eq!(run(), run());
}
