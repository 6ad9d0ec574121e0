//! Experiment Driver Tests
//!
//! Critical invariants tested:
//! - Sweeps are reproducible from the configuration alone
//! - A failing method is reported and does not stop the others
//! - Per-threshold summaries are computed from the matching repetitions

use apportionment_core_rs::experiment::{
    run_single, Experiment, ExperimentConfig, ExperimentError, MethodOutcome, ThresholdSummary,
};
use apportionment_core_rs::sampling::SamplerConfig;
use apportionment_core_rs::{EntityTable, Method};

// ============================================================================
// Test Helpers
// ============================================================================

fn five() -> EntityTable {
    vec![
        ("A".to_string(), 1_200),
        ("B".to_string(), 3_400),
        ("C".to_string(), 560),
        ("D".to_string(), 7_800),
        ("E".to_string(), 910),
    ]
    .into_iter()
    .collect()
}

fn small_config() -> ExperimentConfig {
    ExperimentConfig {
        total_seats: 11,
        thresholds: vec![0.3, 0.6],
        repetitions: 2,
        methods: Method::ALL.to_vec(),
        sampler: SamplerConfig {
            num_samples: 2_000,
            chunk_size: 500,
            seed: 11,
            ..SamplerConfig::default()
        },
    }
}

fn completed(outcome: &MethodOutcome) -> (&[f64], &[ThresholdSummary]) {
    match outcome {
        MethodOutcome::Completed { alphas, groups } => (alphas, groups),
        MethodOutcome::Failed { error } => panic!("method failed: {}", error),
    }
}

// ============================================================================
// Sweeps
// ============================================================================

#[test]
fn test_sweep_shape() {
    let experiment = Experiment::new(small_config()).unwrap();
    let results = experiment.run(&mut five()).unwrap();

    assert_eq!(results.total_seats, 11);
    assert_eq!(results.repetitions, 2);
    assert_eq!(results.thresholds, vec![0.3, 0.6]);
    assert_eq!(results.series.len(), 5);
    assert_eq!(results.config_hash, experiment.config_hash());

    for (series, method) in results.series.iter().zip(Method::ALL) {
        assert_eq!(series.method, method);
        let (alphas, groups) = completed(&series.outcome);
        assert_eq!(alphas.len(), 4);
        assert_eq!(groups.len(), 2);
        assert!(alphas.iter().all(|a| (0.0..=1.0).contains(a)));
    }
}

#[test]
fn test_groups_summarize_their_repetitions() {
    let results = Experiment::new(small_config())
        .unwrap()
        .run(&mut five())
        .unwrap();

    for series in &results.series {
        let (alphas, groups) = completed(&series.outcome);
        for (group, chunk) in groups.iter().zip(alphas.chunks(2)) {
            let mean = (chunk[0] + chunk[1]) / 2.0;
            let std_dev = (chunk[0] - chunk[1]).abs() / 2.0;
            assert!((group.mean - mean).abs() < 1e-12);
            assert!((group.std_dev - std_dev).abs() < 1e-12);
            assert_eq!(group.min, chunk[0].min(chunk[1]));
        }
        assert_eq!(groups[0].threshold, 0.3);
        assert_eq!(groups[1].threshold, 0.6);
    }
}

#[test]
fn test_sweep_is_reproducible() {
    let experiment = Experiment::new(small_config()).unwrap();
    let first = experiment.run(&mut five()).unwrap();
    let second = experiment.run(&mut five()).unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.config_hash, second.config_hash);
    assert_eq!(first.series, second.series);
}

#[test]
fn test_seed_changes_hash() {
    let a = Experiment::new(small_config()).unwrap();
    let mut config = small_config();
    config.sampler.seed = 12;
    let b = Experiment::new(config).unwrap();

    assert_ne!(a.config_hash(), b.config_hash());
}

#[test]
fn test_failed_method_does_not_stop_others() {
    // Adams jumps from 8 seats to 5 between divisors 99 and 100
    let mut table: EntityTable = vec![
        ("A".to_string(), 100),
        ("B".to_string(), 100),
        ("C".to_string(), 300),
    ]
    .into_iter()
    .collect();
    let config = ExperimentConfig {
        total_seats: 6,
        ..small_config()
    };

    let results = Experiment::new(config).unwrap().run(&mut table).unwrap();

    let adams = results.series_for(Method::Adams).unwrap();
    match &adams.outcome {
        MethodOutcome::Failed { error } => assert!(error.contains("Adams")),
        other => panic!("expected Adams to fail, got {:?}", other),
    }
    assert!(adams.alphas().is_none());

    for method in [Method::Hamilton, Method::Jefferson, Method::Webster, Method::HuntingtonHill] {
        let series = results.series_for(method).unwrap();
        assert_eq!(series.alphas().unwrap().len(), 4, "{}", method);
    }
}

#[test]
fn test_results_serialize_with_status_tags() {
    let config = ExperimentConfig {
        methods: vec![Method::Webster],
        ..small_config()
    };
    let results = Experiment::new(config).unwrap().run(&mut five()).unwrap();
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(json["series"][0]["method"], "webster");
    assert_eq!(json["series"][0]["outcome"]["status"], "completed");
    assert_eq!(json["config_hash"].as_str().unwrap().len(), 64);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_json() {
    let config: ExperimentConfig = serde_json::from_str(
        r#"{
            "total_seats": 11,
            "thresholds": [0.5],
            "repetitions": 1,
            "methods": ["hamilton", "huntington_hill"],
            "sampler": { "num_samples": 500, "seed": 3 }
        }"#,
    )
    .unwrap();

    let results = Experiment::new(config).unwrap().run(&mut five()).unwrap();
    assert_eq!(results.series.len(), 2);
    assert_eq!(results.series[1].method, Method::HuntingtonHill);
}

#[test]
fn test_invalid_config_rejected() {
    let config = ExperimentConfig {
        thresholds: vec![-0.5],
        ..small_config()
    };
    assert!(matches!(
        Experiment::new(config),
        Err(ExperimentError::InvalidConfig(_))
    ));

    let config = ExperimentConfig {
        total_seats: 0,
        ..small_config()
    };
    assert!(Experiment::new(config).is_err());
}

// ============================================================================
// Single Runs
// ============================================================================

#[test]
fn test_run_single_snapshot() {
    let mut table = five();
    let sampler = SamplerConfig {
        num_samples: 5_000,
        seed: 8,
        ..SamplerConfig::default()
    };
    let run = run_single(&mut table, Method::Jefferson, 11, &sampler).unwrap();

    assert_eq!(run.method, Method::Jefferson);
    let seats: Vec<u64> = run.allocation.iter().map(|(_, _, s)| *s).collect();
    assert_eq!(seats, vec![1, 3, 0, 7, 0]);
    assert_eq!(seats, table.seats());

    // C and E hold no seats, so some subset has alpha 0
    assert_eq!(run.estimate.alpha, 0.0);
}

#[test]
fn test_run_single_propagates_engine_error() {
    let mut table = five();
    let sampler = SamplerConfig {
        num_samples: 10,
        ..SamplerConfig::default()
    };
    let err = run_single(&mut table, Method::HuntingtonHill, 4, &sampler).unwrap_err();
    assert!(matches!(err, ExperimentError::Apportion(_)));
}
