//! File loading tests.

use std::fs;

use fincalc_config::{ConfigError, EngineConfig, Validate};
use proptest::prelude::*;
use tempfile::tempdir;

#[test]
fn test_load_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    fs::write(
        &path,
        r#"
[solver]
irr_guess = 0.15
max_iterations = 250

[sensitivity]
variations = [-20.0, -10.0, 10.0, 20.0]

[monte_carlo]
seed = 1234
parallel = false
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.solver.irr_guess, 0.15);
    assert_eq!(config.solver.max_iterations, 250);
    assert_eq!(config.solver.tolerance, 1e-10);
    assert_eq!(
        config.sensitivity.variations,
        Some(vec![-20.0, -10.0, 10.0, 20.0])
    );
    assert_eq!(config.monte_carlo.seed, Some(1234));
    assert!(!config.monte_carlo.parallel);
    assert_eq!(config.monte_carlo.iterations, 1000);
}

#[test]
fn test_load_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.JSON");
    fs::write(&path, r#"{"scenario": {"base_probability": 0.2}}"#).unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.scenario.base_probability, 0.2);
}

#[test]
fn test_load_empty_toml_gives_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    fs::write(&path, "").unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[monte_carlo]\niterations = 0\nchunk_size = 0\n").unwrap();

    match EngineConfig::load(&path) {
        Err(ConfigError::MultipleValidationErrors(errors)) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, ["monte_carlo.iterations", "monte_carlo.chunk_size"]);
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(matches!(
        EngineConfig::load(&path),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_load_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.yaml");
    fs::write(&path, "solver: {}").unwrap();
    assert!(matches!(
        EngineConfig::load(&path),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_load_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ solver: ").unwrap();
    assert!(matches!(
        EngineConfig::load(&path),
        Err(ConfigError::Parse { format: "json", .. })
    ));
}

proptest! {
    #[test]
    fn prop_tolerance_bounds(tolerance in -1.0e-3f64..1.0e-3) {
        let config = EngineConfig::standard().with_tolerance(tolerance);
        let expected = tolerance > 0.0 && tolerance <= 1e-4;
        prop_assert_eq!(config.is_valid(), expected);
    }
}
