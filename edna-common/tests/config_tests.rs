//! Unit tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Missing TOML file falls back to compiled defaults
//! - Priority order CLI > ENV > TOML > default
//! - Range validation of the novelty threshold and neighbour count
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Tests that manipulate EDNA_* variables are marked with #[serial].

use edna_common::config::{
    load_or_default, ConfigOverrides, ConfigResolver, TomlConfig, COMPILED_DEFAULTS,
    ENV_NEIGHBOUR_COUNT, ENV_NOVELTY_THRESHOLD, ENV_STATE_DIR,
};
use edna_common::{Error, NoveltyThreshold};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_NOVELTY_THRESHOLD);
    env::remove_var(ENV_NEIGHBOUR_COUNT);
    env::remove_var(ENV_STATE_DIR);
}

#[test]
fn test_missing_toml_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let config = load_or_default(Some(&missing)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("edna-id.toml");
    std::fs::write(&path, "novelty_threshold = [not valid").unwrap();

    let result = load_or_default(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_defaults() {
    clear_env();

    let resolved = ConfigResolver::new(TomlConfig::default()).resolve().unwrap();

    assert_eq!(resolved.novelty_threshold, NoveltyThreshold::DEFAULT);
    assert_eq!(resolved.neighbour_count, 3);
    assert_eq!(resolved.state_dir, COMPILED_DEFAULTS.state_dir);
    assert_eq!(resolved.log_level, "info");
}

#[test]
#[serial]
fn test_toml_values_apply_when_env_unset() {
    clear_env();

    let toml = TomlConfig {
        novelty_threshold: Some(0.55),
        neighbour_count: Some(5),
        state_dir: Some(PathBuf::from("/tmp/edna-toml-state")),
        ..Default::default()
    };
    let resolved = ConfigResolver::new(toml).resolve().unwrap();

    assert_eq!(resolved.novelty_threshold.value(), 0.55);
    assert_eq!(resolved.neighbour_count, 5);
    assert_eq!(resolved.state_dir, PathBuf::from("/tmp/edna-toml-state"));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    env::set_var(ENV_NOVELTY_THRESHOLD, "0.25");
    env::set_var(ENV_STATE_DIR, "/tmp/edna-env-state");

    let toml = TomlConfig {
        novelty_threshold: Some(0.55),
        state_dir: Some(PathBuf::from("/tmp/edna-toml-state")),
        ..Default::default()
    };
    let resolved = ConfigResolver::new(toml).resolve().unwrap();

    assert_eq!(resolved.novelty_threshold.value(), 0.25);
    assert_eq!(resolved.state_dir, PathBuf::from("/tmp/edna-env-state"));

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_NOVELTY_THRESHOLD, "0.25");
    env::set_var(ENV_NEIGHBOUR_COUNT, "7");

    let resolved = ConfigResolver::new(TomlConfig::default())
        .with_overrides(ConfigOverrides {
            novelty_threshold: Some(0.9),
            neighbour_count: Some(2),
            state_dir: None,
        })
        .resolve()
        .unwrap();

    assert_eq!(resolved.novelty_threshold.value(), 0.9);
    assert_eq!(resolved.neighbour_count, 2);

    clear_env();
}

#[test]
#[serial]
fn test_unparsable_env_value_is_config_error() {
    clear_env();
    env::set_var(ENV_NOVELTY_THRESHOLD, "forty percent");

    let result = ConfigResolver::new(TomlConfig::default()).resolve();
    assert!(matches!(result, Err(Error::Config(_))));

    clear_env();
}

#[test]
#[serial]
fn test_out_of_range_threshold_is_rejected_not_clamped() {
    clear_env();

    let toml = TomlConfig {
        novelty_threshold: Some(40.0),
        ..Default::default()
    };
    let result = ConfigResolver::new(toml).resolve();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_zero_neighbour_count_is_rejected() {
    clear_env();

    let result = ConfigResolver::new(TomlConfig::default())
        .with_overrides(ConfigOverrides {
            neighbour_count: Some(0),
            ..Default::default()
        })
        .resolve();
    assert!(matches!(result, Err(Error::Config(_))));
}
