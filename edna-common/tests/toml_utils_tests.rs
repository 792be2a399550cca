//! Unit tests for TOML atomic write utilities
//!
//! - Atomic write (temp + rename), no temp file left behind
//! - Round trip through load_toml_config
//! - Owner-only permissions on Unix

use edna_common::config::{load_toml_config, write_toml_config, LoggingConfig, TomlConfig};
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_config() -> TomlConfig {
    TomlConfig {
        novelty_threshold: Some(0.35),
        neighbour_count: Some(4),
        state_dir: Some(PathBuf::from("/var/lib/edna")),
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

#[test]
fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("edna-id.toml");

    write_toml_config(&sample_config(), &target).unwrap();

    assert!(target.exists());
    assert!(!temp_dir.path().join("edna-id.toml.tmp").exists());
}

#[test]
fn test_written_config_reads_back() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("edna-id.toml");

    write_toml_config(&sample_config(), &target).unwrap();
    let loaded = load_toml_config(&target).unwrap();

    assert_eq!(loaded, sample_config());
}

#[test]
fn test_write_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("edna").join("edna-id.toml");

    write_toml_config(&TomlConfig::default(), &target).unwrap();

    assert!(target.exists());
    let content = std::fs::read_to_string(&target).unwrap();
    assert!(content.contains("[logging]"));
    assert!(!content.contains("novelty_threshold"));
}

#[test]
fn test_overwrite_replaces_previous_values() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("edna-id.toml");

    write_toml_config(&sample_config(), &target).unwrap();

    let updated = TomlConfig {
        novelty_threshold: Some(0.5),
        ..sample_config()
    };
    write_toml_config(&updated, &target).unwrap();

    let loaded = load_toml_config(&target).unwrap();
    assert_eq!(loaded.novelty_threshold, Some(0.5));
    assert_eq!(loaded.neighbour_count, Some(4));
}

#[cfg(unix)]
#[test]
fn test_written_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("edna-id.toml");

    write_toml_config(&sample_config(), &target).unwrap();

    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn test_stale_temp_file_permissions_are_tightened() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("edna-id.toml");
    let stale = target.with_extension("toml.tmp");
    std::fs::write(&stale, "leftover").unwrap();
    std::fs::set_permissions(&stale, std::fs::Permissions::from_mode(0o644)).unwrap();

    write_toml_config(&sample_config(), &target).unwrap();

    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert!(!stale.exists());
    assert_eq!(load_toml_config(&target).unwrap(), sample_config());
}
