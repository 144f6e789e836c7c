//! Tests for configuration and graceful degradation
//!
//! Covers root folder priority order, directory creation and TOML loading.
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Tests that manipulate MEETRANK_ROOT_FOLDER or MEETRANK_ROOT are marked
//! with #[serial] so they never run in parallel.

use meetrank_common::config::{
    load_toml_config, write_toml_config, CompiledDefaults, LoggingConfig, RootFolderInitializer,
    RootFolderResolver, TomlConfig, DEFAULT_BIND_ADDRESS, DEFAULT_TOP_N,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_root_env() {
    env::remove_var("MEETRANK_ROOT_FOLDER");
    env::remove_var("MEETRANK_ROOT");
}

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.ends_with("meetrank") || defaults.root_folder.ends_with("meetrank_data"));
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.log_file.is_none());
    assert_eq!(defaults.bind_address, DEFAULT_BIND_ADDRESS);
    assert_eq!(defaults.top_n, DEFAULT_TOP_N);
}

#[test]
fn test_logging_defaults_follow_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();
    let logging = LoggingConfig::default();

    assert_eq!(logging.level, defaults.log_level);
    assert_eq!(logging.file, defaults.log_file);
    assert_eq!(TomlConfig::default().logging, logging);
}

#[test]
#[serial]
fn test_resolver_cli_arg_wins() {
    env::set_var("MEETRANK_ROOT_FOLDER", "/tmp/meetrank-env-folder");

    let resolver = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/meetrank-cli-folder")));

    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/meetrank-cli-folder"));

    clear_root_env();
}

#[test]
#[serial]
fn test_resolver_env_var_root_folder() {
    clear_root_env();
    env::set_var("MEETRANK_ROOT_FOLDER", "/tmp/meetrank-test-env-folder");

    let resolver = RootFolderResolver::new("test-module");
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/meetrank-test-env-folder"));

    clear_root_env();
}

#[test]
#[serial]
fn test_resolver_root_folder_takes_precedence_over_root() {
    clear_root_env();
    env::set_var("MEETRANK_ROOT_FOLDER", "/tmp/meetrank-priority-1");
    env::set_var("MEETRANK_ROOT", "/tmp/meetrank-priority-2");

    let resolver = RootFolderResolver::new("test-module");
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/meetrank-priority-1"));

    clear_root_env();
}

#[test]
#[serial]
fn test_resolver_missing_config_file_falls_back_to_default() {
    clear_root_env();

    // A module name that definitely won't have a config file
    let resolver = RootFolderResolver::new("nonexistent-test-module-12345");
    let root_folder = resolver.resolve();

    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);
    assert_eq!(resolver.load_config(), TomlConfig::default());
}

#[test]
fn test_initializer_paths() {
    let root = PathBuf::from("/tmp/meetrank-test-nonexistent");
    let initializer = RootFolderInitializer::new(root.clone());

    assert_eq!(initializer.root_folder(), root.as_path());
    assert_eq!(initializer.database_path(), root.join("meetrank.db"));
    assert!(!initializer.database_exists());
}

#[test]
fn test_initializer_creates_nested_directory_idempotently() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("level1").join("level2");

    let initializer = RootFolderInitializer::new(root.clone());
    assert!(initializer.ensure_directory_exists().is_ok());
    assert!(initializer.ensure_directory_exists().is_ok());

    assert!(root.is_dir());
}

#[test]
fn test_toml_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("conf").join("meetrank-rc.toml");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/meets")),
        bind_address: Some("0.0.0.0:9000".to_string()),
        top_n: Some(8),
        results_file: Some(PathBuf::from("/meets/Local_meet_results.csv")),
        records_file: None,
        logging: LoggingConfig {
            level: "debug".to_string(),
            file: None,
        },
    };

    write_toml_config(&config, &path).unwrap();
    let loaded = load_toml_config(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let toml_str = r#"
        root_folder = "/meets"
        [logging]
        level = "warn"
    "#;

    let config: TomlConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/meets")));
    assert_eq!(config.top_n, None);
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.file.is_none());
}

#[test]
fn test_zero_top_n_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "top_n = 0\n").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    assert!(err.to_string().contains("top_n"), "unexpected error: {}", err);
}

#[test]
fn test_malformed_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "top_n = [not toml").unwrap();

    assert!(matches!(
        load_toml_config(&path),
        Err(meetrank_common::Error::Config(_))
    ));
}
