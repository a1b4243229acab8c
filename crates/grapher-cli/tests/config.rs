//! Integration tests for the configuration file.

use std::path::Path;

use grapher_cli::config::{ConfigError, GrapherConfig};
use grapher_model::{ResolverOptions, TableOptions, ToleranceStrategy};

#[test]
fn missing_path_uses_defaults() {
    let config = GrapherConfig::load(None).expect("defaults");
    assert_eq!(config, GrapherConfig::default());
    assert_eq!(config.table.sample_size, 20);
    assert!(config.resolver.preserve_tab);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let text = "[table]\ntolerance = 2\ntoleranceStrategy = \"backwards\"\n";
    let config = GrapherConfig::from_toml(text, Path::new("grapher.toml")).expect("valid toml");
    assert_eq!(config.table.tolerance, 2);
    assert_eq!(config.table.tolerance_strategy, ToleranceStrategy::Backwards);
    assert_eq!(config.table.sample_size, TableOptions::default().sample_size);
    assert_eq!(config.resolver, ResolverOptions::default());
}

#[test]
fn resolver_section_is_read() {
    let config = GrapherConfig::from_toml("[resolver]\npreserveTab = false", Path::new("g.toml"))
        .expect("valid toml");
    assert!(!config.resolver.preserve_tab);
}

#[test]
fn invalid_file_reports_its_path() {
    let error = GrapherConfig::from_toml("[table]\nsampleSize = \"many\"", Path::new("bad.toml"))
        .expect_err("type mismatch");
    assert!(matches!(error, ConfigError::Parse { .. }));
    assert!(error.to_string().contains("bad.toml"));
}

#[test]
fn unreadable_file_is_a_read_error() {
    let path = std::env::temp_dir().join("grapher-cli-missing-config.toml");
    let error = GrapherConfig::load(Some(&path)).expect_err("missing file");
    assert!(matches!(error, ConfigError::Read { .. }));
}
