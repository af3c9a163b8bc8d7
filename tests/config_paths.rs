//! Paths resolve under the base dir; config overrides and save/load.

mod common;

use hostpilot::config::{Config, HostPilotPaths, STAGING_FILE_NAME};
use std::path::PathBuf;

#[test]
fn paths_resolve_under_base() {
    let dir = common::temp_home();
    let base = dir.path();
    let paths = HostPilotPaths::for_test(base);

    assert_eq!(paths.config_dir, base);
    assert!(paths.config_file.ends_with("config.toml"));
    assert!(paths.backup_dir.ends_with("backups"));
    assert!(paths.staging_file.ends_with(STAGING_FILE_NAME));

    assert!(paths.config_file.starts_with(base));
    assert!(paths.backup_dir.starts_with(base));
    assert!(paths.hosts_file.starts_with(base));
}

#[test]
fn production_staging_file_is_in_temp_dir() {
    let paths = HostPilotPaths::from_base(PathBuf::from("/nonexistent"));
    assert_eq!(paths.staging_file, std::env::temp_dir().join(STAGING_FILE_NAME));
    assert_eq!(paths.hosts_file, hostpilot::platform::default_hosts_path());
}

#[test]
fn config_roundtrip_and_overrides() {
    let dir = common::temp_home();
    let paths = HostPilotPaths::for_test(dir.path());

    assert_eq!(Config::load(&paths).unwrap(), Config::default());
    assert!(Config::default().elevate);

    let config = Config {
        hosts_file: Some(dir.path().join("custom-hosts")),
        backup_dir: Some(dir.path().join("snapshots")),
        elevate: false,
    };
    config.save(&paths).unwrap();
    assert!(paths.config_file.is_file());

    let loaded = Config::load(&paths).unwrap();
    assert_eq!(loaded, config);

    let applied = paths.clone().with_config(&loaded);
    assert_eq!(applied.hosts_file, dir.path().join("custom-hosts"));
    assert_eq!(applied.backup_dir, dir.path().join("snapshots"));
    assert_eq!(applied.config_file, paths.config_file);
}

#[test]
fn partial_config_uses_defaults() {
    let dir = common::temp_home();
    let paths = HostPilotPaths::for_test(dir.path());
    std::fs::write(&paths.config_file, "backup_dir = \"/tmp/hp-backups\"\n").unwrap();

    let loaded = Config::load(&paths).unwrap();
    assert!(loaded.elevate);
    assert_eq!(loaded.hosts_file, None);
    assert_eq!(loaded.backup_dir, Some(PathBuf::from("/tmp/hp-backups")));
}
