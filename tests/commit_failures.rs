//! Failed commits leave the target file untouched.

mod common;

use hostpilot::{CommitError, CommitStage, NewEntry};

const ORIGINAL: &str = "127.0.0.1\tlocalhost\n10.0.0.5\tdb.internal\n";

#[tokio::test]
async fn backup_failure_aborts_before_staging() {
    let dir = common::temp_home();
    let mut paths = common::seeded_paths(dir.path(), ORIGINAL);
    // A regular file where the backup directory should be
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    paths.backup_dir = blocker.join("backups");

    let (copy, log) = common::MockCopy::ok();
    let manager = common::manager(&paths, copy);

    let before = manager.load().unwrap();
    let mut store = manager.load_store().unwrap();
    store.add(NewEntry::new("127.0.0.1", "new.test")).unwrap();

    let err = manager.save_store(&mut store).await.unwrap_err();
    assert!(matches!(err, CommitError::Backup { .. }), "got {err:?}");
    assert_eq!(err.stage(), CommitStage::BackingUp);
    assert!(store.has_changes(), "dirty flag kept on failure");
    assert!(log.calls().is_empty(), "elevation never attempted");
    assert!(!paths.staging_file.exists());

    let after = manager.load().unwrap();
    let key = |v: &Vec<hostpilot::HostEntry>| {
        v.iter().map(|e| (e.ip.clone(), e.domain.clone(), e.enabled)).collect::<Vec<_>>()
    };
    assert_eq!(key(&before), key(&after));
    assert_eq!(std::fs::read_to_string(&paths.hosts_file).unwrap(), ORIGINAL);
}

#[tokio::test]
async fn staging_failure_keeps_backup() {
    let dir = common::temp_home();
    let mut paths = common::seeded_paths(dir.path(), ORIGINAL);
    paths.staging_file = dir.path().join("missing-dir").join("staged");

    let (copy, log) = common::MockCopy::ok();
    let manager = common::manager(&paths, copy);

    let err = manager.save(&manager.load().unwrap()).await.unwrap_err();
    assert!(matches!(err, CommitError::Staging { .. }), "got {err:?}");
    assert!(log.calls().is_empty());
    assert_eq!(manager.list_backups().len(), 1, "backup taken before staging is kept");
    assert_eq!(std::fs::read_to_string(&paths.hosts_file).unwrap(), ORIGINAL);
}

#[tokio::test]
async fn cancelled_elevation_leaves_target_and_cleans_up() {
    let dir = common::temp_home();
    let paths = common::seeded_paths(dir.path(), ORIGINAL);
    let (copy, log) = common::MockCopy::cancelled();
    let manager = common::manager(&paths, copy);

    let mut store = manager.load_store().unwrap();
    store.add(NewEntry::new("127.0.0.1", "new.test")).unwrap();
    let err = manager.save_store(&mut store).await.unwrap_err();

    assert!(matches!(
        err,
        CommitError::Elevation(hostpilot::platform::ElevationError::Cancelled)
    ));
    assert_eq!(err.stage(), CommitStage::Elevating);
    assert_eq!(log.calls().len(), 1);
    assert!(store.has_changes());
    assert!(!paths.staging_file.exists(), "staging file removed on failure too");
    assert_eq!(std::fs::read_to_string(&paths.hosts_file).unwrap(), ORIGINAL);
}

#[tokio::test]
async fn missing_target_fails_backup() {
    let dir = common::temp_home();
    let paths = hostpilot::config::HostPilotPaths::for_test(dir.path());
    let (copy, log) = common::MockCopy::ok();
    let manager = common::manager(&paths, copy);

    let err = manager.save(&[]).await.unwrap_err();
    assert!(matches!(err, CommitError::Backup { .. }));
    assert!(log.calls().is_empty());
    assert!(!paths.hosts_file.exists());
}
