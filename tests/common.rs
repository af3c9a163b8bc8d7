//! Shared test helpers.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hostpilot::config::HostPilotPaths;
use hostpilot::platform::{ElevatedCopy, ElevationError};
use hostpilot::CommitManager;
use tempfile::TempDir;

/// Create a temp directory for use as HOSTPILOT_HOME.
pub fn temp_home() -> TempDir {
    tempfile::Builder::new()
        .prefix("hostpilot_test_")
        .tempdir()
        .expect("temp dir")
}

/// Test paths under `dir` with the hosts file seeded with `content`.
pub fn seeded_paths(dir: &Path, content: &str) -> HostPilotPaths {
    let paths = HostPilotPaths::for_test(dir);
    std::fs::write(&paths.hosts_file, content).unwrap();
    paths
}

/// Shared view into a MockCopy after it has been boxed into a manager.
#[derive(Clone, Default)]
pub struct CopyLog {
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl CopyLog {
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Records copy calls; performs a plain copy unless told to fail.
pub struct MockCopy {
    log: CopyLog,
    cancel: bool,
    delay: Duration,
}

impl MockCopy {
    pub fn ok() -> (Self, CopyLog) {
        Self::build(false, Duration::ZERO)
    }

    pub fn cancelled() -> (Self, CopyLog) {
        Self::build(true, Duration::ZERO)
    }

    pub fn slow(delay: Duration) -> (Self, CopyLog) {
        Self::build(false, delay)
    }

    fn build(cancel: bool, delay: Duration) -> (Self, CopyLog) {
        let log = CopyLog::default();
        (
            Self {
                log: log.clone(),
                cancel,
                delay,
            },
            log,
        )
    }
}

#[async_trait]
impl ElevatedCopy for MockCopy {
    async fn copy(&self, src: &Path, dst: &Path) -> Result<(), ElevationError> {
        let now = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.log.calls.lock().unwrap().push((
            src.to_string_lossy().to_string(),
            dst.to_string_lossy().to_string(),
        ));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = if self.cancel {
            Err(ElevationError::Cancelled)
        } else {
            std::fs::copy(src, dst).map(|_| ()).map_err(ElevationError::from)
        };
        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Manager over test paths with a recording copy.
pub fn manager(paths: &HostPilotPaths, copy: MockCopy) -> CommitManager {
    CommitManager::new(paths, Box::new(copy))
}
