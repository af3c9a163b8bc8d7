//! Commit pipeline: backup, stage, privileged copy. Also load, list and restore.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::backup::{self, BackupInfo};
use crate::config::HostPilotPaths;
use crate::entry::HostEntry;
use crate::error::CommitError;
use crate::hosts;
use crate::platform::ElevatedCopy;
use crate::store::EntryStore;

/// Stages of one commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    Idle,
    BackingUp,
    Staging,
    Elevating,
    Done,
    Failed,
}

impl fmt::Display for CommitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommitStage::Idle => "idle",
            CommitStage::BackingUp => "backing-up",
            CommitStage::Staging => "staging",
            CommitStage::Elevating => "elevating",
            CommitStage::Done => "done",
            CommitStage::Failed => "failed",
        })
    }
}

/// Owns the target file path, the backup directory and the staging file.
///
/// `save` and `restore` hold an async lock for their whole duration, so at most one
/// privileged copy is outstanding per manager. Reads do not take the lock.
pub struct CommitManager {
    hosts_file: PathBuf,
    backup_dir: PathBuf,
    staging_file: PathBuf,
    elevator: Box<dyn ElevatedCopy>,
    commit_lock: Mutex<()>,
}

impl CommitManager {
    pub fn new(paths: &HostPilotPaths, elevator: Box<dyn ElevatedCopy>) -> Self {
        Self {
            hosts_file: paths.hosts_file.clone(),
            backup_dir: paths.backup_dir.clone(),
            staging_file: paths.staging_file.clone(),
            elevator,
            commit_lock: Mutex::new(()),
        }
    }

    pub fn hosts_file(&self) -> &Path {
        &self.hosts_file
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn elevator(&self) -> &dyn ElevatedCopy {
        self.elevator.as_ref()
    }

    /// Read and parse the target file. Missing or unreadable files are an error.
    pub fn load(&self) -> Result<Vec<HostEntry>, CommitError> {
        let text = std::fs::read_to_string(&self.hosts_file).map_err(|source| CommitError::Read {
            path: self.hosts_file.clone(),
            source,
        })?;
        let entries = hosts::parse(&text);
        tracing::debug!(
            path = %self.hosts_file.display(),
            count = entries.len(),
            "hosts file loaded"
        );
        Ok(entries)
    }

    /// Load into a fresh, clean store.
    pub fn load_store(&self) -> Result<EntryStore, CommitError> {
        self.load().map(EntryStore::from_entries)
    }

    /// Snapshot the current target file into the backup directory.
    pub fn create_backup(&self) -> Result<PathBuf, CommitError> {
        snapshot(&self.hosts_file, &self.backup_dir)
    }

    /// Backups, newest first. An unreadable directory is logged and reported as empty.
    pub fn list_backups(&self) -> Vec<BackupInfo> {
        match backup::list_backups(&self.backup_dir) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(dir = %self.backup_dir.display(), "cannot list backups: {e}");
                Vec::new()
            }
        }
    }

    /// Back up the target, then write `entries` to it. Returns the backup path.
    pub async fn save(&self, entries: &[HostEntry]) -> Result<PathBuf, CommitError> {
        let _guard = self.commit_lock.lock().await;

        tracing::debug!(stage = %CommitStage::BackingUp, "commit");
        let (hosts_file, backup_dir) = (self.hosts_file.clone(), self.backup_dir.clone());
        let backup_path = tokio::task::spawn_blocking(move || snapshot(&hosts_file, &backup_dir))
            .await
            .map_err(|e| CommitError::Backup {
                path: self.backup_dir.clone(),
                source: std::io::Error::other(e),
            })
            .and_then(|r| r)
            .inspect_err(log_failure)?;

        let content = hosts::serialize(entries);
        self.stage_and_elevate(content.as_bytes()).await?;
        tracing::info!(
            stage = %CommitStage::Done,
            count = entries.len(),
            backup = %backup_path.display(),
            "hosts file saved"
        );
        Ok(backup_path)
    }

    /// `save` the store's entries and clear its dirty flag on success.
    pub async fn save_store(&self, store: &mut EntryStore) -> Result<PathBuf, CommitError> {
        let backup_path = self.save(store.entries()).await?;
        store.mark_saved();
        Ok(backup_path)
    }

    /// Write a backup's content back onto the target. No snapshot of the current state is taken.
    pub async fn restore(&self, backup_path: &Path) -> Result<(), CommitError> {
        let _guard = self.commit_lock.lock().await;

        let content = tokio::fs::read(backup_path)
            .await
            .map_err(|source| CommitError::Staging {
                path: backup_path.to_path_buf(),
                source,
            })
            .inspect_err(log_failure)?;
        self.stage_and_elevate(&content).await?;
        tracing::info!(
            stage = %CommitStage::Done,
            backup = %backup_path.display(),
            "backup restored"
        );
        Ok(())
    }

    /// Staging and elevation. Caller holds the commit lock. The staging file is removed on every path.
    async fn stage_and_elevate(&self, content: &[u8]) -> Result<(), CommitError> {
        tracing::debug!(stage = %CommitStage::Staging, path = %self.staging_file.display(), "commit");
        let result = self.stage_and_elevate_inner(content).await;
        if let Err(e) = tokio::fs::remove_file(&self.staging_file).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.staging_file.display(), "staging cleanup failed: {e}");
            }
        }
        result.inspect_err(log_failure)
    }

    async fn stage_and_elevate_inner(&self, content: &[u8]) -> Result<(), CommitError> {
        write_staging(&self.staging_file, content)
            .await
            .map_err(|source| CommitError::Staging {
                path: self.staging_file.clone(),
                source,
            })?;

        tracing::debug!(
            stage = %CommitStage::Elevating,
            helper = self.elevator.name(),
            "commit"
        );
        self.elevator
            .copy(&self.staging_file, &self.hosts_file)
            .await?;
        Ok(())
    }
}

fn snapshot(hosts_file: &Path, backup_dir: &Path) -> Result<PathBuf, CommitError> {
    let content = std::fs::read(hosts_file).map_err(|source| CommitError::Backup {
        path: hosts_file.to_path_buf(),
        source,
    })?;
    let path = backup::write_backup(backup_dir, &content).map_err(|source| CommitError::Backup {
        path: backup_dir.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "backup created");
    Ok(path)
}

/// Write the staging file fresh. Whatever sits at the path, including a symlink, is unlinked
/// first and the file is created exclusively, so the write never lands elsewhere.
async fn write_staging(path: &Path, content: &[u8]) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "removed stale staging file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(content).await?;
    file.sync_all().await
}

fn log_failure(e: &CommitError) {
    tracing::error!(stage = %CommitStage::Failed, failed_at = %e.stage(), "commit aborted: {e}");
}
