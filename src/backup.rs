//! Timestamped snapshots of the hosts file in a flat backup directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// File name prefix for every backup.
pub const BACKUP_PREFIX: &str = "hosts-backup-";

/// One file in the backup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub modified_at: DateTime<Utc>,
}

/// `hosts-backup-2026-10-15T09-30-00-123Z`: sorts lexicographically in time order.
pub fn backup_name(at: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}", at.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}

/// Write `content` verbatim to a new backup file. Creates the directory if needed.
///
/// A name collision within the same millisecond gets a `-N` suffix, which still sorts after the
/// unsuffixed name. A failed write removes the partial file so it is never listed as a backup.
pub fn write_backup(dir: &Path, content: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let base = backup_name(Utc::now());
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            base.clone()
        } else {
            format!("{base}-{attempt}")
        };
        let path = dir.join(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let written = file.write_all(content).and_then(|_| file.sync_all());
                return match written {
                    Ok(()) => Ok(path),
                    Err(e) => {
                        drop(file);
                        if let Err(rm) = fs::remove_file(&path) {
                            tracing::warn!(path = %path.display(), "cannot remove partial backup: {rm}");
                        }
                        Err(e)
                    }
                };
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Backups in `dir`, newest first. A missing directory yields an empty list.
pub fn list_backups(dir: &Path) -> io::Result<Vec<BackupInfo>> {
    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut out = Vec::new();
    for entry in read {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(BACKUP_PREFIX) {
            continue;
        }
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let modified: SystemTime = meta.modified()?;
        out.push(BackupInfo {
            name,
            path: entry.path(),
            modified_at: modified.into(),
        });
    }
    // mtime granularity can tie; the name breaks ties since it encodes creation time
    out.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| b.name.cmp(&a.name))
    });
    Ok(out)
}
