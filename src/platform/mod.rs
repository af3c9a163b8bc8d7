//! Platform abstraction for the privileged copy onto the hosts file.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

/// Error type for privileged copy operations.
#[derive(Debug, thiserror::Error)]
pub enum ElevationError {
    /// Elevation helper binary not found in PATH
    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    /// User dismissed or failed the credential prompt
    #[error("authentication cancelled or denied")]
    Cancelled,

    /// Helper ran but the copy did not succeed
    #[error("{tool} exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Failed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Copy `src` onto `dst` with whatever privilege `dst` requires.
///
/// Implementations wait for the helper process (and any credential prompt) to finish.
#[async_trait]
pub trait ElevatedCopy: Send + Sync {
    async fn copy(&self, src: &Path, dst: &Path) -> Result<(), ElevationError>;

    /// Short name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Binary this implementation shells out to, if any.
    fn helper_binary(&self) -> Option<&'static str> {
        None
    }
}

/// Unprivileged copy. Used when the target is user-writable (tests, redirected hosts file).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCopy;

#[async_trait]
impl ElevatedCopy for DirectCopy {
    async fn copy(&self, src: &Path, dst: &Path) -> Result<(), ElevationError> {
        tokio::fs::copy(src, dst).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Get platform ElevatedCopy implementation.
/// If `elevate` is false, copies without privilege.
pub fn default_elevated_copy(elevate: bool) -> Box<dyn ElevatedCopy> {
    if !elevate {
        return Box::new(DirectCopy);
    }
    #[cfg(target_os = "macos")]
    return Box::new(unix::OsascriptCopy);

    #[cfg(all(unix, not(target_os = "macos")))]
    return Box::new(unix::PkexecCopy);

    #[cfg(windows)]
    return Box::new(windows::RunAsCopy);
}

/// Platform hosts file location.
pub fn default_hosts_path() -> PathBuf {
    #[cfg(windows)]
    return PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts");

    #[cfg(not(windows))]
    return PathBuf::from("/etc/hosts");
}

/// Checks if a binary exists in PATH.
pub fn binary_exists(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                dir.join(name).is_file()
                    || (cfg!(windows) && dir.join(format!("{name}.exe")).is_file())
            })
        })
        .unwrap_or(false)
}

/// Map a finished helper process to a result.
pub(crate) fn check_output(
    tool: &str,
    output: std::process::Output,
    cancelled: impl Fn(Option<i32>, &str) -> bool,
) -> Result<(), ElevationError> {
    if output.status.success() {
        return Ok(());
    }
    let code = output.status.code();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if cancelled(code, &stderr) {
        return Err(ElevationError::Cancelled);
    }
    Err(ElevationError::Failed {
        tool: tool.to_string(),
        code,
        stderr,
    })
}
