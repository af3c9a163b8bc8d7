//! Unix (macOS, Linux) platform implementations.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use super::{binary_exists, check_output, ElevatedCopy, ElevationError};

/// Linux: `pkexec cp src dst`, authenticated through the polkit agent.
pub struct PkexecCopy;

/// pkexec exit codes for a dismissed dialog / not authorized.
const PKEXEC_DISMISSED: i32 = 126;
const PKEXEC_NOT_AUTHORIZED: i32 = 127;

#[async_trait]
impl ElevatedCopy for PkexecCopy {
    async fn copy(&self, src: &Path, dst: &Path) -> Result<(), ElevationError> {
        if !binary_exists("pkexec") {
            return Err(ElevationError::ToolNotFound("pkexec".into()));
        }
        tracing::info!(src = %src.display(), dst = %dst.display(), "pkexec cp");
        // Arguments are passed directly, no shell involved
        let output = Command::new("pkexec")
            .arg("cp")
            .arg(src)
            .arg(dst)
            .output()
            .await?;
        check_output("pkexec", output, |code, _| {
            matches!(code, Some(PKEXEC_DISMISSED | PKEXEC_NOT_AUTHORIZED))
        })
    }

    fn name(&self) -> &'static str {
        "pkexec"
    }

    fn helper_binary(&self) -> Option<&'static str> {
        Some("pkexec")
    }
}

/// macOS: `do shell script "cp ..." with administrator privileges` via osascript.
pub struct OsascriptCopy;

#[async_trait]
impl ElevatedCopy for OsascriptCopy {
    async fn copy(&self, src: &Path, dst: &Path) -> Result<(), ElevationError> {
        let shell = format!(
            "cp {} {}",
            shell_quote(&src.to_string_lossy()),
            shell_quote(&dst.to_string_lossy())
        );
        let script = format!(
            "do shell script \"{}\" with administrator privileges",
            applescript_escape(&shell)
        );
        tracing::info!(src = %src.display(), dst = %dst.display(), "osascript cp");
        let output = Command::new("osascript")
            .args(["-e", &script])
            .output()
            .await?;
        // -128 is "User canceled."
        check_output("osascript", output, |_, stderr| stderr.contains("-128"))
    }

    fn name(&self) -> &'static str {
        "osascript"
    }

    fn helper_binary(&self) -> Option<&'static str> {
        Some("osascript")
    }
}

/// Single-quote for /bin/sh.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Escape for an AppleScript string literal.
pub fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
