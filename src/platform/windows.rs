//! Windows platform implementations.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use super::{check_output, ElevatedCopy, ElevationError};

/// Copy through an elevated `cmd /c copy` launched with the UAC `RunAs` verb.
pub struct RunAsCopy;

fn ps_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[async_trait]
impl ElevatedCopy for RunAsCopy {
    async fn copy(&self, src: &Path, dst: &Path) -> Result<(), ElevationError> {
        let inner = format!(
            "/c copy /Y \"{}\" \"{}\"",
            src.to_string_lossy(),
            dst.to_string_lossy()
        );
        let script = format!(
            "$p = Start-Process -FilePath cmd.exe -ArgumentList {} -Verb RunAs -Wait -PassThru -WindowStyle Hidden; exit $p.ExitCode",
            ps_quote(&inner)
        );
        tracing::info!(src = %src.display(), dst = %dst.display(), "RunAs copy");
        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .output()
            .await?;
        // Declining the UAC prompt surfaces as "The operation was canceled by the user."
        check_output("powershell", output, |_, stderr| {
            stderr.to_lowercase().contains("canceled by the user")
        })
    }

    fn name(&self) -> &'static str {
        "runas"
    }

    fn helper_binary(&self) -> Option<&'static str> {
        Some("powershell")
    }
}
