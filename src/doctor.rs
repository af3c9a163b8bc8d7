//! Doctor command: health checks for the hosts file, backups and elevation.

use crate::commit::CommitManager;
use crate::hosts::{self, Line};
use crate::platform::{binary_exists, ElevatedCopy};

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub ok: bool,
    pub message: String,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Run all doctor checks.
pub fn run_checks(manager: &CommitManager) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let elevator = manager.elevator();
    let hosts_path = manager.hosts_file();

    // 1. Target readable, entries and managed header
    match std::fs::read_to_string(hosts_path) {
        Ok(text) => {
            let lines = hosts::parse_lines(&text);
            let entries = lines.iter().filter(|l| matches!(l, Line::Entry(_))).count();
            let other = lines.iter().filter(|l| matches!(l, Line::Other(_))).count();
            results.push(CheckResult::pass(format!(
                "{} readable: {entries} entries",
                hosts_path.display()
            )));
            // Informational only
            if other > 0 {
                results.push(CheckResult::pass(format!(
                    "{other} comment or unparseable line(s) will be dropped on save"
                )));
            }
            if lines.iter().any(|l| matches!(l, Line::Header)) {
                results.push(CheckResult::pass("Managed header present"));
            } else {
                results.push(CheckResult::pass(
                    "No managed header yet; it is written on first save",
                ));
            }
        }
        Err(e) => {
            results.push(CheckResult::fail(format!(
                "cannot read {}: {e}",
                hosts_path.display()
            )));
        }
    }

    // 2. Backup directory writable
    let dir = manager.backup_dir();
    match std::fs::create_dir_all(dir).and_then(|_| write_probe(dir)) {
        Ok(()) => {
            let n = manager.list_backups().len();
            results.push(CheckResult::pass(format!(
                "Backup directory {} writable ({n} backup(s))",
                dir.display()
            )));
        }
        Err(e) => {
            results.push(CheckResult::fail(format!(
                "Backup directory {} not writable: {e}",
                dir.display()
            )));
        }
    }

    // 3. Elevation helper available
    match elevator.helper_binary() {
        Some(bin) if binary_exists(bin) => {
            results.push(CheckResult::pass(format!("Elevation via {bin} available")));
        }
        Some(bin) => {
            results.push(CheckResult::fail(format!(
                "{bin} not found in PATH; saving will fail"
            )));
        }
        None => {
            results.push(CheckResult::pass(format!(
                "Elevation disabled ({} copy)",
                elevator.name()
            )));
        }
    }

    results
}

fn write_probe(dir: &std::path::Path) -> std::io::Result<()> {
    let probe = dir.join(".hostpilot-probe");
    std::fs::write(&probe, b"")?;
    std::fs::remove_file(&probe)
}
