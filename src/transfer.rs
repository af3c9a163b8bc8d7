//! JSON export and import of entry lists.

use anyhow::{Context, Result};
use std::path::Path;

use crate::entry::NewEntry;
use crate::error::StoreError;
use crate::store::EntryStore;

/// Write all entries as a pretty JSON array of `NewEntry` records.
pub fn export_entries(store: &EntryStore, path: &Path) -> Result<usize> {
    let items: Vec<NewEntry> = store.entries().iter().map(NewEntry::from).collect();
    let s = serde_json::to_string_pretty(&items)?;
    std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(items.len())
}

/// Outcome of an import: how many were added, and why the rest were skipped.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: Vec<(String, StoreError)>,
}

/// Read a JSON array of `NewEntry` and `add` each one. Invalid or duplicate items are skipped.
pub fn import_entries(store: &mut EntryStore, path: &Path) -> Result<ImportReport> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let items: Vec<NewEntry> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    let mut report = ImportReport::default();
    for item in items {
        let domain = item.domain.clone();
        match store.add(item) {
            Ok(_) => report.added += 1,
            Err(e) => {
                tracing::warn!(%domain, "import skipped: {e}");
                report.skipped.push((domain, e));
            }
        }
    }
    Ok(report)
}
