//! In-memory entry collection with validated mutations and filtered views.

use std::collections::BTreeSet;

use crate::entry::{EntryId, EntryPatch, HostEntry, NewEntry, View};
use crate::error::{Field, FieldError, StoreError, ValidationError};
use crate::validate;

/// Owned, ordered entry sequence. Order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<HostEntry>,
    dirty: bool,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries as loaded from disk. The store starts clean.
    pub fn from_entries(entries: Vec<HostEntry>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    pub fn entries(&self) -> &[HostEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HostEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&HostEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Case-insensitive lookup by domain.
    pub fn find_by_domain(&self, domain: &str) -> Option<&HostEntry> {
        self.entries
            .iter()
            .find(|e| e.domain.eq_ignore_ascii_case(domain.trim()))
    }

    /// Unsaved mutations since load or the last successful commit.
    pub fn has_changes(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Called after a successful commit.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Validate and append a new entry; returns its fresh id.
    pub fn add(&mut self, candidate: NewEntry) -> Result<EntryId, StoreError> {
        let candidate = normalize(candidate);
        self.check(&candidate, None)?;
        let id = EntryId::new();
        self.entries.push(HostEntry {
            id,
            ip: candidate.ip,
            domain: candidate.domain,
            project_tag: candidate.project_tag,
            comment: candidate.comment,
            enabled: candidate.enabled,
            source_line: None,
        });
        self.dirty = true;
        tracing::debug!(%id, "entry added");
        Ok(id)
    }

    /// Apply `patch` to entry `id`, re-validating the merged result.
    pub fn update(&mut self, id: EntryId, patch: EntryPatch) -> Result<(), StoreError> {
        let current = self.get(id).ok_or(StoreError::NotFound(id))?;
        let merged = normalize(NewEntry {
            ip: patch.ip.unwrap_or_else(|| current.ip.clone()),
            domain: patch.domain.unwrap_or_else(|| current.domain.clone()),
            project_tag: patch.project_tag.unwrap_or_else(|| current.project_tag.clone()),
            comment: patch.comment.unwrap_or_else(|| current.comment.clone()),
            enabled: patch.enabled.unwrap_or(current.enabled),
        });
        self.check(&merged, Some(id))?;

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        entry.ip = merged.ip;
        entry.domain = merged.domain;
        entry.project_tag = merged.project_tag;
        entry.comment = merged.comment;
        entry.enabled = merged.enabled;
        self.dirty = true;
        tracing::debug!(%id, "entry updated");
        Ok(())
    }

    /// Flip `enabled`; returns the new state.
    pub fn toggle(&mut self, id: EntryId) -> Result<bool, StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        entry.enabled = !entry.enabled;
        self.dirty = true;
        Ok(entry.enabled)
    }

    /// Remove entry `id`. Absent ids are a no-op; returns whether anything was removed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.dirty = true;
            tracing::debug!(%id, "entry removed");
        }
        removed
    }

    /// Entries in `view` that match `search` (case-insensitive substring). Empty search matches all.
    ///
    /// The returned iterator borrows the store and can be cloned to restart.
    pub fn query<'a>(
        &'a self,
        view: &'a View,
        search: &str,
    ) -> impl Iterator<Item = &'a HostEntry> + Clone + 'a {
        let needle = search.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |e| view.includes(e) && (needle.is_empty() || e.matches_search(&needle)))
    }

    /// Distinct project tags, sorted.
    pub fn distinct_project_tags(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| e.project_tag.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Field checks plus the case-insensitive duplicate-domain check, ignoring `exclude`.
    ///
    /// Comment and tag are written verbatim into one hosts line, so they must stay on it.
    fn check(&self, c: &NewEntry, exclude: Option<EntryId>) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        let (ip, domain) = (c.ip.as_str(), c.domain.as_str());

        if ip.is_empty() {
            errors.push(field_error(Field::Ip, "IP address is required"));
        } else if !validate::is_valid_ip(ip) {
            errors.push(field_error(Field::Ip, "Invalid IP address format"));
        }

        if domain.is_empty() {
            errors.push(field_error(Field::Domain, "Domain is required"));
        } else if !validate::is_valid_domain(domain) {
            errors.push(field_error(Field::Domain, "Invalid domain format"));
        } else if self
            .entries
            .iter()
            .any(|e| Some(e.id) != exclude && e.domain.eq_ignore_ascii_case(domain))
        {
            errors.push(field_error(Field::Domain, "This domain already exists"));
        }

        if c.comment.chars().any(char::is_control) {
            errors.push(field_error(Field::Comment, "Comment must be a single line of text"));
        }

        if let Some(tag) = c.project_tag.as_deref() {
            if tag.chars().any(|ch| ch.is_control() || ch == ']') {
                errors.push(field_error(
                    Field::ProjectTag,
                    "Project tag must be a single line without ']'",
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}

fn field_error(field: Field, message: &str) -> FieldError {
    FieldError {
        field,
        message: message.to_string(),
    }
}

/// Trim fields, lowercase the domain, drop empty tags.
fn normalize(mut c: NewEntry) -> NewEntry {
    c.ip = c.ip.trim().to_string();
    c.domain = c.domain.trim().to_lowercase();
    c.comment = c.comment.trim().to_string();
    c.project_tag = c
        .project_tag
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    c
}
