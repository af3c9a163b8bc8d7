//! Host entry model: one IP-to-domain mapping line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session-scoped entry identifier. Not persisted in the hosts file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(uuid::Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single mapping, enabled or commented out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    pub id: EntryId,
    pub ip: String,
    pub domain: String,
    pub project_tag: Option<String>,
    /// Empty when the line has no trailing annotation.
    pub comment: String,
    pub enabled: bool,
    /// Physical line index at parse time; `None` for entries created in memory.
    pub source_line: Option<usize>,
}

impl HostEntry {
    /// True if `needle` (already lowercased) occurs in ip, domain, tag or comment.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        self.ip.to_lowercase().contains(needle)
            || self.domain.to_lowercase().contains(needle)
            || self
                .project_tag
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle))
            || self.comment.to_lowercase().contains(needle)
    }
}

/// Candidate for `EntryStore::add`. Also the JSON import item shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub ip: String,
    pub domain: String,
    #[serde(default)]
    pub project_tag: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl NewEntry {
    pub fn new(ip: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            domain: domain.into(),
            project_tag: None,
            comment: String::new(),
            enabled: true,
        }
    }

    pub fn with_project(mut self, tag: impl Into<String>) -> Self {
        self.project_tag = Some(tag.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl From<&HostEntry> for NewEntry {
    fn from(e: &HostEntry) -> Self {
        Self {
            ip: e.ip.clone(),
            domain: e.domain.clone(),
            project_tag: e.project_tag.clone(),
            comment: e.comment.clone(),
            enabled: e.enabled,
        }
    }
}

/// Partial update for `EntryStore::update`. `None` leaves a field unchanged;
/// `project_tag: Some(None)` clears the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub ip: Option<String>,
    pub domain: Option<String>,
    pub project_tag: Option<Option<String>>,
    pub comment: Option<String>,
    pub enabled: Option<bool>,
}

/// Which slice of the store a query looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    All,
    Disabled,
    Project(String),
}

impl View {
    pub(crate) fn includes(&self, entry: &HostEntry) -> bool {
        match self {
            View::All => true,
            View::Disabled => !entry.enabled,
            View::Project(tag) => entry.project_tag.as_deref() == Some(tag.as_str()),
        }
    }
}

impl FromStr for View {
    type Err = std::convert::Infallible;

    /// `all` and `disabled` are reserved; anything else names a project tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => View::All,
            "disabled" => View::Disabled,
            tag => View::Project(tag.to_string()),
        })
    }
}
