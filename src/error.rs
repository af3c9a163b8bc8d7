//! Error types for the entry store and the commit pipeline.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::commit::CommitStage;
use crate::entry::EntryId;
use crate::platform::ElevationError;

/// Entry field a validation message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Ip,
    Domain,
    Comment,
    ProjectTag,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Ip => "ip",
            Field::Domain => "domain",
            Field::Comment => "comment",
            Field::ProjectTag => "project tag",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// One or more field-level problems with a candidate entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_fields(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Message for `field`, if any.
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("entry {0} not found")]
    NotFound(EntryId),
}

/// Commit pipeline failure. Every variant leaves the target file in its prior state.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backup failed ({}): {source}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("staging failed ({}): {source}", .path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("elevated copy failed: {0}")]
    Elevation(#[from] ElevationError),
}

impl CommitError {
    /// Stage the pipeline was in when it failed. Plain reads report `Idle`.
    pub fn stage(&self) -> CommitStage {
        match self {
            CommitError::Read { .. } => CommitStage::Idle,
            CommitError::Backup { .. } => CommitStage::BackingUp,
            CommitError::Staging { .. } => CommitStage::Staging,
            CommitError::Elevation(_) => CommitStage::Elevating,
        }
    }
}
