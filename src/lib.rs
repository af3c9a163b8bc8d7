//! HostPilot - structured hosts file editor with backups and privileged commit.

pub mod backup;
pub mod cli;
pub mod commit;
pub mod config;
pub mod doctor;
pub mod entry;
pub mod error;
pub mod hosts;
pub mod platform;
pub mod store;
pub mod transfer;
pub mod validate;

pub use commit::{CommitManager, CommitStage};
pub use entry::{EntryId, EntryPatch, HostEntry, NewEntry, View};
pub use error::{CommitError, StoreError, ValidationError};
pub use store::EntryStore;
