//! Config Entries
//!
//! Persistent configuration entries for the Visonic Alarm bridge. Each
//! entry represents one configured alarm account/panel pair and carries
//! the immutable setup data collected by the config flow plus a
//! user-adjustable options map edited by the options flow.
//!
//! # Key Types
//!
//! - [`ConfigEntry`] - A single integration configuration
//! - [`ConfigEntries`] - Manager for all config entries
//! - [`Storage`] - `.storage/` JSON persistence with version tracking

pub mod entry;
pub mod manager;
pub mod storage;

pub use entry::{ConfigEntry, ConfigEntrySource, ConfigEntryUpdate};

pub use manager::{
    ConfigEntries, ConfigEntriesData, ConfigEntriesError, ConfigEntriesResult, STORAGE_KEY,
    STORAGE_VERSION,
};

pub use storage::{Storable, Storage, StorageError, StorageFile, StorageResult};
