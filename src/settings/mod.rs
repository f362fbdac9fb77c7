//! Local settings of a plugin installation.
//!
//! This module provides:
//! - The typed settings record and its plan variants
//! - Migration of older or partial records to the current shape
//! - A store that persists every change as a whole record

pub mod data_store;
pub mod identity;
pub mod merge;
pub mod migration;
pub mod store;
pub mod types;

pub use data_store::{DataStore, FileDataStore, MemoryDataStore};
pub use identity::{IdGenerator, UuidGenerator};
pub use migration::{migrate_record, migrate_settings};
pub use store::SettingsStore;
pub use types::{PartialRecord, Plan, PlanTier, Settings};
