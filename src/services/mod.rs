//! Service layer for business logic.
//!
//! This module contains services that encapsulate catalog maintenance and
//! coordinate between the models, the file system and the user.

pub mod backups;
pub mod catalog_store;
pub mod contributors;
pub mod entry_builder;
pub mod selection;
pub mod sync;
pub mod tags;

// Re-export commonly used types and functions
pub use backups::BackupService;
pub use catalog_store::{atomic_write, CatalogStore};
pub use contributors::{ContributorFiles, Disposition};
pub use entry_builder::EntryBuilder;
pub use selection::{parse_range, SelectionError};
pub use tags::TagMacros;
