//! Infrastructure layer - Files, configuration and persistence

pub mod config;
pub mod repository;

pub use config::Config;
pub use repository::{CsvEntryRepository, EntryRepository, MemoryRepository};
