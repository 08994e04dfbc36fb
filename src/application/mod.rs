//! Application layer - Use cases and orchestration

pub mod analyze;
pub mod init;
pub mod journal;
pub mod manage_config;

pub use analyze::analyze;
pub use journal::{Evaluation, JournalService};
pub use manage_config::ConfigService;
