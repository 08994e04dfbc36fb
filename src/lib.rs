//! lovescale - Relationship emotion journal
//!
//! Records a daily note of what went well and what was difficult, scores it
//! against a phrase lexicon, and reports how the mood trends over time.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

pub use error::LoveScaleError;
