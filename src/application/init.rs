//! Initialize journal use case

use crate::domain::{Lexicon, NormalizationPolicy};
use crate::error::Result;
use crate::infrastructure::{Config, CsvEntryRepository};
use std::fs;
use std::path::Path;

/// Initialize a new journal at the specified path with the starter lexicon.
pub fn init(path: &Path, normalization: NormalizationPolicy) -> Result<CsvEntryRepository> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = CsvEntryRepository::new(path.to_path_buf());
    repo.initialize()?;

    let config = Config {
        normalization,
        ..Config::default()
    };
    repo.save_config(&config)?;
    repo.save_lexicon(&Lexicon::starter())?;

    tracing::info!(root = %path.display(), %normalization, "journal initialized");
    Ok(repo)
}
