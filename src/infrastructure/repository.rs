//! Entry storage: one CSV file per user

use crate::domain::{JournalEntry, Lexicon};
use crate::error::{LoveScaleError, Result};
use crate::infrastructure::config::{self, Config, LEXICON_FILE, LOVESCALE_DIR};
use chrono::NaiveDate;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Directory (under the journal root) holding the per-user CSV files
pub const ENTRIES_DIR: &str = "entries";

/// Abstract per-user entry storage.
///
/// Implementations only need whole-collection load and save; the keyed
/// operations are built on top and leave the collection untouched on failure.
pub trait EntryRepository {
    /// All entries for `user`, in stored order; empty if the user has none
    fn load_entries(&self, user: &str) -> Result<Vec<JournalEntry>>;

    /// Replace the stored collection for `user`
    fn save_entries(&self, user: &str, entries: &[JournalEntry]) -> Result<()>;

    /// Append an entry; an existing entry for the same date is kept
    fn append_entry(&self, user: &str, entry: JournalEntry) -> Result<()> {
        let mut entries = self.load_entries(user)?;
        entries.push(entry);
        self.save_entries(user, &entries)
    }

    /// Replace the latest entry with the same date, returning the old one
    fn update_entry(&self, user: &str, entry: JournalEntry) -> Result<JournalEntry> {
        let mut entries = self.load_entries(user)?;
        let idx = latest_index(&entries, entry.date)
            .ok_or(LoveScaleError::EntryNotFound(entry.date))?;
        let previous = std::mem::replace(&mut entries[idx], entry);
        self.save_entries(user, &entries)?;
        Ok(previous)
    }

    /// Remove the latest entry for `date`, returning it
    fn delete_entry(&self, user: &str, date: NaiveDate) -> Result<JournalEntry> {
        let mut entries = self.load_entries(user)?;
        let idx = latest_index(&entries, date).ok_or(LoveScaleError::EntryNotFound(date))?;
        let removed = entries.remove(idx);
        self.save_entries(user, &entries)?;
        Ok(removed)
    }
}

fn latest_index(entries: &[JournalEntry], date: NaiveDate) -> Option<usize> {
    entries.iter().rposition(|e| e.date == date)
}

fn escaped_chars() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_]+").unwrap())
}

/// Stem used for the empty user key; never produced by escaping
const EMPTY_KEY_STEM: &str = "%";

/// Map an opaque user key onto a file stem that is safe on every platform.
///
/// Letters, digits and `_` are kept; every other byte becomes `%XX`, so
/// distinct keys always get distinct files.
pub fn file_stem_for_user(user: &str) -> String {
    if user.is_empty() {
        return EMPTY_KEY_STEM.to_string();
    }

    escaped_chars()
        .replace_all(user, |caps: &regex::Captures| {
            caps[0].bytes().map(|b| format!("%{:02X}", b)).collect::<String>()
        })
        .into_owned()
}

/// Recover the user key from a file stem; `None` for stems we never write
pub fn user_for_file_stem(stem: &str) -> Option<String> {
    if stem == EMPTY_KEY_STEM {
        return Some(String::new());
    }

    let raw = stem.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            bytes.push(raw[i]);
            i += 1;
        }
    }

    let user = String::from_utf8(bytes).ok()?;
    // Reject foreign spellings such as lowercase hex or unescaped spaces
    (file_stem_for_user(&user) == stem).then_some(user)
}

/// File system journal: `.lovescale/` for config and lexicon, `entries/` for data
#[derive(Debug, Clone)]
pub struct CsvEntryRepository {
    pub root: PathBuf,
}

impl CsvEntryRepository {
    pub fn new(root: PathBuf) -> Self {
        CsvEntryRepository { root }
    }

    /// Find the journal root: LOVESCALE_ROOT first, then walk up from the
    /// current directory
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("LOVESCALE_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_lovescale_dir(&path) {
                return Ok(CsvEntryRepository::new(path));
            } else {
                return Err(LoveScaleError::Configuration(format!(
                    "LOVESCALE_ROOT is set to '{}' but no .lovescale directory found. \
                    Run 'lovescale init' in that directory or unset LOVESCALE_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Walk up from `start` until a directory containing `.lovescale/` is found
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_lovescale_dir(&current) {
                return Ok(CsvEntryRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(LoveScaleError::NotLoveScaleDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_lovescale_dir(path: &Path) -> bool {
        path.join(LOVESCALE_DIR).is_dir()
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_lovescale_dir(&self.root)
    }

    /// Create `.lovescale/` and `entries/`; fails if already initialized
    pub fn initialize(&self) -> Result<()> {
        let dir = self.root.join(LOVESCALE_DIR);

        if dir.exists() {
            return Err(LoveScaleError::Configuration(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&dir)?;
        fs::create_dir_all(self.entries_dir())?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    pub fn lexicon_path(&self) -> PathBuf {
        self.root.join(LOVESCALE_DIR).join(LEXICON_FILE)
    }

    pub fn load_lexicon(&self) -> Result<Lexicon> {
        config::load_lexicon(&self.lexicon_path())
    }

    pub fn save_lexicon(&self, lexicon: &Lexicon) -> Result<()> {
        fs::write(self.lexicon_path(), lexicon.to_toml_string()?)?;
        Ok(())
    }

    pub fn entries_dir(&self) -> PathBuf {
        self.root.join(ENTRIES_DIR)
    }

    pub fn user_file(&self, user: &str) -> PathBuf {
        self.entries_dir()
            .join(format!("{}.csv", file_stem_for_user(user)))
    }

    /// Keys of every user with stored entries, sorted
    pub fn list_users(&self) -> Vec<String> {
        let dir = self.entries_dir();
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut users: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                user_for_file_stem(name.strip_suffix(".csv")?)
            })
            .collect();
        users.sort();
        users
    }

    /// Write to a temp file next to `path`, then rename into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so the
    /// destination is removed first.
    fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_name = format!(
            "{}.lovescale-tmp-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("entries.csv"),
            std::process::id()
        );
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;

        if cfg!(windows) && path.exists() {
            fs::remove_file(path)?;
        }

        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl EntryRepository for CsvEntryRepository {
    fn load_entries(&self, user: &str) -> Result<Vec<JournalEntry>> {
        let path = self.user_file(user);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut entries = Vec::new();
        for record in reader.deserialize() {
            let entry: JournalEntry = record?;
            entries.push(entry);
        }

        tracing::debug!(user, count = entries.len(), "entries loaded");
        Ok(entries)
    }

    fn save_entries(&self, user: &str, entries: &[JournalEntry]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if entries.is_empty() {
            writer.write_record(["date", "positive", "negative", "score"])?;
        }
        for entry in entries {
            writer.serialize(entry)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| LoveScaleError::Io(e.into_error()))?;

        Self::write_atomic(&self.user_file(user), &bytes)?;
        tracing::debug!(user, count = entries.len(), "entries saved");
        Ok(())
    }
}

/// Entry storage kept in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryRepository {
    users: RefCell<HashMap<String, Vec<JournalEntry>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryRepository for MemoryRepository {
    fn load_entries(&self, user: &str) -> Result<Vec<JournalEntry>> {
        Ok(self.users.borrow().get(user).cloned().unwrap_or_default())
    }

    fn save_entries(&self, user: &str, entries: &[JournalEntry]) -> Result<()> {
        self.users
            .borrow_mut()
            .insert(user.to_string(), entries.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    fn entry(d: u32, pos: &str, neg: &str, score: f64) -> JournalEntry {
        JournalEntry::new(day(d), pos.to_string(), neg.to_string(), score)
    }

    fn initialized() -> (TempDir, CsvEntryRepository) {
        let temp = TempDir::new().unwrap();
        let repo = CsvEntryRepository::new(temp.path().to_path_buf());
        repo.initialize().unwrap();
        (temp, repo)
    }

    #[test]
    fn test_initialize_creates_dirs() {
        let (temp, repo) = initialized();
        assert!(repo.is_initialized());
        assert!(temp.path().join(".lovescale").is_dir());
        assert!(temp.path().join("entries").is_dir());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let (_temp, repo) = initialized();
        assert!(repo.initialize().is_err());
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (temp, _repo) = initialized();
        let subdir = temp.path().join("sub").join("deep");
        fs::create_dir_all(&subdir).unwrap();

        let repo = CsvEntryRepository::discover_from(&subdir).unwrap();
        assert_eq!(repo.root, temp.path());
    }

    #[test]
    fn test_discover_fails_when_not_initialized() {
        let temp = TempDir::new().unwrap();
        match CsvEntryRepository::discover_from(temp.path()).unwrap_err() {
            LoveScaleError::NotLoveScaleDirectory(_) => {}
            other => panic!("Expected NotLoveScaleDirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let (_temp, repo) = initialized();
        let entries = vec![
            entry(1, "함께 웃었던 대화가 즐거웠어요", "잘 모르겠어요", 0.333),
            entry(2, "text, with \"quotes\"", "line\nbreak", -0.667),
        ];

        repo.save_entries("민지", &entries).unwrap();
        let loaded = repo.load_entries("민지").unwrap();

        assert_eq!(loaded.len(), 2);
        for (a, b) in loaded.iter().zip(&entries) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.positive_text, b.positive_text);
            assert_eq!(a.negative_text, b.negative_text);
            assert!((a.score - b.score).abs() < 1e-9);
        }
    }

    #[test]
    fn test_file_layout() {
        let (temp, repo) = initialized();
        repo.append_entry("me", entry(3, "좋았어", "힘들었어", 0.0))
            .unwrap();

        let content = fs::read_to_string(temp.path().join("entries/me.csv")).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,positive,negative,score"));
        assert_eq!(lines.next(), Some("2025-02-03,좋았어,힘들었어,0.0"));
    }

    #[test]
    fn test_users_are_partitioned() {
        let (_temp, repo) = initialized();
        repo.append_entry("a", entry(1, "x", "y", 0.1)).unwrap();
        repo.append_entry("b", entry(1, "z", "w", -0.1)).unwrap();

        assert_eq!(repo.load_entries("a").unwrap()[0].positive_text, "x");
        assert_eq!(repo.load_entries("b").unwrap()[0].positive_text, "z");
        assert_eq!(repo.list_users(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_user_has_no_entries() {
        let (_temp, repo) = initialized();
        assert!(repo.load_entries("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_empty_collection_round_trips() {
        let (_temp, repo) = initialized();
        repo.save_entries("me", &[]).unwrap();
        assert!(repo.load_entries("me").unwrap().is_empty());
    }

    #[test]
    fn test_file_stem_escapes_user_key() {
        assert_eq!(file_stem_for_user("민지"), "민지");
        assert_eq!(file_stem_for_user("kim_minji"), "kim_minji");
        assert_eq!(file_stem_for_user("../etc"), "%2E%2E%2Fetc");
        assert_eq!(file_stem_for_user("Kim Min-ji"), "Kim%20Min%2Dji");
        assert_eq!(file_stem_for_user("50%"), "50%25");
        assert_eq!(file_stem_for_user(""), "%");
    }

    #[test]
    fn test_file_stem_decodes_back_to_user_key() {
        for user in ["민지", "kim.minji", " kim_minji ", "50%", "", "a/b\\c"] {
            assert_eq!(
                user_for_file_stem(&file_stem_for_user(user)).as_deref(),
                Some(user)
            );
        }
        assert_eq!(user_for_file_stem("kim%2e"), None);
        assert_eq!(user_for_file_stem("a b"), None);
        assert_eq!(user_for_file_stem("50%2"), None);
    }

    #[test]
    fn test_similar_user_keys_stay_separate() {
        let temp = TempDir::new().unwrap();
        let repo = CsvEntryRepository::new(temp.path().to_path_buf());
        repo.initialize().unwrap();

        repo.append_entry("kim.minji", entry(1, "secret", "없음", 0.3))
            .unwrap();

        for other in ["kim minji", "kim_minji", " kim_minji ", "kim-minji"] {
            assert!(repo.load_entries(other).unwrap().is_empty(), "{:?}", other);
        }
        assert_eq!(repo.load_entries("kim.minji").unwrap().len(), 1);
        assert_eq!(repo.list_users(), vec!["kim.minji".to_string()]);
    }

    #[test]
    fn test_same_date_appends() {
        let repo = MemoryRepository::new();
        repo.append_entry("me", entry(1, "a", "b", 0.1)).unwrap();
        repo.append_entry("me", entry(1, "c", "d", 0.2)).unwrap();
        assert_eq!(repo.load_entries("me").unwrap().len(), 2);
    }

    #[test]
    fn test_update_replaces_latest_for_date() {
        let repo = MemoryRepository::new();
        repo.append_entry("me", entry(1, "a", "b", 0.1)).unwrap();
        repo.append_entry("me", entry(1, "c", "d", 0.2)).unwrap();

        let previous = repo.update_entry("me", entry(1, "e", "f", 0.3)).unwrap();
        assert_eq!(previous.positive_text, "c");

        let entries = repo.load_entries("me").unwrap();
        assert_eq!(entries[0].positive_text, "a");
        assert_eq!(entries[1].positive_text, "e");
    }

    #[test]
    fn test_update_missing_date_leaves_collection_unchanged() {
        let repo = MemoryRepository::new();
        repo.append_entry("me", entry(1, "a", "b", 0.1)).unwrap();

        let result = repo.update_entry("me", entry(2, "x", "y", 0.0));
        assert!(matches!(result, Err(LoveScaleError::EntryNotFound(d)) if d == day(2)));
        assert_eq!(repo.load_entries("me").unwrap(), vec![entry(1, "a", "b", 0.1)]);
    }

    #[test]
    fn test_delete_entry() {
        let (_temp, repo) = initialized();
        repo.append_entry("me", entry(1, "a", "b", 0.1)).unwrap();
        repo.append_entry("me", entry(2, "c", "d", 0.2)).unwrap();

        let removed = repo.delete_entry("me", day(1)).unwrap();
        assert_eq!(removed.positive_text, "a");
        assert_eq!(repo.load_entries("me").unwrap().len(), 1);

        assert!(matches!(
            repo.delete_entry("me", day(9)),
            Err(LoveScaleError::EntryNotFound(_))
        ));
        assert_eq!(repo.load_entries("me").unwrap().len(), 1);
    }
}
