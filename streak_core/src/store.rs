//! Key-value persistence with file locking.
//!
//! Each top-level collection lives in its own JSON file under the data
//! directory (`checkedDays.json`, `blockedDays.json`, ...). Loads fall back
//! to the key's default on any failure so a damaged file can never wedge the
//! tool; saves write a temp file, sync it, and atomically rename it over the
//! old one.

use crate::error::{Error, Result};
use crate::log::CheckinLog;
use crate::progression::ExerciseBook;
use crate::types::{Exercise, WeightEntry};
use chrono::Utc;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Canonical key names; each key maps to `<key>.json` in the data directory
pub mod keys {
    pub const CHECKED_DAYS: &str = "checkedDays";
    pub const BLOCKED_DAYS: &str = "blockedDays";
    pub const GEMS: &str = "gems";
    pub const DARK_MODE: &str = "darkMode";
    pub const EXERCISES: &str = "exercises";
}

/// File-per-key JSON store rooted at a data directory
#[derive(Clone, Debug)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open a store at the given directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a key with shared locking
    ///
    /// Returns the type's default value if the file doesn't exist. If the
    /// file is unreadable or corrupted, logs a warning and returns the
    /// default; reads never fail.
    pub fn read_key<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let path = self.key_path(key);
        if !path.exists() {
            tracing::debug!("No file for key '{}', using default", key);
            return T::default();
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open {:?}: {}. Using default.", path, e);
                return T::default();
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock {:?}: {}. Using default.", path, e);
            return T::default();
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read {:?}: {}. Using default.", path, e);
            return T::default();
        }

        let _ = file.unlock();

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => {
                tracing::debug!("Loaded key '{}' from {:?}", key, path);
                value
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}. Using default.", path, e);
                T::default()
            }
        }
    }

    /// Write a key with exclusive locking
    ///
    /// Atomically writes the value by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        // Ensure the data directory still exists
        std::fs::create_dir_all(&self.dir)?;

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(&self.dir)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(value)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old file
        temp.persist(self.key_path(key))
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved key '{}'", key);
        Ok(())
    }

    /// Delete a key's file if present
    pub fn remove_key(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    /// Load the full check-in log from its two key files
    pub fn load_log(&self) -> CheckinLog {
        CheckinLog {
            checked: self.read_key(keys::CHECKED_DAYS),
            blocked: self.read_key(keys::BLOCKED_DAYS),
        }
    }

    pub fn save_checked_days(&self, log: &CheckinLog) -> Result<()> {
        self.write_key(keys::CHECKED_DAYS, &log.checked)
    }

    pub fn save_blocked_days(&self, log: &CheckinLog) -> Result<()> {
        self.write_key(keys::BLOCKED_DAYS, &log.blocked)
    }

    /// Save both halves of the check-in log
    pub fn save_log(&self, log: &CheckinLog) -> Result<()> {
        self.save_checked_days(log)?;
        self.save_blocked_days(log)
    }

    /// Persist the derived gem count
    ///
    /// Write-only cache kept for external consumers; the engine always
    /// recomputes gems from the log and never reads this key back.
    pub fn write_gem_cache(&self, gems: u32) -> Result<()> {
        self.write_key(keys::GEMS, &gems)
    }

    pub fn load_dark_mode(&self) -> bool {
        self.read_key(keys::DARK_MODE)
    }

    pub fn save_dark_mode(&self, enabled: bool) -> Result<()> {
        self.write_key(keys::DARK_MODE, &enabled)
    }

    /// Load the exercise book, upgrading legacy single-weight records
    ///
    /// A record with no history but a legacy `weight` field becomes a record
    /// whose history holds that one weight, stamped at load time. When any
    /// record was upgraded the whole collection is re-persisted immediately.
    pub fn load_exercises(&self) -> Result<ExerciseBook> {
        let raw: Vec<StoredExercise> = self.read_key(keys::EXERCISES);
        let mut migrated = false;
        let exercises: Vec<Exercise> = raw
            .into_iter()
            .map(|stored| {
                let (exercise, was_migrated) = stored.into_exercise();
                migrated |= was_migrated;
                exercise
            })
            .collect();

        let book = ExerciseBook { exercises };
        if migrated {
            tracing::info!("Migrated legacy single-weight exercise records");
            self.save_exercises(&book)?;
        }
        Ok(book)
    }

    pub fn save_exercises(&self, book: &ExerciseBook) -> Result<()> {
        self.write_key(keys::EXERCISES, &book.exercises)
    }

    /// Remove all streak data: check-ins, blocks and the gem cache
    ///
    /// Exercises and the theme setting are left alone.
    pub fn clear_streak_data(&self) -> Result<()> {
        self.remove_key(keys::CHECKED_DAYS)?;
        self.remove_key(keys::BLOCKED_DAYS)?;
        self.remove_key(keys::GEMS)
    }
}

/// Wire shape for exercise records, tolerating the legacy single-weight
/// layout that predates per-entry history
#[derive(Debug, Deserialize)]
struct StoredExercise {
    id: Uuid,
    name: String,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    history: Vec<WeightEntry>,
    #[serde(default)]
    weight: Option<f64>,
}

impl StoredExercise {
    fn into_exercise(self) -> (Exercise, bool) {
        let mut history = self.history;
        let mut migrated = false;
        if history.is_empty() {
            if let Some(weight) = self.weight {
                history.push(WeightEntry {
                    date: Utc::now(),
                    weight,
                });
                migrated = true;
            }
        }
        (
            Exercise {
                id: self.id,
                name: self.name,
                section: self.section,
                history,
            },
            migrated,
        )
    }
}
