//! Local profile persistence with file locking.
//!
//! The profile holds lifetime aggregates (workouts, total reps). Saves
//! are atomic: write to a temp file, sync, rename over the original.

use crate::{Error, Profile, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl Profile {
    /// Load the profile from a file with shared locking
    ///
    /// Returns the default profile if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns the default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No profile file found, using defaults");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open profile {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock profile {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read profile {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<Profile>(&contents) {
            Ok(profile) => {
                tracing::debug!("Loaded profile from {:?}", path);
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!("Failed to parse profile {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the profile to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "profile path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }

    /// Load the profile, modify it, and save it back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Profile) -> Result<()>,
    {
        let mut profile = Self::load(path)?;
        f(&mut profile)?;
        profile.save(path)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        let mut profile = Profile::default();
        profile.display_name = Some("Blockhouse Benny".into());
        profile.total_workouts = 12;
        profile.total_pushups = 2400;

        profile.save(&path).unwrap();
        let loaded = Profile::load(&path).unwrap();

        assert_eq!(loaded.display_name.as_deref(), Some("Blockhouse Benny"));
        assert_eq!(loaded.total_workouts, 12);
        assert_eq!(loaded.total_pushups, 2400);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let profile = Profile::load(&temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(profile.total_workouts, 0);
        assert!(profile.display_name.is_none());
    }

    #[test]
    fn test_corrupted_profile_degrades_to_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        std::fs::write(&path, "{ invalid json }").unwrap();

        let profile = Profile::load(&path).unwrap();
        assert_eq!(profile.total_workouts, 0);
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        Profile::default().save(&path).unwrap();

        Profile::update(&path, |profile| {
            profile.total_workouts += 1;
            profile.last_rule_set_id = Some("hard_time".into());
            Ok(())
        })
        .unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded.total_workouts, 1);
        assert_eq!(loaded.last_rule_set_id.as_deref(), Some("hard_time"));
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        Profile::default().save(&path).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "profile.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only profile.json, found extras: {:?}",
            extras
        );
    }
}
