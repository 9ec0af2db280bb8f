//! File-backed implementation of the preferences store.
//!
//! Preferences (theme, label presets) are local presentation state, never
//! persisted in the record store. They live in one JSON file next to the
//! server; an unreadable or missing file falls back to defaults instead of
//! failing requests.

use std::path::PathBuf;
use std::sync::Mutex;

use estoque_core::error::CoreError;
use estoque_core::prefs::{Preferences, PrefsStore};

pub struct FilePrefsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles from concurrent requests.
    lock: Mutex<()>,
}

impl FilePrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_file(&self) -> Option<Preferences> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Preferences>(&raw) {
            Ok(mut prefs) => {
                prefs.ensure_active_preset();
                Some(prefs)
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Preferences file unreadable, using defaults");
                None
            }
        }
    }

    fn write_file(&self, prefs: &Preferences) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(prefs)
            .map_err(|e| CoreError::Internal(format!("failed to encode preferences: {e}")))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| CoreError::Internal(format!("failed to write preferences file: {e}")))
    }
}

impl PrefsStore for FilePrefsStore {
    fn load(&self) -> Result<Preferences, CoreError> {
        let _guard = self.lock.lock().expect("prefs lock poisoned");
        Ok(self.read_file().unwrap_or_default())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), CoreError> {
        let _guard = self.lock.lock().expect("prefs lock poisoned");
        self.write_file(prefs)
    }

    fn reset(&self) -> Result<Preferences, CoreError> {
        let _guard = self.lock.lock().expect("prefs lock poisoned");
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| CoreError::Internal(format!("failed to remove preferences file: {e}")))?;
        }
        Ok(Preferences::default())
    }
}
