//! User preference persistence for the Pinpad TUI.
//!
//! This module provides a tiny JSON-backed store that records lightweight
//! configuration such as the preferred theme and the delay before a submitted
//! PIN is cleared. The file is written to the standard configuration
//! directory (`~/.config/pinpad/preferences.json` on most platforms) and is
//! safe to read/write from multiple threads thanks to the internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use pinpad_types::ResetPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{config_root, expand_tilde};

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "PINPAD_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Delay between a successful submit and the automatic reset.
pub const DEFAULT_RESET_DELAY_MS: u64 = 1500;

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesPayload {
    /// Canonical identifier of the theme to load.
    pub preferred_theme: Option<String>,
    /// Milliseconds between a successful submit and the automatic reset.
    pub reset_delay_ms: u64,
    /// Whether editing during the reset delay cancels the pending reset.
    pub reset_policy: ResetPolicy,
    /// Render filled slots as bullets instead of the entered digits.
    pub mask_digits: bool,
}

impl Default for PreferencesPayload {
    fn default() -> Self {
        Self {
            preferred_theme: None,
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
            reset_policy: ResetPolicy::default(),
            mask_digits: false,
        }
    }
}

impl PreferencesPayload {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Create a store rooted at the default path (or the path named by
    /// `PINPAD_PREFERENCES_PATH`).
    pub fn new() -> Result<Self, PreferencesError> {
        Self::with_path(default_preferences_path())
    }

    /// Create a store rooted at an explicit path.
    pub fn with_path(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> PreferencesPayload {
        self.payload.lock().expect("preferences lock poisoned").clone()
    }

    /// Replace every value and persist the result.
    pub fn save(&self, values: PreferencesPayload) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        *payload = values;
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_root().join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}
