//! Utilities shared by the Pinpad CLI and TUI: the user preference store
//! and filesystem path helpers.

pub mod path_processing;
pub mod preferences;

pub use path_processing::{config_root, expand_tilde};
pub use preferences::{DEFAULT_RESET_DELAY_MS, PreferencesError, PreferencesPayload, UserPreferences};
