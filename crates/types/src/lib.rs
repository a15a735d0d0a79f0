//! Shared vocabulary for the Pinpad workspace.
//!
//! The TUI runtime, the components and the CLI exchange the types defined
//! here: messages flowing into the application, effects flowing out of it,
//! and the few enums that are persisted in user preferences.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one submit-and-reset cycle of the PIN entry screen.
///
/// A new identifier is allocated on every successful submit; the delayed
/// reset carries it so that a timer armed for an older session can be
/// recognised and ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Returns the identifier that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// A key on the on-screen numeric keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadKey {
    /// A token written into the next free slot (`0`-`9` or `.`).
    Digit(char),
    /// The backspace key.
    Erase,
}

impl KeypadKey {
    /// Label rendered on the key face.
    pub fn label(&self) -> String {
        match self {
            KeypadKey::Digit(token) => token.to_string(),
            KeypadKey::Erase => "⌫".to_string(),
        }
    }
}

/// What happens to a pending delayed reset when the user edits the PIN
/// before the timer fires.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Editing invalidates the pending reset; the new entry survives.
    #[default]
    CancelOnEdit,
    /// The timer always fires and clears whatever was entered meanwhile.
    Clobber,
}

/// Returned when a reset policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reset policy '{0}' (expected cancel-on-edit or clobber)")]
pub struct ParseResetPolicyError(pub String);

impl FromStr for ResetPolicy {
    type Err = ParseResetPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cancel_on_edit" | "cancel" => Ok(ResetPolicy::CancelOnEdit),
            "clobber" => Ok(ResetPolicy::Clobber),
            _ => Err(ParseResetPolicyError(value.trim().to_string())),
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetPolicy::CancelOnEdit => f.write_str("cancel-on-edit"),
            ResetPolicy::Clobber => f.write_str("clobber"),
        }
    }
}

/// Modal overlays that can be shown above the PIN entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Acknowledgment shown once per successful submit.
    PinSetAlert,
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic UI tick (success pulse)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// A keypad key was pressed (keyboard, mouse or highlighted key)
    KeypadPressed(KeypadKey),
    /// The "Add PIN" control was activated
    SubmitRequested,
    /// The delayed reset armed for the given session fired
    ResetElapsed(SessionId),
    /// The acknowledgment dialog was dismissed
    AlertDismissed,
}

/// Side effects requested by state changes and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// One-shot "PIN set" notification carrying the joined buffer contents
    PinSubmitted(String),
    /// Arm the delayed reset for `session`, replacing any armed timer
    ScheduleReset { session: SessionId, delay: Duration },
    /// Disarm the delayed reset, if any
    CancelReset,
    /// Open a modal overlay
    ShowModal(Modal),
    /// Close the open modal overlay
    CloseModal,
    /// Leave the application
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_policy_parses_cli_and_config_spellings() {
        assert_eq!("cancel-on-edit".parse::<ResetPolicy>(), Ok(ResetPolicy::CancelOnEdit));
        assert_eq!("Cancel_On_Edit".parse::<ResetPolicy>(), Ok(ResetPolicy::CancelOnEdit));
        assert_eq!("clobber".parse::<ResetPolicy>(), Ok(ResetPolicy::Clobber));
        let error = "Later".parse::<ResetPolicy>().unwrap_err();
        assert_eq!(error, ParseResetPolicyError("Later".into()));
        assert_eq!(error.to_string(), "unknown reset policy 'Later' (expected cancel-on-edit or clobber)");
    }

    #[test]
    fn reset_policy_serializes_as_snake_case() {
        let json = serde_json::to_string(&ResetPolicy::CancelOnEdit).unwrap();
        assert_eq!(json, "\"cancel_on_edit\"");
        let parsed: ResetPolicy = serde_json::from_str("\"clobber\"").unwrap();
        assert_eq!(parsed, ResetPolicy::Clobber);
    }

    #[test]
    fn session_ids_advance() {
        let first = SessionId::default();
        assert_eq!(first.next(), SessionId(1));
        assert_eq!(SessionId(u64::MAX).next(), SessionId(0));
    }

    #[test]
    fn keypad_labels_match_key_faces() {
        assert_eq!(KeypadKey::Digit('7').label(), "7");
        assert_eq!(KeypadKey::Digit('.').label(), ".");
        assert_eq!(KeypadKey::Erase.label(), "⌫");
    }
}
