//! # Pinpad TUI Library
//!
//! This library provides the terminal user interface for Pinpad: a "Set PIN"
//! screen with four digit slots, an on-screen keypad and a submit button,
//! plus the acknowledgment dialog shown after a PIN is set.
//!
//! ## Architecture
//!
//! Every UI element is a component that turns input into `Msg`s. `App`
//! applies those messages to the PIN entry controller and answers with
//! `Effect`s; the runtime executes the effects (notifying the PIN sink,
//! arming the delayed reset, opening or closing the dialog) and redraws.

mod app;
mod cmd;
mod ui;

use anyhow::Result;

pub use ui::components::pin_entry::{PIN_LENGTH, ResetSettings};
pub use ui::theme::catalog::{THEME_DEFINITIONS, ThemeDefinition};

/// Startup options for the PIN entry screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuiConfig {
    /// Theme id or alias; environment overrides still win.
    pub theme: Option<String>,
    /// Delay and policy of the reset that follows a successful submit.
    pub reset: ResetSettings,
    /// Draw entered digits as bullets instead of the digits themselves.
    pub mask_digits: bool,
}

/// Runs the PIN entry screen until the user quits.
///
/// # Errors
///
/// Returns an error when the terminal cannot be put into raw mode, the
/// alternate screen cannot be entered, or drawing fails.
pub async fn run(config: TuiConfig) -> Result<()> {
    ui::runtime::run_app(config).await
}
