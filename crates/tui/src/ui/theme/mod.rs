//! Theme styling module for the TUI UI layer.
//!
//! This module defines the color palettes (Dracula, Nord), an ANSI 256-color
//! fallback, semantic theme roles, and helper builders for Ratatui widgets
//! and styles. Prefer these helpers over hard-coding colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod catalog;
pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use catalog::ThemeDefinition;
pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable naming a theme that overrides preferences.
pub const THEME_ENV: &str = "PINPAD_THEME";
/// Environment variable forcing a color mode (`truecolor` or `ansi256`).
pub const COLOR_MODE_ENV: &str = "PINPAD_COLOR_MODE";

/// Theme plus metadata describing how it was selected.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme based on environment variables, the preferred theme, and terminal capabilities.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    let capability = detect_color_capability();
    if matches!(capability, ColorCapability::Ansi256) {
        debug!("ANSI-only terminal detected; ignoring theme overrides and forcing fallback palette.");
        return LoadedTheme::from_definition(catalog::default_ansi());
    }

    if let Ok(theme_name) = env::var(THEME_ENV)
        && let Some(definition) = catalog::resolve(theme_name.trim())
    {
        return LoadedTheme::from_definition(definition);
    }

    if let Some(name) = preferred_theme {
        match catalog::resolve(name.trim()) {
            Some(definition) => return LoadedTheme::from_definition(definition),
            None => debug!(theme = name, "Unknown theme requested; using default"),
        }
    }

    LoadedTheme::from_definition(catalog::default_truecolor())
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var(COLOR_MODE_ENV).ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}
