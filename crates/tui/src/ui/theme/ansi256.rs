//! ANSI 256-color fallback theme tailored for terminals without truecolor support.
//!
//! This palette approximates the Dracula theme using indexed colors so the
//! keypad remains legible inside macOS Terminal and other 8-bit terminals.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

/// ANSI 256-color approximation of the Dracula palette.
#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Ansi256Theme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: Color::Indexed(236),
                surface: Color::Indexed(236),
                surface_muted: Color::Indexed(239),
                border: Color::Indexed(239),

                text: Color::Indexed(255),
                text_muted: Color::Indexed(247),

                accent_primary: Color::Indexed(215),
                accent_secondary: Color::Indexed(228),

                success: Color::Indexed(84),

                selection_bg: Color::Indexed(239),
                selection_fg: Color::Indexed(255),
                focus: Color::Indexed(117),
                modal_bg: Color::Indexed(232),
            },
        }
    }
}

impl Default for Ansi256Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for Ansi256Theme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
