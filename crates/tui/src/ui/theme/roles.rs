use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles used throughout the UI.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub background: Color,
    pub surface: Color,
    pub surface_muted: Color,
    pub border: Color,

    pub text: Color,
    pub text_muted: Color,

    /// Active slot and primary call to action (the "Add PIN" button).
    pub accent_primary: Color,
    /// Lock glyph and other decorative accents.
    pub accent_secondary: Color,

    /// Digit slots and the dialog after a PIN is set.
    pub success: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,

    /// Background color used when displaying modal overlays.
    ///
    /// This color should be significantly darker than the primary background so that
    /// the active modal content appears elevated while still matching the theme
    /// palette.
    pub modal_bg: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    // Text styles
    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    // Borders and focus
    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    // Selection
    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    /// Style used for the darkened background that appears behind modal dialogs.
    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg)
    }

    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }

    // Accents
    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }
}
