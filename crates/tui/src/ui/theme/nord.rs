use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Nord palette (https://www.nordtheme.com/docs/colors-and-palettes)
// Polar Night
pub const NORD0: Color = Color::Rgb(0x2E, 0x34, 0x40);
pub const NORD1: Color = Color::Rgb(0x3B, 0x42, 0x52);
pub const NORD2: Color = Color::Rgb(0x43, 0x4C, 0x5E);
pub const NORD3: Color = Color::Rgb(0x4C, 0x56, 0x6A);
// Snow Storm
pub const NORD6: Color = Color::Rgb(0xEC, 0xEF, 0xF4);
// Frost
pub const NORD8: Color = Color::Rgb(0x88, 0xC0, 0xD0);
// Aurora
pub const NORD12: Color = Color::Rgb(0xD0, 0x87, 0x70);
pub const NORD13: Color = Color::Rgb(0xEB, 0xCB, 0x8B);
pub const NORD14: Color = Color::Rgb(0xA3, 0xBE, 0x8C);

pub const BG_MODAL_OVERLAY: Color = Color::Rgb(0x24, 0x29, 0x33);

/// Arctic, north-bluish palette.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: NORD0,
                surface: NORD1,
                surface_muted: NORD2,
                border: NORD3,

                text: NORD6,
                text_muted: NORD3,

                accent_primary: NORD12,
                accent_secondary: NORD13,

                success: NORD14,

                selection_bg: NORD2,
                selection_fg: NORD6,
                focus: NORD8,
                modal_bg: BG_MODAL_OVERLAY,
            },
        }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
