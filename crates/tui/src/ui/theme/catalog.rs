use super::{Ansi256Theme, DraculaTheme, NordTheme, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier used for persistence and `--theme`.
    pub id: &'static str,
    /// Human-friendly display name.
    pub label: &'static str,
    /// One-line description printed by `pinpad themes`.
    pub description: &'static str,
    /// Theme aliases (e.g., env overrides) that map back to this definition.
    pub aliases: &'static [&'static str],
    /// Whether the palette targets ANSI/8-bit terminals.
    pub is_ansi_fallback: bool,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

/// Ordered list of selectable themes. The first entry is the truecolor default.
pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        id: "dracula",
        label: "Dracula",
        description: "High-contrast default tuned for dark terminals.",
        aliases: &["dracula", "default"],
        is_ansi_fallback: false,
        factory: || Box::new(DraculaTheme::new()),
    },
    ThemeDefinition {
        id: "nord",
        label: "Nord",
        description: "Calm polar blues with aurora semantic accents.",
        aliases: &["nord"],
        is_ansi_fallback: false,
        factory: || Box::new(NordTheme::new()),
    },
    ThemeDefinition {
        id: "ansi256",
        label: "ANSI 256",
        description: "Indexed-color fallback for terminals without truecolor.",
        aliases: &["ansi256", "ansi", "256"],
        is_ansi_fallback: true,
        factory: || Box::new(Ansi256Theme::new()),
    },
];

/// Looks up a definition by id or alias, ignoring case.
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    THEME_DEFINITIONS.iter().find(|definition| {
        definition.id.eq_ignore_ascii_case(name) || definition.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    })
}

/// Preferred default for truecolor terminals.
pub fn default_truecolor() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[0]
}

/// Preferred default for ANSI-only terminals.
pub fn default_ansi() -> &'static ThemeDefinition {
    THEME_DEFINITIONS
        .iter()
        .find(|definition| definition.is_ansi_fallback)
        .unwrap_or(&THEME_DEFINITIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_accepts_ids_and_aliases() {
        assert_eq!(resolve("NORD").map(|d| d.id), Some("nord"));
        assert_eq!(resolve("default").map(|d| d.id), Some("dracula"));
        assert_eq!(resolve("256").map(|d| d.id), Some("ansi256"));
        assert!(resolve("solarized").is_none());
    }

    #[test]
    fn defaults_point_at_expected_palettes() {
        assert_eq!(default_truecolor().id, "dracula");
        assert!(default_ansi().is_ansi_fallback);
    }
}
