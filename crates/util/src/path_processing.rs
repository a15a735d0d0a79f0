use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform configuration directory.
pub const APP_DIR_NAME: &str = "pinpad";

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Root directory for Pinpad files (`~/.config/pinpad` on most platforms).
pub fn config_root() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_leaves_plain_paths_alone() {
        assert_eq!(expand_tilde(" /tmp/pinpad.json "), PathBuf::from("/tmp/pinpad.json"));
        assert_eq!(expand_tilde("relative/file"), PathBuf::from("relative/file"));
    }

    #[test]
    fn expand_tilde_uses_home_directory() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/prefs.json"), home.join("prefs.json"));
        }
    }

    #[test]
    fn config_root_ends_with_app_dir() {
        assert!(config_root().ends_with(APP_DIR_NAME));
    }
}
