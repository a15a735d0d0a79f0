use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pinpad_tui::{ResetSettings, THEME_DEFINITIONS, TuiConfig};
use pinpad_types::ResetPolicy;
use pinpad_util::{PreferencesPayload, UserPreferences, config_root, expand_tilde};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log file location.
const LOG_PATH_ENV: &str = "PINPAD_LOG_PATH";
const LOG_FILE_NAME: &str = "pinpad.log";

/// Set a 4-digit PIN from the terminal.
#[derive(Debug, Parser)]
#[command(name = "pinpad", version, about)]
struct Cli {
    /// Theme id or alias (see `pinpad themes`)
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Milliseconds between a successful submit and the automatic reset
    #[arg(long, global = true, value_name = "MS")]
    reset_delay_ms: Option<u64>,

    /// What editing during the reset delay does: cancel-on-edit or clobber
    #[arg(long, global = true, value_name = "POLICY")]
    reset_policy: Option<ResetPolicy>,

    /// Show entered digits as bullets
    #[arg(long, global = true)]
    mask_digits: bool,

    /// Write logs to this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available themes
    Themes,
    /// Print the effective configuration as JSON
    Config {
        /// Store the given flags as the defaults for later runs
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = resolve_log_path(cli.log_file.as_deref());

    let preferences = UserPreferences::new().unwrap_or_else(|error| {
        eprintln!("pinpad: preferences unavailable ({error}); using defaults");
        UserPreferences::ephemeral()
    });
    let effective = apply_overrides(preferences.snapshot(), &cli);

    match cli.command {
        Some(Command::Themes) => {
            print_themes();
            Ok(())
        }
        Some(Command::Config { save }) => {
            if save {
                preferences
                    .save(effective.clone())
                    .with_context(|| format!("failed to save preferences to {}", preferences.path().display()))?;
            }
            let out = serde_json::json!({
                "preferences_path": preferences.path(),
                "log_path": log_path,
                "preferred_theme": effective.preferred_theme,
                "reset_delay_ms": effective.reset_delay_ms,
                "reset_policy": effective.reset_policy,
                "mask_digits": effective.mask_digits,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        // No subcommand => TUI
        None => {
            init_tracing(&log_path);
            info!(
                reset_delay_ms = effective.reset_delay_ms,
                reset_policy = %effective.reset_policy,
                mask_digits = effective.mask_digits,
                "Starting pinpad"
            );
            pinpad_tui::run(tui_config(&effective)).await.context("PIN entry screen failed")
        }
    }
}

/// Routes tracing output to `path`. The TUI owns the terminal, so logging is
/// disabled when the file cannot be opened.
fn init_tracing(path: &Path) {
    let file = path
        .parent()
        .map_or(Ok(()), create_dir_all)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(path));
    let file = match file {
        Ok(file) => file,
        Err(error) => {
            eprintln!("pinpad: logging disabled, cannot open {}: {error}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// `--log-file`, then `PINPAD_LOG_PATH`, then `<config_dir>/pinpad/pinpad.log`.
fn resolve_log_path(flag: Option<&str>) -> PathBuf {
    if let Some(path) = flag.map(str::trim).filter(|path| !path.is_empty()) {
        return expand_tilde(path);
    }
    match std::env::var(LOG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => expand_tilde(&path),
        _ => config_root().join(LOG_FILE_NAME),
    }
}

/// Flags win over stored preferences for this run only.
fn apply_overrides(mut payload: PreferencesPayload, cli: &Cli) -> PreferencesPayload {
    if let Some(theme) = cli.theme.as_ref() {
        payload.preferred_theme = Some(theme.clone());
    }
    if let Some(delay_ms) = cli.reset_delay_ms {
        payload.reset_delay_ms = delay_ms;
    }
    if let Some(policy) = cli.reset_policy {
        payload.reset_policy = policy;
    }
    if cli.mask_digits {
        payload.mask_digits = true;
    }
    payload
}

fn tui_config(payload: &PreferencesPayload) -> TuiConfig {
    TuiConfig {
        theme: payload.preferred_theme.clone(),
        reset: ResetSettings {
            delay: payload.reset_delay(),
            policy: payload.reset_policy,
        },
        mask_digits: payload.mask_digits,
    }
}

fn print_themes() {
    for definition in THEME_DEFINITIONS {
        let aliases = if definition.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", definition.aliases.join(", "))
        };
        println!("{:<10} {:<14} {}{}", definition.id, definition.label, definition.description, aliases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn flags_override_stored_preferences() {
        let cli = Cli::try_parse_from([
            "pinpad",
            "--theme",
            "nord",
            "--reset-delay-ms",
            "250",
            "--reset-policy",
            "clobber",
            "--mask-digits",
        ])
        .unwrap();
        let stored = PreferencesPayload {
            preferred_theme: Some("dracula".into()),
            ..PreferencesPayload::default()
        };

        let effective = apply_overrides(stored, &cli);
        assert_eq!(effective.preferred_theme.as_deref(), Some("nord"));
        assert_eq!(effective.reset_delay_ms, 250);
        assert_eq!(effective.reset_policy, ResetPolicy::Clobber);
        assert!(effective.mask_digits);

        let config = tui_config(&effective);
        assert_eq!(config.reset.delay, Duration::from_millis(250));
        assert_eq!(config.reset.policy, ResetPolicy::Clobber);
    }

    #[test]
    fn missing_flags_keep_stored_preferences() {
        let cli = Cli::try_parse_from(["pinpad", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Config { save: false })));
        let stored = PreferencesPayload {
            reset_delay_ms: 900,
            mask_digits: true,
            ..PreferencesPayload::default()
        };
        assert_eq!(apply_overrides(stored.clone(), &cli), stored);
        assert_eq!(tui_config(&PreferencesPayload::default()), TuiConfig::default());
    }

    #[test]
    fn saved_flags_become_the_next_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let cli = Cli::try_parse_from(["pinpad", "--reset-delay-ms", "800", "--mask-digits", "config", "--save"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Config { save: true })));

        let preferences = UserPreferences::with_path(path.clone()).unwrap();
        preferences.save(apply_overrides(preferences.snapshot(), &cli)).unwrap();

        let reloaded = UserPreferences::with_path(path).unwrap().snapshot();
        assert_eq!(reloaded.reset_delay_ms, 800);
        assert!(reloaded.mask_digits);
        assert_eq!(tui_config(&reloaded).reset.delay, Duration::from_millis(800));
    }

    #[test]
    fn unknown_reset_policy_is_rejected() {
        assert!(Cli::try_parse_from(["pinpad", "--reset-policy", "sometimes"]).is_err());
    }

    #[test]
    fn log_path_prefers_flag_then_environment() {
        temp_env::with_var(LOG_PATH_ENV, Some("/tmp/from-env.log"), || {
            assert_eq!(resolve_log_path(Some("/tmp/flag.log")), PathBuf::from("/tmp/flag.log"));
            assert_eq!(resolve_log_path(None), PathBuf::from("/tmp/from-env.log"));
        });
        temp_env::with_var_unset(LOG_PATH_ENV, || {
            assert_eq!(resolve_log_path(None), config_root().join(LOG_FILE_NAME));
        });
    }
}
