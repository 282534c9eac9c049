//! Shared configuration for the lineup CLI and TUI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), operator
//! display preferences, and translation to `lineup_core::ServerConfig`.
//! The CLI layers its global flags on top of this.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lineup_core::{DisplayOptions, ServerConfig, SessionConfig, TlsVerification};

/// Keyring service name; entries are keyed `<profile>/token`.
pub const KEYRING_SERVICE: &str = "lineup";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Operator display toggles, saved back by the TUI.
    #[serde(default)]
    pub display: DisplayPrefs,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
            display: DisplayPrefs::default(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, else the default.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background re-fetch interval for the TUI (seconds, 0 = off).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    10
}

/// A named server profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://lineup.example.com/api").
    pub server: String,

    /// Access token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the access token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Line the TUI opens on start.
    pub default_line: Option<i64>,
}

/// Toggles the operator flips while working a line.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DisplayPrefs {
    #[serde(default)]
    pub hide_entered: bool,

    #[serde(default = "default_true")]
    pub show_sequence_numbers: bool,

    #[serde(default)]
    pub reorder_enabled: bool,

    /// Pointer travel (in drag units) before a press becomes a drag.
    #[serde(default = "default_activation_distance")]
    pub drag_activation_distance: f64,
}

impl Default for DisplayPrefs {
    fn default() -> Self {
        Self {
            hide_entered: false,
            show_sequence_numbers: true,
            reorder_enabled: false,
            drag_activation_distance: default_activation_distance(),
        }
    }
}

impl DisplayPrefs {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            hide_entered: self.hide_entered,
            show_sequence_numbers: self.show_sequence_numbers,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_activation_distance() -> f64 {
    lineup_core::drag::DEFAULT_ACTIVATION_DISTANCE
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "lineup", "lineup").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("lineup");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + `LINEUP_*` environment (`__` separates nesting,
/// e.g. `LINEUP_DEFAULTS__TIMEOUT=5`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LINEUP_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Resolve the access token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

// ── Translation to core types ───────────────────────────────────────

/// Parse and validate a profile's server URL.
pub fn server_url(profile: &Profile) -> Result<url::Url, ConfigError> {
    profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })
}

/// TLS strategy from a profile, with the global `insecure` default.
pub fn tls_for(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `ServerConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_server_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ServerConfig, ConfigError> {
    Ok(ServerConfig {
        url: server_url(profile)?,
        token: resolve_token(profile, profile_name)?,
        tls: tls_for(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}

/// Session behaviour for interactive consumers.
pub fn session_config(cfg: &Config) -> SessionConfig {
    SessionConfig {
        poll_interval: Duration::from_secs(cfg.defaults.poll_interval_secs),
        display: cfg.display.display_options(),
        reorder_enabled: cfg.display.reorder_enabled,
        drag_activation_distance: cfg.display.drag_activation_distance,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.poll_interval_secs, 10);
        assert!(cfg.display.show_sequence_numbers);
        assert!(!cfg.display.reorder_enabled);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "shop".into(),
            Profile {
                server: "https://lineup.example.com/api".into(),
                token_env: Some("SHOP_TOKEN".into()),
                default_line: Some(7),
                ..Profile::default()
            },
        );
        cfg.display.hide_entered = true;
        cfg.display.reorder_enabled = true;
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let shop = loaded.profile("shop").unwrap();
        assert_eq!(shop.server, "https://lineup.example.com/api");
        assert_eq!(shop.default_line, Some(7));
        assert!(loaded.display.hide_entered);
        assert!(loaded.display.reorder_enabled);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[display]\nhide_entered = true\n\n[profiles.default]\nserver = \"http://localhost:8080\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert!(cfg.display.hide_entered);
        assert!(cfg.display.show_sequence_numbers);
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.profile_name(None), "default");
    }

    #[test]
    fn plaintext_token_is_the_last_resort() {
        let profile = Profile {
            server: "http://localhost:8080".into(),
            token: Some("plain-token".into()),
            ..Profile::default()
        };
        // A profile name nobody has stored in a keyring.
        let token = resolve_token(&profile, "lineup-test-unlikely-profile").unwrap();
        assert_eq!(token.expose_secret(), "plain-token");
    }

    #[test]
    fn missing_token_is_an_error() {
        let profile = Profile {
            server: "http://localhost:8080".into(),
            ..Profile::default()
        };
        let result = resolve_token(&profile, "lineup-test-unlikely-profile");
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }

    #[test]
    fn tls_prefers_insecure_then_custom_ca() {
        let defaults = Defaults::default();
        let mut profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/lineup/ca.pem")),
            ..Profile::default()
        };
        assert_eq!(
            tls_for(&profile, &defaults),
            TlsVerification::CustomCa(PathBuf::from("/etc/lineup/ca.pem"))
        );
        profile.insecure = Some(true);
        assert_eq!(tls_for(&profile, &defaults), TlsVerification::DangerAcceptInvalid);
        profile.ca_cert = None;
        profile.insecure = None;
        assert_eq!(tls_for(&profile, &defaults), TlsVerification::SystemDefaults);
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let profile = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            server_url(&profile),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn session_config_follows_display_prefs() {
        let mut cfg = Config::default();
        cfg.defaults.poll_interval_secs = 0;
        cfg.display.reorder_enabled = true;
        let session = session_config(&cfg);
        assert!(session.poll_interval.is_zero());
        assert!(session.reorder_enabled);
        assert!(session.display.show_sequence_numbers);
    }
}
