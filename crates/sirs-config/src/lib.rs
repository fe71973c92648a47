//! Shared configuration for the sirs CLI and TUI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! persisted session tokens, and translation to `sirs_core::ClientConfig`.
//! Both binaries depend on this crate; the CLI layers `GlobalOpts`
//! overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sirs_core::{ClientConfig, Credentials, Session, TlsVerification};

const KEYRING_SERVICE: &str = "sirs";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, then `default_profile`.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Rows per page in list views.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            page_size: default_page_size(),
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
fn default_page_size() -> usize {
    sirs_core::query::DEFAULT_PAGE_SIZE
}

/// A named server profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://sirs.example.com").
    pub url: String,

    /// Login username.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override rows per page.
    pub page_size: Option<usize>,

    /// Token refresh endpoint relative to `/api/v1/`.
    pub refresh_path: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "sirs", "sirs").map_or_else(
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
    p.push("sirs");
    p
}

/// Directory for log files written by the TUI.
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "sirs", "sirs").map_or_else(
        || dirs_fallback().join("logs"),
        |dirs| dirs.data_local_dir().join("logs"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, layered defaults → TOML → `SIRS_*` env.
///
/// Nested keys use a double underscore: `SIRS_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SIRS_").split("__"));

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

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str, item: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{item}"),
    )?)
}

/// Resolve the login password without CLI flags.
///
/// Order: env var named by `password_env` → `SIRS_PASSWORD` → system
/// keyring → plaintext in config.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile-specific env var
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var("SIRS_PASSWORD") {
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name, "password") {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    profile.password.clone().map(SecretString::from)
}

/// Resolve username + password for a profile.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("SIRS_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let password =
        resolve_password(profile, profile_name).ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    Ok(Credentials { username, password })
}

/// Store a password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?.set_password(password.expose_secret())?;
    Ok(())
}

// ── Persisted sessions ──────────────────────────────────────────────
//
// Token pairs survive between CLI invocations in the keyring, so a
// `sirs login` is not needed for every command.

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    access: String,
    refresh: Option<String>,
    issued_at: DateTime<Utc>,
    lifetime_secs: i64,
    username: Option<String>,
    role: Option<String>,
}

/// Serialize a session for storage.
pub fn encode_session(session: &Session) -> String {
    let stored = StoredSession {
        access: session.access.expose_secret().to_owned(),
        refresh: session
            .refresh
            .as_ref()
            .map(|r| r.expose_secret().to_owned()),
        issued_at: session.issued_at,
        lifetime_secs: session.access_lifetime.num_seconds(),
        username: session.username.clone(),
        role: session.role.clone(),
    };
    serde_json::to_string(&stored).unwrap_or_default()
}

/// Restore a session from storage. Garbage yields `None`.
pub fn decode_session(raw: &str) -> Option<Session> {
    let stored: StoredSession = serde_json::from_str(raw).ok()?;
    let mut session = Session::new(
        SecretString::from(stored.access),
        stored.refresh.map(SecretString::from),
        stored.issued_at,
        TimeDelta::seconds(stored.lifetime_secs),
    );
    session.username = stored.username;
    session.role = stored.role;
    Some(session)
}

pub fn save_session(profile_name: &str, session: &Session) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "session")?.set_password(&encode_session(session))?;
    Ok(())
}

pub fn load_session(profile_name: &str) -> Option<Session> {
    let raw = keyring_entry(profile_name, "session")
        .ok()?
        .get_password()
        .ok()?;
    decode_session(&raw)
}

pub fn clear_session(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name, "session")?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── ClientConfig translation ────────────────────────────────────────

/// Build a `ClientConfig` from a profile, with no CLI flag overrides.
///
/// Missing credentials are not an error here: a persisted session may be
/// enough. Login fails later if neither is available.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ClientConfig::new(url);
    config.credentials = resolve_credentials(profile, profile_name).ok();
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_path.clone_from(&profile.refresh_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.page_size, 25);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_then_load_round_trips_profiles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.defaults.timeout = 12;
        config.profiles.insert(
            "staging".into(),
            Profile {
                url: "https://staging.example.com".into(),
                username: Some("admin".into()),
                insecure: Some(true),
                page_size: Some(50),
                ..Profile::default()
            },
        );
        save_config_to(&config, &path).expect("save");

        let loaded = load_config_from(&path).expect("load");
        let profile = loaded.profile("staging").expect("profile");
        assert_eq!(profile.url, "https://staging.example.com");
        assert_eq!(profile.page_size, Some(50));
        assert_eq!(loaded.defaults.timeout, 12);
        assert!(loaded.profile("prod").is_err());
    }

    #[test]
    fn profile_name_resolution() {
        let config = Config {
            default_profile: Some("shop".into()),
            ..Config::default()
        };
        assert_eq!(config.profile_name(None), "shop");
        assert_eq!(config.profile_name(Some("other")), "other");
    }

    #[test]
    fn session_encoding_round_trips() {
        let issued = "2026-05-01T12:00:00Z".parse().expect("timestamp");
        let mut session = Session::new(
            SecretString::from("acc".to_owned()),
            Some(SecretString::from("ref".to_owned())),
            issued,
            TimeDelta::minutes(60),
        );
        session.role = Some("admin".into());

        let restored = decode_session(&encode_session(&session)).expect("decode");
        assert_eq!(restored.access.expose_secret(), "acc");
        assert_eq!(restored.issued_at, issued);
        assert_eq!(restored.access_lifetime, TimeDelta::minutes(60));
        assert_eq!(restored.role.as_deref(), Some("admin"));
        assert!(decode_session("not json").is_none());
    }

    #[test]
    fn insecure_profile_skips_verification() {
        let profile = Profile {
            url: "https://shop.example.com".into(),
            insecure: Some(true),
            timeout: Some(5),
            ..Profile::default()
        };
        let config =
            profile_to_client_config(&profile, "t", &Defaults::default()).expect("config");
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let profile = Profile {
            url: "::nope".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&profile, "t", &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }
}
