//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sirs_config::ConfigError;
use sirs_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(sirs::connection_failed),
        help(
            "Check that the server is running and reachable: {reason}\n\
             Self-signed staging server? Try: --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sirs::auth_failed),
        help(
            "Verify your username and password.\n\
             Run: sirs config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(
        code(sirs::not_logged_in),
        help("Run: sirs login\nOr configure a password with: sirs config set-password")
    )]
    NotLoggedIn,

    #[error("Session expired")]
    #[diagnostic(code(sirs::session_expired), help("Run: sirs login"))]
    SessionExpired,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(sirs::no_credentials),
        help(
            "Configure credentials with: sirs config init\n\
             Or set SIRS_USERNAME and SIRS_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sirs::not_found),
        help("Run: sirs {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Request rejected: {message}")]
    #[diagnostic(code(sirs::rejected))]
    Rejected { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(sirs::api_error))]
    ApiError { status: String, message: String },

    #[error("{failed} of {total} deletions failed")]
    #[diagnostic(code(sirs::partial_failure))]
    PartialFailure { failed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sirs::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sirs::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sirs config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(sirs::no_config),
        help(
            "Create one with: sirs config init\n\
             Or pass --url. Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(sirs::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sirs::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(sirs::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::NotLoggedIn
            | Self::SessionExpired
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::SessionExpired => Self::SessionExpired,
            CoreError::NotLoggedIn => Self::NotLoggedIn,
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: format!("{}s list", entity_type.to_lowercase()),
                resource_type: entity_type,
                identifier,
            },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::Api { message, status } => Self::ApiError {
                status: status.map_or_else(|| "-".into(), |s| s.to_string()),
                message,
            },
            CoreError::Config { message } | CoreError::Internal(message) => {
                Self::Config { message }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(see: sirs config show)".into(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
