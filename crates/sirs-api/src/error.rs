use thiserror::Error;

/// Top-level error type for the `sirs-api` crate.
///
/// Covers every failure mode of the REST surface: authentication, token
/// refresh, transport, HTTP status errors, and payload decoding.
/// `sirs-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, wrong platform for the role, ...).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// No session is attached to the client.
    #[error("Not logged in -- obtain a session first")]
    NotLoggedIn,

    /// The access token was rejected and refreshing it failed.
    /// The session has been cleared (forced logout).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success HTTP status with the server's `detail` message if any.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The requested resource does not exist.
    #[error("Not found: {path}")]
    NotFound { path: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the user has to log in again.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::SessionExpired | Self::NotLoggedIn
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::NotFound { .. } => true,
            _ => false,
        }
    }

    /// HTTP status associated with this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::SessionExpired => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
