// ── Core error types ──
//
// User-facing errors from sirs-core. Consumers never see reqwest errors or
// JSON parse failures directly; the `From<sirs_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotLoggedIn,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Request rejected by server: {message}")]
    Rejected { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::SessionExpired | Self::NotLoggedIn
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sirs_api::Error> for CoreError {
    fn from(err: sirs_api::Error) -> Self {
        match err {
            sirs_api::Error::Authentication { message } => Self::AuthenticationFailed { message },
            sirs_api::Error::NotLoggedIn => Self::NotLoggedIn,
            sirs_api::Error::SessionExpired => Self::SessionExpired,
            sirs_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sirs_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            sirs_api::Error::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            sirs_api::Error::Tls(msg) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            sirs_api::Error::NotFound { path } => Self::NotFound {
                entity_type: "Resource".into(),
                identifier: path,
            },
            sirs_api::Error::Api { status, message } if (400..500).contains(&status) => {
                Self::Rejected { message }
            }
            sirs_api::Error::Api { status, message } => Self::Api {
                message,
                status: Some(status),
            },
            sirs_api::Error::Deserialization { message, body: _ } => {
                Self::Internal(format!("Unexpected response: {message}"))
            }
        }
    }
}
