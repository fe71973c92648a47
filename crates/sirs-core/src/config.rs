// ── Runtime connection configuration ──
//
// Describes how to reach the backend and who to log in as. Never touches
// disk: the CLI/TUI builds a `ClientConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use sirs_api::transport::{TlsMode, TransportConfig};

/// Username/password used to obtain a token pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging servers).
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL, with or without the `/api/v1` suffix.
    pub url: Url,
    /// Credentials for login; `None` when only a restored session is used.
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// `page_size` requested from paginated list endpoints.
    pub fetch_page_size: Option<u32>,
    /// Token refresh endpoint, relative to the API prefix.
    pub refresh_path: Option<String>,
    /// Access-token lifetime assumed for freshly issued tokens.
    pub access_lifetime_mins: i64,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            fetch_page_size: Some(100),
            refresh_path: None,
            access_lifetime_mins: sirs_api::session::DEFAULT_ACCESS_LIFETIME_MINS,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
