// Session context for bearer-token authentication.
//
// The backend issues a short-lived access token and a longer-lived refresh
// token. Expiry is computed from the issue time and the configured access
// lifetime, so freshness is a pure function of (session, clock). The shared
// `SessionContext` handle is injected into the API client; nothing reads
// tokens from ambient storage.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Access tokens this close to expiry (seconds) are refreshed before use.
pub const REFRESH_SKEW_SECS: i64 = 60;

/// Default access-token lifetime issued by the backend, in minutes.
pub const DEFAULT_ACCESS_LIFETIME_MINS: i64 = 60;

pub fn default_access_lifetime() -> TimeDelta {
    TimeDelta::minutes(DEFAULT_ACCESS_LIFETIME_MINS)
}

/// Freshness of an access token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Usable as-is.
    Fresh,
    /// Still valid but inside the refresh skew window.
    Expiring,
    /// Past its expiry instant.
    Expired,
}

impl TokenStatus {
    /// Whether a refresh should be attempted before the next request.
    pub fn needs_refresh(self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

/// An authenticated session: access + refresh token pair.
#[derive(Debug, Clone)]
pub struct Session {
    pub access: SecretString,
    pub refresh: Option<SecretString>,
    pub issued_at: DateTime<Utc>,
    pub access_lifetime: TimeDelta,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl Session {
    /// A session whose access token was issued at `issued_at`.
    pub fn new(
        access: SecretString,
        refresh: Option<SecretString>,
        issued_at: DateTime<Utc>,
        access_lifetime: TimeDelta,
    ) -> Self {
        Self {
            access,
            refresh,
            issued_at,
            access_lifetime,
            username: None,
            role: None,
        }
    }

    /// Instant after which the access token is rejected.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + self.access_lifetime
    }

    /// Classify the access token against `now`.
    pub fn status(&self, now: DateTime<Utc>) -> TokenStatus {
        let expires_at = self.expires_at();
        if now >= expires_at {
            TokenStatus::Expired
        } else if now + TimeDelta::seconds(REFRESH_SKEW_SECS) >= expires_at {
            TokenStatus::Expiring
        } else {
            TokenStatus::Fresh
        }
    }

    /// Whether a refresh token is available.
    pub fn can_refresh(&self) -> bool {
        self.refresh.is_some()
    }

    /// Produce the session that results from a successful refresh.
    ///
    /// With refresh-token rotation the backend returns a new refresh token;
    /// otherwise the previous one stays valid.
    pub fn refreshed(
        &self,
        access: SecretString,
        rotated_refresh: Option<SecretString>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access,
            refresh: rotated_refresh.or_else(|| self.refresh.clone()),
            issued_at: now,
            access_lifetime: self.access_lifetime,
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }

    /// Whether `other` carries the same access token as `self`.
    pub fn same_token(&self, other: &Session) -> bool {
        self.issued_at == other.issued_at
            && self.access.expose_secret() == other.access.expose_secret()
    }

    /// `Authorization` header value for this session.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access.expose_secret())
    }
}

/// Shared, injectable session handle.
///
/// Cloning yields another handle onto the same session, so the caller can
/// keep one to persist rotated tokens after the client refreshed them.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context pre-populated with a restored session.
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.inner.read().expect("session lock poisoned").clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.read().expect("session lock poisoned").is_some()
    }

    pub fn set(&self, session: Session) {
        debug!("session updated");
        *self.inner.write().expect("session lock poisoned") = Some(session);
    }

    /// Drop the session (logout, or forced logout after a failed refresh).
    pub fn clear(&self) {
        debug!("session cleared");
        *self.inner.write().expect("session lock poisoned") = None;
    }

    /// Drop the session only if it is still `stale`. A session installed
    /// since then (a concurrent refresh or login) is kept. Returns whether
    /// anything was cleared.
    pub fn clear_if_current(&self, stale: &Session) -> bool {
        let mut guard = self.inner.write().expect("session lock poisoned");
        if guard.as_ref().is_some_and(|current| current.same_token(stale)) {
            debug!("session cleared");
            *guard = None;
            true
        } else {
            false
        }
    }
}
