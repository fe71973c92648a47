// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, bearer authentication from
// an injected `SessionContext`, one-shot refresh-and-retry on 401, and
// list-envelope normalisation. Endpoint groups (catalog, accounts,
// operations) are implemented as inherent methods in separate files so this
// module stays focused on transport mechanics.

use chrono::{TimeDelta, Utc};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::envelope::ListEnvelope;
use crate::error::Error;
use crate::models::{RefreshResponse, TokenPairResponse};
use crate::session::{Session, SessionContext, TokenStatus, default_access_lifetime};
use crate::transport::TransportConfig;

/// Path prefix every endpoint lives under.
pub const API_PREFIX: &str = "api/v1";

/// Token endpoints, relative to the API prefix.
pub const LOGIN_PATH: &str = "token/";
pub const DEFAULT_REFRESH_PATH: &str = "token/refresh/";

/// Upper bound on `next` links followed for one list, guarding against
/// servers that link a page to itself.
const MAX_PAGES: usize = 10_000;

/// Typed client for the backend REST API.
///
/// All list methods return the complete list: page envelopes are unwrapped
/// and `next` links followed before the caller sees the items.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
    refresh_path: String,
    access_lifetime: TimeDelta,
    page_size: Option<u32>,
    timeout_secs: u64,
    /// Serialises token refreshes: the backend rotates and blacklists
    /// refresh tokens, so each one may be spent only once.
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    /// Create a client from a server URL and transport settings.
    ///
    /// `server` may be the bare origin (`https://shop.example.com`) or
    /// already include the `/api/v1` prefix.
    pub fn new(
        server: &str,
        transport: &TransportConfig,
        session: SessionContext,
    ) -> Result<Self, Error> {
        let base_url = normalize_base_url(server)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            session,
            refresh_path: DEFAULT_REFRESH_PATH.to_owned(),
            access_lifetime: default_access_lifetime(),
            page_size: None,
            timeout_secs: transport.timeout.as_secs(),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        server: &str,
        session: SessionContext,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(server)?,
            session,
            refresh_path: DEFAULT_REFRESH_PATH.to_owned(),
            access_lifetime: default_access_lifetime(),
            page_size: None,
            timeout_secs: TransportConfig::default().timeout.as_secs(),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Override the token refresh endpoint (relative to the API prefix).
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Lifetime assumed for newly issued access tokens.
    #[must_use]
    pub fn with_access_lifetime(mut self, lifetime: TimeDelta) -> Self {
        self.access_lifetime = lifetime;
        self
    }

    /// Request this many items per page from paginated endpoints.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// The resolved API base URL (always ends in `/api/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Handle onto the session this client authenticates with.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Obtain a token pair with username/password and install it as the
    /// current session.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        let url = self.url(LOGIN_PATH)?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
            "platform": "web",
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", error_message(status, &raw)),
            });
        }

        let pair: TokenPairResponse = self.decode(resp).await?;
        let mut session = Session::new(
            SecretString::from(pair.access),
            Some(SecretString::from(pair.refresh)),
            Utc::now(),
            self.access_lifetime,
        );
        session.username = pair.username.or_else(|| Some(username.to_owned()));
        session.role = pair.role;

        self.session.set(session.clone());
        info!(username, "login successful");
        Ok(session)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// On success the session context is updated in place (including a
    /// rotated refresh token when the server issues one).
    pub async fn refresh(&self) -> Result<Session, Error> {
        let _guard = self.refresh_lock.lock().await;
        let current = self.session.current().ok_or(Error::NotLoggedIn)?;
        self.exchange_refresh(&current).await
    }

    /// Refresh on behalf of a request that was sent with `stale`.
    ///
    /// Requests racing on the same expired token share one refresh: a
    /// caller that finds the session already replaced reuses it.
    async fn refresh_after(&self, stale: &Session) -> Result<Session, Error> {
        let _guard = self.refresh_lock.lock().await;
        let current = self.session.current().ok_or(Error::SessionExpired)?;
        if !current.same_token(stale) {
            debug!("session already refreshed by a concurrent request");
            return Ok(current);
        }
        self.exchange_refresh(&current).await
    }

    /// POST the refresh token and install the resulting session. Callers
    /// hold `refresh_lock`.
    async fn exchange_refresh(&self, current: &Session) -> Result<Session, Error> {
        let Some(refresh) = current.refresh.as_ref() else {
            return Err(Error::SessionExpired);
        };

        let url = self.url(&self.refresh_path)?;
        debug!("refreshing access token at {}", url);

        let resp = self
            .http
            .post(url)
            .json(&json!({ "refresh": refresh.expose_secret() }))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!(
                    "token refresh failed (HTTP {status}): {}",
                    error_message(status, &raw)
                ),
            });
        }

        let tokens: RefreshResponse = self.decode(resp).await?;
        let next = current.refreshed(
            SecretString::from(tokens.access),
            tokens.refresh.map(SecretString::from),
            Utc::now(),
        );
        self.session.set(next.clone());
        info!("access token refreshed");
        Ok(next)
    }

    /// Drop the local session. The backend keeps no server-side session
    /// for bearer tokens, so there is nothing to call.
    pub fn logout(&self) {
        self.session.clear();
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint path (e.g. `products/12/`) against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a list endpoint and return every item across all pages.
    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let mut url = self.url(path)?;
        {
            let mut pairs: Vec<(&str, String)> = params.to_vec();
            if let Some(size) = self.page_size {
                pairs.push(("page_size", size.to_string()));
            }
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let mut items = Vec::new();
        for _ in 0..MAX_PAGES {
            let page: ListEnvelope<T> = self.get_url(url.clone()).await?;
            let next = page
                .next_page()
                .map(|link| self.base_url.join(link))
                .transpose()?;
            items.extend(page.into_items());

            match next {
                Some(next) if next != url => url = next,
                _ => return Ok(items),
            }
        }

        warn!(path, "pagination did not terminate; returning items fetched so far");
        Ok(items)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_url(self.url(path)?).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.send(Method::GET, url, None::<&()>).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let resp = self.send(Method::POST, self.url(path)?, Some(body)).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let resp = self.send(Method::PATCH, self.url(path)?, Some(body)).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let resp = self.send(Method::DELETE, self.url(path)?, None::<&()>).await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    /// Send an authenticated request.
    ///
    /// Refreshes ahead of time when the access token is near expiry. A 401
    /// triggers exactly one refresh followed by one retry; if the refresh
    /// fails, or the retry is rejected again, the session is cleared and
    /// `SessionExpired` is returned.
    async fn send<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let session = self.fresh_session().await?;
        let resp = self.dispatch(&method, &url, body, &session).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        debug!("access token rejected, refreshing");
        let session = match self.refresh_after(&session).await {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "token refresh failed; clearing session");
                self.session.clear_if_current(&session);
                return Err(Error::SessionExpired);
            }
        };

        let resp = self.dispatch(&method, &url, body, &session).await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            warn!("request rejected after refresh; clearing session");
            self.session.clear_if_current(&session);
            return Err(Error::SessionExpired);
        }
        Ok(resp)
    }

    /// Current session, proactively refreshed when its access token is
    /// expiring. A failed proactive refresh is tolerated while the token is
    /// still valid.
    async fn fresh_session(&self) -> Result<Session, Error> {
        let session = self.session.current().ok_or(Error::NotLoggedIn)?;
        let status = session.status(Utc::now());
        if !status.needs_refresh() || !session.can_refresh() {
            return Ok(session);
        }

        match self.refresh_after(&session).await {
            Ok(next) => Ok(next),
            Err(e) if e.is_transient() => Err(e),
            Err(e) => {
                if status == TokenStatus::Expired {
                    warn!(error = %e, "expired session could not be refreshed");
                    self.session.clear_if_current(&session);
                    Err(Error::SessionExpired)
                } else {
                    debug!(error = %e, "early refresh failed, using current token");
                    Ok(session)
                }
            }
        }
    }

    async fn dispatch<B>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&B>,
        session: &Session,
    ) -> Result<reqwest::Response, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!("{} {}", method, url);

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(reqwest::header::AUTHORIZATION, session.bearer());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.send().await.map_err(|e| self.transport_error(e))
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            self.decode(resp).await
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(e)
        }
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    if status == StatusCode::NOT_FOUND {
        return Error::NotFound {
            path: resp.url().path().to_owned(),
        };
    }
    let raw = resp.text().await.unwrap_or_default();
    Error::Api {
        status: status.as_u16(),
        message: error_message(status, &raw),
    }
}

/// Pull a human-readable message out of an error body.
///
/// Handles `{"detail": ...}`, `{"error": ...}` and field-error maps
/// (`{"price": ["A valid number is required."]}`), falling back to the raw
/// body or the status text.
fn error_message(status: StatusCode, raw: &str) -> String {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        return if raw.trim().is_empty() {
            status.to_string()
        } else {
            raw.chars().take(200).collect()
        };
    };

    for key in ["detail", "error", "message"] {
        if let Some(Value::String(msg)) = map.get(key) {
            return msg.clone();
        }
    }

    let fields: Vec<String> = map
        .iter()
        .map(|(field, value)| match value {
            Value::Array(msgs) => {
                let joined: Vec<String> = msgs
                    .iter()
                    .map(|m| m.as_str().map_or_else(|| m.to_string(), str::to_owned))
                    .collect();
                format!("{field}: {}", joined.join(" "))
            }
            Value::String(msg) => format!("{field}: {msg}"),
            other => format!("{field}: {other}"),
        })
        .collect();

    if fields.is_empty() {
        status.to_string()
    } else {
        fields.join("; ")
    }
}

/// Normalise a user-supplied server URL to the API base (`.../api/v1/`).
pub fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let trimmed = raw.trim().trim_end_matches('/');
    let full = if trimmed.ends_with(API_PREFIX) {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/{API_PREFIX}/")
    };
    Ok(Url::parse(&full)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_prefix() {
        let url = normalize_base_url("https://shop.example.com").expect("url");
        assert_eq!(url.as_str(), "https://shop.example.com/api/v1/");
        assert_eq!(
            url.join("products/3/").expect("join").as_str(),
            "https://shop.example.com/api/v1/products/3/"
        );
    }

    #[test]
    fn base_url_keeps_existing_prefix() {
        let url = normalize_base_url("http://10.0.0.5:8000/api/v1/").expect("url");
        assert_eq!(url.as_str(), "http://10.0.0.5:8000/api/v1/");
    }

    #[test]
    fn base_url_rejects_garbage() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn error_message_prefers_detail() {
        let msg = error_message(
            StatusCode::FORBIDDEN,
            r#"{"detail": "You do not have permission to perform this action."}"#,
        );
        assert_eq!(msg, "You do not have permission to perform this action.");
    }

    #[test]
    fn error_message_flattens_field_errors() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"price": ["A valid number is required."]}"#,
        );
        assert_eq!(msg, "price: A valid number is required.");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, ""),
            StatusCode::BAD_GATEWAY.to_string()
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
    }
}
