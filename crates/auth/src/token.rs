//! Bearer tokens exchanged for an API key
//!
//! The session lock is held across the token request. Callers that find the
//! token expired queue behind that one refresh.

use serde_json::Value;
use streamsx_errors::{AuthError, Error};
use streamsx_net::NetClient;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::session::AuthSession;

const GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
const ACCESS_TOKEN: &str = "access_token";
const EXPIRATION: &str = "expiration";
const MS: i64 = 1000;
/// Tokens are treated as expired this long before the server says they are
const EXPIRY_PAD_MS: i64 = 300 * MS;

/// Source of the current time in epoch milliseconds
pub type Clock = fn() -> i64;

/// Wall-clock time in epoch milliseconds
#[must_use]
pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Refreshing bearer-token credentials
pub struct TokenRefresher {
    token_url: Option<String>,
    api_key: Option<String>,
    net: NetClient,
    session: Mutex<Option<AuthSession>>,
    clock: Clock,
}

impl TokenRefresher {
    #[must_use]
    pub fn new(token_url: Option<String>, api_key: Option<String>, net: NetClient) -> Self {
        Self {
            token_url,
            api_key,
            net,
            session: Mutex::new(None),
            clock: system_clock,
        }
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current `Bearer` header, refreshing first if the session has expired
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if the token URL or API key is missing, or the
    /// token request fails. A failed refresh leaves the previous session in
    /// place.
    pub async fn authorization_header(&self) -> Result<String, Error> {
        let mut session = self.session.lock().await;
        let now = (self.clock)();

        if let Some(current) = session.as_ref() {
            if !current.is_expired(now) {
                return Ok(current.header_value.clone());
            }
            debug!(now, expires_at = ?current.expires_at, "bearer token expired");
        }

        let fresh = self.request_token().await?;
        let header = fresh.header_value.clone();
        *session = Some(fresh);
        Ok(header)
    }

    /// Snapshot of the cached session
    pub async fn session(&self) -> Option<AuthSession> {
        self.session.lock().await.clone()
    }

    async fn request_token(&self) -> Result<AuthSession, Error> {
        let url = self
            .token_url
            .as_deref()
            .ok_or_else(|| AuthError::MissingCredential {
                field: "iam_url".to_string(),
            })?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AuthError::MissingCredential {
                field: "apikey".to_string(),
            })?;

        let response = self
            .net
            .post_form(url, &[("grant_type", GRANT_TYPE), ("apikey", api_key)])
            .await
            .map_err(|e| {
                warn!(url, error = %e, "token refresh failed");
                AuthError::RefreshFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            })?;

        let malformed = |field: &str| AuthError::MalformedToken {
            url: url.to_string(),
            field: field.to_string(),
        };
        let token = response
            .get(ACCESS_TOKEN)
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(ACCESS_TOKEN))?;
        let expires_at = response
            .get(EXPIRATION)
            .and_then(Value::as_i64)
            .and_then(|secs| secs.checked_mul(MS))
            .and_then(|ms| ms.checked_sub(EXPIRY_PAD_MS))
            .ok_or_else(|| malformed(EXPIRATION))?;

        info!(url, expires_at, "refreshed bearer token");
        Ok(AuthSession::expiring(format!("Bearer {token}"), expires_at))
    }
}
