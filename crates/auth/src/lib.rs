#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Per-request credentials for both protocol generations
//!
//! V1 services take a Basic header built once from the user id and password.
//! V2 services take a Bearer token that must be exchanged for an API key and
//! refreshed before it expires.

mod session;
mod token;

pub use session::{AuthSession, Expiry};
pub use token::{system_clock, Clock, TokenRefresher};

use base64::{engine::general_purpose, Engine as _};
use streamsx_errors::Error;
use streamsx_net::NetClient;
use streamsx_types::ProtocolConfig;

/// Produces the `Authorization` header value for a service
pub enum Authenticator {
    Static(AuthSession),
    Refreshing(TokenRefresher),
}

impl Authenticator {
    /// Basic credentials that never change
    #[must_use]
    pub fn basic(userid: &str, password: &str) -> Self {
        let encoded = general_purpose::STANDARD.encode(format!("{userid}:{password}"));
        Self::Static(AuthSession::permanent(format!("Basic {encoded}")))
    }

    /// Pick the scheme the protocol generation implies
    #[must_use]
    pub fn for_config(config: &ProtocolConfig, net: NetClient) -> Self {
        match config {
            ProtocolConfig::V1(v1) => Self::basic(&v1.userid, &v1.password),
            ProtocolConfig::V2(v2) => Self::Refreshing(TokenRefresher::new(
                v2.iam_url.clone(),
                v2.api_key.clone(),
                net,
            )),
        }
    }

    /// Value for the `Authorization` header of the next request
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` when a refreshing authenticator cannot obtain a
    /// token. Static credentials never fail.
    pub async fn current_authorization_header(&self) -> Result<String, Error> {
        match self {
            Self::Static(session) => Ok(session.header_value.clone()),
            Self::Refreshing(refresher) => refresher.authorization_header().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamsx_types::V1Config;

    #[tokio::test]
    async fn test_basic_header() {
        let auth = Authenticator::basic("user", "secret");
        assert_eq!(
            auth.current_authorization_header().await.unwrap(),
            "Basic dXNlcjpzZWNyZXQ="
        );
    }

    #[tokio::test]
    async fn test_v1_config_selects_static() {
        let config = ProtocolConfig::V1(V1Config {
            userid: "u".into(),
            password: "p".into(),
            rest_url: None,
            status_path: None,
            jobs_path: None,
        });
        let auth = Authenticator::for_config(&config, NetClient::with_defaults().unwrap());
        assert!(matches!(auth, Authenticator::Static(_)));
        assert_eq!(
            auth.current_authorization_header().await.unwrap(),
            "Basic dTpw"
        );
    }
}
