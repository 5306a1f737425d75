//! Identity proxy calls used by the session gate: one-time token exchange and
//! companion-app pairing.

use super::types::{AccessToken, PairingCode, TokenCheck, TokenState};
use crate::api::{encode_segment, ApiClient, ApiError};
use std::fmt;
use tracing::instrument;

/// Which one-time token the gate was opened with.
#[derive(Clone, PartialEq, Eq)]
pub enum ExchangeToken {
    /// Token from a sign-in email.
    EmailSignIn(String),
    /// Token from an email-address confirmation link.
    EmailConfirmation(String),
}

impl ExchangeToken {
    fn path(&self) -> String {
        match self {
            Self::EmailSignIn(token) => {
                format!("/identity/proxy/email/exchange/{}", encode_segment(token))
            }
            Self::EmailConfirmation(token) => {
                format!(
                    "/identity/proxy/confirmation/exchange/{}",
                    encode_segment(token)
                )
            }
        }
    }
}

impl fmt::Debug for ExchangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailSignIn(_) => f.write_str("EmailSignIn(<redacted>)"),
            Self::EmailConfirmation(_) => f.write_str("EmailConfirmation(<redacted>)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct IdentityProxyClient {
    api: ApiClient,
}

impl IdentityProxyClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchanges a one-time email token for a session token.
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the token is unknown, used, or the call fails.
    #[instrument(skip(self))]
    pub async fn exchange(&self, token: &ExchangeToken) -> Result<AccessToken, ApiError> {
        self.api.get_json(&token.path()).await
    }

    /// Issues a short pairing code for a companion device.
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the call fails.
    #[instrument(skip(self))]
    pub async fn request_pairing_code(&self) -> Result<PairingCode, ApiError> {
        self.api.post_empty_json("/identity/proxy/code").await
    }

    /// Reports whether a pending access token has been authorized.
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the call fails.
    #[instrument(skip_all)]
    pub async fn check_token(&self, access_token: &str) -> Result<TokenState, ApiError> {
        self.api
            .get_json_with_query::<TokenCheck>(
                "/identity/proxy/check-token",
                &[("access_token", access_token)],
            )
            .await
            .map(|check| check.message)
    }
}
