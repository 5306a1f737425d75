use crate::{
    api::{ApiClient, ApiConfig},
    cli::commands::api::Options,
    identity::{Identity2FAClient, IdentityProxyClient},
    session::{SessionContext, SessionStore},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

/// Connection settings shared by every subcommand.
#[derive(Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub client_type: String,
    pub client_key: Option<SecretString>,
    pub session_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            api_url: options.api_url,
            client_type: options.client_type,
            client_key: options.client_key.map(SecretString::from),
            session_file: options.session_file,
        }
    }

    /// Loads the persisted session.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be read.
    pub fn session(&self) -> Result<SessionContext> {
        SessionContext::init(SessionStore::new(&self.session_file)).with_context(|| {
            format!("failed to load session from {}", self.session_file.display())
        })
    }

    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn api_client(&self, session: SessionContext) -> Result<ApiClient> {
        let config = ApiConfig::new(&self.api_url, &self.client_type).with_client_key(
            self.client_key
                .as_ref()
                .map(|key| key.expose_secret().to_string()),
        );
        ApiClient::new(config, session).context("invalid API configuration")
    }

    /// Builds the 2FA and proxy clients over one session.
    ///
    /// # Errors
    /// Returns an error if the session cannot be loaded or the API URL is invalid.
    pub fn clients(&self) -> Result<(Identity2FAClient, IdentityProxyClient)> {
        let api = self.api_client(self.session()?)?;
        Ok((
            Identity2FAClient::new(api.clone()),
            IdentityProxyClient::new(api),
        ))
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("client_type", &self.client_type)
            .field("client_key", &self.client_key.as_ref().map(|_| "***"))
            .field("session_file", &self.session_file)
            .finish()
    }
}
