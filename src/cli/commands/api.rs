use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_CLIENT_TYPE: &str = "client-type";
pub const ARG_CLIENT_KEY: &str = "client-key";
pub const ARG_SESSION_FILE: &str = "session-file";

pub const DEFAULT_CLIENT_TYPE: &str = "webshop";
pub const DEFAULT_SESSION_FILE: &str = ".identity-2fa-session.json";

#[derive(Clone, PartialEq, Eq)]
pub struct Options {
    pub api_url: String,
    pub client_type: String,
    pub client_key: Option<String>,
    pub session_file: PathBuf,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("api_url", &self.api_url)
            .field("client_type", &self.client_type)
            .field("client_key", &self.client_key.as_ref().map(|_| "***"))
            .field("session_file", &self.session_file)
            .finish()
    }
}

impl Options {
    /// # Errors
    /// Returns an error if the API URL is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .context("missing required argument: --api-url")?;
        let client_type = matches
            .get_one::<String>(ARG_CLIENT_TYPE)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CLIENT_TYPE.to_string());
        let client_key = matches.get_one::<String>(ARG_CLIENT_KEY).cloned();
        let session_file = matches
            .get_one::<String>(ARG_SESSION_FILE)
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self {
            api_url,
            client_type,
            client_key,
            session_file,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Platform API base URL, example: https://api.example.org")
                .env("IDENTITY_2FA_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_CLIENT_TYPE)
                .long(ARG_CLIENT_TYPE)
                .help("Client type sent with every request")
                .env("IDENTITY_2FA_CLIENT_TYPE")
                .default_value(DEFAULT_CLIENT_TYPE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_CLIENT_KEY)
                .long(ARG_CLIENT_KEY)
                .help("Client key sent with every request")
                .env("IDENTITY_2FA_CLIENT_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long(ARG_SESSION_FILE)
                .help("File that stores the session token")
                .env("IDENTITY_2FA_SESSION_FILE")
                .default_value(DEFAULT_SESSION_FILE)
                .global(true),
        )
}
