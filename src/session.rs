//! Session token ownership.
//!
//! The access token is held by an explicit [`SessionContext`] that is created
//! once (reading any persisted token from a [`SessionStore`]) and handed to the
//! API client. Signing in persists the token under [`SESSION_KEY`]; signing out
//! clears both memory and the store. Tokens are wrapped in [`SecretString`] and
//! must never be logged.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};
use tracing::{debug, warn};

/// Key the session token is persisted under.
pub const SESSION_KEY: &str = "active_account";

/// File-backed key/value store for client state.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a value; a missing file means an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .load()?
            .get(key)
            .and_then(Value::as_str)
            .map(ToString::to_string))
    }

    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&entries)
    }

    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session store: {}", self.path.display()))?;

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid session store: {}", self.path.display()))
    }

    fn save(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(entries)?;
        write_private(&self.path, raw.as_bytes())
            .with_context(|| format!("Failed to write session store: {}", self.path.display()))
    }
}

/// Writes `contents` readable by the owner only; the file holds a bearer token.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::{
        io::Write,
        os::unix::fs::{OpenOptionsExt, PermissionsExt},
    };

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode only applies on create
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

/// Shared handle to the current session token.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    token: Arc<RwLock<Option<SecretString>>>,
    store: Option<SessionStore>,
}

impl SessionContext {
    /// Session that lives only in memory, used by embedders and tests.
    #[must_use]
    pub fn in_memory(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.map(SecretString::from))),
            store: None,
        }
    }

    /// Loads the persisted token, if any.
    ///
    /// # Errors
    /// Returns an error if the store exists but cannot be read.
    pub fn init(store: SessionStore) -> Result<Self> {
        let token = store
            .read(SESSION_KEY)?
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from);

        debug!(
            path = %store.path().display(),
            signed_in = token.is_some(),
            "session initialized"
        );

        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            store: Some(store),
        })
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token.read().map(|token| token.is_some()).unwrap_or(false)
    }

    /// `Authorization` header value for the current token.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| {
            token
                .as_ref()
                .map(|secret| format!("Bearer {}", secret.expose_secret()))
        })
    }

    /// Installs a new token and persists it.
    ///
    /// # Errors
    /// Returns an error if the token cannot be persisted; the in-memory token is
    /// still replaced.
    pub fn sign_in(&self, token: &str) -> Result<()> {
        self.replace(Some(SecretString::from(token.to_string())));

        if let Some(store) = &self.store {
            store.write(SESSION_KEY, token)?;
        }

        Ok(())
    }

    /// Clears the token from memory and from the store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be updated.
    pub fn sign_out(&self) -> Result<()> {
        self.replace(None);

        if let Some(store) = &self.store {
            store.remove(SESSION_KEY)?;
        }

        Ok(())
    }

    fn replace(&self, token: Option<SecretString>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => {
                warn!("session lock poisoned, recovering");
                *poisoned.into_inner() = token;
            }
        }
    }
}
