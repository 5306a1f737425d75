//! Account security overview: enrolled factors, restricted areas and the
//! remember-IP preference.

use super::{Outcome, Toast};
use crate::{
    api::ApiError,
    identity::{
        catalog::provider_types_or_default,
        types::RestrictionArea,
        Auth2FAProviderType, Identity2FA, Identity2FAClient, Identity2FAState,
    },
};
use tracing::{instrument, warn};

const REFRESH_FAILED: &str =
    "Your changes were saved, but the overview could not be refreshed. It may be out of date.";

/// One provider type and its active instance, if enrolled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderRow {
    pub provider_type: Auth2FAProviderType,
    pub active: Option<Identity2FA>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityOverview {
    state: Identity2FAState,
    client_type: String,
    stale: bool,
}

impl SecurityOverview {
    #[must_use]
    pub fn new(state: Identity2FAState, client_type: impl Into<String>) -> Self {
        Self {
            state,
            client_type: client_type.into(),
            stale: false,
        }
    }

    /// Fetches the current state.
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the status call fails.
    pub async fn load(client: &Identity2FAClient) -> Result<Self, ApiError> {
        let state = client.status().await?;
        Ok(Self::new(state, client.api().client_type()))
    }

    #[must_use]
    pub fn state(&self) -> &Identity2FAState {
        &self.state
    }

    #[must_use]
    pub fn rows(&self) -> Vec<ProviderRow> {
        provider_types_or_default(&self.state.provider_types)
            .into_iter()
            .map(|provider_type| ProviderRow {
                active: self.state.active_provider(provider_type.kind).cloned(),
                provider_type,
            })
            .collect()
    }

    #[must_use]
    pub fn required(&self) -> bool {
        self.state.required
    }

    #[must_use]
    pub fn restricted_areas(&self) -> Vec<RestrictionArea> {
        self.state.restrictions.restricted_areas()
    }

    #[must_use]
    pub fn remember_ip(&self) -> bool {
        self.state.auth_2fa_remember_ip
    }

    /// Some client types are forced to re-verify on every new IP.
    #[must_use]
    pub fn can_update_remember_ip(&self) -> bool {
        self.state.can_update_remember_ip(&self.client_type)
    }

    /// The last refresh failed; the data shown predates the latest change.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    fn apply(&mut self, state: Identity2FAState) {
        self.state = state;
        self.stale = false;
    }

    /// Saves the remember-IP preference and adopts the returned state.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] when the preference is locked for this
    /// client type, or the update error.
    #[instrument(skip(self, client))]
    pub async fn update_remember_ip(
        &mut self,
        client: &Identity2FAClient,
        remember_ip: bool,
    ) -> Result<(), ApiError> {
        if !self.can_update_remember_ip() {
            return Err(ApiError::Config(format!(
                "remember-IP cannot be changed from client type '{}'",
                self.client_type
            )));
        }

        let state = client.update(remember_ip).await?;
        self.apply(state);
        Ok(())
    }

    /// Refreshes after a modal flow closed. Only `Done` triggers a fetch.
    /// A failed refresh keeps the previous state, marks it stale and returns
    /// a warning.
    pub async fn refresh_after(
        &mut self,
        client: &Identity2FAClient,
        outcome: Outcome,
    ) -> Option<Toast> {
        if outcome != Outcome::Done {
            return None;
        }

        match client.status().await {
            Ok(state) => {
                self.apply(state);
                None
            }
            Err(err) => {
                warn!(error = %err, "security overview refresh failed");
                self.stale = true;
                Some(Toast::warning(REFRESH_FAILED))
            }
        }
    }
}
