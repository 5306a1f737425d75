//! Client for the `/identity/2fa` resource. Every call is stateless; the
//! session token comes from the [`ApiClient`]. Codes and secrets are skipped
//! from spans.

use super::types::{
    AuthenticateRequest, ConfirmRequest, Identity2FA, Identity2FAState, StoreRequest,
    UpdateRequest,
};
use crate::api::{encode_segment, ApiClient, ApiError, Envelope};
use tracing::instrument;

const RESOURCE: &str = "/identity/2fa";

#[derive(Clone, Debug)]
pub struct Identity2FAClient {
    api: ApiClient,
}

impl Identity2FAClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `GET /identity/2fa`
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<Identity2FAState, ApiError> {
        self.api
            .get_json::<Envelope<Identity2FAState>>(RESOURCE)
            .await
            .map(|envelope| envelope.data)
    }

    /// `POST /identity/2fa/update`
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn update(&self, remember_ip: bool) -> Result<Identity2FAState, ApiError> {
        let request = UpdateRequest {
            auth_2fa_remember_ip: remember_ip,
        };
        self.api
            .post_json::<_, Envelope<Identity2FAState>>(&format!("{RESOURCE}/update"), &request)
            .await
            .map(|envelope| envelope.data)
    }

    /// `POST /identity/2fa`: creates a pending instance.
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn store(&self, request: &StoreRequest) -> Result<Identity2FA, ApiError> {
        self.api
            .post_json::<_, Envelope<Identity2FA>>(RESOURCE, request)
            .await
            .map(|envelope| envelope.data)
    }

    /// `POST /identity/2fa/{uuid}/resend`
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn send(&self, uuid: &str) -> Result<(), ApiError> {
        self.api.post_empty(&instance_path(uuid, "resend")).await
    }

    /// `POST /identity/2fa/{uuid}/activate`
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self, request))]
    pub async fn activate(&self, uuid: &str, request: &ConfirmRequest) -> Result<(), ApiError> {
        self.api
            .post_json_empty(&instance_path(uuid, "activate"), request)
            .await
    }

    /// `POST /identity/2fa/{uuid}/deactivate`
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self, request))]
    pub async fn deactivate(&self, uuid: &str, request: &ConfirmRequest) -> Result<(), ApiError> {
        self.api
            .post_json_empty(&instance_path(uuid, "deactivate"), request)
            .await
    }

    /// `POST /identity/2fa/{uuid}/authenticate`
    ///
    /// # Errors
    /// Returns an [`ApiError`] if the request fails.
    #[instrument(skip(self, request))]
    pub async fn authenticate(
        &self,
        uuid: &str,
        request: &AuthenticateRequest,
    ) -> Result<(), ApiError> {
        self.api
            .post_json_empty(&instance_path(uuid, "authenticate"), request)
            .await
    }
}

fn instance_path(uuid: &str, action: &str) -> String {
    format!("{RESOURCE}/{}/{action}", encode_segment(uuid))
}
