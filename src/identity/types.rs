//! Wire types for the `/identity/2fa` resource and the identity proxy.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Kind of second factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Phone,
    Authenticator,
}

impl ProviderKind {
    pub const ALL: [Self; 2] = [Self::Phone, Self::Authenticator];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Authenticator => "authenticator",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "phone" => Ok(Self::Phone),
            "authenticator" => Ok(Self::Authenticator),
            other => Err(format!("unknown provider type: {other}")),
        }
    }
}

/// Lifecycle of one enrolled factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Identity2FAStatus {
    Active,
    Pending,
    Deactivated,
}

/// Display metadata for a provider type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth2FAProviderType {
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl fmt::Display for Auth2FAProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A selectable authenticator app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth2FAProvider {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_ios: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_android: Option<String>,
}

impl fmt::Display for Auth2FAProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One enrolled or pending factor instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity2FA {
    pub uuid: String,
    pub state: Identity2FAStatus,
    pub provider_type: Auth2FAProviderType,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub secret_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Identity2FA {
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.provider_type.kind
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == Identity2FAStatus::Active
    }
}

/// Enforcement flag for one feature area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    #[serde(default)]
    pub restricted: bool,
}

/// Feature areas that can demand 2FA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestrictionArea {
    Emails,
    Sessions,
    Reimbursements,
    BiConnections,
}

impl RestrictionArea {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Emails => "Email address changes",
            Self::Sessions => "Session management",
            Self::Reimbursements => "Reimbursements",
            Self::BiConnections => "BI connections",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    #[serde(default)]
    pub emails: Restriction,
    #[serde(default)]
    pub sessions: Restriction,
    #[serde(default)]
    pub reimbursements: Restriction,
    #[serde(default)]
    pub bi_connections: Restriction,
}

impl Restrictions {
    #[must_use]
    pub fn restricted_areas(&self) -> Vec<RestrictionArea> {
        [
            (RestrictionArea::Emails, self.emails),
            (RestrictionArea::Sessions, self.sessions),
            (RestrictionArea::Reimbursements, self.reimbursements),
            (RestrictionArea::BiConnections, self.bi_connections),
        ]
        .into_iter()
        .filter(|(_, restriction)| restriction.restricted)
        .map(|(area, _)| area)
        .collect()
    }
}

/// Snapshot of the session's 2FA posture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity2FAState {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub providers: Vec<Auth2FAProvider>,
    #[serde(default)]
    pub provider_types: Vec<Auth2FAProviderType>,
    #[serde(default)]
    pub active_providers: Vec<Identity2FA>,
    #[serde(default)]
    pub restrictions: Restrictions,
    #[serde(default)]
    pub auth_2fa_remember_ip: bool,
    #[serde(default)]
    pub auth_2fa_forget_force: BTreeMap<String, bool>,
}

impl Identity2FAState {
    /// The session still has to pass 2FA.
    #[must_use]
    pub fn needs_verification(&self) -> bool {
        self.required && !self.confirmed
    }

    /// The active instance for `kind`; the server keeps at most one.
    #[must_use]
    pub fn active_provider(&self, kind: ProviderKind) -> Option<&Identity2FA> {
        self.active_providers
            .iter()
            .find(|provider| provider.kind() == kind)
    }

    /// Provider types that have an active instance, falling back to the
    /// bundled catalog when the server sent no metadata.
    #[must_use]
    pub fn active_provider_types(&self) -> Vec<Auth2FAProviderType> {
        super::catalog::provider_types_or_default(&self.provider_types)
            .into_iter()
            .filter(|provider_type| self.active_provider(provider_type.kind).is_some())
            .collect()
    }

    /// Authenticator apps offered during enrollment.
    #[must_use]
    pub fn authenticator_apps(&self) -> Vec<Auth2FAProvider> {
        self.providers
            .iter()
            .filter(|provider| provider.kind == ProviderKind::Authenticator)
            .cloned()
            .collect()
    }

    /// Whether the remember-IP preference may be changed from `client_type`.
    #[must_use]
    pub fn can_update_remember_ip(&self, client_type: &str) -> bool {
        !self
            .auth_2fa_forget_force
            .get(client_type)
            .copied()
            .unwrap_or(false)
    }
}

/// `POST /identity/2fa`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoreRequest {
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl StoreRequest {
    #[must_use]
    pub fn authenticator() -> Self {
        Self {
            kind: ProviderKind::Authenticator,
            phone: None,
        }
    }

    #[must_use]
    pub fn phone(phone: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Phone,
            phone: Some(phone.into()),
        }
    }
}

/// Body of `activate` and `deactivate`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub code: String,
}

/// Body of `authenticate`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateRequest {
    pub code: String,
}

// Codes are one-time secrets; keep them out of debug output.
impl fmt::Debug for ConfirmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmRequest")
            .field("key", &self.key)
            .field("code", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for AuthenticateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticateRequest")
            .field("code", &"<redacted>")
            .finish()
    }
}

/// `POST /identity/2fa/update`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    pub auth_2fa_remember_ip: bool,
}

/// Result of exchanging an email or confirmation token.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Short code shown for companion-app pairing.
#[derive(Clone, Deserialize)]
pub struct PairingCode {
    #[serde(deserialize_with = "string_or_number")]
    pub auth_code: String,
    pub access_token: String,
}

impl fmt::Debug for PairingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingCode")
            .field("auth_code", &self.auth_code)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// State of a token being polled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    Active,
    Pending,
    Invalid,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TokenCheck {
    pub message: TokenState,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
