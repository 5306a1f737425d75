//! Page gate: decides whether the session must pass 2FA before it may
//! continue, and hosts the setup flow when it does.

use super::{setup::show_more, setup::SetupMode, Outcome};
use crate::{
    api::ApiError,
    controls::SelectControl,
    identity::{
        catalog::{authenticator_apps_or_default, provider_types_or_default},
        types::TokenState,
        Auth2FAProvider, Auth2FAProviderType, ExchangeToken, Identity2FAState,
    },
};
use tracing::debug;

const EXCHANGE_FAILED: &str =
    "This link is invalid or has expired. Request a new email to continue.";
const PAIRING_FAILED: &str = "The pairing code expired or was rejected.";

#[derive(Clone, Debug, PartialEq)]
pub enum GateStep {
    Loading,
    EmailSignIn,
    EmailConfirmation,
    /// No factor yet; every provider type is offered.
    Setup {
        provider_types: SelectControl<Auth2FAProviderType>,
    },
    /// Verify with one of the active factors.
    Auth {
        provider_types: SelectControl<Auth2FAProviderType>,
    },
    Pairing {
        auth_code: Option<String>,
    },
    Ready,
    Error {
        message: String,
    },
}

impl GateStep {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::EmailSignIn => "email_sign_in",
            Self::EmailConfirmation => "email_confirmation",
            Self::Setup { .. } => "setup",
            Self::Auth { .. } => "auth",
            Self::Pairing { .. } => "pairing",
            Self::Ready => "ready",
            Self::Error { .. } => "error",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Error { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GateEvent {
    Start,
    /// Token exchanged and installed in the session.
    Exchanged(Result<(), ApiError>),
    Status(Result<Identity2FAState, ApiError>),
    Search(String),
    Choose(usize),
    ShowMore,
    Enter,
    ModalClosed(Outcome),
    PairingIssued(Result<String, ApiError>),
    Paired(Result<TokenState, ApiError>),
}

/// How the gate ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Ready,
    Failed(String),
    /// The user left before the gate settled.
    Aborted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GateEffect {
    Exchange(ExchangeToken),
    FetchStatus,
    OpenModal {
        mode: SetupMode,
        apps: Vec<Auth2FAProvider>,
    },
    RequestPairingCode,
    PollPairing,
    StopPolling,
    Finish(GateOutcome),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GateFlow {
    token: Option<ExchangeToken>,
    mobile: bool,
    step: GateStep,
    state: Option<Identity2FAState>,
}

impl GateFlow {
    /// `token` is exchanged first when present; `mobile` clients pair a
    /// companion device once verified.
    #[must_use]
    pub fn new(token: Option<ExchangeToken>, mobile: bool) -> Self {
        Self {
            token,
            mobile,
            step: GateStep::Loading,
            state: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> &GateStep {
        &self.step
    }

    #[must_use]
    pub fn state(&self) -> Option<&Identity2FAState> {
        self.state.as_ref()
    }

    pub fn update(&mut self, event: GateEvent) -> Vec<GateEffect> {
        if self.step.is_terminal() {
            return Vec::new();
        }
        debug!(step = self.step.name(), "gate event");

        match event {
            GateEvent::Start => self.start(),
            GateEvent::Exchanged(result) => match result {
                Ok(()) => self.check(),
                Err(err) => {
                    debug!(error = %err, "token exchange failed");
                    self.fail(EXCHANGE_FAILED.to_string())
                }
            },
            GateEvent::Status(result) => match result {
                Ok(state) => self.decide(state),
                Err(err) => self.fail(err.user_message()),
            },
            GateEvent::Search(query) => {
                if let Some(select) = self.provider_select() {
                    select.set_search(&query);
                }
                Vec::new()
            }
            GateEvent::ShowMore => {
                if let Some(select) = self.provider_select() {
                    show_more(select);
                }
                Vec::new()
            }
            GateEvent::Choose(position) => {
                if let Some(select) = self.provider_select() {
                    select.select_visible(position);
                }
                self.open_modal()
            }
            GateEvent::Enter => self.open_modal(),
            GateEvent::ModalClosed(Outcome::Done) => self.check(),
            GateEvent::ModalClosed(Outcome::Cancelled) => Vec::new(),
            GateEvent::PairingIssued(result) => match result {
                Ok(auth_code) if matches!(self.step, GateStep::Pairing { .. }) => {
                    self.step = GateStep::Pairing {
                        auth_code: Some(auth_code),
                    };
                    vec![GateEffect::PollPairing]
                }
                Ok(_) => Vec::new(),
                Err(err) => self.fail(err.user_message()),
            },
            GateEvent::Paired(result) => match result {
                Ok(TokenState::Active) => {
                    self.step = GateStep::Ready;
                    vec![GateEffect::Finish(GateOutcome::Ready)]
                }
                Ok(TokenState::Pending) => Vec::new(),
                Ok(TokenState::Invalid | TokenState::Unknown) => {
                    self.fail(PAIRING_FAILED.to_string())
                }
                Err(err) => self.fail(err.user_message()),
            },
        }
    }

    fn start(&mut self) -> Vec<GateEffect> {
        match self.token.clone() {
            Some(token) => {
                self.step = match token {
                    ExchangeToken::EmailSignIn(_) => GateStep::EmailSignIn,
                    ExchangeToken::EmailConfirmation(_) => GateStep::EmailConfirmation,
                };
                vec![GateEffect::Exchange(token)]
            }
            None => self.check(),
        }
    }

    fn check(&mut self) -> Vec<GateEffect> {
        self.step = GateStep::Loading;
        vec![GateEffect::FetchStatus]
    }

    fn decide(&mut self, state: Identity2FAState) -> Vec<GateEffect> {
        let effects = if !state.needs_verification() {
            if self.mobile {
                self.step = GateStep::Pairing { auth_code: None };
                vec![GateEffect::RequestPairingCode]
            } else {
                self.step = GateStep::Ready;
                vec![GateEffect::Finish(GateOutcome::Ready)]
            }
        } else if state.active_providers.is_empty() {
            let types = provider_types_or_default(&state.provider_types);
            self.step = GateStep::Setup {
                provider_types: SelectControl::new(types),
            };
            Vec::new()
        } else {
            let types = state.active_provider_types();
            self.step = GateStep::Auth {
                provider_types: SelectControl::new(types),
            };
            Vec::new()
        };

        self.state = Some(state);
        effects
    }

    fn provider_select(&mut self) -> Option<&mut SelectControl<Auth2FAProviderType>> {
        match &mut self.step {
            GateStep::Setup { provider_types } | GateStep::Auth { provider_types } => {
                Some(provider_types)
            }
            _ => None,
        }
    }

    fn open_modal(&mut self) -> Vec<GateEffect> {
        let Some(state) = &self.state else {
            return Vec::new();
        };

        let mode = match &self.step {
            GateStep::Setup { provider_types } => provider_types
                .selected()
                .map(|provider_type| SetupMode::Enroll(provider_type.kind)),
            GateStep::Auth { provider_types } => provider_types
                .selected()
                .and_then(|provider_type| state.active_provider(provider_type.kind))
                .map(|instance| SetupMode::Authenticate(instance.clone())),
            _ => None,
        };

        match mode {
            Some(mode) => vec![GateEffect::OpenModal {
                mode,
                apps: authenticator_apps_or_default(&state.authenticator_apps()),
            }],
            None => Vec::new(),
        }
    }

    fn fail(&mut self, message: String) -> Vec<GateEffect> {
        self.step = GateStep::Error {
            message: message.clone(),
        };
        vec![
            GateEffect::StopPolling,
            GateEffect::Finish(GateOutcome::Failed(message)),
        ]
    }
}
