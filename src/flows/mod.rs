//! 2FA flows as explicit state machines.
//!
//! Each modal flow ([`setup::SetupFlow`], [`deactivate::DeactivateFlow`]) keeps
//! its step in an enum whose variants carry only that step's data, and exposes
//! a single `update(Event) -> Vec<Effect>` reducer. Network calls, timers and
//! toasts are returned as [`Effect`]s and executed by the runtime, which feeds
//! results back as [`Event`]s. The reducers never perform I/O, so every
//! transition is testable without a server.

pub mod deactivate;
pub mod gate;
pub mod security;
pub mod setup;

use crate::{
    api::ApiError,
    controls::Countdown,
    identity::{
        types::{AuthenticateRequest, ConfirmRequest, StoreRequest},
        Auth2FAProvider, Identity2FA,
    },
};
use std::time::Duration;

/// Length of every verification code.
pub const CODE_LENGTH: usize = 6;
pub(crate) const INVALID_CODE: &str = "Enter the 6-digit code.";
/// Seconds before a code can be resent.
pub const RESEND_COOLDOWN_SECS: u32 = 10;
/// Delay before a submit guard is released after a call completes.
pub const UNLOCK_DELAY: Duration = Duration::from_millis(1000);

/// How a modal flow ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Inputs to the modal reducers: user intent and completed effects.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    PhoneInput(String),
    CodeInput(String),
    /// Filter the step's option list.
    Search(String),
    /// Pick the n-th visible option (zero-based).
    Choose(usize),
    ShowMore,
    Submit,
    Enter,
    Cancel,
    Resend,
    Stored(Result<Identity2FA, ApiError>),
    Sent {
        result: Result<(), ApiError>,
        notify: bool,
    },
    Activated(Result<(), ApiError>),
    Authenticated(Result<(), ApiError>),
    Deactivated(Result<(), ApiError>),
    Unlock,
    Tick,
}

impl Event {
    /// Variant name for logs; payloads may carry codes.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PhoneInput(_) => "phone_input",
            Self::CodeInput(_) => "code_input",
            Self::Search(_) => "search",
            Self::Choose(_) => "choose",
            Self::ShowMore => "show_more",
            Self::Submit => "submit",
            Self::Enter => "enter",
            Self::Cancel => "cancel",
            Self::Resend => "resend",
            Self::Stored(_) => "stored",
            Self::Sent { .. } => "sent",
            Self::Activated(_) => "activated",
            Self::Authenticated(_) => "authenticated",
            Self::Deactivated(_) => "deactivated",
            Self::Unlock => "unlock",
            Self::Tick => "tick",
        }
    }
}

/// Work requested by the modal reducers.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Store(StoreRequest),
    Send { uuid: String, notify: bool },
    Activate { uuid: String, request: ConfirmRequest },
    Authenticate { uuid: String, request: AuthenticateRequest },
    Deactivate { uuid: String, request: ConfirmRequest },
    /// (Re)start the one-second ticker feeding [`Event::Tick`].
    StartCooldown,
    StopCooldown,
    ScheduleUnlock(Duration),
    Toast(Toast),
    Close(Outcome),
}

/// Guard against overlapping submissions.
///
/// `Busy` while a call is outstanding, `Cooling` from its completion until
/// [`Event::Unlock`] arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitLock {
    #[default]
    Idle,
    Busy,
    Cooling,
}

impl SubmitLock {
    #[must_use]
    pub fn is_locked(self) -> bool {
        self != Self::Idle
    }

    /// Takes the lock if it is free.
    pub fn acquire(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        *self = Self::Busy;
        true
    }

    /// Marks the outstanding call as completed and returns the unlock timer.
    pub fn complete(&mut self) -> Effect {
        *self = Self::Cooling;
        Effect::ScheduleUnlock(UNLOCK_DELAY)
    }

    pub fn release(&mut self) {
        if *self == Self::Cooling {
            *self = Self::Idle;
        }
    }
}

/// Resend-code state shared by the modal flows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResendControl {
    countdown: Countdown,
    sending: bool,
}

impl ResendControl {
    #[must_use]
    pub fn can_resend(&self) -> bool {
        !self.sending && !self.countdown.is_running()
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Starts a send: marks it in flight and restarts the cooldown.
    pub fn begin(&mut self, uuid: &str, notify: bool) -> Vec<Effect> {
        self.sending = true;
        self.countdown.start(RESEND_COOLDOWN_SECS);
        vec![
            Effect::Send {
                uuid: uuid.to_string(),
                notify,
            },
            Effect::StartCooldown,
        ]
    }

    /// Cooldown only, for codes the server sent on its own (phone store).
    pub fn cooldown(&mut self) -> Effect {
        self.countdown.start(RESEND_COOLDOWN_SECS);
        Effect::StartCooldown
    }

    pub fn finish(&mut self, result: &Result<(), ApiError>, notify: bool) -> Vec<Effect> {
        self.sending = false;
        match result {
            Ok(()) if notify => vec![Effect::Toast(Toast::success(
                "A new code has been sent.",
            ))],
            Ok(()) => Vec::new(),
            Err(err) => vec![Effect::Toast(Toast::error(err.user_message()))],
        }
    }

    pub fn tick(&mut self) -> Vec<Effect> {
        if self.countdown.tick() {
            vec![Effect::StopCooldown]
        } else {
            Vec::new()
        }
    }
}

/// Inline error for `field`, falling back to the general message.
pub(crate) fn field_message(err: &ApiError, field: &str) -> String {
    err.field_error(field)
        .map_or_else(|| err.user_message(), ToString::to_string)
}

/// Validation failures stay inline; anything else is toasted as well.
pub(crate) fn failure_toast(err: &ApiError) -> Option<Effect> {
    if err.has_field_errors() {
        None
    } else {
        Some(Effect::Toast(Toast::error(err.user_message())))
    }
}

/// Key sent with activation: the chosen authenticator app, if any.
pub(crate) fn provider_key(provider: Option<&Auth2FAProvider>) -> Option<String> {
    provider.map(|provider| provider.key.clone())
}
