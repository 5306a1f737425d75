//! Removal of an active second factor, confirmed with a fresh code.

use super::{
    field_message, Effect, Event, Outcome, ResendControl, SubmitLock, Toast, CODE_LENGTH,
    INVALID_CODE,
};
use crate::{
    api::ApiError,
    controls::PincodeControl,
    identity::{types::ConfirmRequest, Identity2FA, ProviderKind},
};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeactivateStep {
    Confirmation {
        code: PincodeControl,
        code_error: Option<String>,
    },
    Success,
    Closed(Outcome),
}

impl DeactivateStep {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Confirmation { .. } => "confirmation",
            Self::Success => "success",
            Self::Closed(_) => "closed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeactivateFlow {
    instance: Identity2FA,
    step: DeactivateStep,
    deactivating: SubmitLock,
    resend: ResendControl,
}

impl DeactivateFlow {
    #[must_use]
    pub fn new(instance: Identity2FA) -> Self {
        Self {
            instance,
            step: DeactivateStep::Confirmation {
                code: PincodeControl::default(),
                code_error: None,
            },
            deactivating: SubmitLock::default(),
            resend: ResendControl::default(),
        }
    }

    #[must_use]
    pub fn instance(&self) -> &Identity2FA {
        &self.instance
    }

    #[must_use]
    pub fn step(&self) -> &DeactivateStep {
        &self.step
    }

    #[must_use]
    pub fn is_deactivating(&self) -> bool {
        self.deactivating.is_locked()
    }

    #[must_use]
    pub fn resend(&self) -> ResendControl {
        self.resend
    }

    #[must_use]
    pub fn offers_resend(&self) -> bool {
        self.instance.kind() == ProviderKind::Phone
            && matches!(self.step, DeactivateStep::Confirmation { .. })
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        match &self.step {
            DeactivateStep::Confirmation { code, .. } => {
                !self.deactivating.is_locked() && code.len() == CODE_LENGTH
            }
            _ => false,
        }
    }

    /// Phone factors get a code sent right away, without a toast.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.instance.kind() == ProviderKind::Phone && !self.resend.is_sending() {
            return self.resend.begin(&self.instance.uuid, false);
        }
        Vec::new()
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        if matches!(self.step, DeactivateStep::Closed(_)) {
            return Vec::new();
        }
        debug!(step = self.step.name(), event = event.name(), "deactivate event");

        match event {
            Event::Cancel => {
                let outcome = if self.step == DeactivateStep::Success {
                    Outcome::Done
                } else {
                    Outcome::Cancelled
                };
                self.step = DeactivateStep::Closed(outcome);
                vec![Effect::StopCooldown, Effect::Close(outcome)]
            }
            Event::Enter if self.step == DeactivateStep::Success => {
                vec![Effect::Close(Outcome::Done)]
            }
            Event::Enter | Event::Submit => self.submit(),
            Event::CodeInput(value) => {
                if let DeactivateStep::Confirmation { code, code_error } = &mut self.step {
                    *code_error = (!code.set(&value)).then(|| INVALID_CODE.to_string());
                }
                Vec::new()
            }
            Event::Resend => {
                if self.offers_resend() && self.resend.can_resend() {
                    self.resend.begin(&self.instance.uuid, true)
                } else {
                    Vec::new()
                }
            }
            Event::Sent { result, notify } => self.resend.finish(&result, notify),
            Event::Deactivated(result) => self.deactivated(result),
            Event::Unlock => {
                self.deactivating.release();
                Vec::new()
            }
            Event::Tick => self.resend.tick(),
            _ => Vec::new(),
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if !self.can_submit() {
            return Vec::new();
        }
        let DeactivateStep::Confirmation { code, .. } = &self.step else {
            return Vec::new();
        };

        let request = ConfirmRequest {
            key: Some(self.instance.kind().to_string()),
            code: code.value(),
        };
        self.deactivating.acquire();
        vec![Effect::Deactivate {
            uuid: self.instance.uuid.clone(),
            request,
        }]
    }

    fn deactivated(&mut self, result: Result<(), ApiError>) -> Vec<Effect> {
        let DeactivateStep::Confirmation { code_error, .. } = &mut self.step else {
            return Vec::new();
        };

        let mut effects = vec![self.deactivating.complete()];
        match result {
            Ok(()) => {
                self.step = DeactivateStep::Success;
                effects.push(Effect::StopCooldown);
            }
            Err(err) => {
                *code_error = Some(field_message(&err, "code"));
                effects.push(Effect::Toast(Toast::error(err.user_message())));
            }
        }
        effects
    }
}
