//! Enrollment and verification of a second factor.

use super::{
    failure_toast, field_message, provider_key, Effect, Event, Outcome, ResendControl,
    SubmitLock, Toast, CODE_LENGTH, INVALID_CODE,
};
use crate::{
    controls::{PincodeControl, SelectControl},
    identity::{
        catalog::{default_dial_code, dial_codes, DialCode},
        types::{AuthenticateRequest, ConfirmRequest, StoreRequest},
        Auth2FAProvider, Identity2FA, ProviderKind,
    },
};
use regex::Regex;
use tracing::debug;

const INVALID_PHONE: &str = "Enter a valid phone number.";

/// What the flow was opened for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupMode {
    /// Enroll a new factor of this kind.
    Enroll(ProviderKind),
    /// Verify the session with an already active instance.
    Authenticate(Identity2FA),
}

impl SetupMode {
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Enroll(kind) => *kind,
            Self::Authenticate(instance) => instance.kind(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SetupStep {
    /// Waiting for the mount-time call.
    Starting,
    ProviderSelect {
        instance: Identity2FA,
        apps: SelectControl<Auth2FAProvider>,
    },
    PhoneSetup {
        dial_code: SelectControl<DialCode>,
        number: String,
        phone_error: Option<String>,
    },
    ProviderConfirmation {
        instance: Identity2FA,
        key: Option<String>,
        code: PincodeControl,
        code_error: Option<String>,
    },
    ProviderVerification {
        instance: Identity2FA,
        code: PincodeControl,
        code_error: Option<String>,
    },
    Success,
    Closed(Outcome),
}

impl SetupStep {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::ProviderSelect { .. } => "provider_select",
            Self::PhoneSetup { .. } => "phone_setup",
            Self::ProviderConfirmation { .. } => "provider_confirmation",
            Self::ProviderVerification { .. } => "provider_verification",
            Self::Success => "success",
            Self::Closed(_) => "closed",
        }
    }

    fn code_mut(&mut self) -> Option<(&mut PincodeControl, &mut Option<String>)> {
        match self {
            Self::ProviderConfirmation {
                code, code_error, ..
            }
            | Self::ProviderVerification {
                code, code_error, ..
            } => Some((code, code_error)),
            _ => None,
        }
    }

    fn instance(&self) -> Option<&Identity2FA> {
        match self {
            Self::ProviderSelect { instance, .. }
            | Self::ProviderConfirmation { instance, .. }
            | Self::ProviderVerification { instance, .. } => Some(instance),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetupFlow {
    mode: SetupMode,
    apps: Vec<Auth2FAProvider>,
    step: SetupStep,
    lock: SubmitLock,
    resend: ResendControl,
}

impl SetupFlow {
    /// Enrollment of `kind`; `apps` are offered on the authenticator selection step.
    #[must_use]
    pub fn enroll(kind: ProviderKind, apps: Vec<Auth2FAProvider>) -> Self {
        Self::new(SetupMode::Enroll(kind), apps)
    }

    #[must_use]
    pub fn authenticate(instance: Identity2FA) -> Self {
        Self::new(SetupMode::Authenticate(instance), Vec::new())
    }

    fn new(mode: SetupMode, apps: Vec<Auth2FAProvider>) -> Self {
        Self {
            mode,
            apps,
            step: SetupStep::Starting,
            lock: SubmitLock::default(),
            resend: ResendControl::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &SetupMode {
        &self.mode
    }

    #[must_use]
    pub fn step(&self) -> &SetupStep {
        &self.step
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    #[must_use]
    pub fn resend(&self) -> ResendControl {
        self.resend
    }

    /// Resend is offered for phone codes only.
    #[must_use]
    pub fn offers_resend(&self) -> bool {
        self.mode.kind() == ProviderKind::Phone
            && matches!(
                self.step,
                SetupStep::ProviderConfirmation { .. } | SetupStep::ProviderVerification { .. }
            )
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        if self.lock.is_locked() {
            return false;
        }
        match &self.step {
            SetupStep::ProviderSelect { .. } => true,
            SetupStep::PhoneSetup { number, .. } => !number.trim().is_empty(),
            SetupStep::ProviderConfirmation { code, .. }
            | SetupStep::ProviderVerification { code, .. } => code_ready(code),
            _ => false,
        }
    }

    /// Effects to run when the flow opens.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.step != SetupStep::Starting {
            return Vec::new();
        }

        match &self.mode {
            SetupMode::Enroll(ProviderKind::Authenticator) => {
                vec![Effect::Store(StoreRequest::authenticator())]
            }
            SetupMode::Enroll(ProviderKind::Phone) => {
                self.step = phone_setup();
                Vec::new()
            }
            SetupMode::Authenticate(instance) => match instance.kind() {
                ProviderKind::Phone => self.resend.begin(&instance.uuid, false),
                ProviderKind::Authenticator => {
                    self.step = verification(instance.clone());
                    Vec::new()
                }
            },
        }
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        if matches!(self.step, SetupStep::Closed(_)) {
            return Vec::new();
        }
        debug!(step = self.step.name(), event = event.name(), "setup event");

        match event {
            Event::Cancel => {
                let outcome = if self.step == SetupStep::Success {
                    Outcome::Done
                } else {
                    Outcome::Cancelled
                };
                self.close(outcome)
            }
            Event::Enter if self.step == SetupStep::Success => vec![Effect::Close(Outcome::Done)],
            Event::Enter | Event::Submit => self.submit(),
            Event::PhoneInput(value) => {
                if let SetupStep::PhoneSetup {
                    number,
                    phone_error,
                    ..
                } = &mut self.step
                {
                    *number = value.trim().to_string();
                    *phone_error = None;
                }
                Vec::new()
            }
            Event::CodeInput(value) => {
                if let Some((code, code_error)) = self.step.code_mut() {
                    *code_error = (!code.set(&value)).then(|| INVALID_CODE.to_string());
                }
                Vec::new()
            }
            Event::Search(query) => {
                match &mut self.step {
                    SetupStep::PhoneSetup { dial_code, .. } => dial_code.set_search(&query),
                    SetupStep::ProviderSelect { apps, .. } => apps.set_search(&query),
                    _ => {}
                }
                Vec::new()
            }
            Event::Choose(position) => {
                match &mut self.step {
                    SetupStep::PhoneSetup { dial_code, .. } => {
                        dial_code.select_visible(position);
                    }
                    SetupStep::ProviderSelect { apps, .. } => {
                        apps.select_visible(position);
                    }
                    _ => {}
                }
                Vec::new()
            }
            Event::ShowMore => {
                match &mut self.step {
                    SetupStep::PhoneSetup { dial_code, .. } => show_more(dial_code),
                    SetupStep::ProviderSelect { apps, .. } => show_more(apps),
                    _ => {}
                }
                Vec::new()
            }
            Event::Resend => self.resend_code(),
            Event::Stored(result) => self.stored(result),
            Event::Sent { result, notify } => {
                let effects = self.resend.finish(&result, notify);
                if self.step == SetupStep::Starting {
                    if let SetupMode::Authenticate(instance) = &self.mode {
                        self.step = verification(instance.clone());
                    }
                }
                effects
            }
            Event::Activated(result) => self.code_result(result, "provider_confirmation"),
            Event::Authenticated(result) => self.code_result(result, "provider_verification"),
            Event::Unlock => {
                self.lock.release();
                Vec::new()
            }
            Event::Tick => self.resend.tick(),
            Event::Deactivated(_) => Vec::new(),
        }
    }

    fn close(&mut self, outcome: Outcome) -> Vec<Effect> {
        self.step = SetupStep::Closed(outcome);
        vec![Effect::StopCooldown, Effect::Close(outcome)]
    }

    fn submit(&mut self) -> Vec<Effect> {
        if !self.can_submit() {
            return Vec::new();
        }

        match &mut self.step {
            SetupStep::ProviderSelect { instance, apps } => {
                let key = provider_key(apps.selected());
                self.step = confirmation(instance.clone(), key);
                Vec::new()
            }
            SetupStep::PhoneSetup {
                dial_code,
                number,
                phone_error,
            } => {
                let phone = full_number(dial_code.selected(), number);
                if !valid_phone(&phone) {
                    *phone_error = Some(INVALID_PHONE.to_string());
                    return Vec::new();
                }
                self.lock.acquire();
                vec![Effect::Store(StoreRequest::phone(phone))]
            }
            SetupStep::ProviderConfirmation {
                instance, key, code, ..
            } => {
                self.lock.acquire();
                vec![Effect::Activate {
                    uuid: instance.uuid.clone(),
                    request: ConfirmRequest {
                        key: key.clone(),
                        code: code.value(),
                    },
                }]
            }
            SetupStep::ProviderVerification { instance, code, .. } => {
                self.lock.acquire();
                vec![Effect::Authenticate {
                    uuid: instance.uuid.clone(),
                    request: AuthenticateRequest { code: code.value() },
                }]
            }
            _ => Vec::new(),
        }
    }

    fn resend_code(&mut self) -> Vec<Effect> {
        if !self.offers_resend() || !self.resend.can_resend() {
            return Vec::new();
        }
        match self.step.instance() {
            Some(instance) => {
                let uuid = instance.uuid.clone();
                self.resend.begin(&uuid, true)
            }
            None => Vec::new(),
        }
    }

    fn stored(&mut self, result: Result<Identity2FA, crate::api::ApiError>) -> Vec<Effect> {
        match &mut self.step {
            SetupStep::Starting => match result {
                Ok(instance) => {
                    let apps = SelectControl::new(self.apps.clone()).searchable(true);
                    self.step = SetupStep::ProviderSelect { instance, apps };
                    Vec::new()
                }
                Err(err) => {
                    // Nothing to show without a pending instance.
                    debug!(rate_limited = err.is_rate_limited(), "authenticator store failed");
                    let mut effects = vec![Effect::Toast(Toast::error(err.user_message()))];
                    effects.extend(self.close(Outcome::Cancelled));
                    effects
                }
            },
            SetupStep::PhoneSetup { phone_error, .. } => {
                let mut effects = vec![self.lock.complete()];
                match result {
                    Ok(instance) => {
                        self.step = confirmation(instance, None);
                        effects.push(self.resend.cooldown());
                    }
                    Err(err) => {
                        *phone_error = Some(field_message(&err, "phone"));
                        effects.push(Effect::Toast(Toast::error(err.user_message())));
                    }
                }
                effects
            }
            _ => Vec::new(),
        }
    }

    fn code_result(
        &mut self,
        result: Result<(), crate::api::ApiError>,
        expected: &'static str,
    ) -> Vec<Effect> {
        if self.step.name() != expected {
            return Vec::new();
        }

        let mut effects = vec![self.lock.complete()];
        match result {
            Ok(()) => {
                self.step = SetupStep::Success;
                effects.push(Effect::StopCooldown);
            }
            Err(err) => {
                if let Some((_, code_error)) = self.step.code_mut() {
                    *code_error = Some(field_message(&err, "code"));
                }
                effects.extend(failure_toast(&err));
            }
        }
        effects
    }
}

fn phone_setup() -> SetupStep {
    let mut dial_code = SelectControl::new(dial_codes()).searchable(true);
    let default = default_dial_code();
    dial_code.select_where(|code| *code == default);
    SetupStep::PhoneSetup {
        dial_code,
        number: String::new(),
        phone_error: None,
    }
}

fn confirmation(instance: Identity2FA, key: Option<String>) -> SetupStep {
    SetupStep::ProviderConfirmation {
        instance,
        key,
        code: PincodeControl::default(),
        code_error: None,
    }
}

fn verification(instance: Identity2FA) -> SetupStep {
    SetupStep::ProviderVerification {
        instance,
        code: PincodeControl::default(),
        code_error: None,
    }
}

fn code_ready(code: &PincodeControl) -> bool {
    code.len() == CODE_LENGTH && code.value().chars().all(|c| c.is_ascii_digit())
}

pub(crate) fn show_more<T: std::fmt::Display>(select: &mut SelectControl<T>) {
    let last = select.visible_options().len().saturating_sub(1);
    select.on_scroll(last);
}

/// E.164: a `+`, then 8 to 15 digits including the country code.
fn valid_phone(phone: &str) -> bool {
    Regex::new(r"^\+[1-9][0-9]{7,14}$").is_ok_and(|regex| regex.is_match(phone))
}

/// Joins the dial code with the local number, dropping a trunk `0`.
fn full_number(dial_code: Option<&DialCode>, number: &str) -> String {
    let digits: String = number
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if digits.starts_with('+') {
        return digits;
    }

    let code = dial_code.map_or_else(|| default_dial_code().code, |code| code.code);
    format!("{code}{}", digits.trim_start_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::ApiError,
        flows::{fixtures, RESEND_COOLDOWN_SECS, UNLOCK_DELAY},
        identity::catalog::authenticator_apps,
    };

    fn rate_limited() -> ApiError {
        ApiError::from_response(429, r#"{"message":"Too many attempts"}"#)
    }

    fn wrong_code() -> ApiError {
        ApiError::from_response(
            422,
            r#"{"message":"Invalid","errors":{"code":["The code is incorrect."]}}"#,
        )
    }

    #[test]
    fn initial_step_per_kind_and_mode() {
        let mut flow = SetupFlow::enroll(ProviderKind::Authenticator, authenticator_apps());
        assert_eq!(
            flow.mount(),
            vec![Effect::Store(StoreRequest::authenticator())]
        );
        assert_eq!(flow.step().name(), "starting");

        let mut flow = SetupFlow::enroll(ProviderKind::Phone, Vec::new());
        assert!(flow.mount().is_empty());
        assert_eq!(flow.step().name(), "phone_setup");

        let mut flow =
            SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Authenticator));
        assert!(flow.mount().is_empty());
        assert_eq!(flow.step().name(), "provider_verification");

        let mut flow = SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Phone));
        assert_eq!(
            flow.mount(),
            vec![
                Effect::Send {
                    uuid: "abc".into(),
                    notify: false
                },
                Effect::StartCooldown
            ]
        );
        assert_eq!(flow.step().name(), "starting");
        let effects = flow.update(Event::Sent {
            result: Ok(()),
            notify: false,
        });
        assert!(effects.is_empty());
        assert_eq!(flow.step().name(), "provider_verification");
    }

    #[test]
    fn phone_verification_opens_even_when_send_fails() {
        let mut flow = SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Phone));
        flow.mount();
        let effects = flow.update(Event::Sent {
            result: Err(ApiError::Network("offline".into())),
            notify: false,
        });
        assert_eq!(effects, vec![Effect::Toast(Toast::error("offline"))]);
        assert_eq!(flow.step().name(), "provider_verification");
    }

    #[test]
    fn phone_enroll_reaches_success() {
        let mut flow = SetupFlow::enroll(ProviderKind::Phone, Vec::new());
        flow.mount();

        flow.update(Event::PhoneInput("0612345678".into()));
        assert_eq!(
            flow.update(Event::Submit),
            vec![Effect::Store(StoreRequest::phone("+31612345678"))]
        );

        let effects = flow.update(Event::Stored(Ok(fixtures::pending("abc", ProviderKind::Phone))));
        assert_eq!(
            effects,
            vec![Effect::ScheduleUnlock(UNLOCK_DELAY), Effect::StartCooldown]
        );
        assert_eq!(flow.step().name(), "provider_confirmation");
        assert_eq!(flow.resend().countdown().time(), RESEND_COOLDOWN_SECS);

        flow.update(Event::Unlock);
        flow.update(Event::CodeInput("123456".into()));
        assert_eq!(
            flow.update(Event::Enter),
            vec![Effect::Activate {
                uuid: "abc".into(),
                request: ConfirmRequest {
                    key: None,
                    code: "123456".into()
                }
            }]
        );

        let effects = flow.update(Event::Activated(Ok(())));
        assert!(effects.contains(&Effect::ScheduleUnlock(UNLOCK_DELAY)));
        assert_eq!(flow.step(), &SetupStep::Success);
    }

    #[test]
    fn authenticator_enroll_sends_selected_app_key() {
        let mut flow = SetupFlow::enroll(ProviderKind::Authenticator, authenticator_apps());
        flow.mount();
        flow.update(Event::Stored(Ok(fixtures::pending(
            "xyz",
            ProviderKind::Authenticator,
        ))));
        assert_eq!(flow.step().name(), "provider_select");

        flow.update(Event::Search("micro".into()));
        flow.update(Event::Choose(0));
        assert!(flow.update(Event::Submit).is_empty());

        match flow.step() {
            SetupStep::ProviderConfirmation { key, .. } => {
                assert_eq!(key.as_deref(), Some("microsoft"));
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert!(!flow.offers_resend());
        assert!(flow.update(Event::Resend).is_empty());
    }

    #[test]
    fn code_must_be_six_digits() {
        let mut flow =
            SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Authenticator));
        flow.mount();

        flow.update(Event::CodeInput("12345".into()));
        assert!(!flow.can_submit());
        assert!(flow.update(Event::Submit).is_empty());

        flow.update(Event::CodeInput("1234567".into()));
        assert!(!flow.can_submit());
        assert!(flow.update(Event::Enter).is_empty());
        let Some((code, code_error)) = flow.step.code_mut() else {
            panic!("expected a code step");
        };
        assert!(code.is_empty());
        assert_eq!(code_error.as_deref(), Some(INVALID_CODE));

        flow.update(Event::CodeInput("123-456".into()));
        assert!(flow.can_submit());
        assert_eq!(flow.update(Event::Submit).len(), 1);
    }

    #[test]
    fn second_submit_while_outstanding_is_a_no_op() {
        let mut flow =
            SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Authenticator));
        flow.mount();
        flow.update(Event::CodeInput("123456".into()));

        assert_eq!(flow.update(Event::Submit).len(), 1);
        assert!(flow.update(Event::Submit).is_empty());
        assert!(flow.update(Event::Enter).is_empty());

        // Still locked during the cooling delay after a failure.
        let effects = flow.update(Event::Authenticated(Err(wrong_code())));
        assert_eq!(effects, vec![Effect::ScheduleUnlock(UNLOCK_DELAY)]);
        assert!(flow.update(Event::Submit).is_empty());

        match flow.step() {
            SetupStep::ProviderVerification { code_error, .. } => {
                assert_eq!(code_error.as_deref(), Some("The code is incorrect."));
            }
            other => panic!("unexpected step {other:?}"),
        }

        flow.update(Event::Unlock);
        assert_eq!(flow.update(Event::Submit).len(), 1);
    }

    #[test]
    fn transport_failures_are_toasted() {
        let mut flow =
            SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Authenticator));
        flow.mount();
        flow.update(Event::CodeInput("123456".into()));
        flow.update(Event::Submit);

        let effects = flow.update(Event::Authenticated(Err(ApiError::Timeout("slow".into()))));
        assert!(effects.contains(&Effect::Toast(Toast::error("slow"))));
        assert_eq!(flow.step().name(), "provider_verification");
    }

    #[test]
    fn success_is_sticky_and_each_enter_emits_one_done() {
        let mut flow =
            SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Authenticator));
        flow.mount();
        flow.update(Event::CodeInput("123456".into()));
        flow.update(Event::Submit);
        flow.update(Event::Authenticated(Ok(())));

        for _ in 0..3 {
            assert_eq!(flow.update(Event::Enter), vec![Effect::Close(Outcome::Done)]);
            assert_eq!(flow.step(), &SetupStep::Success);
        }
        flow.update(Event::CodeInput("654321".into()));
        flow.update(Event::Stored(Err(rate_limited())));
        assert_eq!(flow.step(), &SetupStep::Success);
    }

    #[test]
    fn authenticator_rate_limit_closes_via_cancel() {
        let mut flow = SetupFlow::enroll(ProviderKind::Authenticator, authenticator_apps());
        flow.mount();

        let effects = flow.update(Event::Stored(Err(rate_limited())));
        assert_eq!(
            effects,
            vec![
                Effect::Toast(Toast::error("Too many attempts")),
                Effect::StopCooldown,
                Effect::Close(Outcome::Cancelled)
            ]
        );
        assert_eq!(flow.step(), &SetupStep::Closed(Outcome::Cancelled));

        assert!(flow
            .update(Event::Stored(Ok(fixtures::pending("late", ProviderKind::Authenticator))))
            .is_empty());
        assert!(flow.update(Event::Enter).is_empty());
        assert_eq!(flow.step(), &SetupStep::Closed(Outcome::Cancelled));
    }

    #[test]
    fn cancel_closes_non_terminal_steps() {
        let mut flow = SetupFlow::enroll(ProviderKind::Phone, Vec::new());
        flow.mount();
        assert_eq!(
            flow.update(Event::Cancel),
            vec![Effect::StopCooldown, Effect::Close(Outcome::Cancelled)]
        );
    }

    #[test]
    fn phone_store_failure_is_inline_and_toasted() {
        let mut flow = SetupFlow::enroll(ProviderKind::Phone, Vec::new());
        flow.mount();
        flow.update(Event::PhoneInput("0612345678".into()));
        flow.update(Event::Submit);

        let err = ApiError::from_response(
            422,
            r#"{"message":"Invalid phone","errors":{"phone":["The phone number is invalid."]}}"#,
        );
        let effects = flow.update(Event::Stored(Err(err)));
        assert!(effects.contains(&Effect::Toast(Toast::error("Invalid phone"))));
        match flow.step() {
            SetupStep::PhoneSetup { phone_error, .. } => {
                assert_eq!(phone_error.as_deref(), Some("The phone number is invalid."));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn resend_waits_for_cooldown() {
        let mut flow = SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Phone));
        flow.mount();
        flow.update(Event::Sent {
            result: Ok(()),
            notify: false,
        });

        assert!(flow.update(Event::Resend).is_empty());
        for _ in 1..RESEND_COOLDOWN_SECS {
            assert!(flow.update(Event::Tick).is_empty());
        }
        assert!(flow.update(Event::Resend).is_empty());
        assert_eq!(flow.update(Event::Tick), vec![Effect::StopCooldown]);

        assert_eq!(
            flow.update(Event::Resend),
            vec![
                Effect::Send {
                    uuid: "abc".into(),
                    notify: true
                },
                Effect::StartCooldown
            ]
        );
        assert_eq!(
            flow.update(Event::Sent {
                result: Ok(()),
                notify: true
            }),
            vec![Effect::Toast(Toast::success("A new code has been sent."))]
        );
    }

    #[test]
    fn full_number_handles_trunk_prefix_and_international_input() {
        let belgium = DialCode {
            country: "Belgium",
            iso: "BE",
            code: "+32",
        };
        assert_eq!(full_number(Some(&belgium), "0470 12 34 56"), "+32470123456");
        assert_eq!(full_number(None, "612345678"), "+31612345678");
        assert_eq!(full_number(Some(&belgium), "+31612345678"), "+31612345678");
    }

    #[test]
    fn malformed_phone_stays_on_step_without_a_call() {
        let mut flow = SetupFlow::enroll(ProviderKind::Phone, Vec::new());
        flow.mount();
        flow.update(Event::PhoneInput("12".into()));

        assert!(flow.update(Event::Enter).is_empty());
        assert!(!flow.is_locked());
        match flow.step() {
            SetupStep::PhoneSetup { phone_error, .. } => {
                assert_eq!(phone_error.as_deref(), Some(INVALID_PHONE));
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert!(valid_phone("+31612345678"));
        assert!(!valid_phone("+3161234"));
    }
}
