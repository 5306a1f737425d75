use super::{controls, Screen};
use crate::{
    controls::PincodeControl,
    flows::setup::{SetupFlow, SetupMode, SetupStep},
    identity::{Identity2FA, ProviderKind},
};

#[must_use]
pub fn screen(flow: &SetupFlow) -> Screen {
    let busy = flow.is_locked();

    match flow.step() {
        SetupStep::Starting => {
            let mut screen = Screen::new("starting", "Two-factor authentication");
            screen.text(match flow.mode() {
                SetupMode::Enroll(_) => "Preparing your authenticator...",
                SetupMode::Authenticate(_) => "Sending a verification code...",
            });
            screen.busy(true)
        }
        SetupStep::ProviderSelect { instance, apps } => {
            let mut screen = Screen::new("provider_select", "Set up an authenticator app");
            screen.text("Install one of these apps, then add your account:");
            controls::select(&mut screen, apps);
            if let Some(app) = apps.selected() {
                for url in [&app.url_ios, &app.url_android].into_iter().flatten() {
                    screen.text(format!("  {url}"));
                }
            }
            screen.blank();
            if let Some(secret) = &instance.secret {
                screen.text(format!("Secret key: {secret}"));
            }
            if let Some(url) = &instance.secret_url {
                screen.text(format!("Setup link: {url}"));
            }
            screen.action("[/pick N] choose app");
            screen.action("[enter] continue");
            screen.action("[/cancel] close");
            screen.busy(busy)
        }
        SetupStep::PhoneSetup {
            dial_code,
            number,
            phone_error,
        } => {
            let mut screen = Screen::new("phone_setup", "Add a phone number");
            screen.text(format!(
                "Country code: {}",
                dial_code
                    .selected()
                    .map_or_else(|| "-".to_string(), ToString::to_string)
            ));
            if !dial_code.query().is_empty() {
                controls::select(&mut screen, dial_code);
            }
            screen.text(format!(
                "Phone number: {}",
                if number.is_empty() { "_" } else { number }
            ));
            screen.error(phone_error.as_deref());
            screen.action("[type] phone number");
            screen.action("[/search TEXT] country");
            screen.action("[/cancel] close");
            screen.busy(busy)
        }
        SetupStep::ProviderConfirmation {
            instance,
            code,
            code_error,
            ..
        } => code_screen(
            flow,
            Screen::new("provider_confirmation", "Confirm your second factor"),
            instance,
            code,
            code_error.as_deref(),
        ),
        SetupStep::ProviderVerification {
            instance,
            code,
            code_error,
        } => code_screen(
            flow,
            Screen::new("provider_verification", "Verify it's you"),
            instance,
            code,
            code_error.as_deref(),
        ),
        SetupStep::Success => {
            let mut screen = Screen::new("success", "Two-factor authentication");
            screen.text(match flow.mode() {
                SetupMode::Enroll(_) => "Your second factor is active.",
                SetupMode::Authenticate(_) => "You're verified.",
            });
            screen.action("[enter] done");
            screen
        }
        SetupStep::Closed(_) => Screen::new("closed", "Two-factor authentication"),
    }
}

fn code_screen(
    flow: &SetupFlow,
    mut screen: Screen,
    instance: &Identity2FA,
    code: &PincodeControl,
    code_error: Option<&str>,
) -> Screen {
    screen.text(match (flow.mode().kind(), &instance.phone) {
        (ProviderKind::Phone, Some(phone)) => format!("Enter the 6-digit code sent to {phone}."),
        _ => "Enter the 6-digit code from your authenticator app.".to_string(),
    });
    screen.line(controls::pincode(code));
    screen.error(code_error);
    if flow.offers_resend() {
        controls::resend(&mut screen, flow.resend());
    }
    screen.action("[type] code");
    screen.action("[/cancel] close");
    screen.busy(flow.is_locked())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::{fixtures, Event};

    #[test]
    fn phone_verification_shows_number_and_cooldown() {
        let mut flow = SetupFlow::authenticate(fixtures::active("abc", ProviderKind::Phone));
        flow.mount();
        flow.update(Event::Sent {
            result: Ok(()),
            notify: false,
        });
        flow.update(Event::CodeInput("12".into()));

        let screen = screen(&flow);
        assert_eq!(screen.step, "provider_verification");
        let lines = screen.plain_lines();
        assert!(lines[0].contains("+31612345678"));
        assert_eq!(lines[1], "Code: 1 2 _   _ _ _");
        assert!(lines[2].contains("10s"));
        assert!(!screen.actions.iter().any(|a| a.contains("/resend")));
    }

    #[test]
    fn provider_select_lists_apps_and_secret() {
        let mut flow = SetupFlow::enroll(
            ProviderKind::Authenticator,
            crate::identity::catalog::authenticator_apps(),
        );
        flow.mount();
        flow.update(Event::Stored(Ok(fixtures::pending("xyz", ProviderKind::Authenticator))));
        flow.update(Event::Choose(0));

        let lines = screen(&flow).plain_lines();
        assert!(lines.iter().any(|l| l.starts_with("*  1. Google Authenticator")));
        assert!(lines.iter().any(|l| l.contains("apps.apple.com")));
        assert!(lines.iter().any(|l| l == "Secret key: JBSWY3DPEHPK3PXP"));
    }

    #[test]
    fn phone_setup_defaults_to_netherlands() {
        let mut flow = SetupFlow::enroll(ProviderKind::Phone, Vec::new());
        flow.mount();
        let lines = screen(&flow).plain_lines();
        assert_eq!(lines[0], "Country code: Netherlands (+31)");
        assert_eq!(lines[1], "Phone number: _");
    }
}
