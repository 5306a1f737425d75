use super::{controls, Screen};
use crate::flows::gate::{GateFlow, GateStep};

#[must_use]
pub fn screen(gate: &GateFlow) -> Screen {
    match gate.step() {
        GateStep::Loading => {
            let mut screen = Screen::new("loading", "Signing in");
            screen.text("Checking your account...");
            screen.busy(true)
        }
        GateStep::EmailSignIn => {
            let mut screen = Screen::new("email_sign_in", "Signing in");
            screen.text("Signing you in with your email link...");
            screen.busy(true)
        }
        GateStep::EmailConfirmation => {
            let mut screen = Screen::new("email_confirmation", "Confirming your email");
            screen.text("Confirming your email address...");
            screen.busy(true)
        }
        GateStep::Setup { provider_types } => {
            let mut screen = Screen::new("setup", "Set up two-factor authentication");
            screen.text("Your account requires a second factor. Choose one:");
            controls::select(&mut screen, provider_types);
            for provider_type in provider_types.options() {
                if let Some(subtitle) = &provider_type.subtitle {
                    screen.text(format!("  {}: {subtitle}", provider_type.title));
                }
            }
            screen.action("[/pick N] choose");
            screen
        }
        GateStep::Auth { provider_types } => {
            let mut screen = Screen::new("auth", "Verify it's you");
            screen.text("Choose how you want to receive your code:");
            controls::select(&mut screen, provider_types);
            screen.action("[/pick N] choose");
            screen
        }
        GateStep::Pairing { auth_code } => {
            let mut screen = Screen::new("pairing", "Pair your device");
            match auth_code {
                Some(code) => {
                    screen.text("Enter this code in the app on your other device:");
                    screen.text(format!("    {code}"));
                    screen.text("Waiting for confirmation...");
                }
                None => screen.text("Requesting a pairing code..."),
            }
            screen.busy(true)
        }
        GateStep::Ready => {
            let mut screen = Screen::new("ready", "Signed in");
            screen.text("You're all set.");
            screen
        }
        GateStep::Error { message } => {
            let mut screen = Screen::new("error", "Something went wrong");
            screen.error(Some(message));
            screen
        }
    }
}
