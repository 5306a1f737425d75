use super::{controls, Screen};
use crate::{
    flows::deactivate::{DeactivateFlow, DeactivateStep},
    identity::ProviderKind,
};

#[must_use]
pub fn screen(flow: &DeactivateFlow) -> Screen {
    let instance = flow.instance();

    match flow.step() {
        DeactivateStep::Confirmation { code, code_error } => {
            let mut screen = Screen::new(
                "confirmation",
                format!("Remove {}", instance.provider_type.title),
            );
            screen.text(match (instance.kind(), &instance.phone) {
                (ProviderKind::Phone, Some(phone)) => {
                    format!("Enter the 6-digit code sent to {phone} to confirm.")
                }
                _ => "Enter the 6-digit code from your authenticator app to confirm.".to_string(),
            });
            screen.line(controls::pincode(code));
            screen.error(code_error.as_deref());
            if flow.offers_resend() {
                controls::resend(&mut screen, flow.resend());
            }
            screen.action("[type] code");
            screen.action("[/cancel] close");
            screen.busy(flow.is_deactivating())
        }
        DeactivateStep::Success => {
            let mut screen = Screen::new(
                "success",
                format!("Remove {}", instance.provider_type.title),
            );
            screen.text("The second factor has been removed.");
            screen.action("[enter] done");
            screen
        }
        DeactivateStep::Closed(_) => Screen::new("closed", "Two-factor authentication"),
    }
}
