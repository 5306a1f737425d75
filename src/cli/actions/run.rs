use crate::cli::{
    actions::{deactivate, gate, remember_ip, session, setup, status, Action},
    telemetry,
};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let result = match action {
        Action::Status(args) => status::execute(args).await,
        Action::RememberIp(args) => remember_ip::execute(args).await,
        Action::Setup(args) => setup::execute(args).await,
        Action::Deactivate(args) => deactivate::execute(args).await,
        Action::Gate(args) => gate::execute(args).await,
        Action::SignIn(args) => session::sign_in(&args),
        Action::SignOut(args) => session::sign_out(&args),
    };

    telemetry::shutdown_tracer();

    result
}
