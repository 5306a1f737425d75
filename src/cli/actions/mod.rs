pub mod deactivate;
pub mod gate;
pub mod remember_ip;
pub mod session;
pub mod setup;
pub mod status;

// The match over every variant lives in `run` so this file stays a list.
mod run;

#[derive(Debug)]
pub enum Action {
    Status(status::Args),
    RememberIp(remember_ip::Args),
    Setup(setup::Args),
    Deactivate(deactivate::Args),
    Gate(gate::Args),
    SignIn(session::SignInArgs),
    SignOut(session::SignOutArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
