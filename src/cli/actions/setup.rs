use crate::{
    cli::globals::GlobalArgs,
    flows::{security::SecurityOverview, setup::SetupFlow, Outcome},
    identity::{catalog::authenticator_apps_or_default, Identity2FAClient, ProviderKind},
    runtime::{run_modal, InputSource},
    view::{self, command::HELP, FlowView, TerminalView},
};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub kind: ProviderKind,
    /// Verify with the active factor instead of enrolling a new one.
    pub auth: bool,
}

/// Runs the setup flow, then refreshes and shows the overview when it
/// finished.
///
/// # Errors
/// Returns an error if the status cannot be loaded, `auth` is set without
/// an active factor of `kind`, or the view cannot be written.
pub async fn run<V: FlowView>(
    client: &Identity2FAClient,
    kind: ProviderKind,
    auth: bool,
    input: &InputSource,
    out: &mut V,
) -> Result<Outcome> {
    let mut overview = SecurityOverview::load(client)
        .await
        .context("failed to load 2FA status")?;

    let mut flow = if auth {
        let instance = overview
            .state()
            .active_provider(kind)
            .cloned()
            .with_context(|| format!("no active {kind} factor to verify with"))?;
        SetupFlow::authenticate(instance)
    } else {
        let apps = authenticator_apps_or_default(&overview.state().authenticator_apps());
        SetupFlow::enroll(kind, apps)
    };

    let outcome = run_modal(client, &mut flow, input, out).await?;
    info!(%kind, auth, ?outcome, "setup finished");

    if let Some(toast) = overview.refresh_after(client, outcome).await {
        out.toast(&toast)?;
    }
    if outcome == Outcome::Done {
        out.render(&view::security::screen(&overview))?;
    }
    Ok(outcome)
}

/// Execute the setup action.
/// # Errors
/// Returns an error if the flow cannot run.
pub async fn execute(args: Args) -> Result<()> {
    let (client, _) = args.globals.clients()?;
    println!("{HELP}");
    run(
        &client,
        args.kind,
        args.auth,
        &InputSource::stdin(),
        &mut TerminalView::stdout(),
    )
    .await?;
    Ok(())
}
