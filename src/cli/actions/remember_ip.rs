use crate::{
    cli::{actions::status, globals::GlobalArgs},
    flows::Toast,
    identity::Identity2FAClient,
    view::{self, FlowView, TerminalView},
};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub remember_ip: bool,
}

/// Saves the preference and renders the updated overview.
///
/// # Errors
/// Returns an error if the status or update call fails.
pub async fn run<V: FlowView>(
    client: &Identity2FAClient,
    remember_ip: bool,
    out: &mut V,
) -> Result<()> {
    let mut overview = status::show(client, out).await?;
    overview
        .update_remember_ip(client, remember_ip)
        .await
        .context("failed to update remember-IP")?;
    info!(remember_ip, "remember-IP updated");

    out.toast(&Toast::success("Your settings have been saved."))?;
    out.render(&view::security::screen(&overview))?;
    Ok(())
}

/// Execute the remember-ip action.
/// # Errors
/// Returns an error if the update fails.
pub async fn execute(args: Args) -> Result<()> {
    let (client, _) = args.globals.clients()?;
    run(&client, args.remember_ip, &mut TerminalView::stdout()).await
}
