use crate::{
    cli::globals::GlobalArgs,
    flows::security::SecurityOverview,
    identity::Identity2FAClient,
    view::{self, FlowView, TerminalView},
};
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Loads the overview and renders it on `out`.
///
/// # Errors
/// Returns an error if the status call fails or the view cannot be written.
pub async fn show<V: FlowView>(
    client: &Identity2FAClient,
    out: &mut V,
) -> Result<SecurityOverview> {
    let overview = SecurityOverview::load(client)
        .await
        .context("failed to load 2FA status")?;
    out.render(&view::security::screen(&overview))?;
    Ok(overview)
}

/// Execute the status action.
/// # Errors
/// Returns an error if the status cannot be fetched.
pub async fn execute(args: Args) -> Result<()> {
    let (client, _) = args.globals.clients()?;
    show(&client, &mut TerminalView::stdout()).await?;
    Ok(())
}
