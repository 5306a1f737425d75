use crate::{
    cli::globals::GlobalArgs,
    flows::gate::{GateFlow, GateOutcome},
    identity::ExchangeToken,
    runtime::{run_gate, InputSource},
    view::{command::HELP, TerminalView},
};
use anyhow::{bail, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub token: Option<ExchangeToken>,
    pub mobile: bool,
}

/// Execute the gate action.
/// # Errors
/// Returns an error if the gate ends in its error step.
pub async fn execute(args: Args) -> Result<()> {
    let (client, proxy) = args.globals.clients()?;
    println!("{HELP}");

    let mut gate = GateFlow::new(args.token, args.mobile);
    let outcome = run_gate(
        &client,
        &proxy,
        &mut gate,
        &InputSource::stdin(),
        &mut TerminalView::stdout(),
    )
    .await?;

    match outcome {
        GateOutcome::Ready | GateOutcome::Aborted => Ok(()),
        GateOutcome::Failed(message) => bail!(message),
    }
}
