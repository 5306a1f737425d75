use crate::{
    cli::globals::GlobalArgs,
    flows::{deactivate::DeactivateFlow, security::SecurityOverview, Outcome},
    identity::Identity2FAClient,
    runtime::{run_modal, InputSource},
    view::{self, command::HELP, FlowView, TerminalView},
};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub uuid: String,
}

/// Runs the deactivate flow for the active factor `uuid`.
///
/// # Errors
/// Returns an error if the status cannot be loaded, no active factor has
/// that id, or the view cannot be written.
pub async fn run<V: FlowView>(
    client: &Identity2FAClient,
    uuid: &str,
    input: &InputSource,
    out: &mut V,
) -> Result<Outcome> {
    let mut overview = SecurityOverview::load(client)
        .await
        .context("failed to load 2FA status")?;

    let instance = overview
        .state()
        .active_providers
        .iter()
        .find(|provider| provider.uuid == uuid)
        .cloned()
        .with_context(|| format!("no active factor with id {uuid}"))?;

    let mut flow = DeactivateFlow::new(instance);
    let outcome = run_modal(client, &mut flow, input, out).await?;
    info!(?outcome, "deactivate finished");

    if let Some(toast) = overview.refresh_after(client, outcome).await {
        out.toast(&toast)?;
    }
    if outcome == Outcome::Done {
        out.render(&view::security::screen(&overview))?;
    }
    Ok(outcome)
}

/// Execute the deactivate action.
/// # Errors
/// Returns an error if the flow cannot run.
pub async fn execute(args: Args) -> Result<()> {
    let (client, _) = args.globals.clients()?;
    println!("{HELP}");
    run(
        &client,
        &args.uuid,
        &InputSource::stdin(),
        &mut TerminalView::stdout(),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{ApiClient, ApiConfig},
        session::SessionContext,
        view::RecordingView,
    };
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn unknown_uuid_is_an_error() -> Result<()> {
        if TcpListener::bind("127.0.0.1:0").is_err() {
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity/2fa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let client = Identity2FAClient::new(ApiClient::new(
            ApiConfig::new(server.uri(), "webshop"),
            SessionContext::in_memory(Some("token".to_string())),
        )?);
        let input = InputSource::new();
        let mut out = RecordingView::default();
        let result = run(&client, "missing", &input, &mut out).await;
        assert!(result.is_err_and(|err| err.to_string().contains("missing")));
        Ok(())
    }
}
