#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use identity_2fa::{
    api::{ApiClient, ApiConfig},
    flows::{
        gate::{GateFlow, GateOutcome, GateStep},
        setup::SetupFlow,
        Outcome, Toast,
    },
    identity::{Identity2FAClient, IdentityProxyClient, ProviderKind},
    runtime::{run_gate, run_modal, InputSource},
    session::SessionContext,
    view::{FlowView, Screen},
};
use serde_json::{json, Value};
use std::{collections::VecDeque, net::TcpListener};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn clients(server: &MockServer) -> (Identity2FAClient, IdentityProxyClient) {
    let api = ApiClient::new(
        ApiConfig::new(server.uri(), "webshop").with_client_key(Some("k3y".to_string())),
        SessionContext::in_memory(Some("token".to_string())),
    )
    .expect("valid config");
    (
        Identity2FAClient::new(api.clone()),
        IdentityProxyClient::new(api),
    )
}

/// Answers each expected step once it is shown idle, and closes input when
/// `stop_at` appears.
struct Driver {
    input: InputSource,
    script: VecDeque<(&'static str, &'static str)>,
    stop_at: Option<&'static str>,
    idle: Option<&'static str>,
    steps: Vec<&'static str>,
    screens: Vec<Screen>,
    toasts: Vec<Toast>,
}

impl Driver {
    fn new(input: &InputSource, script: &[(&'static str, &'static str)]) -> Self {
        Self {
            input: input.clone(),
            script: script.iter().copied().collect(),
            stop_at: None,
            idle: None,
            steps: Vec::new(),
            screens: Vec::new(),
            toasts: Vec::new(),
        }
    }

    fn stop_at(mut self, step: &'static str) -> Self {
        self.stop_at = Some(step);
        self
    }
}

impl FlowView for Driver {
    fn render(&mut self, screen: &Screen) -> Result<()> {
        if self.steps.last() != Some(&screen.step) {
            self.steps.push(screen.step);
        }
        self.screens.push(screen.clone());

        if self.stop_at == Some(screen.step) {
            self.input.close();
            return Ok(());
        }

        let became_idle = !screen.busy && self.idle != Some(screen.step);
        self.idle = (!screen.busy).then_some(screen.step);
        if became_idle && self.script.front().is_some_and(|(step, _)| *step == screen.step) {
            if let Some((_, line)) = self.script.pop_front() {
                self.input.dispatch(line);
            }
        }
        Ok(())
    }

    fn toast(&mut self, toast: &Toast) -> Result<()> {
        self.toasts.push(toast.clone());
        Ok(())
    }
}

fn provider_types() -> Value {
    json!([
        {"type": "authenticator", "title": "Authenticator app"},
        {"type": "phone", "title": "Phone number"}
    ])
}

fn phone_instance(uuid: &str, state: &str) -> Value {
    json!({
        "uuid": uuid,
        "state": state,
        "provider_type": {"type": "phone", "title": "Phone number"},
        "phone": "+31612345678"
    })
}

#[tokio::test]
async fn phone_enrollment_confirms_and_succeeds() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/2fa"))
        .and(header("Client-Type", "webshop"))
        .and(header("Client-Key", "k3y"))
        .and(body_json(json!({"type": "phone", "phone": "+31612345678"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": phone_instance("abc", "pending")})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/identity/2fa/abc/activate"))
        .and(body_json(json!({"code": "123456"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = clients(&server);
    let input = InputSource::new();
    let mut view = Driver::new(
        &input,
        &[
            ("phone_setup", "612345678"),
            ("provider_confirmation", "123456"),
            ("success", ""),
        ],
    );
    let mut flow = SetupFlow::enroll(ProviderKind::Phone, Vec::new());

    let outcome = run_modal(&client, &mut flow, &input, &mut view).await?;

    assert_eq!(outcome, Outcome::Done);
    assert_eq!(
        view.steps,
        vec!["phone_setup", "provider_confirmation", "success"]
    );
    Ok(())
}

#[tokio::test]
async fn rate_limited_authenticator_enrollment_closes() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/2fa"))
        .and(body_json(json!({"type": "authenticator"})))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"message": "Too many attempts"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = clients(&server);
    let input = InputSource::new();
    let mut view = Driver::new(&input, &[]);
    let mut flow = SetupFlow::enroll(ProviderKind::Authenticator, Vec::new());

    let outcome = run_modal(&client, &mut flow, &input, &mut view).await?;

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(view.steps, vec!["starting"]);
    assert_eq!(view.toasts, vec![Toast::error("Too many attempts")]);
    Ok(())
}

#[tokio::test]
async fn gate_without_active_factors_offers_setup() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/identity/2fa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"required": true, "confirmed": false, "provider_types": provider_types()}
        })))
        .mount(&server)
        .await;

    let (client, proxy) = clients(&server);
    let input = InputSource::new();
    let mut view = Driver::new(&input, &[]).stop_at("setup");
    let mut gate = GateFlow::new(None, false);

    let outcome = run_gate(&client, &proxy, &mut gate, &input, &mut view).await?;

    assert_eq!(outcome, GateOutcome::Aborted);
    let GateStep::Setup { provider_types } = gate.step() else {
        panic!("expected setup, got {:?}", gate.step());
    };
    assert_eq!(provider_types.options().len(), 2);
    Ok(())
}

#[tokio::test]
async fn gate_with_active_phone_offers_only_phone() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/identity/2fa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "required": true,
                "confirmed": false,
                "provider_types": provider_types(),
                "active_providers": [phone_instance("abc", "active")]
            }
        })))
        .mount(&server)
        .await;

    let (client, proxy) = clients(&server);
    let input = InputSource::new();
    let mut view = Driver::new(&input, &[]).stop_at("auth");
    let mut gate = GateFlow::new(None, false);

    run_gate(&client, &proxy, &mut gate, &input, &mut view).await?;

    let GateStep::Auth { provider_types } = gate.step() else {
        panic!("expected auth, got {:?}", gate.step());
    };
    let kinds: Vec<ProviderKind> = provider_types.options().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![ProviderKind::Phone]);
    Ok(())
}

#[tokio::test]
async fn gate_status_failure_is_terminal() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/identity/2fa"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Down"})))
        .mount(&server)
        .await;

    let (client, proxy) = clients(&server);
    let input = InputSource::new();
    let mut view = Driver::new(&input, &[]);
    let mut gate = GateFlow::new(None, false);

    let outcome = run_gate(&client, &proxy, &mut gate, &input, &mut view).await?;

    assert_eq!(outcome, GateOutcome::Failed("Down".to_string()));
    assert_eq!(view.steps.last(), Some(&"error"));
    Ok(())
}
