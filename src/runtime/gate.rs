//! Drives the page gate: token exchange, the 2FA check, nested setup flows
//! and companion pairing.

use super::{run_modal, AbortOnDrop, InputSource};
use crate::{
    api::ApiError,
    flows::{
        gate::{GateEffect, GateEvent, GateFlow, GateOutcome, GateStep},
        setup::{SetupFlow, SetupMode},
    },
    identity::{
        types::{PairingCode, TokenState},
        Identity2FAClient, IdentityProxyClient,
    },
    polling::{Backoff, PollStatus, PollingTask},
    view::{self, command::Command, FlowView},
};
use anyhow::Result;
use std::{collections::VecDeque, future::Future};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

enum Message {
    Event(GateEvent),
    Pairing(Result<PairingCode, ApiError>),
}

struct GateDriver<'a> {
    client: &'a Identity2FAClient,
    proxy: &'a IdentityProxyClient,
    messages: mpsc::UnboundedSender<Message>,
    backoff: Backoff,
    access_token: Option<String>,
    poller: Option<AbortOnDrop>,
}

impl GateDriver<'_> {
    fn spawn_call<F>(&self, call: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let messages = self.messages.clone();
        tokio::spawn(async move {
            if messages.send(call.await).is_err() {
                debug!("gate closed before the call completed");
            }
        });
    }

    fn poll_pairing(&mut self) {
        let Some(token) = self.access_token.clone() else {
            warn!("pairing poll requested without an access token");
            let error = ApiError::Config("missing pairing token".to_string());
            let _ = self
                .messages
                .send(Message::Event(GateEvent::Paired(Err(error))));
            return;
        };

        let proxy = self.proxy.clone();
        let mut task = PollingTask::start(self.backoff, move || {
            let proxy = proxy.clone();
            let token = token.clone();
            async move {
                proxy.check_token(&token).await.map(|state| match state {
                    TokenState::Pending => PollStatus::Pending,
                    other => PollStatus::Ready(other),
                })
            }
        });

        let messages = self.messages.clone();
        self.poller = Some(AbortOnDrop::spawn(async move {
            if let Some(result) = task.finished().await {
                let _ = messages.send(Message::Event(GateEvent::Paired(result)));
            }
        }));
    }

    /// Runs `effects` in order. Setup modals run to completion inline and
    /// queue their outcome.
    async fn execute<V: FlowView>(
        &mut self,
        effects: Vec<GateEffect>,
        input: &InputSource,
        view: &mut V,
        queue: &mut VecDeque<GateEvent>,
    ) -> Result<Option<GateOutcome>> {
        for effect in effects {
            match effect {
                GateEffect::Exchange(token) => {
                    let proxy = self.proxy.clone();
                    let session = self.client.api().session().clone();
                    self.spawn_call(async move {
                        let result = match proxy.exchange(&token).await {
                            Ok(access) => session
                                .sign_in(&access.access_token)
                                .map_err(|err| ApiError::Config(err.to_string())),
                            Err(err) => Err(err),
                        };
                        Message::Event(GateEvent::Exchanged(result))
                    });
                }
                GateEffect::FetchStatus => {
                    let client = self.client.clone();
                    self.spawn_call(async move {
                        Message::Event(GateEvent::Status(client.status().await))
                    });
                }
                GateEffect::OpenModal { mode, apps } => {
                    let mut flow = match mode {
                        SetupMode::Enroll(kind) => SetupFlow::enroll(kind, apps),
                        SetupMode::Authenticate(instance) => SetupFlow::authenticate(instance),
                    };
                    let outcome = run_modal(self.client, &mut flow, input, view).await?;
                    queue.push_back(GateEvent::ModalClosed(outcome));
                }
                GateEffect::RequestPairingCode => {
                    let proxy = self.proxy.clone();
                    self.spawn_call(async move {
                        Message::Pairing(proxy.request_pairing_code().await)
                    });
                }
                GateEffect::PollPairing => self.poll_pairing(),
                GateEffect::StopPolling => self.poller = None,
                GateEffect::Finish(outcome) => return Ok(Some(outcome)),
            }
        }
        Ok(None)
    }
}

fn command_events(command: Command) -> Vec<GateEvent> {
    match command {
        Command::Enter => vec![GateEvent::Enter],
        Command::More => vec![GateEvent::ShowMore],
        Command::Search(query) | Command::Text(query) => vec![GateEvent::Search(query)],
        Command::Pick(_) => command
            .position()
            .map(GateEvent::Choose)
            .into_iter()
            .collect(),
        Command::Cancel | Command::Resend | Command::Unknown(_) => {
            debug!("command ignored by the gate");
            Vec::new()
        }
    }
}

/// Runs the gate until it settles. `/cancel` or end of input leaves with
/// [`GateOutcome::Aborted`].
///
/// # Errors
/// Returns an error if the view cannot be written.
pub async fn run_gate<V: FlowView>(
    client: &Identity2FAClient,
    proxy: &IdentityProxyClient,
    gate: &mut GateFlow,
    input: &InputSource,
    view: &mut V,
) -> Result<GateOutcome> {
    run_gate_with(client, proxy, gate, input, view, Backoff::default()).await
}

pub(crate) async fn run_gate_with<V: FlowView>(
    client: &Identity2FAClient,
    proxy: &IdentityProxyClient,
    gate: &mut GateFlow,
    input: &InputSource,
    view: &mut V,
    backoff: Backoff,
) -> Result<GateOutcome> {
    let mut binding = input.bind();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = GateDriver {
        client,
        proxy,
        messages: tx,
        backoff,
        access_token: None,
        poller: None,
    };
    let mut queue = VecDeque::from([GateEvent::Start]);

    loop {
        while let Some(event) = queue.pop_front() {
            let effects = gate.update(event);
            if let Some(outcome) = driver.execute(effects, input, view, &mut queue).await? {
                view.render(&view::gate::screen(gate))?;
                info!(?outcome, "gate finished");
                return Ok(outcome);
            }
        }
        let screen = view::gate::screen(gate);
        view.render(&screen)?;
        // pairing can take a while and stays cancellable
        let reading = !screen.busy || matches!(gate.step(), GateStep::Pairing { .. });

        tokio::select! {
            line = binding.next(), if reading => match line.as_deref().map(Command::parse) {
                Some(Command::Cancel) | None => {
                    info!(step = gate.step().name(), "gate left before it settled");
                    return Ok(GateOutcome::Aborted);
                }
                Some(command) => queue.extend(command_events(command)),
            },
            Some(message) = rx.recv() => match message {
                Message::Event(event) => queue.push_back(event),
                Message::Pairing(result) => {
                    let result = result.map(|code| {
                        driver.access_token = Some(code.access_token);
                        code.auth_code
                    });
                    queue.push_back(GateEvent::PairingIssued(result));
                }
            },
        }
    }
}
