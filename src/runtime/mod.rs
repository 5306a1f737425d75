//! Executes flow effects against the API and feeds results back as events.
//!
//! Every API call runs in its own task and reports through the flow's event
//! channel. When a flow returns, its receiver is dropped and late results
//! are discarded. Timers are owned through [`AbortOnDrop`] so none outlive
//! the flow.

mod gate;
pub mod input;

pub use gate::run_gate;
pub use input::{InputBinding, InputSource};

use crate::{
    flows::{
        deactivate::DeactivateFlow,
        setup::{SetupFlow, SetupStep},
        Effect, Event, Outcome,
    },
    identity::Identity2FAClient,
    view::{self, command::Command, FlowView, Screen},
};
use anyhow::Result;
use std::{future::Future, time::Duration};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, sleep, Instant},
};
use tracing::{debug, info};

/// A task handle that aborts the task when dropped.
#[derive(Debug)]
pub struct AbortOnDrop(JoinHandle<()>);

impl AbortOnDrop {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self(tokio::spawn(future))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Sends `T` on a fixed one-second interval until the receiver is gone.
pub(crate) fn ticker<T, F>(tx: mpsc::UnboundedSender<T>, mut make: F) -> AbortOnDrop
where
    T: Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    AbortOnDrop::spawn(async move {
        let period = Duration::from_secs(1);
        let mut interval = interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            if tx.send(make()).is_err() {
                break;
            }
        }
    })
}

/// A modal flow the runtime can drive.
pub trait Modal {
    fn mount(&mut self) -> Vec<Effect>;
    fn update(&mut self, event: Event) -> Vec<Effect>;
    fn screen(&self) -> Screen;
    /// Events for free text typed on the current step.
    fn text(&self, text: String) -> Vec<Event>;
}

impl Modal for SetupFlow {
    fn mount(&mut self) -> Vec<Effect> {
        SetupFlow::mount(self)
    }

    fn update(&mut self, event: Event) -> Vec<Effect> {
        SetupFlow::update(self, event)
    }

    fn screen(&self) -> Screen {
        view::setup::screen(self)
    }

    fn text(&self, text: String) -> Vec<Event> {
        match self.step() {
            SetupStep::PhoneSetup { .. } => vec![Event::PhoneInput(text), Event::Enter],
            SetupStep::ProviderConfirmation { .. } | SetupStep::ProviderVerification { .. } => {
                vec![Event::CodeInput(text), Event::Enter]
            }
            SetupStep::ProviderSelect { .. } => vec![Event::Search(text)],
            _ => Vec::new(),
        }
    }
}

impl Modal for DeactivateFlow {
    fn mount(&mut self) -> Vec<Effect> {
        DeactivateFlow::mount(self)
    }

    fn update(&mut self, event: Event) -> Vec<Effect> {
        DeactivateFlow::update(self, event)
    }

    fn screen(&self) -> Screen {
        view::deactivate::screen(self)
    }

    fn text(&self, text: String) -> Vec<Event> {
        vec![Event::CodeInput(text), Event::Enter]
    }
}

fn command_events<M: Modal>(modal: &M, command: Command) -> Vec<Event> {
    match command {
        Command::Enter => vec![Event::Enter],
        Command::Cancel => vec![Event::Cancel],
        Command::Resend => vec![Event::Resend],
        Command::More => vec![Event::ShowMore],
        Command::Search(query) => vec![Event::Search(query)],
        Command::Pick(_) => command.position().map(Event::Choose).into_iter().collect(),
        Command::Text(text) => modal.text(text),
        Command::Unknown(line) => {
            debug!(%line, "unknown command");
            Vec::new()
        }
    }
}

/// Effect interpreter bound to one modal run.
struct Driver<'a, V: FlowView> {
    client: &'a Identity2FAClient,
    view: &'a mut V,
    events: mpsc::UnboundedSender<Event>,
    cooldown: Option<AbortOnDrop>,
}

impl<V: FlowView> Driver<'_, V> {
    fn spawn_call<F>(&self, call: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = call.await;
            if events.send(event).is_err() {
                debug!("flow closed before the call completed");
            }
        });
    }

    /// Shows the current screen; returns whether the flow is waiting on a call.
    fn render<M: Modal>(&mut self, modal: &M) -> Result<bool> {
        let screen = modal.screen();
        self.view.render(&screen)?;
        Ok(screen.busy)
    }

    /// Runs `effects` in order; returns the outcome if one of them closes the flow.
    fn execute(&mut self, effects: Vec<Effect>) -> Result<Option<Outcome>> {
        for effect in effects {
            match effect {
                Effect::Store(request) => {
                    let client = self.client.clone();
                    self.spawn_call(async move { Event::Stored(client.store(&request).await) });
                }
                Effect::Send { uuid, notify } => {
                    let client = self.client.clone();
                    self.spawn_call(async move {
                        Event::Sent {
                            result: client.send(&uuid).await,
                            notify,
                        }
                    });
                }
                Effect::Activate { uuid, request } => {
                    let client = self.client.clone();
                    self.spawn_call(async move {
                        Event::Activated(client.activate(&uuid, &request).await)
                    });
                }
                Effect::Authenticate { uuid, request } => {
                    let client = self.client.clone();
                    self.spawn_call(async move {
                        Event::Authenticated(client.authenticate(&uuid, &request).await)
                    });
                }
                Effect::Deactivate { uuid, request } => {
                    let client = self.client.clone();
                    self.spawn_call(async move {
                        Event::Deactivated(client.deactivate(&uuid, &request).await)
                    });
                }
                Effect::StartCooldown => {
                    self.cooldown = Some(ticker(self.events.clone(), || Event::Tick));
                }
                Effect::StopCooldown => {
                    self.cooldown = None;
                }
                Effect::ScheduleUnlock(delay) => {
                    self.spawn_call(async move {
                        sleep(delay).await;
                        Event::Unlock
                    });
                }
                Effect::Toast(toast) => self.view.toast(&toast)?,
                Effect::Close(outcome) => return Ok(Some(outcome)),
            }
        }
        Ok(None)
    }
}

/// Drives `modal` until it closes. Input is bound for the duration of the
/// call and read only while no call is outstanding; end of input cancels.
///
/// # Errors
/// Returns an error if the view cannot be written.
pub async fn run_modal<M, V>(
    client: &Identity2FAClient,
    modal: &mut M,
    input: &InputSource,
    view: &mut V,
) -> Result<Outcome>
where
    M: Modal,
    V: FlowView,
{
    let mut binding = input.bind();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = Driver {
        client,
        view,
        events: tx,
        cooldown: None,
    };

    let effects = modal.mount();
    let mut busy = driver.render(modal)?;
    if let Some(outcome) = driver.execute(effects)? {
        return Ok(outcome);
    }

    loop {
        // Lines wait in the binding while a call is outstanding, so typed-ahead
        // or piped input reaches the step it was meant for.
        let events = tokio::select! {
            line = binding.next(), if !busy => match line {
                Some(line) => command_events(modal, Command::parse(&line)),
                None => vec![Event::Cancel],
            },
            Some(event) = rx.recv() => vec![event],
        };

        for event in events {
            let effects = modal.update(event);
            if let Some(outcome) = driver.execute(effects)? {
                info!(?outcome, "flow closed");
                return Ok(outcome);
            }
            // ticks re-render too so the resend countdown keeps moving
            busy = driver.render(modal)?;
        }
    }
}
