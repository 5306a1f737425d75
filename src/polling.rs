//! Cancellable polling with backoff.
//!
//! A [`PollingTask`] owns a spawned loop that sleeps and checks again until
//! the check reports [`PollStatus::Ready`] or fails. Dropping or stopping the
//! task aborts the loop, so pollers never outlive the flow that started them.

use rand::Rng;
use std::{future::Future, time::Duration};
use tokio::{sync::oneshot, task::JoinHandle, time::sleep};
use tracing::debug;

/// Delay schedule between checks: `initial * factor^attempt`, capped at `max`,
/// shortened by up to `jitter` (0.0 - 1.0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub factor: u32,
    pub jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(2),
            max: Duration::from_secs(10),
            factor: 2,
            jitter: 0.1,
        }
    }
}

impl Backoff {
    /// Fixed interval without growth or jitter.
    #[must_use]
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial: interval,
            max: interval,
            factor: 1,
            jitter: 0.0,
        }
    }

    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = self
            .initial
            .saturating_mul(self.factor.max(1).saturating_pow(attempt))
            .min(self.max);

        let jitter = self.jitter.clamp(0.0, 1.0);
        if jitter == 0.0 {
            return base;
        }

        let mut rng = rand::thread_rng();
        base.mul_f64(rng.gen_range((1.0 - jitter)..=1.0))
    }
}

/// Outcome of a single check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStatus<T> {
    Pending,
    Ready(T),
}

pub struct PollingTask<T, E> {
    handle: JoinHandle<()>,
    result: Option<oneshot::Receiver<Result<T, E>>>,
}

impl<T, E> PollingTask<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Starts polling. The first check runs after `backoff.delay(0)`.
    pub fn start<F, Fut>(backoff: Backoff, mut check: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<PollStatus<T>, E>> + Send,
    {
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut attempt: u32 = 0;
            loop {
                let delay = backoff.delay(attempt);
                debug!(?delay, attempt, "next poll");
                sleep(delay).await;

                match check().await {
                    Ok(PollStatus::Pending) => attempt = attempt.saturating_add(1),
                    Ok(PollStatus::Ready(value)) => {
                        let _ = tx.send(Ok(value));
                        return;
                    }
                    Err(err) => {
                        let _ = tx.send(Err(err));
                        return;
                    }
                }
            }
        });

        Self {
            handle,
            result: Some(rx),
        }
    }

    /// Aborts the loop; [`Self::finished`] then returns `None`.
    pub fn stop(&mut self) {
        self.handle.abort();
        self.result = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.result.is_some() && !self.handle.is_finished()
    }

    /// Waits for the final result. `None` if the task was stopped.
    pub async fn finished(&mut self) -> Option<Result<T, E>> {
        let receiver = self.result.as_mut()?;
        let result = receiver.await.ok();
        self.result = None;
        result
    }
}

impl<T, E> Drop for PollingTask<T, E> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
