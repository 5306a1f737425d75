//! Line input shared by nested flows.
//!
//! Listeners form a stack: only the most recent [`InputBinding`] receives
//! lines, and dropping it hands input back to the one below. A modal opened
//! from the gate therefore takes over the keyboard while it is open and
//! releases it on every exit path.
//!
//! Lines that arrive while nobody listens are held and handed to the next
//! binding, so input piped in before a flow starts is not lost.

use std::{
    collections::VecDeque,
    io::BufRead,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::mpsc;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct Listeners {
    stack: Vec<(u64, mpsc::UnboundedSender<String>)>,
    pending: VecDeque<String>,
    next_id: u64,
    closed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InputSource {
    listeners: Arc<Mutex<Listeners>>,
}

impl InputSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds lines read from stdin on a dedicated thread. End of input closes
    /// every binding.
    #[must_use]
    pub fn stdin() -> Self {
        let source = Self::new();
        let feeder = source.clone();

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        feeder.dispatch(line);
                    }
                    Err(err) => {
                        debug!(error = %err, "stdin read failed");
                        break;
                    }
                }
            }
            feeder.close();
        });

        source
    }

    fn lock(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends `line` to the top listener, or holds it for the next binding.
    /// Returns `false` once input is closed.
    pub fn dispatch(&self, line: impl Into<String>) -> bool {
        let mut guard = self.lock();
        let listeners = &mut *guard;
        if listeners.closed {
            return false;
        }
        match listeners.stack.last() {
            Some((id, sender)) => {
                trace!(listener = id, "input line");
                sender.send(line.into()).is_ok()
            }
            None => {
                trace!(pending = listeners.pending.len() + 1, "input line held");
                listeners.pending.push_back(line.into());
                true
            }
        }
    }

    /// Ends input: current and future bindings see end-of-input after any
    /// held lines.
    pub fn close(&self) {
        let mut listeners = self.lock();
        listeners.closed = true;
        listeners.stack.clear();
    }

    /// Pushes a new listener on top of the stack. Held lines are delivered
    /// to it first.
    #[must_use]
    pub fn bind(&self) -> InputBinding {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut listeners = self.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;

        for line in listeners.pending.drain(..) {
            let _ = sender.send(line);
        }

        if !listeners.closed {
            listeners.stack.push((id, sender));
        }

        InputBinding {
            id,
            receiver,
            source: self.clone(),
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().stack.len()
    }
}

/// A scoped input listener; unregistered on drop.
#[derive(Debug)]
pub struct InputBinding {
    id: u64,
    receiver: mpsc::UnboundedReceiver<String>,
    source: InputSource,
}

impl InputBinding {
    /// Next line, or `None` at end of input.
    pub async fn next(&mut self) -> Option<String> {
        self.receiver.recv().await
    }
}

impl Drop for InputBinding {
    fn drop(&mut self) {
        let mut listeners = self.source.lock();
        listeners.stack.retain(|(id, _)| *id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn top_binding_receives_lines() {
        let source = InputSource::new();
        let mut outer = source.bind();

        {
            let mut inner = source.bind();
            assert_eq!(source.listener_count(), 2);
            assert!(source.dispatch("123456"));
            assert_eq!(inner.next().await.as_deref(), Some("123456"));
        }

        assert_eq!(source.listener_count(), 1);
        assert!(source.dispatch("enter"));
        assert_eq!(outer.next().await.as_deref(), Some("enter"));
    }

    #[test]
    fn repeated_binds_do_not_leak() {
        let source = InputSource::new();
        for _ in 0..10 {
            let _binding = source.bind();
        }
        assert_eq!(source.listener_count(), 0);
    }

    #[tokio::test]
    async fn lines_before_bind_are_delivered() {
        let source = InputSource::new();
        assert!(source.dispatch("0612345678"));
        assert!(source.dispatch("123456"));
        source.close();
        assert!(!source.dispatch("late"));

        let mut binding = source.bind();
        assert_eq!(binding.next().await.as_deref(), Some("0612345678"));
        assert_eq!(binding.next().await.as_deref(), Some("123456"));
        assert_eq!(binding.next().await, None);

        let mut next = source.bind();
        assert_eq!(next.next().await, None);
    }

    #[tokio::test]
    async fn close_ends_current_and_future_bindings() {
        let source = InputSource::new();
        let mut binding = source.bind();
        source.close();
        assert_eq!(binding.next().await, None);

        let mut late = source.bind();
        assert_eq!(late.next().await, None);
        assert_eq!(source.listener_count(), 0);
    }
}
