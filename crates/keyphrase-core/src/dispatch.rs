//! Hand-off between the platform hook and the engine thread.
//!
//! The hook callback must return quickly and must never see the engine's
//! own synthetic output as user input. It only offers events through a
//! [`KeyGate`]; the engine runs on its own thread and holds the shared
//! [`ReentrancyGuard`] for the whole of a substitution, during which every
//! offered event is discarded.

use crate::engine::{Engine, KeyOutcome};
use crate::error::Result;
use crate::guard::ReentrancyGuard;
use crate::keyboard::KeyEvent;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// What happened to an offered event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Accepted,
    /// A substitution was running, or the engine fell too far behind
    Dropped,
    /// The engine thread has stopped
    Closed,
}

/// Sending side used by the hook. Never blocks.
#[derive(Clone)]
pub struct KeyGate {
    guard: ReentrancyGuard,
    tx: SyncSender<KeyEvent>,
}

impl KeyGate {
    pub fn offer(&self, event: KeyEvent) -> Offer {
        if self.guard.is_held() {
            debug!(?event, "Substitution in progress, dropping key");
            return Offer::Dropped;
        }

        match self.tx.try_send(event) {
            Ok(()) => Offer::Accepted,
            Err(TrySendError::Full(event)) => {
                warn!(?event, "Key queue full, dropping key");
                Offer::Dropped
            }
            Err(TrySendError::Disconnected(_)) => Offer::Closed,
        }
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }
}

/// Bounded queue from the hook to the engine, gated on `guard`
pub fn key_channel(guard: ReentrancyGuard, capacity: usize) -> (KeyGate, Receiver<KeyEvent>) {
    let (tx, rx) = sync_channel(capacity.max(1));
    (KeyGate { guard, tx }, rx)
}

/// Build an engine on a new thread and feed it every accepted event.
///
/// `build` runs on the engine thread, so the engine's keyboard output never
/// crosses threads. The thread ends once every [`KeyGate`] is dropped and
/// the queue is drained.
pub fn spawn_engine<F>(
    events: Receiver<KeyEvent>,
    build: F,
) -> std::io::Result<JoinHandle<Result<()>>>
where
    F: FnOnce() -> Result<Engine> + Send + 'static,
{
    thread::Builder::new()
        .name("keyphrase-engine".to_string())
        .spawn(move || {
            let mut engine = build()?;
            engine.run(events);
            Ok(())
        })
}

impl Engine {
    /// Handle events until the sending side goes away
    pub fn run(&mut self, events: Receiver<KeyEvent>) {
        for event in events {
            if let KeyOutcome::Substituted { key, injected } = self.handle_key(event) {
                debug!(%key, injected, "Substitution finished");
            }
        }
        info!("Key queue closed, engine stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_guard_drops_without_queueing() {
        let guard = ReentrancyGuard::new();
        let (gate, rx) = key_channel(guard.clone(), 4);

        let token = guard.try_acquire().unwrap();
        assert_eq!(gate.offer(KeyEvent::Character('a')), Offer::Dropped);
        drop(token);

        assert_eq!(gate.offer(KeyEvent::Character('b')), Offer::Accepted);
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::Character('b'));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn full_queue_drops_and_closed_queue_reports() {
        let (gate, rx) = key_channel(ReentrancyGuard::new(), 1);
        assert_eq!(gate.offer(KeyEvent::Space), Offer::Accepted);
        assert_eq!(gate.offer(KeyEvent::Enter), Offer::Dropped);

        drop(rx);
        assert_eq!(gate.offer(KeyEvent::Space), Offer::Closed);
    }
}
