//! The capture path: one call to [`Engine::handle_key`] per physical key-down.
//!
//! ```text
//! key event ── guard held? ──yes──▶ Dropped
//!                  │no
//!              trigger? ──yes──▶ attempt_match(buffer) ──hit──▶ substitute ──▶ Substituted
//!                  │no                     │miss
//!                  ▼                       ▼
//!             classifiers (delete, alphanumeric, space) ──▶ Buffered / Ignored
//! ```

use crate::buffer::KeyBuffer;
use crate::catalog::CatalogWatcher;
use crate::classify::{Classified, Classifiers};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::guard::ReentrancyGuard;
use crate::keyboard::{KeyEvent, KeyboardOutput};
use crate::matcher::MatchEngine;
use crate::models::PhraseKey;
use crate::store::PhraseStore;
use crate::substitution::SubstitutionExecutor;
use crate::trigger::TriggerDetector;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// What the engine did with one key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A substitution was in flight; the event was discarded
    Dropped,
    /// The buffer ended with `key`; it was erased and replaced
    Substituted { key: PhraseKey, injected: bool },
    /// The buffer changed
    Buffered,
    /// The event had no effect
    Ignored,
}

pub struct Engine {
    buffer: KeyBuffer,
    triggers: TriggerDetector,
    classifiers: Classifiers,
    matcher: Arc<MatchEngine>,
    executor: SubstitutionExecutor,
    guard: ReentrancyGuard,
    watcher: CatalogWatcher,
}

impl Engine {
    pub fn new(
        config: &EngineConfig,
        store: Arc<dyn PhraseStore>,
        output: Box<dyn KeyboardOutput>,
    ) -> Result<Self> {
        Self::with_shared(
            config,
            store,
            output,
            Arc::new(MatchEngine::new()),
            ReentrancyGuard::new(),
        )
    }

    /// Build an engine around a matcher set and guard that other threads
    /// already hold, e.g. a catalog watcher started before the capture thread.
    pub fn with_shared(
        config: &EngineConfig,
        store: Arc<dyn PhraseStore>,
        output: Box<dyn KeyboardOutput>,
        matcher: Arc<MatchEngine>,
        guard: ReentrancyGuard,
    ) -> Result<Self> {
        config.validate()?;

        let watcher =
            CatalogWatcher::new(Arc::clone(&store), Arc::clone(&matcher), config.ambiguity);
        let executor = SubstitutionExecutor::new(store, output)
            .with_erase_delay(Duration::from_millis(config.erase_delay_ms))
            .with_settle_delay(Duration::from_millis(config.settle_delay_ms));

        Ok(Self {
            buffer: KeyBuffer::new(config.buffer_size),
            triggers: TriggerDetector::new(config.trigger_set()?),
            classifiers: Classifiers::new(config.unrecognized_keys),
            matcher,
            executor,
            guard,
            watcher,
        })
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        if self.guard.is_held() {
            debug!(?event, "Substitution in progress, dropping key");
            return KeyOutcome::Dropped;
        }

        let classified = if self.triggers.is_trigger(&event) {
            if let Some(key) = self.matcher.attempt_match(&self.buffer) {
                return self.substitute(key);
            }
            // a missed trigger is still ordinary input, but never "unrecognized"
            match self.classifiers.edit(&event, &mut self.buffer) {
                Some(edit) => Classified::Edited(edit),
                None => Classified::Ignored,
            }
        } else {
            self.classifiers.apply(&event, &mut self.buffer)
        };

        match classified {
            Classified::Edited(_) | Classified::Cleared => KeyOutcome::Buffered,
            Classified::Ignored => KeyOutcome::Ignored,
        }
    }

    fn substitute(&mut self, key: PhraseKey) -> KeyOutcome {
        let Some(_token) = self.guard.try_acquire() else {
            return KeyOutcome::Dropped;
        };

        let injected = match self.executor.execute(&key, self.buffer.len()) {
            Ok(outcome) => outcome.injected,
            Err(e) => {
                warn!(key = %key, error = %e, "Substitution failed");
                false
            }
        };
        self.buffer.clear();

        KeyOutcome::Substituted { key, injected }
    }

    pub fn buffer(&self) -> &KeyBuffer {
        &self.buffer
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    pub fn match_engine(&self) -> &Arc<MatchEngine> {
        &self.matcher
    }

    /// Watcher that rebuilds this engine's matcher set; clone it onto its own thread
    pub fn catalog_watcher(&self) -> &CatalogWatcher {
        &self.watcher
    }
}
