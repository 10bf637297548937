use crate::error::Result;
use crate::keyboard::KeyboardOutput;
use crate::store::PhraseStore;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// What a substitution actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionOutcome {
    /// Number of synthetic backspaces sent
    pub erased: usize,
    /// Whether a replacement was typed
    pub injected: bool,
}

/// Erases a typed abbreviation and types its stored phrase in its place
pub struct SubstitutionExecutor {
    store: Arc<dyn PhraseStore>,
    output: Box<dyn KeyboardOutput>,
    erase_delay: Duration,
    settle_delay: Duration,
}

impl SubstitutionExecutor {
    pub fn new(store: Arc<dyn PhraseStore>, output: Box<dyn KeyboardOutput>) -> Self {
        Self {
            store,
            output,
            erase_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }

    /// Pause before each synthetic backspace
    pub fn with_erase_delay(mut self, delay: Duration) -> Self {
        self.erase_delay = delay;
        self
    }

    /// Pause after the last synthetic keystroke, before `execute` returns
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Backspaces needed for `key`: the key itself plus the trigger keystroke,
    /// which has already reached the focused application.
    pub fn erase_count(key: &str) -> usize {
        key.chars().count() + 1
    }

    /// Erase `key` and its trigger, then type the phrase currently stored
    /// for it. A key whose value vanished since the match is erased but
    /// nothing is typed.
    #[instrument(skip(self))]
    pub fn execute(&mut self, key: &str, buffer_len: usize) -> Result<SubstitutionOutcome> {
        let erased = Self::erase_count(key);
        for _ in 0..erased {
            if !self.erase_delay.is_zero() {
                thread::sleep(self.erase_delay);
            }
            self.output.erase_backward()?;
        }

        let value = match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Phrase lookup failed, nothing injected");
                None
            }
        };

        let injected = match value {
            Some(value) => {
                self.output.type_text(&value)?;
                info!(chars = value.chars().count(), "Phrase expanded");
                true
            }
            None => {
                warn!("Phrase no longer in catalog, nothing injected");
                false
            }
        };

        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        Ok(SubstitutionOutcome { erased, injected })
    }
}
