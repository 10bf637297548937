//! Keeps the active matcher set in step with the phrase catalog.
//!
//! Every change notification triggers a full rebuild from `PhraseStore::all`.
//! The new set is swapped in by reference, so a concurrent match attempt
//! sees either the complete old set or the complete new one.

use crate::error::Result;
use crate::matcher::{AmbiguityPolicy, MatchEngine, MatcherSet};
use crate::store::PhraseStore;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// "The catalog changed" notification. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogChanged;

#[derive(Clone)]
pub struct CatalogWatcher {
    store: Arc<dyn PhraseStore>,
    engine: Arc<MatchEngine>,
    policy: AmbiguityPolicy,
}

impl CatalogWatcher {
    pub fn new(
        store: Arc<dyn PhraseStore>,
        engine: Arc<MatchEngine>,
        policy: AmbiguityPolicy,
    ) -> Self {
        Self {
            store,
            engine,
            policy,
        }
    }

    /// Rebuild the matcher set from scratch and install it.
    ///
    /// If the store cannot be read the previous set stays active.
    pub fn rebuild(&self) -> Result<usize> {
        let entries = self.store.all()?;
        let set = MatcherSet::from_keys(entries.into_iter().map(|entry| entry.key), self.policy);
        let count = set.len();
        self.engine.install(set);
        info!(phrases = count, "Rebuilt phrase matchers");
        Ok(count)
    }

    /// Rebuild once per notification until the sender side hangs up
    pub fn run(&self, notifications: Receiver<CatalogChanged>) {
        while notifications.recv().is_ok() {
            // one rebuild covers everything queued up behind this notification
            let coalesced = notifications.try_iter().count();
            if coalesced > 0 {
                debug!(coalesced, "Coalesced catalog notifications");
            }

            if let Err(e) = self.rebuild() {
                warn!(error = %e, "Catalog rebuild failed, keeping previous matchers");
            }
        }
        debug!("Catalog notification channel closed");
    }

    pub fn spawn(self, notifications: Receiver<CatalogChanged>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("catalog-watcher".to_string())
            .spawn(move || self.run(notifications))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyphraseError;
    use crate::models::{PhraseEntry, PhraseValue};
    use crate::store::MemoryPhraseStore;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store whose reads can be switched to fail
    struct FlakyStore {
        inner: MemoryPhraseStore,
        down: AtomicBool,
    }

    impl PhraseStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<PhraseValue>> {
            self.inner.get(key)
        }

        fn all(&self) -> Result<Vec<PhraseEntry>> {
            if self.down.load(Ordering::SeqCst) {
                return Err(KeyphraseError::Other("store unavailable".to_string()));
            }
            self.inner.all()
        }
    }

    #[test]
    fn rebuild_installs_one_matcher_per_key() {
        let store = Arc::new(MemoryPhraseStore::with_entries(vec![
            PhraseEntry::new("addr", "123 Main St"),
            PhraseEntry::new("sig", "Sam"),
        ]));
        let engine = Arc::new(MatchEngine::new());
        let watcher = CatalogWatcher::new(store, Arc::clone(&engine), AmbiguityPolicy::default());

        assert_eq!(watcher.rebuild().unwrap(), 2);
        assert_eq!(engine.attempt_match_str("my addr"), Some("addr".to_string()));
    }

    #[test]
    fn rebuild_twice_is_idempotent() {
        let store = Arc::new(MemoryPhraseStore::with_entries(vec![
            PhraseEntry::new("hi", "hello"),
            PhraseEntry::new("brb", "be right back"),
        ]));
        let engine = Arc::new(MatchEngine::new());
        let watcher = CatalogWatcher::new(store, Arc::clone(&engine), AmbiguityPolicy::default());

        let inputs = ["hi", "xbrb", "nothing", "h"];
        watcher.rebuild().unwrap();
        let first: Vec<_> = inputs.iter().map(|s| engine.attempt_match_str(s)).collect();
        watcher.rebuild().unwrap();
        let second: Vec<_> = inputs.iter().map(|s| engine.attempt_match_str(s)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn failed_rebuild_keeps_previous_set() {
        let store = Arc::new(FlakyStore {
            inner: MemoryPhraseStore::with_entries(vec![PhraseEntry::new("addr", "x")]),
            down: AtomicBool::new(false),
        });
        let engine = Arc::new(MatchEngine::new());
        let watcher = CatalogWatcher::new(
            Arc::clone(&store) as Arc<dyn PhraseStore>,
            Arc::clone(&engine),
            AmbiguityPolicy::default(),
        );
        watcher.rebuild().unwrap();

        store.down.store(true, Ordering::SeqCst);
        assert!(watcher.rebuild().is_err());
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.attempt_match_str("addr"), Some("addr".to_string()));
    }

    #[test]
    fn run_rebuilds_on_notification_until_closed() {
        let store = Arc::new(MemoryPhraseStore::new());
        let engine = Arc::new(MatchEngine::new());
        let watcher = CatalogWatcher::new(
            Arc::clone(&store) as Arc<dyn PhraseStore>,
            Arc::clone(&engine),
            AmbiguityPolicy::default(),
        );
        let (tx, rx) = std::sync::mpsc::channel();

        store.insert("omw", "on my way");
        tx.send(CatalogChanged).unwrap();
        store.insert("ty", "thank you");
        tx.send(CatalogChanged).unwrap();
        drop(tx);

        watcher.run(rx);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.attempt_match_str("ty"), Some("ty".to_string()));
    }
}
