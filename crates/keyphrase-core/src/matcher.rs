use crate::buffer::KeyBuffer;
use crate::error::Result;
use crate::models::PhraseKey;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Recognizes one phrase key at the end of the typed candidate
pub trait Matcher: Send + Sync {
    fn key(&self) -> &str;

    fn matches(&self, candidate: &str) -> Result<bool>;
}

/// Matches when the candidate ends with the key, taken literally
#[derive(Debug, Clone)]
pub struct SuffixMatcher {
    key: PhraseKey,
}

impl SuffixMatcher {
    pub fn new(key: impl Into<PhraseKey>) -> Self {
        Self { key: key.into() }
    }
}

impl Matcher for SuffixMatcher {
    fn key(&self) -> &str {
        &self.key
    }

    fn matches(&self, candidate: &str) -> Result<bool> {
        Ok(!self.key.is_empty() && candidate.ends_with(self.key.as_str()))
    }
}

/// Which matcher gets first say when one key is a suffix of another
/// (e.g. "hi" and "hihi").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Test keys in the order the store enumerates them. The store gives no
    /// ordering guarantee, so the winner may change across rebuilds.
    #[default]
    CatalogOrder,
    /// Test longer keys first; ties keep catalog order.
    LongestKey,
}

/// Immutable set of matchers built from one catalog snapshot
#[derive(Default)]
pub struct MatcherSet {
    matchers: Vec<Box<dyn Matcher>>,
}

impl MatcherSet {
    pub fn new(matchers: Vec<Box<dyn Matcher>>, policy: AmbiguityPolicy) -> Self {
        let mut matchers = matchers;
        if policy == AmbiguityPolicy::LongestKey {
            // stable sort keeps catalog order among equal lengths
            matchers.sort_by_key(|m| std::cmp::Reverse(m.key().chars().count()));
        }
        Self { matchers }
    }

    pub fn from_keys<I, K>(keys: I, policy: AmbiguityPolicy) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PhraseKey>,
    {
        let matchers = keys
            .into_iter()
            .map(|key| Box::new(SuffixMatcher::new(key)) as Box<dyn Matcher>)
            .collect();
        Self::new(matchers, policy)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.key())
    }

    /// First key whose matcher accepts `candidate`. A matcher that errors or
    /// panics is skipped and the remaining matchers are still tested.
    pub fn find(&self, candidate: &str) -> Option<PhraseKey> {
        for matcher in &self.matchers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| matcher.matches(candidate)));
            match outcome {
                Ok(Ok(true)) => return Some(matcher.key().to_string()),
                Ok(Ok(false)) => {}
                Ok(Err(e)) => {
                    warn!(key = %matcher.key(), error = %e, "Matcher failed, skipping");
                }
                Err(_) => {
                    warn!(key = %matcher.key(), "Matcher panicked, skipping");
                }
            }
        }
        None
    }
}

/// Owns the active matcher set and swaps it wholesale on rebuild
pub struct MatchEngine {
    current: RwLock<Arc<MatcherSet>>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::with_set(MatcherSet::default())
    }

    pub fn with_set(set: MatcherSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(set)),
        }
    }

    /// The set readers currently see. Holding it keeps that set alive across a swap.
    pub fn snapshot(&self) -> Arc<MatcherSet> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the active set. Returns the previous one.
    pub fn install(&self, set: MatcherSet) -> Arc<MatcherSet> {
        let next = Arc::new(set);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn attempt_match(&self, buffer: &KeyBuffer) -> Option<PhraseKey> {
        self.attempt_match_str(&buffer.contents())
    }

    pub fn attempt_match_str(&self, candidate: &str) -> Option<PhraseKey> {
        if candidate.is_empty() {
            return None;
        }
        let set = self.snapshot();
        let found = set.find(candidate);
        debug!(
            candidates = set.len(),
            matched = found.as_deref().unwrap_or(""),
            "Match attempt"
        );
        found
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyphraseError;

    struct FailingMatcher;

    impl Matcher for FailingMatcher {
        fn key(&self) -> &str {
            "broken"
        }

        fn matches(&self, _candidate: &str) -> Result<bool> {
            Err(KeyphraseError::Matcher {
                key: "broken".to_string(),
                message: "corrupt entry".to_string(),
            })
        }
    }

    struct PanickingMatcher;

    impl Matcher for PanickingMatcher {
        fn key(&self) -> &str {
            "panics"
        }

        fn matches(&self, _candidate: &str) -> Result<bool> {
            panic!("matcher exploded")
        }
    }

    #[test]
    fn suffix_matcher_is_literal() {
        let dot = SuffixMatcher::new("a.b");
        assert!(dot.matches("xxa.b").unwrap());
        assert!(!dot.matches("xxaxb").unwrap());

        let star = SuffixMatcher::new("(*)");
        assert!(star.matches("face(*)").unwrap());
    }

    #[test]
    fn empty_key_never_matches() {
        assert!(!SuffixMatcher::new("").matches("anything").unwrap());
    }

    #[test]
    fn finds_trailing_key() {
        let engine = MatchEngine::with_set(MatcherSet::from_keys(
            ["addr", "sig"],
            AmbiguityPolicy::CatalogOrder,
        ));
        assert_eq!(engine.attempt_match_str("xaddr"), Some("addr".to_string()));
        assert_eq!(engine.attempt_match_str("addrx"), None);
        assert_eq!(engine.attempt_match_str(""), None);
    }

    #[test]
    fn catalog_order_tests_keys_as_given() {
        let set = MatcherSet::from_keys(["hi", "hihi"], AmbiguityPolicy::CatalogOrder);
        assert_eq!(set.find("hihi"), Some("hi".to_string()));
    }

    #[test]
    fn longest_key_policy_prefers_longer_keys() {
        let set = MatcherSet::from_keys(["hi", "hihi", "ih"], AmbiguityPolicy::LongestKey);
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["hihi", "hi", "ih"]);
        assert_eq!(set.find("hihi"), Some("hihi".to_string()));
        assert_eq!(set.find("ohi"), Some("hi".to_string()));
    }

    #[test]
    fn faulty_matchers_do_not_abort_the_attempt() {
        let set = MatcherSet::new(
            vec![
                Box::new(FailingMatcher),
                Box::new(PanickingMatcher),
                Box::new(SuffixMatcher::new("ok")),
            ],
            AmbiguityPolicy::CatalogOrder,
        );
        assert_eq!(set.find("ok"), Some("ok".to_string()));
    }

    #[test]
    fn install_swaps_whole_set() {
        let engine = MatchEngine::with_set(MatcherSet::from_keys(
            ["old"],
            AmbiguityPolicy::CatalogOrder,
        ));
        let held = engine.snapshot();

        let previous = engine.install(MatcherSet::from_keys(
            ["new", "newer"],
            AmbiguityPolicy::CatalogOrder,
        ));

        assert_eq!(previous.len(), 1);
        assert_eq!(held.find("old"), Some("old".to_string()));
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.attempt_match_str("old"), None);
        assert_eq!(engine.attempt_match_str("new"), Some("new".to_string()));
    }
}
