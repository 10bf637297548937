use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared free/held flag that keeps our own synthetic keystrokes out of the
/// matching pipeline.
///
/// The capture path only polls [`is_held`](Self::is_held) and drops events
/// while the flag is set; the substitution path holds a [`GuardToken`] for the
/// duration of an expansion.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    held: Arc<AtomicBool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Take the flag without blocking. `None` if someone else holds it.
    pub fn try_acquire(&self) -> Option<GuardToken> {
        if self.held.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(GuardToken {
            held: Arc::clone(&self.held),
        })
    }
}

/// Releases the guard when dropped
#[derive(Debug)]
#[must_use = "the guard is released as soon as the token is dropped"]
pub struct GuardToken {
    held: Arc<AtomicBool>,
}

impl Drop for GuardToken {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
