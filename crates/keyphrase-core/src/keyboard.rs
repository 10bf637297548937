use crate::error::Result;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// A key-down event as delivered by the platform layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A key carrying a concrete printable character
    Character(char),
    Backspace,
    Space,
    Enter,
    /// Any other key, identified by its lowercase name (e.g. "tab", "shiftleft")
    Other(String),
}

impl KeyEvent {
    pub fn other(name: impl AsRef<str>) -> Self {
        KeyEvent::Other(name.as_ref().to_lowercase())
    }

    /// Whether this is a modifier that only changes what the next key produces
    pub fn is_modifier(&self) -> bool {
        match self {
            KeyEvent::Other(name) => {
                let name = name.as_str();
                name.starts_with("shift")
                    || name.starts_with("control")
                    || name.starts_with("ctrl")
                    || name.starts_with("alt")
                    || name.starts_with("meta")
                    || name.starts_with("super")
                    || name == "capslock"
                    || name == "function"
            }
            _ => false,
        }
    }
}

/// A key that ends a candidate abbreviation and causes a match attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriggerKey {
    Space,
    Enter,
    Named(String),
}

impl TriggerKey {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        match (self, event) {
            (TriggerKey::Space, KeyEvent::Space) => true,
            (TriggerKey::Enter, KeyEvent::Enter) => true,
            (TriggerKey::Named(name), KeyEvent::Other(other)) => name == other,
            // keys that type a character only ever arrive as that character
            (TriggerKey::Named(name), KeyEvent::Character(c)) => {
                let mut chars = name.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }
            _ => false,
        }
    }

    pub fn default_set() -> Vec<TriggerKey> {
        vec![TriggerKey::Enter, TriggerKey::Space]
    }
}

impl FromStr for TriggerKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "" => Err("trigger key name is empty".to_string()),
            "space" => Ok(TriggerKey::Space),
            "enter" | "return" => Ok(TriggerKey::Enter),
            _ => Ok(TriggerKey::Named(name)),
        }
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKey::Space => write!(f, "space"),
            TriggerKey::Enter => write!(f, "enter"),
            TriggerKey::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Synthetic input sent to whichever application holds focus
pub trait KeyboardOutput {
    /// Erase one character backward (a synthetic backspace)
    fn erase_backward(&mut self) -> Result<()>;

    /// Inject text as if typed by the user
    fn type_text(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardAction {
    EraseBackward,
    TypeText(String),
}

/// Keyboard output that only records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    actions: Arc<Mutex<Vec<KeyboardAction>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every action recorded so far, in order
    pub fn actions(&self) -> Vec<KeyboardAction> {
        self.lock().clone()
    }

    pub fn erase_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|action| **action == KeyboardAction::EraseBackward)
            .count()
    }

    pub fn typed(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|action| match action {
                KeyboardAction::TypeText(text) => Some(text.clone()),
                KeyboardAction::EraseBackward => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<KeyboardAction>> {
        self.actions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyboardOutput for RecordingOutput {
    fn erase_backward(&mut self) -> Result<()> {
        self.lock().push(KeyboardAction::EraseBackward);
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.lock().push(KeyboardAction::TypeText(text.to_string()));
        Ok(())
    }
}
