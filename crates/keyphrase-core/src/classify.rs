use crate::buffer::KeyBuffer;
use crate::keyboard::KeyEvent;
use serde::{Deserialize, Serialize};

/// How a recognized key event changes the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEdit {
    Append(char),
    Pop,
}

/// What to do with key events no classifier recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedKeyPolicy {
    /// Leave the buffer untouched
    #[default]
    Ignore,
    /// Forget what was typed so far. Modifier keys never clear.
    ClearBuffer,
}

/// Result of running an event through the classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified {
    Edited(BufferEdit),
    Cleared,
    Ignored,
}

pub trait Classifier: Send + Sync {
    /// Returns the edit for `event`, or `None` if this classifier does not recognize it
    fn classify(&self, event: &KeyEvent) -> Option<BufferEdit>;
}

/// Recognizes "erase last character"
pub struct DeleteClassifier;

impl Classifier for DeleteClassifier {
    fn classify(&self, event: &KeyEvent) -> Option<BufferEdit> {
        matches!(event, KeyEvent::Backspace).then_some(BufferEdit::Pop)
    }
}

/// Recognizes keys carrying a printable character
pub struct AlphaNumericClassifier;

impl Classifier for AlphaNumericClassifier {
    fn classify(&self, event: &KeyEvent) -> Option<BufferEdit> {
        match event {
            KeyEvent::Character(c) if !c.is_control() => Some(BufferEdit::Append(*c)),
            _ => None,
        }
    }
}

/// The platform reports space as its own key rather than a character
pub struct SpaceClassifier;

impl Classifier for SpaceClassifier {
    fn classify(&self, event: &KeyEvent) -> Option<BufferEdit> {
        matches!(event, KeyEvent::Space).then_some(BufferEdit::Append(' '))
    }
}

/// The classifier chain, evaluated in fixed priority order: delete, alphanumeric, space
pub struct Classifiers {
    chain: Vec<Box<dyn Classifier>>,
    policy: UnrecognizedKeyPolicy,
}

impl Classifiers {
    pub fn new(policy: UnrecognizedKeyPolicy) -> Self {
        Self {
            chain: vec![
                Box::new(DeleteClassifier),
                Box::new(AlphaNumericClassifier),
                Box::new(SpaceClassifier),
            ],
            policy,
        }
    }

    pub fn policy(&self) -> UnrecognizedKeyPolicy {
        self.policy
    }

    pub fn classify(&self, event: &KeyEvent) -> Option<BufferEdit> {
        self.chain.iter().find_map(|classifier| classifier.classify(event))
    }

    /// Apply the first matching classifier's edit to `buffer`, falling back
    /// to the unrecognized-key policy
    pub fn apply(&self, event: &KeyEvent, buffer: &mut KeyBuffer) -> Classified {
        match self.edit(event, buffer) {
            Some(edit) => Classified::Edited(edit),
            None => self.apply_unrecognized(event, buffer),
        }
    }

    /// Apply the first matching classifier's edit, if any. Unrecognized
    /// events leave the buffer alone regardless of policy.
    pub fn edit(&self, event: &KeyEvent, buffer: &mut KeyBuffer) -> Option<BufferEdit> {
        let edit = self.classify(event)?;
        match edit {
            BufferEdit::Append(c) => buffer.push(c),
            BufferEdit::Pop => {
                buffer.pop();
            }
        }
        Some(edit)
    }

    /// Handle an event that is neither a trigger nor recognized by any classifier
    pub fn apply_unrecognized(&self, event: &KeyEvent, buffer: &mut KeyBuffer) -> Classified {
        match self.policy {
            UnrecognizedKeyPolicy::ClearBuffer if !event.is_modifier() => {
                buffer.clear();
                Classified::Cleared
            }
            _ => Classified::Ignored,
        }
    }
}

impl Default for Classifiers {
    fn default() -> Self {
        Self::new(UnrecognizedKeyPolicy::default())
    }
}
