use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use keyphrase_core::{KeyEvent, KeyboardOutput, KeyphraseError, Result};
use rdev::{self, EventType, Key as RdevKey};
use std::thread;
use std::time::Duration;

/// Convert a raw rdev event into a key-down event for the engine.
/// Releases, mouse and wheel events yield `None`.
pub fn rdev_event_to_key(event: &rdev::Event) -> Option<KeyEvent> {
    match event.event_type {
        EventType::KeyPress(key) => Some(rdev_key_to_event(&key, event.name.as_deref())),
        _ => None,
    }
}

/// Classify one pressed key. `name` is the text the key produced, if any.
pub fn rdev_key_to_event(key: &RdevKey, name: Option<&str>) -> KeyEvent {
    match key {
        RdevKey::Space => return KeyEvent::Space,
        RdevKey::Return | RdevKey::KpReturn => return KeyEvent::Enter,
        RdevKey::Backspace => return KeyEvent::Backspace,
        _ => {}
    }

    // Regular single character keys
    if let Some(name) = name {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !c.is_control() {
                return KeyEvent::Character(c);
            }
        }
    }

    match key {
        RdevKey::Unknown(code) => KeyEvent::Other(format!("unknown{}", code)),
        other => KeyEvent::other(format!("{:?}", other)),
    }
}

/// Create a keyboard controller
pub fn create_keyboard_controller() -> Result<Enigo> {
    let settings = Settings::default();
    Enigo::new(&settings).map_err(|err| {
        KeyphraseError::Keyboard(format!("Failed to create keyboard controller: {}", err))
    })
}

/// Injects synthetic input through enigo
pub struct EnigoOutput {
    keyboard: Enigo,
}

impl EnigoOutput {
    pub fn new() -> Result<Self> {
        Ok(Self {
            keyboard: create_keyboard_controller()?,
        })
    }
}

impl KeyboardOutput for EnigoOutput {
    fn erase_backward(&mut self) -> Result<()> {
        self.keyboard
            .key(Key::Backspace, Direction::Click)
            .map_err(|err| KeyphraseError::Keyboard(format!("Failed to send backspace: {}", err)))
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        type_text_with_formatting(&mut self.keyboard, text)
    }
}

/// Type `text` line by line, pressing Return between lines
pub fn type_text_with_formatting(keyboard: &mut impl Keyboard, text: &str) -> Result<()> {
    // Keep chunks small enough not to overwhelm the input queue
    const CHUNK_SIZE: usize = 512;

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            keyboard.key(Key::Return, Direction::Click).map_err(|err| {
                KeyphraseError::Keyboard(format!("Failed to type newline: {}", err))
            })?;

            // Small delay after newline to ensure it registers properly
            thread::sleep(Duration::from_millis(15));
        }

        let line = line.strip_suffix('\r').unwrap_or(line);
        let chars: Vec<char> = line.chars().collect();
        for chunk in chars.chunks(CHUNK_SIZE) {
            let chunk: String = chunk.iter().collect();
            keyboard
                .text(&chunk)
                .map_err(|err| KeyphraseError::Keyboard(format!("Failed to type text: {}", err)))?;

            if chars.len() > CHUNK_SIZE {
                thread::sleep(Duration::from_millis(20));
            }
        }
    }

    Ok(())
}
