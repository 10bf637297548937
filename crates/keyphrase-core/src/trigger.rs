use crate::keyboard::{KeyEvent, TriggerKey};

/// Holds the trigger key set fixed for the lifetime of an engine
#[derive(Debug, Clone)]
pub struct TriggerDetector {
    keys: Vec<TriggerKey>,
}

impl TriggerDetector {
    pub fn new(keys: impl IntoIterator<Item = TriggerKey>) -> Self {
        let mut unique = Vec::new();
        for key in keys {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self { keys: unique }
    }

    pub fn is_trigger(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|key| key.matches(event))
    }

    pub fn keys(&self) -> &[TriggerKey] {
        &self.keys
    }
}

impl Default for TriggerDetector {
    fn default() -> Self {
        Self::new(TriggerKey::default_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_enter_and_space() {
        let detector = TriggerDetector::default();
        assert!(detector.is_trigger(&KeyEvent::Enter));
        assert!(detector.is_trigger(&KeyEvent::Space));
        assert!(!detector.is_trigger(&KeyEvent::Character('a')));
        assert!(!detector.is_trigger(&KeyEvent::Backspace));
    }

    #[test]
    fn custom_set_only_fires_on_its_keys() {
        let detector = TriggerDetector::new(vec![
            TriggerKey::Named("tab".to_string()),
            TriggerKey::Named("tab".to_string()),
        ]);
        assert_eq!(detector.keys().len(), 1);
        assert!(detector.is_trigger(&KeyEvent::other("tab")));
        assert!(!detector.is_trigger(&KeyEvent::Enter));
        assert!(!detector.is_trigger(&KeyEvent::Space));
    }
}
