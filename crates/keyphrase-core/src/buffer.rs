use std::collections::VecDeque;

/// Bounded record of the most recent character-producing keystrokes.
///
/// When a push would exceed the capacity the oldest character is evicted
/// first, so the buffer always holds the last `capacity` characters typed.
#[derive(Debug, Clone)]
pub struct KeyBuffer {
    chars: VecDeque<char>,
    capacity: usize,
}

impl KeyBuffer {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            chars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, c: char) {
        if self.chars.len() == self.capacity {
            self.chars.pop_front();
        }
        self.chars.push_back(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.chars.pop_back()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The buffer concatenated into a single candidate string
    pub fn contents(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, text: &str) -> KeyBuffer {
        let mut buffer = KeyBuffer::new(capacity);
        text.chars().for_each(|c| buffer.push(c));
        buffer
    }

    #[test]
    fn keeps_everything_up_to_capacity() {
        let buffer = filled(8, "hello");
        assert_eq!(buffer.contents(), "hello");
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let buffer = filled(3, "abcd");
        assert_eq!(buffer.contents(), "bcd");

        let buffer = filled(4, "the quick brown fox");
        assert_eq!(buffer.contents(), " fox");
        assert_eq!(buffer.len(), buffer.capacity());
    }

    #[test]
    fn pop_removes_last_and_tolerates_empty() {
        let mut buffer = filled(4, "abc");
        assert_eq!(buffer.pop(), Some('c'));
        assert_eq!(buffer.contents(), "ab");

        let mut empty = KeyBuffer::new(4);
        assert_eq!(empty.pop(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn zero_capacity_holds_one_char() {
        let buffer = filled(0, "xy");
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.contents(), "y");
    }

    #[test]
    fn handles_multibyte_characters() {
        let buffer = filled(2, "héé");
        assert_eq!(buffer.contents(), "éé");
    }
}
