//! Per-keystroke assembly of a single syllable.

use crate::keyboard_layout::KeyboardLayout;
use crate::syllable::Syllable;

/// The reading being typed.
///
/// Phonetic layouts build a [`Syllable`] directly; each key is merged by
/// re-decoding the whole key sequence. The Hanyu Pinyin layout keeps the raw
/// Latin letters and re-parses them after every key.
#[derive(Debug, Clone, Default)]
pub struct ReadingBuffer {
    layout: KeyboardLayout,
    syllable: Syllable,
    pinyin_sequence: String,
}

impl ReadingBuffer {
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            syllable: Syllable::EMPTY,
            pinyin_sequence: String::new(),
        }
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    /// Switches layouts. The pinyin accumulator is dropped; a syllable in
    /// progress is kept.
    pub fn set_layout(&mut self, layout: KeyboardLayout) {
        self.layout = layout;
        self.pinyin_sequence.clear();
    }

    fn pinyin_mode(&self) -> bool {
        self.layout.is_pinyin()
    }

    pub fn is_valid_key(&self, key: char) -> bool {
        let key = key.to_ascii_lowercase();
        if !self.pinyin_mode() {
            return !self.layout.key_to_components(key).is_empty();
        }

        if key.is_ascii_lowercase() {
            // nothing may follow a tone digit
            return !self
                .pinyin_sequence
                .ends_with(|c: char| ('2'..='5').contains(&c));
        }

        ('2'..='5').contains(&key)
            && !self.pinyin_sequence.is_empty()
            && !self.pinyin_sequence.chars().any(|c| c.is_ascii_digit())
    }

    /// Adds `key` to the reading. Returns false, leaving the buffer as it
    /// was, when the key is not valid here.
    pub fn combine_key(&mut self, key: char) -> bool {
        if !self.is_valid_key(key) {
            return false;
        }
        let key = key.to_ascii_lowercase();

        if self.pinyin_mode() {
            self.pinyin_sequence.push(key);
            self.syllable = Syllable::from_hanyu_pinyin(&self.pinyin_sequence);
            return true;
        }

        let mut sequence = self.layout.key_sequence_from_syllable(self.syllable);
        sequence.push(key);
        self.syllable = self.layout.syllable_from_key_sequence(&sequence);
        true
    }

    /// Removes the last key typed.
    pub fn backspace(&mut self) {
        if self.pinyin_mode() {
            self.pinyin_sequence.pop();
            self.syllable = Syllable::from_hanyu_pinyin(&self.pinyin_sequence);
            return;
        }

        let mut sequence = self.layout.key_sequence_from_syllable(self.syllable);
        if sequence.pop().is_some() {
            self.syllable = self.layout.syllable_from_key_sequence(&sequence);
        }
    }

    pub fn clear(&mut self) {
        self.pinyin_sequence.clear();
        self.syllable.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.syllable.is_empty() && self.pinyin_sequence.is_empty()
    }

    pub fn syllable(&self) -> Syllable {
        self.syllable
    }

    /// Replaces the reading with `syllable` minus its tone mark.
    pub fn set_syllable_removing_tone(&mut self, syllable: Syllable) {
        self.syllable = Syllable::new(
            syllable.consonant(),
            syllable.medial(),
            syllable.vowel(),
            Default::default(),
        );
        if self.pinyin_mode() {
            self.pinyin_sequence = self.syllable.to_hanyu_pinyin(false, true);
        }
    }

    /// The keys that type the current syllable on the active layout, or the
    /// raw letters in pinyin mode.
    pub fn key_sequence(&self) -> String {
        if self.pinyin_mode() {
            return self.pinyin_sequence.clone();
        }
        self.layout.key_sequence_from_syllable(self.syllable)
    }

    /// What the user sees while typing.
    pub fn composed_string(&self) -> String {
        if self.pinyin_mode() {
            return self.pinyin_sequence.clone();
        }
        self.syllable.composed_string()
    }

    /// The syllable re-typed on the Standard layout.
    pub fn standard_layout_query_string(&self) -> String {
        KeyboardLayout::standard().key_sequence_from_syllable(self.syllable)
    }

    pub fn has_tone_marker(&self) -> bool {
        self.syllable.has_tone_marker()
    }

    /// A tone mark and nothing else, e.g. a tone key typed on an empty buffer.
    pub fn has_tone_marker_only(&self) -> bool {
        self.syllable.has_tone_marker()
            && !(self.syllable.has_consonant()
                || self.syllable.has_medial()
                || self.syllable.has_vowel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(layout: KeyboardLayout, keys: &str) -> ReadingBuffer {
        let mut buffer = ReadingBuffer::new(layout);
        for key in keys.chars() {
            buffer.combine_key(key);
        }
        buffer
    }

    #[test]
    fn standard_keys_compose() {
        let buffer = typed(KeyboardLayout::standard(), "5j;3");
        assert_eq!(buffer.composed_string(), "ㄓㄨㄤˇ");
        assert!(buffer.has_tone_marker());
        assert!(!buffer.has_tone_marker_only());
    }

    #[test]
    fn later_key_replaces_same_field() {
        // ㄅ then ㄆ: the consonant is replaced
        let buffer = typed(KeyboardLayout::standard(), "1q");
        assert_eq!(buffer.syllable(), Syllable::P);
    }

    #[test]
    fn phonetic_backspace_drops_last_component() {
        let mut buffer = typed(KeyboardLayout::standard(), "186");
        buffer.backspace();
        assert_eq!(buffer.composed_string(), "ㄅㄚ");
        buffer.backspace();
        buffer.backspace();
        assert!(buffer.is_empty());
        buffer.backspace();
        assert!(buffer.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut buffer = ReadingBuffer::new(KeyboardLayout::standard());
        assert!(!buffer.combine_key('`'));
        assert!(buffer.is_empty());
    }

    #[test]
    fn pinyin_tone_rules() {
        let mut buffer = ReadingBuffer::new(KeyboardLayout::hanyu_pinyin());
        assert!(!buffer.is_valid_key('3'));
        assert!(buffer.combine_key('M'));
        assert!(buffer.combine_key('a'));
        assert!(!buffer.is_valid_key('1'));
        assert!(buffer.combine_key('3'));
        assert!(!buffer.is_valid_key('4'));
        assert!(!buffer.is_valid_key('n'));
        assert_eq!(buffer.composed_string(), "ma3");
        assert_eq!(buffer.syllable().composed_string(), "ㄇㄚˇ");
        buffer.backspace();
        assert_eq!(buffer.composed_string(), "ma");
        assert!(buffer.is_valid_key('n'));
    }

    #[test]
    fn switching_layouts_keeps_the_syllable() {
        let mut buffer = typed(KeyboardLayout::hanyu_pinyin(), "ba");
        buffer.set_layout(KeyboardLayout::standard());
        assert_eq!(buffer.syllable(), Syllable::B + Syllable::A);
        assert_eq!(buffer.key_sequence(), "18");
        buffer.set_layout(KeyboardLayout::hanyu_pinyin());
        assert_eq!(buffer.composed_string(), "");
    }

    #[test]
    fn removing_tone() {
        let mut buffer = ReadingBuffer::new(KeyboardLayout::hanyu_pinyin());
        buffer.set_syllable_removing_tone(Syllable::L + Syllable::UE + Syllable::TONE4);
        assert_eq!(buffer.composed_string(), "lv");
        assert_eq!(buffer.standard_layout_query_string(), "xm");
    }
}
