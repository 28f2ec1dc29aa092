//! Errors raised while decoding Bopomofo text into a [`Syllable`](crate::Syllable).
//!
//! Each variant names the grammatical rule the text broke. Malformed text is
//! reported, never repaired.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyllableError {
    #[error("Bopomofo text is too short: {text:?}")]
    TooShort { text: String },

    #[error("multiple consonants in {text:?}")]
    MultipleConsonants { text: String },

    #[error("consonant {glyph} follows a medial or vowel in {text:?}")]
    ConsonantAfterVowel { text: String, glyph: char },

    #[error("multiple medials in {text:?}")]
    MultipleMedials { text: String },

    #[error("medial {glyph} follows a vowel in {text:?}")]
    MedialAfterVowel { text: String, glyph: char },

    #[error("multiple vowels in {text:?}")]
    MultipleVowels { text: String },

    #[error("medial {medial} cannot combine with vowel {vowel} in {text:?}")]
    InvalidCombination {
        text: String,
        medial: char,
        vowel: char,
    },

    #[error("tone mark {glyph} has no consonant, medial or vowel before it in {text:?}")]
    ToneWithoutBase { text: String, glyph: char },

    #[error("multiple tone marks in {text:?}")]
    MultipleTones { text: String },

    #[error("invalid character {glyph:?} in {text:?}")]
    InvalidCharacter { text: String, glyph: char },
}
