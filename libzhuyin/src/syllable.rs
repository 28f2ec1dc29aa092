//! Bit-packed Bopomofo syllable.
//!
//! A syllable packs four independent fields into a `u16`:
//!
//! | field     | mask     | values          |
//! |-----------|----------|-----------------|
//! | consonant | `0x001f` | 21              |
//! | medial    | `0x0060` | 3 (ㄧ ㄨ ㄩ)      |
//! | vowel     | `0x0780` | 13              |
//! | tone      | `0x3800` | 5, tone 1 = 0   |
//!
//! Keyboard layouts resolve overloaded keys by comparing these masks, so the
//! packed form is what gets stored. Code that only inspects a syllable should
//! use the typed accessors ([`Syllable::consonant`], [`Syllable::vowel`], ...).

use phf::phf_map;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::error::SyllableError;

pub const CONSONANT_MASK: u16 = 0x001f;
pub const MEDIAL_MASK: u16 = 0x0060;
pub const VOWEL_MASK: u16 = 0x0780;
pub const TONE_MASK: u16 = 0x3800;

const FIELD_MASKS: [u16; 4] = [CONSONANT_MASK, MEDIAL_MASK, VOWEL_MASK, TONE_MASK];

/// Initial consonants, in Bopomofo order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Consonant {
    B = 0x0001,
    P,
    M,
    F,
    D,
    T,
    N,
    L,
    G,
    K,
    H,
    J,
    Q,
    X,
    Zh,
    Ch,
    Sh,
    R,
    Z,
    C,
    S,
}

impl Consonant {
    pub const ALL: [Consonant; 21] = [
        Consonant::B,
        Consonant::P,
        Consonant::M,
        Consonant::F,
        Consonant::D,
        Consonant::T,
        Consonant::N,
        Consonant::L,
        Consonant::G,
        Consonant::K,
        Consonant::H,
        Consonant::J,
        Consonant::Q,
        Consonant::X,
        Consonant::Zh,
        Consonant::Ch,
        Consonant::Sh,
        Consonant::R,
        Consonant::Z,
        Consonant::C,
        Consonant::S,
    ];

    const GLYPHS: [char; 21] = [
        'ㄅ', 'ㄆ', 'ㄇ', 'ㄈ', 'ㄉ', 'ㄊ', 'ㄋ', 'ㄌ', 'ㄍ', 'ㄎ', 'ㄏ', 'ㄐ', 'ㄑ', 'ㄒ', 'ㄓ', 'ㄔ',
        'ㄕ', 'ㄖ', 'ㄗ', 'ㄘ', 'ㄙ',
    ];

    pub fn glyph(self) -> char {
        Self::GLYPHS[self.ordinal()]
    }

    fn ordinal(self) -> usize {
        self as usize - 1
    }

    fn from_bits(bits: u16) -> Option<Self> {
        let bits = bits & CONSONANT_MASK;
        if bits == 0 {
            return None;
        }
        Self::ALL.get(usize::from(bits) - 1).copied()
    }
}

/// Medial glides: ㄧ (i), ㄨ (u), ㄩ (ü).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Medial {
    I = 0x0020,
    U = 0x0040,
    Ue = 0x0060,
}

impl Medial {
    pub const ALL: [Medial; 3] = [Medial::I, Medial::U, Medial::Ue];

    pub fn glyph(self) -> char {
        match self {
            Medial::I => 'ㄧ',
            Medial::U => 'ㄨ',
            Medial::Ue => 'ㄩ',
        }
    }

    /// Whether `vowel` may follow this medial in written Bopomofo.
    pub fn combines_with(self, vowel: Vowel) -> bool {
        use Vowel::*;
        match self {
            Medial::I => matches!(vowel, A | O | E | Ai | Ao | Ou | An | En | Ang | Eng),
            Medial::U => matches!(vowel, A | O | Ai | Ei | An | En | Ang | Eng),
            Medial::Ue => matches!(vowel, E | An | En | Eng),
        }
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits & MEDIAL_MASK {
            0x0020 => Some(Medial::I),
            0x0040 => Some(Medial::U),
            0x0060 => Some(Medial::Ue),
            _ => None,
        }
    }
}

/// Rhymes. `Er` is ㄜ and `Err` is the retroflex ㄦ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Vowel {
    A = 0x0080,
    O = 0x0100,
    Er = 0x0180,
    E = 0x0200,
    Ai = 0x0280,
    Ei = 0x0300,
    Ao = 0x0380,
    Ou = 0x0400,
    An = 0x0480,
    En = 0x0500,
    Ang = 0x0580,
    Eng = 0x0600,
    Err = 0x0680,
}

impl Vowel {
    pub const ALL: [Vowel; 13] = [
        Vowel::A,
        Vowel::O,
        Vowel::Er,
        Vowel::E,
        Vowel::Ai,
        Vowel::Ei,
        Vowel::Ao,
        Vowel::Ou,
        Vowel::An,
        Vowel::En,
        Vowel::Ang,
        Vowel::Eng,
        Vowel::Err,
    ];

    const GLYPHS: [char; 13] = [
        'ㄚ', 'ㄛ', 'ㄜ', 'ㄝ', 'ㄞ', 'ㄟ', 'ㄠ', 'ㄡ', 'ㄢ', 'ㄣ', 'ㄤ', 'ㄥ', 'ㄦ',
    ];

    pub fn glyph(self) -> char {
        Self::GLYPHS[self.ordinal()]
    }

    fn ordinal(self) -> usize {
        (self as usize >> 7) - 1
    }

    fn from_bits(bits: u16) -> Option<Self> {
        let index = usize::from((bits & VOWEL_MASK) >> 7);
        if index == 0 {
            return None;
        }
        Self::ALL.get(index - 1).copied()
    }
}

/// Tones. Tone 1 is the absence of a mark and packs to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u16)]
pub enum Tone {
    #[default]
    One = 0x0000,
    Two = 0x0800,
    Three = 0x1000,
    Four = 0x1800,
    Five = 0x2000,
}

impl Tone {
    pub const ALL: [Tone; 5] = [Tone::One, Tone::Two, Tone::Three, Tone::Four, Tone::Five];

    /// Display mark; tone 1 has none.
    pub fn glyph(self) -> Option<char> {
        match self {
            Tone::One => None,
            Tone::Two => Some('ˊ'),
            Tone::Three => Some('ˇ'),
            Tone::Four => Some('ˋ'),
            Tone::Five => Some('˙'),
        }
    }

    /// Tone number, 1 through 5.
    pub fn number(self) -> u8 {
        (self as u16 >> 11) as u8 + 1
    }

    fn from_bits(bits: u16) -> Self {
        Self::ALL
            .get(usize::from((bits & TONE_MASK) >> 11))
            .copied()
            .unwrap_or_default()
    }
}

/// Display glyph to single-field syllable.
static COMPONENT_BY_GLYPH: phf::Map<char, Syllable> = phf_map! {
    'ㄅ' => Syllable::B, 'ㄆ' => Syllable::P, 'ㄇ' => Syllable::M, 'ㄈ' => Syllable::F,
    'ㄉ' => Syllable::D, 'ㄊ' => Syllable::T, 'ㄋ' => Syllable::N, 'ㄌ' => Syllable::L,
    'ㄍ' => Syllable::G, 'ㄎ' => Syllable::K, 'ㄏ' => Syllable::H,
    'ㄐ' => Syllable::J, 'ㄑ' => Syllable::Q, 'ㄒ' => Syllable::X,
    'ㄓ' => Syllable::ZH, 'ㄔ' => Syllable::CH, 'ㄕ' => Syllable::SH, 'ㄖ' => Syllable::R,
    'ㄗ' => Syllable::Z, 'ㄘ' => Syllable::C, 'ㄙ' => Syllable::S,
    'ㄧ' => Syllable::I, 'ㄨ' => Syllable::U, 'ㄩ' => Syllable::UE,
    'ㄚ' => Syllable::A, 'ㄛ' => Syllable::O, 'ㄜ' => Syllable::ER, 'ㄝ' => Syllable::E,
    'ㄞ' => Syllable::AI, 'ㄟ' => Syllable::EI, 'ㄠ' => Syllable::AO, 'ㄡ' => Syllable::OU,
    'ㄢ' => Syllable::AN, 'ㄣ' => Syllable::EN, 'ㄤ' => Syllable::ANG, 'ㄥ' => Syllable::ENG,
    'ㄦ' => Syllable::ERR,
    'ˊ' => Syllable::TONE2, 'ˇ' => Syllable::TONE3, 'ˋ' => Syllable::TONE4, '˙' => Syllable::TONE5,
};

/// One phonetic syllable (or a part of one, while it is being typed).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Syllable(u16);

impl Syllable {
    pub const EMPTY: Syllable = Syllable(0);

    pub const B: Syllable = Syllable(Consonant::B as u16);
    pub const P: Syllable = Syllable(Consonant::P as u16);
    pub const M: Syllable = Syllable(Consonant::M as u16);
    pub const F: Syllable = Syllable(Consonant::F as u16);
    pub const D: Syllable = Syllable(Consonant::D as u16);
    pub const T: Syllable = Syllable(Consonant::T as u16);
    pub const N: Syllable = Syllable(Consonant::N as u16);
    pub const L: Syllable = Syllable(Consonant::L as u16);
    pub const G: Syllable = Syllable(Consonant::G as u16);
    pub const K: Syllable = Syllable(Consonant::K as u16);
    pub const H: Syllable = Syllable(Consonant::H as u16);
    pub const J: Syllable = Syllable(Consonant::J as u16);
    pub const Q: Syllable = Syllable(Consonant::Q as u16);
    pub const X: Syllable = Syllable(Consonant::X as u16);
    pub const ZH: Syllable = Syllable(Consonant::Zh as u16);
    pub const CH: Syllable = Syllable(Consonant::Ch as u16);
    pub const SH: Syllable = Syllable(Consonant::Sh as u16);
    pub const R: Syllable = Syllable(Consonant::R as u16);
    pub const Z: Syllable = Syllable(Consonant::Z as u16);
    pub const C: Syllable = Syllable(Consonant::C as u16);
    pub const S: Syllable = Syllable(Consonant::S as u16);

    pub const I: Syllable = Syllable(Medial::I as u16);
    pub const U: Syllable = Syllable(Medial::U as u16);
    pub const UE: Syllable = Syllable(Medial::Ue as u16);

    pub const A: Syllable = Syllable(Vowel::A as u16);
    pub const O: Syllable = Syllable(Vowel::O as u16);
    pub const ER: Syllable = Syllable(Vowel::Er as u16);
    pub const E: Syllable = Syllable(Vowel::E as u16);
    pub const AI: Syllable = Syllable(Vowel::Ai as u16);
    pub const EI: Syllable = Syllable(Vowel::Ei as u16);
    pub const AO: Syllable = Syllable(Vowel::Ao as u16);
    pub const OU: Syllable = Syllable(Vowel::Ou as u16);
    pub const AN: Syllable = Syllable(Vowel::An as u16);
    pub const EN: Syllable = Syllable(Vowel::En as u16);
    pub const ANG: Syllable = Syllable(Vowel::Ang as u16);
    pub const ENG: Syllable = Syllable(Vowel::Eng as u16);
    pub const ERR: Syllable = Syllable(Vowel::Err as u16);

    pub const TONE1: Syllable = Syllable(Tone::One as u16);
    pub const TONE2: Syllable = Syllable(Tone::Two as u16);
    pub const TONE3: Syllable = Syllable(Tone::Three as u16);
    pub const TONE4: Syllable = Syllable(Tone::Four as u16);
    pub const TONE5: Syllable = Syllable(Tone::Five as u16);

    /// Builds a syllable from typed components.
    pub fn new(
        consonant: Option<Consonant>,
        medial: Option<Medial>,
        vowel: Option<Vowel>,
        tone: Tone,
    ) -> Self {
        Self(
            consonant.map_or(0, |c| c as u16)
                | medial.map_or(0, |m| m as u16)
                | vowel.map_or(0, |v| v as u16)
                | tone as u16,
        )
    }

    /// Reinterprets packed bits.
    ///
    /// Bits outside the four fields are dropped, and so is any field whose
    /// value names no component (consonant 22..=31, vowel 14..=15, tone
    /// 5..=7), so `has_*` always agrees with the typed accessors.
    pub const fn from_bits(bits: u16) -> Self {
        let mut bits = bits & (CONSONANT_MASK | MEDIAL_MASK | VOWEL_MASK | TONE_MASK);
        if (bits & CONSONANT_MASK) as usize > Consonant::ALL.len() {
            bits &= !CONSONANT_MASK;
        }
        if ((bits & VOWEL_MASK) >> 7) as usize > Vowel::ALL.len() {
            bits &= !VOWEL_MASK;
        }
        if ((bits & TONE_MASK) >> 11) as usize >= Tone::ALL.len() {
            bits &= !TONE_MASK;
        }
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn has_consonant(self) -> bool {
        self.0 & CONSONANT_MASK != 0
    }

    pub fn has_medial(self) -> bool {
        self.0 & MEDIAL_MASK != 0
    }

    pub fn has_vowel(self) -> bool {
        self.0 & VOWEL_MASK != 0
    }

    /// True for tones 2 to 5; tone 1 carries no mark.
    pub fn has_tone_marker(self) -> bool {
        self.0 & TONE_MASK != 0
    }

    pub fn consonant(self) -> Option<Consonant> {
        Consonant::from_bits(self.0)
    }

    pub fn medial(self) -> Option<Medial> {
        Medial::from_bits(self.0)
    }

    pub fn vowel(self) -> Option<Vowel> {
        Vowel::from_bits(self.0)
    }

    pub fn tone(self) -> Tone {
        Tone::from_bits(self.0)
    }

    pub fn consonant_component(self) -> Syllable {
        Syllable(self.0 & CONSONANT_MASK)
    }

    pub fn medial_component(self) -> Syllable {
        Syllable(self.0 & MEDIAL_MASK)
    }

    pub fn vowel_component(self) -> Syllable {
        Syllable(self.0 & VOWEL_MASK)
    }

    pub fn tone_component(self) -> Syllable {
        Syllable(self.0 & TONE_MASK)
    }

    /// Non-empty components in consonant, medial, vowel, tone order.
    pub fn components(self) -> impl Iterator<Item = Syllable> {
        FIELD_MASKS
            .into_iter()
            .map(move |mask| Syllable(self.0 & mask))
            .filter(|c| !c.is_empty())
    }

    /// True iff some field is populated in both syllables.
    pub fn is_overlapping_with(self, other: Syllable) -> bool {
        FIELD_MASKS
            .iter()
            .any(|&mask| self.0 & mask != 0 && other.0 & mask != 0)
    }

    /// Union of the masks of the populated fields.
    pub fn mask_type(self) -> u16 {
        FIELD_MASKS
            .iter()
            .filter(|&&mask| self.0 & mask != 0)
            .fold(0, |acc, &mask| acc | mask)
    }

    /// ㄐ, ㄑ and ㄒ only occur before ㄧ or ㄩ.
    pub fn belongs_to_jqx_class(self) -> bool {
        matches!(
            self.consonant(),
            Some(Consonant::J | Consonant::Q | Consonant::X)
        )
    }

    /// ㄓ ㄔ ㄕ ㄖ ㄗ ㄘ ㄙ, which can stand alone as a syllable.
    pub fn belongs_to_zcsr_class(self) -> bool {
        matches!(self.consonant(), Some(c) if c >= Consonant::Zh)
    }

    /// Display form, e.g. `"ㄓㄨㄤˇ"`. Tone 1 adds nothing.
    pub fn composed_string(self) -> String {
        let mut out = String::new();
        if let Some(c) = self.consonant() {
            out.push(c.glyph());
        }
        if let Some(m) = self.medial() {
            out.push(m.glyph());
        }
        if let Some(v) = self.vowel() {
            out.push(v.glyph());
        }
        if let Some(t) = self.tone().glyph() {
            out.push(t);
        }
        out
    }

    /// Parses display text such as `"ㄊㄞˊ"`.
    ///
    /// Components must appear in consonant, medial, vowel, tone order, each at
    /// most once, and the medial/vowel pair must be one written Bopomofo
    /// allows. Surrounding whitespace is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use libzhuyin::{Syllable, SyllableError};
    ///
    /// let s = Syllable::from_composed_string("ㄊㄞˊ").unwrap();
    /// assert_eq!(s, Syllable::T + Syllable::AI + Syllable::TONE2);
    /// assert!(matches!(
    ///     Syllable::from_composed_string("ㄞㄊ"),
    ///     Err(SyllableError::ConsonantAfterVowel { .. })
    /// ));
    /// ```
    pub fn from_composed_string(text: &str) -> Result<Syllable, SyllableError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SyllableError::TooShort {
                text: text.to_string(),
            });
        }
        let owned = || trimmed.to_string();

        let mut syllable = Syllable::EMPTY;
        for glyph in trimmed.chars() {
            let Some(&component) = COMPONENT_BY_GLYPH.get(&glyph) else {
                return Err(SyllableError::InvalidCharacter { text: owned(), glyph });
            };

            match component.mask_type() {
                CONSONANT_MASK => {
                    if syllable.has_consonant() {
                        return Err(SyllableError::MultipleConsonants { text: owned() });
                    }
                    if syllable.has_medial() || syllable.has_vowel() {
                        return Err(SyllableError::ConsonantAfterVowel { text: owned(), glyph });
                    }
                }
                MEDIAL_MASK => {
                    if syllable.has_medial() {
                        return Err(SyllableError::MultipleMedials { text: owned() });
                    }
                    if syllable.has_vowel() {
                        return Err(SyllableError::MedialAfterVowel { text: owned(), glyph });
                    }
                }
                VOWEL_MASK => {
                    if syllable.has_vowel() {
                        return Err(SyllableError::MultipleVowels { text: owned() });
                    }
                    if let (Some(medial), Some(vowel)) = (syllable.medial(), component.vowel()) {
                        if !medial.combines_with(vowel) {
                            return Err(SyllableError::InvalidCombination {
                                text: owned(),
                                medial: medial.glyph(),
                                vowel: glyph,
                            });
                        }
                    }
                }
                _ => {
                    if !(syllable.has_consonant() || syllable.has_medial() || syllable.has_vowel()) {
                        return Err(SyllableError::ToneWithoutBase { text: owned(), glyph });
                    }
                    if syllable.has_tone_marker() {
                        return Err(SyllableError::MultipleTones { text: owned() });
                    }
                }
            }
            syllable += component;
        }
        Ok(syllable)
    }

    /// Collation order: all consonants vary fastest, then medials, vowels and
    /// tones. Always below 6160.
    pub fn absolute_order(self) -> u16 {
        (self.0 & CONSONANT_MASK)
            + ((self.0 & MEDIAL_MASK) >> 5) * 22
            + ((self.0 & VOWEL_MASK) >> 7) * 22 * 4
            + ((self.0 & TONE_MASK) >> 11) * 22 * 4 * 14
    }

    /// Inverse of [`Syllable::absolute_order`]; `None` past the last tone.
    pub fn from_absolute_order(order: u16) -> Option<Syllable> {
        let consonant = order % 22;
        let medial = (order / 22) % 4;
        let vowel = (order / (22 * 4)) % 14;
        let tone = order / (22 * 4 * 14);
        if tone > 4 {
            return None;
        }
        Some(Syllable(consonant | medial << 5 | vowel << 7 | tone << 11))
    }

    /// Two printable characters encoding [`Syllable::absolute_order`] in base 79
    /// from `'0'`, low digit first. Sorts the same way as the order for
    /// syllables with the same high digit.
    pub fn absolute_order_string(self) -> String {
        let order = self.absolute_order();
        let low = 48 + (order % 79) as u8;
        let high = 48 + ((order / 79) & 127) as u8;
        [char::from(low), char::from(high)].iter().collect()
    }

    pub fn from_absolute_order_string(text: &str) -> Option<Syllable> {
        let mut chars = text.chars();
        let low = u16::try_from(u32::from(chars.next()?)).ok()?.checked_sub(48)?;
        let high = u16::try_from(u32::from(chars.next()?)).ok()?.checked_sub(48)?;
        if chars.next().is_some() || low >= 79 {
            return None;
        }
        Self::from_absolute_order(high.checked_mul(79)?.checked_add(low)?)
    }
}

/// Field-wise merge: each populated field of `rhs` replaces the same field.
impl Add for Syllable {
    type Output = Syllable;

    fn add(mut self, rhs: Syllable) -> Syllable {
        self += rhs;
        self
    }
}

impl AddAssign for Syllable {
    fn add_assign(&mut self, rhs: Syllable) {
        for mask in FIELD_MASKS {
            if rhs.0 & mask != 0 {
                self.0 = (self.0 & !mask) | (rhs.0 & mask);
            }
        }
    }
}

impl From<Consonant> for Syllable {
    fn from(c: Consonant) -> Self {
        Syllable(c as u16)
    }
}

impl From<Medial> for Syllable {
    fn from(m: Medial) -> Self {
        Syllable(m as u16)
    }
}

impl From<Vowel> for Syllable {
    fn from(v: Vowel) -> Self {
        Syllable(v as u16)
    }
}

impl From<Tone> for Syllable {
    fn from(t: Tone) -> Self {
        Syllable(t as u16)
    }
}

impl FromStr for Syllable {
    type Err = SyllableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Syllable::from_composed_string(s)
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composed_string())
    }
}

impl fmt::Debug for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syllable({:?}, {:#06x})", self.composed_string(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_match_packed_fields() {
        let s = Syllable::new(Some(Consonant::Zh), Some(Medial::U), Some(Vowel::Ang), Tone::Three);
        assert_eq!(s, Syllable::ZH + Syllable::U + Syllable::ANG + Syllable::TONE3);
        assert_eq!(s.consonant(), Some(Consonant::Zh));
        assert_eq!(s.medial(), Some(Medial::U));
        assert_eq!(s.vowel(), Some(Vowel::Ang));
        assert_eq!(s.tone(), Tone::Three);
        assert_eq!(s.tone().number(), 3);
        assert_eq!(s.composed_string(), "ㄓㄨㄤˇ");
        assert_eq!(s.components().count(), 4);
    }

    #[test]
    fn unassigned_field_values_are_dropped() {
        assert_eq!(Syllable::from_bits(0x001f), Syllable::EMPTY);
        assert!(!Syllable::from_bits(22).has_consonant());
        assert_eq!(Syllable::from_bits(0x001f | 0x0080), Syllable::A);
        assert_eq!(Syllable::from_bits(0x0780 | 0x0001), Syllable::B);
        assert_eq!(Syllable::from_bits(0x3800 | 0x0080), Syllable::A);
        assert_eq!(Syllable::from_bits(0x2000 | 0x0080), Syllable::A + Syllable::TONE5);
        assert_eq!(Syllable::from_bits(0xc000 | 0x0015), Syllable::S);

        for bits in 0..=u16::MAX {
            let s = Syllable::from_bits(bits);
            assert_eq!(s.has_consonant(), s.consonant().is_some(), "{bits:#06x}");
            assert_eq!(s.has_medial(), s.medial().is_some(), "{bits:#06x}");
            assert_eq!(s.has_vowel(), s.vowel().is_some(), "{bits:#06x}");
            assert_eq!(s.has_tone_marker(), s.tone() != Tone::One, "{bits:#06x}");
        }
    }

    #[test]
    fn add_overwrites_populated_fields_only() {
        let mut s = Syllable::B + Syllable::A;
        s += Syllable::P + Syllable::TONE2;
        assert_eq!(s, Syllable::P + Syllable::A + Syllable::TONE2);
        assert_eq!(s + Syllable::EMPTY, s);
    }

    #[test]
    fn overlap_and_mask_type() {
        let ba = Syllable::B + Syllable::A;
        assert!(ba.is_overlapping_with(Syllable::P));
        assert!(!ba.is_overlapping_with(Syllable::I + Syllable::TONE4));
        assert_eq!(ba.mask_type(), CONSONANT_MASK | VOWEL_MASK);
        assert_eq!(Syllable::EMPTY.mask_type(), 0);
    }

    #[test]
    fn consonant_classes() {
        assert!(Syllable::Q.belongs_to_jqx_class());
        assert!(!Syllable::ZH.belongs_to_jqx_class());
        for c in [Syllable::ZH, Syllable::CH, Syllable::SH, Syllable::R, Syllable::Z, Syllable::C, Syllable::S] {
            assert!(c.belongs_to_zcsr_class(), "{c:?}");
        }
        assert!(!Syllable::X.belongs_to_zcsr_class());
        assert!(!Syllable::A.belongs_to_zcsr_class());
    }

    #[test]
    fn tone_one_renders_nothing() {
        assert_eq!((Syllable::B + Syllable::A).composed_string(), "ㄅㄚ");
        assert_eq!((Syllable::B + Syllable::A + Syllable::TONE5).to_string(), "ㄅㄚ˙");
        assert!(!Syllable::TONE1.has_tone_marker());
    }

    #[test]
    fn absolute_order_round_trips() {
        let s = Syllable::X + Syllable::UE + Syllable::AN + Syllable::TONE4;
        assert_eq!(Syllable::from_absolute_order(s.absolute_order()), Some(s));
        let key = s.absolute_order_string();
        assert_eq!(key.chars().count(), 2);
        assert_eq!(Syllable::from_absolute_order_string(&key), Some(s));
        assert_eq!(Syllable::from_absolute_order(6160), None);
        assert_eq!(Syllable::from_absolute_order_string("0"), None);
    }

    #[test]
    fn debug_shows_glyphs() {
        assert_eq!(format!("{:?}", Syllable::B + Syllable::A), "Syllable(\"ㄅㄚ\", 0x0081)");
    }
}
