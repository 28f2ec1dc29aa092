/*!
Bopomofo keyboard layouts - `libzhuyin/src/keyboard_layout.rs`

Purpose
-------
- Map physical keys to Bopomofo components for the common Taiwanese layouts.
- Turn a raw key sequence back into a `Syllable`, resolving keys that carry
  more than one component (Hsu, ETen26) from their position and neighbours.
- Turn a `Syllable` into the key sequence that types it.

Notes
-----
- Tables are ordered. When a component sits on several keys, the first key
  listed is the one `component_to_key` reports.
- `HanyuPinyin` has no table; pinyin entry goes through
  `Syllable::from_hanyu_pinyin` instead.
*/

use std::fmt;
use std::str::FromStr;

use phf::phf_ordered_map;
use serde::{Deserialize, Serialize};

use crate::syllable::Syllable;

type KeyTable = phf::OrderedMap<char, &'static [Syllable]>;

static STANDARD: KeyTable = phf_ordered_map! {
    '1' => &[Syllable::B], 'q' => &[Syllable::P], 'a' => &[Syllable::M], 'z' => &[Syllable::F],
    '2' => &[Syllable::D], 'w' => &[Syllable::T], 's' => &[Syllable::N], 'x' => &[Syllable::L],
    'e' => &[Syllable::G], 'd' => &[Syllable::K], 'c' => &[Syllable::H],
    'r' => &[Syllable::J], 'f' => &[Syllable::Q], 'v' => &[Syllable::X],
    '5' => &[Syllable::ZH], 't' => &[Syllable::CH], 'g' => &[Syllable::SH], 'b' => &[Syllable::R],
    'y' => &[Syllable::Z], 'h' => &[Syllable::C], 'n' => &[Syllable::S],
    'u' => &[Syllable::I], 'j' => &[Syllable::U], 'm' => &[Syllable::UE],
    '8' => &[Syllable::A], 'i' => &[Syllable::O], 'k' => &[Syllable::ER], ',' => &[Syllable::E],
    '9' => &[Syllable::AI], 'o' => &[Syllable::EI], 'l' => &[Syllable::AO], '.' => &[Syllable::OU],
    '0' => &[Syllable::AN], 'p' => &[Syllable::EN], ';' => &[Syllable::ANG], '/' => &[Syllable::ENG],
    '-' => &[Syllable::ERR],
    '3' => &[Syllable::TONE3], '4' => &[Syllable::TONE4], '6' => &[Syllable::TONE2], '7' => &[Syllable::TONE5],
};

static IBM: KeyTable = phf_ordered_map! {
    '1' => &[Syllable::B], '2' => &[Syllable::P], '3' => &[Syllable::M], '4' => &[Syllable::F],
    '5' => &[Syllable::D], '6' => &[Syllable::T], '7' => &[Syllable::N], '8' => &[Syllable::L],
    '9' => &[Syllable::G], '0' => &[Syllable::K], '-' => &[Syllable::H],
    'q' => &[Syllable::J], 'w' => &[Syllable::Q], 'e' => &[Syllable::X],
    'r' => &[Syllable::ZH], 't' => &[Syllable::CH], 'y' => &[Syllable::SH], 'u' => &[Syllable::R],
    'i' => &[Syllable::Z], 'o' => &[Syllable::C], 'p' => &[Syllable::S],
    'a' => &[Syllable::I], 's' => &[Syllable::U], 'd' => &[Syllable::UE],
    'f' => &[Syllable::A], 'g' => &[Syllable::O], 'h' => &[Syllable::ER], 'j' => &[Syllable::E],
    'k' => &[Syllable::AI], 'l' => &[Syllable::EI], ';' => &[Syllable::AO], 'z' => &[Syllable::OU],
    'x' => &[Syllable::AN], 'c' => &[Syllable::EN], 'v' => &[Syllable::ANG], 'b' => &[Syllable::ENG],
    'n' => &[Syllable::ERR],
    'm' => &[Syllable::TONE2], ',' => &[Syllable::TONE3], '.' => &[Syllable::TONE4], '/' => &[Syllable::TONE5],
};

static ETEN: KeyTable = phf_ordered_map! {
    'b' => &[Syllable::B], 'p' => &[Syllable::P], 'm' => &[Syllable::M], 'f' => &[Syllable::F],
    'd' => &[Syllable::D], 't' => &[Syllable::T], 'n' => &[Syllable::N], 'l' => &[Syllable::L],
    'v' => &[Syllable::G], 'k' => &[Syllable::K], 'h' => &[Syllable::H],
    'g' => &[Syllable::J], '7' => &[Syllable::Q], 'c' => &[Syllable::X],
    ',' => &[Syllable::ZH], '.' => &[Syllable::CH], '/' => &[Syllable::SH], 'j' => &[Syllable::R],
    ';' => &[Syllable::Z], '\'' => &[Syllable::C], 's' => &[Syllable::S],
    'e' => &[Syllable::I], 'x' => &[Syllable::U], 'u' => &[Syllable::UE],
    'a' => &[Syllable::A], 'o' => &[Syllable::O], 'r' => &[Syllable::ER], 'w' => &[Syllable::E],
    'i' => &[Syllable::AI], 'q' => &[Syllable::EI], 'z' => &[Syllable::AO], 'y' => &[Syllable::OU],
    '8' => &[Syllable::AN], '9' => &[Syllable::EN], '0' => &[Syllable::ANG], '-' => &[Syllable::ENG],
    '=' => &[Syllable::ERR],
    '2' => &[Syllable::TONE2], '3' => &[Syllable::TONE3], '4' => &[Syllable::TONE4], '1' => &[Syllable::TONE5],
};

static HSU: KeyTable = phf_ordered_map! {
    'b' => &[Syllable::B], 'p' => &[Syllable::P],
    'm' => &[Syllable::M, Syllable::AN],
    'f' => &[Syllable::F, Syllable::TONE3],
    'd' => &[Syllable::D, Syllable::TONE2],
    't' => &[Syllable::T],
    'n' => &[Syllable::N, Syllable::EN],
    'l' => &[Syllable::L, Syllable::ENG, Syllable::ERR],
    'g' => &[Syllable::G, Syllable::ER],
    'k' => &[Syllable::K, Syllable::ANG],
    'h' => &[Syllable::H, Syllable::O],
    'j' => &[Syllable::J, Syllable::ZH, Syllable::TONE4],
    'v' => &[Syllable::Q, Syllable::CH],
    'c' => &[Syllable::X, Syllable::SH],
    'r' => &[Syllable::R], 'z' => &[Syllable::Z],
    'a' => &[Syllable::C, Syllable::EI],
    's' => &[Syllable::S, Syllable::TONE5],
    'e' => &[Syllable::I, Syllable::E],
    'x' => &[Syllable::U], 'u' => &[Syllable::UE],
    'y' => &[Syllable::A], 'i' => &[Syllable::AI], 'w' => &[Syllable::AO], 'o' => &[Syllable::OU],
};

static ETEN26: KeyTable = phf_ordered_map! {
    'b' => &[Syllable::B],
    'p' => &[Syllable::P, Syllable::OU],
    'm' => &[Syllable::M, Syllable::AN],
    'f' => &[Syllable::F, Syllable::TONE2],
    'd' => &[Syllable::D, Syllable::TONE5],
    't' => &[Syllable::T, Syllable::ANG],
    'n' => &[Syllable::N, Syllable::EN],
    'l' => &[Syllable::L, Syllable::ENG],
    'v' => &[Syllable::G, Syllable::Q],
    'k' => &[Syllable::K, Syllable::TONE4],
    'h' => &[Syllable::H, Syllable::ERR],
    'g' => &[Syllable::ZH, Syllable::J],
    'c' => &[Syllable::SH, Syllable::X],
    'y' => &[Syllable::CH],
    'j' => &[Syllable::R, Syllable::TONE3],
    'q' => &[Syllable::Z, Syllable::EI],
    'w' => &[Syllable::C, Syllable::E],
    's' => &[Syllable::S],
    'e' => &[Syllable::I], 'x' => &[Syllable::U], 'u' => &[Syllable::UE],
    'a' => &[Syllable::A], 'o' => &[Syllable::O], 'r' => &[Syllable::ER],
    'i' => &[Syllable::AI], 'z' => &[Syllable::AO],
};

/// The supported layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Standard,
    Ibm,
    Eten,
    Hsu,
    Eten26,
    HanyuPinyin,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 6] = [
        LayoutKind::Standard,
        LayoutKind::Ibm,
        LayoutKind::Eten,
        LayoutKind::Hsu,
        LayoutKind::Eten26,
        LayoutKind::HanyuPinyin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Standard => "standard",
            LayoutKind::Ibm => "ibm",
            LayoutKind::Eten => "eten",
            LayoutKind::Hsu => "hsu",
            LayoutKind::Eten26 => "eten26",
            LayoutKind::HanyuPinyin => "hanyupinyin",
        }
    }

    pub fn is_pinyin(self) -> bool {
        self == LayoutKind::HanyuPinyin
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        LayoutKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered || (lowered == "pinyin" && kind.is_pinyin()))
            .ok_or_else(|| format!("unknown keyboard layout: {s}"))
    }
}

/// A keyboard layout: key <-> component tables plus the sequence decoder.
///
/// Cheap to copy; all tables are static.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardLayout {
    kind: LayoutKind,
}

impl KeyboardLayout {
    pub const fn new(kind: LayoutKind) -> Self {
        Self { kind }
    }

    pub const fn standard() -> Self {
        Self::new(LayoutKind::Standard)
    }

    pub const fn ibm() -> Self {
        Self::new(LayoutKind::Ibm)
    }

    pub const fn eten() -> Self {
        Self::new(LayoutKind::Eten)
    }

    pub const fn hsu() -> Self {
        Self::new(LayoutKind::Hsu)
    }

    pub const fn eten26() -> Self {
        Self::new(LayoutKind::Eten26)
    }

    pub const fn hanyu_pinyin() -> Self {
        Self::new(LayoutKind::HanyuPinyin)
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_pinyin(&self) -> bool {
        self.kind.is_pinyin()
    }

    fn table(&self) -> Option<&'static KeyTable> {
        match self.kind {
            LayoutKind::Standard => Some(&STANDARD),
            LayoutKind::Ibm => Some(&IBM),
            LayoutKind::Eten => Some(&ETEN),
            LayoutKind::Hsu => Some(&HSU),
            LayoutKind::Eten26 => Some(&ETEN26),
            LayoutKind::HanyuPinyin => None,
        }
    }

    /// Components printed on `key`, most common reading first. Empty for
    /// keys the layout does not use.
    pub fn key_to_components(&self, key: char) -> &'static [Syllable] {
        self.table()
            .and_then(|table| table.get(&key))
            .copied()
            .unwrap_or(&[])
    }

    /// The first key carrying `component`.
    pub fn component_to_key(&self, component: Syllable) -> Option<char> {
        self.table()?
            .entries()
            .find(|(_, components)| components.contains(&component))
            .map(|(&key, _)| key)
    }

    /// Whether `key` is the primary key of a tone mark (tones 2-5).
    pub fn is_tone_key(&self, key: char) -> bool {
        [
            Syllable::TONE2,
            Syllable::TONE3,
            Syllable::TONE4,
            Syllable::TONE5,
        ]
        .into_iter()
        .any(|tone| self.component_to_key(tone) == Some(key))
    }

    fn is_i_or_ue_key(&self, key: char) -> bool {
        self.component_to_key(Syllable::I) == Some(key)
            || self.component_to_key(Syllable::UE) == Some(key)
    }

    /// True at the end of the sequence or when the next key is a tone key.
    fn ends_or_tone_ahead(&self, keys: &[char], ahead: usize) -> bool {
        keys.get(ahead).map_or(true, |&key| self.is_tone_key(key))
    }

    /// Keys that type `syllable`, consonant first and tone last. Components
    /// the layout cannot type are skipped.
    pub fn key_sequence_from_syllable(&self, syllable: Syllable) -> String {
        syllable
            .components()
            .filter_map(|component| self.component_to_key(component))
            .collect()
    }

    /// Decodes a raw key sequence. Keys with several components are
    /// resolved from what has been typed so far and what follows.
    pub fn syllable_from_key_sequence(&self, sequence: &str) -> Syllable {
        let keys: Vec<char> = sequence.chars().collect();
        let mut syllable = Syllable::EMPTY;

        for (i, &key) in keys.iter().enumerate() {
            let components = self.key_to_components(key);
            let (head, follow) = match components {
                [] => continue,
                [only] => {
                    syllable += *only;
                    continue;
                }
                [head, follow, ..] => (*head, *follow),
            };
            let ending = components.get(2).copied().unwrap_or(follow);
            let i_or_ue_before = keys[..i].iter().any(|&k| self.is_i_or_ue_key(k));
            let i_or_ue_ahead = keys[i + 1..].iter().any(|&k| self.is_i_or_ue_key(k));

            // ㄝ only follows ㄧ or ㄩ
            let head_is_e = head.vowel_component() == Syllable::E;
            let follow_is_e = follow.vowel_component() == Syllable::E;
            if head_is_e != follow_is_e {
                let e_side = if head_is_e { head } else { follow };
                let other = if head_is_e { follow } else { head };
                syllable += if i_or_ue_before { e_side } else { other };
                continue;
            }

            // ㄐㄑㄒ only precede ㄧ or ㄩ
            let head_jqx = head.belongs_to_jqx_class();
            let follow_jqx = follow.belongs_to_jqx_class();
            if head_jqx != follow_jqx {
                if !syllable.is_empty() {
                    if ending != follow {
                        syllable += ending;
                    }
                } else {
                    let jqx = if head_jqx { head } else { follow };
                    let other = if head_jqx { follow } else { head };
                    syllable += if i_or_ue_ahead { jqx } else { other };
                }
                continue;
            }

            if keys.len() == 1 {
                syllable += if head.has_vowel()
                    || follow.has_tone_marker()
                    || head.belongs_to_zcsr_class()
                {
                    head
                } else if follow.has_vowel() || ending.has_tone_marker() {
                    follow
                } else {
                    ending
                };
                continue;
            }

            let ends_here = self.ends_or_tone_ahead(&keys, i + 1);
            if syllable.mask_type() & head.mask_type() == 0 && !ends_here {
                syllable += head;
            } else if ends_here && head.belongs_to_zcsr_class() && syllable.is_empty() {
                syllable += head;
            } else if syllable.mask_type() < follow.mask_type() {
                syllable += follow;
            } else {
                syllable += ending;
            }
        }

        if self.kind == LayoutKind::Hsu {
            // a lone ㄥ is the ㄦ on the same key; ㄍㄧ and ㄍㄩ are ㄐ
            if syllable.vowel_component() == Syllable::ENG
                && !syllable.has_consonant()
                && !syllable.has_medial()
            {
                syllable += Syllable::ERR;
            } else if syllable.consonant_component() == Syllable::G
                && (syllable.medial_component() == Syllable::I
                    || syllable.medial_component() == Syllable::UE)
            {
                syllable += Syllable::J;
            }
        }

        syllable
    }
}

impl From<LayoutKind> for KeyboardLayout {
    fn from(kind: LayoutKind) -> Self {
        Self::new(kind)
    }
}
