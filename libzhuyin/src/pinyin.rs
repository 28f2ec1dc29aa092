//! Hanyu Pinyin <-> Bopomofo conversion.
//!
//! Parsing consumes known prefixes longest-first: whole `y`-syllables, then
//! an initial, the `zh/ch/sh/r/z/c/s` retroflex/sibilant initials, spelled
//! finals with their contractions (`iong`, `ing`, `un`, `iu`, `ui`, ...),
//! a medial, a rhyme and finally a tone digit. Anything left over is ignored.
//! Rendering applies the standard spelling rules in reverse.

use crate::syllable::{Consonant, Medial, Syllable, Tone, Vowel};

/// Syllables written with a leading `y` that do not decompose letter by letter.
const Y_SYLLABLES: [(&str, Medial, Option<Vowel>); 8] = [
    ("yuan", Medial::Ue, Some(Vowel::An)),
    ("ying", Medial::I, Some(Vowel::Eng)),
    ("yung", Medial::Ue, Some(Vowel::Eng)),
    ("yong", Medial::Ue, Some(Vowel::Eng)),
    ("yue", Medial::Ue, Some(Vowel::E)),
    ("yun", Medial::Ue, Some(Vowel::En)),
    ("you", Medial::I, Some(Vowel::Ou)),
    ("yu", Medial::Ue, None),
];

const RETROFLEX_INITIALS: [(&str, Consonant); 7] = [
    ("zh", Consonant::Zh),
    ("ch", Consonant::Ch),
    ("sh", Consonant::Sh),
    ("r", Consonant::R),
    ("z", Consonant::Z),
    ("c", Consonant::C),
    ("s", Consonant::S),
];

const RHYMES: [(&str, Vowel); 12] = [
    ("ang", Vowel::Ang),
    ("eng", Vowel::Eng),
    ("err", Vowel::Err),
    ("ai", Vowel::Ai),
    ("ei", Vowel::Ei),
    ("ao", Vowel::Ao),
    ("ou", Vowel::Ou),
    ("an", Vowel::An),
    ("en", Vowel::En),
    ("er", Vowel::Err),
    ("a", Vowel::A),
    ("o", Vowel::O),
];

fn consume<'a>(text: &mut &'a str, prefix: &str) -> bool {
    match text.strip_prefix(prefix) {
        Some(rest) => {
            *text = rest;
            true
        }
        None => false,
    }
}

fn single_letter_initial(c: char) -> Option<Consonant> {
    Some(match c {
        'b' => Consonant::B,
        'p' => Consonant::P,
        'm' => Consonant::M,
        'f' => Consonant::F,
        'd' => Consonant::D,
        't' => Consonant::T,
        'n' => Consonant::N,
        'l' => Consonant::L,
        'g' => Consonant::G,
        'k' => Consonant::K,
        'h' => Consonant::H,
        'j' => Consonant::J,
        'q' => Consonant::Q,
        'x' => Consonant::X,
        _ => return None,
    })
}

fn is_jqx(consonant: Option<Consonant>) -> bool {
    matches!(consonant, Some(Consonant::J | Consonant::Q | Consonant::X))
}

impl Syllable {
    /// Parses a Hanyu Pinyin syllable with an optional trailing tone digit,
    /// e.g. `"zhuang3"`, `"lv4"`, `"yuan2"`. Case-insensitive. Unrecognized
    /// text yields whatever components could be read, possibly none.
    ///
    /// # Example
    ///
    /// ```rust
    /// use libzhuyin::Syllable;
    ///
    /// assert_eq!(Syllable::from_hanyu_pinyin("ba1").composed_string(), "ㄅㄚ");
    /// assert_eq!(Syllable::from_hanyu_pinyin("yang4").composed_string(), "ㄧㄤˋ");
    /// ```
    pub fn from_hanyu_pinyin(pinyin: &str) -> Syllable {
        let lowered = pinyin.to_lowercase();
        let mut text = lowered.as_str();

        let mut consonant: Option<Consonant> = None;
        let mut medial: Option<Medial> = None;
        let mut vowel: Option<Vowel> = None;
        let mut tone = Tone::One;
        let mut independent_consonant = false;

        if let Some(&(_, m, v)) = Y_SYLLABLES.iter().find(|(p, _, _)| consume(&mut text, p)) {
            medial = Some(m);
            vowel = v;
        }

        if let Some(first) = text.chars().next() {
            if let Some(c) = single_letter_initial(first) {
                consonant = Some(c);
                text = &text[1..];
            } else if first == 'w' {
                medial = Some(Medial::U);
                text = &text[1..];
            } else if first == 'y' {
                if medial.is_none() && vowel.is_none() {
                    medial = Some(Medial::I);
                }
                text = &text[1..];
            }
        }

        if let Some(&(_, c)) = RETROFLEX_INITIALS
            .iter()
            .find(|(p, _)| consume(&mut text, p))
        {
            consonant = Some(c);
            independent_consonant = true;
        }

        // Spelled finals and their contractions; longer spellings first.
        if consume(&mut text, "veng") || consume(&mut text, "iong") {
            medial = Some(Medial::Ue);
            vowel = Some(Vowel::Eng);
        } else if consume(&mut text, "ing") {
            medial = Some(Medial::I);
            vowel = Some(Vowel::Eng);
        } else if consume(&mut text, "ien") {
            medial = Some(Medial::I);
            vowel = Some(Vowel::En);
        } else if consume(&mut text, "iou") {
            medial = Some(Medial::I);
            vowel = Some(Vowel::Ou);
        } else if consume(&mut text, "uen") {
            medial = Some(Medial::U);
            vowel = Some(Vowel::En);
        } else if consume(&mut text, "ven") {
            medial = Some(Medial::Ue);
            vowel = Some(Vowel::En);
        } else if consume(&mut text, "uei") {
            medial = Some(Medial::U);
            vowel = Some(Vowel::Ei);
        } else if consume(&mut text, "ung") || consume(&mut text, "ong") {
            // feng/fong have no medial
            if consonant != Some(Consonant::F) {
                medial = Some(Medial::U);
            }
            vowel = Some(Vowel::Eng);
        } else if consume(&mut text, "un") {
            medial = Some(if is_jqx(consonant) { Medial::Ue } else { Medial::U });
            vowel = Some(Vowel::En);
        } else if consume(&mut text, "iu") {
            medial = Some(Medial::I);
            vowel = Some(Vowel::Ou);
        } else if consume(&mut text, "in") {
            medial = Some(Medial::I);
            vowel = Some(Vowel::En);
        } else if consume(&mut text, "vn") {
            medial = Some(Medial::Ue);
            vowel = Some(Vowel::En);
        } else if consume(&mut text, "ui") {
            medial = Some(Medial::U);
            vowel = Some(Vowel::Ei);
        } else if consume(&mut text, "ue") {
            medial = Some(Medial::Ue);
            vowel = Some(Vowel::E);
        } else if consume(&mut text, "ü") {
            medial = Some(Medial::Ue);
        }

        if consume(&mut text, "i") {
            // zhi, chi, shi, ri, zi, ci, si: the i is silent
            medial = if independent_consonant { None } else { Some(Medial::I) };
        } else if consume(&mut text, "u") {
            medial = Some(if is_jqx(consonant) { Medial::Ue } else { Medial::U });
        } else if consume(&mut text, "v") {
            medial = Some(Medial::Ue);
        }

        if let Some(&(_, v)) = RHYMES.iter().find(|(p, _)| consume(&mut text, p)) {
            vowel = Some(v);
        } else if consume(&mut text, "e") {
            vowel = Some(if medial.is_some() { Vowel::E } else { Vowel::Er });
        }

        tone = match text.chars().next() {
            Some('1') => Tone::One,
            Some('2') => Tone::Two,
            Some('3') => Tone::Three,
            Some('4') => Tone::Four,
            Some('5') => Tone::Five,
            _ => tone,
        };

        Syllable::new(consonant, medial, vowel, tone)
    }

    /// Renders the syllable in Hanyu Pinyin.
    ///
    /// `include_tone` appends 2-5 for marked tones (tone 1 gets no digit).
    /// `use_v_for_u_umlaut` writes `v` instead of `ü` after `n`/`l`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use libzhuyin::Syllable;
    ///
    /// let lv = Syllable::from_composed_string("ㄌㄩˋ").unwrap();
    /// assert_eq!(lv.to_hanyu_pinyin(true, true), "lv4");
    /// assert_eq!(lv.to_hanyu_pinyin(false, false), "lü");
    /// ```
    pub fn to_hanyu_pinyin(self, include_tone: bool, use_v_for_u_umlaut: bool) -> String {
        let cc = self.consonant();
        let mvc = self.medial();
        let vc = self.vowel();
        let bare = mvc.is_none() && vc.is_none();

        let (mut consonant, mut middle) = match cc {
            None => ("", ""),
            Some(c) => {
                let letters = match c {
                    Consonant::B => "b",
                    Consonant::P => "p",
                    Consonant::M => "m",
                    Consonant::F => "f",
                    Consonant::D => "d",
                    Consonant::T => "t",
                    Consonant::N => "n",
                    Consonant::L => "l",
                    Consonant::G => "g",
                    Consonant::K => "k",
                    Consonant::H => "h",
                    Consonant::J => "j",
                    Consonant::Q => "q",
                    Consonant::X => "x",
                    Consonant::Zh => "zh",
                    Consonant::Ch => "ch",
                    Consonant::Sh => "sh",
                    Consonant::R => "r",
                    Consonant::Z => "z",
                    Consonant::C => "c",
                    Consonant::S => "s",
                };
                let needs_i = bare && (c >= Consonant::J);
                (letters, if needs_i { "i" } else { "" })
            }
        };

        match mvc {
            Some(Medial::I) => {
                if cc.is_none() {
                    consonant = "y";
                }
                middle = if vc.is_none() || cc.is_some() { "i" } else { "" };
            }
            Some(Medial::U) => {
                if cc.is_none() {
                    consonant = "w";
                }
                middle = if vc.is_none() || cc.is_some() { "u" } else { "" };
            }
            Some(Medial::Ue) => {
                if cc.is_none() {
                    consonant = "y";
                }
                let after_nl = matches!(cc, Some(Consonant::N | Consonant::L));
                middle = if after_nl && vc != Some(Vowel::E) {
                    if use_v_for_u_umlaut {
                        "v"
                    } else {
                        "ü"
                    }
                } else {
                    "u"
                };
            }
            None => {}
        }

        let mut vowel = match vc {
            None => "",
            Some(Vowel::A) => "a",
            Some(Vowel::O) => "o",
            Some(Vowel::Er | Vowel::E) => "e",
            Some(Vowel::Ai) => "ai",
            Some(Vowel::Ei) => "ei",
            Some(Vowel::Ao) => "ao",
            Some(Vowel::Ou) => "ou",
            Some(Vowel::An) => "an",
            Some(Vowel::En) => "en",
            Some(Vowel::Ang) => "ang",
            Some(Vowel::Eng) => "eng",
            Some(Vowel::Err) => "er",
        };

        // ueng -> ong, except the bare "weng"
        if matches!(mvc, Some(Medial::U | Medial::Ue)) && vc == Some(Vowel::Eng) {
            middle = "";
            vowel = if is_jqx(cc) {
                "iong"
            } else if cc.is_none() && mvc == Some(Medial::U) {
                "eng"
            } else {
                "ong"
            };
        }

        // ien, uen, üen -> in, un, ün; but wen, yin, yun
        if mvc.is_some() && vc == Some(Vowel::En) {
            vowel = match (cc, mvc) {
                (Some(_), _) => "n",
                (None, Some(Medial::Ue)) => "n",
                (None, Some(Medial::U)) => "en",
                _ => "in",
            };
        }

        // iou -> iu
        if cc.is_some() && mvc == Some(Medial::I) && vc == Some(Vowel::Ou) {
            middle = "";
            vowel = "iu";
        }

        // ieng -> ing
        if mvc == Some(Medial::I) && vc == Some(Vowel::Eng) {
            middle = "";
            vowel = "ing";
        }

        // uei -> ui
        if cc.is_some() && mvc == Some(Medial::U) && vc == Some(Vowel::Ei) {
            middle = "";
            vowel = "ui";
        }

        let mut out = String::with_capacity(8);
        out.push_str(consonant);
        out.push_str(middle);
        out.push_str(vowel);
        if include_tone && self.has_tone_marker() {
            out.push(char::from(b'0' + self.tone().number()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bpmf(pinyin: &str) -> String {
        Syllable::from_hanyu_pinyin(pinyin).composed_string()
    }

    #[test]
    fn empty_input_is_empty_syllable() {
        assert!(Syllable::from_hanyu_pinyin("").is_empty());
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(bpmf("ZHUANG3"), "ㄓㄨㄤˇ");
    }

    #[test]
    fn retroflex_initials_swallow_the_silent_i() {
        assert_eq!(bpmf("zhi4"), "ㄓˋ");
        assert_eq!(bpmf("si1"), "ㄙ");
        assert_eq!(bpmf("ri4"), "ㄖˋ");
        assert_eq!(Syllable::ZH.to_hanyu_pinyin(false, false), "zhi");
        assert_eq!(Syllable::J.to_hanyu_pinyin(false, false), "ji");
    }

    #[test]
    fn f_keeps_eng_without_medial() {
        assert_eq!(bpmf("feng1"), "ㄈㄥ");
        assert_eq!(bpmf("fong1"), "ㄈㄥ");
        assert_eq!(bpmf("dong1"), "ㄉㄨㄥ");
    }
}
