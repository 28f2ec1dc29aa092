//! Zhuyin decode engine for libzhuyin
//!
//! Wires the pieces together for one composing session: keys go into a
//! [`ReadingBuffer`], finished syllables become readings in a
//! [`ReadingGrid`], the grid is walked after every change, and the
//! [`UserOverrideModel`] both learns from candidate picks and nudges later
//! walks toward them.
//!
//! The engine never reads a clock; every call that can learn or suggest takes
//! the caller's timestamp.

use tracing::{debug, trace};

use libchinese_lattice::{
    Candidate, LanguageModel, OverrideType, ReadingGrid, UserOverrideModel, WalkResult,
};

use crate::config::ZhuyinConfig;
use crate::keyboard_layout::{KeyboardLayout, LayoutKind};
use crate::reading_buffer::ReadingBuffer;
use crate::syllable::Syllable;

/// What [`Engine::handle_key`] did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a key for the current layout; nothing changed.
    Ignored,
    /// The key went into the reading buffer, which is still being typed.
    Composing,
    /// A reading was added to (or re-toned in) the grid and the grid re-walked.
    Inserted,
    /// The finished reading is unknown to the language model and was dropped.
    Rejected,
}

/// Public engine for libzhuyin
pub struct Engine<L> {
    config: ZhuyinConfig,
    buffer: ReadingBuffer,
    grid: ReadingGrid<L>,
    user_override: UserOverrideModel,
    latest_walk: WalkResult,
}

impl<L: LanguageModel> Engine<L> {
    pub fn new(lm: L, config: ZhuyinConfig) -> Self {
        let user_override = config.base.build_user_override_model();
        Self::with_user_override_model(lm, config, user_override)
    }

    /// Starts from a previously learned override model, e.g. one restored with
    /// [`UserOverrideModel::from_snapshot`].
    pub fn with_user_override_model(
        lm: L,
        config: ZhuyinConfig,
        user_override: UserOverrideModel,
    ) -> Self {
        Self {
            buffer: ReadingBuffer::new(KeyboardLayout::new(config.keyboard_layout)),
            grid: config.base.build_grid(lm),
            user_override,
            latest_walk: WalkResult::default(),
            config,
        }
    }

    pub fn config(&self) -> &ZhuyinConfig {
        &self.config
    }

    pub fn buffer(&self) -> &ReadingBuffer {
        &self.buffer
    }

    pub fn grid(&self) -> &ReadingGrid<L> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ReadingGrid<L> {
        &mut self.grid
    }

    pub fn user_override_model(&self) -> &UserOverrideModel {
        &self.user_override
    }

    pub fn user_override_model_mut(&mut self) -> &mut UserOverrideModel {
        &mut self.user_override
    }

    pub fn latest_walk(&self) -> &WalkResult {
        &self.latest_walk
    }

    pub fn set_layout(&mut self, kind: LayoutKind) {
        self.config.keyboard_layout = kind;
        self.buffer.set_layout(KeyboardLayout::new(kind));
    }

    /// Feeds one key. `' '` finishes a syllable typed without a tone mark.
    pub fn handle_key(&mut self, key: char, timestamp: i64) -> KeyOutcome {
        let is_space = key == ' ';
        let consumed = !is_space && self.buffer.combine_key(key);
        if !consumed && !is_space {
            return KeyOutcome::Ignored;
        }

        if consumed && self.buffer.has_tone_marker_only() && self.retone_previous_reading(key) {
            return KeyOutcome::Inserted;
        }

        let complete = self.buffer.has_tone_marker() && !self.buffer.has_tone_marker_only();
        if complete || (is_space && !self.buffer.is_empty()) {
            return self.compose_reading(timestamp);
        }

        if consumed {
            KeyOutcome::Composing
        } else {
            KeyOutcome::Ignored
        }
    }

    /// A lone tone key right after a composed reading changes that reading's
    /// tone, if the re-toned reading exists.
    fn retone_previous_reading(&mut self, key: char) -> bool {
        let Some(previous) = self
            .grid
            .cursor()
            .checked_sub(1)
            .and_then(|index| self.grid.readings().get(index))
        else {
            return false;
        };
        if previous.starts_with('_') {
            return false;
        }
        let Ok(syllable) = previous.parse::<Syllable>() else {
            return false;
        };

        let mut scratch = ReadingBuffer::new(self.buffer.layout());
        scratch.set_syllable_removing_tone(syllable);
        scratch.combine_key(key);
        let retoned = scratch.syllable().composed_string();
        if !self.grid.language_model().has_unigrams(&retoned) {
            return false;
        }

        debug!(from = previous.as_str(), to = retoned.as_str(), "re-toning reading");
        self.buffer.clear();
        self.grid.delete_reading_before_cursor();
        self.grid.insert_reading(&retoned);
        self.walk();
        true
    }

    fn compose_reading(&mut self, timestamp: i64) -> KeyOutcome {
        let reading = self.buffer.syllable().composed_string();
        self.buffer.clear();

        if !self.grid.insert_reading(&reading) {
            debug!(reading = reading.as_str(), "no candidates for reading");
            return KeyOutcome::Rejected;
        }
        self.walk();

        if self.config.suggest_overrides {
            let cursor = self.actual_candidate_cursor();
            let suggestion = self.user_override.suggest(&self.latest_walk, cursor, timestamp);
            if !suggestion.is_empty() {
                let override_type = if suggestion.force_high_score_override {
                    OverrideType::HighScore
                } else {
                    OverrideType::TopUnigramScore
                };
                trace!(candidate = suggestion.candidate.as_str(), ?override_type, "applying suggestion");
                if self
                    .grid
                    .override_candidate_with_string(cursor, &suggestion.candidate, override_type)
                {
                    self.walk();
                }
            }
        }
        KeyOutcome::Inserted
    }

    fn walk(&mut self) {
        self.latest_walk = self.grid.walk();
    }

    /// Where candidates are looked up and picks are pinned.
    ///
    /// At the end of the grid this is the last reading. Elsewhere it is the
    /// reading before the cursor, or the one after it when
    /// `select_phrase_after_cursor` is set.
    pub fn actual_candidate_cursor(&self) -> usize {
        let cursor = self.grid.cursor();
        if cursor == self.grid.len() && cursor > 0 {
            return cursor - 1;
        }
        if !self.config.select_phrase_after_cursor && cursor > 0 {
            return cursor - 1;
        }
        cursor
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.grid.candidates_at(self.actual_candidate_cursor())
    }

    /// Pins `candidate` and learns from the pick.
    ///
    /// Returns false if no node at the candidate cursor carries it.
    pub fn select_candidate(&mut self, candidate: &Candidate, timestamp: i64) -> bool {
        let original_cursor = self.grid.cursor();
        let cursor = self.actual_candidate_cursor();
        if !self
            .grid
            .override_candidate(cursor, candidate, OverrideType::HighScore)
        {
            return false;
        }

        let previous_walk = std::mem::take(&mut self.latest_walk);
        self.walk();

        let Some((index, end_cursor)) = self.latest_walk.find_node_at(cursor) else {
            return true;
        };
        let score = self.latest_walk.nodes[index]
            .current_unigram()
            .map_or(f64::NEG_INFINITY, |u| u.score);
        if score > self.config.base.no_override_threshold {
            self.user_override
                .observe(&previous_walk, &self.latest_walk, cursor, timestamp);
        } else {
            trace!(score, "pick scored too low to learn");
        }

        let target = if self.config.move_cursor_after_selection {
            end_cursor
        } else {
            original_cursor
        };
        self.grid.set_cursor(target);
        true
    }

    /// Removes the last key, or the reading before the cursor when nothing is
    /// being typed. Returns false when there was nothing to remove.
    pub fn backspace(&mut self) -> bool {
        if self.buffer.has_tone_marker_only() {
            self.buffer.clear();
            return true;
        }
        if self.buffer.is_empty() {
            if !self.grid.delete_reading_before_cursor() {
                return false;
            }
            self.walk();
            return true;
        }
        self.buffer.backspace();
        true
    }

    /// The walked text with the reading being typed shown at the cursor.
    ///
    /// A cursor inside a multi-reading phrase splits the phrase by character
    /// when it has one character per reading; otherwise the reading goes
    /// after the phrase.
    pub fn composing_text(&self) -> String {
        let typing = self.buffer.composed_string();
        let cursor = self.grid.cursor();
        let mut text = String::new();
        let mut inserted = typing.is_empty();
        let mut position = 0;

        for node in &self.latest_walk.nodes {
            let value = node.value();
            let length = node.spanning_length();
            if !inserted && cursor == position {
                text.push_str(&typing);
                inserted = true;
            }
            if !inserted && cursor < position + length {
                let chars: Vec<char> = value.chars().collect();
                if chars.len() == length {
                    let split = cursor - position;
                    text.extend(&chars[..split]);
                    text.push_str(&typing);
                    text.extend(&chars[split..]);
                } else {
                    text.push_str(value);
                    text.push_str(&typing);
                }
                inserted = true;
            } else {
                text.push_str(value);
            }
            position += length;
        }

        if !inserted {
            text.push_str(&typing);
        }
        text
    }

    /// Hands out the walked text and starts a new session. The override
    /// model keeps what it learned.
    pub fn commit(&mut self) -> String {
        let text = self.latest_walk.values_as_strings().concat();
        self.buffer.clear();
        self.grid.clear();
        self.latest_walk = WalkResult::default();
        text
    }
}
