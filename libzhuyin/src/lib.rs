//! # libzhuyin
//!
//! Zhuyin/Bopomofo input decoding built on libchinese-lattice.
//!
//! - `Syllable` - bit-packed Bopomofo syllable with display, pinyin and
//!   ordering codecs
//! - `KeyboardLayout` / `LayoutKind` - Standard, IBM, ETen, Hsu, ETen26 and
//!   Hanyu Pinyin key maps
//! - `ReadingBuffer` - assembles one syllable key by key
//! - `Engine` - buffer, reading grid and user override model in one session

pub mod config;
pub mod engine;
pub mod error;
pub mod keyboard_layout;
pub mod pinyin;
pub mod reading_buffer;
pub mod syllable;

pub use config::ZhuyinConfig;
pub use engine::{Engine, KeyOutcome};
pub use error::SyllableError;
pub use keyboard_layout::{KeyboardLayout, LayoutKind};
pub use reading_buffer::ReadingBuffer;
pub use syllable::{Consonant, Medial, Syllable, Tone, Vowel};

// Grid-side types callers need alongside the engine
pub use libchinese_lattice::{
    Candidate, LanguageModel, OverrideType, StaticLanguageModel, Unigram, UserOverrideModel,
};
