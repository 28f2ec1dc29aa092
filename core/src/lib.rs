//! libchinese-lattice
//!
//! Language-agnostic decoding pieces shared by phonetic input crates: the
//! language model seam, the reading grid with its maximum-likelihood walk,
//! and the time-decayed user override model.
//!
//! Everything here is synchronous and single-threaded. A grid and an override
//! model belong to one composing session; callers supply timestamps.
//!
//! Public API:
//! - `LanguageModel` / `Unigram` - scored candidates for a reading
//! - `StaticLanguageModel`, `ScoreRankedLanguageModel` - in-memory table and ranking wrapper
//! - `ReadingGrid` - lattice of `Node`s over the typed readings, `walk()` to decode
//! - `UserOverrideModel` - learns and suggests user corrections
//! - `Config` - grid separator and override model settings
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{LatticeError, LatticeResult};

pub mod language_model;
pub use language_model::{LanguageModel, ScoreRankedLanguageModel, StaticLanguageModel, Unigram};

pub mod reading_grid;
pub use reading_grid::{
    Candidate, Node, OverrideType, ReadingGrid, Span, WalkResult, DEFAULT_SEPARATOR,
    MAX_SPAN_LENGTH, OVERRIDING_SCORE,
};

pub mod user_override;
pub use user_override::{
    decayed_score, is_valid_half_life, Suggestion, UserOverrideModel, DEFAULT_HALF_LIFE,
};

/// Generic configuration for the decoding core.
///
/// Language-specific options (keyboard layouts and the like) belong in the
/// language crates, which flatten this struct into their own config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Joins consecutive readings into multi-syllable lookup keys.
    pub reading_separator: String,

    // User override model
    /// Number of contexts the override model remembers.
    pub override_capacity: usize,
    /// Time, in caller timestamp units, after which an override's weight halves.
    /// Must be finite and above zero. Default: 5400 (1.5 hours in seconds).
    pub override_half_life: f64,
    /// Picks whose unigram score is at or below this are not learned.
    pub no_override_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reading_separator: DEFAULT_SEPARATOR.to_string(),
            override_capacity: 500,
            override_half_life: DEFAULT_HALF_LIFE,
            no_override_threshold: -8.0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> LatticeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> LatticeResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> LatticeResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the override model cannot run with.
    pub fn validate(&self) -> LatticeResult<()> {
        if !is_valid_half_life(self.override_half_life) {
            return Err(LatticeError::InvalidConfig {
                field: "override_half_life",
                reason: "must be a finite number above zero",
            });
        }
        if self.override_capacity == 0 {
            return Err(LatticeError::InvalidConfig {
                field: "override_capacity",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// A grid over `lm` using the configured separator.
    pub fn build_grid<L: LanguageModel>(&self, lm: L) -> ReadingGrid<L> {
        ReadingGrid::with_separator(lm, self.reading_separator.clone())
    }

    /// An empty override model with the configured capacity and half-life.
    pub fn build_user_override_model(&self) -> UserOverrideModel {
        UserOverrideModel::new(self.override_capacity, self.override_half_life)
    }
}
