//! Zhuyin/Bopomofo-specific configuration that extends the base `Config` from
//! the lattice crate.
//!
//! This configuration includes:
//! - All generic options from `libchinese_lattice::Config` (flattened via serde)
//! - The keyboard layout used to read keys
//! - How the engine applies learned overrides and places the cursor
//!
//! # Example
//!
//! ```rust
//! use libzhuyin::{LayoutKind, ZhuyinConfig};
//!
//! let config = ZhuyinConfig::from_toml_str("keyboard_layout = \"hsu\"\n").unwrap();
//! assert_eq!(config.keyboard_layout, LayoutKind::Hsu);
//! assert_eq!(config.base.override_capacity, 500);
//! ```

use serde::{Deserialize, Serialize};

use libchinese_lattice::{Config, LatticeResult};

use crate::keyboard_layout::LayoutKind;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ZhuyinConfig {
    /// Base configuration fields (separator, override model settings)
    #[serde(flatten)]
    pub base: Config,

    pub keyboard_layout: LayoutKind,

    /// Apply the user override model's suggestion after each composed syllable.
    pub suggest_overrides: bool,

    /// Candidates come from the reading after the cursor instead of the one
    /// before it.
    pub select_phrase_after_cursor: bool,

    /// After picking a candidate, move the cursor past the picked phrase.
    pub move_cursor_after_selection: bool,
}

impl Default for ZhuyinConfig {
    fn default() -> Self {
        Self {
            base: Config::default(),
            keyboard_layout: LayoutKind::Standard,
            suggest_overrides: true,
            select_phrase_after_cursor: false,
            move_cursor_after_selection: false,
        }
    }
}

impl ZhuyinConfig {
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> LatticeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> LatticeResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parses and validates the shared settings.
    pub fn from_toml_str(content: &str) -> LatticeResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.base.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
