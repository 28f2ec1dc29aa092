//! Language model seam consumed by the reading grid.
//!
//! A language model maps a reading (one syllable string, or several joined by
//! the grid's separator) to an ordered list of scored word candidates. Scores
//! are log-probability-like figures: higher is better.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::LatticeResult;

/// A scored word candidate for a reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unigram {
    pub value: String,
    pub score: f64,
}

impl Unigram {
    pub fn new<T: Into<String>>(value: T, score: f64) -> Self {
        Self {
            value: value.into(),
            score,
        }
    }
}

/// Supplies unigrams for readings.
///
/// Implementations decide the candidate order; the grid treats the first
/// unigram of a node as its default value.
pub trait LanguageModel {
    /// Returns the unigrams for `reading`, best first. Unknown readings yield
    /// an empty list.
    fn unigrams(&self, reading: &str) -> Vec<Unigram>;

    /// Whether `reading` has at least one unigram.
    fn has_unigrams(&self, reading: &str) -> bool {
        !self.unigrams(reading).is_empty()
    }
}

impl<L: LanguageModel + ?Sized> LanguageModel for &L {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        (**self).unigrams(reading)
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        (**self).has_unigrams(reading)
    }
}

impl<L: LanguageModel + ?Sized> LanguageModel for Box<L> {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        (**self).unigrams(reading)
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        (**self).has_unigrams(reading)
    }
}

impl<L: LanguageModel + ?Sized> LanguageModel for Rc<L> {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        (**self).unigrams(reading)
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        (**self).has_unigrams(reading)
    }
}

impl<L: LanguageModel + ?Sized> LanguageModel for Arc<L> {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        (**self).unigrams(reading)
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        (**self).has_unigrams(reading)
    }
}

/// Wraps a model so that unigrams come back sorted by descending score.
///
/// Unigrams with equal scores keep the order of the wrapped model.
#[derive(Debug, Clone)]
pub struct ScoreRankedLanguageModel<L> {
    inner: L,
}

impl<L: LanguageModel> ScoreRankedLanguageModel<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: LanguageModel> LanguageModel for ScoreRankedLanguageModel<L> {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        let mut unigrams = self.inner.unigrams(reading);
        unigrams.sort_by(|a, b| b.score.total_cmp(&a.score));
        unigrams
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        self.inner.has_unigrams(reading)
    }
}

/// In-memory reading table.
///
/// Values are kept in insertion order per reading; inserting a value that is
/// already present for the reading is ignored, so the first score wins.
///
/// # Example
///
/// ```rust
/// use libchinese_lattice::{LanguageModel, StaticLanguageModel};
///
/// let mut lm = StaticLanguageModel::new();
/// lm.insert("ㄊㄞˊ", "台", -1.0);
/// lm.insert("ㄊㄞˊ", "臺", -1.5);
/// assert_eq!(lm.unigrams("ㄊㄞˊ")[1].value, "臺");
/// assert!(!lm.has_unigrams("ㄅㄚ"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticLanguageModel {
    entries: AHashMap<String, Vec<Unigram>>,
}

impl StaticLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `reading` unless that value is already listed.
    pub fn insert(&mut self, reading: &str, value: &str, score: f64) {
        let list = self.entries.entry(reading.to_string()).or_default();
        if list.iter().any(|u| u.value == value) {
            return;
        }
        list.push(Unigram::new(value, score));
    }

    /// Number of distinct readings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a model from JSON shaped as `{"reading": [["value", score], ...]}`.
    pub fn from_json_str(content: &str) -> LatticeResult<Self> {
        let table: HashMap<String, Vec<(String, f64)>> = serde_json::from_str(content)?;
        let mut model = Self::new();
        // Sorted so that duplicate handling does not depend on hash order.
        let mut readings: Vec<_> = table.into_iter().collect();
        readings.sort_by(|a, b| a.0.cmp(&b.0));
        for (reading, values) in readings {
            for (value, score) in values {
                model.insert(&reading, &value, score);
            }
        }
        Ok(model)
    }

    /// Loads a JSON table from disk, see [`StaticLanguageModel::from_json_str`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> LatticeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl LanguageModel for StaticLanguageModel {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        self.entries.get(reading).cloned().unwrap_or_default()
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        self.entries.get(reading).is_some_and(|list| !list.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_model_suppresses_duplicate_values() {
        let mut lm = StaticLanguageModel::new();
        lm.insert("ㄇㄚ", "媽", -2.0);
        lm.insert("ㄇㄚ", "媽", -1.0);
        lm.insert("ㄇㄚ", "嗎", -3.0);

        let unigrams = lm.unigrams("ㄇㄚ");
        assert_eq!(unigrams.len(), 2);
        assert_eq!(unigrams[0], Unigram::new("媽", -2.0));
        assert_eq!(lm.len(), 1);
    }

    #[test]
    fn score_ranked_model_sorts_descending_and_keeps_ties_stable() {
        let mut lm = StaticLanguageModel::new();
        lm.insert("ㄕˋ", "是", -3.0);
        lm.insert("ㄕˋ", "事", -1.0);
        lm.insert("ㄕˋ", "市", -3.0);
        lm.insert("ㄕˋ", "世", -2.0);

        let ranked = ScoreRankedLanguageModel::new(&lm);
        let values: Vec<_> = ranked
            .unigrams("ㄕˋ")
            .into_iter()
            .map(|u| u.value)
            .collect();
        assert_eq!(values, vec!["事", "世", "是", "市"]);
        assert!(ranked.has_unigrams("ㄕˋ"));
        assert!(ranked.unigrams("ㄕ").is_empty());
    }

    #[test]
    fn json_table_loads() {
        let json = r#"{"ㄋㄧˇ": [["你", -1.5], ["妳", -3.0]], "ㄏㄠˇ": [["好", -1.0]]}"#;
        let lm = StaticLanguageModel::from_json_str(json).unwrap();
        assert_eq!(lm.len(), 2);
        assert_eq!(lm.unigrams("ㄋㄧˇ")[1], Unigram::new("妳", -3.0));
        assert!(StaticLanguageModel::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn shared_handles_delegate() {
        let mut lm = StaticLanguageModel::new();
        lm.insert("ㄚ", "啊", -1.0);
        let shared = Arc::new(lm);
        assert!(shared.has_unigrams("ㄚ"));
        let boxed: Box<dyn LanguageModel> = Box::new(StaticLanguageModel::new());
        assert!(!boxed.has_unigrams("ㄚ"));
    }
}
