//! User override model.
//!
//! Learns which candidate the user picked over the walk's default, keyed by a
//! short context of the surrounding walked nodes, and later suggests the same
//! pick with a confidence that decays exponentially with time.
//!
//! The model is bounded: it is an LRU map from context key to observation,
//! and the least recently observed key is evicted once capacity is exceeded.
//! Timestamps are supplied by the caller; the model never reads a clock.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use tracing::{debug, trace, warn};

use crate::error::LatticeResult;
use crate::reading_grid::{Node, WalkResult};

/// Scores below this are treated as fully decayed (about 20 half-lives).
pub const DECAY_THRESHOLD: f64 = 1.0 / 1_048_576.0;

/// Half-life used when none, or an unusable one, is given (1.5 hours in seconds).
pub const DEFAULT_HALF_LIFE: f64 = 5400.0;

/// Overrides on nodes longer than this many readings are not learned.
pub const MAX_LEARNED_SPANNING_LENGTH: usize = 3;

const EMPTY_NODE: &str = "()";

/// Values that end a clause; context before them is not carried over.
const ENDING_PUNCTUATION: [&str; 7] = ["，", "。", "！", "？", "」", "』", "”"];

/// Balances "recent but rarely seen" against "old but frequently seen".
///
/// Returns 0 once the decay factor drops under [`DECAY_THRESHOLD`].
pub fn decayed_score(
    event_count: u32,
    total_count: u32,
    event_timestamp: i64,
    timestamp: i64,
    decay_exponent: f64,
) -> f64 {
    let decay = (timestamp.saturating_sub(event_timestamp) as f64 * decay_exponent).exp();
    if decay < DECAY_THRESHOLD || total_count == 0 {
        return 0.0;
    }
    let prob = f64::from(event_count) / f64::from(total_count);
    prob * decay
}

/// Whether `half_life` can drive the decay: finite and above zero.
pub fn is_valid_half_life(half_life: f64) -> bool {
    half_life.is_finite() && half_life > 0.0
}

/// What to apply to the grid after a walk.
///
/// An empty `candidate` means there is nothing to suggest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    pub candidate: String,
    /// Apply with a high-score override instead of a top-unigram-score one.
    pub force_high_score_override: bool,
}

impl Suggestion {
    pub fn is_empty(&self) -> bool {
        self.candidate.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Override {
    count: u32,
    timestamp: i64,
    force_high_score_override: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Observation {
    count: u32,
    overrides: BTreeMap<String, Override>,
}

impl Observation {
    fn update(&mut self, candidate: &str, timestamp: i64, force_high_score_override: bool) {
        self.count += 1;
        let o = self.overrides.entry(candidate.to_string()).or_default();
        o.count += 1;
        o.timestamp = timestamp;
        o.force_high_score_override = force_high_score_override;
    }
}

/// Serialized form of a model; entries run from least to most recently used.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    capacity: usize,
    decay_constant: f64,
    entries: Vec<(String, Observation)>,
}

#[derive(Debug)]
pub struct UserOverrideModel {
    decay_constant: f64,
    decay_exponent: f64,
    lru: LruCache<String, Observation>,
}

impl UserOverrideModel {
    /// Creates a model holding at most `capacity` contexts, whose override
    /// scores halve every `decay_constant` time units.
    ///
    /// A half-life that is not a positive finite number is replaced by
    /// [`DEFAULT_HALF_LIFE`].
    pub fn new(capacity: usize, decay_constant: f64) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let decay_constant = if is_valid_half_life(decay_constant) {
            decay_constant
        } else {
            warn!(decay_constant, "unusable override half-life, using the default");
            DEFAULT_HALF_LIFE
        };
        Self {
            decay_constant,
            decay_exponent: 0.5f64.ln() / decay_constant,
            lru: LruCache::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.lru.cap().get()
    }

    pub fn decay_exponent(&self) -> f64 {
        self.decay_exponent
    }

    /// Number of learned contexts.
    pub fn len(&self) -> usize {
        self.lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    pub fn clear(&mut self) {
        self.lru.clear();
    }

    /// Records the override the user made at `cursor`, given the walks taken
    /// right before and right after it.
    ///
    /// Inconsistent input (empty walks, walks over different reading counts,
    /// a cursor outside the walk) is ignored.
    pub fn observe(
        &mut self,
        walk_before_override: &WalkResult,
        walk_after_override: &WalkResult,
        cursor: usize,
        timestamp: i64,
    ) {
        if walk_before_override.nodes.is_empty() || walk_after_override.nodes.is_empty() {
            return;
        }
        if walk_before_override.total_readings != walk_after_override.total_readings {
            debug!(
                before = walk_before_override.total_readings,
                after = walk_after_override.total_readings,
                "walks disagree on reading count, skipping observation"
            );
            return;
        }

        let Some((current_index, end_cursor)) = walk_after_override.find_node_at(cursor) else {
            return;
        };
        let current = &walk_after_override.nodes[current_index];
        if current.spanning_length() > MAX_LEARNED_SPANNING_LENGTH {
            trace!(length = current.spanning_length(), "phrase too long to learn");
            return;
        }

        // end_cursor is past the current node; step back onto its last reading.
        let Some(last_reading) = end_cursor.checked_sub(1) else {
            return;
        };
        let Some((prev_index, _)) = walk_before_override.find_node_at(last_reading) else {
            return;
        };
        let prev_head = &walk_before_override.nodes[prev_index];

        // A longer phrase chosen over shorter nodes needs the high-score boost
        // to beat them next time. A single character breaking up a phrase is
        // keyed on the walk after the override, and never boosted.
        let force_high_score_override = current.spanning_length() > prev_head.spanning_length();
        let breaking_up = current.spanning_length() == 1 && prev_head.spanning_length() > 1;
        let key = if breaking_up {
            observation_key(&walk_after_override.nodes, current_index)
        } else {
            observation_key(&walk_before_override.nodes, prev_index)
        };

        let candidate = current.value().to_string();
        debug!(
            key = key.as_str(),
            candidate = candidate.as_str(),
            force_high_score_override,
            "observed override"
        );
        self.observe_key(key, &candidate, timestamp, force_high_score_override);
    }

    /// Suggests the learned override for the node at `cursor` of `walk`.
    ///
    /// Returns an empty suggestion when nothing applies. Among live overrides
    /// the highest score wins; ties go to the higher count, then the more
    /// recent timestamp, then the lexicographically smaller candidate.
    pub fn suggest(&self, walk: &WalkResult, cursor: usize, timestamp: i64) -> Suggestion {
        let Some((index, _)) = walk.find_node_at(cursor) else {
            return Suggestion::default();
        };
        let key = observation_key(&walk.nodes, index);
        let Some(observation) = self.lru.peek(&key) else {
            return Suggestion::default();
        };

        let mut best: Option<(&str, &Override, f64)> = None;
        for (candidate, o) in &observation.overrides {
            let score = decayed_score(
                o.count,
                observation.count,
                o.timestamp,
                timestamp,
                self.decay_exponent,
            );
            if score <= 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_o, best_score)) => {
                    score > best_score
                        || (score == best_score
                            && (o.count, o.timestamp) > (best_o.count, best_o.timestamp))
                }
            };
            if better {
                best = Some((candidate.as_str(), o, score));
            }
        }

        match best {
            Some((candidate, o, score)) => {
                trace!(key = key.as_str(), candidate, score, "suggesting override");
                Suggestion {
                    candidate: candidate.to_string(),
                    force_high_score_override: o.force_high_score_override,
                }
            }
            None => Suggestion::default(),
        }
    }

    /// Serializes the learned contexts, keeping their recency order.
    pub fn snapshot(&self) -> LatticeResult<Vec<u8>> {
        let entries = self
            .lru
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let snapshot = Snapshot {
            capacity: self.capacity(),
            decay_constant: self.decay_constant,
            entries,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Restores a model written by [`UserOverrideModel::snapshot`].
    pub fn from_snapshot(bytes: &[u8]) -> LatticeResult<Self> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;
        let mut model = Self::new(snapshot.capacity, snapshot.decay_constant);
        for (key, observation) in snapshot.entries {
            model.lru.put(key, observation);
        }
        Ok(model)
    }

    fn observe_key(
        &mut self,
        key: String,
        candidate: &str,
        timestamp: i64,
        force_high_score_override: bool,
    ) {
        if let Some(observation) = self.lru.get_mut(&key) {
            observation.update(candidate, timestamp, force_high_score_override);
            return;
        }
        let mut observation = Observation::default();
        observation.update(candidate, timestamp, force_high_score_override);
        if let Some((evicted, _)) = self.lru.push(key, observation) {
            trace!(key = evicted.as_str(), "evicted least recently used context");
        }
    }
}

fn is_punctuation(node: &Node) -> bool {
    node.reading().starts_with('_') || ENDING_PUNCTUATION.contains(&node.value())
}

fn combine_reading_value(reading: &str, value: &str) -> String {
    format!("({reading},{value})")
}

/// Builds `anterior-prev-head` for the node at `head`.
///
/// The head uses its top unigram: the key describes the walk before the user
/// touched that node. The two preceding nodes use their current values, and
/// punctuation stands in as `()` and stops the look-back.
fn observation_key(nodes: &[Node], head: usize) -> String {
    let Some(head_node) = nodes.get(head) else {
        return String::new();
    };
    let head_str = head_node
        .unigrams()
        .first()
        .map(|u| combine_reading_value(head_node.reading(), &u.value))
        .unwrap_or_default();

    let mut prev_is_punctuation = false;
    let prev_str = match head.checked_sub(1).map(|i| &nodes[i]) {
        Some(node) if is_punctuation(node) => {
            prev_is_punctuation = true;
            EMPTY_NODE.to_string()
        }
        Some(node) => combine_reading_value(node.reading(), node.value()),
        None => EMPTY_NODE.to_string(),
    };

    let anterior_str = match head.checked_sub(2).map(|i| &nodes[i]) {
        Some(node) if !prev_is_punctuation && !is_punctuation(node) => {
            combine_reading_value(node.reading(), node.value())
        }
        _ => EMPTY_NODE.to_string(),
    };

    format!("{anterior_str}-{prev_str}-{head_str}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language_model::Unigram;

    fn walk_of(nodes: &[(&str, &str, usize)]) -> WalkResult {
        let nodes: Vec<Node> = nodes
            .iter()
            .map(|(reading, value, length)| {
                Node::new(*reading, *length, vec![Unigram::new(*value, -1.0)])
            })
            .collect();
        let total_readings = nodes.iter().map(Node::spanning_length).sum();
        WalkResult {
            nodes,
            total_readings,
            ..WalkResult::default()
        }
    }

    #[test]
    fn unusable_half_life_falls_back_to_default() {
        let expected = 0.5f64.ln() / DEFAULT_HALF_LIFE;
        for half_life in [0.0, -0.0, -10.0, f64::NAN, f64::INFINITY] {
            let model = UserOverrideModel::new(10, half_life);
            assert_eq!(model.decay_exponent(), expected, "{half_life}");
        }

        // a zero half-life used to make same-instant scores NaN
        let mut model = UserOverrideModel::new(10, 0.0);
        let before = walk_of(&[("ㄊㄞˊ", "台", 1)]);
        let after = walk_of(&[("ㄊㄞˊ", "臺", 1)]);
        model.observe(&before, &after, 0, 1000);
        assert_eq!(model.suggest(&before, 0, 1000).candidate, "臺");
        // a negative one used to make scores grow
        let model = UserOverrideModel::new(10, -10.0);
        let exp = model.decay_exponent();
        assert!(decayed_score(1, 1, 0, 100, exp) < decayed_score(1, 1, 0, 0, exp));
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let exp = UserOverrideModel::new(10, DEFAULT_HALF_LIFE).decay_exponent();
        assert_eq!(decayed_score(1, 1, i64::MIN, i64::MAX, exp), 0.0);
        // an event from the future saturates instead of wrapping around
        let future = decayed_score(1, 1, i64::MAX, i64::MIN, exp);
        assert!(!future.is_nan());
    }

    #[test]
    fn key_uses_two_nodes_of_context() {
        let walk = walk_of(&[("ㄊㄚ", "他", 1), ("ㄒㄧㄥˋ", "姓", 1), ("ㄓㄨㄥ", "中", 1)]);
        assert_eq!(
            observation_key(&walk.nodes, 2),
            "(ㄊㄚ,他)-(ㄒㄧㄥˋ,姓)-(ㄓㄨㄥ,中)"
        );
        assert_eq!(observation_key(&walk.nodes, 0), "()-()-(ㄊㄚ,他)");
        assert_eq!(observation_key(&walk.nodes, 1), "()-(ㄊㄚ,他)-(ㄒㄧㄥˋ,姓)");
        assert_eq!(observation_key(&walk.nodes, 3), "");
    }

    #[test]
    fn punctuation_resets_context() {
        let walk = walk_of(&[
            ("ㄊㄚ", "他", 1),
            ("_punctuation_,", "，", 1),
            ("ㄓㄨㄥ", "中", 1),
        ]);
        assert_eq!(observation_key(&walk.nodes, 2), "()-()-(ㄓㄨㄥ,中)");

        let walk = walk_of(&[("ㄐㄩˋ", "。", 1), ("ㄊㄚ", "他", 1), ("ㄓㄨㄥ", "中", 1)]);
        assert_eq!(observation_key(&walk.nodes, 2), "()-(ㄊㄚ,他)-(ㄓㄨㄥ,中)");
    }

    #[test]
    fn decayed_score_halves_per_decay_constant() {
        let model = UserOverrideModel::new(10, 100.0);
        let fresh = decayed_score(1, 1, 0, 0, model.decay_exponent());
        let half = decayed_score(1, 1, 0, 100, model.decay_exponent());
        assert!((fresh - 1.0).abs() < 1e-12);
        assert!((half - 0.5).abs() < 1e-12);
        assert_eq!(decayed_score(1, 1, 0, 2100, model.decay_exponent()), 0.0);
        assert_eq!(decayed_score(1, 0, 0, 0, model.decay_exponent()), 0.0);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let model = UserOverrideModel::new(0, 10.0);
        assert_eq!(model.capacity(), 1);
    }
}
