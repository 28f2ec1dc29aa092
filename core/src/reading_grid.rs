/*!
Reading grid - `core/src/reading_grid.rs`

Purpose
-------
- Hold the readings typed so far (one composed syllable each) and a cursor.
- Keep, for every input position, a `Span` of the nodes anchored there: one
  node per spanning length (1..=`MAX_SPAN_LENGTH`) whose joined reading the
  language model knows.
- Find the weightiest path through those nodes (`walk`), and let callers pin
  a candidate at a location (`override_candidate*`).

Notes
-----
- Spans are patched incrementally. Inserting or deleting a reading only drops
  the nodes that now straddle the edit point and re-queries the language model
  for the window of `MAX_SPAN_LENGTH` readings around the cursor.
- `walk` builds a DAG of node vertices between a synthetic root and terminal,
  sorts it topologically and relaxes edges for the *maximum* distance, since
  scores are log probabilities.
- A `WalkResult` owns clones of the walked nodes. Overrides applied to the grid
  afterwards are not reflected in walks that were already taken.
*/

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace};

use crate::language_model::{LanguageModel, Unigram};

/// Longest phrase, in readings, a single node may cover.
pub const MAX_SPAN_LENGTH: usize = 6;

/// Bonus added on top of the top unigram score of a node overridden with
/// [`OverrideType::HighScore`].
///
/// A positive bonus keeps a pinned single character from being outscored by a
/// free-floating multi-character phrase that happens to share its neighbor.
pub const OVERRIDING_SCORE: f64 = 42.0;

/// Separator used to join readings into multi-reading language model keys.
pub const DEFAULT_SEPARATOR: &str = "-";

/// How an overridden node reports its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverrideType {
    #[default]
    None,
    /// Top unigram score plus [`OVERRIDING_SCORE`]; the node wins nearly
    /// every competing path.
    HighScore,
    /// Top unigram score while showing the selected value. Used for soft
    /// overrides (suggestions) that other paths may still beat.
    TopUnigramScore,
}

/// One candidate word group covering `spanning_length` consecutive readings.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    reading: String,
    spanning_length: usize,
    unigrams: Vec<Unigram>,
    selected_index: usize,
    override_type: OverrideType,
}

impl Node {
    pub fn new<T: Into<String>>(reading: T, spanning_length: usize, unigrams: Vec<Unigram>) -> Self {
        Self {
            reading: reading.into(),
            spanning_length,
            unigrams,
            selected_index: 0,
            override_type: OverrideType::None,
        }
    }

    /// The joined reading this node was looked up with.
    pub fn reading(&self) -> &str {
        &self.reading
    }

    pub fn spanning_length(&self) -> usize {
        self.spanning_length
    }

    pub fn unigrams(&self) -> &[Unigram] {
        &self.unigrams
    }

    /// The selected unigram, or `None` for a node without unigrams.
    pub fn current_unigram(&self) -> Option<&Unigram> {
        self.unigrams.get(self.selected_index)
    }

    /// Value of the selected unigram, or `""`.
    pub fn value(&self) -> &str {
        self.current_unigram().map_or("", |u| u.value.as_str())
    }

    /// Score used by the walk.
    pub fn score(&self) -> f64 {
        let Some(top) = self.unigrams.first() else {
            return 0.0;
        };
        match self.override_type {
            OverrideType::HighScore => top.score + OVERRIDING_SCORE,
            OverrideType::TopUnigramScore => top.score,
            OverrideType::None => self.current_unigram().map_or(0.0, |u| u.score),
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.override_type != OverrideType::None
    }

    pub fn override_type(&self) -> OverrideType {
        self.override_type
    }

    /// Drops any override and reselects the top unigram.
    pub fn reset(&mut self) {
        self.selected_index = 0;
        self.override_type = OverrideType::None;
    }

    /// Selects the first unigram whose value is `value`. Returns false and
    /// leaves the node untouched if there is none.
    pub fn select_override_unigram(&mut self, value: &str, override_type: OverrideType) -> bool {
        match self.unigrams.iter().position(|u| u.value == value) {
            Some(index) => {
                self.selected_index = index;
                self.override_type = override_type;
                true
            }
            None => false,
        }
    }
}

/// All nodes anchored at one input position, indexed by spanning length.
#[derive(Debug, Clone, Default)]
pub struct Span {
    nodes: [Option<Node>; MAX_SPAN_LENGTH],
    max_length: usize,
}

impl Span {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the longest node present, 0 for an empty span.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn clear(&mut self) {
        self.nodes = Default::default();
        self.max_length = 0;
    }

    /// Stores `node`, replacing any node of the same spanning length.
    ///
    /// Returns `false`, leaving the span untouched, when the node spans no
    /// readings or more than [`MAX_SPAN_LENGTH`].
    pub fn add(&mut self, node: Node) -> bool {
        let length = node.spanning_length;
        let Some(slot) = length.checked_sub(1).and_then(|i| self.nodes.get_mut(i)) else {
            return false;
        };
        *slot = Some(node);
        self.max_length = self.max_length.max(length);
        true
    }

    /// Removes every node spanning `length` readings or more.
    pub fn remove_nodes_of_or_longer_than(&mut self, length: usize) {
        let length = length.max(1);
        for slot in self.nodes.iter_mut().skip(length - 1) {
            *slot = None;
        }
        self.max_length = (1..length)
            .rev()
            .find(|&l| self.nodes[l - 1].is_some())
            .unwrap_or(0);
    }

    pub fn node_of(&self, length: usize) -> Option<&Node> {
        if length == 0 || length > MAX_SPAN_LENGTH {
            return None;
        }
        self.nodes[length - 1].as_ref()
    }

    fn node_of_mut(&mut self, length: usize) -> Option<&mut Node> {
        if length == 0 || length > MAX_SPAN_LENGTH {
            return None;
        }
        self.nodes[length - 1].as_mut()
    }
}

/// A reading/value pair offered to the user at a grid location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Reading of the node the value comes from, e.g. `"ㄋㄧˇ"`.
    pub reading: String,
    pub value: String,
    /// Text shown in a candidate window. Identical values from different
    /// nodes may be told apart here.
    pub displayed_text: String,
}

impl Candidate {
    pub fn new<R: Into<String>, V: Into<String>>(reading: R, value: V) -> Self {
        let value = value.into();
        Self {
            reading: reading.into(),
            displayed_text: value.clone(),
            value,
        }
    }
}

/// Result of [`ReadingGrid::walk`].
#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    pub nodes: Vec<Node>,
    /// Node vertices in the walked DAG (root and terminal excluded).
    pub vertices: usize,
    /// Node-to-node edges in the walked DAG.
    pub edges: usize,
    pub elapsed_microseconds: u64,
    /// Sum of the spanning lengths of `nodes`.
    pub total_readings: usize,
}

impl WalkResult {
    pub fn values_as_strings(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.value().to_string()).collect()
    }

    pub fn readings_as_strings(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.reading().to_string()).collect()
    }

    /// Finds the walked node covering `cursor`.
    ///
    /// Returns `(node_index, end_cursor)` where `end_cursor` is the reading
    /// position right past the node. Cursor 0 maps to the first node; any
    /// cursor at or past `total_readings - 1` maps to the last one.
    pub fn find_node_at(&self, cursor: usize) -> Option<(usize, usize)> {
        if self.nodes.is_empty() || cursor > self.total_readings {
            return None;
        }
        if cursor == 0 {
            return Some((0, self.nodes[0].spanning_length()));
        }
        if cursor >= self.total_readings - 1 {
            return Some((self.nodes.len() - 1, self.total_readings));
        }
        let mut accumulated = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            accumulated += node.spanning_length();
            if accumulated > cursor {
                return Some((index, accumulated));
            }
        }
        None
    }
}

/// Lattice of candidate nodes over the readings typed so far.
///
/// # Example
///
/// ```rust
/// use libchinese_lattice::{ReadingGrid, StaticLanguageModel};
///
/// let mut lm = StaticLanguageModel::new();
/// lm.insert("ㄊㄞˊ", "台", -1.0);
/// lm.insert("ㄅㄟˇ", "北", -1.2);
/// lm.insert("ㄊㄞˊ-ㄅㄟˇ", "台北", -1.5);
///
/// let mut grid = ReadingGrid::new(&lm);
/// assert!(grid.insert_reading("ㄊㄞˊ"));
/// assert!(grid.insert_reading("ㄅㄟˇ"));
/// assert_eq!(grid.walk().values_as_strings(), vec!["台北"]);
/// ```
#[derive(Debug, Clone)]
pub struct ReadingGrid<L> {
    lm: L,
    cursor: usize,
    separator: String,
    spans: Vec<Span>,
    readings: Vec<String>,
}

impl<L: LanguageModel> ReadingGrid<L> {
    pub fn new(lm: L) -> Self {
        Self::with_separator(lm, DEFAULT_SEPARATOR)
    }

    pub fn with_separator<S: Into<String>>(lm: L, separator: S) -> Self {
        Self {
            lm,
            cursor: 0,
            separator: separator.into(),
            spans: Vec::new(),
            readings: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.cursor = 0;
        self.readings.clear();
        self.spans.clear();
    }

    pub fn readings(&self) -> &[String] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor. Positions past the last reading are rejected.
    pub fn set_cursor(&mut self, cursor: usize) -> bool {
        if cursor > self.readings.len() {
            return false;
        }
        self.cursor = cursor;
        true
    }

    pub fn reading_separator(&self) -> &str {
        &self.separator
    }

    /// Changes the separator used for future lookups. Nodes already in the
    /// grid keep the readings they were built with.
    pub fn set_reading_separator<S: Into<String>>(&mut self, separator: S) {
        self.separator = separator.into();
    }

    pub fn language_model(&self) -> &L {
        &self.lm
    }

    /// Inserts `reading` at the cursor and advances the cursor.
    ///
    /// Empty readings, the separator itself and readings the language model
    /// does not know are rejected without touching the grid.
    pub fn insert_reading(&mut self, reading: &str) -> bool {
        if reading.is_empty() || reading == self.separator {
            return false;
        }
        if !self.lm.has_unigrams(reading) {
            debug!(reading, "rejected reading unknown to the language model");
            return false;
        }

        self.readings.insert(self.cursor, reading.to_string());
        self.expand_grid_at(self.cursor);
        self.update();
        self.cursor += 1;
        trace!(reading, cursor = self.cursor, "inserted reading");
        true
    }

    /// Removes the reading before the cursor (backspace). The cursor moves
    /// back by one.
    pub fn delete_reading_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.readings.remove(self.cursor - 1);
        self.cursor -= 1;
        self.shrink_grid_at(self.cursor);
        self.update();
        true
    }

    /// Removes the reading after the cursor (delete). The cursor stays put.
    pub fn delete_reading_after_cursor(&mut self) -> bool {
        if self.cursor >= self.readings.len() {
            return false;
        }
        self.readings.remove(self.cursor);
        self.shrink_grid_at(self.cursor);
        self.update();
        true
    }

    /// Finds the weightiest path through the grid.
    ///
    /// Runs in O(|V| + |E|): vertices are sorted topologically from the root
    /// and each edge is relaxed once, keeping the larger accumulated score.
    pub fn walk(&self) -> WalkResult {
        if self.spans.is_empty() {
            return WalkResult::default();
        }
        let start = Instant::now();

        let mut vertices: Vec<Vertex<'_>> = Vec::new();
        let mut vertex_spans: Vec<Vec<usize>> = vec![Vec::new(); self.spans.len()];
        for (i, span) in self.spans.iter().enumerate() {
            for length in 1..=span.max_length() {
                if let Some(node) = span.node_of(length) {
                    vertex_spans[i].push(vertices.len());
                    vertices.push(Vertex::new(Some(node)));
                }
            }
        }
        let node_vertices = vertices.len();

        let root = vertices.len();
        vertices.push(Vertex::new(None));
        let terminal = vertices.len();
        vertices.push(Vertex::new(None));

        let mut edges = 0;
        for (i, vertex_span) in vertex_spans.iter().enumerate() {
            for &v in vertex_span {
                let next = i + vertices[v].spanning_length();
                if next >= vertex_spans.len() {
                    vertices[v].edges.push(terminal);
                    continue;
                }
                edges += vertex_spans[next].len();
                vertices[v].edges.extend_from_slice(&vertex_spans[next]);
            }
        }
        vertices[root].edges = vertex_spans[0].clone();
        vertices[root].distance = 0.0;

        for u in topological_sort(&vertices, root) {
            for k in 0..vertices[u].edges.len() {
                let v = vertices[u].edges[k];
                let candidate = vertices[u].distance + vertices[v].score();
                if vertices[v].distance < candidate {
                    vertices[v].distance = candidate;
                    vertices[v].prev = Some(u);
                }
            }
        }

        let mut nodes = Vec::new();
        let mut total_readings = 0;
        let mut current = vertices[terminal].prev;
        while let Some(u) = current {
            if u == root {
                break;
            }
            if let Some(node) = vertices[u].node {
                total_readings += node.spanning_length();
                nodes.push(node.clone());
            }
            current = vertices[u].prev;
        }
        nodes.reverse();

        let result = WalkResult {
            nodes,
            vertices: node_vertices,
            edges,
            elapsed_microseconds: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
            total_readings,
        };
        debug!(
            vertices = result.vertices,
            edges = result.edges,
            total_readings = result.total_readings,
            "walked reading grid"
        );
        result
    }

    /// Every unigram of every node covering `loc`, longest nodes first.
    ///
    /// `loc == len()` is treated as `len() - 1`, so the caller can pass the
    /// cursor as-is at the end of the buffer.
    pub fn candidates_at(&self, loc: usize) -> Vec<Candidate> {
        if self.readings.is_empty() || loc > self.readings.len() {
            return Vec::new();
        }
        let loc = if loc == self.readings.len() { loc - 1 } else { loc };

        let mut nodes = self.overlapping_nodes_at(loc);
        nodes.sort_by(|a, b| b.1.spanning_length().cmp(&a.1.spanning_length()));

        nodes
            .into_iter()
            .flat_map(|(_, node)| {
                node.unigrams()
                    .iter()
                    .map(move |u| Candidate::new(node.reading(), u.value.as_str()))
            })
            .collect()
    }

    /// Pins `candidate` on the node covering `loc` whose reading and value
    /// match it.
    pub fn override_candidate(
        &mut self,
        loc: usize,
        candidate: &Candidate,
        override_type: OverrideType,
    ) -> bool {
        self.override_candidate_inner(loc, Some(&candidate.reading), &candidate.value, override_type)
    }

    /// Pins `value` on the first node covering `loc` that has it. When nodes
    /// of different lengths carry the same value, which one wins is not
    /// specified.
    pub fn override_candidate_with_string(
        &mut self,
        loc: usize,
        value: &str,
        override_type: OverrideType,
    ) -> bool {
        self.override_candidate_inner(loc, None, value, override_type)
    }

    /// Nodes covering `loc` paired with their anchor position: first those
    /// anchored at `loc`, then longer nodes anchored before it.
    pub fn overlapping_nodes_at(&self, loc: usize) -> Vec<(usize, &Node)> {
        self.overlapping_positions(loc)
            .into_iter()
            .filter_map(|(anchor, length)| self.spans[anchor].node_of(length).map(|n| (anchor, n)))
            .collect()
    }

    fn override_candidate_inner(
        &mut self,
        loc: usize,
        reading: Option<&str>,
        value: &str,
        override_type: OverrideType,
    ) -> bool {
        if loc > self.readings.len() {
            return false;
        }
        let loc = if loc == self.readings.len() { loc.saturating_sub(1) } else { loc };

        let mut overridden = None;
        for (anchor, length) in self.overlapping_positions(loc) {
            let Some(node) = self.spans[anchor].node_of_mut(length) else {
                continue;
            };
            if reading.is_some_and(|r| r != node.reading()) {
                continue;
            }
            if node.select_override_unigram(value, override_type) {
                overridden = Some((anchor, length));
                break;
            }
        }

        let Some((anchor, length)) = overridden else {
            debug!(loc, value, "no node to override");
            return false;
        };

        // Any other node sharing a position with the pinned one loses its
        // own override.
        let end = (anchor + length).min(self.spans.len());
        for i in anchor..end {
            for (a, l) in self.overlapping_positions(i) {
                if (a, l) == (anchor, length) {
                    continue;
                }
                if let Some(node) = self.spans[a].node_of_mut(l) {
                    node.reset();
                }
            }
        }
        debug!(loc, value, ?override_type, "overrode candidate");
        true
    }

    /// `(anchor, spanning_length)` of every node covering `loc`.
    fn overlapping_positions(&self, loc: usize) -> Vec<(usize, usize)> {
        let mut results = Vec::new();
        if loc >= self.spans.len() {
            return results;
        }

        let span = &self.spans[loc];
        for length in 1..=span.max_length() {
            if span.node_of(length).is_some() {
                results.push((loc, length));
            }
        }

        let begin = loc - loc.min(MAX_SPAN_LENGTH - 1);
        for i in begin..loc {
            let span = &self.spans[i];
            for length in (loc - i + 1)..=span.max_length() {
                if span.node_of(length).is_some() {
                    results.push((i, length));
                }
            }
        }
        results
    }

    fn expand_grid_at(&mut self, loc: usize) {
        self.spans.insert(loc, Span::new());
        if loc != 0 && loc != self.spans.len() - 1 {
            self.remove_affected_nodes(loc);
        }
    }

    fn shrink_grid_at(&mut self, loc: usize) {
        if loc >= self.spans.len() {
            return;
        }
        self.spans.remove(loc);
        self.remove_affected_nodes(loc);
    }

    /// Drops nodes anchored before `loc` that reach into or past it; they
    /// were built from readings that are no longer adjacent.
    fn remove_affected_nodes(&mut self, loc: usize) {
        if self.spans.is_empty() || loc == 0 {
            return;
        }
        let begin = loc.saturating_sub(MAX_SPAN_LENGTH - 1);
        for i in begin..loc {
            self.spans[i].remove_nodes_of_or_longer_than(loc - i + 1);
        }
    }

    /// Looks up every missing node within `MAX_SPAN_LENGTH` readings of the
    /// cursor.
    fn update(&mut self) {
        let begin = self.cursor.saturating_sub(MAX_SPAN_LENGTH);
        let end = (self.cursor + MAX_SPAN_LENGTH).min(self.readings.len());
        for pos in begin..end {
            for length in 1..=MAX_SPAN_LENGTH {
                if pos + length > end {
                    break;
                }
                let reading = self.readings[pos..pos + length].join(&self.separator);
                if self.spans[pos]
                    .node_of(length)
                    .is_some_and(|n| n.reading() == reading)
                {
                    continue;
                }
                let unigrams = self.lm.unigrams(&reading);
                if unigrams.is_empty() {
                    continue;
                }
                trace!(pos, length, reading = reading.as_str(), "added node");
                self.spans[pos].add(Node::new(reading, length, unigrams));
            }
        }
    }
}

struct Vertex<'a> {
    node: Option<&'a Node>,
    edges: Vec<usize>,
    distance: f64,
    prev: Option<usize>,
}

impl<'a> Vertex<'a> {
    fn new(node: Option<&'a Node>) -> Self {
        Self {
            node,
            edges: Vec::new(),
            distance: f64::NEG_INFINITY,
            prev: None,
        }
    }

    fn spanning_length(&self) -> usize {
        self.node.map_or(0, Node::spanning_length)
    }

    fn score(&self) -> f64 {
        self.node.map_or(0.0, Node::score)
    }
}

/// Reverse post-order of a depth-first traversal from `root`, iteratively so
/// long grids cannot overflow the stack.
fn topological_sort(vertices: &[Vertex<'_>], root: usize) -> Vec<usize> {
    let mut done = vec![false; vertices.len()];
    let mut order = Vec::with_capacity(vertices.len());
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

    while let Some(&(v, next_edge)) = stack.last() {
        if let Some(&next) = vertices[v].edges.get(next_edge) {
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if !done[next] {
                stack.push((next, 0));
            }
        } else {
            done[v] = true;
            order.push(v);
            stack.pop();
        }
    }
    order.reverse();
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLanguageModel;

    impl LanguageModel for MockLanguageModel {
        fn unigrams(&self, reading: &str) -> Vec<Unigram> {
            match reading {
                "testReading" => vec![Unigram::new("testValue", -1.0)],
                "testReading2" => vec![Unigram::new("testValue2", -1.0)],
                _ => Vec::new(),
            }
        }
    }

    fn node(reading: &str, length: usize) -> Node {
        Node::new(reading, length, vec![Unigram::new(reading, -1.0)])
    }

    #[test]
    fn span_tracks_max_length() {
        let mut span = Span::new();
        span.add(node("a", 1));
        span.add(node("abc", 3));
        span.add(node("abcde", 5));
        assert_eq!(span.max_length(), 5);

        span.remove_nodes_of_or_longer_than(4);
        assert_eq!(span.max_length(), 3);
        assert!(span.node_of(5).is_none());
        assert_eq!(span.node_of(3).map(Node::reading), Some("abc"));

        span.remove_nodes_of_or_longer_than(2);
        assert_eq!(span.max_length(), 1);
        span.remove_nodes_of_or_longer_than(1);
        assert_eq!(span.max_length(), 0);
        assert!(span.node_of(0).is_none());
        assert!(span.node_of(MAX_SPAN_LENGTH + 1).is_none());
    }

    #[test]
    fn span_refuses_out_of_range_lengths() {
        let mut span = Span::new();
        assert!(!span.add(node("", 0)));
        assert!(!span.add(node("abcdefg", MAX_SPAN_LENGTH + 1)));
        assert_eq!(span.max_length(), 0);

        assert!(span.add(node("abcdef", MAX_SPAN_LENGTH)));
        assert_eq!(span.max_length(), MAX_SPAN_LENGTH);
        assert_eq!(span.node_of(MAX_SPAN_LENGTH).map(Node::reading), Some("abcdef"));
    }

    #[test]
    fn node_scores_follow_override_type() {
        let mut n = Node::new(
            "ㄓㄨㄥ",
            1,
            vec![Unigram::new("中", -2.0), Unigram::new("鍾", -5.0)],
        );
        assert_eq!(n.score(), -2.0);
        assert!(n.select_override_unigram("鍾", OverrideType::TopUnigramScore));
        assert_eq!(n.value(), "鍾");
        assert_eq!(n.score(), -2.0);
        assert!(n.select_override_unigram("鍾", OverrideType::HighScore));
        assert_eq!(n.score(), -2.0 + OVERRIDING_SCORE);
        assert!(!n.select_override_unigram("終", OverrideType::HighScore));
        assert_eq!(n.value(), "鍾");

        n.reset();
        assert!(!n.is_overridden());
        assert_eq!(n.value(), "中");

        let empty = Node::new("x", 1, Vec::new());
        assert_eq!(empty.value(), "");
        assert_eq!(empty.score(), 0.0);
    }

    #[test]
    fn reading_separator_defaults_to_dash() {
        let mut grid = ReadingGrid::new(MockLanguageModel);
        assert_eq!(grid.reading_separator(), "-");
        grid.set_reading_separator("+");
        assert!(grid.insert_reading("testReading"));
        assert!(grid.insert_reading("testReading2"));
        assert!(!grid.insert_reading("+"));
        assert_eq!(
            grid.walk().readings_as_strings(),
            vec!["testReading", "testReading2"]
        );
    }

    #[test]
    fn insert_moves_cursor_and_rejects_unknown_readings() {
        let mut grid = ReadingGrid::new(MockLanguageModel);
        assert_eq!(grid.cursor(), 0);
        assert!(grid.insert_reading("testReading"));
        assert_eq!(grid.cursor(), 1);
        assert!(grid.insert_reading("testReading"));
        assert_eq!(grid.cursor(), 2);
        assert!(!grid.insert_reading(""));
        assert!(!grid.insert_reading("invalidReading"));
        assert_eq!(grid.cursor(), 2);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn deletes_respect_boundaries() {
        let mut grid = ReadingGrid::new(MockLanguageModel);
        grid.insert_reading("testReading");
        grid.insert_reading("testReading2");

        assert!(grid.delete_reading_before_cursor());
        assert_eq!(grid.readings(), ["testReading"]);
        assert_eq!(grid.cursor(), 1);
        assert!(!grid.delete_reading_after_cursor());

        assert!(grid.set_cursor(0));
        assert!(!grid.delete_reading_before_cursor());
        assert!(grid.delete_reading_after_cursor());
        assert!(grid.is_empty());
        assert!(!grid.set_cursor(1));
        assert_eq!(grid.walk().nodes.len(), 0);
    }

    #[test]
    fn candidates_and_string_override() {
        let mut grid = ReadingGrid::new(MockLanguageModel);
        assert!(grid.candidates_at(0).is_empty());
        grid.insert_reading("testReading");
        assert!(!grid.override_candidate_with_string(0, "testValue2", OverrideType::HighScore));

        grid.insert_reading("testReading2");
        let values: Vec<_> = grid.candidates_at(1).into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["testValue2"]);
        assert_eq!(grid.candidates_at(2)[0].value, "testValue2");
        assert!(grid.candidates_at(3).is_empty());

        assert!(grid.override_candidate_with_string(1, "testValue2", OverrideType::HighScore));
        let walk = grid.walk();
        assert_eq!(walk.nodes[0].value(), "testValue");
        assert!(walk.nodes[1].is_overridden());
        assert!(!grid.override_candidate_with_string(3, "testValue", OverrideType::HighScore));
    }

    #[test]
    fn find_node_at_maps_cursor_to_node() {
        let mut grid = ReadingGrid::new(MockLanguageModel);
        assert_eq!(grid.walk().find_node_at(0), None);

        grid.insert_reading("testReading");
        assert_eq!(grid.walk().find_node_at(0), Some((0, 1)));

        grid.insert_reading("testReading2");
        grid.insert_reading("testReading");
        let walk = grid.walk();
        assert_eq!(walk.find_node_at(0), Some((0, 1)));
        assert_eq!(walk.find_node_at(1), Some((1, 2)));
        assert_eq!(walk.find_node_at(2), Some((2, 3)));
        assert_eq!(walk.find_node_at(3), Some((2, 3)));
        assert_eq!(walk.find_node_at(4), None);
    }
}
