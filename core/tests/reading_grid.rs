//! Reading grid scenarios against a small phrase table
//!
//! Covers the decode path end to end: inserting and deleting readings, the
//! maximum-score walk, candidate lookup over overlapping nodes, and how
//! overrides of each type change the walk.

use libchinese_lattice::{
    Candidate, LanguageModel, OverrideType, ReadingGrid, StaticLanguageModel, Unigram,
    OVERRIDING_SCORE,
};
use proptest::prelude::*;
use rstest::rstest;

fn phrase_table() -> StaticLanguageModel {
    let mut lm = StaticLanguageModel::new();
    for (reading, value, score) in [
        ("ㄍㄠ", "高", -2.9),
        ("ㄍㄠ", "膏", -6.0),
        ("ㄎㄜ", "科", -3.6),
        ("ㄎㄜ", "顆", -4.2),
        ("ㄐㄧˋ", "記", -3.5),
        ("ㄐㄧˋ", "技", -4.0),
        ("ㄎㄜ-ㄐㄧˋ", "科技", -6.5),
        ("ㄍㄠ-ㄎㄜ-ㄐㄧˋ", "高科技", -9.0),
        ("ㄍㄨㄥ", "公", -3.2),
        ("ㄍㄨㄥ", "功", -3.4),
        ("ㄙ", "司", -4.0),
        ("ㄙ", "絲", -4.3),
        ("ㄍㄨㄥ-ㄙ", "公司", -6.2),
    ] {
        lm.insert(reading, value, score);
    }
    lm
}

fn grid_with<'a>(lm: &'a StaticLanguageModel, readings: &[&str]) -> ReadingGrid<&'a StaticLanguageModel> {
    let mut grid = ReadingGrid::new(lm);
    for reading in readings {
        assert!(grid.insert_reading(reading), "{reading} should be known");
    }
    grid
}

const HIGH_TECH_COMPANY: [&str; 5] = ["ㄍㄠ", "ㄎㄜ", "ㄐㄧˋ", "ㄍㄨㄥ", "ㄙ"];

#[test]
fn single_reading_walks_to_its_top_unigram() {
    let mut lm = StaticLanguageModel::new();
    lm.insert("ㄊㄞˊ", "台", -1.0);
    let mut grid = ReadingGrid::new(&lm);
    assert!(grid.insert_reading("ㄊㄞˊ"));

    let walk = grid.walk();
    assert_eq!(walk.nodes[0].value(), "台");
    assert_eq!(walk.total_readings, 1);
    assert_eq!(walk.vertices, 1);
}

#[test]
fn walk_prefers_the_weightiest_phrases() {
    let lm = phrase_table();
    let grid = grid_with(&lm, &HIGH_TECH_COMPANY);

    let walk = grid.walk();
    assert_eq!(walk.values_as_strings(), vec!["高科技", "公司"]);
    assert_eq!(walk.readings_as_strings(), vec!["ㄍㄠ-ㄎㄜ-ㄐㄧˋ", "ㄍㄨㄥ-ㄙ"]);
    assert_eq!(walk.total_readings, 5);
    assert!(walk.edges >= walk.nodes.len() - 1);
}

#[test]
fn custom_separator_joins_lookup_keys() {
    let mut lm = StaticLanguageModel::new();
    lm.insert("ㄍㄨㄥ", "公", -3.2);
    lm.insert("ㄙ", "司", -4.0);
    lm.insert("ㄍㄨㄥ+ㄙ", "公司", -6.2);

    let mut grid = ReadingGrid::with_separator(&lm, "+");
    assert!(!grid.insert_reading("+"));
    grid.insert_reading("ㄍㄨㄥ");
    grid.insert_reading("ㄙ");
    assert_eq!(grid.walk().values_as_strings(), vec!["公司"]);
}

#[test]
fn inserting_in_the_middle_rebuilds_phrases() {
    let lm = phrase_table();
    let mut grid = grid_with(&lm, &["ㄍㄠ", "ㄐㄧˋ"]);
    assert_eq!(grid.walk().values_as_strings(), vec!["高", "記"]);

    assert!(grid.set_cursor(1));
    assert!(grid.insert_reading("ㄎㄜ"));
    assert_eq!(grid.cursor(), 2);
    assert_eq!(grid.readings(), ["ㄍㄠ", "ㄎㄜ", "ㄐㄧˋ"]);
    assert_eq!(grid.walk().values_as_strings(), vec!["高科技"]);
}

#[test]
fn deleting_breaks_phrases_apart() {
    let lm = phrase_table();
    let mut grid = grid_with(&lm, &HIGH_TECH_COMPANY);

    assert!(grid.set_cursor(2));
    assert!(grid.delete_reading_before_cursor());
    assert_eq!(grid.cursor(), 1);
    assert_eq!(grid.walk().values_as_strings(), vec!["高", "記", "公司"]);

    assert!(grid.delete_reading_after_cursor());
    assert_eq!(grid.cursor(), 1);
    assert_eq!(grid.walk().values_as_strings(), vec!["高", "公司"]);

    assert!(grid.set_cursor(0));
    assert!(!grid.delete_reading_before_cursor());
    assert!(grid.set_cursor(grid.len()));
    assert!(!grid.delete_reading_after_cursor());
    assert!(!grid.set_cursor(grid.len() + 1));
}

#[rstest]
#[case(0, &["高科技", "高", "膏"])]
#[case(1, &["高科技", "科技", "科", "顆"])]
#[case(2, &["高科技", "科技", "記", "技"])]
#[case(4, &["公司", "司", "絲"])]
#[case(5, &["公司", "司", "絲"])]
fn candidates_cover_the_location(#[case] loc: usize, #[case] expected: &[&str]) {
    let lm = phrase_table();
    let grid = grid_with(&lm, &HIGH_TECH_COMPANY);

    let values: Vec<String> = grid.candidates_at(loc).into_iter().map(|c| c.value).collect();
    assert_eq!(values, expected);
}

#[test]
fn candidates_past_the_end_are_empty() {
    let lm = phrase_table();
    let grid = grid_with(&lm, &HIGH_TECH_COMPANY);
    assert!(grid.candidates_at(6).is_empty());

    let empty = ReadingGrid::new(&lm);
    assert!(empty.candidates_at(0).is_empty());
}

#[test]
fn high_score_override_wins_over_the_phrase() {
    let lm = phrase_table();
    let mut grid = grid_with(&lm, &HIGH_TECH_COMPANY);

    let candidate = Candidate::new("ㄎㄜ", "顆");
    assert!(grid.override_candidate(1, &candidate, OverrideType::HighScore));

    let walk = grid.walk();
    assert_eq!(walk.values_as_strings(), vec!["高", "顆", "記", "公司"]);
    let pinned = &walk.nodes[1];
    assert!(pinned.is_overridden());
    assert_eq!(pinned.score(), -3.6 + OVERRIDING_SCORE);
}

#[test]
fn overriding_resets_overlapping_overrides() {
    let lm = phrase_table();
    let mut grid = grid_with(&lm, &HIGH_TECH_COMPANY);

    assert!(grid.override_candidate_with_string(1, "顆", OverrideType::HighScore));
    assert!(grid.override_candidate_with_string(1, "科技", OverrideType::HighScore));

    let walk = grid.walk();
    assert_eq!(walk.values_as_strings(), vec!["高", "科技", "公司"]);
    let single = grid
        .overlapping_nodes_at(1)
        .into_iter()
        .find(|(_, node)| node.spanning_length() == 1)
        .map(|(_, node)| node.clone());
    assert!(single.is_some_and(|node| !node.is_overridden() && node.value() == "科"));
}

#[test]
fn top_unigram_score_override_can_still_lose() {
    let lm = phrase_table();
    let mut grid = grid_with(&lm, &["ㄍㄨㄥ", "ㄙ"]);

    // 功 takes 公's score (-3.2), but 公司 (-6.2) still beats 功 + 司 (-7.2)
    assert!(grid.override_candidate_with_string(0, "功", OverrideType::TopUnigramScore));
    assert_eq!(grid.walk().values_as_strings(), vec!["公司"]);

    assert!(grid.override_candidate_with_string(0, "功", OverrideType::HighScore));
    assert_eq!(grid.walk().values_as_strings(), vec!["功", "司"]);
}

#[test]
fn overrides_reject_unknown_values_and_locations() {
    let lm = phrase_table();
    let mut grid = grid_with(&lm, &HIGH_TECH_COMPANY);

    assert!(!grid.override_candidate_with_string(1, "貓", OverrideType::HighScore));
    assert!(!grid.override_candidate_with_string(9, "科", OverrideType::HighScore));
    // reading must match too
    let wrong_reading = Candidate::new("ㄐㄧˋ", "科");
    assert!(!grid.override_candidate(1, &wrong_reading, OverrideType::HighScore));
    assert_eq!(grid.walk().values_as_strings(), vec!["高科技", "公司"]);
}

#[test]
fn walks_do_not_see_later_overrides() {
    let lm = phrase_table();
    let mut grid = grid_with(&lm, &["ㄍㄨㄥ"]);
    let before = grid.walk();

    grid.override_candidate_with_string(0, "功", OverrideType::HighScore);
    assert_eq!(before.values_as_strings(), vec!["公"]);
    assert_eq!(grid.walk().values_as_strings(), vec!["功"]);
}

#[test]
fn find_node_at_follows_spanning_lengths() {
    let lm = phrase_table();
    let grid = grid_with(&lm, &HIGH_TECH_COMPANY);
    let walk = grid.walk();

    assert_eq!(walk.find_node_at(0), Some((0, 3)));
    assert_eq!(walk.find_node_at(1), Some((0, 3)));
    assert_eq!(walk.find_node_at(2), Some((0, 3)));
    assert_eq!(walk.find_node_at(3), Some((1, 5)));
    assert_eq!(walk.find_node_at(5), Some((1, 5)));
    assert_eq!(walk.find_node_at(6), None);
}

/// Model that only knows single letters, plus every run of equal letters.
struct RepeatingLetters;

impl LanguageModel for RepeatingLetters {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        let parts: Vec<&str> = reading.split('-').collect();
        let known = parts.iter().all(|p| ["a", "b", "c"].contains(p));
        if !known || parts.windows(2).any(|w| w[0] != w[1]) {
            return Vec::new();
        }
        vec![Unigram::new(reading.replace('-', ""), -(parts.len() as f64))]
    }
}

#[derive(Debug, Clone)]
enum Edit {
    Insert(usize),
    Backspace,
    Delete,
    MoveCursor(usize),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (0usize..3).prop_map(Edit::Insert),
        1 => Just(Edit::Backspace),
        1 => Just(Edit::Delete),
        1 => (0usize..16).prop_map(Edit::MoveCursor),
    ]
}

proptest! {
    #[test]
    fn walk_always_covers_every_reading(edits in proptest::collection::vec(edit(), 0..60)) {
        let mut grid = ReadingGrid::new(RepeatingLetters);
        for edit in edits {
            match edit {
                Edit::Insert(i) => {
                    prop_assert!(grid.insert_reading(["a", "b", "c"][i]));
                }
                Edit::Backspace => {
                    grid.delete_reading_before_cursor();
                }
                Edit::Delete => {
                    grid.delete_reading_after_cursor();
                }
                Edit::MoveCursor(c) => {
                    let moved = grid.set_cursor(c);
                    prop_assert_eq!(moved, c <= grid.len());
                }
            }
            let walk = grid.walk();
            let covered: usize = walk.nodes.iter().map(|n| n.spanning_length()).sum();
            prop_assert_eq!(covered, grid.len());
            prop_assert_eq!(walk.total_readings, grid.len());
            prop_assert_eq!(walk.values_as_strings().concat(), grid.readings().concat());
        }
    }
}
