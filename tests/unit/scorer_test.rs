//! Unit tests for line scoring

use reviewpack::compress::{score_line, score_lines, LanguageTag};

#[test]
fn declarations_outscore_plain_statements() {
    let python = LanguageTag::new("python");
    assert!(score_line("def load(path):", &python) > score_line("    x = 1", &python));
    assert!(score_line("class Cache:", &python) > score_line("    x = 1", &python));
}

#[test]
fn blank_lines_score_lowest() {
    let rust = LanguageTag::new("rust");
    assert_eq!(score_line("", &rust), 0);
    assert!(score_line("let x = 1;", &rust) > 0);
}

#[test]
fn important_comments_get_a_boost() {
    let text = LanguageTag::fallback();
    assert!(score_line("// TODO: handle overflow", &text) > score_line("// handle overflow", &text));
}

#[test]
fn unknown_language_uses_generic_table() {
    let custom = LanguageTag::new("cobol");
    assert!(score_line("function run() {", &custom) > score_line("plain words", &custom));
}

#[test]
fn scored_lines_carry_original_indices() {
    let lines = ["a", "fn b() {}", "c"];
    let scored = score_lines(&lines, 10, &LanguageTag::new("rust"));
    let indices: Vec<usize> = scored.iter().map(|s| s.original_index).collect();
    assert_eq!(indices, vec![10, 11, 12]);
    assert!(scored[1].score > scored[0].score);
}
