//! Unit tests for content fingerprints

use reviewpack::compress::fingerprint::{content_hash, HASH_MODULUS};
use reviewpack::compress::{fast_fingerprint, fingerprint};

use crate::helpers::{python_source, rust_source};

#[test]
fn counts_lines_comments_and_tokens() {
    let content = "# setup\nimport os\n\ndef run(x):\n    return x\n";
    let fp = fingerprint(content, "auto");

    assert_eq!(fp.language.as_str(), "python");
    assert_eq!(fp.total_lines, 5);
    assert_eq!(fp.non_empty_lines, 4);
    assert_eq!(fp.comment_lines, 1);
    assert!((fp.code_comment_ratio - 0.75).abs() < 1e-9);
    assert_eq!(fp.total_tokens, 7);
    assert_eq!(fp.structure_count("functions"), 1);
    assert_eq!(fp.structure_count("imports"), 1);
}

#[test]
fn rust_structure_counts() {
    let content = rust_source(2_000);
    let fp = fingerprint(&content, "auto");
    let functions = content.matches("pub fn ").count();

    assert_eq!(fp.language.as_str(), "rust");
    assert_eq!(fp.structure_count("functions"), functions);
    assert_eq!(fp.structure_count("imports"), 1);
    assert_eq!(fp.structure_count("unknownMetric"), 0);
}

#[test]
fn empty_content_fingerprint() {
    let fp = fingerprint("", "auto");
    assert_eq!(fp.total_lines, 0);
    assert_eq!(fp.non_empty_lines, 0);
    assert_eq!(fp.code_comment_ratio, 1.0);
    assert_eq!(fp.content_hash, 0);
}

#[test]
fn metrics_are_flat_camel_case() {
    let fp = fingerprint("def f():\n    pass\n", "auto");
    let json: serde_json::Value = serde_json::from_str(&fp.to_json().unwrap()).unwrap();

    assert_eq!(json["totalLines"], 2);
    assert_eq!(json["nonEmptyLines"], 2);
    assert_eq!(json["functions"], 1);
    assert!(json.get("structure").is_none());
    assert_eq!(fp.get("functions"), Some(serde_json::json!(1)));
}

#[test]
fn content_hash_is_bounded_and_stable() {
    let content = python_source(5_000);
    let hash = content_hash(&content);
    assert!(hash < HASH_MODULUS);
    assert_eq!(hash, content_hash(&content));
    assert_ne!(hash, content_hash(&format!("{} ", content)));
}

#[test]
fn content_hash_small_values() {
    // "ab" = 97 * 31 + 98
    assert_eq!(content_hash("a"), 97);
    assert_eq!(content_hash("ab"), 3105);
}

#[test]
fn fast_fingerprint_ignores_middle_edits() {
    let head = "h".repeat(1500);
    let tail = "t".repeat(1500);
    let a = format!("{}{}{}", head, "middle-one", tail);
    let b = format!("{}{}{}", head, "middle-two", tail);

    assert_eq!(fast_fingerprint(&a), fast_fingerprint(&b));
    assert_ne!(fingerprint(&a, "auto").content_hash, fingerprint(&b, "auto").content_hash);
}

#[test]
fn fast_fingerprint_sees_length_and_edges() {
    let base = "x".repeat(5000);
    let longer = "x".repeat(5001);
    let edited = format!("y{}", &base[1..]);

    assert_ne!(fast_fingerprint(&base), fast_fingerprint(&longer));
    assert_ne!(fast_fingerprint(&base), fast_fingerprint(&edited));
    assert_eq!(fast_fingerprint(&base).length, 5000);
}

#[test]
fn fast_key_format() {
    let fp = fast_fingerprint("abc");
    assert!(fp.key().starts_with("3:"));
    assert_eq!(fp.key().len(), "3:".len() + 8);
}
