//! Unit tests for language detection

use reviewpack::compress::language::{detect, detection_order, AUTO, FALLBACK, SAMPLE_CHARS};

#[test]
fn detects_common_languages() {
    let cases = [
        ("import type { A } from './a';\nexport interface B { x: string }", "typescript"),
        ("<template>\n  <div/>\n</template>", "vue"),
        ("import React from 'react';\nconst [a, setA] = useState(0);", "react"),
        ("<?php echo 1; ?>", "php"),
        ("#!/bin/bash\necho hi", "shell"),
        ("function add(a, b) { return a + b; }", "javascript"),
        ("def main():\n    pass\n", "python"),
        ("fn main() {\n    let mut x = 1;\n}", "rust"),
        ("package main\n\nfunc main() {}\n", "go"),
        ("SELECT id FROM users WHERE id = 1;", "sql"),
        ("# Title\n\nSome text.", "markdown"),
    ];

    for (content, expected) in cases {
        assert_eq!(detect(content, AUTO).as_str(), expected, "content: {}", content);
    }
}

#[test]
fn unknown_content_falls_back_to_text() {
    assert_eq!(detect("just some words", AUTO).as_str(), FALLBACK);
    assert_eq!(detect("", AUTO).as_str(), FALLBACK);
}

#[test]
fn explicit_hint_is_not_validated() {
    assert_eq!(detect("def f(): pass", "cobol").as_str(), "cobol");
}

#[test]
fn only_the_sample_window_is_inspected() {
    let content = format!("{}\ndef late():\n    pass\n", "a ".repeat(SAMPLE_CHARS));
    assert_eq!(detect(&content, AUTO).as_str(), FALLBACK);
}

#[test]
fn typescript_is_tested_before_javascript() {
    let order = detection_order();
    let ts = order.iter().position(|t| *t == "typescript").unwrap();
    let js = order.iter().position(|t| *t == "javascript").unwrap();
    assert!(ts < js);
    assert_eq!(order.first(), Some(&"typescript"));
}
