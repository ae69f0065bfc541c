//! Best-effort language detection from a content sample.
//!
//! Detection walks an ordered table of signature patterns and returns the
//! tag of the first pattern that matches. Order is precedence: dialects are
//! listed before the languages they extend, so a TypeScript file is never
//! reported as JavaScript and an SCSS file is never reported as CSS.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hint value that asks for detection instead of a fixed language.
pub const AUTO: &str = "auto";

/// Tag returned when no signature matches.
pub const FALLBACK: &str = "text";

/// Number of leading characters inspected during detection.
pub const SAMPLE_CHARS: usize = 5000;

/// Language identifier produced by [`detect`].
///
/// Tags are free-form: an explicit hint is passed through verbatim, so a tag
/// may name a language that has no scoring or fingerprint table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The generic tag used when detection finds nothing.
    pub fn fallback() -> Self {
        Self(FALLBACK.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_fallback(&self) -> bool {
        self.0 == FALLBACK
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for LanguageTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for LanguageTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Ordered signature table. The first matching row wins.
static SIGNATURES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    let rows: &[(&str, &str)] = &[
        (
            "typescript",
            r#"(?m)\bimport\s+type\b|^\s*export\s+(?:interface|type|enum)\s+\w+|(?:\(\s*|\b(?:let|const|var|readonly|private|public|protected)\s+)\w+\??\s*:\s*(?:string|number|boolean|any|void|unknown|never)\b|\w+\??\s*:\s*(?:string|number|boolean|any|void|unknown|never)(?:\[\])?\s*[;=)]|\)\s*:\s*(?:string|number|boolean|any|void|unknown|never|Promise<)"#,
        ),
        (
            "vue",
            r#"(?m)^\s*<template[\s>]|<script[^>]*\bsetup\b|\bdefineComponent\s*\("#,
        ),
        (
            "react",
            r#"from\s+['"]react['"]|\buse(?:State|Effect|Context|Reducer|Memo|Callback|Ref)\s*\(|\bclassName=|return\s*\(\s*<"#,
        ),
        (
            "scss",
            r#"(?m)^\s*\$[\w-]+\s*:|@mixin\s+[\w-]+|@include\s+[\w-]+|&:[\w-]+|@extend\s+"#,
        ),
        ("php", r#"<\?php"#),
        ("shell", r#"\A#!.*\b(?:ba|z|k)?sh\b"#),
        (
            "javascript",
            r#"(?m)\bfunction\s*\w*\s*\(|\b(?:const|let|var)\s+\w+\s*=\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*=>|\brequire\s*\(\s*['"]|\bmodule\.exports\b|\bconsole\.log\s*\(|^\s*export\s+default\b|^\s*import\s+[\w{}\s,*]+\s+from\s+['"]"#,
        ),
        (
            "python",
            r#"(?m)^\s*(?:async\s+)?def\s+\w+\s*\(|^\s*class\s+\w+(?:\([^)]*\))?\s*:|^\s*from\s+[\w.]+\s+import\s|^\s*import\s+[\w.]+\s*$|\bif\s+__name__\s*==|\A#!.*python"#,
        ),
        (
            "rust",
            r#"(?m)\bfn\s+\w+\s*[<(]|\blet\s+mut\s|^\s*impl(?:<[^>]*>)?\s+\w+|^\s*use\s+\w+::|#\[derive\(|\bpub\s+(?:struct|enum|fn|mod|trait)\b"#,
        ),
        (
            "kotlin",
            r#"(?m)\bfun\s+\w+\s*\(|\bval\s+\w+\s*[:=]|\bdata\s+class\b"#,
        ),
        (
            "swift",
            r#"(?m)^\s*import\s+(?:UIKit|SwiftUI|Foundation)\b|\bguard\s+let\b|\bfunc\s+\w+\s*\([^)]*\)\s*->"#,
        ),
        (
            "go",
            r#"(?m)^package\s+\w+\s*$|\bfunc\s+(?:\([^)]*\)\s*)?\w+\s*\("#,
        ),
        (
            "csharp",
            r#"(?m)^\s*using\s+System\b|\{\s*get;\s*(?:set;\s*)?\}|\bnamespace\s+\w+(?:\.\w+)+"#,
        ),
        (
            "java",
            r#"(?m)^\s*import\s+java\.|\bSystem\.out\.|@Override\b|\b(?:public|private|protected)\s+(?:static\s+)?(?:final\s+)?(?:class|interface|enum)\s+\w+"#,
        ),
        (
            "ruby",
            r#"(?m)^\s*def\s+\w+[?!]?\s*$|^\s*require\s+['"]|\battr_(?:accessor|reader|writer)\b|\bdo\s*\|[^|]*\|"#,
        ),
        (
            "cpp",
            r#"(?m)^\s*#include\s*<(?:iostream|vector|string|memory|map|algorithm)>|\bstd::|\btemplate\s*<|\bcout\s*<<"#,
        ),
        (
            "c",
            r#"(?m)^\s*#include\s*[<"][\w/]+\.h[>"]|\bint\s+main\s*\(|\bprintf\s*\(|\bmalloc\s*\("#,
        ),
        (
            "html",
            r#"(?i)<!doctype\s+html|<html[\s>]|<(?:div|body|head|span)[\s>]"#,
        ),
        (
            "css",
            r#"(?m)^\s*(?:[.#][\w-]+|@media|@import|:root|body|html)\b[^{\n]*\{|\b(?:color|margin|padding|display|font-size)\s*:\s*[^;\n]+;"#,
        ),
        (
            "sql",
            r#"(?i)\b(?:select\s+.+\s+from|insert\s+into|create\s+table|update\s+\w+\s+set|alter\s+table)\b"#,
        ),
        ("yaml", r#"(?m)^---\s*$|^[\w-]+:\s*\|?\s*$|^\s*-\s+[\w-]+:\s"#),
        ("json", r#"\A\s*(?:\{\s*"[^"]*"\s*:|\[)"#),
        (
            "markdown",
            r#"(?m)^#{1,6}\s+\S|^\s*[-*]\s+\[[ xX]\]|\[[^\]]+\]\([^)]+\)|^```"#,
        ),
    ];

    rows.iter()
        .map(|(tag, pattern)| {
            let regex = Regex::new(pattern).expect("language signature must compile");
            (*tag, regex)
        })
        .collect()
});

/// Detect the language of `content`.
///
/// A `hint` other than [`AUTO`] is returned unchanged, without checking it
/// against any known set. Otherwise only the first [`SAMPLE_CHARS`]
/// characters are inspected and [`FALLBACK`] is returned when nothing
/// matches. Never fails.
pub fn detect(content: &str, hint: &str) -> LanguageTag {
    if hint != AUTO {
        return LanguageTag::new(hint);
    }

    let sample = sample_prefix(content, SAMPLE_CHARS);

    SIGNATURES
        .iter()
        .find(|(_, pattern)| pattern.is_match(sample))
        .map(|(tag, _)| LanguageTag::new(*tag))
        .unwrap_or_else(LanguageTag::fallback)
}

/// Tags in the order they are tested.
pub fn detection_order() -> Vec<&'static str> {
    SIGNATURES.iter().map(|(tag, _)| *tag).collect()
}

/// Slice the first `max_chars` characters without splitting a code point.
fn sample_prefix(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}
