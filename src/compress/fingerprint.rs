//! Structural summaries and content hashes.
//!
//! A [`ContentFingerprint`] records line, token and comment counts, a set of
//! language-specific structure counts, and a polynomial hash of the full
//! text. [`FastFingerprint`] is a cheap pre-check that only reads the ends
//! of the content.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::language::{self, LanguageTag};

/// Modulus for [`content_hash`] (2^31 - 1).
pub const HASH_MODULUS: u64 = 2_147_483_647;

/// Characters read from each end by [`fast_fingerprint`].
pub const FAST_EDGE_CHARS: usize = 1000;

const COMMENT_PREFIXES: [&str; 4] = ["//", "#", "/*", "*"];

/// Summary of a piece of content.
///
/// Serializes to a flat JSON object with camelCase keys; structure counts sit
/// next to the fixed metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFingerprint {
    pub language: LanguageTag,
    pub total_lines: usize,
    pub non_empty_lines: usize,
    pub total_tokens: usize,
    pub comment_lines: usize,
    pub code_comment_ratio: f64,
    pub content_hash: u64,
    #[serde(flatten)]
    pub structure: BTreeMap<String, usize>,
}

impl ContentFingerprint {
    /// All metrics as an ordered name -> value map.
    pub fn metrics(&self) -> BTreeMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Look up a single metric by its serialized name.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.metrics().remove(name)
    }

    /// Count for a structural metric, 0 when the language does not track it.
    pub fn structure_count(&self, name: &str) -> usize {
        self.structure.get(name).copied().unwrap_or(0)
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Length plus a hash over the first and last [`FAST_EDGE_CHARS`] characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FastFingerprint {
    pub length: usize,
    pub hash: u64,
}

impl FastFingerprint {
    /// Compact string form usable as a cache key.
    pub fn key(&self) -> String {
        format!("{}:{:08x}", self.length, self.hash)
    }
}

struct StructureRule {
    name: &'static str,
    pattern: Regex,
}

fn rules(rows: &[(&'static str, &str)]) -> Vec<StructureRule> {
    rows.iter()
        .map(|&(name, pattern)| StructureRule {
            name,
            pattern: Regex::new(pattern).expect("structure pattern must compile"),
        })
        .collect()
}

const JS_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"(?m)\bfunction\b|=>\s*[{(]?"),
    ("classes", r"(?m)\bclass\s+\w+"),
    ("imports", r"(?m)^\s*import\b|\brequire\s*\("),
    ("exports", r"(?m)^\s*export\b|\bmodule\.exports\b"),
];

const TS_STRUCTURE: &[(&str, &str)] = &[
    ("interfaces", r"(?m)\binterface\s+\w+"),
    ("types", r"(?m)^\s*(?:export\s+)?type\s+\w+\s*="),
    ("enums", r"(?m)\benum\s+\w+"),
];

const REACT_STRUCTURE: &[(&str, &str)] = &[
    ("components", r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:function|const)\s+[A-Z]\w*"),
    ("hooks", r"\buse[A-Z]\w*\s*\("),
    ("jsxElements", r"<[A-Z]\w*[\s/>]"),
];

const VUE_STRUCTURE: &[(&str, &str)] = &[
    ("templates", r"(?m)^\s*<template\b"),
    ("directives", r"\sv-[\w:-]+"),
    ("props", r"\bprops\s*:|\bdefineProps\s*[<(]"),
    ("computed", r"\bcomputed\s*[:(]"),
];

const PYTHON_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"(?m)^\s*(?:async\s+)?def\s+\w+"),
    ("classes", r"(?m)^\s*class\s+\w+"),
    ("imports", r"(?m)^\s*(?:import|from)\s+[\w.]+"),
    ("decorators", r"(?m)^\s*@\w+"),
];

const RUST_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"(?m)\bfn\s+\w+"),
    ("structs", r"(?m)\bstruct\s+\w+"),
    ("enums", r"(?m)\benum\s+\w+"),
    ("traits", r"(?m)\btrait\s+\w+"),
    ("impls", r"(?m)^\s*impl\b"),
    ("imports", r"(?m)^\s*(?:pub\s+)?use\s+"),
];

const GO_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"(?m)^func\s+"),
    ("structs", r"\btype\s+\w+\s+struct\b"),
    ("interfaces", r"\btype\s+\w+\s+interface\b"),
    ("imports", r#"(?m)^\s*import\b|^\s*"[\w./-]+"\s*$"#),
];

const JAVA_STRUCTURE: &[(&str, &str)] = &[
    ("classes", r"\bclass\s+\w+"),
    ("interfaces", r"\binterface\s+\w+"),
    ("methods", r"(?m)^\s*(?:public|private|protected)\s+(?:static\s+)?[\w<>\[\]]+\s+\w+\s*\("),
    ("imports", r"(?m)^\s*import\s+"),
    ("annotations", r"(?m)^\s*@\w+"),
];

const CSHARP_STRUCTURE: &[(&str, &str)] = &[
    ("classes", r"\bclass\s+\w+"),
    ("interfaces", r"\binterface\s+\w+"),
    ("properties", r"\{\s*get;"),
    ("usings", r"(?m)^\s*using\s+[\w.]+;"),
];

const C_STRUCTURE: &[(&str, &str)] = &[
    ("includes", r"(?m)^\s*#include\b"),
    ("functions", r"(?m)^\w[\w\s\*]*\s\**\w+\s*\([^;]*$"),
    ("structs", r"\bstruct\s+\w+\s*\{"),
    ("macros", r"(?m)^\s*#define\b"),
];

const CPP_EXTRA: &[(&str, &str)] = &[
    ("classes", r"\bclass\s+\w+"),
    ("templates", r"\btemplate\s*<"),
    ("namespaces", r"\bnamespace\s+\w+"),
];

const RUBY_STRUCTURE: &[(&str, &str)] = &[
    ("methods", r"(?m)^\s*def\s+"),
    ("classes", r"(?m)^\s*class\s+\w+"),
    ("modules", r"(?m)^\s*module\s+\w+"),
    ("requires", r"(?m)^\s*require(?:_relative)?\s+"),
];

const PHP_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"\bfunction\s+\w+"),
    ("classes", r"\bclass\s+\w+"),
    ("uses", r"(?m)^\s*use\s+[\w\\]+"),
];

const KOTLIN_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"\bfun\s+\w+"),
    ("classes", r"\bclass\s+\w+"),
    ("imports", r"(?m)^\s*import\s+"),
];

const SWIFT_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"\bfunc\s+\w+"),
    ("types", r"\b(?:class|struct|enum|protocol)\s+\w+"),
    ("imports", r"(?m)^\s*import\s+"),
];

const SHELL_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"(?m)^\s*(?:function\s+\w+|\w+\s*\(\)\s*\{)"),
    ("variables", r"(?m)^\s*(?:export\s+)?[A-Za-z_]\w*="),
];

const CSS_STRUCTURE: &[(&str, &str)] = &[
    ("rules", r"\{"),
    ("mediaQueries", r"@media\b"),
    ("declarations", r"[\w-]+\s*:\s*[^;{}]+;"),
];

const SCSS_EXTRA: &[(&str, &str)] = &[
    ("variables", r"(?m)^\s*\$[\w-]+\s*:"),
    ("mixins", r"@mixin\s+"),
    ("includes", r"@include\s+"),
];

const HTML_STRUCTURE: &[(&str, &str)] = &[
    ("elements", r"<[a-zA-Z][\w-]*"),
    ("scripts", r"(?i)<script\b"),
    ("styles", r"(?i)<style\b|<link[^>]+stylesheet"),
];

const SQL_STRUCTURE: &[(&str, &str)] = &[
    ("queries", r"(?i)\bselect\b"),
    ("tables", r"(?i)\bcreate\s+table\b"),
    ("mutations", r"(?i)\b(?:insert|update|delete)\b"),
];

const YAML_STRUCTURE: &[(&str, &str)] = &[
    ("keys", r"(?m)^\s*[\w-]+:"),
    ("listItems", r"(?m)^\s*-\s"),
];

const JSON_STRUCTURE: &[(&str, &str)] = &[
    ("keys", r#""[^"]*"\s*:"#),
    ("objects", r"\{"),
    ("arrays", r"\["),
];

const MARKDOWN_STRUCTURE: &[(&str, &str)] = &[
    ("headings", r"(?m)^#{1,6}\s"),
    ("codeBlocks", r"(?m)^```"),
    ("links", r"\[[^\]]+\]\([^)]+\)"),
];

/// Used for tags without a table of their own.
const GENERIC_STRUCTURE: &[(&str, &str)] = &[
    ("functions", r"\b(?:function|def|fn|func|fun|sub|proc)\s+\w+"),
    ("classes", r"\b(?:class|struct|interface|module)\s+\w+"),
    ("imports", r"(?m)^\s*(?:import|include|require|use|using)\b"),
];

static STRUCTURE_TABLES: Lazy<HashMap<&'static str, Vec<StructureRule>>> = Lazy::new(|| {
    let compose = |parts: &[&[(&'static str, &'static str)]]| -> Vec<StructureRule> {
        let rows: Vec<(&'static str, &'static str)> =
            parts.iter().flat_map(|p| p.iter().copied()).collect();
        rules(&rows)
    };

    let mut tables = HashMap::new();
    tables.insert("javascript", compose(&[JS_STRUCTURE]));
    tables.insert("typescript", compose(&[JS_STRUCTURE, TS_STRUCTURE]));
    tables.insert("react", compose(&[JS_STRUCTURE, REACT_STRUCTURE]));
    tables.insert("vue", compose(&[JS_STRUCTURE, VUE_STRUCTURE]));
    tables.insert("python", compose(&[PYTHON_STRUCTURE]));
    tables.insert("rust", compose(&[RUST_STRUCTURE]));
    tables.insert("go", compose(&[GO_STRUCTURE]));
    tables.insert("java", compose(&[JAVA_STRUCTURE]));
    tables.insert("csharp", compose(&[CSHARP_STRUCTURE]));
    tables.insert("c", compose(&[C_STRUCTURE]));
    tables.insert("cpp", compose(&[C_STRUCTURE, CPP_EXTRA]));
    tables.insert("ruby", compose(&[RUBY_STRUCTURE]));
    tables.insert("php", compose(&[PHP_STRUCTURE]));
    tables.insert("kotlin", compose(&[KOTLIN_STRUCTURE]));
    tables.insert("swift", compose(&[SWIFT_STRUCTURE]));
    tables.insert("shell", compose(&[SHELL_STRUCTURE]));
    tables.insert("css", compose(&[CSS_STRUCTURE]));
    tables.insert("scss", compose(&[CSS_STRUCTURE, SCSS_EXTRA]));
    tables.insert("html", compose(&[HTML_STRUCTURE]));
    tables.insert("sql", compose(&[SQL_STRUCTURE]));
    tables.insert("yaml", compose(&[YAML_STRUCTURE]));
    tables.insert("json", compose(&[JSON_STRUCTURE]));
    tables.insert("markdown", compose(&[MARKDOWN_STRUCTURE]));
    tables
});

static GENERIC_TABLE: Lazy<Vec<StructureRule>> = Lazy::new(|| rules(GENERIC_STRUCTURE));

fn structure_rules(language: &LanguageTag) -> &'static [StructureRule] {
    STRUCTURE_TABLES
        .get(language.as_str())
        .map(Vec::as_slice)
        .unwrap_or_else(|| GENERIC_TABLE.as_slice())
}

/// Polynomial hash over UTF-16 code units, reduced mod 2^31 - 1.
pub fn content_hash(content: &str) -> u64 {
    hash_units(0, content.encode_utf16())
}

fn hash_units(seed: u64, units: impl Iterator<Item = u16>) -> u64 {
    units.fold(seed, |hash, unit| (hash * 31 + u64::from(unit)) % HASH_MODULUS)
}

fn is_comment(trimmed: &str) -> bool {
    COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Drop punctuation, then split on whitespace, so `foo.bar` is one token.
fn count_tokens(content: &str) -> usize {
    let stripped: String = content
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().count()
}

/// Full fingerprint of `content`. `hint` follows [`language::detect`].
pub fn fingerprint(content: &str, hint: &str) -> ContentFingerprint {
    let language = language::detect(content, hint);

    let mut total_lines = 0;
    let mut non_empty_lines = 0;
    let mut comment_lines = 0;
    for line in content.lines() {
        total_lines += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        non_empty_lines += 1;
        if is_comment(trimmed) {
            comment_lines += 1;
        }
    }

    let code_comment_ratio = if non_empty_lines == 0 {
        1.0
    } else {
        (non_empty_lines - comment_lines) as f64 / non_empty_lines as f64
    };

    let structure = structure_rules(&language)
        .iter()
        .map(|rule| (rule.name.to_string(), rule.pattern.find_iter(content).count()))
        .collect();

    ContentFingerprint {
        language,
        total_lines,
        non_empty_lines,
        total_tokens: count_tokens(content),
        comment_lines,
        code_comment_ratio,
        content_hash: content_hash(content),
        structure,
    }
}

/// Cheap fingerprint reading only the ends of `content`.
///
/// Edits confined to the middle of a long file do not change the result.
pub fn fast_fingerprint(content: &str) -> FastFingerprint {
    let length = content.chars().count();

    let head_end = content
        .char_indices()
        .nth(FAST_EDGE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    let tail_start = if length > FAST_EDGE_CHARS {
        content
            .char_indices()
            .nth(length - FAST_EDGE_CHARS)
            .map(|(i, _)| i)
            .unwrap_or(0)
    } else {
        0
    };

    let hash = hash_units(0, content[..head_end].encode_utf16());
    let hash = hash_units(hash, content[tail_start..].encode_utf16());
    let hash = hash_units(hash, length.to_string().encode_utf16());

    FastFingerprint { length, hash }
}
