//! Per-line importance scoring.
//!
//! A line's score is the sum of the weights of every signal it matches.
//! Signals are data: each language maps to an ordered list of
//! `(pattern, weight)` rows, and a set of universal rows applies to every
//! language. Adding a language means adding a table entry.
//!
//! Weights, highest first:
//!
//! | Signal                                   | Weight |
//! |------------------------------------------|--------|
//! | Declarations (class, function, imports)  | 4-5    |
//! | Framework idioms (hooks, directives)     | 3-4    |
//! | Important comments (TODO, FIXME, BUG)    | 4      |
//! | Security vocabulary                      | 3      |
//! | Control flow and error handling          | 2-3    |
//! | Documentation comment prefix             | 2      |
//! | Non-empty line                           | 1      |

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::language::LanguageTag;

/// A line considered for selection, with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredLine<'a> {
    pub text: &'a str,
    pub original_index: usize,
    pub score: u32,
}

/// One weighted pattern in a scoring table.
#[derive(Debug)]
pub struct Signal {
    pattern: Regex,
    weight: u32,
}

impl Signal {
    fn new(pattern: &str, weight: u32) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("scoring pattern must compile"),
            weight,
        }
    }

    fn weight_for(&self, line: &str) -> u32 {
        if self.pattern.is_match(line) {
            self.weight
        } else {
            0
        }
    }
}

fn table(rows: &[(&str, u32)]) -> Vec<Signal> {
    rows.iter().map(|(p, w)| Signal::new(p, *w)).collect()
}

const JS_ROWS: &[(&str, u32)] = &[
    (r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\b", 5),
    (r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+\w+", 5),
    (r"^\s*import\s|\brequire\s*\(", 4),
    (r"^\s*export\s", 4),
    (r"^\s*(?:const|let|var)\s+\w+\s*=\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*=>", 4),
    (r"\b(?:try|catch|finally|throw)\b", 3),
    (r"\b(?:if|else|for|while|switch|case|return)\b", 2),
    (r"\bawait\b|\.then\s*\(", 2),
];

const TS_ROWS: &[(&str, u32)] = &[
    (r"^\s*(?:export\s+)?(?:declare\s+)?(?:interface|type|enum)\s+\w+", 5),
    (r"^\s*(?:public|private|protected|readonly|static)\s", 3),
    (r"^\s*@\w+", 3),
];

const REACT_ROWS: &[(&str, u32)] = &[
    (r"\buse[A-Z]\w*\s*\(", 4),
    (r"^\s*return\s*\(?\s*<", 3),
    (r"\b(?:props|setState)\b", 3),
];

const VUE_ROWS: &[(&str, u32)] = &[
    (r"^\s*<(?:template|script|style)\b", 4),
    (
        r"\b(?:mounted|created|beforeMount|beforeDestroy|unmounted|setup|computed|watch)\s*[:(]",
        4,
    ),
    (r"\bv-(?:if|else|for|model|bind|on|show)\b|\s[:@][\w-]+=", 3),
];

const PYTHON_ROWS: &[(&str, u32)] = &[
    (r"^\s*(?:async\s+)?def\s+\w+", 5),
    (r"^\s*class\s+\w+", 5),
    (r"^\s*(?:import|from)\s+[\w.]+", 4),
    (r"^\s*@\w+", 3),
    (r"\b(?:try|except|finally|raise|with)\b", 3),
    (r"\b(?:if|elif|else|for|while|return|yield)\b", 2),
];

const RUST_ROWS: &[(&str, u32)] = &[
    (r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?fn\s+\w+", 5),
    (r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait|union|type)\s+\w+", 5),
    (r"^\s*impl\b", 5),
    (r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:use|mod)\s", 4),
    (r"^\s*#!?\[", 3),
    (r"\b(?:match|Err|unwrap|expect|panic!)\b|\?;", 3),
    (r"\bunsafe\b", 3),
    (r"\b(?:if|else|for|while|loop|return)\b", 2),
];

const GO_ROWS: &[(&str, u32)] = &[
    (r"^\s*func\s", 5),
    (r"^\s*type\s+\w+\s+(?:struct|interface)\b", 5),
    (r"^\s*(?:import|package)\b", 4),
    (r"\bif\s+err\s*!=\s*nil\b|\b(?:defer|panic|recover)\b", 3),
    (r"\bgo\s+\w+|\bchan\b|\bselect\s*\{", 3),
    (r"\b(?:if|else|for|switch|case|return)\b", 2),
];

const JAVA_ROWS: &[(&str, u32)] = &[
    (
        r"^\s*(?:(?:public|private|protected|static|final|abstract)\s+)*(?:class|interface|enum|record)\s+\w+",
        5,
    ),
    (
        r"^\s*(?:public|private|protected)\s+(?:static\s+)?(?:final\s+)?[\w<>\[\],]+\s+\w+\s*\(",
        5,
    ),
    (r"^\s*(?:import|package)\s", 4),
    (r"^\s*@\w+", 3),
    (r"\b(?:try|catch|finally|throw|throws)\b", 3),
    (r"\b(?:if|else|for|while|switch|case|return)\b", 2),
];

const KOTLIN_ROWS: &[(&str, u32)] = &[
    (
        r"^\s*(?:(?:private|public|internal|open|data|sealed|abstract)\s+)*(?:class|interface|object)\s+\w+",
        5,
    ),
    (r"^\s*(?:(?:private|public|internal|override|suspend|inline)\s+)*fun\s", 5),
    (r"^\s*(?:import|package)\s", 4),
    (r"^\s*@\w+", 3),
    (r"\b(?:try|catch|finally|throw)\b", 3),
    (r"\b(?:if|else|for|while|when|return)\b", 2),
];

const CSHARP_ROWS: &[(&str, u32)] = &[
    (
        r"^\s*(?:(?:public|private|protected|internal|static|sealed|abstract|partial)\s+)*(?:class|interface|struct|enum|record)\s+\w+",
        5,
    ),
    (
        r"^\s*(?:public|private|protected|internal)\s+(?:(?:static|async|override|virtual)\s+)*[\w<>\[\],]+\s+\w+\s*\(",
        5,
    ),
    (r"^\s*(?:using|namespace)\s", 4),
    (r"^\s*\[\w+", 3),
    (r"\b(?:try|catch|finally|throw)\b", 3),
    (r"\b(?:if|else|for|foreach|while|switch|case|return)\b", 2),
];

const C_FAMILY_ROWS: &[(&str, u32)] = &[
    (r"^\s*(?:class|struct|namespace|template|union|enum)\b", 5),
    (
        r"^\s*[\w:<>*&]+(?:\s+[\w:<>*&]+)*\s+\**\w+(?:::\w+)*\s*\([^;]*\)\s*(?:const\s*)?\{?\s*$",
        5,
    ),
    (r"^\s*#include\b", 4),
    (r"^\s*#define\b", 3),
    (r"\b(?:try|catch|throw)\b", 3),
    (r"\b(?:malloc|calloc|realloc|free|new|delete)\b", 3),
    (r"\b(?:if|else|for|while|switch|case|return|goto)\b", 2),
];

const RUBY_ROWS: &[(&str, u32)] = &[
    (r"^\s*def\s", 5),
    (r"^\s*(?:class|module)\s", 5),
    (r"^\s*require(?:_relative)?\s", 4),
    (r"\b(?:begin|rescue|ensure|raise)\b", 3),
    (r"\battr_(?:accessor|reader|writer)\b", 3),
    (r"\b(?:if|unless|else|elsif|case|when|while|until|return)\b", 2),
];

const PHP_ROWS: &[(&str, u32)] = &[
    (r"^\s*(?:(?:public|private|protected|static|abstract|final)\s+)*function\s", 5),
    (r"^\s*(?:abstract\s+|final\s+)?(?:class|interface|trait)\s+\w+", 5),
    (r"^\s*(?:use|namespace|require|require_once|include|include_once)\b", 4),
    (r"\b(?:try|catch|finally|throw)\b", 3),
    (r"\b(?:if|else|elseif|foreach|for|while|switch|case|return)\b", 2),
];

const SWIFT_ROWS: &[(&str, u32)] = &[
    (
        r"^\s*(?:(?:public|private|internal|open|static|override|mutating)\s+)*func\s",
        5,
    ),
    (
        r"^\s*(?:(?:public|private|internal|open|final)\s+)*(?:class|struct|enum|protocol|extension)\s+\w+",
        5,
    ),
    (r"^\s*import\s", 4),
    (r"^\s*@\w+", 3),
    (r"\b(?:guard|defer|throws?|try|catch)\b", 3),
    (r"\b(?:if|else|for|while|switch|case|return)\b", 2),
];

const SHELL_ROWS: &[(&str, u32)] = &[
    (r"^\s*(?:function\s+\w+|\w+\s*\(\s*\)\s*\{)", 5),
    (r"^\s*(?:source|\.)\s", 4),
    (r"\bset\s+-[euxo]+|\btrap\b|\bexit\s+\d", 3),
    (r"\b(?:if|then|else|elif|fi|for|while|case|esac)\b", 2),
];

const CSS_ROWS: &[(&str, u32)] = &[
    (r"^\s*@(?:media|import|keyframes|font-face|supports)\b", 4),
    (r"^\S[^{]*\{\s*$", 4),
    (r"!important", 3),
];

const SCSS_ROWS: &[(&str, u32)] = &[
    (r"^\s*@(?:mixin|include|extend|function|use|forward)\b", 4),
    (r"^\s*\$[\w-]+\s*:", 3),
];

const HTML_ROWS: &[(&str, u32)] = &[
    (r"^\s*<(?:html|head|body|main|header|footer|nav|section|form)\b", 4),
    (r"^\s*<(?:script|link|meta)\b", 4),
    (r"\b(?:id|class)=", 2),
];

const SQL_ROWS: &[(&str, u32)] = &[
    (
        r"(?i)^\s*(?:create|alter|drop)\s+(?:table|index|view|function|procedure|trigger)\b",
        5,
    ),
    (r"(?i)^\s*(?:select|insert|update|delete|merge)\b", 4),
    (r"(?i)\b(?:begin|commit|rollback|transaction)\b", 3),
    (r"(?i)\b(?:join|where|group\s+by|order\s+by|having)\b", 2),
];

const YAML_ROWS: &[(&str, u32)] = &[(r"^[\w-]+:", 4), (r"^\s*-\s", 1)];

const JSON_ROWS: &[(&str, u32)] = &[(r#"^\s{0,2}"[\w-]+"\s*:"#, 4)];

const MARKDOWN_ROWS: &[(&str, u32)] = &[
    (r"^#{1,6}\s", 5),
    (r"^\s*```", 3),
    (r"^\s*[-*]\s+\[[ xX]\]", 3),
];

/// Reduced table for languages without a dedicated entry.
const GENERIC_ROWS: &[(&str, u32)] = &[
    (
        r"\b(?:class|struct|interface|function|func|fn|def|sub|procedure)\b",
        4,
    ),
    (r"\b(?:public|private|protected|static|final|const|export)\b", 2),
];

/// Rows that apply regardless of language.
const UNIVERSAL_ROWS: &[(&str, u32)] = &[
    (r"\b(?:TODO|FIXME|BUG|HACK|XXX|NOTE)\b", 4),
    (
        r"(?i)auth|passw(?:or)?d|token|secret|credential|api[_-]?key|encrypt|decrypt|permission",
        3,
    ),
    (r#"^\s*(?:///|//|/\*\*|\*\s|"""|#\s)"#, 2),
    (r"\S", 1),
];

static UNIVERSAL: Lazy<Vec<Signal>> = Lazy::new(|| table(UNIVERSAL_ROWS));

static GENERIC: Lazy<Vec<Signal>> = Lazy::new(|| table(GENERIC_ROWS));

static TABLES: Lazy<HashMap<&'static str, Vec<Signal>>> = Lazy::new(|| {
    let composed = |parts: &[&[(&'static str, u32)]]| -> Vec<Signal> {
        parts.iter().flat_map(|rows| table(rows)).collect()
    };

    let mut tables = HashMap::new();
    tables.insert("javascript", composed(&[JS_ROWS]));
    tables.insert("typescript", composed(&[TS_ROWS, JS_ROWS]));
    tables.insert("react", composed(&[REACT_ROWS, TS_ROWS, JS_ROWS]));
    tables.insert("vue", composed(&[VUE_ROWS, JS_ROWS]));
    tables.insert("python", composed(&[PYTHON_ROWS]));
    tables.insert("rust", composed(&[RUST_ROWS]));
    tables.insert("go", composed(&[GO_ROWS]));
    tables.insert("java", composed(&[JAVA_ROWS]));
    tables.insert("kotlin", composed(&[KOTLIN_ROWS]));
    tables.insert("csharp", composed(&[CSHARP_ROWS]));
    tables.insert("c", composed(&[C_FAMILY_ROWS]));
    tables.insert("cpp", composed(&[C_FAMILY_ROWS]));
    tables.insert("ruby", composed(&[RUBY_ROWS]));
    tables.insert("php", composed(&[PHP_ROWS]));
    tables.insert("swift", composed(&[SWIFT_ROWS]));
    tables.insert("shell", composed(&[SHELL_ROWS]));
    tables.insert("css", composed(&[CSS_ROWS]));
    tables.insert("scss", composed(&[SCSS_ROWS, CSS_ROWS]));
    tables.insert("html", composed(&[HTML_ROWS]));
    tables.insert("sql", composed(&[SQL_ROWS]));
    tables.insert("yaml", composed(&[YAML_ROWS]));
    tables.insert("json", composed(&[JSON_ROWS]));
    tables.insert("markdown", composed(&[MARKDOWN_ROWS]));
    tables
});

/// Whether `language` has a dedicated scoring table.
pub fn has_table(language: &LanguageTag) -> bool {
    TABLES.contains_key(language.as_str())
}

/// Score a single line for the given language.
///
/// Pure: identical inputs always produce identical scores.
pub fn score_line(line: &str, language: &LanguageTag) -> u32 {
    let specific = TABLES
        .get(language.as_str())
        .map(Vec::as_slice)
        .unwrap_or(GENERIC.as_slice());

    specific
        .iter()
        .chain(UNIVERSAL.iter())
        .map(|signal| signal.weight_for(line))
        .sum()
}

/// Score `lines`, recording each line's index offset by `first_index`.
pub fn score_lines<'a>(
    lines: &[&'a str],
    first_index: usize,
    language: &LanguageTag,
) -> Vec<ScoredLine<'a>> {
    lines
        .iter()
        .enumerate()
        .map(|(offset, &text)| ScoredLine {
            text,
            original_index: first_index + offset,
            score: score_line(text, language),
        })
        .collect()
}
