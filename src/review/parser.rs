//! Turns free-form model output into a list of suggestions.
//!
//! Two strategies, tried in order:
//!
//! 1. **Marker grammar**: lines that start with a bullet (`-`, `*`, `•`),
//!    a number (`1.` or `1)`), or an advisory verb ("Consider", "Avoid", ...),
//!    plus any line that says something "should" change or is "recommended"
//! 2. **Fallback**: the first few non-empty lines as-is, for models that
//!    ignore the requested format. A non-empty reply never parses to an
//!    empty list.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lines kept by the fallback strategy.
pub const FALLBACK_LINES: usize = 5;

static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*•]|\d{1,3}[.)])\s+(.+)$").expect("bullet pattern must compile")
});

static ADVISORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:Consider|Avoid|Add|Remove|Replace|Refactor|Ensure|Extract|Rename|Move|Split|Handle|Validate|Check|Use|Prefer|Simplify|Document)\b.+$",
    )
    .expect("advisory pattern must compile")
});

static ADVICE_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:should|recommend(?:s|ed)?|consider)\b")
        .expect("advice word pattern must compile")
});

/// Which strategy produced the suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Markers,
    Fallback,
}

/// Parsed suggestions plus the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSuggestions {
    pub suggestions: Vec<String>,
    pub strategy: ParseStrategy,
}

/// Suggestion grammar with a raw-lines fallback.
#[derive(Debug, Clone)]
pub struct SuggestionParser {
    fallback_lines: usize,
}

impl Default for SuggestionParser {
    fn default() -> Self {
        Self {
            fallback_lines: FALLBACK_LINES,
        }
    }
}

impl SuggestionParser {
    pub fn new(fallback_lines: usize) -> Self {
        Self { fallback_lines }
    }

    /// Parse `response`. Never fails; only a blank response yields no
    /// suggestions.
    pub fn parse(&self, response: &str) -> ParsedSuggestions {
        let marked: Vec<String> = response.lines().filter_map(parse_marked_line).collect();

        if !marked.is_empty() {
            return ParsedSuggestions {
                suggestions: marked,
                strategy: ParseStrategy::Markers,
            };
        }

        let suggestions = response
            .lines()
            .map(clean)
            .filter(|line| !line.is_empty() && !is_fence(line))
            .take(self.fallback_lines)
            .collect();

        ParsedSuggestions {
            suggestions,
            strategy: ParseStrategy::Fallback,
        }
    }
}

fn parse_marked_line(line: &str) -> Option<String> {
    if let Some(caps) = BULLET.captures(line) {
        let text = clean(caps.get(1).map_or("", |m| m.as_str()));
        return (!text.is_empty()).then_some(text);
    }
    (ADVISORY.is_match(line) || ADVICE_WORD.is_match(line)).then(|| clean(line))
}

/// Trim and drop markdown emphasis around a suggestion.
fn clean(text: &str) -> String {
    text.trim().trim_matches(|c| c == '*' || c == '_').trim().to_string()
}

fn is_fence(line: &str) -> bool {
    line.starts_with("```")
}

/// Heuristic 1-10 quality score from the number of suggestions.
///
/// Fewer suggestions read as a healthier file. This is a display aid, not a
/// measurement.
pub fn quality_score(suggestion_count: usize) -> u8 {
    match suggestion_count {
        0 => 10,
        1..=2 => 8,
        3..=5 => 6,
        6..=9 => 4,
        _ => 2,
    }
}
