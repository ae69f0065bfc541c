//! Header/footer preserving, importance-sampled compression.
//!
//! Content at or below the configured threshold passes through untouched.
//! Above it, the first and last lines are kept verbatim and a fraction of
//! the middle is kept by descending importance, then restored to reading
//! order between two marker lines:
//!
//! ```text
//! <header lines>
//! ...compressed section...
//! <selected middle lines, original order>
//! ...end of file...
//! <footer lines>
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::language::{self, LanguageTag};
use super::scorer::{score_lines, ScoredLine};

/// Marker emitted before the sampled middle section.
pub const COMPRESSED_SECTION_MARKER: &str = "...compressed section...";

/// Marker emitted after the sampled middle section.
pub const END_OF_FILE_MARKER: &str = "...end of file...";

/// Compression settings.
///
/// `sample_rate` must lie in `(0, 1]`; see [`CompressionConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Content longer than this many characters is compressed
    pub max_content_length: usize,
    /// Lines always kept from the start of the file
    pub header_lines: usize,
    /// Lines always kept from the end of the file
    pub footer_lines: usize,
    /// Fraction of middle lines to keep
    pub sample_rate: f64,
    /// Prepend a human-readable statistics block
    pub include_stats: bool,
    /// Language hint, or "auto" to detect
    pub language: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_content_length: 20_000,
            header_lines: 30,
            footer_lines: 20,
            sample_rate: 0.2,
            include_stats: false,
            language: language::AUTO.to_string(),
        }
    }
}

impl CompressionConfig {
    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.sample_rate > 0.0 && self.sample_rate <= 1.0) {
            return Err(format!(
                "compression.sample_rate {} must be in (0, 1]",
                self.sample_rate
            ));
        }
        if self.language.trim().is_empty() {
            return Err("compression.language must not be empty (use \"auto\")".to_string());
        }
        Ok(())
    }

    /// Copy of this config with a different language hint.
    pub fn with_language(&self, language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..self.clone()
        }
    }
}

/// Statistics for a single compression call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionStats {
    /// Input size in characters
    pub original_size: usize,
    /// Output size in characters
    pub compressed_size: usize,
    /// compressed_size / original_size
    pub compression_ratio: f64,
    /// Lines in the input
    pub total_lines: usize,
    /// Input lines present in the output (header, sampled middle, footer)
    pub kept_lines: usize,
    /// kept_lines / total_lines
    pub line_retention_rate: f64,
    /// Lines in the output, including markers and the statistics block
    pub output_lines: usize,
}

impl CompressionStats {
    fn new(original: &str, compressed: &str, total_lines: usize, kept_lines: usize) -> Self {
        let original_size = original.chars().count();
        let compressed_size = compressed.chars().count();
        Self {
            original_size,
            compressed_size,
            compression_ratio: ratio(compressed_size, original_size),
            total_lines,
            kept_lines,
            line_retention_rate: ratio(kept_lines, total_lines),
            output_lines: compressed.lines().count(),
        }
    }

    /// Whether any input line was dropped.
    pub fn dropped_lines(&self) -> bool {
        self.kept_lines < self.total_lines
    }

    /// Percentage of the original size removed.
    pub fn reduction_percentage(&self) -> f64 {
        (1.0 - self.compression_ratio) * 100.0
    }
}

/// Ratio that treats an empty denominator as "nothing changed".
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        1.0
    } else {
        part as f64 / whole as f64
    }
}

/// Output of [`compress`].
#[derive(Debug, Clone)]
pub struct CompressedContent {
    pub text: String,
    pub stats: CompressionStats,
    /// Language used for scoring (detected or hinted)
    pub language: LanguageTag,
    /// Whether the content was actually reduced
    pub compressed: bool,
}

/// Effective header and footer sizes for a file of `total_lines`.
///
/// Each is capped at a third of the file so that together they never exceed
/// two thirds of it, leaving room for a middle sample.
pub fn effective_bounds(config: &CompressionConfig, total_lines: usize) -> (usize, usize) {
    let third = total_lines / 3;
    (config.header_lines.min(third), config.footer_lines.min(third))
}

/// Number of middle lines kept for a middle section of `middle_lines`.
pub fn sample_size(middle_lines: usize, sample_rate: f64) -> usize {
    let wanted = (middle_lines as f64 * sample_rate).ceil();
    if wanted <= 0.0 {
        0
    } else {
        (wanted as usize).min(middle_lines)
    }
}

/// Compress `content` according to `config`.
///
/// Never fails. Content within the threshold is returned unchanged with a
/// ratio of 1.
pub fn compress(content: &str, config: &CompressionConfig) -> CompressedContent {
    let original_size = content.chars().count();
    let lines: Vec<&str> = content.lines().collect();
    let total_lines = lines.len();

    if original_size <= config.max_content_length {
        return CompressedContent {
            text: content.to_string(),
            stats: CompressionStats::new(content, content, total_lines, total_lines),
            language: language::detect(content, &config.language),
            compressed: false,
        };
    }

    let language = language::detect(content, &config.language);
    let (header_count, footer_count) = effective_bounds(config, total_lines);
    let middle_end = total_lines - footer_count;
    let middle = &lines[header_count..middle_end];

    let selected = select_middle(middle, header_count, config.sample_rate, &language);

    let mut body: Vec<&str> = Vec::with_capacity(header_count + selected.len() + footer_count + 2);
    body.extend_from_slice(&lines[..header_count]);
    body.push(COMPRESSED_SECTION_MARKER);
    body.extend(selected.iter().map(|line| line.text));
    body.push(END_OF_FILE_MARKER);
    body.extend_from_slice(&lines[middle_end..]);
    let body = body.join("\n");

    let text = if config.include_stats {
        let block = stats_block(&body, original_size, total_lines, &language);
        format!("{}\n{}", block, body)
    } else {
        body
    };

    let kept_lines = header_count + selected.len() + footer_count;
    let stats = CompressionStats::new(content, &text, total_lines, kept_lines);

    debug!(
        language = %language,
        total_lines,
        kept_lines,
        header = header_count,
        footer = footer_count,
        ratio = stats.compression_ratio,
        "compressed content"
    );

    CompressedContent {
        text,
        stats,
        language,
        compressed: true,
    }
}

/// Pick the highest-scoring middle lines and return them in source order.
///
/// Equal scores keep source order (stable sort), so earlier lines win ties.
fn select_middle<'a>(
    middle: &[&'a str],
    first_index: usize,
    sample_rate: f64,
    language: &LanguageTag,
) -> Vec<ScoredLine<'a>> {
    let keep = sample_size(middle.len(), sample_rate);
    if keep == 0 {
        return Vec::new();
    }

    let mut scored = score_lines(middle, first_index, language);
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(keep);
    scored.sort_by_key(|line| line.original_index);
    scored
}

fn stats_block(body: &str, original_size: usize, total_lines: usize, language: &LanguageTag) -> String {
    let percentage = ratio(body.chars().count(), original_size) * 100.0;
    format!(
        "=== File statistics ===\n\
         Total lines: {}\n\
         Original size: {} characters\n\
         Detected language: {}\n\
         Compressed to: {:.1}% of original size\n\
         =======================",
        total_lines, original_size, language, percentage
    )
}
