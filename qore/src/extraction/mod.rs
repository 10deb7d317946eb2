//! Answer extraction from noisy agent output.
//!
//! Agent runs produce text interleaved with colored framework logs. The
//! [`ExtractionEngine`] reduces such a blob to the single most likely
//! answer using a fixed sequence of tiers; the first tier that matches
//! wins:
//!
//! 1. ANSI stripping and line normalization (always applied)
//! 2. bullet lines (`•`, `- `, `* `), joined with newlines
//! 3. everything after the first `Agent Output:` / `Final Answer:` line
//! 4. the first line free of framework noise keywords
//! 5. the last line, or the empty string
//!
//! This is a heuristic. Tiers 4 and 5 can land on the wrong line and
//! nothing signals that; [`Extraction::tier`] is the only hint callers get.

mod ansi;
#[cfg(test)]
mod engine_tests;

pub use ansi::{normalize_lines, strip_ansi};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyphs that open a bullet line on their own.
pub const BULLET_GLYPHS: &[char] = &['•', '●', '◦', '▪', '‣'];

/// ASCII prefixes that open a bullet line.
pub const BULLET_PREFIXES: &[&str] = &["- ", "* "];

/// Lines containing one of these start the answer block.
pub const ANSWER_MARKERS: &[&str] = &["Agent Output:", "Final Answer:"];

/// Substrings that identify framework banner and log lines.
pub const NOISE_KEYWORDS: &[&str] = &["Crew", "ID:", "Name:", "Execution", "Started", "Completed"];

/// The tier that produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTier {
    /// Bullet lines were found.
    Bullets,
    /// An answer marker was found.
    Marker,
    /// The first non-noise line was used.
    FirstContent,
    /// Every line looked like noise; the last line was used.
    LastLine,
    /// There was nothing to extract.
    Empty,
}

impl fmt::Display for ExtractionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullets => write!(f, "bullets"),
            Self::Marker => write!(f, "marker"),
            Self::FirstContent => write!(f, "first_content"),
            Self::LastLine => write!(f, "last_line"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// An extracted answer and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// The cleaned answer.
    pub answer: String,
    /// Which tier matched.
    pub tier: ExtractionTier,
}

impl Extraction {
    fn new(answer: impl Into<String>, tier: ExtractionTier) -> Self {
        Self {
            answer: answer.into(),
            tier,
        }
    }

    /// Returns true if the answer came from a structural match
    /// (bullets or a marker) rather than a fallback.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self.tier, ExtractionTier::Bullets | ExtractionTier::Marker)
    }
}

/// Tiered extractor over raw agent output.
///
/// Total and deterministic: every input yields a string, possibly empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionEngine;

impl ExtractionEngine {
    /// Creates a new engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the answer from `raw`.
    #[must_use]
    pub fn extract(&self, raw: &str) -> String {
        self.extract_detailed(raw).answer
    }

    /// Extracts the answer from `raw` along with the tier that matched.
    #[must_use]
    pub fn extract_detailed(&self, raw: &str) -> Extraction {
        let lines = normalize_lines(raw);

        let bullets: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|line| is_bullet(line))
            .collect();
        if !bullets.is_empty() {
            return Extraction::new(bullets.join("\n"), ExtractionTier::Bullets);
        }

        if let Some(pos) = lines.iter().position(|line| is_marker(line)) {
            return Extraction::new(lines[pos + 1..].join("\n"), ExtractionTier::Marker);
        }

        if let Some(line) = lines.iter().find(|line| !is_noise(line)) {
            return Extraction::new(line.clone(), ExtractionTier::FirstContent);
        }

        match lines.last() {
            Some(line) => Extraction::new(line.clone(), ExtractionTier::LastLine),
            None => Extraction::new(String::new(), ExtractionTier::Empty),
        }
    }
}

/// Extracts the answer from `raw` with the default engine.
#[must_use]
pub fn extract(raw: &str) -> String {
    ExtractionEngine::new().extract(raw)
}

fn is_bullet(line: &str) -> bool {
    line.starts_with(BULLET_GLYPHS) || BULLET_PREFIXES.iter().any(|p| line.starts_with(p))
}

fn is_marker(line: &str) -> bool {
    ANSWER_MARKERS.iter().any(|m| line.contains(m))
}

fn is_noise(line: &str) -> bool {
    NOISE_KEYWORDS.iter().any(|k| line.contains(k))
}
