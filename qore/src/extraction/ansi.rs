//! ANSI escape stripping and line normalization.

use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            // OSC, terminated by BEL or ST
            r"\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)",
            // CSI, 7-bit and 8-bit introducers
            r"|(?:\x1b\[|\x{9b})[0-?]*[ -/]*[@-~]",
            // nF, Fp, Fe and Fs escapes
            r"|\x1b[ -/]*[0-~]",
        ))
        .expect("Invalid regex for ANSI escapes")
    })
}

/// Removes ANSI/VT escape sequences.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    escape_pattern().replace_all(text, "").into_owned()
}

/// Strips escapes, splits into lines, trims each line and drops blanks.
#[must_use]
pub fn normalize_lines(text: &str) -> Vec<String> {
    strip_ansi(text)
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
