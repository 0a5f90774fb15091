//! Formatted-address cleanup.
//!
//! Last-resort text normalizer used when a candidate carries no usable
//! structured component. Rules run in order; the whole pass repeats until the
//! text stops changing, so cleaning an already clean string is a no-op.

use regex::Regex;
use std::sync::LazyLock;

/// A single pattern → replacement rewrite.
struct CleanupRule {
    name: &'static str,
    regex: Regex,
    replacement: &'static str,
}

impl CleanupRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.regex.replace_all(text, self.replacement).into_owned()
    }
}

static RULES: LazyLock<Vec<CleanupRule>> = LazyLock::new(|| {
    vec![
        // "652 24", "10115", "1011AB"
        CleanupRule::new("postal_code", r"(?i)\b\d{3,6}\s?\d{0,3}[A-Z]{0,2}\b", ""),
        // "Storgatan 14, " / "Kungsvägen 3B, "
        CleanupRule::new("street_prefix", r"^[^,]+\s+\d+[A-Za-z]?\s*,\s*", ""),
        CleanupRule::new(
            "road_word",
            r"(?i)^(?:road|street|avenue|väg|gata|unnamed\s+\w+)\s*,\s*",
            "",
        ),
        CleanupRule::new("double_comma", r",\s*,", ","),
        CleanupRule::new("space_before_comma", r"\s+,", ","),
        CleanupRule::new("trailing_comma", r",\s*$", ""),
    ]
});

fn cleanup_pass(text: &str) -> String {
    let cleaned = RULES
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc));
    cleaned.trim().to_string()
}

/// Strip postal codes, street prefixes and generic road words from a
/// provider-formatted address, then tidy the commas.
pub fn clean_formatted_address(address: &str) -> String {
    // Every rewrite that changes the text also shortens it, so this terminates.
    let mut current = cleanup_pass(address);
    loop {
        let next = cleanup_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
