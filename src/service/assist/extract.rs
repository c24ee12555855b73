//! Extraction of structured fields from generated text
//!
//! These are deterministic substring and line heuristics. They do not
//! understand negation: "not critical" still classifies as critical.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Severity;

/// Domain tag vocabulary, in declaration order. Matches are returned in this
/// order regardless of where they appear in the text.
pub const TAG_VOCABULARY: &[&str] = &[
    "malware",
    "network",
    "forensics",
    "analysis",
    "incident",
    "response",
    "phishing",
    "ioc",
    "investigation",
    "security",
    "breach",
    "compromise",
];

/// Maximum number of tags returned per extraction
const MAX_TAGS: usize = 3;

/// Maximum number of suggestion lines returned per extraction
const MAX_SUGGESTION_LINES: usize = 5;

/// A suggestion line must be longer than this once trimmed
const MIN_LINE_CHARS: usize = 10;

/// Fewer qualifying lines than this means the output is unusable
const MIN_QUALIFYING_LINES: usize = 2;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Outcome of an extraction step
///
/// `Insufficient` is distinct from an adapter error: the model answered, but
/// the answer did not contain enough usable structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    Extracted(T),
    Insufficient,
}

impl<T> Extraction<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Extraction::Extracted(value) => Some(value),
            Extraction::Insufficient => None,
        }
    }
}

/// Collapse runs of whitespace so prompts stay single-line friendly
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").to_string()
}

/// Strip an echoed prompt from the front of a generated candidate
///
/// Causal models frequently return prompt + continuation as one string.
pub fn strip_prompt_echo<'a>(candidate: &'a str, prompt: &str) -> &'a str {
    candidate.strip_prefix(prompt).unwrap_or(candidate)
}

/// Scan generated text for a severity keyword
///
/// Levels are checked in priority order (critical, high, medium, low) and
/// the first literal substring hit wins; `medium` when none match.
pub fn severity(text: &str) -> Severity {
    let lowered = text.to_lowercase();

    for level in Severity::DETECTION_ORDER {
        if lowered.contains(level.as_str()) {
            return *level;
        }
    }

    Severity::Medium
}

/// Collect up to 3 vocabulary tags appearing in the text
///
/// Returned in vocabulary-declaration order, not input order.
pub fn tags(text: &str) -> Extraction<Vec<String>> {
    let lowered = text.to_lowercase();

    let matched: Vec<String> = TAG_VOCABULARY
        .iter()
        .filter(|tag| lowered.contains(*tag))
        .take(MAX_TAGS)
        .map(|tag| tag.to_string())
        .collect();

    if matched.is_empty() {
        Extraction::Insufficient
    } else {
        Extraction::Extracted(matched)
    }
}

/// Collect suggestion lines from generated text
///
/// Keeps trimmed lines longer than 10 characters, up to 5, in original
/// order. Fewer than 2 qualifying lines is not an empty result, it is a
/// signal that the output is too thin to use.
pub fn suggestions(text: &str) -> Extraction<Vec<String>> {
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*']).trim())
        .filter(|line| line.chars().count() > MIN_LINE_CHARS)
        .take(MAX_SUGGESTION_LINES)
        .map(|line| line.to_string())
        .collect();

    if lines.len() < MIN_QUALIFYING_LINES {
        Extraction::Insufficient
    } else {
        Extraction::Extracted(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_picks_highest_priority_match() {
        assert_eq!(severity("a low impact but high risk event"), Severity::High);
        assert_eq!(
            severity("Critical breach with medium follow-up"),
            Severity::Critical
        );
    }

    #[test]
    fn severity_ignores_negation() {
        // Known heuristic limitation: substring match only
        assert_eq!(severity("this is not critical"), Severity::Critical);
    }

    #[test]
    fn severity_defaults_to_medium() {
        assert_eq!(severity("nothing of note here"), Severity::Medium);
    }

    #[test]
    fn tags_follow_vocabulary_order_and_cap() {
        let text = "The compromise involved phishing over the network after malware dropped";
        let result = tags(text).into_option().unwrap();
        // Vocabulary order: malware, network, phishing win over later matches
        assert_eq!(result, vec!["malware", "network", "phishing"]);
        assert!(result.len() <= 3);
    }

    #[test]
    fn tags_insufficient_when_no_vocabulary_term_matches() {
        assert_eq!(tags("a quiet afternoon"), Extraction::Insufficient);
    }

    #[test]
    fn suggestions_filters_short_lines_and_caps_at_five() {
        let text = "short\n- Review the firewall logs for anomalies\n- Image the affected workstation drive\n- Interview the system administrator\n- Check DNS query history for beacons\n- Preserve volatile memory immediately\n- Escalate to legal counsel as needed";
        let result = suggestions(text).into_option().unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(result[0], "Review the firewall logs for anomalies");
    }

    #[test]
    fn suggestions_insufficient_below_two_lines() {
        assert_eq!(
            suggestions("- Only one usable suggestion line here\nno"),
            Extraction::Insufficient
        );
        assert_eq!(suggestions(""), Extraction::Insufficient);
    }

    #[test]
    fn strips_echoed_prompt() {
        assert_eq!(
            strip_prompt_echo("The attacker used a dropper", "The attacker"),
            " used a dropper"
        );
        assert_eq!(strip_prompt_echo("fresh text", "unrelated"), "fresh text");
    }

    #[test]
    fn normalizes_whitespace_runs() {
        assert_eq!(normalize_whitespace("  a\n\tb   c "), "a b c");
    }
}
