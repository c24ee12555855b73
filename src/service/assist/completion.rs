//! Word and sentence completion shaping
//!
//! Turns raw model continuations into the short suggestion lists the editor
//! frontend consumes while an analyst is typing.

/// Longest cumulative word prefix offered as a suggestion
const MAX_PREFIX_WORDS: usize = 3;

/// Sentence candidates at or below this length are discarded
const MIN_SENTENCE_CHARS: usize = 3;

/// Isolate the actual completion from a model continuation
///
/// Causal models echo the prompt; when the continuation starts with the
/// original fragment only the remainder is the completion.
pub fn isolate_completion<'a>(continuation: &'a str, original: &str) -> &'a str {
    continuation.strip_prefix(original).unwrap_or(continuation)
}

/// Build word suggestions from a completion
///
/// Candidates are the cumulative prefixes of one, two, and three words,
/// with the single first word prepended when not already present, then
/// deduplicated in order and truncated to `max`.
pub fn word_suggestions(completion: &str, max: usize) -> Vec<String> {
    let words: Vec<&str> = completion.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<String> = (1..=words.len().min(MAX_PREFIX_WORDS))
        .map(|len| words[..len].join(" "))
        .collect();

    let first = words[0].to_string();
    if !candidates.contains(&first) {
        candidates.insert(0, first);
    }

    let mut suggestions = dedupe_preserving_order(candidates);
    suggestions.truncate(max);
    suggestions
}

/// Build sentence completions from model candidates
///
/// Each candidate is stripped of the original fragment, truncated at the
/// first sentence-terminating punctuation, discarded when trivially short,
/// deduplicated in order, and truncated to `max`.
pub fn sentence_completions(candidates: &[String], original: &str, max: usize) -> Vec<String> {
    let shaped: Vec<String> = candidates
        .iter()
        .map(|candidate| isolate_completion(candidate, original))
        .map(truncate_at_sentence_end)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .collect();

    let mut completions = dedupe_preserving_order(shaped);
    completions.truncate(max);
    completions
}

/// Cut a completion at the first `.`, `!` or `?`, keeping the terminator
fn truncate_at_sentence_end(completion: &str) -> String {
    let trimmed = completion.trim();
    match trimmed.find(['.', '!', '?']) {
        Some(idx) => trimmed[..=idx].trim().to_string(),
        None => trimmed.to_string(),
    }
}

fn dedupe_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_suggestions_builds_cumulative_prefixes() {
        let result = word_suggestions("foo bar baz", 3);
        assert_eq!(result, vec!["foo", "foo bar", "foo bar baz"]);
        assert_eq!(result[0], "foo");
    }

    #[test]
    fn word_suggestions_respects_max() {
        assert_eq!(word_suggestions("foo bar baz qux", 2), vec!["foo", "foo bar"]);
    }

    #[test]
    fn word_suggestions_empty_completion_yields_nothing() {
        assert!(word_suggestions("   ", 5).is_empty());
    }

    #[test]
    fn word_suggestions_single_word() {
        assert_eq!(word_suggestions("analysis", 5), vec!["analysis"]);
    }

    #[test]
    fn isolates_completion_behind_echoed_fragment() {
        assert_eq!(
            isolate_completion("The attacker moved laterally", "The attacker"),
            " moved laterally"
        );
        assert_eq!(isolate_completion("fresh output", "The attacker"), "fresh output");
    }

    #[test]
    fn sentence_completions_truncate_and_filter() {
        let candidates = vec![
            "was isolated from the network. Then more text".to_string(),
            "ok.".to_string(),
            "was isolated from the network. Different tail".to_string(),
            "requires further review!".to_string(),
        ];
        let result = sentence_completions(&candidates, "The host", 5);
        // Short candidate dropped, duplicate collapsed, terminators kept
        assert_eq!(
            result,
            vec![
                "was isolated from the network.",
                "requires further review!",
            ]
        );
    }

    #[test]
    fn sentence_completions_respect_max() {
        let candidates = vec![
            "first continuation sentence.".to_string(),
            "second continuation sentence.".to_string(),
        ];
        assert_eq!(sentence_completions(&candidates, "", 1).len(), 1);
    }
}
