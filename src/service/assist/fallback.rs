//! Static fallback tables
//!
//! Pre-authored responses served whenever the model is unavailable or its
//! output is too thin. Loaded once, never mutated per request.

use crate::model::Severity;

/// Severity served when no model output is available
pub const DEFAULT_SEVERITY: Severity = Severity::Medium;

/// Tags served when no vocabulary term matches or no model is available
pub const DEFAULT_TAGS: &[&str] = &["investigation"];

/// Default next investigation steps for a case
pub const DEFAULT_NEXT_STEPS: &[&str] = &[
    "Collect additional evidence from affected systems",
    "Analyze network logs for suspicious activity",
    "Document findings in investigation report",
    "Implement containment measures if needed",
    "Verify system integrity and security posture",
];

/// Default recommendations when event history cannot be analyzed
pub const DEFAULT_RECOMMENDATIONS: &[&str] = &[
    "Review the case timeline for gaps in evidence coverage",
    "Cross-reference extracted indicators against threat intelligence feeds",
    "Validate chain of custody records for all collected evidence",
    "Schedule a case review with the assigned investigation team",
    "Prepare an interim status summary for stakeholders",
];

/// Default word continuations offered while typing
pub const DEFAULT_WORD_SUGGESTIONS: &[&str] =
    &["analysis", "evidence", "investigation", "timeline", "report"];

/// Topic-bucketed completion suggestions, matched against the input text
///
/// First bucket whose keyword list hits wins; the last bucket is the
/// incident-response default.
const SUGGESTION_BUCKETS: &[(&[&str], &[&str])] = &[
    (
        &["malware", "virus", "trojan", "ransomware"],
        &[
            "Submit the sample to sandbox analysis",
            "Extract and document file hashes for the binary",
            "Search other endpoints for the same artifact",
            "Review persistence mechanisms on the infected host",
            "Quarantine the affected system pending analysis",
        ],
    ),
    (
        &["network", "traffic", "connection", "firewall"],
        &[
            "Capture and review packet data for the affected segment",
            "Check firewall logs for blocked and allowed connections",
            "Identify external hosts contacted during the incident window",
            "Review DNS queries for suspicious domains",
            "Correlate NetFlow records with the event timeline",
        ],
    ),
    (
        &["disk", "file", "registry", "filesystem"],
        &[
            "Create a forensic image before further examination",
            "Review file system timestamps around the incident window",
            "Examine registry hives for persistence entries",
            "Recover deleted files from unallocated space",
            "Document the disk acquisition in the chain of custody log",
        ],
    ),
];

/// Incident-response suggestions used when no topic bucket matches
const GENERAL_SUGGESTIONS: &[&str] = &[
    "Document the event with timestamps and affected assets",
    "Identify the scope of affected systems and accounts",
    "Preserve volatile evidence before remediation",
    "Notify the incident response lead of new findings",
    "Update the case timeline with this event",
];

/// Keyword sets and template pools for sentence completion, in the fixed
/// order pools are concatenated when several categories match.
const TEAMWORK_KEYWORDS: &[&str] = &["team", "assign", "collaborat", "member", "meeting"];
const ADMIN_KEYWORDS: &[&str] = &["admin", "permission", "access", "account", "password"];
const EVIDENCE_KEYWORDS: &[&str] = &["evidence", "artifact", "file", "log", "hash"];

const TEAMWORK_COMPLETIONS: &[&str] = &[
    "was assigned to the investigation team for follow-up.",
    "will be reviewed at the next case coordination meeting.",
    "requires input from the forensic analysis team.",
    "has been escalated to the case lead for assignment.",
];

const ADMIN_COMPLETIONS: &[&str] = &[
    "was performed using a privileged administrator account.",
    "requires a review of access permissions for the affected account.",
    "indicates unauthorized use of administrative credentials.",
    "should be verified against the access control audit log.",
];

const EVIDENCE_COMPLETIONS: &[&str] = &[
    "was preserved following chain of custody procedures.",
    "has been logged as evidence under the current case.",
    "matches an artifact recovered from the affected system.",
    "will be submitted for forensic examination.",
];

const GENERAL_COMPLETIONS: &[&str] = &[
    "was documented in the investigation timeline.",
    "requires further analysis before conclusions can be drawn.",
    "is consistent with the observed attack pattern.",
    "was reported to the incident response team.",
];

/// Topic-bucketed completion suggestions for partial event descriptions
pub fn completion_suggestions(input_text: &str) -> Vec<String> {
    let lowered = input_text.to_lowercase();

    for (keywords, pool) in SUGGESTION_BUCKETS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return pool.iter().map(|s| s.to_string()).collect();
        }
    }

    GENERAL_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Keyword-bucketed sentence completions
///
/// Every matching category contributes its pool, in declaration order
/// (teamwork, admin, evidence); no match falls back to general + evidence.
/// The result is deduplicated preserving first occurrence and truncated.
pub fn sentence_completions(input_text: &str, max: usize) -> Vec<String> {
    let lowered = input_text.to_lowercase();
    let mut pool: Vec<&str> = Vec::new();

    let categories: &[(&[&str], &[&str])] = &[
        (TEAMWORK_KEYWORDS, TEAMWORK_COMPLETIONS),
        (ADMIN_KEYWORDS, ADMIN_COMPLETIONS),
        (EVIDENCE_KEYWORDS, EVIDENCE_COMPLETIONS),
    ];

    for (keywords, completions) in categories {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            pool.extend_from_slice(completions);
        }
    }

    if pool.is_empty() {
        pool.extend_from_slice(GENERAL_COMPLETIONS);
        pool.extend_from_slice(EVIDENCE_COMPLETIONS);
    }

    let mut seen = std::collections::HashSet::new();
    pool.into_iter()
        .filter(|completion| seen.insert(*completion))
        .take(max)
        .map(|completion| completion.to_string())
        .collect()
}

/// Word continuations served when the model yields nothing usable
pub fn word_suggestions(max: usize) -> Vec<String> {
    DEFAULT_WORD_SUGGESTIONS
        .iter()
        .take(max)
        .map(|s| s.to_string())
        .collect()
}

/// Default next steps for a case
pub fn next_steps() -> Vec<String> {
    DEFAULT_NEXT_STEPS.iter().map(|s| s.to_string()).collect()
}

/// Default recommendations for an event history
pub fn recommendations() -> Vec<String> {
    DEFAULT_RECOMMENDATIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Default tag set
pub fn tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_are_non_empty() {
        assert!(!DEFAULT_TAGS.is_empty());
        assert!(!DEFAULT_NEXT_STEPS.is_empty());
        assert!(!DEFAULT_RECOMMENDATIONS.is_empty());
        assert!(!DEFAULT_WORD_SUGGESTIONS.is_empty());
        assert!(!completion_suggestions("anything").is_empty());
        assert!(!sentence_completions("anything", 5).is_empty());
    }

    #[test]
    fn suggestion_bucket_matches_malware_keywords() {
        let suggestions = completion_suggestions("Found ransomware on the host");
        assert!(suggestions[0].contains("sandbox"));
    }

    #[test]
    fn suggestion_bucket_defaults_to_general() {
        let suggestions = completion_suggestions("something unusual happened");
        assert_eq!(suggestions.len(), GENERAL_SUGGESTIONS.len());
    }

    #[test]
    fn sentence_pools_union_admin_and_evidence() {
        let result = sentence_completions("admin account accessed evidence files", 20);
        // Both matched pools, admin first, deduplicated
        assert_eq!(
            result.len(),
            ADMIN_COMPLETIONS.len() + EVIDENCE_COMPLETIONS.len()
        );
        assert_eq!(result[0], ADMIN_COMPLETIONS[0]);
        assert_eq!(result[ADMIN_COMPLETIONS.len()], EVIDENCE_COMPLETIONS[0]);
    }

    #[test]
    fn sentence_pools_default_to_general_plus_evidence() {
        let result = sentence_completions("the weather was calm", 20);
        assert_eq!(
            result.len(),
            GENERAL_COMPLETIONS.len() + EVIDENCE_COMPLETIONS.len()
        );
        assert_eq!(result[0], GENERAL_COMPLETIONS[0]);
    }

    #[test]
    fn sentence_completions_truncate_to_max() {
        assert_eq!(sentence_completions("evidence log", 2).len(), 2);
    }
}
