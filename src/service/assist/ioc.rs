//! IOC extraction from model output and raw event text
//!
//! Two paths: a JSON array embedded in generated text, then regex pattern
//! matching when no parseable array is present.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::model::{IocMatch, IocType};

/// Combined extraction never returns more than this many indicators
const MAX_IOCS: usize = 10;

static IP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}\b",
    )
    .unwrap()
});

// MD5, SHA1, SHA256 digest lengths only
static HASH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[a-fA-F0-9]{64}|[a-fA-F0-9]{40}|[a-fA-F0-9]{32})\b").unwrap()
});

/// Item shape expected inside an embedded JSON array
#[derive(Debug, Deserialize)]
struct EmbeddedIoc {
    #[serde(rename = "type")]
    ioc_type: String,
    value: String,
    confidence: Option<f64>,
}

/// Extract indicators from generated text
///
/// Tries the embedded-JSON path first; malformed or missing JSON degrades
/// to pattern matching over the same text.
pub fn extract(text: &str) -> Vec<IocMatch> {
    match extract_from_json(text) {
        Some(iocs) if !iocs.is_empty() => iocs,
        _ => extract_with_patterns(text),
    }
}

/// Parse a JSON array found between the first `[` and the last `]`
pub fn extract_from_json(text: &str) -> Option<Vec<IocMatch>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }

    let fragment = &text[start..=end];
    let items: Vec<EmbeddedIoc> = match serde_json::from_str(fragment) {
        Ok(items) => items,
        Err(e) => {
            tracing::debug!(error = %e, "Embedded IOC JSON unparseable, using pattern matching");
            return None;
        }
    };

    let iocs: Vec<IocMatch> = items
        .into_iter()
        .filter_map(|item| {
            let ioc_type = match item.ioc_type.as_str() {
                "ip" => IocType::Ip,
                "domain" => IocType::Domain,
                "hash" => IocType::Hash,
                other => {
                    tracing::debug!(ioc_type = other, "Skipping unknown IOC type");
                    return None;
                }
            };
            Some(IocMatch {
                ioc_type,
                value: item.value,
                confidence: item.confidence.unwrap_or(ioc_type.base_confidence()),
            })
        })
        .take(MAX_IOCS)
        .collect();

    Some(dedupe(iocs))
}

/// Regex pattern matching: all IPs, then domains, then hashes, each with a
/// fixed per-type confidence, deduplicated and truncated to 10.
pub fn extract_with_patterns(text: &str) -> Vec<IocMatch> {
    let mut iocs = Vec::new();

    for m in IP_RE.find_iter(text) {
        iocs.push(IocMatch::new(IocType::Ip, m.as_str()));
    }
    for m in DOMAIN_RE.find_iter(text) {
        iocs.push(IocMatch::new(IocType::Domain, m.as_str()));
    }
    for m in HASH_RE.find_iter(text) {
        iocs.push(IocMatch::new(IocType::Hash, m.as_str()));
    }

    let mut deduped = dedupe(iocs);
    deduped.truncate(MAX_IOCS);
    deduped
}

fn dedupe(iocs: Vec<IocMatch>) -> Vec<IocMatch> {
    let mut seen = std::collections::HashSet::new();
    iocs.into_iter()
        .filter(|ioc| seen.insert((ioc.ioc_type, ioc.value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_path_finds_ip_and_hash_with_fixed_confidences() {
        let iocs =
            extract_with_patterns("Contact 10.0.0.5 and check hash d41d8cd98f00b204e9800998ecf8427e");

        let ip = iocs.iter().find(|i| i.ioc_type == IocType::Ip).unwrap();
        assert_eq!(ip.value, "10.0.0.5");
        assert_eq!(ip.confidence, 0.7);

        let hash = iocs.iter().find(|i| i.ioc_type == IocType::Hash).unwrap();
        assert_eq!(hash.value, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash.confidence, 0.8);
    }

    #[test]
    fn pattern_path_orders_ips_before_domains_before_hashes() {
        let iocs = extract_with_patterns(
            "hash aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa then evil.example.org then 192.168.1.10",
        );
        assert_eq!(iocs[0].ioc_type, IocType::Ip);
        assert_eq!(iocs[1].ioc_type, IocType::Domain);
        assert_eq!(iocs[2].ioc_type, IocType::Hash);
    }

    #[test]
    fn pattern_path_caps_at_ten() {
        let text = (1..=14)
            .map(|i| format!("10.0.0.{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(extract_with_patterns(&text).len(), 10);
    }

    #[test]
    fn pattern_path_dedupes_repeated_values() {
        let iocs = extract_with_patterns("10.0.0.5 seen again at 10.0.0.5");
        assert_eq!(iocs.len(), 1);
    }

    #[test]
    fn json_path_parses_embedded_array() {
        let text = r#"Here are the indicators: [{"type": "ip", "value": "1.2.3.4", "confidence": 0.9}, {"type": "hash", "value": "d41d8cd98f00b204e9800998ecf8427e"}] end"#;
        let iocs = extract(text);
        assert_eq!(iocs.len(), 2);
        assert_eq!(iocs[0].confidence, 0.9);
        assert_eq!(iocs[1].confidence, 0.8);
    }

    #[test]
    fn malformed_json_degrades_to_patterns() {
        let text = "[not json at all] but 8.8.4.4 is here";
        let iocs = extract(text);
        assert_eq!(iocs.len(), 1);
        assert_eq!(iocs[0].ioc_type, IocType::Ip);
        assert_eq!(iocs[0].value, "8.8.4.4");
    }

    #[test]
    fn unknown_types_in_json_are_skipped() {
        let text = r#"[{"type": "email", "value": "a@b.com"}, {"type": "domain", "value": "c2.example.net"}]"#;
        let iocs = extract(text);
        assert_eq!(iocs.len(), 1);
        assert_eq!(iocs[0].ioc_type, IocType::Domain);
    }
}
