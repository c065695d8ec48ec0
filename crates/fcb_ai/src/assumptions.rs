//! Turning free-text model output into pipeline decisions.

use std::sync::OnceLock;

use regex::Regex;

const EVIDENCE_TRIGGERS: [&str; 3] = ["uncertain", "false", "true"];

fn bullet_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^- (.+)$").unwrap())
}

/// Parse extracted assumptions: one per `- ` bulleted line, in order.
/// `NONE` (any case, surrounding whitespace ignored) means no assumptions.
pub fn parse_assumptions(raw: &str) -> Vec<String> {
    if raw.trim().to_uppercase() == "NONE" {
        return Vec::new();
    }
    bullet_line()
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// A bare `true`/`false` initial response skips assumption work entirely.
pub fn is_simple_verdict(initial_response: &str) -> bool {
    matches!(
        initial_response.trim().to_lowercase().as_str(),
        "true" | "false"
    )
}

/// Whether a verdict should be backed by a web search.
///
/// Any verdict mentioning uncertain, false or true qualifies, which covers
/// nearly every verdict the model produces.
pub fn verdict_triggers_evidence(verdict: &str) -> bool {
    let lower = verdict.to_lowercase();
    EVIDENCE_TRIGGERS.iter().any(|t| lower.contains(t))
}
