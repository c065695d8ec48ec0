use std::fmt::Write as _;
use std::sync::OnceLock;

use fcb_core::domain::FactCheckResult;
use regex::Regex;

const LABEL_CLAIM_CHARS: usize = 50;

struct MarkdownPatterns {
    fenced: Regex,
    bold: Regex,
    italic: Regex,
    link: Regex,
}

fn patterns() -> &'static MarkdownPatterns {
    static PATTERNS: OnceLock<MarkdownPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkdownPatterns {
        fenced: Regex::new(r"```[^`]*```").expect("fenced code regex"),
        bold: Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("bold regex"),
        italic: Regex::new(r"\*([^*\n]+)\*|\b_([^_\n]+)_\b").expect("italic regex"),
        link: Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("link regex"),
    })
}

/// Reduce model output to plain terminal text: drops bold/italic markers and fenced code,
/// and keeps only the label of a link.
pub fn strip_markdown(text: &str) -> String {
    let p = patterns();
    let out = p.fenced.replace_all(text, "");
    let out = p.bold.replace_all(&out, "$1$2");
    let out = p.italic.replace_all(&out, "$1$2");
    let out = p.link.replace_all(&out, "$1");
    out.into_owned()
}

/// History entry label; `index` is zero-based, the label is one-based.
/// Claims longer than 50 characters are cut and marked with `...`.
pub fn history_label(index: usize, claim: &str) -> String {
    let claim = strip_markdown(claim);
    let mut head: String = claim.chars().take(LABEL_CLAIM_CHARS).collect();
    if claim.chars().count() > LABEL_CLAIM_CHARS {
        head.push_str("...");
    }
    format!("Claim {}: {}", index + 1, head)
}

pub fn render_history(results: &[FactCheckResult]) -> String {
    if results.is_empty() {
        return "No fact-checks yet.\n".to_string();
    }
    let mut out = String::new();
    for (i, r) in results.iter().enumerate() {
        let _ = writeln!(out, "{}", history_label(i, &r.claim));
    }
    out
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "## {title}");
    let _ = writeln!(out, "{}", strip_markdown(body).trim_end());
    out.push('\n');
}

fn list_section(out: &mut String, title: &str, items: &[String], empty: &str) {
    let _ = writeln!(out, "## {title}");
    if items.is_empty() {
        let _ = writeln!(out, "{empty}");
    }
    for item in items {
        let _ = writeln!(out, "- {}", strip_markdown(item).trim_end());
    }
    out.push('\n');
}

/// Full detail view of one fact-check.
pub fn render_detail(result: &FactCheckResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Claim: {}", result.claim);
    let _ = writeln!(out, "Claim type: {}", result.claim_type);
    out.push('\n');

    section(&mut out, "Initial assessment", &result.initial_response);
    if !result.is_simple_verdict() {
        list_section(&mut out, "Assumptions", &result.assumptions, "None identified.");
    }
    list_section(
        &mut out,
        "Verdicts",
        &result.assumption_verdicts,
        "No assumptions to verify.",
    );
    list_section(
        &mut out,
        "Evidence",
        &result.gathered_evidence,
        "No evidence gathered.",
    );
    section(&mut out, "Final answer", &result.final_answer);
    out
}
