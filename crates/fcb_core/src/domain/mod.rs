pub const SIMPLE_VERDICT_ASSUMPTIONS: &str = "No assumptions extracted for simple verdict.";
pub const SIMPLE_VERDICT_EVIDENCE: &str = "No evidence gathered for simple verdict.";

/// Outcome of one pipeline run for one claim.
///
/// Notes:
/// - `assumption_verdicts` is parallel to `assumptions` unless the run short-circuited, in which
///   case it holds the single [`SIMPLE_VERDICT_ASSUMPTIONS`] sentinel.
/// - `gathered_evidence` only has entries for assumptions whose verdict triggered a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCheckResult {
    pub claim: String,
    pub claim_type: String,
    pub initial_response: String,
    pub assumptions: Vec<String>,
    pub assumption_verdicts: Vec<String>,
    pub gathered_evidence: Vec<String>,
    pub final_answer: String,
}

impl FactCheckResult {
    /// True when the run skipped assumption extraction because the initial
    /// response was a bare true/false.
    pub fn is_simple_verdict(&self) -> bool {
        self.assumptions.is_empty()
            && self.assumption_verdicts.len() == 1
            && self.assumption_verdicts[0] == SIMPLE_VERDICT_ASSUMPTIONS
    }
}

/// A persisted [`FactCheckResult`] with its row id and creation time (RFC3339 UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFactCheck {
    pub id: i64,
    pub result: FactCheckResult,
    pub created_at: String,
}
