use fcb_core::domain::{FactCheckResult, SIMPLE_VERDICT_ASSUMPTIONS, SIMPLE_VERDICT_EVIDENCE};
use fcb_core::error::AppError;
use fcb_core::settings::Settings;
use fcb_core::store::RecordStore;

use crate::assumptions::{is_simple_verdict, parse_assumptions, verdict_triggers_evidence};
use crate::chains::ResponseGenerator;
use crate::gemini::GeminiClient;
use crate::llm::gemini_llm::GeminiLlm;
use crate::llm::ModelConfig;
use crate::prompts::PromptTemplates;
use crate::retriever::EvidenceRetriever;

pub const EVIDENCE_RESULTS_PER_QUERY: usize = 10;

const SIMPLE_VERDICT_SYNTHESIS_ASSUMPTIONS: &str = "No assumptions to verify for simple verdict.";
const NO_ASSUMPTIONS: &str = "No assumptions to verify.";
const NO_EVIDENCE: &str = "No evidence gathered.";

/// Runs one claim through classification, assessment, assumption checks,
/// evidence gathering and synthesis, then hands the result to the store.
pub struct FactChecker {
    generator: ResponseGenerator,
    retriever: EvidenceRetriever,
    store: Box<dyn RecordStore>,
}

impl FactChecker {
    pub fn new(
        generator: ResponseGenerator,
        retriever: EvidenceRetriever,
        store: Box<dyn RecordStore>,
    ) -> Self {
        Self {
            generator,
            retriever,
            store,
        }
    }

    /// Wire up the Gemini model, the configured search backend and prompt templates.
    pub fn from_settings(settings: &Settings, store: Box<dyn RecordStore>) -> Result<Self, AppError> {
        let api_key = settings.gemini_api_key.as_deref().unwrap_or_default();
        let client = GeminiClient::new(&settings.gemini_base_url, api_key)?;
        let templates = match &settings.prompts_path {
            Some(path) => PromptTemplates::load(path)?,
            None => PromptTemplates::bundled()?,
        };
        let config = ModelConfig::from_settings(settings);

        let generator = ResponseGenerator::new(
            Box::new(GeminiLlm::new(client.clone())),
            templates,
            config.clone(),
        )?;
        let retriever = EvidenceRetriever::open(
            &settings.search_tool,
            Box::new(GeminiLlm::new(client)),
            config.for_summary(),
        )?;

        Ok(Self::new(generator, retriever, store))
    }

    pub fn retriever(&self) -> &EvidenceRetriever {
        &self.retriever
    }

    pub fn process_claim(&mut self, claim: &str) -> Result<FactCheckResult, AppError> {
        if claim.trim().is_empty() {
            return Err(AppError::new("PIPELINE_CLAIM_EMPTY", "Claim must not be empty"));
        }
        tracing::info!(claim, "processing claim");

        let claim_type = self.generator.classify_claim(claim)?;
        tracing::info!(claim_type = %claim_type, "claim classified");

        let initial_response = self.generator.initial_response(claim)?;
        tracing::debug!(initial_response = %initial_response, "initial response");

        let (assumptions, assumption_verdicts, gathered_evidence, final_answer) =
            if is_simple_verdict(&initial_response) {
                tracing::info!("simple verdict; skipping assumption extraction, verification and evidence gathering");
                let final_answer = self.generator.synthesize_final(
                    claim,
                    &initial_response,
                    SIMPLE_VERDICT_SYNTHESIS_ASSUMPTIONS,
                    SIMPLE_VERDICT_EVIDENCE,
                )?;
                (
                    Vec::new(),
                    vec![SIMPLE_VERDICT_ASSUMPTIONS.to_string()],
                    vec![SIMPLE_VERDICT_EVIDENCE.to_string()],
                    final_answer,
                )
            } else {
                let raw = self.generator.extract_assumptions(&initial_response)?;
                let assumptions = parse_assumptions(&raw);
                tracing::info!(count = assumptions.len(), "assumptions extracted");

                let (verdicts, evidence) = self.check_assumptions(&assumptions)?;
                let verdicts_text = if verdicts.is_empty() {
                    NO_ASSUMPTIONS.to_string()
                } else {
                    verdicts.join("\n")
                };
                let evidence_text = if evidence.is_empty() {
                    NO_EVIDENCE.to_string()
                } else {
                    evidence.join("\n")
                };
                let final_answer = self.generator.synthesize_final(
                    claim,
                    &initial_response,
                    &verdicts_text,
                    &evidence_text,
                )?;
                (assumptions, verdicts, evidence, final_answer)
            };
        tracing::info!(final_answer = %final_answer, "final answer");

        let result = FactCheckResult {
            claim: claim.to_string(),
            claim_type,
            initial_response,
            assumptions,
            assumption_verdicts,
            gathered_evidence,
            final_answer,
        };

        // The caller gets the result whether or not it was stored.
        if let Err(e) = self.store.save(&result) {
            tracing::error!(error = %e, "failed to persist fact-check result");
        }

        Ok(result)
    }

    /// Verify each assumption in order, gathering evidence where the verdict calls for it.
    fn check_assumptions(
        &mut self,
        assumptions: &[String],
    ) -> Result<(Vec<String>, Vec<String>), AppError> {
        let mut verdicts = Vec::with_capacity(assumptions.len());
        let mut evidence = Vec::new();

        for assumption in assumptions {
            let verdict = self.generator.verify_assumption(assumption)?;
            tracing::info!(assumption = %assumption, verdict = %verdict, "assumption verified");
            verdicts.push(format!("Assumption: {assumption} | Verdict: {verdict}"));

            if verdict_triggers_evidence(&verdict) {
                let text = self.gather_evidence(assumption)?;
                evidence.push(format!("Assumption: {assumption}\nEvidence: {text}"));
            }
        }

        Ok((verdicts, evidence))
    }

    fn gather_evidence(&mut self, assumption: &str) -> Result<String, AppError> {
        let query = format!("{assumption} fact check");
        let hits = self.retriever.search(&query, EVIDENCE_RESULTS_PER_QUERY);
        let rendered = self.retriever.process_results(&hits);
        let summary = self.retriever.summarize_results(&rendered)?;
        let evidence = self.generator.gather_evidence(assumption, &summary)?;
        tracing::debug!(assumption, hits = hits.len(), "evidence gathered");
        Ok(evidence)
    }
}
