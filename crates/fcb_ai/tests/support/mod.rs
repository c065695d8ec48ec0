#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fcb_ai::chains::ResponseGenerator;
use fcb_ai::llm::{Llm, ModelConfig};
use fcb_ai::pipeline::FactChecker;
use fcb_ai::prompts::PromptTemplates;
use fcb_ai::retriever::EvidenceRetriever;
use fcb_ai::search::{SearchBackend, SearchHit};
use fcb_core::domain::{FactCheckResult, StoredFactCheck};
use fcb_core::error::AppError;
use fcb_core::store::RecordStore;

pub const TEST_PROMPTS: &str = r#"
claim_classification_prompt: "CLASSIFY {claim}"
initial_response_prompt: "INITIAL {claim}"
assumption_extraction_prompt: "EXTRACT {initial_response}"
verification_loop_prompt: "VERIFY {assumption}"
evidence_gathering_prompt: "GATHER {assumption} :: {search_results}"
final_synthesis_prompt: "FINAL {claim} || {initial_response} || {assumptions_verdicts} || {gathered_evidence}"
"#;

/// One model call as seen by the scripted model.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub step: &'static str,
    pub prompt: String,
    pub temperature: f32,
}

/// Model double that answers by pipeline step, recognised from the prompt prefix.
#[derive(Clone, Default)]
pub struct ScriptedLlm {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub claim_type: String,
    pub initial: String,
    pub extraction: String,
    pub verdicts: HashMap<String, String>,
    pub fail_step: Option<&'static str>,
}

impl ScriptedLlm {
    pub fn new(initial: &str) -> Self {
        Self {
            claim_type: "  Factual \n".to_string(),
            initial: initial.to_string(),
            ..Default::default()
        }
    }

    pub fn extraction(mut self, raw: &str) -> Self {
        self.extraction = raw.to_string();
        self
    }

    pub fn verdict(mut self, assumption: &str, verdict: &str) -> Self {
        self.verdicts.insert(assumption.to_string(), verdict.to_string());
        self
    }

    pub fn failing_at(mut self, step: &'static str) -> Self {
        self.fail_step = Some(step);
        self
    }

    pub fn steps(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(|c| c.step).collect()
    }

    pub fn prompts_for(&self, step: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.step == step)
            .map(|c| c.prompt.clone())
            .collect()
    }
}

fn step_of(prompt: &str) -> &'static str {
    const STEPS: [(&str, &str); 7] = [
        ("CLASSIFY ", "classify"),
        ("INITIAL ", "initial"),
        ("EXTRACT ", "extract"),
        ("VERIFY ", "verify"),
        ("GATHER ", "gather"),
        ("FINAL ", "final"),
        ("Summarize the following search results", "summarize"),
    ];
    STEPS
        .iter()
        .find(|(prefix, _)| prompt.starts_with(prefix))
        .map(|(_, step)| *step)
        .unwrap_or("unknown")
}

impl Llm for ScriptedLlm {
    fn generate(&self, config: &ModelConfig, prompt: &str) -> Result<String, AppError> {
        let step = step_of(prompt);
        self.calls.borrow_mut().push(Call {
            step,
            prompt: prompt.to_string(),
            temperature: config.temperature,
        });
        if self.fail_step == Some(step) {
            return Err(AppError::new("AI_REQUEST_FAILED", "scripted failure").with_retryable(true));
        }

        let out = match step {
            "classify" => self.claim_type.clone(),
            "initial" => self.initial.clone(),
            "extract" => self.extraction.clone(),
            "verify" => {
                let assumption = prompt.trim_start_matches("VERIFY ");
                self.verdicts
                    .get(assumption)
                    .cloned()
                    .unwrap_or_else(|| "Correct".to_string())
            }
            "gather" => format!("evidence for {}", prompt.trim_start_matches("GATHER ")),
            "summarize" => "summary of results".to_string(),
            "final" => "Final synthesized answer.".to_string(),
            _ => String::new(),
        };
        Ok(out)
    }
}

/// Search double recording every backend query.
#[derive(Clone, Default)]
pub struct RecordingSearch {
    pub queries: Rc<RefCell<Vec<(String, usize)>>>,
    pub hits: Vec<SearchHit>,
    pub fail: bool,
}

impl RecordingSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl SearchBackend for RecordingSearch {
    fn text_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AppError> {
        self.queries
            .borrow_mut()
            .push((query.to_string(), max_results));
        if self.fail {
            return Err(AppError::new("SEARCH_UNREACHABLE", "scripted search failure"));
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

/// Store double keeping saved results in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub saved: Rc<RefCell<Vec<FactCheckResult>>>,
    pub fail: bool,
}

impl RecordStore for MemoryStore {
    fn save(&self, result: &FactCheckResult) -> Result<StoredFactCheck, AppError> {
        if self.fail {
            return Err(AppError::new("DB_OPEN_FAILED", "scripted store failure"));
        }
        self.saved.borrow_mut().push(result.clone());
        Ok(StoredFactCheck {
            id: self.saved.borrow().len() as i64,
            result: result.clone(),
            created_at: "2026-10-18T00:00:00Z".to_string(),
        })
    }

    fn load_all(&self) -> Result<Vec<StoredFactCheck>, AppError> {
        Ok(Vec::new())
    }

    fn clear(&self) -> Result<usize, AppError> {
        let n = self.saved.borrow().len();
        self.saved.borrow_mut().clear();
        Ok(n)
    }
}

pub fn model_config() -> ModelConfig {
    ModelConfig {
        model: "gemini-test".to_string(),
        temperature: 0.2,
        max_output_tokens: 2048,
    }
}

pub fn sample_hit() -> SearchHit {
    SearchHit {
        title: Some("Test Result".to_string()),
        link: Some("http://example.com".to_string()),
        snippet: Some("Snippet".to_string()),
    }
}

pub fn fact_checker(llm: &ScriptedLlm, search: &RecordingSearch, store: &MemoryStore) -> FactChecker {
    let templates = PromptTemplates::from_yaml_str(TEST_PROMPTS).expect("templates");
    let config = model_config();
    let generator = ResponseGenerator::new(Box::new(llm.clone()), templates, config.clone())
        .ok()
        .expect("generator");
    let retriever = EvidenceRetriever::with_backend(
        Box::new(search.clone()),
        Box::new(llm.clone()),
        config.for_summary(),
    );
    FactChecker::new(generator, retriever, Box::new(store.clone()))
}
