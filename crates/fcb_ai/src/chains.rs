use fcb_core::error::AppError;

use crate::gemini::ensure_supported_model;
use crate::llm::{Llm, ModelConfig};
use crate::prompts::{
    PromptTemplates, ASSUMPTION_EXTRACTION, CLAIM_CLASSIFICATION, EVIDENCE_GATHERING,
    FINAL_SYNTHESIS, INITIAL_RESPONSE, VERIFICATION_LOOP,
};

/// The six model-backed steps of the pipeline. Each renders one template and
/// makes exactly one model call.
pub struct ResponseGenerator {
    llm: Box<dyn Llm>,
    templates: PromptTemplates,
    config: ModelConfig,
}

impl ResponseGenerator {
    pub fn new(
        llm: Box<dyn Llm>,
        templates: PromptTemplates,
        config: ModelConfig,
    ) -> Result<Self, AppError> {
        ensure_supported_model(&config.model)?;
        Ok(Self {
            llm,
            templates,
            config,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn run(&self, key: &str, args: &[(&str, &str)]) -> Result<String, AppError> {
        let prompt = self.templates.render(key, args)?;
        self.llm.generate(&self.config, &prompt)
    }

    pub fn classify_claim(&self, claim: &str) -> Result<String, AppError> {
        Ok(self
            .run(CLAIM_CLASSIFICATION, &[("claim", claim)])?
            .trim()
            .to_string())
    }

    pub fn initial_response(&self, claim: &str) -> Result<String, AppError> {
        self.run(INITIAL_RESPONSE, &[("claim", claim)])
    }

    pub fn extract_assumptions(&self, initial_response: &str) -> Result<String, AppError> {
        self.run(
            ASSUMPTION_EXTRACTION,
            &[("initial_response", initial_response)],
        )
    }

    pub fn verify_assumption(&self, assumption: &str) -> Result<String, AppError> {
        self.run(VERIFICATION_LOOP, &[("assumption", assumption)])
    }

    pub fn gather_evidence(&self, assumption: &str, search_results: &str) -> Result<String, AppError> {
        self.run(
            EVIDENCE_GATHERING,
            &[("assumption", assumption), ("search_results", search_results)],
        )
    }

    pub fn synthesize_final(
        &self,
        claim: &str,
        initial_response: &str,
        assumptions_verdicts: &str,
        gathered_evidence: &str,
    ) -> Result<String, AppError> {
        self.run(
            FINAL_SYNTHESIS,
            &[
                ("claim", claim),
                ("initial_response", initial_response),
                ("assumptions_verdicts", assumptions_verdicts),
                ("gathered_evidence", gathered_evidence),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct EchoLlm {
        prompts: Rc<RefCell<Vec<String>>>,
    }

    impl Llm for EchoLlm {
        fn generate(&self, _config: &ModelConfig, prompt: &str) -> Result<String, AppError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(format!("  {prompt}  \n"))
        }
    }

    fn templates() -> PromptTemplates {
        PromptTemplates::from_yaml_str(
            r#"
claim_classification_prompt: "classify {claim}"
initial_response_prompt: "respond {claim}"
assumption_extraction_prompt: "extract {initial_response}"
verification_loop_prompt: "verify {assumption}"
evidence_gathering_prompt: "gather {assumption} from {search_results}"
final_synthesis_prompt: "final {claim}|{initial_response}|{assumptions_verdicts}|{gathered_evidence}"
"#,
        )
        .unwrap()
    }

    fn config(model: &str) -> ModelConfig {
        ModelConfig {
            model: model.to_string(),
            temperature: 0.2,
            max_output_tokens: 256,
        }
    }

    #[test]
    fn rejects_non_gemini_models() {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let err = ResponseGenerator::new(Box::new(EchoLlm { prompts }), templates(), config("gpt-4"))
            .err()
            .expect("should fail");
        assert_eq!(err.code, "CONFIG_MODEL_UNSUPPORTED");
    }

    #[test]
    fn only_classification_is_trimmed() {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let gen = ResponseGenerator::new(
            Box::new(EchoLlm { prompts: prompts.clone() }),
            templates(),
            config("gemini-test"),
        )
        .unwrap();

        assert_eq!(gen.classify_claim("c").unwrap(), "classify c");
        assert_eq!(gen.initial_response("c").unwrap(), "  respond c  \n");
        assert_eq!(
            gen.synthesize_final("c", "i", "v", "e").unwrap().trim(),
            "final c|i|v|e"
        );
        assert_eq!(
            gen.gather_evidence("a", "s").unwrap().trim(),
            "gather a from s"
        );
        assert_eq!(prompts.borrow().len(), 4);
    }
}
