use fcb_core::error::AppError;
use fcb_core::settings::Settings;

pub mod gemini_llm;

/// Generation parameters for one model call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl ModelConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.llm_model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_tokens,
        }
    }

    /// Same model, tuned for short factual summaries of search results.
    pub fn for_summary(&self) -> Self {
        Self {
            model: self.model.clone(),
            temperature: 0.1,
            max_output_tokens: 512,
        }
    }
}

pub trait Llm {
    fn generate(&self, config: &ModelConfig, prompt: &str) -> Result<String, AppError>;
}
