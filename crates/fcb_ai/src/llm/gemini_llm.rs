use fcb_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::{Llm, ModelConfig};
use crate::gemini::GeminiClient;

#[derive(Debug, Clone)]
pub struct GeminiLlm {
    client: GeminiClient,
}

impl GeminiLlm {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, which may be empty. `None` when there is no candidate.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        Some(
            candidate
                .content
                .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
                .unwrap_or_default(),
        )
    }
}

impl Llm for GeminiLlm {
    fn generate(&self, config: &ModelConfig, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.client.base_url(),
            config.model
        );
        let req = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        };
        let body = serde_json::to_value(req).map_err(|e| {
            AppError::new("AI_REQUEST_FAILED", "Failed to encode generation request")
                .with_details(e.to_string())
        })?;

        tracing::debug!(model = %config.model, prompt_len = prompt.len(), "calling Gemini");
        let resp = ureq::post(&url)
            .set("x-goog-api-key", self.client.api_key())
            .timeout(std::time::Duration::from_secs(60))
            .send_json(body);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: GenerateContentResponse = r.into_json().map_err(|e| {
                    AppError::new("AI_REQUEST_FAILED", "Failed to decode generation response")
                        .with_details(e.to_string())
                })?;
                v.into_text().ok_or_else(|| {
                    AppError::new("AI_RESPONSE_EMPTY", "Model returned no candidates")
                        .with_details(format!("model={}", config.model))
                })
            }
            Ok(r) => Err(AppError::new("AI_REQUEST_FAILED", "Generation request failed")
                .with_details(format!("status={}", r.status()))),
            Err(ureq::Error::Status(code, r)) => {
                let body = r.into_string().unwrap_or_default();
                Err(AppError::new("AI_REQUEST_FAILED", "Generation request failed")
                    .with_details(format!("status={code}; body={body}"))
                    .with_retryable(code == 429 || code >= 500))
            }
            Err(e) => Err(AppError::new("AI_REQUEST_FAILED", "Failed to call Gemini")
                .with_details(e.to_string())
                .with_retryable(true)),
        }
    }
}
