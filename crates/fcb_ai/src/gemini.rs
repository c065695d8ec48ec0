use fcb_core::error::AppError;

pub const SUPPORTED_MODEL_FAMILY: &str = "gemini";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "Gemini base URL must be an http(s) URL",
            )
            .with_details(format!("base_url={base_url}")));
        }
        if api_key.trim().is_empty() {
            return Err(AppError::new(
                "CONFIG_CREDENTIAL_MISSING",
                "GEMINI_API_KEY is required to call the model",
            ));
        }

        Ok(Self {
            base_url,
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Confirm the endpoint is reachable and the key can see `model`.
    pub fn health_check(&self, model: &str) -> Result<(), AppError> {
        let url = format!("{}/v1beta/models/{}", self.base_url, model);
        let resp = ureq::get(&url)
            .set("x-goog-api-key", &self.api_key)
            .timeout(std::time::Duration::from_secs(5))
            .call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(
                AppError::new("AI_UNHEALTHY", "Gemini health check failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(ureq::Error::Status(code, _)) => Err(
                AppError::new("AI_UNHEALTHY", "Gemini health check failed")
                    .with_details(format!("status={code}; model={model}")),
            ),
            Err(e) => Err(AppError::new("AI_UNREACHABLE", "Failed to reach Gemini")
                .with_details(e.to_string())
                .with_retryable(true)),
        }
    }
}

/// Only Gemini models are wired up; other backends would implement [`crate::llm::Llm`].
pub fn ensure_supported_model(model: &str) -> Result<(), AppError> {
    if model.to_ascii_lowercase().contains(SUPPORTED_MODEL_FAMILY) {
        Ok(())
    } else {
        Err(AppError::new(
            "CONFIG_MODEL_UNSUPPORTED",
            format!("Unsupported LLM model: {model}. Only Gemini models are supported."),
        ))
    }
}
