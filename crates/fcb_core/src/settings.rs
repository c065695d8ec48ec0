use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SEARCH_TOOL: &str = "duckduckgo";
pub const DEFAULT_DB_PATH: &str = "fact_checks.db";

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub llm_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub search_tool: String,
    pub db_path: PathBuf,
    pub prompts_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 2048,
            search_tool: DEFAULT_SEARCH_TOOL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            prompts_path: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let temperature = match get("TEMPERATURE") {
            Some(raw) => parse_number::<f32>("TEMPERATURE", &raw)?,
            None => defaults.temperature,
        };
        let max_tokens = match get("MAX_TOKENS") {
            Some(raw) => parse_number::<u32>("MAX_TOKENS", &raw)?,
            None => defaults.max_tokens,
        };

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            llm_model: get("LLM_MODEL").unwrap_or(defaults.llm_model),
            temperature,
            max_tokens,
            search_tool: get("SEARCH_TOOL").unwrap_or(defaults.search_tool),
            db_path: get("FACTCHECK_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            prompts_path: get("FACTCHECK_PROMPTS_PATH").map(PathBuf::from),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        AppError::new("CONFIG_INVALID", format!("Invalid value for {key}"))
            .with_details(format!("{key}={raw}; err={e}"))
    })
}
