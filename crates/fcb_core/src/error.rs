use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error shared by the store, the AI layer and the CLI.
///
/// `code` is a stable machine-readable identifier. Prefixes group the failure:
/// `CONFIG_` (fatal at construction), `AI_`, `SEARCH_`, `DB_`, `PIPELINE_`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Configuration errors abort startup instead of being shown per claim.
    pub fn is_config(&self) -> bool {
        self.code.starts_with("CONFIG_")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
