pub mod app_state;
pub mod shell;
pub mod view;

use std::collections::HashMap;
use std::path::Path;

use fcb_core::error::AppError;
use fcb_core::settings::Settings;

/// Prefix shown for any failure while checking a claim.
pub const CHECK_FAILED_PREFIX: &str = "An error occurred during fact-checking";

pub const DOTENV_FILE: &str = ".env";

pub fn check_failed_message(err: &AppError) -> String {
    format!("{CHECK_FAILED_PREFIX}: {err}")
}

fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, AppError> {
    let invalid = |e: dotenvy::Error| {
        AppError::new("CONFIG_DOTENV_INVALID", "Failed to read .env file")
            .with_details(format!("path={}; err={}", path.display(), e))
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(invalid(e)),
    };
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(invalid)?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Settings from the process environment, with a `.env` file filling in whatever
/// the environment leaves unset.
pub fn load_settings(dotenv: Option<&Path>) -> Result<Settings, AppError> {
    let file_vars = match dotenv {
        Some(path) => read_dotenv(path)?,
        None => HashMap::new(),
    };
    if !file_vars.is_empty() {
        tracing::debug!(count = file_vars.len(), "loaded variables from .env");
    }
    Settings::from_lookup(|key| {
        std::env::var(key)
            .ok()
            .or_else(|| file_vars.get(key).cloned())
    })
}
