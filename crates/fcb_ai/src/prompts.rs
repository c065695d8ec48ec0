use std::collections::BTreeMap;
use std::path::Path;

use fcb_core::error::AppError;

pub const CLAIM_CLASSIFICATION: &str = "claim_classification_prompt";
pub const INITIAL_RESPONSE: &str = "initial_response_prompt";
pub const ASSUMPTION_EXTRACTION: &str = "assumption_extraction_prompt";
pub const VERIFICATION_LOOP: &str = "verification_loop_prompt";
pub const EVIDENCE_GATHERING: &str = "evidence_gathering_prompt";
pub const FINAL_SYNTHESIS: &str = "final_synthesis_prompt";

pub const REQUIRED_KEYS: [&str; 6] = [
    CLAIM_CLASSIFICATION,
    INITIAL_RESPONSE,
    ASSUMPTION_EXTRACTION,
    VERIFICATION_LOOP,
    EVIDENCE_GATHERING,
    FINAL_SYNTHESIS,
];

const BUNDLED_PROMPTS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../config/prompts.yaml"
));

/// Prompt templates keyed by name.
///
/// Templates use `{name}` placeholders; `{{` and `}}` render as literal braces.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: BTreeMap<String, String>,
}

impl PromptTemplates {
    pub fn bundled() -> Result<Self, AppError> {
        Self::from_yaml_str(BUNDLED_PROMPTS)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::new("CONFIG_PROMPTS_UNREADABLE", "Failed to read prompt templates")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parse a YAML mapping and check that every pipeline template is present.
    pub fn from_yaml_str(raw: &str) -> Result<Self, AppError> {
        let templates: BTreeMap<String, String> = serde_yaml::from_str(raw).map_err(|e| {
            AppError::new("CONFIG_PROMPTS_INVALID", "Prompt templates are not a YAML string mapping")
                .with_details(e.to_string())
        })?;

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|k| !templates.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::new(
                "CONFIG_PROMPT_MISSING",
                "Prompt templates are missing required keys",
            )
            .with_details(format!("missing={}", missing.join(","))));
        }

        Ok(Self { templates })
    }

    pub fn render(&self, key: &str, args: &[(&str, &str)]) -> Result<String, AppError> {
        let template = self.templates.get(key).ok_or_else(|| {
            AppError::new("CONFIG_PROMPT_MISSING", "Prompt template not found")
                .with_details(format!("key={key}"))
        })?;
        render_template(template, args).map_err(|e| e.with_details(format!("template={key}")))
    }
}

fn render_template(template: &str, args: &[(&str, &str)]) -> Result<String, AppError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(&['{', '}'][..]) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(AppError::new(
                "AI_PROMPT_RENDER_FAILED",
                "Unmatched '}' in prompt template",
            ));
        } else {
            let end = tail.find('}').ok_or_else(|| {
                AppError::new("AI_PROMPT_RENDER_FAILED", "Unclosed '{' in prompt template")
            })?;
            let name = tail[1..end].trim();
            let value = args
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
                .ok_or_else(|| {
                    AppError::new(
                        "AI_PROMPT_RENDER_FAILED",
                        format!("No value supplied for prompt variable '{name}'"),
                    )
                })?;
            out.push_str(value);
            rest = &tail[end + 1..];
        }
    }
    out.push_str(rest);
    Ok(out)
}
