use std::collections::HashMap;

use fcb_core::error::AppError;

use crate::llm::{Llm, ModelConfig};
use crate::search::duckduckgo::{self, DuckDuckGoSearch};
use crate::search::{SearchBackend, SearchHit};

pub const NO_RESULTS_SUMMARY: &str = "No relevant search results found to summarize.";
const MISSING_FIELD: &str = "N/A";
const SUMMARY_INSTRUCTION: &str = "Summarize the following search results concisely, focusing only on information relevant to fact-checking. Extract key facts and avoid opinions or irrelevant details:";

/// Web evidence for assumptions: cached search, text rendering and summarization.
///
/// The cache is keyed by `(query, num_results)` and lives as long as the retriever.
pub struct EvidenceRetriever {
    backend: Box<dyn SearchBackend>,
    llm: Box<dyn Llm>,
    summary_config: ModelConfig,
    cache: HashMap<(String, usize), Vec<SearchHit>>,
}

impl EvidenceRetriever {
    /// Build the retriever for a configured backend name. Only `duckduckgo` exists.
    pub fn open(
        search_tool: &str,
        llm: Box<dyn Llm>,
        summary_config: ModelConfig,
    ) -> Result<Self, AppError> {
        match search_tool {
            duckduckgo::BACKEND_NAME => Ok(Self::with_backend(
                Box::new(DuckDuckGoSearch::new()),
                llm,
                summary_config,
            )),
            other => Err(AppError::new(
                "CONFIG_SEARCH_UNSUPPORTED",
                format!("Unsupported search tool: {other}. Only 'duckduckgo' is supported."),
            )),
        }
    }

    pub fn with_backend(
        backend: Box<dyn SearchBackend>,
        llm: Box<dyn Llm>,
        summary_config: ModelConfig,
    ) -> Self {
        Self {
            backend,
            llm,
            summary_config,
            cache: HashMap::new(),
        }
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Search with caching. Backend failures are logged and yield no results.
    pub fn search(&mut self, query: &str, num_results: usize) -> Vec<SearchHit> {
        let key = (query.to_string(), num_results);
        if let Some(hits) = self.cache.get(&key) {
            tracing::info!(query, "returning search results from cache");
            return hits.clone();
        }

        let hits = match self.backend.text_search(query, num_results) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!(query, error = %e, "search failed; continuing without results");
                Vec::new()
            }
        };
        self.cache.insert(key, hits.clone());
        hits
    }

    /// Render hits as numbered text blocks.
    pub fn process_results(&self, hits: &[SearchHit]) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING_FIELD.to_string());
        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "Result {}:\nTitle: {}\nLink: {}\nSnippet: {}\n\n",
                    i + 1,
                    field(&hit.title),
                    field(&hit.link),
                    field(&hit.snippet)
                )
            })
            .collect()
    }

    pub fn summarize_results(&self, rendered: &str) -> Result<String, AppError> {
        if rendered.trim().is_empty() {
            return Ok(NO_RESULTS_SUMMARY.to_string());
        }
        let prompt = format!("{SUMMARY_INSTRUCTION}\n\n{rendered}");
        self.llm.generate(&self.summary_config, &prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoLlm;

    impl Llm for NoLlm {
        fn generate(&self, _config: &ModelConfig, _prompt: &str) -> Result<String, AppError> {
            Err(AppError::new("AI_REQUEST_FAILED", "not expected in this test"))
        }
    }

    fn summary_config() -> ModelConfig {
        ModelConfig {
            model: "gemini-test".to_string(),
            temperature: 0.1,
            max_output_tokens: 512,
        }
    }

    #[test]
    fn rejects_unknown_search_tool() {
        let err = EvidenceRetriever::open("serpapi", Box::new(NoLlm), summary_config())
            .err()
            .expect("should fail");
        assert_eq!(err.code, "CONFIG_SEARCH_UNSUPPORTED");
        assert!(err.message.contains("serpapi"));
    }

    #[test]
    fn accepts_duckduckgo() {
        assert!(EvidenceRetriever::open("duckduckgo", Box::new(NoLlm), summary_config()).is_ok());
    }

    #[test]
    fn process_results_numbers_blocks_and_fills_missing_fields() {
        let retriever = EvidenceRetriever::open("duckduckgo", Box::new(NoLlm), summary_config())
            .ok()
            .unwrap();
        let hits = vec![
            SearchHit {
                title: Some("Title A".to_string()),
                link: Some("http://linkA.com".to_string()),
                snippet: Some("Snippet A".to_string()),
            },
            SearchHit {
                title: Some("Title B".to_string()),
                link: None,
                snippet: None,
            },
        ];
        let text = retriever.process_results(&hits);
        assert_eq!(
            text,
            "Result 1:\nTitle: Title A\nLink: http://linkA.com\nSnippet: Snippet A\n\n\
             Result 2:\nTitle: Title B\nLink: N/A\nSnippet: N/A\n\n"
        );
        assert_eq!(retriever.process_results(&[]), "");
    }

    #[test]
    fn blank_text_is_not_sent_to_the_model() {
        let retriever = EvidenceRetriever::open("duckduckgo", Box::new(NoLlm), summary_config())
            .ok()
            .unwrap();
        assert_eq!(retriever.summarize_results("  \n ").unwrap(), NO_RESULTS_SUMMARY);
    }
}
