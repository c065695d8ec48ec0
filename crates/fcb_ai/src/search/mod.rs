use fcb_core::error::AppError;

pub mod duckduckgo;

/// One ranked web-search result. Backends may omit any field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

pub trait SearchBackend {
    fn text_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AppError>;
}
