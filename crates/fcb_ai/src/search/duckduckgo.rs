use fcb_core::error::AppError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{SearchBackend, SearchHit};

pub const BACKEND_NAME: &str = "duckduckgo";
const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const LINK_BASE: &str = "https://duckduckgo.com/";

/// Web search through DuckDuckGo's HTML results page.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBackend for DuckDuckGoSearch {
    fn text_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AppError> {
        let resp = ureq::get(&self.endpoint)
            .query("q", query)
            .set("User-Agent", concat!("factcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(15))
            .call();

        let body = match resp {
            Ok(r) => r.into_string().map_err(|e| {
                AppError::new("SEARCH_FAILED", "Failed to read search response")
                    .with_details(e.to_string())
            })?,
            Err(ureq::Error::Status(code, _)) => {
                return Err(AppError::new("SEARCH_FAILED", "Search request failed")
                    .with_details(format!("status={code}"))
                    .with_retryable(code == 429 || code >= 500))
            }
            Err(e) => {
                return Err(AppError::new("SEARCH_UNREACHABLE", "Failed to reach DuckDuckGo")
                    .with_details(e.to_string())
                    .with_retryable(true))
            }
        };

        parse_results_html(&body, max_results)
    }
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| {
        AppError::new("SEARCH_PARSE_FAILED", "Invalid result selector")
            .with_details(format!("selector={css}; err={e:?}"))
    })
}

fn element_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract organic results from a DuckDuckGo HTML page, skipping ads.
pub fn parse_results_html(html: &str, max_results: usize) -> Result<Vec<SearchHit>, AppError> {
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let mut hits = Vec::new();

    for result in document.select(&result_sel) {
        if hits.len() >= max_results {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let anchor = result.select(&title_sel).next();
        let hit = SearchHit {
            title: anchor.and_then(element_text),
            link: anchor
                .and_then(|a| a.value().attr("href"))
                .map(resolve_link),
            snippet: result.select(&snippet_sel).next().and_then(element_text),
        };
        if hit.title.is_none() && hit.link.is_none() && hit.snippet.is_none() {
            continue;
        }
        hits.push(hit);
    }

    Ok(hits)
}

/// Result links point at a `/l/?uddg=<target>` redirect; return the target.
/// Other links are resolved against the DuckDuckGo origin.
fn resolve_link(href: &str) -> String {
    let resolved = Url::parse(LINK_BASE).and_then(|base| base.join(href));
    match resolved {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or_else(|| url.to_string()),
        Err(_) => href.to_string(),
    }
}
