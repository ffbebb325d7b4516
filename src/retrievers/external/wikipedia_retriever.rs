use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::retrievers::RetrieverError;
use crate::schemas::{Document, Retriever};

static CITATION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?:\d+|[a-z]|edit|citation needed|note \d+|update)\]")
        .expect("static citation regex")
});

/// Section headings after which the article body is over.
const TRAILING_SECTIONS: &[&str] = &[
    "references",
    "notes",
    "see also",
    "external links",
    "further reading",
    "bibliography",
    "sources",
];

/// Configuration for Wikipedia scraper
#[derive(Debug, Clone)]
pub struct WikipediaScraperConfig {
    /// Language code (e.g., "en", "zh", "es")
    pub language: String,
    /// Overrides `https://{language}.wikipedia.org`
    pub base_url: Option<String>,
    /// HTTP client timeout
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for WikipediaScraperConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            base_url: None,
            timeout: Some(Duration::from_secs(30)),
            user_agent: "quickopedia/0.1".to_string(),
        }
    }
}

/// Fetches Wikipedia article pages and reduces them to clean text.
#[derive(Debug, Clone)]
pub struct WikipediaScraper {
    config: WikipediaScraperConfig,
    client: Client,
}

impl WikipediaScraper {
    pub fn new() -> Self {
        Self::with_config(WikipediaScraperConfig::default())
    }

    pub fn with_config(config: WikipediaScraperConfig) -> Self {
        let mut client_builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder.build().unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.config.language = language.into();
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Article URL for a page name as typed by a user ("Rust (programming language)").
    pub fn page_url(&self, page_name: &str) -> Result<Url, RetrieverError> {
        let base = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.wikipedia.org", self.config.language));
        let mut url = Url::parse(&base)?;
        url.path_segments_mut()
            .map_err(|_| RetrieverError::ConfigurationError(format!("cannot-be-a-base URL: {}", base)))?
            .pop_if_empty()
            .push("wiki")
            .push(&page_name.trim().replace(' ', "_"));
        Ok(url)
    }

    /// Scrape a page, returning `None` when it does not exist or has no article body.
    pub async fn scrape(&self, page_name: &str) -> Result<Option<String>, RetrieverError> {
        if page_name.trim().is_empty() {
            return Ok(None);
        }

        let url = self.page_url(page_name)?;
        log::info!("Scraping Wikipedia page: {}", url);

        let response = self.client.get(url.as_str()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                log::warn!("Wikipedia page not found: {}", page_name);
                return Ok(None);
            }
            status if !status.is_success() => {
                return Err(RetrieverError::WikipediaError(format!(
                    "HTTP {} for {}",
                    status, url
                )));
            }
            _ => {}
        }

        let html = response.text().await?;
        let text = extract_article_text(&html);
        if text.is_empty() {
            log::warn!("No article text found on page: {}", page_name);
            return Ok(None);
        }

        log::info!("Scraped {} characters from {}", text.len(), page_name);
        Ok(Some(text))
    }
}

impl Default for WikipediaScraper {
    fn default() -> Self {
        Self::new()
    }
}

fn clean_fragment(element: &ElementRef) -> String {
    let raw = element.text().collect::<Vec<_>>().join("");
    let without_markers = CITATION_MARKER.replace_all(&raw, "");
    without_markers.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce a rendered article to headings and paragraphs separated by blank lines.
///
/// Citation markers are dropped and collection stops at the first trailing
/// section (References, See also, ...).
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(
        "#mw-content-text .mw-parser-output h2, \
         #mw-content-text .mw-parser-output h3, \
         #mw-content-text .mw-parser-output p",
    ) else {
        return String::new();
    };

    let mut blocks = Vec::new();
    for element in document.select(&selector) {
        let text = clean_fragment(&element);
        if text.is_empty() {
            continue;
        }

        let tag = element.value().name();
        if tag == "h2" && TRAILING_SECTIONS.contains(&text.to_lowercase().as_str()) {
            break;
        }

        blocks.push(text);
    }

    blocks.join("\n\n")
}

#[async_trait]
impl Retriever for WikipediaScraper {
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, RetrieverError> {
        let Some(content) = self.scrape(query).await? else {
            return Ok(vec![]);
        };

        let mut metadata = HashMap::new();
        metadata.insert(
            "source".to_string(),
            Value::from(format!("Wikipedia: {}", query.trim())),
        );
        metadata.insert("title".to_string(), Value::from(query.trim()));
        metadata.insert(
            "url".to_string(),
            Value::from(self.page_url(query)?.to_string()),
        );

        Ok(vec![Document::new(content).with_metadata(metadata)])
    }
}
