use crate::{
    rag::{RAGError, RetrievalQa, RetrievalQaBuilder, TopicIndexCache},
    retrievers::WikipediaScraper,
    SharedLLM,
};

pub const NOT_FOUND_ANSWER: &str = "Sorry, couldn't find information about that topic.";

/// One-shot question answering about a Wikipedia topic.
///
/// The index cache is owned by the caller so repeated questions about the same
/// topic reuse the chunks built the first time.
pub struct WikiQa {
    scraper: WikipediaScraper,
    llm: SharedLLM,
}

impl WikiQa {
    pub fn new(scraper: WikipediaScraper, llm: SharedLLM) -> Self {
        Self { scraper, llm }
    }

    pub fn scraper(&self) -> &WikipediaScraper {
        &self.scraper
    }

    /// Build a QA chain over already scraped `text`, indexing it on first use.
    pub async fn chain_for(
        &self,
        cache: &mut TopicIndexCache,
        topic: &str,
        text: &str,
    ) -> Result<RetrievalQa, RAGError> {
        let retriever = cache.populate(text, topic).await?;
        RetrievalQaBuilder::new()
            .with_llm(self.llm.clone())
            .with_retriever(retriever)
            .build()
    }

    /// Scrape, index and answer. Failures become the answer text.
    pub async fn ask(&self, cache: &mut TopicIndexCache, topic: &str, question: &str) -> String {
        let content = match self.scraper.scrape(topic).await {
            Ok(Some(content)) => content,
            Ok(None) => return NOT_FOUND_ANSWER.to_string(),
            Err(e) => {
                log::error!("Scraping '{}' failed: {}", topic, e);
                return NOT_FOUND_ANSWER.to_string();
            }
        };

        let result = match self.chain_for(cache, topic, &content).await {
            Ok(chain) => chain.ask(question).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(result) => result.answer,
            Err(e) => format!("Error getting response: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::language_models::{GenerateResult, LLMError, LLM};

    struct FailingLLM;

    #[async_trait]
    impl LLM for FailingLLM {
        async fn generate(&self, _prompt: &str) -> Result<GenerateResult, LLMError> {
            Err(LLMError::OtherError("model offline".to_string()))
        }
    }

    const PAGE: &str = r#"<div id="mw-content-text"><div class="mw-parser-output">
        <p>Ferris is the unofficial mascot of Rust.</p></div></div>"#;

    #[tokio::test]
    async fn test_missing_page_answer() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/wiki/Nothing").with_status(404).create_async().await;

        let qa = WikiQa::new(
            WikipediaScraper::new().with_base_url(server.url()),
            Arc::new(FailingLLM),
        );
        let mut cache = TopicIndexCache::default();
        assert_eq!(qa.ask(&mut cache, "Nothing", "why?").await, NOT_FOUND_ANSWER);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_becomes_answer_and_index_is_cached() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/wiki/Ferris")
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;

        let qa = WikiQa::new(
            WikipediaScraper::new().with_base_url(server.url()),
            Arc::new(FailingLLM),
        );
        let mut cache = TopicIndexCache::default();
        let answer = qa.ask(&mut cache, "Ferris", "What is Ferris?").await;

        assert!(answer.starts_with("Error getting response:"));
        assert!(answer.contains("model offline"));
        assert!(cache.contains("ferris"));
    }
}
