//! Scrape, index and chat against a mocked Wikipedia.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quickopedia::chat::{ChatSession, Role};
use quickopedia::language_models::{GenerateResult, LLMError, LLM};
use quickopedia::rag::{TopicIndexCache, WikiQa, NOT_FOUND_ANSWER};
use quickopedia::retrievers::WikipediaScraper;

const ARTICLE: &str = r#"<html><body>
<div id="mw-content-text"><div class="mw-parser-output">
  <p>Ferris is a crab and the unofficial mascot of the Rust programming language.[1]</p>
  <h2>Origins</h2>
  <p>Ferris was created by Karen Rustad Tölva in 2015.[2]</p>
  <h2>References</h2>
  <p>Should never be indexed.</p>
</div></div>
</body></html>"#;

#[derive(Default)]
struct RecordingLLM {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LLM for RecordingLLM {
    async fn generate(&self, prompt: &str) -> Result<GenerateResult, LLMError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(GenerateResult {
            tokens: None,
            generation: "Ferris is the Rust mascot.".to_string(),
        })
    }
}

async fn mocked_wikipedia() -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/wiki/Ferris_the_crab")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(ARTICLE)
        .create_async()
        .await;
    server
        .mock("GET", "/wiki/Missing_page")
        .with_status(404)
        .create_async()
        .await;
    server
}

#[tokio::test]
async fn chat_session_answers_from_scraped_chunks() {
    let server = mocked_wikipedia().await;
    let llm = Arc::new(RecordingLLM::default());
    let qa = WikiQa::new(
        WikipediaScraper::new().with_base_url(server.url()),
        llm.clone(),
    );
    let mut cache = TopicIndexCache::default();

    let text = qa.scraper().scrape("Ferris the crab").await.unwrap().unwrap();
    assert!(text.contains("unofficial mascot"));
    assert!(!text.contains("[1]"));
    assert!(!text.contains("Should never be indexed"));

    let mut session = ChatSession::start(&qa, &mut cache, "Ferris the crab", &text)
        .await
        .unwrap();
    let reply = session.ask("Who created Ferris?").await.unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "Ferris is the Rust mascot.");

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Question: Who created Ferris?"));
    assert!(prompts[0].contains("Karen Rustad Tölva"));
    assert!(cache.contains("Ferris the crab"));
}

#[tokio::test]
async fn cached_topic_is_not_rebuilt() {
    let server = mocked_wikipedia().await;
    let qa = WikiQa::new(
        WikipediaScraper::new().with_base_url(server.url()),
        Arc::new(RecordingLLM::default()),
    );
    let mut cache = TopicIndexCache::default();

    qa.ask(&mut cache, "Ferris the crab", "first?").await;
    let first = cache.get("Ferris the crab").unwrap();
    qa.ask(&mut cache, "Ferris the crab", "second?").await;
    let second = cache.get("FERRIS THE CRAB").unwrap();

    assert_eq!(cache.len(), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn missing_page_gets_fixed_answer() {
    let server = mocked_wikipedia().await;
    let qa = WikiQa::new(
        WikipediaScraper::new().with_base_url(server.url()),
        Arc::new(RecordingLLM::default()),
    );
    let mut cache = TopicIndexCache::default();

    assert_eq!(
        qa.ask(&mut cache, "Missing page", "anything?").await,
        NOT_FOUND_ANSWER
    );
}
