use serde::{Deserialize, Serialize};

use crate::rag::{RetrievalQa, TopicIndexCache, WikiQa};

use super::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

pub fn welcome_message(page: &str) -> String {
    format!(
        "Hi! I've analyzed the Wikipedia page about '{}'. Feel free to ask me any questions about the content!",
        page
    )
}

/// Conversation about one scraped page.
///
/// Model failures are recorded as assistant replies rather than returned, so the
/// history always alternates question and answer.
pub struct ChatSession {
    page: String,
    chain: RetrievalQa,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new<S: Into<String>>(page: S, chain: RetrievalQa) -> Self {
        let page = page.into();
        let messages = vec![ChatMessage::assistant(welcome_message(&page))];
        Self {
            page,
            chain,
            messages,
        }
    }

    /// Index `text` (reusing the cached index for `page` if present) and open a session.
    pub async fn start(
        qa: &WikiQa,
        cache: &mut TopicIndexCache,
        page: &str,
        text: &str,
    ) -> Result<Self, ChatError> {
        let chain = qa.chain_for(cache, page, text).await?;
        Ok(Self::new(page, chain))
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub async fn ask(&mut self, question: &str) -> Result<&ChatMessage, ChatError> {
        if question.trim().is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        self.messages.push(ChatMessage::user(question));

        let reply = match self.chain.ask(question).await {
            Ok(result) => result.answer,
            Err(e) => {
                log::error!("Chat answer failed: {}", e);
                format!("Sorry, I encountered an error: {}", e)
            }
        };
        self.messages.push(ChatMessage::assistant(reply));

        Ok(&self.messages[self.messages.len() - 1])
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::language_models::{GenerateResult, LLMError, LLM};
    use crate::rag::RetrievalQaBuilder;
    use crate::retrievers::BM25Retriever;
    use crate::schemas::Document;

    struct Fixed(Result<&'static str, &'static str>);

    #[async_trait]
    impl LLM for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<GenerateResult, LLMError> {
            match self.0 {
                Ok(text) => Ok(GenerateResult {
                    tokens: None,
                    generation: text.to_string(),
                }),
                Err(msg) => Err(LLMError::OtherError(msg.to_string())),
            }
        }
    }

    fn session(reply: Result<&'static str, &'static str>) -> ChatSession {
        let retriever = BM25Retriever::new(vec![Document::new("Ferris is a crab.")]);
        let chain = RetrievalQaBuilder::new()
            .with_llm(Arc::new(Fixed(reply)))
            .with_retriever(Arc::new(retriever))
            .build()
            .unwrap();
        ChatSession::new("Ferris", chain)
    }

    #[test]
    fn test_new_session_greets() {
        let s = session(Ok("unused"));
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, Role::Assistant);
        assert!(s.messages()[0].content.contains("'Ferris'"));
    }

    #[tokio::test]
    async fn test_ask_records_both_turns() {
        let mut s = session(Ok("A crab."));
        let reply = s.ask("What is Ferris?").await.unwrap();
        assert_eq!(reply, &ChatMessage::assistant("A crab."));
        assert_eq!(s.messages().len(), 3);
        assert_eq!(s.messages()[1], ChatMessage::user("What is Ferris?"));
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected() {
        let mut s = session(Ok("unused"));
        assert!(matches!(s.ask("   ").await, Err(ChatError::EmptyQuestion)));
        assert_eq!(s.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_model_error_becomes_reply() {
        let mut s = session(Err("rate limited"));
        let reply = s.ask("Anything?").await.unwrap().clone();
        assert!(reply.content.starts_with("Sorry, I encountered an error:"));
        assert!(reply.content.contains("rate limited"));

        s.clear();
        assert!(s.messages().is_empty());
    }
}
