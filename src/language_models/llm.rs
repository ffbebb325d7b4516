use std::sync::Arc;

use async_trait::async_trait;

use super::{GenerateResult, LLMError};

/// A single-turn text generator.
///
/// Every call is independent: implementations keep no conversation memory, so
/// callers embed all the context a step needs in the prompt itself.
#[async_trait]
pub trait LLM: Sync + Send {
    async fn generate(&self, prompt: &str) -> Result<GenerateResult, LLMError>;

    async fn invoke(&self, prompt: &str) -> Result<String, LLMError> {
        self.generate(prompt).await.map(|res| res.generation)
    }
}

#[async_trait]
impl<L> LLM for Arc<L>
where
    L: LLM + ?Sized,
{
    async fn generate(&self, prompt: &str) -> Result<GenerateResult, LLMError> {
        (**self).generate(prompt).await
    }
}

#[async_trait]
impl<L> LLM for Box<L>
where
    L: LLM + ?Sized,
{
    async fn generate(&self, prompt: &str) -> Result<GenerateResult, LLMError> {
        (**self).generate(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl LLM for Echo {
        async fn generate(&self, prompt: &str) -> Result<GenerateResult, LLMError> {
            Ok(GenerateResult {
                tokens: None,
                generation: format!("echo: {}", prompt),
            })
        }
    }

    #[tokio::test]
    async fn test_invoke_returns_generation() {
        let llm = Echo;
        assert_eq!(llm.invoke("hi").await.unwrap(), "echo: hi");
    }

    #[tokio::test]
    async fn test_shared_llm_delegates() {
        let llm: Arc<dyn LLM> = Arc::new(Echo);
        assert_eq!(llm.invoke("x").await.unwrap(), "echo: x");
    }
}
