use async_trait::async_trait;
use reqwest::Client;

use crate::{
    language_models::{llm::LLM, options::CallOptions, GenerateResult, LLMError, TokenUsage},
    llm::GroqError,
};

use super::models::{ApiResponse, Payload, PayloadMessage};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Parse error from response and return appropriate GroqError
fn parse_error_response(status: u16, message: &str) -> LLMError {
    let message = message.to_string();
    match status {
        400 | 422 => LLMError::GroqError(GroqError::InvalidParameterError(message)),
        401 | 403 => LLMError::GroqError(GroqError::InvalidApiKeyError(message)),
        404 => LLMError::GroqError(GroqError::ModelNotFoundError(message)),
        429 => LLMError::GroqError(GroqError::RateLimitError(message)),
        500..=599 => LLMError::GroqError(GroqError::ServiceUnavailableError(message)),
        _ => LLMError::GroqError(GroqError::SystemError(message)),
    }
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
///
/// No request timeout is set; the transport default applies.
#[derive(Clone)]
pub struct Groq {
    options: CallOptions,
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for Groq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Groq")
            .field("options", &self.options)
            .field("api_key", &self.api_key.as_ref().map(|_| "..."))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for Groq {
    fn default() -> Self {
        Self::new()
    }
}

impl Groq {
    pub fn new() -> Self {
        Self {
            options: CallOptions::default(),
            api_key: std::env::var("GROQ_API_KEY").ok(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.options.model = model.into();
        self
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    fn build_payload<'a>(&'a self, prompt: &'a str) -> Payload<'a> {
        Payload {
            model: &self.options.model,
            messages: vec![PayloadMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        }
    }
}

#[async_trait]
impl LLM for Groq {
    async fn generate(&self, prompt: &str) -> Result<GenerateResult, LLMError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut request = self.client.post(&url).json(&self.build_payload(prompt));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        log::debug!("Sending {} character prompt to {}", prompt.len(), self.options.model);
        let res = request.send().await?;

        match res.status().as_u16() {
            200 => {
                let api_response: ApiResponse = res.json().await?;
                let generation = api_response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| LLMError::ContentNotFound("choices[0].message.content".into()))?;

                Ok(GenerateResult {
                    tokens: api_response
                        .usage
                        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
                    generation,
                })
            }
            status => {
                let error_message = res
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("HTTP {}", status));
                Err(parse_error_response(status, &error_message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_groq_generate_parses_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"test-model","max_tokens":128}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r##"{"choices":[{"message":{"role":"assistant","content":"# Hello"}}],
                    "usage":{"prompt_tokens":7,"completion_tokens":3,"total_tokens":10}}"##,
            )
            .create_async()
            .await;

        let groq = Groq::new()
            .with_base_url(server.url())
            .with_api_key("test-key")
            .with_options(CallOptions::new().with_model("test-model").with_max_tokens(128));

        let result = groq.generate("Write a title").await.unwrap();
        assert_eq!(result.generation, "# Hello");
        assert_eq!(result.tokens, Some(TokenUsage::new(7, 3)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_groq_maps_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let groq = Groq::new().with_base_url(server.url()).with_api_key("k");
        let err = groq.invoke("hi").await.unwrap_err();
        assert!(matches!(
            err,
            LLMError::GroqError(GroqError::RateLimitError(ref m)) if m == "slow down"
        ));
    }

    #[tokio::test]
    async fn test_groq_empty_choices_is_content_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let groq = Groq::new().with_base_url(server.url()).with_api_key("k");
        assert!(matches!(
            groq.invoke("hi").await,
            Err(LLMError::ContentNotFound(_))
        ));
    }
}
