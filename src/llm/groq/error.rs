use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroqError {
    #[error("Groq API error: Invalid parameter - {0}")]
    InvalidParameterError(String),

    #[error("Groq API error: Invalid API Key - {0}")]
    InvalidApiKeyError(String),

    #[error("Groq API error: Model not found - {0}")]
    ModelNotFoundError(String),

    #[error("Groq API error: Rate limit exceeded - {0}")]
    RateLimitError(String),

    #[error("Groq API error: Service unavailable - {0}")]
    ServiceUnavailableError(String),

    #[error("Groq API error: System error - {0}")]
    SystemError(String),
}
