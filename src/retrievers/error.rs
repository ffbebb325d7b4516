use thiserror::Error;

/// Errors specific to retrievers
#[derive(Error, Debug)]
pub enum RetrieverError {
    #[error("Wikipedia error: {0}")]
    WikipediaError(String),

    #[error("Network request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Retriever configuration error: {0}")]
    ConfigurationError(String),

    #[error("Document processing error: {0}")]
    DocumentProcessingError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<url::ParseError> for RetrieverError {
    fn from(e: url::ParseError) -> Self {
        RetrieverError::ConfigurationError(format!("invalid URL: {}", e))
    }
}
