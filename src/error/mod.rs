//! Crate-wide error type.
//!
//! Each module keeps its own error enum; [`QuickopediaError`] wraps them all so
//! the binaries can propagate anything with `?` and report it in one place.

mod utils;

pub use utils::{error_context, error_info, ErrorCode, ErrorContext};

pub use crate::blogging::{ArtifactError, BloggingError, TopicFetchError, WorkflowError};
pub use crate::chat::ChatError;
pub use crate::config::ConfigError;
pub use crate::language_models::LLMError;
pub use crate::rag::RAGError;
pub use crate::retrievers::RetrieverError;
pub use crate::text_splitter::TextSplitterError;

#[derive(thiserror::Error, Debug)]
pub enum QuickopediaError {
    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("RAG error: {0}")]
    RAGError(#[from] RAGError),

    #[error("Retriever error: {0}")]
    RetrieverError(#[from] RetrieverError),

    #[error("Text splitter error: {0}")]
    TextSplitterError(#[from] TextSplitterError),

    #[error("Blogging error: {0}")]
    BloggingError(#[from] BloggingError),

    #[error("Chat error: {0}")]
    ChatError(#[from] ChatError),

    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigError),

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<WorkflowError> for QuickopediaError {
    fn from(e: WorkflowError) -> Self {
        QuickopediaError::BloggingError(e.into())
    }
}

impl From<ArtifactError> for QuickopediaError {
    fn from(e: ArtifactError) -> Self {
        QuickopediaError::BloggingError(e.into())
    }
}

pub type Result<T> = std::result::Result<T, QuickopediaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_errors_convert() {
        let err: QuickopediaError = LLMError::OtherError("test".to_string()).into();
        assert!(matches!(err, QuickopediaError::LLMError(_)));

        let err: QuickopediaError = RetrieverError::WikipediaError("down".to_string()).into();
        assert!(matches!(err, QuickopediaError::RetrieverError(_)));

        let err: QuickopediaError = ConfigError::Missing("GROQ_API_KEY").into();
        assert!(matches!(err, QuickopediaError::ConfigurationError(_)));
    }

    #[test]
    fn test_workflow_errors_nest_under_blogging() {
        let err: QuickopediaError = WorkflowError::AlreadyEnded.into();
        assert!(matches!(
            err,
            QuickopediaError::BloggingError(BloggingError::Workflow(WorkflowError::AlreadyEnded))
        ));
    }
}
