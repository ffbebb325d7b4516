//! Error codes and context for reporting.

use std::fmt;

use super::QuickopediaError;
use crate::blogging::BloggingError;
use crate::language_models::LLMError;
use crate::llm::GroqError;

/// Stable numeric codes, grouped by subsystem in blocks of 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    LLMError = 1000,
    LLMRateLimit = 1002,
    LLMInvalidApiKey = 1003,

    RAGError = 2000,
    RetrieverError = 2001,
    TextSplitterError = 2002,

    WorkflowError = 3000,
    ArtifactError = 3001,
    ConsoleError = 3002,

    ChatError = 4000,

    ConfigurationError = 9000,
    IOError = 9001,
    JsonError = 9002,
    UnknownError = 9999,
}

impl ErrorCode {
    pub fn from_error(error: &QuickopediaError) -> Self {
        match error {
            QuickopediaError::LLMError(LLMError::GroqError(GroqError::RateLimitError(_))) => {
                ErrorCode::LLMRateLimit
            }
            QuickopediaError::LLMError(LLMError::GroqError(GroqError::InvalidApiKeyError(_))) => {
                ErrorCode::LLMInvalidApiKey
            }
            QuickopediaError::LLMError(_) => ErrorCode::LLMError,
            QuickopediaError::RAGError(_) => ErrorCode::RAGError,
            QuickopediaError::RetrieverError(_) => ErrorCode::RetrieverError,
            QuickopediaError::TextSplitterError(_) => ErrorCode::TextSplitterError,
            QuickopediaError::BloggingError(BloggingError::Workflow(_)) => ErrorCode::WorkflowError,
            QuickopediaError::BloggingError(BloggingError::Artifact(_)) => ErrorCode::ArtifactError,
            QuickopediaError::BloggingError(BloggingError::Io(_)) => ErrorCode::ConsoleError,
            QuickopediaError::ChatError(_) => ErrorCode::ChatError,
            QuickopediaError::ConfigurationError(_) => ErrorCode::ConfigurationError,
            QuickopediaError::IOError(_) => ErrorCode::IOError,
            QuickopediaError::JsonError(_) => ErrorCode::JsonError,
            QuickopediaError::Unknown(_) => ErrorCode::UnknownError,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::LLMError => "LLM operation failed",
            ErrorCode::LLMRateLimit => "LLM rate limit exceeded",
            ErrorCode::LLMInvalidApiKey => "LLM rejected the API key",
            ErrorCode::RAGError => "RAG operation failed",
            ErrorCode::RetrieverError => "Retriever operation failed",
            ErrorCode::TextSplitterError => "Text splitting failed",
            ErrorCode::WorkflowError => "Workflow transition rejected",
            ErrorCode::ArtifactError => "Artifact could not be written or read",
            ErrorCode::ConsoleError => "Console input failed",
            ErrorCode::ChatError => "Chat operation failed",
            ErrorCode::ConfigurationError => "Configuration error",
            ErrorCode::IOError => "IO operation failed",
            ErrorCode::JsonError => "JSON parsing/serialization failed",
            ErrorCode::UnknownError => "Unknown error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}: {}", self.as_u32(), self.description())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub operation: Option<String>,
    pub module: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref module) = self.module {
            parts.push(format!("module: {}", module));
        }
        if let Some(ref operation) = self.operation {
            parts.push(format!("operation: {}", operation));
        }

        if parts.is_empty() {
            "no context".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Context derived from the error variant alone.
pub fn error_context(error: &QuickopediaError) -> ErrorContext {
    let module = match error {
        QuickopediaError::LLMError(_) => Some("llm"),
        QuickopediaError::RAGError(_) => Some("rag"),
        QuickopediaError::RetrieverError(_) => Some("retriever"),
        QuickopediaError::TextSplitterError(_) => Some("text_splitter"),
        QuickopediaError::BloggingError(_) => Some("blogging"),
        QuickopediaError::ChatError(_) => Some("chat"),
        QuickopediaError::ConfigurationError(_) => Some("config"),
        _ => None,
    };

    ErrorContext {
        module: module.map(str::to_string),
        operation: None,
    }
}

/// One-line report: code, message and context, tagged with the operation
/// that was running when `error` surfaced.
///
/// ```rust,ignore
/// use quickopedia::error::{error_info, QuickopediaError};
///
/// let error = QuickopediaError::Unknown("boom".to_string());
/// println!("{}", error_info(&error, "startup"));
/// ```
pub fn error_info(error: &QuickopediaError, operation: &str) -> String {
    let code = ErrorCode::from_error(error);
    let context = error_context(error).with_operation(operation);
    format!("[{}] {} [{}]", code, error, context.format())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_error_code_from_error() {
        let error = QuickopediaError::LLMError(LLMError::OtherError("test".to_string()));
        assert_eq!(ErrorCode::from_error(&error), ErrorCode::LLMError);

        let error = QuickopediaError::LLMError(LLMError::GroqError(GroqError::RateLimitError(
            "slow down".to_string(),
        )));
        assert_eq!(ErrorCode::from_error(&error), ErrorCode::LLMRateLimit);
    }

    #[test]
    fn test_error_code_display() {
        let display = format!("{}", ErrorCode::WorkflowError);
        assert!(display.contains("E3000"));
        assert!(display.contains("Workflow transition rejected"));
    }

    #[test]
    fn test_error_context_format() {
        let context = ErrorContext::new()
            .with_module("blogging")
            .with_operation("save");

        assert_eq!(context.format(), "module: blogging; operation: save");
        assert_eq!(ErrorContext::new().format(), "no context");
    }

    #[test]
    fn test_error_info() {
        let error = QuickopediaError::ConfigurationError(ConfigError::Missing("GROQ_API_KEY"));
        let info = error_info(&error, "blogging session");
        assert!(info.contains("E9000"));
        assert!(info.contains("GROQ_API_KEY"));
        assert!(info.contains("module: config; operation: blogging session"));
    }
}
