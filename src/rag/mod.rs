use thiserror::Error;

use crate::{language_models::LLMError, retrievers::RetrieverError, text_splitter::TextSplitterError};

/// RAG-specific error types
#[derive(Error, Debug)]
pub enum RAGError {
    #[error("Retriever error: {0}")]
    RetrieverError(#[from] RetrieverError),

    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("Text splitter error: {0}")]
    TextSplitterError(#[from] TextSplitterError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

mod index_cache;
mod qa_chain;
mod wiki_qa;

pub use index_cache::{convert_text_to_documents, topic_key, TopicIndexCache};
pub use qa_chain::{QaResult, RetrievalQa, RetrievalQaBuilder, DEFAULT_QA_PROMPT};
pub use wiki_qa::{WikiQa, NOT_FOUND_ANSWER};
