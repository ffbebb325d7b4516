use thiserror::Error;

use crate::rag::RAGError;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Please enter a question before sending")]
    EmptyQuestion,

    #[error("Refusing to save to unsafe file name: {0}")]
    InvalidFileName(String),

    #[error(transparent)]
    RAGError(#[from] RAGError),

    #[error("Could not write content: {0}")]
    Io(#[from] std::io::Error),
}
