use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextSplitterError {
    #[error("Mismatch metadata and text")]
    MetadataTextMismatch,

    #[error("Invalid chunk overlap and size")]
    InvalidSplitterOptions,

    #[error("Error: {0}")]
    OtherError(String),
}
