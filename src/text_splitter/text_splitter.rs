use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::TextSplitterError;
use crate::schemas::Document;

#[async_trait]
pub trait TextSplitter: Send + Sync {
    async fn split_text(&self, text: &str) -> Result<Vec<String>, TextSplitterError>;

    /// Split each text and attach a copy of its metadata to every chunk.
    async fn create_documents(
        &self,
        texts: &[String],
        metadatas: &[HashMap<String, Value>],
    ) -> Result<Vec<Document>, TextSplitterError> {
        if !metadatas.is_empty() && texts.len() != metadatas.len() {
            return Err(TextSplitterError::MetadataTextMismatch);
        }

        let mut documents = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            for chunk in self.split_text(text).await? {
                let metadata = metadatas.get(i).cloned().unwrap_or_default();
                documents.push(Document::new(chunk).with_metadata(metadata));
            }
        }
        Ok(documents)
    }
}
