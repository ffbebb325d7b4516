use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    rag::RAGError,
    retrievers::{BM25Retriever, BM25RetrieverConfig},
    schemas::Document,
    text_splitter::{
        RecursiveCharacterTextSplitter, RecursiveCharacterTextSplitterOptions, TextSplitter,
    },
};

/// Cache key for a topic: lowercase with spaces replaced by underscores.
pub fn topic_key(topic: &str) -> String {
    topic.trim().to_lowercase().replace(' ', "_")
}

/// Split article text into chunk documents tagged with their topic.
pub async fn convert_text_to_documents(
    splitter: &dyn TextSplitter,
    text: &str,
    topic: &str,
) -> Result<Vec<Document>, RAGError> {
    let chunks = splitter.split_text(text).await?;
    Ok(chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut metadata = HashMap::new();
            metadata.insert(
                "source".to_string(),
                Value::from(format!("Wikipedia: {}", topic)),
            );
            metadata.insert("chunk_id".to_string(), Value::from(i));
            metadata.insert("topic".to_string(), Value::from(topic));
            Document::new(chunk).with_metadata(metadata)
        })
        .collect())
}

/// Per-topic retrieval indexes owned by the hosting process.
///
/// Entries are never evicted; they live as long as the cache does.
pub struct TopicIndexCache {
    splitter: RecursiveCharacterTextSplitter,
    top_k: usize,
    entries: HashMap<String, Arc<BM25Retriever>>,
}

impl Default for TopicIndexCache {
    fn default() -> Self {
        Self::new(RecursiveCharacterTextSplitterOptions::default(), 3)
    }
}

impl TopicIndexCache {
    pub fn new(options: RecursiveCharacterTextSplitterOptions, top_k: usize) -> Self {
        Self {
            splitter: RecursiveCharacterTextSplitter::with_options(options),
            top_k,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, topic: &str) -> Option<Arc<BM25Retriever>> {
        self.entries.get(&topic_key(topic)).cloned()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.entries.contains_key(&topic_key(topic))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the index for `topic`, building it from `text` only on first use.
    pub async fn populate(
        &mut self,
        text: &str,
        topic: &str,
    ) -> Result<Arc<BM25Retriever>, RAGError> {
        let key = topic_key(topic);
        if let Some(existing) = self.entries.get(&key) {
            log::debug!("Reusing cached index for '{}'", key);
            return Ok(Arc::clone(existing));
        }

        let documents = convert_text_to_documents(&self.splitter, text, topic).await?;
        log::info!("Indexed {} chunks for '{}'", documents.len(), key);

        let retriever = Arc::new(BM25Retriever::with_config(
            documents,
            BM25RetrieverConfig {
                top_k: self.top_k,
                ..BM25RetrieverConfig::default()
            },
        ));
        self.entries.insert(key, Arc::clone(&retriever));
        Ok(retriever)
    }
}
