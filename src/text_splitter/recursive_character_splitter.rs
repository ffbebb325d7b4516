use async_trait::async_trait;

use super::{TextSplitter, TextSplitterError};

/// Configuration for RecursiveCharacterTextSplitter
///
/// Sizes are measured in characters, not bytes.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitterOptions {
    /// Maximum chunk size (in characters)
    pub chunk_size: usize,
    /// Overlap between chunks (in characters)
    pub chunk_overlap: usize,
    /// List of separators to try in order
    pub separators: Vec<String>,
    /// Whether to trim whitespace from chunks
    pub trim_chunks: bool,
}

impl Default for RecursiveCharacterTextSplitterOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveCharacterTextSplitterOptions {
    pub fn new() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                "".to_string(),
            ],
            trim_chunks: true,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    pub fn with_trim_chunks(mut self, trim_chunks: bool) -> Self {
        self.trim_chunks = trim_chunks;
        self
    }
}

/// RecursiveCharacterTextSplitter splits text recursively by trying different separators
///
/// It attempts to split text on a list of separators in order, trying to keep
/// larger semantic units (paragraphs, lines, words) intact.
///
/// Default separators: ["\n\n", "\n", " ", ""]
pub struct RecursiveCharacterTextSplitter {
    options: RecursiveCharacterTextSplitterOptions,
}

impl Default for RecursiveCharacterTextSplitter {
    fn default() -> Self {
        Self::new()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

impl RecursiveCharacterTextSplitter {
    /// Create a new RecursiveCharacterTextSplitter with default options
    pub fn new() -> Self {
        Self::with_options(RecursiveCharacterTextSplitterOptions::default())
    }

    /// Create a new RecursiveCharacterTextSplitter with custom options
    pub fn with_options(options: RecursiveCharacterTextSplitterOptions) -> Self {
        Self { options }
    }

    fn finish_chunk(&self, chunk: &str, chunks: &mut Vec<String>) {
        let chunk = if self.options.trim_chunks {
            chunk.trim()
        } else {
            chunk
        };
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
    }

    /// Recursively split text using the separator list
    fn split_text_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }

        let (separator, remaining_separators) = match separators.split_first() {
            Some((sep, rest)) if !sep.is_empty() => (sep, rest),
            _ => return self.split_by_characters(text),
        };

        let mut chunks = Vec::new();
        let mut current_chunk = String::new();

        for part in text.split(separator.as_str()) {
            let candidate_len = if current_chunk.is_empty() {
                char_len(part)
            } else {
                char_len(&current_chunk) + char_len(separator) + char_len(part)
            };

            if candidate_len <= self.options.chunk_size {
                if !current_chunk.is_empty() {
                    current_chunk.push_str(separator);
                }
                current_chunk.push_str(part);
                continue;
            }

            // Current chunk is full, save it and start a new one
            self.finish_chunk(&current_chunk, &mut chunks);
            current_chunk.clear();

            if char_len(part) > self.options.chunk_size {
                chunks.extend(self.split_text_recursive(part, remaining_separators));
            } else {
                current_chunk.push_str(part);
            }
        }

        self.finish_chunk(&current_chunk, &mut chunks);
        chunks
    }

    /// Split text by characters when no separators work
    fn split_by_characters(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();

        for window in chars.chunks(self.options.chunk_size) {
            let chunk: String = window.iter().collect();
            self.finish_chunk(&chunk, &mut chunks);
        }

        chunks
    }

    /// Prefix every chunk after the first with the tail of its predecessor
    fn apply_overlap(&self, chunks: Vec<String>) -> Vec<String> {
        if self.options.chunk_overlap == 0 || chunks.len() <= 1 {
            return chunks;
        }

        let mut overlapped = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                overlapped.push(chunk.clone());
                continue;
            }

            let prev_chunk = &chunks[i - 1];
            let skip = char_len(prev_chunk).saturating_sub(self.options.chunk_overlap);
            let overlap_text: String = prev_chunk.chars().skip(skip).collect();
            let overlap_text = overlap_text.trim_start();

            let mut new_chunk = String::new();
            if !overlap_text.is_empty() {
                new_chunk.push_str(overlap_text);
                new_chunk.push(' ');
            }
            new_chunk.push_str(chunk);
            overlapped.push(new_chunk);
        }

        overlapped
    }
}

#[async_trait]
impl TextSplitter for RecursiveCharacterTextSplitter {
    async fn split_text(&self, text: &str) -> Result<Vec<String>, TextSplitterError> {
        if text.is_empty() {
            return Ok(vec![]);
        }

        if self.options.chunk_size == 0 || self.options.chunk_overlap >= self.options.chunk_size {
            return Err(TextSplitterError::InvalidSplitterOptions);
        }

        let chunks = self.split_text_recursive(text, &self.options.separators);
        Ok(self.apply_overlap(chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> RecursiveCharacterTextSplitter {
        RecursiveCharacterTextSplitter::with_options(
            RecursiveCharacterTextSplitterOptions::new()
                .with_chunk_size(chunk_size)
                .with_chunk_overlap(chunk_overlap),
        )
    }

    #[tokio::test]
    async fn test_short_text_is_single_chunk() {
        let chunks = splitter(100, 10).split_text("hello world").await.unwrap();
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[tokio::test]
    async fn test_prefers_paragraph_boundaries() {
        let text = "first paragraph here\n\nsecond paragraph here";
        let chunks = splitter(25, 0).split_text(text).await.unwrap();
        assert_eq!(chunks, vec!["first paragraph here", "second paragraph here"]);
    }

    #[tokio::test]
    async fn test_overlap_carries_previous_tail() {
        let text = "aaaa bbbb\n\ncccc dddd";
        let chunks = splitter(10, 4).split_text(text).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "bbbb cccc dddd");
    }

    #[tokio::test]
    async fn test_multibyte_text_does_not_panic() {
        let text = "ééééééééééééééééééééééééé";
        let chunks = splitter(10, 2).split_text(text).await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].chars().count() == 10);
    }

    #[tokio::test]
    async fn test_invalid_options_rejected() {
        assert!(matches!(
            splitter(0, 0).split_text("x").await,
            Err(TextSplitterError::InvalidSplitterOptions)
        ));
        assert!(matches!(
            splitter(10, 10).split_text("x").await,
            Err(TextSplitterError::InvalidSplitterOptions)
        ));
    }

    #[tokio::test]
    async fn test_create_documents_copies_metadata() {
        let mut metadata = std::collections::HashMap::new();
        metadata.insert("topic".to_string(), serde_json::Value::from("Rust"));
        let docs = splitter(10, 0)
            .create_documents(&["one two\n\nthree four".to_string()], &[metadata])
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.metadata_str("topic") == Some("Rust")));
    }
}
