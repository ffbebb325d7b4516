use crate::{rag::RAGError, schemas::Document, SharedLLM, SharedRetriever};

pub const DEFAULT_QA_PROMPT: &str = r#"You are a helpful assistant answering question based on the wikipedia content.

Content: {context}
Question: {question}

Instructions:
- Answer based ONLY on the provided context
- If information isn't in the context, say so clearly
- Be conversational and comprehensive
- Include relevant details from the context
Answer: "#;

#[derive(Debug, Clone)]
pub struct QaResult {
    pub answer: String,
    pub source_documents: Vec<Document>,
}

/// Substitute `{context}` and `{question}` in a single left-to-right pass, so
/// placeholder text inside the substituted values is left alone.
fn fill_template(template: &str, context: &str, question: &str) -> String {
    let mut out = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;
    loop {
        let next = [("{context}", context), ("{question}", question)]
            .into_iter()
            .filter_map(|(placeholder, value)| {
                rest.find(placeholder).map(|i| (i, placeholder, value))
            })
            .min_by_key(|(i, _, _)| *i);

        match next {
            Some((i, placeholder, value)) => {
                out.push_str(&rest[..i]);
                out.push_str(value);
                rest = &rest[i + placeholder.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// "Stuff" retrieval QA: every retrieved chunk goes into one prompt.
pub struct RetrievalQa {
    llm: SharedLLM,
    retriever: SharedRetriever,
    prompt_template: String,
}

impl RetrievalQa {
    pub fn build_prompt(&self, question: &str, documents: &[Document]) -> String {
        let context = documents
            .iter()
            .map(|doc| doc.page_content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        fill_template(&self.prompt_template, &context, question)
    }

    pub async fn ask(&self, question: &str) -> Result<QaResult, RAGError> {
        let source_documents = self.retriever.get_relevant_documents(question).await?;
        log::debug!("Retrieved {} chunks for question", source_documents.len());

        let prompt = self.build_prompt(question, &source_documents);
        let answer = self.llm.invoke(&prompt).await?;

        Ok(QaResult {
            answer,
            source_documents,
        })
    }
}

pub struct RetrievalQaBuilder {
    llm: Option<SharedLLM>,
    retriever: Option<SharedRetriever>,
    prompt_template: String,
}

impl Default for RetrievalQaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetrievalQaBuilder {
    pub fn new() -> Self {
        Self {
            llm: None,
            retriever: None,
            prompt_template: DEFAULT_QA_PROMPT.to_string(),
        }
    }

    pub fn with_llm(mut self, llm: SharedLLM) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_retriever(mut self, retriever: SharedRetriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Template must contain `{context}` and `{question}`.
    pub fn with_prompt_template<S: Into<String>>(mut self, template: S) -> Self {
        self.prompt_template = template.into();
        self
    }

    pub fn build(self) -> Result<RetrievalQa, RAGError> {
        let llm = self
            .llm
            .ok_or_else(|| RAGError::InvalidConfiguration("LLM must be set".to_string()))?;
        let retriever = self
            .retriever
            .ok_or_else(|| RAGError::InvalidConfiguration("Retriever must be set".to_string()))?;

        if !self.prompt_template.contains("{context}") || !self.prompt_template.contains("{question}") {
            return Err(RAGError::InvalidConfiguration(
                "prompt template needs {context} and {question}".to_string(),
            ));
        }

        Ok(RetrievalQa {
            llm,
            retriever,
            prompt_template: self.prompt_template,
        })
    }
}
