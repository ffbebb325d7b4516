//! # quickopedia
//!
//! Two small LLM applications sharing one set of building blocks.
//!
//! - **Wikipedia chat**: scrape an article, preview or save the cleaned text,
//!   and answer questions about it through a retrieval-augmented chain
//!   ([`retrievers`], [`text_splitter`], [`rag`], [`chat`]).
//! - **Blogging agent**: pull trending topics from a feed and drive a
//!   titles → outline → content → optimisation pipeline with a
//!   human approve/regenerate loop ([`blogging`]).
//!
//! Both talk to a text-generation model through the [`language_models::LLM`]
//! trait; [`llm::Groq`] is the production implementation.
//!
//! ## Example
//!
//! ```ignore
//! use quickopedia::blogging::scoring;
//!
//! let score = scoring::readability("Short sentence. Another one.");
//! assert_eq!(score, 85);
//! ```

/// Blogging agent: topic source, scoring heuristics, workflow engine, interaction loop.
pub mod blogging;
/// Chat history and article content helpers for the Wikipedia assistant.
pub mod chat;
/// Environment-driven configuration for both binaries.
pub mod config;
/// Terminal input and output for the interactive binaries.
pub mod console;
/// Unified error types and utilities.
pub mod error;
/// Common LLM trait, options and results.
pub mod language_models;
/// LLM implementations.
pub mod llm;
/// Logger setup shared by the binaries.
pub mod logging;
/// Retrieval QA over scraped articles and the per-topic index cache.
pub mod rag;
/// Wikipedia scraper and BM25 retriever.
pub mod retrievers;
/// Schemas: documents and the retriever trait.
pub mod schemas;
/// Recursive character text splitter.
pub mod text_splitter;

// ============================================================================
// Type Aliases for Common Type Combinations
// ============================================================================

use std::sync::Arc;

/// Type alias for a shareable language model
pub type SharedLLM = Arc<dyn crate::language_models::llm::LLM>;

/// Type alias for a shareable retriever
pub type SharedRetriever = Arc<dyn crate::schemas::Retriever>;

/// Type alias for document list
pub type Documents = Vec<crate::schemas::Document>;
