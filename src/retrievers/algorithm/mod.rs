//! Algorithm-based retrievers
//!
//! These retrievers rank pre-indexed documents locally and don't require external services.

mod bm25_retriever;
pub use bm25_retriever::*;
