//! External index retrievers
//!
//! These retrievers fetch documents from external sources, currently Wikipedia article pages.

mod wikipedia_retriever;
pub use wikipedia_retriever::*;
