//! Retrievers module
//!
//! All retrievers implement the `Retriever` trait from `crate::schemas::Retriever`.

mod error;
pub use error::*;

mod external;
pub use external::*;

mod algorithm;
pub use algorithm::*;
