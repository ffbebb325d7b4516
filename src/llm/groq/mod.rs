pub mod client;
pub mod error;
pub mod models;

pub use client::Groq;
pub use error::GroqError;
