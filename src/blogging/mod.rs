//! Trending-topic blogging agent.
//!
//! A [`TopicSource`] proposes subjects, the [`WorkflowEngine`] walks a chosen
//! topic through titles, outline, content and optimization, and the
//! [`InteractionLoop`] wraps that in a terminal approve/regenerate cycle that
//! ends with an [`ArtifactStore`] write.

pub mod artifact;
mod error;
pub mod interaction;
pub mod scoring;
pub mod state;
pub mod steps;
pub mod topics;
pub mod workflow;

pub use artifact::*;
pub use error::*;
pub use interaction::*;
pub use state::*;
pub use topics::*;
pub use workflow::*;
