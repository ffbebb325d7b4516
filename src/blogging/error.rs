use thiserror::Error;

use super::workflow::{Step, WorkflowPhase};

#[derive(Error, Debug)]
pub enum TopicFetchError {
    #[error("Feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Feed contained no usable topics")]
    NoCandidates,
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Artifact has no front matter block")]
    MissingFrontMatter,

    #[error("Front matter is missing `{0}`")]
    MissingField(&'static str),

    #[error("Front matter field `{field}` has invalid value `{value}`")]
    InvalidField { field: &'static str, value: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Step {step:?} cannot run from phase {from:?}")]
    IllegalTransition { from: WorkflowPhase, step: Step },

    #[error("Workflow already ended")]
    AlreadyEnded,
}

#[derive(Error, Debug)]
pub enum BloggingError {
    #[error("Console error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
