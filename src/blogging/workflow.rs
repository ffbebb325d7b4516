use std::ops::RangeInclusive;

use crate::SharedLLM;

use super::error::WorkflowError;
use super::state::WorkflowState;
use super::steps;

/// Feedback keyword that ends the regenerate loop.
pub const APPROVE_KEYWORD: &str = "approve";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowPhase {
    /// Topic chosen, nothing generated yet.
    Fetched,
    TitlesReady,
    OutlineReady,
    ContentReady,
    Optimized,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    GenerateTitles,
    GenerateOutline,
    GenerateContent,
    OptimizeContent,
}

/// Outcome of the continuation check after optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Regenerate,
    End,
}

impl WorkflowPhase {
    /// Next step on the straight-line path. `None` where a routing decision
    /// (Optimized) or nothing (Ended) follows.
    pub fn next_step(self) -> Option<Step> {
        match self {
            WorkflowPhase::Fetched => Some(Step::GenerateTitles),
            WorkflowPhase::TitlesReady => Some(Step::GenerateOutline),
            WorkflowPhase::OutlineReady => Some(Step::GenerateContent),
            WorkflowPhase::ContentReady => Some(Step::OptimizeContent),
            WorkflowPhase::Optimized | WorkflowPhase::Ended => None,
        }
    }

    /// Phase reached by running `step` from `self`.
    ///
    /// Content generation is legal from Optimized as well; that edge is the
    /// only cycle in the graph.
    pub fn transition(self, step: Step) -> Result<WorkflowPhase, WorkflowError> {
        use WorkflowPhase::*;
        match (self, step) {
            (Fetched, Step::GenerateTitles) => Ok(TitlesReady),
            (TitlesReady, Step::GenerateOutline) => Ok(OutlineReady),
            (OutlineReady, Step::GenerateContent) | (Optimized, Step::GenerateContent) => {
                Ok(ContentReady)
            }
            (ContentReady, Step::OptimizeContent) => Ok(Optimized),
            (Ended, _) => Err(WorkflowError::AlreadyEnded),
            (from, step) => Err(WorkflowError::IllegalTransition { from, step }),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == WorkflowPhase::Ended
    }
}

pub fn is_approval(feedback: &str) -> bool {
    feedback.trim().eq_ignore_ascii_case(APPROVE_KEYWORD)
}

/// Continuation predicate evaluated after optimization.
///
/// Approval ends the run, then the attempt cap ends it regardless of feedback.
/// Anything else, including empty feedback, regenerates.
pub fn decide_workflow_path(state: &WorkflowState, max_attempts: u32) -> Route {
    log::info!("Evaluating workflow path...");
    if is_approval(&state.user_feedback) {
        log::info!("User approved content - finishing workflow");
        Route::End
    } else if state.generation_attempts >= max_attempts {
        log::info!("Maximum attempts reached - finishing workflow");
        Route::End
    } else {
        log::info!("Regenerating content with user feedback");
        Route::Regenerate
    }
}

/// Drives a [`WorkflowState`] through the generation graph.
pub struct WorkflowEngine {
    llm: SharedLLM,
    max_attempts: u32,
    word_range: Option<RangeInclusive<usize>>,
}

impl WorkflowEngine {
    pub fn new(llm: SharedLLM) -> Self {
        Self {
            llm,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            word_range: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Warn when a draft's word count falls outside `range`.
    pub fn with_word_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.word_range = Some(range);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    async fn execute(
        &self,
        phase: WorkflowPhase,
        step: Step,
        state: &mut WorkflowState,
    ) -> Result<WorkflowPhase, WorkflowError> {
        let next = phase.transition(step)?;
        let update = match step {
            Step::GenerateTitles => steps::generate_titles(state, self.llm.as_ref()).await,
            Step::GenerateOutline => steps::generate_outline(state, self.llm.as_ref()).await,
            Step::GenerateContent => steps::generate_content(state, self.llm.as_ref()).await,
            Step::OptimizeContent => steps::optimize_content(state),
        };
        state.apply(update);
        if step == Step::GenerateContent {
            self.check_word_count(state);
        }
        log::debug!("Workflow {:?} -> {:?} via {:?}", phase, next, step);
        Ok(next)
    }

    fn check_word_count(&self, state: &WorkflowState) {
        if let Some(range) = &self.word_range {
            if state.word_count > 0 && !range.contains(&state.word_count) {
                log::warn!(
                    "Draft has {} words, outside the {}-{} target",
                    state.word_count,
                    range.start(),
                    range.end()
                );
            }
        }
    }

    /// Advance until the next routing decision or the end.
    ///
    /// From `Fetched` this runs the full pass and stops at `Optimized`. From
    /// `Optimized` it first applies [`decide_workflow_path`] to the current
    /// feedback, then either ends or regenerates content and re-optimizes.
    pub async fn advance(
        &self,
        state: &mut WorkflowState,
        phase: WorkflowPhase,
    ) -> Result<WorkflowPhase, WorkflowError> {
        let mut phase = phase;
        if phase.is_terminal() {
            return Err(WorkflowError::AlreadyEnded);
        }

        if phase == WorkflowPhase::Optimized {
            match decide_workflow_path(state, self.max_attempts) {
                Route::End => return Ok(WorkflowPhase::Ended),
                Route::Regenerate => {
                    phase = self.execute(phase, Step::GenerateContent, state).await?;
                }
            }
        }

        while let Some(step) = phase.next_step() {
            phase = self.execute(phase, step, state).await?;
        }
        Ok(phase)
    }
}
