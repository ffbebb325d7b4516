use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::topics::TopicCandidate;

/// Average reading speed used for read-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

/// Minutes to read `word_count` words, never less than one.
pub fn estimated_read_time(word_count: usize) -> usize {
    (word_count / WORDS_PER_MINUTE).max(1)
}

/// Reader-facing choices captured once before generation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub audience: String,
    pub tone: String,
    pub length: String,
    pub content_type: String,
    pub keywords: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            audience: "General Public".to_string(),
            tone: "Conversational".to_string(),
            length: "Medium".to_string(),
            content_type: "Blog Post".to_string(),
            keywords: Vec::new(),
        }
    }
}

impl Preferences {
    /// Build preferences from raw prompt answers; blank answers take the defaults.
    ///
    /// Only the first word of the length answer is kept, so "Short (300-600 words)"
    /// becomes "Short". Keywords are comma separated.
    pub fn from_answers(
        audience: &str,
        tone: &str,
        length: &str,
        content_type: &str,
        keywords: &str,
    ) -> Self {
        let defaults = Self::default();
        let pick = |answer: &str, default: String| {
            let answer = answer.trim();
            if answer.is_empty() {
                default
            } else {
                answer.to_string()
            }
        };

        Self {
            audience: pick(audience, defaults.audience),
            tone: pick(tone, defaults.tone),
            length: length
                .split_whitespace()
                .next()
                .map(str::to_string)
                .unwrap_or(defaults.length),
            content_type: pick(content_type, defaults.content_type),
            keywords: keywords
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub seo: i32,
    pub readability: i32,
    pub quality: i32,
}

/// The record threaded through every pipeline stage.
///
/// Topic and preferences are fixed at construction; stages change the rest
/// only through [`StateUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub selected_topic: String,
    pub topic_metadata: Option<TopicCandidate>,
    pub preferences: Preferences,
    pub title_suggestions: Vec<String>,
    pub outline: String,
    pub content: String,
    pub optimized_content: String,
    pub scores: Scores,
    pub generation_attempts: u32,
    pub user_feedback: String,
    pub errors: Vec<String>,
    pub word_count: usize,
    pub estimated_read_time: usize,
    pub created_at: DateTime<Local>,
}

impl WorkflowState {
    pub fn new<S: Into<String>>(selected_topic: S, preferences: Preferences) -> Self {
        Self {
            selected_topic: selected_topic.into(),
            topic_metadata: None,
            preferences,
            title_suggestions: Vec::new(),
            outline: String::new(),
            content: String::new(),
            optimized_content: String::new(),
            scores: Scores::default(),
            generation_attempts: 0,
            user_feedback: String::new(),
            errors: Vec::new(),
            word_count: 0,
            estimated_read_time: 0,
            created_at: Local::now(),
        }
    }

    pub fn from_candidate(candidate: TopicCandidate, preferences: Preferences) -> Self {
        let mut state = Self::new(candidate.title.clone(), preferences);
        state.topic_metadata = Some(candidate);
        state
    }

    /// Shallow-merge a stage result into the state.
    ///
    /// Errors are appended, and the attempt counter can only move forward.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            title_suggestions,
            outline,
            content,
            optimized_content,
            scores,
            generation_attempts,
            word_count,
            estimated_read_time,
            errors,
        } = update;

        if let Some(v) = title_suggestions {
            self.title_suggestions = v;
        }
        if let Some(v) = outline {
            self.outline = v;
        }
        if let Some(v) = content {
            self.content = v;
        }
        if let Some(v) = optimized_content {
            self.optimized_content = v;
        }
        if let Some(v) = scores {
            self.scores = v;
        }
        if let Some(v) = generation_attempts {
            self.generation_attempts = self.generation_attempts.max(v);
        }
        if let Some(v) = word_count {
            self.word_count = v;
        }
        if let Some(v) = estimated_read_time {
            self.estimated_read_time = v;
        }
        self.errors.extend(errors);
    }
}

/// Partial state produced by one stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub title_suggestions: Option<Vec<String>>,
    pub outline: Option<String>,
    pub content: Option<String>,
    pub optimized_content: Option<String>,
    pub scores: Option<Scores>,
    pub generation_attempts: Option<u32>,
    pub word_count: Option<usize>,
    pub estimated_read_time: Option<usize>,
    pub errors: Vec<String>,
}
