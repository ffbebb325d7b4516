use std::path::PathBuf;
use std::sync::Arc;

use super::artifact::ArtifactStore;
use super::error::BloggingError;
use super::state::{Preferences, WorkflowState};
use super::topics::{TopicCandidate, TopicSource, DEFAULT_CATEGORY, DEFAULT_LIMIT};
use super::workflow::{is_approval, WorkflowEngine, WorkflowPhase};
use crate::console::Console;

const RULE: &str = "============================================================";
const SUMMARY_PREVIEW_CHARS: usize = 800;

pub const AUDIENCE_OPTIONS: [&str; 6] = [
    "Beginners",
    "Intermediate",
    "Advanced",
    "General Public",
    "Professionals",
    "Students",
];
pub const TONE_OPTIONS: [&str; 6] = [
    "Professional",
    "Casual",
    "Friendly",
    "Authoritative",
    "Conversational",
    "Technical",
];
pub const LENGTH_OPTIONS: [&str; 3] = [
    "Short (300-600 words)",
    "Medium (600-1200 words)",
    "Long (1200+ words)",
];
pub const CONTENT_TYPE_OPTIONS: [&str; 6] = [
    "Blog Post",
    "Tutorial",
    "Guide",
    "Analysis",
    "Review",
    "Opinion Piece",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Saved(PathBuf),
    /// The user asked to save but writing the artifact failed.
    SaveFailed,
    /// The attempt cap was reached and the user declined to save.
    Discarded,
    /// Input ended before the session finished. Nothing was written.
    Aborted,
    NoTopics,
}

/// 1-based menu choice to a 0-based index, `None` when unusable.
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

pub fn render_topics(topics: &[TopicCandidate]) -> String {
    let mut out = format!("\nTrending Topics Available:\n{RULE}\n");
    for (i, topic) in topics.iter().enumerate() {
        out.push_str(&format!("{:2}. {}\n", i + 1, topic.title));
        out.push_str(&format!(
            "    Score: {} | Comments: {} | r/{}\n",
            group_thousands(topic.score),
            topic.num_comments,
            topic.source
        ));
        if let Some(preview) = &topic.preview_text {
            out.push_str(&format!("    Preview: {}\n", preview));
        }
        out.push('\n');
    }
    out
}

pub fn render_summary(state: &WorkflowState) -> String {
    let mut out = format!("\n{RULE}\nCONTENT GENERATION COMPLETE\n{RULE}\n");
    out.push_str(&format!(
        "Word Count: {}\n",
        group_thousands(state.word_count as i64)
    ));
    out.push_str(&format!(
        "Estimated Read Time: {} minutes\n",
        state.estimated_read_time
    ));
    out.push_str(&format!("SEO Score: {}/100\n", state.scores.seo));
    out.push_str(&format!(
        "Readability Score: {}/100\n",
        state.scores.readability
    ));
    out.push_str(&format!(
        "Content Quality Score: {}/100\n",
        state.scores.quality
    ));
    out.push_str(&format!(
        "Generation Attempts: {}\n",
        state.generation_attempts
    ));

    out.push_str("\nCONTENT PREVIEW:\n----------------------------------------\n");
    let content = &state.optimized_content;
    let preview: String = content.chars().take(SUMMARY_PREVIEW_CHARS).collect();
    out.push_str(&preview);
    if content.chars().count() > SUMMARY_PREVIEW_CHARS {
        out.push_str("\n\n... [Content truncated for preview] ...");
    }
    out
}

/// Topic selection, preference capture and the approve/regenerate cycle.
pub struct InteractionLoop<C> {
    console: C,
    topics: Arc<dyn TopicSource>,
    engine: WorkflowEngine,
    store: ArtifactStore,
    category: String,
    limit: usize,
}

impl<C: Console> InteractionLoop<C> {
    pub fn new(
        console: C,
        topics: Arc<dyn TopicSource>,
        engine: WorkflowEngine,
        store: ArtifactStore,
    ) -> Self {
        Self {
            console,
            topics,
            engine,
            store,
            category: DEFAULT_CATEGORY.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_category<S: Into<String>>(mut self, category: S, limit: usize) -> Self {
        self.category = category.into();
        self.limit = limit;
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    async fn ask(&mut self, prompt: &str) -> Result<Option<String>, BloggingError> {
        Ok(self.console.read_line(prompt).await?)
    }

    async fn capture_preferences(&mut self) -> Result<Option<Preferences>, BloggingError> {
        self.console
            .print("\nContent Configuration:\n------------------------------");

        self.console
            .print(&format!("Audience options: {}", AUDIENCE_OPTIONS.join(", ")));
        let Some(audience) = self.ask("Target audience: ").await? else {
            return Ok(None);
        };
        self.console
            .print(&format!("Tone options: {}", TONE_OPTIONS.join(", ")));
        let Some(tone) = self.ask("Desired tone: ").await? else {
            return Ok(None);
        };
        self.console
            .print(&format!("Length options: {}", LENGTH_OPTIONS.join(", ")));
        let Some(length) = self.ask("Content length: ").await? else {
            return Ok(None);
        };
        self.console.print(&format!(
            "Content types: {}",
            CONTENT_TYPE_OPTIONS.join(", ")
        ));
        let Some(content_type) = self.ask("Content type: ").await? else {
            return Ok(None);
        };
        let Some(keywords) = self.ask("Keywords (comma-separated, optional): ").await? else {
            return Ok(None);
        };

        Ok(Some(Preferences::from_answers(
            &audience,
            &tone,
            &length,
            &content_type,
            &keywords,
        )))
    }

    async fn save(&mut self, state: &WorkflowState) -> SessionOutcome {
        match self.store.persist(state).await {
            Some(path) => {
                self.console
                    .print(&format!("Saved to: {}", path.display()));
                SessionOutcome::Saved(path)
            }
            None => {
                self.console.print("Content could not be saved.");
                SessionOutcome::SaveFailed
            }
        }
    }

    pub async fn run(&mut self) -> Result<SessionOutcome, BloggingError> {
        log::info!("Starting topic fetching phase");
        let mut candidates = self.topics.fetch_topics(&self.category, self.limit).await;
        if candidates.is_empty() {
            self.console.print(
                "Could not fetch topics. Please check your internet connection and try again.",
            );
            return Ok(SessionOutcome::NoTopics);
        }

        self.console.print(&render_topics(&candidates));
        let Some(choice) = self.ask("Select a topic number: ").await? else {
            return Ok(SessionOutcome::Aborted);
        };
        let index = parse_selection(&choice, candidates.len()).unwrap_or_else(|| {
            self.console.print("Invalid selection. Using the first topic.");
            0
        });
        let candidate = candidates.swap_remove(index);
        self.console
            .print(&format!("\nSelected: \"{}\"", candidate.title));

        let Some(preferences) = self.capture_preferences().await? else {
            return Ok(SessionOutcome::Aborted);
        };
        let mut state = WorkflowState::from_candidate(candidate, preferences);

        self.console
            .print("\nStarting content generation (Attempt 1)");
        let mut phase = self.engine.advance(&mut state, WorkflowPhase::Fetched).await?;

        loop {
            self.console.print(&render_summary(&state));
            self.console.print(
                "\nOptions:\n- Type 'approve' to finish and save\n- Type 'regenerate' to create new content\n- Provide specific feedback for improvements",
            );

            let Some(feedback) = self.ask("\nYour feedback: ").await? else {
                return Ok(SessionOutcome::Aborted);
            };
            state.user_feedback = feedback.trim().to_string();

            if !is_approval(&state.user_feedback)
                && state.generation_attempts < self.engine.max_attempts()
            {
                self.console.print(&format!(
                    "\nRegenerating content with your feedback (Attempt {})...",
                    state.generation_attempts + 1
                ));
            }

            phase = self.engine.advance(&mut state, phase).await?;
            if phase.is_terminal() {
                break;
            }
        }

        if is_approval(&state.user_feedback) {
            self.console.print("\nContent approved and saved!");
            return Ok(self.save(&state).await);
        }

        self.console.print(&format!(
            "\nMaximum attempts ({}) reached.",
            self.engine.max_attempts()
        ));
        let Some(answer) = self.ask("Save current version anyway? (y/n): ").await? else {
            return Ok(SessionOutcome::Aborted);
        };
        if answer.trim().eq_ignore_ascii_case("y") {
            Ok(self.save(&state).await)
        } else {
            Ok(SessionOutcome::Discarded)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use async_trait::async_trait;

    use super::*;

    struct Script {
        input: VecDeque<String>,
        output: Vec<String>,
    }

    #[async_trait]
    impl Console for Script {
        async fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.input.pop_front())
        }

        fn print(&mut self, text: &str) {
            self.output.push(text.to_string());
        }
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1", 5), Some(0));
        assert_eq!(parse_selection(" 5 ", 5), Some(4));
        assert_eq!(parse_selection("0", 5), None);
        assert_eq!(parse_selection("99", 5), None);
        assert_eq!(parse_selection("two", 5), None);
        assert_eq!(parse_selection("-1", 5), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(5000), "5,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-4500), "-4,500");
    }

    #[test]
    fn test_render_topics_is_one_based() {
        let topics = crate::blogging::topics::fallback_topics();
        let text = render_topics(&topics);
        assert!(text.contains(" 1. The Future of Artificial Intelligence in 2024"));
        assert!(text.contains("Score: 5,000 | Comments: 200 | r/technology"));
        assert!(text.contains(" 5. Mental Health in the Digital Age"));
    }

    #[test]
    fn test_summary_truncates_preview() {
        let mut state = WorkflowState::new("Topic", Preferences::default());
        state.optimized_content = "x".repeat(SUMMARY_PREVIEW_CHARS + 1);
        assert!(render_summary(&state).ends_with("[Content truncated for preview] ..."));

        state.optimized_content = "short".to_string();
        assert!(render_summary(&state).ends_with("short"));
    }

    #[tokio::test]
    async fn test_eof_at_topic_menu_aborts() {
        use crate::blogging::topics::StaticTopicSource;
        use crate::language_models::{GenerateResult, LLMError, LLM};

        struct Unused;

        #[async_trait]
        impl LLM for Unused {
            async fn generate(&self, _prompt: &str) -> Result<GenerateResult, LLMError> {
                Err(LLMError::OtherError("not expected".to_string()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let console = Script {
            input: VecDeque::new(),
            output: Vec::new(),
        };
        let mut session = InteractionLoop::new(
            console,
            Arc::new(StaticTopicSource::default()),
            WorkflowEngine::new(Arc::new(Unused)),
            ArtifactStore::new(dir.path().join("out")),
        );

        assert_eq!(session.run().await.unwrap(), SessionOutcome::Aborted);
        assert!(!dir.path().join("out").exists());
    }
}
