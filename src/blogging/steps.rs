//! The four generation stages.
//!
//! Each stage reads the current [`WorkflowState`] and returns a [`StateUpdate`].
//! Model failures never escape a stage: they are logged, recorded in
//! `errors`, and replaced by placeholder output so the workflow keeps moving.

use std::sync::LazyLock;

use regex::Regex;

use crate::language_models::llm::LLM;

use super::scoring;
use super::state::{estimated_read_time, StateUpdate, WorkflowState};

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("static numbered line regex"));

/// Word range requested for a length preference.
pub fn length_guideline(length: &str) -> &'static str {
    match length {
        "Short" => "300-600 words",
        "Medium" => "600-1200 words",
        "Long" => "1200-2500 words",
        _ => "Medium length",
    }
}

/// Keep only the numbered lines of a model reply, trimmed.
pub fn parse_title_suggestions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && NUMBERED_LINE.is_match(line))
        .map(str::to_string)
        .collect()
}

/// Strip a leading "1." through "5." list marker from a suggested title.
pub fn normalize_title(title: &str) -> &str {
    let marked = ["1.", "2.", "3.", "4.", "5."]
        .iter()
        .any(|marker| title.starts_with(marker));
    if !marked {
        return title;
    }
    match title.split_once('.') {
        Some((_, rest)) => rest.trim(),
        None => title,
    }
}

pub fn titles_prompt(state: &WorkflowState) -> String {
    let prefs = &state.preferences;
    format!(
        r#"Generate 5 compelling, SEO-friendly blog post titles for the following topic:

Topic: "{topic}"
Target Audience: {audience}
Tone: {tone}
Content Type: {content_type}

Each title should be:
- Engaging and click-worthy
- SEO-optimized with relevant keywords
- Appropriate for the target audience
- Between 40-60 characters

Return only the titles, numbered 1-5."#,
        topic = state.selected_topic,
        audience = prefs.audience,
        tone = prefs.tone,
        content_type = prefs.content_type,
    )
}

pub fn outline_prompt(state: &WorkflowState) -> String {
    let prefs = &state.preferences;
    format!(
        r#"Create a comprehensive, well-structured outline for a {content_type} about:

Topic: "{topic}"
Target Audience: {audience}
Tone: {tone}
Desired Length: {length}
Keywords to include: {keywords}

The outline should include:
1. An engaging, SEO-optimized title
2. Introduction with hook and thesis
3. 4-6 main sections with clear H2 headings
4. 2-3 subsections (H3) under each main section
5. Key points and supporting details
6. Conclusion with call-to-action
7. Suggested meta description (150 characters)

Format in markdown with proper heading hierarchy."#,
        content_type = prefs.content_type,
        topic = state.selected_topic,
        audience = prefs.audience,
        tone = prefs.tone,
        length = prefs.length,
        keywords = prefs.keywords.join(", "),
    )
}

/// Content prompt. Reviewer feedback and the draft it refers to are appended
/// whenever the previous round ended without approval.
pub fn content_prompt(state: &WorkflowState) -> String {
    let prefs = &state.preferences;
    let mut prompt = format!(
        r#"Write a complete, high-quality {content_type} based on this outline:

{outline}

Guidelines:
- Target Audience: {audience}
- Tone: {tone}
- Length: {length}
- Keywords to naturally incorporate: {keywords}

Requirements:
- Write in markdown format
- Include proper headings (H1, H2, H3)
- Add engaging introduction and strong conclusion
- Use bullet points and numbered lists where appropriate
- Include actionable insights and examples
- Ensure smooth transitions between sections
- Optimize for readability and SEO"#,
        content_type = prefs.content_type,
        outline = state.outline,
        audience = prefs.audience,
        tone = prefs.tone,
        length = length_guideline(&prefs.length),
        keywords = prefs.keywords.join(", "),
    );

    let feedback = state.user_feedback.trim();
    if !feedback.is_empty() {
        prompt.push_str("\n\nThe previous draft was reviewed. Reviewer feedback:\n");
        prompt.push_str(feedback);
        if !state.content.is_empty() {
            prompt.push_str("\n\nPrevious draft:\n");
            prompt.push_str(&state.content);
        }
        prompt.push_str("\n\nAddress the feedback in the new version.");
    }

    prompt.push_str("\n\nWrite the complete article without any meta-commentary.");
    prompt
}

pub async fn generate_titles(state: &WorkflowState, llm: &dyn LLM) -> StateUpdate {
    log::info!("Generating title suggestions...");
    match llm.invoke(&titles_prompt(state)).await {
        Ok(reply) => {
            log::info!("Title suggestions generated successfully");
            StateUpdate {
                title_suggestions: Some(parse_title_suggestions(&reply)),
                ..StateUpdate::default()
            }
        }
        Err(e) => {
            log::error!("Error generating titles: {}", e);
            StateUpdate {
                title_suggestions: Some(vec![state.selected_topic.clone()]),
                errors: vec![e.to_string()],
                ..StateUpdate::default()
            }
        }
    }
}

pub async fn generate_outline(state: &WorkflowState, llm: &dyn LLM) -> StateUpdate {
    log::info!("Generating detailed outline...");
    match llm.invoke(&outline_prompt(state)).await {
        Ok(outline) => {
            log::info!("Outline generated successfully");
            StateUpdate {
                outline: Some(outline),
                ..StateUpdate::default()
            }
        }
        Err(e) => {
            log::error!("Error generating outline: {}", e);
            StateUpdate {
                outline: Some(format!(
                    "# {}\n\nFailed to generate detailed outline.",
                    state.selected_topic
                )),
                errors: vec![e.to_string()],
                ..StateUpdate::default()
            }
        }
    }
}

/// Draft the article. The attempt counter moves forward whether or not the model call succeeds.
pub async fn generate_content(state: &WorkflowState, llm: &dyn LLM) -> StateUpdate {
    log::info!("Generating blog content...");
    let attempt = state.generation_attempts + 1;

    match llm.invoke(&content_prompt(state)).await {
        Ok(content) => {
            let word_count = content.split_whitespace().count();
            let read_time = estimated_read_time(word_count);
            log::info!(
                "Content generated: {} words, ~{} min read",
                word_count,
                read_time
            );
            StateUpdate {
                content: Some(content),
                word_count: Some(word_count),
                estimated_read_time: Some(read_time),
                generation_attempts: Some(attempt),
                ..StateUpdate::default()
            }
        }
        Err(e) => {
            log::error!("Error generating content: {}", e);
            StateUpdate {
                content: Some(format!(
                    "# {}\n\nFailed to generate content.",
                    state.selected_topic
                )),
                word_count: Some(0),
                estimated_read_time: Some(0),
                generation_attempts: Some(attempt),
                errors: vec![e.to_string()],
                ..StateUpdate::default()
            }
        }
    }
}

/// Give the draft a top-level heading if it lacks one, then rescore it.
pub fn optimize_content(state: &WorkflowState) -> StateUpdate {
    log::info!("Optimizing content for SEO and readability...");

    let optimized = if state.content.trim().starts_with("# ") {
        state.content.clone()
    } else {
        let title = state
            .title_suggestions
            .first()
            .map(|t| normalize_title(t))
            .unwrap_or(state.selected_topic.as_str());
        format!("# {}\n\n{}", title, state.content)
    };

    let scores = scoring::score_all(
        &optimized,
        &state.outline,
        &state.selected_topic,
        &state.preferences.keywords,
    );
    log::info!(
        "Optimization complete - SEO: {}, Readability: {}, Quality: {}",
        scores.seo,
        scores.readability,
        scores.quality
    );

    StateUpdate {
        optimized_content: Some(optimized),
        scores: Some(scores),
        ..StateUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::blogging::state::Preferences;
    use crate::language_models::{GenerateResult, LLMError};

    struct Canned(&'static str);

    #[async_trait]
    impl LLM for Canned {
        async fn generate(&self, _prompt: &str) -> Result<GenerateResult, LLMError> {
            Ok(GenerateResult {
                tokens: None,
                generation: self.0.to_string(),
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl LLM for Failing {
        async fn generate(&self, _prompt: &str) -> Result<GenerateResult, LLMError> {
            Err(LLMError::OtherError("model offline".to_string()))
        }
    }

    fn state() -> WorkflowState {
        WorkflowState::new("Rust Ownership", Preferences::default())
    }

    #[test]
    fn test_length_guideline() {
        assert_eq!(length_guideline("Short"), "300-600 words");
        assert_eq!(length_guideline("Long"), "1200-2500 words");
        assert_eq!(length_guideline("Epic"), "Medium length");
    }

    #[test]
    fn test_parse_titles_keeps_numbered_lines() {
        let reply = "Here you go:\n1. First\n  2. Second  \n\n- bullet\n3.Third";
        assert_eq!(
            parse_title_suggestions(reply),
            vec!["1. First", "2. Second", "3.Third"]
        );
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("1. My Great Title"), "My Great Title");
        assert_eq!(normalize_title("Plain title"), "Plain title");
        assert_eq!(normalize_title("6. Left alone"), "6. Left alone");
    }

    #[test]
    fn test_optimize_injects_first_title() {
        let mut s = state();
        s.content = "Intro text".to_string();
        s.title_suggestions = vec!["1. My Great Title".to_string()];
        let update = optimize_content(&s);
        assert_eq!(
            update.optimized_content.as_deref(),
            Some("# My Great Title\n\nIntro text")
        );
        assert!(update.scores.is_some());
    }

    #[test]
    fn test_optimize_falls_back_to_topic() {
        let mut s = state();
        s.content = "Body".to_string();
        let update = optimize_content(&s);
        assert_eq!(
            update.optimized_content.as_deref(),
            Some("# Rust Ownership\n\nBody")
        );
    }

    #[test]
    fn test_optimize_keeps_existing_heading() {
        let mut s = state();
        s.content = "# Already\n\nBody".to_string();
        s.title_suggestions = vec!["1. Other".to_string()];
        let update = optimize_content(&s);
        assert_eq!(update.optimized_content.as_deref(), Some("# Already\n\nBody"));
    }

    #[test]
    fn test_content_prompt_includes_feedback_and_draft() {
        let mut s = state();
        s.outline = "# Outline".to_string();
        assert!(!content_prompt(&s).contains("Reviewer feedback"));

        s.user_feedback = "More examples please".to_string();
        s.content = "old draft".to_string();
        let prompt = content_prompt(&s);
        assert!(prompt.contains("More examples please"));
        assert!(prompt.contains("old draft"));
        assert!(prompt.contains("600-1200 words"));
    }

    #[tokio::test]
    async fn test_generate_content_counts_words() {
        let s = state();
        let update = generate_content(&s, &Canned("one two three")).await;
        assert_eq!(update.word_count, Some(3));
        assert_eq!(update.estimated_read_time, Some(1));
        assert_eq!(update.generation_attempts, Some(1));
    }

    #[tokio::test]
    async fn test_generate_content_failure_still_counts_attempt() {
        let mut s = state();
        s.generation_attempts = 1;
        let update = generate_content(&s, &Failing).await;
        assert_eq!(
            update.content.as_deref(),
            Some("# Rust Ownership\n\nFailed to generate content.")
        );
        assert_eq!(update.word_count, Some(0));
        assert_eq!(update.estimated_read_time, Some(0));
        assert_eq!(update.generation_attempts, Some(2));
        assert_eq!(update.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_title_and_outline_failures_use_placeholders() {
        let s = state();
        let titles = generate_titles(&s, &Failing).await;
        assert_eq!(titles.title_suggestions, Some(vec!["Rust Ownership".to_string()]));

        let outline = generate_outline(&s, &Failing).await;
        assert_eq!(
            outline.outline.as_deref(),
            Some("# Rust Ownership\n\nFailed to generate detailed outline.")
        );
    }
}
