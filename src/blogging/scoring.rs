//! Heuristic scores for generated articles.
//!
//! All three scores are deterministic functions of their text inputs. Upper
//! bounds are capped at 100; the SEO score has no lower bound.

use std::sync::LazyLock;

use regex::Regex;

use super::state::Scores;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("static sentence regex"));
static SECOND_LEVEL_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s").expect("static heading regex"));
static ANY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+\s(.+)").expect("static heading regex"));

/// Score by average sentence length. Text without sentence terminators scores 0.
pub fn readability(content: &str) -> i32 {
    let sentences = SENTENCE_END.find_iter(content).count();
    if sentences == 0 {
        return 0;
    }

    let words = content.split_whitespace().count();
    let average = words as f64 / sentences as f64;

    if average < 15.0 {
        85
    } else if average < 20.0 {
        75
    } else if average < 25.0 {
        65
    } else {
        50
    }
}

pub fn seo_score(content: &str, topic: &str, keywords: &[String]) -> i32 {
    let mut score: i32 = 60;

    if content.trim().starts_with("# ") {
        score += 15;
    }

    let words = content.split_whitespace().count();
    if (500..=2000).contains(&words) {
        score += 20;
    } else if words < 300 {
        score -= 20;
    }

    let lowered = content.to_lowercase();
    if lowered.contains(&topic.to_lowercase()) {
        score += 10;
    }

    let matched = keywords
        .iter()
        .filter(|k| lowered.contains(&k.to_lowercase()))
        .count() as i32;
    score += (matched * 3).min(15);

    if SECOND_LEVEL_HEADING.is_match(content) {
        score += 10;
    }

    score.min(100)
}

/// Structural quality of `content` measured against the outline it was written from.
pub fn content_quality(content: &str, outline: &str) -> i32 {
    let mut score: i32 = 50;

    let outline_headings = ANY_HEADING.find_iter(outline).count();
    let content_headings = ANY_HEADING.find_iter(content).count();
    if content_headings as f64 >= outline_headings as f64 * 0.7 {
        score += 20;
    }

    let lowered = content.to_lowercase();
    if lowered.contains("introduction") || content.starts_with("# ") {
        score += 10;
    }
    if lowered.contains("conclusion") || lowered.contains("summary") {
        score += 10;
    }

    let paragraphs = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.starts_with('#'))
        .count();
    if paragraphs >= 5 {
        score += 10;
    }

    score.min(100)
}

pub fn score_all(content: &str, outline: &str, topic: &str, keywords: &[String]) -> Scores {
    Scores {
        seo: seo_score(content, topic, keywords),
        readability: readability(content),
        quality: content_quality(content, outline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_readability_without_sentences_is_zero() {
        assert_eq!(readability("no terminators here"), 0);
        assert_eq!(readability(""), 0);
    }

    #[test]
    fn test_readability_buckets() {
        assert_eq!(readability("Short one. Another short one!"), 85);
        assert_eq!(readability(&format!("{}.", words(17))), 75);
        assert_eq!(readability(&format!("{}.", words(22))), 65);
        assert_eq!(readability(&format!("{}.", words(40))), 50);
    }

    #[test]
    fn test_readability_counts_runs_of_terminators_once() {
        // "Wait...what?!" has two runs: "..." and "?!"
        assert_eq!(readability("Wait...what?!"), 85);
    }

    #[test]
    fn test_seo_can_go_below_base() {
        assert_eq!(seo_score("tiny", "Unrelated", &[]), 40);
    }

    #[test]
    fn test_seo_full_marks_are_capped() {
        let keywords: Vec<String> = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let content = format!(
            "# Rust Topic\n\n## Section\n\nalpha beta gamma delta epsilon zeta {}",
            words(600)
        );
        // 60 + 15 + 20 + 10 + 15 + 10 = 130, capped
        assert_eq!(seo_score(&content, "rust topic", &keywords), 100);
    }

    #[test]
    fn test_seo_keyword_bonus_is_capped_at_fifteen() {
        let keywords: Vec<String> = (0..10).map(|i| format!("kw{i}")).collect();
        let content = keywords.join(" ");
        let base = seo_score(&content, "absent", &[]);
        assert_eq!(seo_score(&content, "absent", &keywords), base + 15);
    }

    #[test]
    fn test_quality_base_for_plain_text() {
        // no outline headings: 0 >= 0 earns the structure bonus
        assert_eq!(content_quality("plain", ""), 70);
        assert_eq!(content_quality("plain", "# A\n# B\n# C"), 50);
    }

    #[test]
    fn test_quality_all_bonuses() {
        let content = "# Title\n\nIntroduction here.\n\nP2\n\nP3\n\nP4\n\nIn conclusion.";
        assert_eq!(content_quality(content, "# Title"), 100);
    }

    #[test]
    fn test_quality_heading_ratio() {
        let outline = "# A\n## B\n## C\n## D\n## E\n## F\n## G\n## H\n## I\n## J";
        let seven = "# A\n## B\n## C\n## D\n## E\n## F\n## G";
        let six = "# A\n## B\n## C\n## D\n## E\n## F";
        assert_eq!(content_quality(seven, outline), 80);
        assert_eq!(content_quality(six, outline), 60);
    }

    #[test]
    fn test_score_all_is_deterministic() {
        let content = "# Topic\n\nSome text. More text.";
        let a = score_all(content, "# Topic", "Topic", &[]);
        let b = score_all(content, "# Topic", "Topic", &[]);
        assert_eq!(a, b);
    }
}
