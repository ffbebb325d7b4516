//! Markdown artifacts with a front-matter header.
//!
//! Layout:
//!
//! ```text
//! ---
//! title: "..."
//! ...
//! created_at: "..."
//! ---
//!
//! <optimized content>
//! ```
//!
//! String values are JSON-quoted and keywords are a JSON list, so a saved file
//! parses back into exactly the values that were written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::ArtifactError;
use super::state::WorkflowState;

const DELIMITER: &str = "---";

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static slug regex"));
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("static slug regex"));

/// Lowercase, hyphen-separated form of a topic, suitable for filenames.
pub fn slugify(topic: &str) -> String {
    let cleaned = NON_SLUG_CHARS.replace_all(topic, "");
    let hyphenated = SLUG_SEPARATORS.replace_all(&cleaned, "-");
    let slug = hyphenated.trim_matches('-').to_lowercase();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub audience: String,
    pub tone: String,
    pub length: String,
    pub content_type: String,
    pub keywords: Vec<String>,
    pub word_count: usize,
    pub read_time: usize,
    pub seo_score: i32,
    pub readability_score: i32,
    pub quality_score: i32,
    pub created_at: String,
}

impl FrontMatter {
    pub fn from_state(state: &WorkflowState) -> Self {
        let prefs = &state.preferences;
        Self {
            title: state.selected_topic.clone(),
            audience: prefs.audience.clone(),
            tone: prefs.tone.clone(),
            length: prefs.length.clone(),
            content_type: prefs.content_type.clone(),
            keywords: prefs.keywords.clone(),
            word_count: state.word_count,
            read_time: state.estimated_read_time,
            seo_score: state.scores.seo,
            readability_score: state.scores.readability,
            quality_score: state.scores.quality,
            created_at: state.created_at.to_rfc3339(),
        }
    }

    fn render(&self) -> Result<String, ArtifactError> {
        let quote = |s: &str| serde_json::to_string(s);
        let lines = [
            format!("title: {}", quote(&self.title)?),
            format!("audience: {}", quote(&self.audience)?),
            format!("tone: {}", quote(&self.tone)?),
            format!("length: {}", quote(&self.length)?),
            format!("content_type: {}", quote(&self.content_type)?),
            format!("keywords: {}", serde_json::to_string(&self.keywords)?),
            format!("word_count: {}", self.word_count),
            format!("read_time: {}", self.read_time),
            format!("seo_score: {}", self.seo_score),
            format!("readability_score: {}", self.readability_score),
            format!("quality_score: {}", self.quality_score),
            format!("created_at: {}", quote(&self.created_at)?),
        ];
        Ok(lines.join("\n"))
    }

    fn parse(block: &str) -> Result<Self, ArtifactError> {
        let fields: HashMap<&str, &str> = block
            .lines()
            .filter_map(|line| line.split_once(": "))
            .collect();

        fn field<T: DeserializeOwned>(
            fields: &HashMap<&str, &str>,
            name: &'static str,
        ) -> Result<T, ArtifactError> {
            let raw = fields.get(name).ok_or(ArtifactError::MissingField(name))?;
            serde_json::from_str(raw).map_err(|_| ArtifactError::InvalidField {
                field: name,
                value: raw.to_string(),
            })
        }

        Ok(Self {
            title: field(&fields, "title")?,
            audience: field(&fields, "audience")?,
            tone: field(&fields, "tone")?,
            length: field(&fields, "length")?,
            content_type: field(&fields, "content_type")?,
            keywords: field(&fields, "keywords")?,
            word_count: field(&fields, "word_count")?,
            read_time: field(&fields, "read_time")?,
            seo_score: field(&fields, "seo_score")?,
            readability_score: field(&fields, "readability_score")?,
            quality_score: field(&fields, "quality_score")?,
            created_at: field(&fields, "created_at")?,
        })
    }
}

/// A finished article: metadata header plus markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Artifact {
    pub fn from_state(state: &WorkflowState) -> Self {
        Self {
            front_matter: FrontMatter::from_state(state),
            body: state.optimized_content.clone(),
        }
    }

    pub fn render(&self) -> Result<String, ArtifactError> {
        Ok(format!(
            "{DELIMITER}\n{}\n{DELIMITER}\n\n{}",
            self.front_matter.render()?,
            self.body
        ))
    }

    pub fn parse(text: &str) -> Result<Self, ArtifactError> {
        let rest = text
            .strip_prefix("---\n")
            .ok_or(ArtifactError::MissingFrontMatter)?;
        let (block, body) = rest
            .split_once("\n---\n\n")
            .ok_or(ArtifactError::MissingFrontMatter)?;

        Ok(Self {
            front_matter: FrontMatter::parse(block)?,
            body: body.to_string(),
        })
    }
}

/// Writes artifacts under a single output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save `state` as `{slug}_{timestamp}.md`, adding a counter if that name is taken.
    pub async fn save(
        &self,
        state: &WorkflowState,
        now: DateTime<Local>,
    ) -> Result<PathBuf, ArtifactError> {
        fs::create_dir_all(&self.output_dir).await?;

        let contents = Artifact::from_state(state).render()?;
        let stem = format!(
            "{}_{}",
            slugify(&state.selected_topic),
            now.format("%Y%m%d_%H%M%S")
        );

        let mut counter = 0u32;
        loop {
            let name = if counter == 0 {
                format!("{stem}.md")
            } else {
                format!("{stem}_{counter}.md")
            };
            let path = self.output_dir.join(name);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(contents.as_bytes()).await?;
                    file.flush().await?;
                    log::info!("Content saved to {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Like [`save`](Self::save) with the current time, logging failures instead of returning them.
    pub async fn persist(&self, state: &WorkflowState) -> Option<PathBuf> {
        match self.save(state, Local::now()).await {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("Error saving content: {}", e);
                None
            }
        }
    }

    pub async fn load(path: &Path) -> Result<Artifact, ArtifactError> {
        let text = fs::read_to_string(path).await?;
        Artifact::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blogging::state::{Preferences, Scores};

    fn finished_state() -> WorkflowState {
        let prefs = Preferences {
            keywords: vec!["rust".to_string(), "say \"hi\"".to_string()],
            ..Preferences::default()
        };
        let mut state = WorkflowState::new("Rust: Why \"Ownership\" Matters?", prefs);
        state.optimized_content = "# Title\n\n---\n\nBody with a rule.".to_string();
        state.word_count = 420;
        state.estimated_read_time = 2;
        state.scores = Scores {
            seo: -5,
            readability: 85,
            quality: 70,
        };
        state
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust -- is   fun  "), "rust-is-fun");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("???"), "untitled");
    }

    #[test]
    fn test_render_layout() {
        let rendered = Artifact::from_state(&finished_state()).render().unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "---");
        assert_eq!(lines[1], r#"title: "Rust: Why \"Ownership\" Matters?""#);
        assert_eq!(lines[6], r#"keywords: ["rust","say \"hi\""]"#);
        assert_eq!(lines[9], "seo_score: -5");
        assert_eq!(lines[13], "---");
        assert_eq!(lines[14], "");
        assert_eq!(lines[15], "# Title");
    }

    #[test]
    fn test_parse_rejects_missing_header() {
        assert!(matches!(
            Artifact::parse("# just markdown"),
            Err(ArtifactError::MissingFrontMatter)
        ));
        assert!(matches!(
            Artifact::parse("---\ntitle: \"x\"\n---\n\nbody"),
            Err(ArtifactError::MissingField("audience"))
        ));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("generated_content"));
        let state = finished_state();

        let path = store.save(&state, Local::now()).await.unwrap();
        assert!(path.starts_with(store.output_dir()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("rust-why-ownership-matters_"));
        assert!(name.ends_with(".md"));

        let artifact = ArtifactStore::load(&path).await.unwrap();
        assert_eq!(artifact.front_matter, FrontMatter::from_state(&state));
        assert_eq!(artifact.body, state.optimized_content);
    }

    #[tokio::test]
    async fn test_same_second_saves_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let state = finished_state();
        let now = Local::now();

        let first = store.save(&state, now).await.unwrap();
        let second = store.save(&state, now).await.unwrap();
        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("_1.md"));
    }

    #[tokio::test]
    async fn test_persist_reports_failure_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let store = ArtifactStore::new(blocker.join("nested"));
        assert_eq!(store.persist(&finished_state()).await, None);
    }
}
