//! Environment-driven configuration.
//!
//! Both configs are assembled from a lookup closure so they can be built from
//! a map in tests; `from_env` loads `.env` first and then reads the process
//! environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

mod error;
pub use error::*;

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn or_default<F>(lookup: &F, key: &'static str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Settings for the blogging agent.
#[derive(Debug, Clone, PartialEq)]
pub struct BloggingConfig {
    pub groq_api_key: String,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Target word range for drafts; drafts outside it are logged.
    pub min_word_count: usize,
    pub max_word_count: usize,
    pub max_generation_attempts: u32,
    pub reddit_user_agent: String,
    pub reddit_timeout: Duration,
    pub output_dir: PathBuf,
    /// Log records are mirrored here. An empty `BLOGGING_LOG_FILE` disables it.
    pub log_file: Option<PathBuf>,
}

impl BloggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            groq_api_key: required(&lookup, "GROQ_API_KEY")?,
            model_name: or_default(&lookup, "MODEL_NAME", "llama3-70b-8192"),
            temperature: parsed(&lookup, "TEMPERATURE", 0.7)?,
            max_tokens: parsed(&lookup, "MAX_TOKENS", 4000)?,
            min_word_count: parsed(&lookup, "MIN_WORD_COUNT", 300)?,
            max_word_count: parsed(&lookup, "MAX_WORD_COUNT", 3000)?,
            max_generation_attempts: parsed(&lookup, "MAX_GENERATION_ATTEMPTS", 3)?,
            reddit_user_agent: or_default(&lookup, "REDDIT_USER_AGENT", "BloggingAgent/2.0"),
            reddit_timeout: Duration::from_secs(parsed(&lookup, "REDDIT_TIMEOUT", 10)?),
            output_dir: PathBuf::from(or_default(&lookup, "BLOG_OUTPUT_DIR", "generated_content")),
            log_file: match lookup("BLOGGING_LOG_FILE") {
                None => Some(PathBuf::from("blogging_agent.log")),
                Some(v) if v.trim().is_empty() => None,
                Some(v) => Some(PathBuf::from(v)),
            },
        })
    }
}

/// Settings for the Wikipedia chat assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct WikiChatConfig {
    pub groq_api_key: String,
    pub model_name: String,
    pub temperature: f32,
    pub language: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl WikiChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            groq_api_key: required(&lookup, "GROQ_API_KEY")?,
            model_name: or_default(&lookup, "WIKI_MODEL_NAME", "llama-3.3-70b-versatile"),
            temperature: parsed(&lookup, "WIKI_TEMPERATURE", 0.7)?,
            language: or_default(&lookup, "WIKI_LANGUAGE", "en"),
            chunk_size: parsed(&lookup, "WIKI_CHUNK_SIZE", 1000)?,
            chunk_overlap: parsed(&lookup, "WIKI_CHUNK_OVERLAP", 200)?,
            top_k: parsed(&lookup, "WIKI_TOP_K", 3)?,
        })
    }
}
