use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::BloggingConfig;

use super::error::TopicFetchError;

pub const DEFAULT_FEED_URL: &str = "https://www.reddit.com";
pub const DEFAULT_CATEGORY: &str = "all";
pub const DEFAULT_LIMIT: usize = 25;
/// Candidates kept after filtering.
pub const MAX_TOPICS: usize = 15;
/// Posts need strictly more upvotes than this.
pub const MIN_POPULARITY: i64 = 1000;
const PREVIEW_CHARS: usize = 200;

/// A trending item offered to the user as a possible article subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCandidate {
    pub title: String,
    pub score: i64,
    pub num_comments: i64,
    /// Category the item was published under (a subreddit for the Reddit feed).
    pub source: String,
    pub created_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub preview_text: Option<String>,
}

impl TopicCandidate {
    fn fallback(title: &str, source: &str, score: i64, num_comments: i64) -> Self {
        Self {
            title: title.to_string(),
            score,
            num_comments,
            source: source.to_string(),
            created_at: None,
            url: None,
            preview_text: None,
        }
    }
}

/// Fixed list served whenever the live feed is unavailable or yields nothing usable.
pub fn fallback_topics() -> Vec<TopicCandidate> {
    vec![
        TopicCandidate::fallback(
            "The Future of Artificial Intelligence in 2024",
            "technology",
            5000,
            200,
        ),
        TopicCandidate::fallback(
            "Climate Change Solutions That Actually Work",
            "environment",
            4500,
            180,
        ),
        TopicCandidate::fallback(
            "Remote Work Best Practices for Productivity",
            "productivity",
            4000,
            150,
        ),
        TopicCandidate::fallback(
            "Cybersecurity Trends Every Developer Should Know",
            "programming",
            3800,
            120,
        ),
        TopicCandidate::fallback("Mental Health in the Digital Age", "psychology", 3500, 190),
    ]
}

/// Something that can suggest trending topics.
///
/// Implementations never fail: a source that cannot reach its backend is expected
/// to return [`fallback_topics`] instead.
#[async_trait]
pub trait TopicSource: Send + Sync {
    async fn fetch_topics(&self, category: &str, limit: usize) -> Vec<TopicCandidate>;
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawPost,
}

#[derive(Debug, Default, Deserialize)]
struct RawPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    created_utc: Option<f64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    selftext: Option<String>,
    #[serde(default)]
    over_18: bool,
    #[serde(default)]
    stickied: bool,
}

impl RawPost {
    fn is_candidate(&self) -> bool {
        let title_len = self.title.chars().count();
        self.score > MIN_POPULARITY
            && !self.over_18
            && !self.stickied
            && title_len > 10
            && title_len < 200
    }

    fn into_candidate(self) -> TopicCandidate {
        let created_at = self
            .created_utc
            .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single());
        let preview_text = self
            .selftext
            .filter(|text| !text.is_empty())
            .map(|text| format!("{}...", text.chars().take(PREVIEW_CHARS).collect::<String>()));

        TopicCandidate {
            title: self.title,
            score: self.score,
            num_comments: self.num_comments,
            source: self.subreddit,
            created_at,
            url: self.url,
            preview_text,
        }
    }
}

fn select_candidates(posts: Vec<RawPost>) -> Vec<TopicCandidate> {
    posts
        .into_iter()
        .filter(RawPost::is_candidate)
        .take(MAX_TOPICS)
        .map(RawPost::into_candidate)
        .collect()
}

/// Reads the public "hot" listing of a subreddit.
#[derive(Debug, Clone)]
pub struct RedditTopicSource {
    client: Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl RedditTopicSource {
    pub fn new<S: Into<String>>(user_agent: S, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_FEED_URL.to_string(),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn from_config(config: &BloggingConfig) -> Self {
        Self::new(config.reddit_user_agent.clone(), config.reddit_timeout)
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn listing_url(&self, category: &str, limit: usize) -> String {
        format!(
            "{}/r/{}/hot.json?limit={}",
            self.base_url.trim_end_matches('/'),
            category,
            limit
        )
    }

    async fn try_fetch(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<TopicCandidate>, TopicFetchError> {
        let response = self
            .client
            .get(self.listing_url(category, limit))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TopicFetchError::Status(status.as_u16()));
        }

        let listing: Listing = response.json().await?;
        let posts = listing.data.children.into_iter().map(|c| c.data).collect();
        let candidates = select_candidates(posts);
        if candidates.is_empty() {
            return Err(TopicFetchError::NoCandidates);
        }
        Ok(candidates)
    }
}

#[async_trait]
impl TopicSource for RedditTopicSource {
    async fn fetch_topics(&self, category: &str, limit: usize) -> Vec<TopicCandidate> {
        match self.try_fetch(category, limit).await {
            Ok(candidates) => {
                log::info!("Fetched {} trending topics", candidates.len());
                candidates
            }
            Err(e) => {
                log::error!("Error fetching trending topics: {}", e);
                fallback_topics()
            }
        }
    }
}

/// A source that always returns the same list. Useful for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTopicSource {
    topics: Vec<TopicCandidate>,
}

impl StaticTopicSource {
    pub fn new(topics: Vec<TopicCandidate>) -> Self {
        Self { topics }
    }
}

#[async_trait]
impl TopicSource for StaticTopicSource {
    async fn fetch_topics(&self, _category: &str, limit: usize) -> Vec<TopicCandidate> {
        if self.topics.is_empty() {
            return fallback_topics();
        }
        self.topics.iter().take(limit).cloned().collect()
    }
}
