use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article from the news provider, kept in provider order (sorted by
/// recency at the source).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,

    /// Providers omit or null this field on some articles.
    #[serde(default)]
    pub description: Option<String>,

    pub url: String,

    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

impl NewsArticle {
    /// Description for the SMS body, degraded to an empty string when the
    /// provider omitted it.
    pub fn brief(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}
