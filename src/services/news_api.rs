use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::http;
use crate::error::{AppError, Result};
use crate::models::NewsArticle;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const SORT_BY: &str = "publishedAt";

#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

/// Client for the NewsAPI "everything" endpoint.
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            client: http::build_client(None)?,
            api_key,
        })
    }

    /// Articles mentioning `query` published on or after `from_date`,
    /// most recent first (provider order is preserved).
    pub async fn fetch_articles(
        &self,
        query: &str,
        from_date: NaiveDate,
    ) -> Result<Vec<NewsArticle>> {
        let url = format!("{}/v2/everything", DEFAULT_BASE_URL);
        let from = from_date.format("%Y-%m-%d").to_string();
        let params = [
            ("q", query),
            ("from", from.as_str()),
            ("sortBy", SORT_BY),
            ("apiKey", self.api_key.as_str()),
        ];

        info!("fetching news for '{}' since {}", query, from);
        let value = http::get_json(&self.client, &url, &params).await?;
        parse_articles(value)
    }
}

fn parse_articles(value: Value) -> Result<Vec<NewsArticle>> {
    let response: NewsResponse = serde_json::from_value(value)
        .map_err(|e| AppError::Parse(format!("unexpected news payload: {}", e)))?;

    if response.status != "ok" {
        return Err(AppError::Network(format!(
            "news provider returned status '{}': {}",
            response.status,
            response.message.unwrap_or_default()
        )));
    }

    Ok(response.articles)
}
