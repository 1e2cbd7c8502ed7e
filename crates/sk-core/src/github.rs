//! GitHub repository search.
//!
//! Finds repositories that look like skill collections: ones mentioning
//! `SKILL.md` or tagged with a skill topic. Results complement the registry
//! search; every `full_name` is directly installable as `owner/repo`.

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

/// Public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository topics that mark a skill collection.
pub const SKILL_TOPICS: &[&str] = &["claude-skill", "claude-code-skill"];

/// Largest page the search API serves.
const MAX_PER_PAGE: usize = 100;

/// GitHub search failure.
#[derive(Error, Debug)]
pub enum GithubError {
    /// Transport failure or an undecodable response.
    #[error("GitHub unavailable: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-200 answer, rate limiting included.
    #[error("GitHub API returned status {0}")]
    Status(u16),
}

/// One repository from a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// `owner/repo`
    pub full_name: String,
    /// Repository description, if set.
    pub description: Option<String>,
    /// Star count.
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
    /// Web page of the repository.
    pub html_url: String,
    /// Last update as published by GitHub.
    pub updated_at: String,
}

/// A page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    /// Matches on GitHub overall, not just this page.
    pub total_count: u64,
    /// Repositories, most starred first.
    pub items: Vec<Repository>,
}

/// Client for `GET /search/repositories`.
#[derive(Debug, Clone)]
pub struct GithubSearch {
    client: Client,
    api_url: String,
}

impl GithubSearch {
    /// Search against the public API.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Search against the API configured by the user.
    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(client).with_api_url(config.github_api_url())
    }

    /// Use `api_url` instead of the public API.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Search query for `keyword`.
    pub fn query(keyword: &str) -> String {
        let topics = SKILL_TOPICS
            .iter()
            .map(|topic| format!("topic:{topic}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        format!("{} SKILL.md OR {topics}", keyword.trim())
    }

    /// Up to `limit` repositories matching `keyword`, most starred first.
    pub async fn search(&self, keyword: &str, limit: usize) -> Result<SearchResults, GithubError> {
        let url = format!("{}/search/repositories", self.api_url);
        let query = Self::query(keyword);
        let per_page = limit.clamp(1, MAX_PER_PAGE).to_string();
        tracing::debug!("Searching GitHub for '{query}'");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(GithubError::Status(response.status().as_u16()));
        }

        let mut results: SearchResults = response.json().await?;
        results.items.truncate(limit);
        Ok(results)
    }
}
