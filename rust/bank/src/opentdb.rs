//! HTTP client for the Open Trivia Database API.
//!
//! `GET {base}/api.php?amount=N&type=multiple[&difficulty=D][&category=C]`
//! answers with `{"response_code": 0, "results": [...]}`. A non-zero
//! `response_code` is a failure even when the HTTP status is 200.

use crate::{Category, QuestionSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use trivium_engine::config::QuizConfiguration;
use trivium_engine::errors::FetchError;
use trivium_engine::question::RawQuestion;

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the client points and how long it waits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionResponse {
    response_code: u32,
    #[serde(default)]
    results: Option<Vec<RawQuestion>>,
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    trivia_categories: Vec<Category>,
}

#[derive(Debug, Clone)]
pub struct OpenTdbClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenTdbClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(network)?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "question bank request failed");
            return Err(FetchError::Status(status.as_u16()));
        }
        response.text().await.map_err(network)
    }
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch(&self, config: &QuizConfiguration) -> Result<Vec<RawQuestion>, FetchError> {
        let query = build_query(config);
        tracing::debug!(
            amount = config.amount,
            difficulty = config.difficulty.map(|d| d.as_str()),
            category = config.category,
            "requesting question batch"
        );
        let body = self.get_text("api.php", &query).await?;
        let results = parse_questions(&body)?;
        tracing::info!(count = results.len(), "question batch received");
        Ok(results)
    }

    async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        let body = self.get_text("api_category.php", &[]).await?;
        parse_categories(&body)
    }

    fn name(&self) -> &str {
        "opentdb"
    }
}

/// Query parameters for one batch request, in the order the API documents
/// them. Unset filters are omitted rather than sent empty.
pub fn build_query(config: &QuizConfiguration) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("amount", config.amount.to_string()),
        ("type", config.question_type.as_str().to_string()),
    ];
    if let Some(difficulty) = config.difficulty {
        query.push(("difficulty", difficulty.as_str().to_string()));
    }
    if let Some(category) = config.category {
        query.push(("category", category.to_string()));
    }
    query
}

/// Decode a batch response body, mapping a non-zero `response_code` to
/// [`FetchError::Source`].
pub fn parse_questions(body: &str) -> Result<Vec<RawQuestion>, FetchError> {
    let response: QuestionResponse = serde_json::from_str(body).map_err(malformed)?;
    if response.response_code != 0 {
        return Err(FetchError::from_response_code(response.response_code));
    }
    match response.results {
        Some(results) if results.is_empty() => Err(FetchError::Empty),
        Some(results) => Ok(results),
        None => Err(FetchError::Malformed("missing `results`".into())),
    }
}

pub fn parse_categories(body: &str) -> Result<Vec<Category>, FetchError> {
    let response: CategoryResponse = serde_json::from_str(body).map_err(malformed)?;
    Ok(response.trivia_categories)
}

fn network(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.to_string())
}

fn malformed(err: serde_json::Error) -> FetchError {
    FetchError::Malformed(err.to_string())
}
