//! Web search client for job-keyword lookups (Serper `/search` API).
//!
//! The query is built from the leading words of the job description; results are
//! flattened into plain text lines so they can be appended to the keyword summary.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::transport_timeout;

/// Words of the job description used to build the search query.
const QUERY_WORDS: usize = 32;
/// Organic results rendered into the summary.
const MAX_RESULTS: usize = 5;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Job description is empty; nothing to search for")]
    EmptyQuery,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "answerBox")]
    pub answer_box: Option<AnswerBox>,
    #[serde(rename = "knowledgeGraph")]
    pub knowledge_graph: Option<KnowledgeGraph>,
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerBox {
    pub answer: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeGraph {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    pub title: String,
    pub snippet: Option<String>,
}

impl SearchResponse {
    /// Flattens the response into text. Empty when the search found nothing useful.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        if let Some(answer) = self
            .answer_box
            .as_ref()
            .and_then(|a| a.answer.as_deref().or(a.snippet.as_deref()))
        {
            lines.push(answer.trim().to_string());
        }

        if let Some(kg) = &self.knowledge_graph {
            match (kg.title.as_deref(), kg.description.as_deref()) {
                (Some(title), Some(description)) => lines.push(format!("{title}: {description}")),
                (None, Some(description)) => lines.push(description.to_string()),
                _ => {}
            }
        }

        for result in self.organic.iter().take(MAX_RESULTS) {
            match result.snippet.as_deref() {
                Some(snippet) if !snippet.trim().is_empty() => {
                    lines.push(format!("- {}: {}", result.title.trim(), snippet.trim()))
                }
                _ => lines.push(format!("- {}", result.title.trim())),
            }
        }

        lines.retain(|l| !l.trim().is_empty());
        lines.join("\n")
    }
}

/// Builds the search query from the first words of the job description.
pub fn build_query(job_description: &str) -> String {
    job_description
        .split_whitespace()
        .take(QUERY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SearchClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(transport_timeout(timeout)).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Runs a search keyed to the job description.
    pub async fn search(&self, job_description: &str) -> Result<SearchResponse, SearchError> {
        let query = build_query(job_description);
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest {
                q: &query,
                num: MAX_RESULTS,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        debug!("Search returned {} organic results", parsed.organic.len());
        Ok(parsed)
    }
}
