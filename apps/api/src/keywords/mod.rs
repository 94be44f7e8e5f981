//! Keyword summary: language-model skills list, optionally followed by web-search context.
//!
//! The two sources sit behind traits so the summarizer can be exercised without a network.
//! Each call is bounded by its own timeout; expiry resolves to that source's fallback:
//! - model: the fixed warning string
//! - search: omitted entirely (no placeholder, no separator)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::prompts::SKILLS_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::search_client::{SearchClient, SearchError};

/// Shown in place of model output when the model call fails for any reason.
pub const MODEL_FALLBACK: &str = "Unable to extract job keywords due to API error.";
/// Separates the model portion from the search portion.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Produces a skills list for a job description.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract_skills(&self, job_description: &str) -> Result<String, LlmError>;
}

/// Produces free-text search context for a job description. `Ok("")` means nothing found.
#[async_trait]
pub trait KeywordSearch: Send + Sync {
    async fn search_keywords(&self, job_description: &str) -> Result<String, SearchError>;
}

#[async_trait]
impl SkillExtractor for LlmClient {
    async fn extract_skills(&self, job_description: &str) -> Result<String, LlmError> {
        self.complete(SKILLS_SYSTEM, job_description).await
    }
}

#[async_trait]
impl KeywordSearch for SearchClient {
    async fn search_keywords(&self, job_description: &str) -> Result<String, SearchError> {
        Ok(self.search(job_description).await?.render())
    }
}

/// How the model portion was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Ok,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordSummary {
    /// Model output, or `MODEL_FALLBACK`. Never empty.
    pub model_keywords: String,
    pub model_status: ModelStatus,
    /// Present only when the search succeeded with non-empty text.
    pub search_keywords: Option<String>,
    /// `model_keywords`, followed by `SECTION_SEPARATOR` and the search text when present.
    pub combined: String,
}

impl KeywordSummary {
    fn merge(model_keywords: String, model_status: ModelStatus, search: Option<String>) -> Self {
        let combined = match &search {
            Some(search) => format!("{model_keywords}{SECTION_SEPARATOR}{search}"),
            None => model_keywords.clone(),
        };
        Self {
            model_keywords,
            model_status,
            search_keywords: search,
            combined,
        }
    }
}

pub struct KeywordSummarizer {
    model: Arc<dyn SkillExtractor>,
    search: Arc<dyn KeywordSearch>,
    model_timeout: Duration,
    search_timeout: Duration,
}

impl KeywordSummarizer {
    pub fn new(
        model: Arc<dyn SkillExtractor>,
        search: Arc<dyn KeywordSearch>,
        model_timeout: Duration,
        search_timeout: Duration,
    ) -> Self {
        Self {
            model,
            search,
            model_timeout,
            search_timeout,
        }
    }

    /// Runs the model call, then the search call, and merges them. Never fails.
    pub async fn summarize(&self, job_description: &str) -> KeywordSummary {
        let (model_keywords, model_status) = self.model_portion(job_description).await;
        let search = self.search_portion(job_description).await;

        info!(
            "Keyword summary built: model={:?}, search_included={}",
            model_status,
            search.is_some()
        );
        KeywordSummary::merge(model_keywords, model_status, search)
    }

    async fn model_portion(&self, job_description: &str) -> (String, ModelStatus) {
        let call = self.model.extract_skills(job_description);
        match tokio::time::timeout(self.model_timeout, call).await {
            Ok(Ok(text)) if !text.trim().is_empty() => (text.trim().to_string(), ModelStatus::Ok),
            Ok(Ok(_)) => {
                warn!("Keyword model returned empty content");
                (MODEL_FALLBACK.to_string(), ModelStatus::Failed)
            }
            Ok(Err(e)) => {
                warn!("Keyword model call failed: {e}");
                (MODEL_FALLBACK.to_string(), ModelStatus::Failed)
            }
            Err(_) => {
                warn!(
                    "Keyword model call timed out after {}ms",
                    self.model_timeout.as_millis()
                );
                (MODEL_FALLBACK.to_string(), ModelStatus::TimedOut)
            }
        }
    }

    async fn search_portion(&self, job_description: &str) -> Option<String> {
        let call = self.search.search_keywords(job_description);
        match tokio::time::timeout(self.search_timeout, call).await {
            Ok(Ok(text)) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
            Ok(Err(e)) => {
                warn!("Keyword search failed, omitting: {e}");
                None
            }
            Err(_) => {
                warn!(
                    "Keyword search timed out after {}ms, omitting",
                    self.search_timeout.as_millis()
                );
                None
            }
        }
    }
}
