use std::sync::Arc;

use crate::artifacts::ArtifactStore;
use crate::config::Config;
use crate::keywords::KeywordSummarizer;
use crate::matching::MatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable match scorer. Default: TokenSetScorer.
    pub scorer: Arc<dyn MatchScorer>,
    /// Model + search keyword summarizer, each branch bounded by its configured timeout.
    pub summarizer: Arc<KeywordSummarizer>,
    pub artifacts: ArtifactStore,
}
