//! Match scoring: pluggable scorer measuring how closely a résumé covers a job description.
//!
//! Default: `TokenSetScorer` (pure, deterministic, order-insensitive).
//! `AppState` holds an `Arc<dyn MatchScorer>`.

mod token_set;

pub use token_set::token_set_ratio;

/// A similarity score in `0..=100`.
pub type MatchScore = u8;

/// Implement this to swap scoring backends without touching the pipeline or handlers.
pub trait MatchScorer: Send + Sync {
    fn score(&self, resume: &str, job_description: &str) -> MatchScore;

    /// Short label reported alongside scores.
    fn backend(&self) -> &'static str;
}

/// Fuzzy token-set similarity over case-folded, punctuation-stripped words.
pub struct TokenSetScorer;

impl MatchScorer for TokenSetScorer {
    fn score(&self, resume: &str, job_description: &str) -> MatchScore {
        token_set_ratio(resume, job_description)
    }

    fn backend(&self) -> &'static str {
        "token_set"
    }
}
