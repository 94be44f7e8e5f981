//! Optimize pipeline: one résumé/job-description pair in, one report plus artifacts out.
//!
//! Flow: extract both uploads → score the pair → summarize job keywords →
//!       emit DOCX + PDF of the optimized résumé → store under a fresh request ID.
//!
//! A failed extraction never aborts the request. Instead the stages that would have
//! consumed the failure placeholder are skipped and the report says why.

pub mod handlers;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::artifacts::StoredArtifact;
use crate::emit::{optimized_resume_text, OutputFormat};
use crate::errors::AppError;
use crate::extraction::{extract, DocumentKind, ExtractedText, ExtractionFailure, UploadedDocument};
use crate::keywords::KeywordSummary;
use crate::matching::MatchScore;
use crate::state::AppState;

/// What the client sees for one uploaded document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionView {
    pub file_name: String,
    pub kind: Option<DocumentKind>,
    pub ok: bool,
    pub failure: Option<ExtractionFailure>,
    /// The extracted text, or the failure message.
    pub text: String,
}

impl ExtractionView {
    pub fn new(file_name: &str, kind: Option<DocumentKind>, extracted: &ExtractedText) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind,
            ok: extracted.is_text(),
            failure: match extracted {
                ExtractedText::Failed(failure) => Some(failure.clone()),
                ExtractedText::Text(_) => None,
            },
            text: extracted.display_text(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeReport {
    pub request_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resume: ExtractionView,
    pub job_description: ExtractionView,
    /// `None` when either document failed extraction.
    pub match_score: Option<MatchScore>,
    pub scorer_backend: String,
    /// `None` when the job description failed extraction.
    pub keywords: Option<KeywordSummary>,
    /// `None` when the résumé failed extraction.
    pub optimized_resume: Option<String>,
    pub artifacts: Vec<StoredArtifact>,
    /// Human-readable notes about skipped stages.
    pub warnings: Vec<String>,
}

/// Extracts on the blocking pool; parsing PDFs and DOCX packages is CPU-bound.
pub async fn extract_blocking(document: UploadedDocument) -> Result<ExtractedText, AppError> {
    tokio::task::spawn_blocking(move || extract(&document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))
}

/// Runs the whole optimize flow for one request.
pub async fn run_optimize(
    state: &AppState,
    resume: UploadedDocument,
    job_description: UploadedDocument,
) -> Result<OptimizeReport, AppError> {
    let request_id = Uuid::new_v4();
    info!(
        "Optimize {request_id}: resume='{}', job_description='{}'",
        resume.file_name, job_description.file_name
    );

    // Step 1: extraction
    let resume_view_meta = (resume.file_name.clone(), resume.kind());
    let jd_view_meta = (job_description.file_name.clone(), job_description.kind());
    let resume_text = extract_blocking(resume).await?;
    let jd_text = extract_blocking(job_description).await?;

    let mut warnings = Vec::new();
    if let ExtractedText::Failed(failure) = &resume_text {
        warnings.push(format!("Resume could not be read: {failure}"));
    }
    if let ExtractedText::Failed(failure) = &jd_text {
        warnings.push(format!("Job description could not be read: {failure}"));
    }

    // Step 2: match score
    let match_score = match (resume_text.text(), jd_text.text()) {
        (Some(resume), Some(jd)) => {
            let scorer = Arc::clone(&state.scorer);
            let (resume, jd) = (resume.to_string(), jd.to_string());
            let score = tokio::task::spawn_blocking(move || scorer.score(&resume, &jd))
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}"))
                })?;
            info!("Optimize {request_id}: match score {score}/100");
            Some(score)
        }
        _ => {
            warnings.push("Match score skipped: both documents must contain text.".to_string());
            None
        }
    };

    // Step 3: keyword summary
    let keywords = match jd_text.text() {
        Some(jd) => Some(state.summarizer.summarize(jd).await),
        None => {
            warnings.push("Keyword summary skipped: job description has no text.".to_string());
            None
        }
    };

    // Step 4 + 5: emit and store
    let optimized_resume = resume_text.text().map(optimized_resume_text);
    let mut artifacts = Vec::new();
    match &optimized_resume {
        Some(text) => {
            for format in OutputFormat::ALL {
                let body = text.clone();
                let bytes = tokio::task::spawn_blocking(move || format.render(&body))
                    .await
                    .map_err(|e| {
                        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in emit: {e}"))
                    })??;
                artifacts.push(state.artifacts.save(request_id, format, &bytes).await?);
            }
        }
        None => {
            warn!("Optimize {request_id}: resume unreadable, no artifacts emitted");
            warnings.push("Optimized resume skipped: resume has no text.".to_string());
        }
    }

    Ok(OptimizeReport {
        request_id,
        created_at: Utc::now(),
        resume: ExtractionView::new(&resume_view_meta.0, resume_view_meta.1, &resume_text),
        job_description: ExtractionView::new(&jd_view_meta.0, jd_view_meta.1, &jd_text),
        match_score,
        scorer_backend: state.scorer.backend().to_string(),
        keywords,
        optimized_resume,
        artifacts,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::to_docx;
    use crate::keywords::MODEL_FALLBACK;
    use crate::state::tests::test_state;

    #[tokio::test]
    async fn test_go_developer_scenario() {
        let state = test_state(Ok("Must-have: Go"), Ok("- Go developer skills"));
        let report = run_optimize(
            &state,
            UploadedDocument::new("resume.txt", "Experienced Go developer"),
            UploadedDocument::new(
                "jd.txt",
                "Looking for a Go developer with 5 years experience",
            ),
        )
        .await
        .unwrap();

        assert!(report.match_score.unwrap() >= 60);
        let keywords = report.keywords.unwrap();
        assert!(!keywords.combined.is_empty());
        assert_eq!(keywords.combined, "Must-have: Go\n\n- Go developer skills");
        assert_eq!(
            report.optimized_resume.as_deref(),
            Some("### Optimized Resume\n\nExperienced Go developer")
        );
        assert_eq!(report.artifacts.len(), 2);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_artifacts_are_readable_back() {
        let state = test_state(Ok("Python"), Err(()));
        let report = run_optimize(
            &state,
            UploadedDocument::new("resume.docx", to_docx("Café engineer").unwrap()),
            UploadedDocument::new("jd.txt", "Requires Python and AWS"),
        )
        .await
        .unwrap();

        let pdf = state
            .artifacts
            .load(report.request_id, OutputFormat::Pdf)
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let docx = state
            .artifacts
            .load(report.request_id, OutputFormat::Docx)
            .await
            .unwrap();
        let reread = extract(&UploadedDocument::new("optimized_resume.docx", docx));
        assert_eq!(
            reread,
            ExtractedText::Text("### Optimized Resume\n\nCafé engineer".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreadable_jd_skips_score_and_keywords() {
        let state = test_state(Ok("Python"), Ok("- AWS"));
        let report = run_optimize(
            &state,
            UploadedDocument::new("resume.txt", "Experienced Go developer"),
            UploadedDocument::new("jd.rtf", "{\\rtf1 Go developer}"),
        )
        .await
        .unwrap();

        assert!(!report.job_description.ok);
        assert_eq!(
            report.job_description.text,
            "Unsupported file format. Please upload a PDF, DOCX, or TXT file."
        );
        assert!(report.match_score.is_none());
        assert!(report.keywords.is_none());
        // The résumé itself was fine, so artifacts are still produced.
        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(report.warnings.len(), 3);
    }

    #[tokio::test]
    async fn test_unreadable_resume_emits_nothing() {
        let state = test_state(Err(()), Err(()));
        let report = run_optimize(
            &state,
            UploadedDocument::new("resume.txt", "   "),
            UploadedDocument::new("jd.txt", "Requires Python and AWS"),
        )
        .await
        .unwrap();

        assert_eq!(report.resume.text, "No text found in TXT.");
        assert!(report.optimized_resume.is_none());
        assert!(report.artifacts.is_empty());
        assert_eq!(report.keywords.unwrap().combined, MODEL_FALLBACK);
    }
}
