//! Axum route handlers for the optimize API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::emit::OutputFormat;
use crate::errors::AppError;
use crate::extraction::UploadedDocument;
use crate::pipeline::{extract_blocking, run_optimize, ExtractionView, OptimizeReport};
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// Collects the named file fields of a multipart body. Empty, unnamed parts count as absent.
async fn read_uploads(
    mut multipart: Multipart,
    wanted: &[&str],
) -> Result<Vec<(String, UploadedDocument)>, AppError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if !wanted.contains(&name.as_str()) {
            debug!("Ignoring multipart field '{name}'");
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        uploads.push((name, UploadedDocument::new(file_name, bytes)));
    }
    Ok(uploads)
}

fn take_upload(uploads: &mut Vec<(String, UploadedDocument)>, field: &str) -> Option<UploadedDocument> {
    let index = uploads.iter().position(|(name, _)| name == field)?;
    Some(uploads.swap_remove(index).1)
}

/// POST /api/v1/extract
///
/// Multipart field `file`. Returns the extracted text (or failure message) for preview.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractionView>, AppError> {
    let mut uploads = read_uploads(multipart, &[FILE_FIELD]).await?;
    let document = take_upload(&mut uploads, FILE_FIELD)
        .ok_or_else(|| AppError::Validation("Please upload a PDF, DOCX, or TXT file.".to_string()))?;

    let file_name = document.file_name.clone();
    let kind = document.kind();
    let extracted = extract_blocking(document).await?;

    Ok(Json(ExtractionView::new(&file_name, kind, &extracted)))
}

/// POST /api/v1/optimize
///
/// Multipart fields `resume` and `job_description`. Runs the full pipeline:
/// extract → score → keywords → emit. Returns the report with download links.
pub async fn handle_optimize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OptimizeReport>, AppError> {
    let mut uploads = read_uploads(multipart, &[RESUME_FIELD, JOB_DESCRIPTION_FIELD]).await?;
    let resume = take_upload(&mut uploads, RESUME_FIELD);
    let job_description = take_upload(&mut uploads, JOB_DESCRIPTION_FIELD);

    let (Some(resume), Some(job_description)) = (resume, job_description) else {
        return Err(AppError::Validation(
            "Please upload both Resume and Job Description files!".to_string(),
        ));
    };

    let report = run_optimize(&state, resume, job_description).await?;
    Ok(Json(report))
}

/// GET /api/v1/artifacts/:request_id/:file_name
///
/// Streams back a stored DOCX/PDF with its download name.
pub async fn handle_download_artifact(
    State(state): State<AppState>,
    Path((request_id, file_name)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let format = OutputFormat::from_file_name(&file_name)
        .ok_or_else(|| AppError::NotFound(format!("Artifact {file_name} not found")))?;

    let bytes = state.artifacts.load(request_id, format).await?;

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.download_name()),
            ),
        ],
        bytes,
    )
        .into_response())
}
