//! Document emission: optimized résumé text → downloadable DOCX and PDF bytes.
//! Layout is CPU-bound; async callers run it inside tokio::task::spawn_blocking.

mod docx;
mod metrics;
mod pdf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use docx::to_docx;
pub use pdf::to_pdf;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("DOCX packaging failed: {0}")]
    Docx(String),

    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Docx,
    Pdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Docx, OutputFormat::Pdf];

    /// Name the artifact is stored under.
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "optimized_resume.docx",
            OutputFormat::Pdf => "optimized_resume.pdf",
        }
    }

    /// Name offered to the browser on download.
    pub fn download_name(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "Optimized_Resume.docx",
            OutputFormat::Pdf => "Optimized_Resume.pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.file_name() == name)
    }

    pub fn render(&self, text: &str) -> Result<Vec<u8>, EmitError> {
        match self {
            OutputFormat::Docx => to_docx(text),
            OutputFormat::Pdf => to_pdf(text),
        }
    }
}

/// The heading the optimizer prepends to the résumé body.
pub fn optimized_resume_text(resume: &str) -> String {
    format!("### Optimized Resume\n\n{resume}")
}
