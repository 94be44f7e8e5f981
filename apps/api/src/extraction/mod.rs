//! Text extraction: turns an uploaded PDF, DOCX, or TXT file into plain text.
//!
//! Extraction never fails the caller. Every fault is folded into
//! `ExtractedText::Failed` with a reason the UI can show verbatim.

mod docx;
mod pdf;

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The document containers the optimizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Parses a file extension, ignoring case. Unknown extensions yield `None`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Txt => "TXT",
        }
    }
}

/// A named upload. The extension is whatever follows the last `.` in the name,
/// lower-cased; a name without a dot is its own extension.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn extension(&self) -> String {
        self.file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_extension(&self.extension())
    }
}

/// Why a document produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExtractionFailure {
    Unsupported { extension: String },
    NoText { kind: DocumentKind },
    Malformed { kind: DocumentKind, detail: String },
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionFailure::Unsupported { .. } => {
                write!(f, "Unsupported file format. Please upload a PDF, DOCX, or TXT file.")
            }
            ExtractionFailure::NoText { kind } => write!(f, "No text found in {}.", kind.label()),
            ExtractionFailure::Malformed { kind, detail } => {
                write!(f, "Error extracting text from {}: {detail}", kind.label())
            }
        }
    }
}

/// Outcome of extraction: real document text, or a failure with its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    Text(String),
    Failed(ExtractionFailure),
}

impl ExtractedText {
    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractedText::Text(text) => Some(text),
            ExtractedText::Failed(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ExtractedText::Text(_))
    }

    /// The string shown to the user: the text itself, or the failure message.
    pub fn display_text(&self) -> String {
        match self {
            ExtractedText::Text(text) => text.clone(),
            ExtractedText::Failed(failure) => failure.to_string(),
        }
    }

    /// Trims `raw` and maps an empty result to `NoText`.
    fn from_raw(kind: DocumentKind, raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            ExtractedText::Failed(ExtractionFailure::NoText { kind })
        } else {
            ExtractedText::Text(trimmed.to_string())
        }
    }
}

/// Extracts the text of an uploaded document, dispatching on its extension.
///
/// CPU-bound for PDF and DOCX. Async callers should run it on the blocking pool.
pub fn extract(document: &UploadedDocument) -> ExtractedText {
    let Some(kind) = document.kind() else {
        let extension = document.extension();
        debug!("Rejecting '{}': unsupported extension '{extension}'", document.file_name);
        return ExtractedText::Failed(ExtractionFailure::Unsupported { extension });
    };

    let raw = match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(&document.bytes),
        DocumentKind::Docx => docx::extract_docx_text(&document.bytes),
        DocumentKind::Txt => std::str::from_utf8(&document.bytes)
            .map(str::to_string)
            .map_err(|e| e.to_string()),
    };

    let extracted = match raw {
        Ok(raw) => ExtractedText::from_raw(kind, &raw),
        Err(detail) => {
            warn!("Extraction failed for '{}': {detail}", document.file_name);
            ExtractedText::Failed(ExtractionFailure::Malformed { kind, detail })
        }
    };

    debug!(
        "Extracted '{}' as {}: {} chars, ok={}",
        document.file_name,
        kind.label(),
        extracted.text().map(str::len).unwrap_or(0),
        extracted.is_text()
    );
    extracted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{optimized_resume_text, to_docx, to_pdf};

    #[test]
    fn test_txt_is_trimmed() {
        let doc = UploadedDocument::new("resume.txt", "  Experienced Go developer \n\n");
        assert_eq!(
            extract(&doc),
            ExtractedText::Text("Experienced Go developer".to_string())
        );
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let doc = UploadedDocument::new("RESUME.TXT", "hello");
        assert_eq!(doc.kind(), Some(DocumentKind::Txt));
        assert!(extract(&doc).is_text());
    }

    #[test]
    fn test_unsupported_extension_message() {
        let doc = UploadedDocument::new("resume.rtf", "{\\rtf1 hello}");
        let extracted = extract(&doc);
        assert_eq!(
            extracted,
            ExtractedText::Failed(ExtractionFailure::Unsupported {
                extension: "rtf".to_string()
            })
        );
        assert_eq!(
            extracted.display_text(),
            "Unsupported file format. Please upload a PDF, DOCX, or TXT file."
        );
    }

    #[test]
    fn test_name_without_dot_is_its_own_extension() {
        let doc = UploadedDocument::new("txt", "plain");
        assert_eq!(doc.extension(), "txt");
        assert!(extract(&doc).is_text());
    }

    #[test]
    fn test_invalid_utf8_txt_is_malformed() {
        let doc = UploadedDocument::new("resume.txt", vec![0xff, 0xfe, 0xfd]);
        let extracted = extract(&doc);
        assert!(matches!(
            extracted,
            ExtractedText::Failed(ExtractionFailure::Malformed {
                kind: DocumentKind::Txt,
                ..
            })
        ));
        assert!(extracted
            .display_text()
            .starts_with("Error extracting text from TXT:"));
    }

    #[test]
    fn test_blank_txt_has_no_text() {
        let doc = UploadedDocument::new("empty.txt", "   \n ");
        assert_eq!(extract(&doc).display_text(), "No text found in TXT.");
    }

    #[test]
    fn test_docx_text_round_trips() {
        let bytes = to_docx("  Experienced Go developer  ").unwrap();
        let doc = UploadedDocument::new("resume.docx", bytes);
        assert_eq!(
            extract(&doc),
            ExtractedText::Text("Experienced Go developer".to_string())
        );
    }

    #[test]
    fn test_multiline_docx_round_trips_exactly() {
        let text = "Jane Doe\nGo developer\n\nSkills: Go, Kubernetes";
        let doc = UploadedDocument::new("resume.docx", to_docx(text).unwrap());
        assert_eq!(extract(&doc), ExtractedText::Text(text.to_string()));
    }

    #[test]
    fn test_optimized_resume_docx_keeps_heading_on_its_own_line() {
        let text = optimized_resume_text("Experienced Go developer");
        let doc = UploadedDocument::new("optimized_resume.docx", to_docx(&text).unwrap());
        assert_eq!(
            extract(&doc),
            ExtractedText::Text("### Optimized Resume\n\nExperienced Go developer".to_string())
        );
    }

    #[test]
    fn test_empty_docx_has_no_text() {
        let bytes = to_docx("").unwrap();
        let doc = UploadedDocument::new("empty.docx", bytes);
        assert_eq!(extract(&doc).display_text(), "No text found in DOCX.");
    }

    #[test]
    fn test_corrupt_docx_is_malformed() {
        let doc = UploadedDocument::new("broken.docx", b"not a zip archive".to_vec());
        assert!(extract(&doc)
            .display_text()
            .starts_with("Error extracting text from DOCX:"));
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let bytes = to_pdf("Experienced Go developer").unwrap();
        let doc = UploadedDocument::new("resume.pdf", bytes);
        assert_eq!(
            extract(&doc),
            ExtractedText::Text("Experienced Go developer".to_string())
        );
    }

    #[test]
    fn test_empty_pdf_has_no_text() {
        let bytes = to_pdf("").unwrap();
        let doc = UploadedDocument::new("blank.pdf", bytes);
        assert_eq!(extract(&doc).display_text(), "No text found in PDF.");
    }

    #[test]
    fn test_corrupt_pdf_is_malformed() {
        let doc = UploadedDocument::new("broken.pdf", b"%PDF-1.4 garbage".to_vec());
        assert!(extract(&doc)
            .display_text()
            .starts_with("Error extracting text from PDF:"));
    }
}
