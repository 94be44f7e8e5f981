use std::panic::{catch_unwind, AssertUnwindSafe};

/// Extracts page text from an in-memory PDF, joining non-blank pages with `\n`.
///
/// pdf_extract can panic on malformed input, so the call is wrapped in `catch_unwind`.
pub(super) fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    let pages = match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return Err(e.to_string()),
        Err(_) => return Err("PDF parser panicked (malformed PDF)".to_string()),
    };

    // Scanned pages come back blank; skip them.
    let text = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text)
}
