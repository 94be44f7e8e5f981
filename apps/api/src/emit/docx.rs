use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run};

use super::EmitError;

/// Packs `text` into a DOCX with a single paragraph holding the whole text in one run.
///
/// Each `\n` becomes a `<w:br/>` inside the run; default styles only.
pub fn to_docx(text: &str) -> Result<Vec<u8>, EmitError> {
    let docx = Docx::new().add_paragraph(Paragraph::new().add_run(text_run(text)));

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| EmitError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Run text drops control characters, so line breaks are emitted as break elements.
fn text_run(text: &str) -> Run {
    let mut run = Run::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line.trim_end_matches('\r'));
    }
    run
}
