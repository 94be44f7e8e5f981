use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use unicode_normalization::UnicodeNormalization;

use super::metrics::{FontMetricTable, PageLayout, HELVETICA};
use super::EmitError;

const FONT_RESOURCE: &[u8] = b"F1";

/// NFKD-decomposes `text` and drops everything outside 7-bit ASCII.
///
/// Lossy: accents become bare letters, non-Latin scripts disappear.
pub fn sanitize_for_pdf(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Lays `text` out as a single auto-paginated Helvetica 12pt cell on A4 pages.
pub fn to_pdf(text: &str) -> Result<Vec<u8>, EmitError> {
    let layout = PageLayout::a4();
    let safe_text = sanitize_for_pdf(text);
    let lines = wrap_text(&safe_text, &HELVETICA, &layout);
    render_pages(&lines, &HELVETICA, &layout)
}

/// Greedy word wrap at the cell's text width.
///
/// Explicit newlines always break; a blank source line yields a blank output line.
/// Words wider than the cell are split across lines.
fn wrap_text(text: &str, metrics: &FontMetricTable, layout: &PageLayout) -> Vec<String> {
    let max_width = layout.text_width();
    let font_size = layout.font_size;
    let space_width = metrics.measure_str(" ", font_size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph: String = paragraph
            .chars()
            .filter_map(|c| match c {
                '\t' => Some(' '),
                c if c.is_ascii_control() => None,
                c => Some(c),
            })
            .collect();

        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_width = metrics.measure_str(word, font_size);

            if !current.is_empty() && current_width + space_width + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space_width + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            // Over-long word: hard-break at the last character that still fits.
            for c in word.chars() {
                let char_width = metrics.measure_str(c.encode_utf8(&mut [0; 4]), font_size);
                if !current.is_empty() && current_width + char_width > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += char_width;
            }
        }

        lines.push(current);
    }

    // Trailing blank lines add nothing but empty space.
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn render_pages(
    lines: &[String],
    metrics: &FontMetricTable,
    layout: &PageLayout,
) -> Result<Vec<u8>, EmitError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(metrics.base_font.as_bytes().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    let mut fonts = Dictionary::new();
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    let resources_id = doc.add_object(resources);

    // A page is always emitted, even for empty text.
    let blank_page: &[String] = &[];
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![blank_page]
    } else {
        lines.chunks(layout.lines_per_page()).collect()
    };

    let mut page_ids = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let content = page_content(chunk, layout);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        page_ids.push(add_page(&mut doc, pages_id, content_id, resources_id, layout));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn page_content(lines: &[String], layout: &PageLayout) -> Content {
    let x = layout.margin_left + layout.cell_padding;
    let mut operations = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_RESOURCE.to_vec()),
                Object::Real(layout.font_size as _),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![
                Object::Real(round2(x) as _),
                Object::Real(round2(layout.baseline(index)) as _),
            ],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                line.as_bytes().to_vec(),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    content_id: ObjectId,
    resources_id: ObjectId,
    layout: &PageLayout,
) -> ObjectId {
    doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(round2(layout.page_width) as _),
                Object::Real(round2(layout.page_height) as _),
            ]),
        ),
        ("Resources", Object::Reference(resources_id)),
        ("Contents", Object::Reference(content_id)),
    ]))
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_sanitize_transliterates_accents() {
        assert_eq!(sanitize_for_pdf("Café naïve"), "Cafe naive");
    }

    #[test]
    fn test_sanitize_drops_non_latin_and_symbols() {
        assert_eq!(sanitize_for_pdf("Go — 開発者 ✓"), "Go   ");
        assert_eq!(sanitize_for_pdf("ﬁle"), "file");
    }

    #[test]
    fn test_pdf_body_is_ascii_only() {
        let bytes = to_pdf("Café naïve").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, b"(Cafe naive)"));
    }

    #[test]
    fn test_wrap_respects_newlines_and_blank_lines() {
        let layout = PageLayout::a4();
        let lines = wrap_text("### Optimized Resume\n\nExperienced", &HELVETICA, &layout);
        assert_eq!(lines, vec!["### Optimized Resume", "", "Experienced"]);
    }

    #[test]
    fn test_wrap_breaks_long_paragraph_within_width() {
        let layout = PageLayout::a4();
        let paragraph = "distributed systems engineer ".repeat(40);
        let lines = wrap_text(&paragraph, &HELVETICA, &layout);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(HELVETICA.measure_str(line, layout.font_size) <= layout.text_width());
        }
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let layout = PageLayout::a4();
        let word = "W".repeat(200);
        let lines = wrap_text(&word, &HELVETICA, &layout);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_empty_text_still_has_one_page() {
        let bytes = to_pdf("").unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_long_text_paginates() {
        let text = (1..=60)
            .map(|i| format!("Line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = to_pdf(&text).unwrap();
        // 27 lines per A4 page.
        assert_eq!(page_count(&bytes), 3);
    }

    #[test]
    fn test_parentheses_survive_encoding() {
        let bytes = to_pdf("Rust (5 years)").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let shown: Vec<_> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(
            shown[0].operands[0].as_str().unwrap(),
            b"Rust (5 years)".as_slice()
        );
    }
}
