//! Text extraction from uploaded files.
//!
//! TXT uploads are decoded as UTF-8. PDF uploads are parsed with `lopdf`
//! and the text of every page is joined in page order, one newline between
//! pages. Either way the result must contain something besides whitespace.

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::InputError;
use crate::pipeline::types::{ExtractedText, FileKind};

/// Extract plain text from an upload of the given kind.
pub fn extract(bytes: &[u8], kind: FileKind) -> Result<ExtractedText, InputError> {
    let text = match kind {
        FileKind::Txt => decode_txt(bytes)?,
        FileKind::Pdf => pdf_page_texts(bytes)?.join("\n"),
    };
    debug!(kind = kind.label(), chars = text.chars().count(), "Extracted upload text");
    ExtractedText::new(text, kind)
}

fn decode_txt(bytes: &[u8]) -> Result<String, InputError> {
    Ok(std::str::from_utf8(bytes)?.to_string())
}

/// Text of each page, in page order, without trailing line breaks.
///
/// A page whose text cannot be decoded (exotic font encodings, image-only
/// content) contributes an empty string rather than failing the document.
pub fn pdf_page_texts(bytes: &[u8]) -> Result<Vec<String>, InputError> {
    let document =
        Document::load_mem(bytes).map_err(|e| InputError::MalformedDocument(e.to_string()))?;

    let pages = document.get_pages();
    let mut texts = Vec::with_capacity(pages.len());
    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(text) => texts.push(text.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!(page = page_number, error = %e, "Could not extract text from PDF page");
                texts.push(String::new());
            }
        }
    }
    Ok(texts)
}
