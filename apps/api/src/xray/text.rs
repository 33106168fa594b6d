//! Plain-text extraction from a fetched document.
//!
//! PDFs go through `pdf-extract` on the blocking pool, bounded to the first
//! few pages. Any parse failure, including a panic inside the parser, yields
//! an empty document instead of an error.

use bytes::Bytes;
use pdf_extract::{Document, OutputError, PlainTextOutput};
use tracing::{debug, warn};

use crate::xray::fetcher::FetchedDocument;

pub const DEFAULT_MAX_PAGES: usize = 3;
/// Documents with less text than this are treated as unparseable (scanned images, stubs).
pub const MIN_USABLE_TEXT_CHARS: usize = 50;

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_SCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    /// Pages in the source document (not only the ones read).
    pub page_count: usize,
}

impl ExtractedDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_usable(&self) -> bool {
        self.text.trim().chars().count() >= MIN_USABLE_TEXT_CHARS
    }
}

/// Some generators prepend junk before the header, so look past byte zero.
pub fn is_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(PDF_MAGIC_SCAN_BYTES)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

fn is_plain_text(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("text/plain"))
        .unwrap_or(false)
}

/// Synchronous PDF extraction. Only the first `max_pages` pages are rendered,
/// so a broken page further in never costs the document. May panic on
/// hostile input; see [`extract_text`].
pub fn extract_pdf_text(bytes: &[u8], max_pages: usize) -> ExtractedDocument {
    let doc = match load_pdf(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(error = %e, "PDF parse failed");
            return ExtractedDocument::empty();
        }
    };

    let pages = doc.get_pages();
    let mut rendered = Vec::new();
    for &page_num in pages.keys().take(max_pages) {
        let mut page_text = String::new();
        let result = {
            let mut output = PlainTextOutput::new(&mut page_text);
            pdf_extract::output_doc_page(&doc, &mut output, page_num)
        };
        match result {
            Ok(()) => rendered.push(page_text.trim().to_string()),
            Err(e) => debug!(page = page_num, error = %e, "PDF page skipped"),
        }
    }

    ExtractedDocument {
        text: rendered.join("\n").trim().to_string(),
        page_count: pages.len(),
    }
}

fn load_pdf(bytes: &[u8]) -> Result<Document, OutputError> {
    let mut doc = Document::load_mem(bytes)?;
    if doc.is_encrypted() {
        doc.decrypt("")?;
    }
    Ok(doc)
}

/// Converts a fetched document to text. Never fails.
pub async fn extract_text(document: FetchedDocument, max_pages: usize) -> ExtractedDocument {
    let FetchedDocument {
        bytes,
        content_type,
    } = document;

    if is_pdf(&bytes) {
        return extract_pdf_text_blocking(bytes, max_pages).await;
    }
    if is_plain_text(content_type.as_deref()) {
        return ExtractedDocument {
            text: String::from_utf8_lossy(&bytes).trim().to_string(),
            page_count: 1,
        };
    }

    debug!(?content_type, "unsupported document format");
    ExtractedDocument::empty()
}

async fn extract_pdf_text_blocking(bytes: Bytes, max_pages: usize) -> ExtractedDocument {
    match tokio::task::spawn_blocking(move || extract_pdf_text(&bytes, max_pages)).await {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "PDF extraction aborted");
            ExtractedDocument::empty()
        }
    }
}
