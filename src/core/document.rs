//! Plain-text extraction from paginated documents.
//!
//! The extractor works against the [`PaginatedDocument`] seam so the page
//! iteration rules stay independent of the PDF library. [`PdfDocument`] is the
//! concrete backend, built on `lopdf`.

use crate::domain::model::ExtractedDocument;
use crate::utils::error::DocumentError;
use lopdf::Document as LopdfDocument;

/// A parsed document whose pages can be read independently.
pub trait PaginatedDocument {
    /// Page numbers in document order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Text of a single page. An error here only affects that page.
    fn page_text(&self, page: u32) -> Result<String, DocumentError>;
}

pub struct PdfDocument {
    doc: LopdfDocument,
}

impl PdfDocument {
    pub fn load_bytes(data: &[u8]) -> Result<Self, DocumentError> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| DocumentError::Malformed(e.to_string()))?;
        Ok(Self { doc })
    }
}

impl PaginatedDocument for PdfDocument {
    fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    fn page_text(&self, page: u32) -> Result<String, DocumentError> {
        self.doc
            .extract_text(&[page])
            .map_err(|e| DocumentError::PageExtraction {
                page,
                message: e.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_text(&self, document_bytes: &[u8]) -> Result<ExtractedDocument, DocumentError> {
        let document = PdfDocument::load_bytes(document_bytes)?;
        Ok(self.extract_pages(&document))
    }

    /// 逐頁擷取；單頁失敗只留下空字串，不中斷後續頁面
    pub fn extract_pages<D: PaginatedDocument>(&self, document: &D) -> ExtractedDocument {
        let pages: Vec<String> = document
            .page_numbers()
            .into_iter()
            .map(|page| match document.page_text(page) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("⚠️ {}", e);
                    String::new()
                }
            })
            .collect();

        tracing::debug!("Extracted text from {} pages", pages.len());
        ExtractedDocument::new(pages)
    }
}
