//! PDF text extraction seam

use crate::error::{DocQaError, Result};

/// Per-page PDF text extraction.
///
/// Extraction is CPU-bound and synchronous; the caller decides how to
/// schedule the per-page work.
pub trait PdfExtractor: Send + Sync {
    /// Extract the text of every page, in order
    fn pages(&self, bytes: &[u8]) -> Result<Vec<String>>;

    /// Number of pages in the document
    fn page_count(&self, bytes: &[u8]) -> Result<usize>;
}

/// In-process extractor backed by the `pdf-extract` crate
pub struct PdfExtractTool;

impl PdfExtractor for PdfExtractTool {
    fn pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| DocQaError::PdfExtract(e.to_string()))
    }

    fn page_count(&self, bytes: &[u8]) -> Result<usize> {
        Ok(self.pages(bytes)?.len())
    }
}
