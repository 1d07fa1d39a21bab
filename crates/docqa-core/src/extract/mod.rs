//! Document extraction: raw bytes to text chunks

mod office;
mod pdf;

pub use office::{DocumentConverter, HttpConverter};
pub use pdf::{PdfExtractTool, PdfExtractor};

use crate::config::ConverterConfig;
use crate::error::{DocQaError, Result};
use crate::index::{chunk_text, Chunk};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Characters assumed per page when estimating page numbers for
/// non-paginated formats
const CHARS_PER_PAGE: usize = 3000;

/// Supported document types, detected from the filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Doc,
    Docx,
    Ppt,
    Pptx,
    Xls,
    Xlsx,
}

impl FileType {
    /// Detect the file type from a filename extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "md" => Some(Self::Markdown),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "ppt" => Some(Self::Ppt),
            "pptx" => Some(Self::Pptx),
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Canonical MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Text => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Ppt => "application/vnd.ms-powerpoint",
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Xls => "application/vnd.ms-excel",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Filename extension including the leading dot
    pub fn dot_extension(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Text => ".txt",
            Self::Markdown => ".md",
            Self::Doc => ".doc",
            Self::Docx => ".docx",
            Self::Ppt => ".ppt",
            Self::Pptx => ".pptx",
            Self::Xls => ".xls",
            Self::Xlsx => ".xlsx",
        }
    }

    /// Whether the type goes through the office-to-markdown converter
    pub fn is_office(&self) -> bool {
        matches!(
            self,
            Self::Doc | Self::Docx | Self::Ppt | Self::Pptx | Self::Xls | Self::Xlsx
        )
    }

    fn supported_list() -> String {
        [
            Self::Pdf,
            Self::Doc,
            Self::Docx,
            Self::Ppt,
            Self::Pptx,
            Self::Xls,
            Self::Xlsx,
            Self::Text,
            Self::Markdown,
        ]
        .iter()
        .map(|t| t.mime_type())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Whether the filename maps to a supported document type
pub fn validate_file_type(filename: &str) -> bool {
    FileType::from_filename(filename).is_some()
}

/// Document metadata reported without full processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    pub mime_type: String,
    pub size: usize,
    /// Real page count for PDFs, absent otherwise
    pub pages: Option<usize>,
}

/// Converts raw document bytes into chunks ready for embedding.
///
/// PDF pages and office conversion go through seams so tests can substitute
/// the external services.
pub struct DocumentExtractor {
    pdf: Arc<dyn PdfExtractor>,
    converter: Arc<dyn DocumentConverter>,
}

impl DocumentExtractor {
    pub fn new(pdf: Arc<dyn PdfExtractor>, converter: Arc<dyn DocumentConverter>) -> Self {
        Self { pdf, converter }
    }

    /// Default wiring: in-process PDF extraction, HTTP office conversion
    pub fn with_defaults(converter_config: ConverterConfig) -> Result<Self> {
        Ok(Self {
            pdf: Arc::new(PdfExtractTool),
            converter: Arc::new(HttpConverter::new(converter_config)?),
        })
    }

    /// Turn a document into ordered text chunks with page metadata.
    ///
    /// Fails with [`DocQaError::UnsupportedType`] before any processing when
    /// the extension is not recognized.
    pub async fn process_document_content(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Vec<Chunk>> {
        let file_type = FileType::from_filename(filename).ok_or_else(|| {
            DocQaError::UnsupportedType(format!(
                "{}. Supported types: {}",
                filename,
                FileType::supported_list()
            ))
        })?;

        match file_type {
            FileType::Pdf => self.process_pdf(bytes).await,
            FileType::Text | FileType::Markdown => {
                let text = decode_text(bytes);
                Ok(chunk_with_estimated_pages(&text))
            }
            office => {
                let markdown = self.convert_office(bytes, office).await?;
                Ok(chunk_with_estimated_pages(&markdown))
            }
        }
    }

    /// Per-page extraction and chunking; pages are processed concurrently
    /// and blank pages contribute no chunks.
    async fn process_pdf(&self, bytes: &[u8]) -> Result<Vec<Chunk>> {
        let pages = self.pdf.pages(bytes)?;

        let page_chunks = join_all(pages.into_iter().enumerate().map(
            |(page_index, page_text)| async move {
                if page_text.trim().is_empty() {
                    return Vec::new();
                }
                let mut chunks = chunk_text(&page_text);
                for chunk in &mut chunks {
                    chunk.page = Some(page_index as u32 + 1);
                }
                chunks
            },
        ))
        .await;

        Ok(page_chunks.into_iter().flatten().collect())
    }

    /// Write the bytes to a scoped temp file for the external converter.
    ///
    /// The temp file is removed on every exit path; a failed removal is
    /// logged and swallowed.
    async fn convert_office(&self, bytes: &[u8], file_type: FileType) -> Result<String> {
        let mut temp = tempfile::Builder::new()
            .prefix("docqa-convert-")
            .suffix(file_type.dot_extension())
            .tempfile()?;
        temp.write_all(bytes)?;
        temp.flush()?;

        let conversion = self.converter.convert(temp.path()).await;

        let temp_path = temp.path().to_path_buf();
        if let Err(e) = temp.close() {
            tracing::warn!(path = %temp_path.display(), error = %e, "failed to remove temp file");
        }

        let markdown =
            conversion.map_err(|e| DocQaError::Conversion(format!("{e}")))?;
        if markdown.trim().is_empty() {
            return Err(DocQaError::Conversion(
                "converter returned empty markdown".to_string(),
            ));
        }
        Ok(markdown)
    }

    /// Lightweight metadata for a document; extraction problems degrade to
    /// partial metadata rather than failing.
    pub fn document_metadata(&self, bytes: &[u8], filename: &str) -> DocumentInfo {
        let file_type = FileType::from_filename(filename);
        let mime_type = file_type
            .map(|t| t.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let pages = if file_type == Some(FileType::Pdf) {
            match self.pdf.page_count(bytes) {
                Ok(count) => Some(count),
                Err(e) => {
                    tracing::warn!(filename, error = %e, "failed to read PDF page count");
                    None
                }
            }
        } else {
            None
        };

        DocumentInfo {
            filename: filename.to_string(),
            mime_type,
            size: bytes.len(),
            pages,
        }
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Chunk whole-document text and assign estimated page numbers.
///
/// The page is `start_position / 3000 + 1` -- a placeholder, not a real
/// page boundary.
fn chunk_with_estimated_pages(text: &str) -> Vec<Chunk> {
    let mut chunks = chunk_text(text);
    for chunk in &mut chunks {
        chunk.page = Some((chunk.start_position / CHARS_PER_PAGE) as u32 + 1);
    }
    chunks
}
