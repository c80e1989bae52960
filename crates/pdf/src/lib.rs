//! Word extraction service for CRF PDFs.
//!
//! Opens a document with `lopdf`, walks each page's content stream and
//! returns positioned words in a top-left origin, Y-down coordinate space.
//! [`PdfDocument`] implements [`crf_core::WordSource`] so it can be handed
//! straight to the form reconstruction pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crf_core::{Page, WordSource};
use parser::backend::{LopdfBackend, PageId, PdfBackend};

pub mod parser;
pub mod text;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Page not found: {0}")]
    PageNotFound(u32),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tolerances used when grouping glyphs into words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordExtractorConfig {
    /// Largest horizontal gap between two glyphs of the same word.
    pub x_tolerance: f64,
    /// Largest difference in top edge between glyphs of the same line.
    pub y_tolerance: f64,
    /// Glyph box height above the baseline, as a fraction of font size.
    pub ascent_ratio: f64,
    /// Glyph box depth below the baseline, as a fraction of font size.
    pub descent_ratio: f64,
}

impl Default for WordExtractorConfig {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            ascent_ratio: 0.8,
            descent_ratio: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// An opened PDF ready for per-page word extraction.
pub struct PdfDocument {
    backend: LopdfBackend,
    pages: BTreeMap<u32, PageId>,
    config: WordExtractorConfig,
}

impl PdfDocument {
    /// Read and parse the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse PDF bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        let pages = backend.pages();
        log::debug!("opened PDF with {} pages", pages.len());

        Ok(Self {
            backend,
            pages,
            config: WordExtractorConfig::default(),
        })
    }

    pub fn with_config(mut self, config: WordExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Words of a 1-based page, in reading order.
    pub fn page_words(&self, page_number: u32) -> Result<Page, PdfError> {
        let page_id = self
            .pages
            .get(&page_number)
            .copied()
            .ok_or(PdfError::PageNotFound(page_number))?;
        parser::words::extract_page_words(&self.backend, page_number, page_id, &self.config)
    }
}

impl WordSource for PdfDocument {
    type Error = PdfError;

    fn page_count(&self) -> usize {
        PdfDocument::page_count(self)
    }

    fn page(&self, page_number: u32) -> Result<Page, PdfError> {
        self.page_words(page_number)
    }
}
