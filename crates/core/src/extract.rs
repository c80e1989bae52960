//! Whole-document extraction driver.
//!
//! Pages are pulled from a [`WordSource`] strictly in ascending page order
//! and a failing page is logged and skipped; the merge step then runs once
//! over the surviving pages.

use std::fmt::Display;

use crate::config::LayoutConfig;
use crate::merge::merge_cross_page_forms;
use crate::page::{extract_raw_forms, ExtractionWarning};
use crate::result::{
    ExtractionResult, FormsSummary, Metadata, RunInfo, WordsOnlyMetadata, WordsOnlyResult,
};
use crate::word::Page;

/// Supplier of positioned words for an opened document.
///
/// Implementations must return words ordered by line top, then left to
/// right, with top/bottom edges in a Y-down page space.
pub trait WordSource {
    type Error: Display;

    /// Number of physical pages in the document.
    fn page_count(&self) -> usize;

    /// Words and dimensions of a 1-based page.
    fn page(&self, page_number: u32) -> Result<Page, Self::Error>;
}

/// Pages read from a source, plus notices for the ones that failed.
#[derive(Debug, Clone, Default)]
pub struct CollectedPages {
    pub pages: Vec<Page>,
    pub warnings: Vec<ExtractionWarning>,
}

impl CollectedPages {
    pub fn total_words(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }
}

/// Read every page of `source` in order, skipping the ones that fail.
pub fn collect_pages<S: WordSource + ?Sized>(source: &S) -> CollectedPages {
    let total = source.page_count();
    log::info!("extracting word positions from {total} pages");

    let mut out = CollectedPages::default();
    for page_number in (1..=total).map(|n| n as u32) {
        match source.page(page_number) {
            Ok(page) => {
                log::debug!("page {}: {} words", page_number, page.words.len());
                out.pages.push(page);
            }
            Err(e) => {
                let warning = ExtractionWarning::PageSkipped {
                    page_number,
                    message: e.to_string(),
                };
                log::warn!("{warning}");
                out.warnings.push(warning);
            }
        }
    }
    out
}

/// Reconstruct the form collection from already extracted pages.
pub fn extract_forms(pages: &[Page], config: &LayoutConfig) -> FormsSummary {
    reconstruct(pages, config).0
}

fn reconstruct(pages: &[Page], config: &LayoutConfig) -> (FormsSummary, Vec<ExtractionWarning>) {
    let raw = extract_raw_forms(pages, config);
    let collection = merge_cross_page_forms(raw.forms, config);
    (FormsSummary::new(collection), raw.warnings)
}

/// Run the full pipeline over an opened document.
pub fn extract_document<S: WordSource + ?Sized>(
    source: &S,
    config: &LayoutConfig,
    info: RunInfo,
) -> ExtractionResult {
    let collected = collect_pages(source);
    let total_words = collected.total_words();

    let (forms, form_warnings) = reconstruct(&collected.pages, config);
    let total_forms = forms.crf_form_name.total_forms;

    log::info!("found {} forms in {} words", total_forms, total_words);
    if total_forms > 0 {
        log::info!("form names: {}", forms.crf_form_name.names.join(", "));
    }

    let warnings = collected
        .warnings
        .iter()
        .chain(form_warnings.iter())
        .map(ToString::to_string)
        .collect();

    ExtractionResult {
        success: true,
        study_id: info.study_id,
        file_path: info.file_path,
        extraction_time: info.extraction_time,
        total_pages: source.page_count(),
        pages: collected.pages,
        forms: Some(forms),
        metadata: Metadata {
            total_words,
            total_forms: Some(total_forms),
        },
        error: None,
        saved_file: None,
        warnings,
    }
}

/// Read word positions only, without form reconstruction.
pub fn extract_words_only<S: WordSource + ?Sized>(
    source: &S,
    extraction_time: String,
) -> WordsOnlyResult {
    let collected = collect_pages(source);
    let total_words = collected.total_words();
    log::info!(
        "extracted {} words from {} pages",
        total_words,
        collected.pages.len()
    );

    WordsOnlyResult {
        success: true,
        extraction_time,
        metadata: WordsOnlyMetadata {
            total_pages: collected.pages.len(),
            total_words,
        },
        pages: collected.pages,
    }
}
