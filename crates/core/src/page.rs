use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boundary::calculate_boundaries;
use crate::config::LayoutConfig;
use crate::content::assign_content;
use crate::title::detect_form_titles;
use crate::word::{BoundingBox, ContentBounds, Page, Word};

/// A form detected on a single page, before cross-page merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForm {
    pub title: String,
    pub normalized_title: String,
    pub title_position: BoundingBox,
    pub content_bounds: ContentBounds,
    pub page_number: u32,
    pub word_count: usize,
    pub all_words: Vec<Word>,
    pub full_text: String,
    pub is_multi_page: bool,
}

/// Non-fatal condition met while reconstructing forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionWarning {
    /// A region whose bottom lies above its top; the form was skipped.
    DegenerateBounds {
        page_number: u32,
        normalized_title: String,
        top_y: f64,
        bottom_y: f64,
    },
    /// The word service failed on a page; the page contributes nothing.
    PageSkipped { page_number: u32, message: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::DegenerateBounds {
                page_number,
                normalized_title,
                top_y,
                bottom_y,
            } => write!(
                f,
                "page {page_number}: skipped form '{normalized_title}' with inverted bounds (top {top_y}, bottom {bottom_y})"
            ),
            ExtractionWarning::PageSkipped {
                page_number,
                message,
            } => write!(f, "page {page_number}: skipped ({message})"),
        }
    }
}

/// Forms and warnings produced by one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageForms {
    pub forms: Vec<RawForm>,
    pub warnings: Vec<ExtractionWarning>,
}

/// Run title detection, boundary calculation and content assignment on one
/// page. Forms come out in top-to-bottom title order.
pub fn extract_page_forms(page: &Page, config: &LayoutConfig) -> PageForms {
    let titles = detect_form_titles(&page.words, page.page_number, config);
    if titles.is_empty() {
        return PageForms::default();
    }

    let mut out = PageForms::default();
    for bounded in calculate_boundaries(titles, page.page_height, config) {
        let candidate = bounded.candidate;
        let bounds = bounded.bounds;

        if bounds.is_degenerate() {
            let warning = ExtractionWarning::DegenerateBounds {
                page_number: page.page_number,
                normalized_title: candidate.normalized_title,
                top_y: bounds.top_y,
                bottom_y: bounds.bottom_y,
            };
            log::warn!("{warning}");
            out.warnings.push(warning);
            continue;
        }

        let content = assign_content(&page.words, &bounds);
        out.forms.push(RawForm {
            title: candidate.title,
            normalized_title: candidate.normalized_title,
            title_position: candidate.position,
            content_bounds: bounds,
            page_number: page.page_number,
            word_count: content.word_count,
            all_words: content.words,
            full_text: content.full_text,
            is_multi_page: false,
        });
    }

    out
}

/// Collect raw forms across pages, in page order.
pub fn extract_raw_forms(pages: &[Page], config: &LayoutConfig) -> PageForms {
    let mut out = PageForms::default();
    for page in pages {
        let PageForms { forms, warnings } = extract_page_forms(page, config);
        log::debug!("page {}: {} form(s)", page.page_number, forms.len());
        out.forms.extend(forms);
        out.warnings.extend(warnings);
    }
    out
}
