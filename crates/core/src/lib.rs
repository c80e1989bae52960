//! Core library for crfforms
//!
//! This crate implements the **Functional Core** of the crfforms application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`crf_core`** (this crate): form reconstruction over positioned words, zero file I/O
//! - **`pdf`**: the word extraction service backed by `lopdf`
//! - **`crfforms`**: argument parsing, persistence and orchestration (the Imperative Shell)
//!
//! Every function here is deterministic: the same pages and the same
//! [`LayoutConfig`] always produce the same form collection, in the same order.
//!
//! # Pipeline
//!
//! ```text
//! Page.words -> FormTitleCandidate[] -> BoundedTitle[] -> RawForm[]  (per page)
//!                 title::detect          boundary::calculate   content::assign
//!
//! RawForm[] (whole document) -> FormCollection
//!                 merge::merge_cross_page_forms
//! ```
//!
//! # Module Organization
//!
//! - [`word`]: positioned words, pages and bounding boxes
//! - [`config`]: layout policy (margins, offsets, tolerances, merge gap)
//! - [`title`]: `Form:` marker detection
//! - [`boundary`]: content regions between consecutive titles
//! - [`content`]: word membership inside a region
//! - [`page`]: per-page orchestration into raw forms
//! - [`merge`]: cross-page grouping and merging
//! - [`extract`]: whole-document driver over a [`WordSource`]
//! - [`result`]: the JSON result document
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use crf_core::{extract_forms, LayoutConfig, Page};
//!
//! let pages: Vec<Page> = load_pages();
//! let forms = extract_forms(&pages, &LayoutConfig::default());
//! for name in &forms.crf_form_name.names {
//!     println!("{name}");
//! }
//! ```

pub mod boundary;
pub mod config;
pub mod content;
pub mod extract;
pub mod merge;
pub mod page;
pub mod result;
pub mod title;
pub mod word;

pub use config::LayoutConfig;
pub use extract::{collect_pages, extract_document, extract_forms, extract_words_only, WordSource};
pub use merge::{FormCollection, FormKey, MergedForm};
pub use page::{ExtractionWarning, RawForm};
pub use result::{DocumentError, ExtractionResult, FormsSummary, RunInfo, WordsOnlyResult};
pub use word::{BoundingBox, ContentBounds, Page, Word};
