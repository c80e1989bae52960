use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::merge::FormCollection;
use crate::word::Page;

/// Failures that end a run before any page is read.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("CRF PDF file not found: {0}")]
    SourceNotFound(String),
    #[error("Cannot open CRF PDF: {0}")]
    Open(String),
}

/// Identity of one extraction run, echoed back in the result.
#[derive(Debug, Clone, PartialEq)]
pub struct RunInfo {
    pub study_id: Option<String>,
    pub file_path: String,
    pub extraction_time: String,
}

impl RunInfo {
    pub fn new(file_path: impl Into<String>, study_id: Option<String>, at: &NaiveDateTime) -> Self {
        Self {
            study_id,
            file_path: file_path.into(),
            extraction_time: format_extraction_time(at),
        }
    }
}

/// ISO 8601 local timestamp with microseconds and no offset.
pub fn format_extraction_time(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormNames {
    pub names: Vec<String>,
    pub total_forms: usize,
}

/// The `forms` section of the result document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormsSummary {
    #[serde(rename = "crfFormList")]
    pub crf_form_list: FormCollection,
    #[serde(rename = "crfFormName")]
    pub crf_form_name: FormNames,
}

impl FormsSummary {
    pub fn new(collection: FormCollection) -> Self {
        let names = collection.names();
        Self {
            crf_form_name: FormNames {
                total_forms: names.len(),
                names,
            },
            crf_form_list: collection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub total_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_forms: Option<usize>,
}

/// Full result of a form extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub study_id: Option<String>,
    pub file_path: String,
    pub extraction_time: String,
    pub total_pages: usize,
    pub pages: Vec<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forms: Option<FormsSummary>,
    pub metadata: Metadata,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_file: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// A run that could not read the document at all.
    pub fn failure(info: RunInfo, error: &DocumentError) -> Self {
        Self {
            success: false,
            study_id: info.study_id,
            file_path: info.file_path,
            extraction_time: info.extraction_time,
            total_pages: 0,
            pages: Vec::new(),
            forms: None,
            metadata: Metadata {
                total_words: 0,
                total_forms: None,
            },
            error: Some(error.to_string()),
            saved_file: None,
            warnings: Vec::new(),
        }
    }

    pub fn mark_saved(&mut self, path: impl Into<String>) {
        self.saved_file = Some(path.into());
    }

    /// Extraction itself succeeded but the result could not be written.
    pub fn mark_save_failed(&mut self, cause: impl std::fmt::Display) {
        self.success = false;
        self.error = Some(format!(
            "Extraction successful but failed to save: {cause}"
        ));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordsOnlyMetadata {
    pub total_pages: usize,
    pub total_words: usize,
}

/// Result of a words-only run: page word arrays without form reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordsOnlyResult {
    pub success: bool,
    pub extraction_time: String,
    pub pages: Vec<Page>,
    pub metadata: WordsOnlyMetadata,
}
