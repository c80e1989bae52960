use std::path::Path;

use chrono::NaiveDateTime;
use serde_json::json;

use crf_core::{
    extract_document, extract_words_only, result::format_extraction_time, DocumentError,
    ExtractionResult, RunInfo,
};
use pdf::PdfDocument;

use crate::cli::App;
use crate::persist::save_result;
use crate::prelude::*;

/// What to print and how to exit.
#[derive(Debug)]
pub struct Outcome {
    pub success: bool,
    pub json: String,
}

/// Payload for runs that never reach the document.
pub fn failure_payload(message: &str) -> String {
    json!({
        "success": false,
        "error": message,
        "pages": [],
        "metadata": { "total_words": 0 },
    })
    .to_string()
}

fn open_document(path: &Path) -> Result<PdfDocument, DocumentError> {
    if !path.is_file() {
        return Err(DocumentError::SourceNotFound(path.display().to_string()));
    }
    PdfDocument::open(path).map_err(|e| DocumentError::Open(e.to_string()))
}

pub fn run(app: &App, now: NaiveDateTime) -> Result<Outcome, Error> {
    let config = match app.layout_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return Ok(Outcome {
                success: false,
                json: failure_payload(&e.to_string()),
            });
        }
    };
    log::debug!("layout config: {config:?}");

    if app.words_only {
        return words_only(&app.pdf_file_path, now);
    }

    let info = RunInfo::new(
        app.pdf_file_path.display().to_string(),
        app.study_id.clone(),
        &now,
    );

    let mut result = match open_document(&app.pdf_file_path) {
        Ok(doc) => extract_document(&doc, &config, info),
        Err(e) => {
            log::error!("{e}");
            ExtractionResult::failure(info, &e)
        }
    };

    if result.success {
        match save_result(&result, &app.output_dir, app.study_id.as_deref(), &now) {
            Ok(paths) => result.mark_saved(paths.timestamped.display().to_string()),
            Err(e) => {
                log::error!("{e}");
                result.mark_save_failed(&e);
            }
        }
    }

    Ok(Outcome {
        success: result.success,
        json: serde_json::to_string(&result)?,
    })
}

fn words_only(path: &Path, now: NaiveDateTime) -> Result<Outcome, Error> {
    match open_document(path) {
        Ok(doc) => {
            let result = extract_words_only(&doc, format_extraction_time(&now));
            Ok(Outcome {
                success: result.success,
                json: serde_json::to_string(&result)?,
            })
        }
        Err(e) => {
            log::error!("{e}");
            Ok(Outcome {
                success: false,
                json: failure_payload(&e.to_string()),
            })
        }
    }
}
