use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::prelude::*;

/// Files written for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPaths {
    pub timestamped: PathBuf,
    pub latest: PathBuf,
}

/// `crf_positions_{study}_{YYYYMMDD_HHMMSS}.json` and `crf_positions_{study}_latest.json`.
/// The study segment is dropped when no study id is given.
pub fn file_names(study_id: Option<&str>, at: &NaiveDateTime) -> (String, String) {
    let timestamp = at.format("%Y%m%d_%H%M%S");
    match study_id {
        Some(study) => (
            format!("crf_positions_{study}_{timestamp}.json"),
            format!("crf_positions_{study}_latest.json"),
        ),
        None => (
            format!("crf_positions_{timestamp}.json"),
            "crf_positions_latest.json".to_string(),
        ),
    }
}

/// Write `result` as pretty JSON to a timestamped file and to the "latest"
/// file, creating `output_dir` if needed.
pub fn save_result<T: Serialize>(
    result: &T,
    output_dir: &Path,
    study_id: Option<&str>,
    at: &NaiveDateTime,
) -> Result<SavedPaths, Error> {
    std::fs::create_dir_all(output_dir).map_err(|source| Error::Persist {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let json = serde_json::to_string_pretty(result)?;
    let (timestamped, latest) = file_names(study_id, at);
    let paths = SavedPaths {
        timestamped: output_dir.join(timestamped),
        latest: output_dir.join(latest),
    };

    for path in [&paths.timestamped, &paths.latest] {
        std::fs::write(path, &json).map_err(|source| Error::Persist {
            path: path.clone(),
            source,
        })?;
    }

    log::info!("results saved to {}", paths.timestamped.display());
    log::info!("latest results saved to {}", paths.latest.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_file_names_with_study() {
        let (ts, latest) = file_names(Some("ABC-001"), &at());
        assert_eq!(ts, "crf_positions_ABC-001_20240309_140507.json");
        assert_eq!(latest, "crf_positions_ABC-001_latest.json");
    }

    #[test]
    fn test_file_names_without_study() {
        let (ts, latest) = file_names(None, &at());
        assert_eq!(ts, "crf_positions_20240309_140507.json");
        assert_eq!(latest, "crf_positions_latest.json");
    }

    #[test]
    fn test_save_creates_directory_and_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let value = json!({"success": true, "pages": []});

        let paths = save_result(&value, &out, Some("S1"), &at()).unwrap();

        assert_eq!(paths.timestamped, out.join("crf_positions_S1_20240309_140507.json"));
        assert_eq!(paths.latest, out.join("crf_positions_S1_latest.json"));

        let written = std::fs::read_to_string(&paths.timestamped).unwrap();
        assert!(written.contains('\n'), "saved files are pretty-printed");
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, value);
        assert_eq!(std::fs::read_to_string(&paths.latest).unwrap(), written);
    }

    #[test]
    fn test_latest_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        save_result(&json!({"run": 1}), dir.path(), None, &at()).unwrap();
        let paths = save_result(&json!({"run": 2}), dir.path(), None, &at()).unwrap();

        let latest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(paths.latest).unwrap()).unwrap();
        assert_eq!(latest["run"], 2);
    }

    #[test]
    fn test_output_dir_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = save_result(&json!({}), file.path(), None, &at()).unwrap_err();
        assert!(matches!(err, Error::Persist { .. }));
    }
}
