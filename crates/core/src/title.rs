//! `Form:` marker detection.
//!
//! The word stream arrives ordered by line, then left-to-right, so the words
//! of a title line are exactly the run that immediately follows the marker
//! and stays within the Y tolerance of it.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::word::{BoundingBox, Word};

/// A form title found on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTitleCandidate {
    pub title: String,
    pub normalized_title: String,
    pub position: BoundingBox,
    pub page_number: u32,
    /// Top edge of the marker word.
    pub title_y: f64,
}

/// Canonical merge key: uppercase with spaces replaced by underscores.
pub fn normalize_title(title: &str) -> String {
    title.to_uppercase().replace(' ', "_")
}

/// Find every marker occurrence in `words` and build its title candidate.
///
/// Markers with no same-line words after them produce nothing. Several
/// markers on one page produce independent candidates.
pub fn detect_form_titles(
    words: &[Word],
    page_number: u32,
    config: &LayoutConfig,
) -> Vec<FormTitleCandidate> {
    words
        .iter()
        .enumerate()
        .filter(|(_, word)| config.is_marker(&word.text))
        .filter_map(|(i, marker)| title_from_marker(marker, &words[i + 1..], page_number, config))
        .collect()
}

fn title_from_marker(
    marker: &Word,
    following: &[Word],
    page_number: u32,
    config: &LayoutConfig,
) -> Option<FormTitleCandidate> {
    let form_y = marker.y0;
    let title_words: Vec<&Word> = following
        .iter()
        .take_while(|w| (w.y0 - form_y).abs() <= config.title_y_tolerance)
        .collect();

    if title_words.is_empty() {
        return None;
    }

    let title = title_words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let position = title_words
        .iter()
        .fold(marker.bbox(), |acc, w| acc.union(&w.bbox()));

    Some(FormTitleCandidate {
        normalized_title: normalize_title(&title),
        title,
        position,
        page_number,
        title_y: form_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f64, y0: f64) -> Word {
        Word::new(text, x0, y0, x0 + 8.0 * text.len() as f64, y0 + 10.0, "Helvetica", 10.0)
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Vital Signs"), "VITAL_SIGNS");
        assert_eq!(normalize_title("Adverse  Events"), "ADVERSE__EVENTS");
        assert_eq!(normalize_title("demographics"), "DEMOGRAPHICS");
    }

    #[test]
    fn test_detect_single_title() {
        let words = vec![
            word("Form:", 90.0, 72.0),
            word("Vital", 140.0, 72.0),
            word("Signs", 190.0, 72.5),
            word("Height", 100.0, 100.0),
        ];

        let titles = detect_form_titles(&words, 3, &LayoutConfig::default());

        assert_eq!(titles.len(), 1);
        let t = &titles[0];
        assert_eq!(t.title, "Vital Signs");
        assert_eq!(t.normalized_title, "VITAL_SIGNS");
        assert_eq!(t.page_number, 3);
        assert_eq!(t.title_y, 72.0);
        assert_eq!(t.position.x0, 90.0);
        assert_eq!(t.position.y0, 72.0);
        assert_eq!(t.position.x1, 190.0 + 40.0);
        assert_eq!(t.position.y1, 82.5);
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let words = vec![word("FORM:", 90.0, 72.0), word("Demographics", 140.0, 72.0)];
        let titles = detect_form_titles(&words, 1, &LayoutConfig::default());
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].normalized_title, "DEMOGRAPHICS");
    }

    #[test]
    fn test_no_marker_yields_nothing() {
        let words = vec![word("Form", 90.0, 72.0), word("Demographics", 140.0, 72.0)];
        assert!(detect_form_titles(&words, 1, &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn test_marker_as_last_word_yields_nothing() {
        let words = vec![word("Height", 100.0, 50.0), word("Form:", 90.0, 72.0)];
        assert!(detect_form_titles(&words, 1, &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn test_marker_without_same_line_words_yields_nothing() {
        let words = vec![word("Form:", 90.0, 72.0), word("Height", 100.0, 100.0)];
        assert!(detect_form_titles(&words, 1, &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn test_scan_stops_at_first_word_outside_tolerance() {
        // The last word is back on the title's Y but comes after a break in
        // the run, so it must not join the title.
        let words = vec![
            word("Form:", 90.0, 72.0),
            word("Vital", 140.0, 73.9),
            word("Signs", 190.0, 74.5),
            word("Late", 300.0, 72.0),
        ];
        let titles = detect_form_titles(&words, 1, &LayoutConfig::default());
        assert_eq!(titles[0].title, "Vital");
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let words = vec![word("Form:", 90.0, 72.0), word("Labs", 140.0, 74.0)];
        let titles = detect_form_titles(&words, 1, &LayoutConfig::default());
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].title, "Labs");
    }

    #[test]
    fn test_multiple_markers_on_one_page() {
        let words = vec![
            word("Form:", 90.0, 72.0),
            word("Demographics", 140.0, 72.0),
            word("Sex", 100.0, 100.0),
            word("Form:", 90.0, 400.0),
            word("Vital", 140.0, 400.0),
            word("Signs", 190.0, 400.0),
        ];
        let titles = detect_form_titles(&words, 2, &LayoutConfig::default());
        let names: Vec<_> = titles.iter().map(|t| t.normalized_title.as_str()).collect();
        assert_eq!(names, vec!["DEMOGRAPHICS", "VITAL_SIGNS"]);
    }

    #[test]
    fn test_custom_marker() {
        let cfg = LayoutConfig {
            marker: "Section:".to_string(),
            ..LayoutConfig::default()
        };
        let words = vec![
            word("Form:", 90.0, 40.0),
            word("Ignored", 140.0, 40.0),
            word("section:", 90.0, 72.0),
            word("Labs", 140.0, 72.0),
        ];
        let titles = detect_form_titles(&words, 1, &cfg);
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].title, "Labs");
    }
}
