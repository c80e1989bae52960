use serde::{Deserialize, Serialize};

/// Layout policy for the standard CRF page.
///
/// The defaults describe a US-letter CRF with fixed horizontal margins.
/// Every value can be overridden for documents with a different layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Token that introduces a form title, matched case-insensitively.
    pub marker: String,
    /// Maximum |Δy0| for a word to sit on the marker's title line.
    pub title_y_tolerance: f64,
    /// Distance below the title line where content starts.
    pub content_top_offset: f64,
    /// Distance kept above the next title on the same page.
    pub next_title_gap: f64,
    /// Margin kept above the bottom edge for the last form on a page.
    pub bottom_margin: f64,
    pub left_x: f64,
    pub right_x: f64,
    /// Largest gap between consecutive pages of a same-named group that
    /// still merges the group into one form.
    pub max_merge_page_gap: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            marker: "form:".to_string(),
            title_y_tolerance: 2.0,
            content_top_offset: 15.0,
            next_title_gap: 5.0,
            bottom_margin: 50.0,
            left_x: 90.0,
            right_x: 540.0,
            max_merge_page_gap: 2,
        }
    }
}

impl LayoutConfig {
    /// Case-insensitive exact match against the configured marker.
    pub fn is_marker(&self, text: &str) -> bool {
        text.to_lowercase() == self.marker.to_lowercase()
    }
}
