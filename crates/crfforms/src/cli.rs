use std::path::PathBuf;

use crf_core::LayoutConfig;

use crate::prelude::*;

#[derive(Debug, clap::Parser)]
#[command(
    name = "crfforms",
    author,
    version,
    about = "Reconstruct CRF form boundaries and merge forms that span pages",
    long_about = None
)]
pub struct App {
    /// Path to the CRF PDF
    pub pdf_file_path: PathBuf,

    /// Directory the result JSON files are written to
    pub output_dir: PathBuf,

    /// Study identifier, echoed in the result and used in file names
    pub study_id: Option<String>,

    /// Only extract word positions; skips form reconstruction and saving
    #[clap(long)]
    pub words_only: bool,

    /// JSON file with layout settings; flags below override its values
    #[clap(long, env = "CRF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Whether to display debug logs.
    #[clap(short, long, env = "CRF_VERBOSE")]
    pub verbose: bool,

    #[clap(flatten)]
    pub layout: LayoutArgs,
}

/// Per-field overrides of [`LayoutConfig`].
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LayoutArgs {
    /// Token that introduces a form title
    #[clap(long, env = "CRF_MARKER")]
    pub marker: Option<String>,

    /// Maximum vertical offset for a word to join the title line
    #[clap(long, env = "CRF_TITLE_Y_TOLERANCE")]
    pub title_y_tolerance: Option<f64>,

    /// Distance below the title line where form content starts
    #[clap(long, env = "CRF_CONTENT_TOP_OFFSET")]
    pub content_top_offset: Option<f64>,

    /// Distance kept above the next title on the same page
    #[clap(long, env = "CRF_NEXT_TITLE_GAP")]
    pub next_title_gap: Option<f64>,

    /// Bottom margin for the last form on a page
    #[clap(long, env = "CRF_BOTTOM_MARGIN")]
    pub bottom_margin: Option<f64>,

    /// Left content margin
    #[clap(long, env = "CRF_LEFT_X")]
    pub left_x: Option<f64>,

    /// Right content margin
    #[clap(long, env = "CRF_RIGHT_X")]
    pub right_x: Option<f64>,

    /// Largest page gap that still merges same-named forms
    #[clap(long, env = "CRF_MAX_MERGE_PAGE_GAP")]
    pub max_merge_page_gap: Option<u32>,
}

impl LayoutArgs {
    pub fn apply(&self, mut config: LayoutConfig) -> LayoutConfig {
        if let Some(marker) = &self.marker {
            config.marker = marker.clone();
        }
        if let Some(v) = self.title_y_tolerance {
            config.title_y_tolerance = v;
        }
        if let Some(v) = self.content_top_offset {
            config.content_top_offset = v;
        }
        if let Some(v) = self.next_title_gap {
            config.next_title_gap = v;
        }
        if let Some(v) = self.bottom_margin {
            config.bottom_margin = v;
        }
        if let Some(v) = self.left_x {
            config.left_x = v;
        }
        if let Some(v) = self.right_x {
            config.right_x = v;
        }
        if let Some(v) = self.max_merge_page_gap {
            config.max_merge_page_gap = v;
        }
        config
    }
}

impl App {
    /// Layout settings from `--config` (or the defaults) with flag overrides applied.
    pub fn layout_config(&self) -> Result<LayoutConfig, Error> {
        let base = match &self.config {
            Some(path) => {
                let config_error = |message: String| Error::Config {
                    path: path.clone(),
                    message,
                };
                let raw = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
                serde_json::from_str(&raw).map_err(|e| config_error(e.to_string()))?
            }
            None => LayoutConfig::default(),
        };
        Ok(self.layout.apply(base))
    }
}
