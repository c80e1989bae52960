//! Glyph to word grouping.
//!
//! Glyphs are moved into a top-left origin, Y-down page space, clustered
//! into lines by their top edge and then split into words on whitespace or
//! on horizontal gaps wider than the configured tolerance.

use crf_core::{Page, Word};

use super::backend::{PageGeometry, PageId, PdfBackend};
use super::glyphs::{extract_page_glyphs, Glyph};
use crate::{PdfError, WordExtractorConfig};

/// A glyph box in Y-down page space.
#[derive(Debug, Clone)]
struct CharBox {
    text: String,
    x0: f64,
    x1: f64,
    top: f64,
    bottom: f64,
    fontname: String,
    size: f64,
}

impl CharBox {
    fn from_glyph(glyph: Glyph, geometry: &PageGeometry, config: &WordExtractorConfig) -> Self {
        let size = f64::from(glyph.font_size);
        let baseline = f64::from(geometry.top()) - f64::from(glyph.y);
        let x0 = f64::from(glyph.x) - f64::from(geometry.left);
        Self {
            x0,
            x1: x0 + f64::from(glyph.width),
            top: baseline - config.ascent_ratio * size,
            bottom: baseline + config.descent_ratio * size,
            fontname: glyph.font_name,
            size,
            text: glyph.text,
        }
    }

    fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Word under construction.
struct WordBuilder {
    text: String,
    x0: f64,
    x1: f64,
    top: f64,
    bottom: f64,
    fontname: String,
    size: f64,
}

impl WordBuilder {
    fn start(c: CharBox) -> Self {
        Self {
            text: c.text,
            x0: c.x0,
            x1: c.x1,
            top: c.top,
            bottom: c.bottom,
            fontname: c.fontname,
            size: c.size,
        }
    }

    fn push(&mut self, c: CharBox) {
        self.text.push_str(&c.text);
        self.x0 = self.x0.min(c.x0);
        self.x1 = self.x1.max(c.x1);
        self.top = self.top.min(c.top);
        self.bottom = self.bottom.max(c.bottom);
    }

    fn finish(self) -> Word {
        Word::new(
            self.text,
            self.x0,
            self.top,
            self.x1,
            self.bottom,
            self.fontname,
            self.size,
        )
    }
}

/// Cluster characters into lines by top edge, each line sorted left to right.
fn group_lines(mut chars: Vec<CharBox>, y_tolerance: f64) -> Vec<Vec<CharBox>> {
    chars.sort_by(|a, b| a.top.total_cmp(&b.top));

    let mut lines: Vec<Vec<CharBox>> = Vec::new();
    let mut anchor = f64::NEG_INFINITY;
    for c in chars {
        match lines.last_mut() {
            Some(line) if c.top - anchor <= y_tolerance => line.push(c),
            _ => {
                anchor = c.top;
                lines.push(vec![c]);
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    }
    lines
}

/// Split one line into words.
fn split_words(line: Vec<CharBox>, x_tolerance: f64, out: &mut Vec<Word>) {
    let mut current: Option<WordBuilder> = None;

    for c in line {
        if c.is_whitespace() {
            if let Some(word) = current.take() {
                out.push(word.finish());
            }
            continue;
        }

        current = match current.take() {
            Some(mut word) if c.x0 - word.x1 <= x_tolerance => {
                word.push(c);
                Some(word)
            }
            Some(word) => {
                out.push(word.finish());
                Some(WordBuilder::start(c))
            }
            None => Some(WordBuilder::start(c)),
        };
    }

    if let Some(word) = current {
        out.push(word.finish());
    }
}

/// Group positioned glyphs into words, in reading order.
pub fn group_words(
    glyphs: Vec<Glyph>,
    geometry: &PageGeometry,
    config: &WordExtractorConfig,
) -> Vec<Word> {
    let chars = glyphs
        .into_iter()
        .map(|g| CharBox::from_glyph(g, geometry, config))
        .collect();

    let mut words = Vec::new();
    for line in group_lines(chars, config.y_tolerance) {
        split_words(line, config.x_tolerance, &mut words);
    }
    words
}

/// Extract the words of a single page.
pub fn extract_page_words(
    backend: &dyn PdfBackend,
    page_number: u32,
    page_id: PageId,
    config: &WordExtractorConfig,
) -> Result<Page, PdfError> {
    let geometry = backend.page_geometry(page_id)?;
    let glyphs = extract_page_glyphs(backend, page_id)?;
    let words = group_words(glyphs, &geometry, config);

    Ok(Page {
        page_number,
        page_width: f64::from(geometry.width),
        page_height: f64::from(geometry.height),
        words,
    })
}
