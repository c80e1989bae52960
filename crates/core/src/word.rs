use serde::{Deserialize, Serialize};

/// A single positioned word as produced by the word extraction service.
///
/// Coordinates are in PDF points with the origin at the top-left corner of
/// the page and Y growing downward: `y0` is the top edge, `y1` the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub width: f64,
    pub height: f64,
    pub fontname: String,
    pub size: f64,
}

impl Word {
    /// Build a word from its edges; `width` and `height` are derived.
    pub fn new(
        text: impl Into<String>,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        fontname: impl Into<String>,
        size: f64,
    ) -> Self {
        Self {
            text: text.into(),
            x0,
            y0,
            x1,
            y1,
            width: x1 - x0,
            height: y1 - y0,
            fontname: fontname.into(),
            size,
        }
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox {
            x0: self.x0,
            y0: self.y0,
            x1: self.x1,
            y1: self.y1,
        }
    }
}

/// All words of one physical page, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: u32,
    pub page_width: f64,
    pub page_height: f64,
    pub words: Vec<Word>,
}

/// Axis-aligned rectangle in Y-down page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// The rectangular region of a page holding a form's body content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBounds {
    pub top_y: f64,
    pub bottom_y: f64,
    pub left_x: f64,
    pub right_x: f64,
}

impl ContentBounds {
    /// Point test on a word's top-left corner, inclusive on every edge.
    pub fn contains(&self, word: &Word) -> bool {
        (self.top_y..=self.bottom_y).contains(&word.y0)
            && (self.left_x..=self.right_x).contains(&word.x0)
    }

    /// `true` when the region is vertically inverted.
    pub fn is_degenerate(&self) -> bool {
        self.bottom_y < self.top_y
    }

    /// Element-wise envelope: minimum top/left, maximum bottom/right.
    pub fn envelope(&self, other: &ContentBounds) -> ContentBounds {
        ContentBounds {
            top_y: self.top_y.min(other.top_y),
            bottom_y: self.bottom_y.max(other.bottom_y),
            left_x: self.left_x.min(other.left_x),
            right_x: self.right_x.max(other.right_x),
        }
    }
}
