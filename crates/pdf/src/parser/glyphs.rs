//! Content-stream walker producing positioned glyphs.
//!
//! A simplified PDF text-rendering state machine: it tracks the text and
//! line matrices, font, spacing and scaling, and emits one [`Glyph`] per
//! shown character at its baseline position in user space (Y up). Glyph
//! widths are estimated from the font size since widths arrays are not
//! consulted.

use super::backend::{get_number_from_value, BackendFontInfo, PageId, PdfBackend, PdfValue};
use crate::text::normalize_text;
use crate::PdfError;

/// One shown character in PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    /// Left edge of the glyph.
    pub x: f32,
    /// Baseline.
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
}

/// Approximate character width as a fraction of font size.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource key (`/F1`).
    font_key: Vec<u8>,
    /// Resolved base-font name.
    font_name: String,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    /// Horizontal scaling (Tz / 100).
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5] + self.text_rise
    }

    /// Horizontal scale of the text matrix.
    fn matrix_scale_x(&self) -> f32 {
        (self.text_matrix[0].powi(2) + self.text_matrix[1].powi(2)).sqrt()
    }

    /// Rendered font size: `font_size * sqrt(b^2 + d^2)`.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    /// Estimated advance of one character in text space, before spacing.
    fn char_advance(&self) -> f32 {
        self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }
}

fn resolve_font<'a>(key: &[u8], fonts: &'a [BackendFontInfo]) -> Option<&'a BackendFontInfo> {
    fonts.iter().find(|info| info.name == key)
}

/// Walk a page's content stream and return its glyphs in stream order.
///
/// Handled operators: `BT`, `Tf`, `Tm`, `Td`, `TD`, `T*`, `TL`, `Tc`, `Tw`,
/// `Tz`, `Ts`, `Tj`, `TJ`, `'` and `"`. Everything else is ignored.
pub fn extract_page_glyphs(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<Glyph>, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut glyphs: Vec<Glyph> = Vec::new();

    for op in &ops {
        let num = |i: usize| op.operands.get(i).and_then(get_number_from_value);

        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => handle_tf(&op.operands, &fonts, &mut state),
            "Tm" => handle_tm(&op.operands, &mut state),
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => {
                if let Some(v) = num(0) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = num(0) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = num(0) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = num(0) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = num(0) {
                    state.text_rise = v;
                }
            }
            "Tj" => {
                if let Some(operand) = op.operands.first() {
                    show_string(operand, backend, page_id, &mut state, &mut glyphs);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(elements)) = op.operands.first() {
                    for element in elements {
                        match element {
                            PdfValue::Str(_) => {
                                show_string(element, backend, page_id, &mut state, &mut glyphs)
                            }
                            // Kerning in thousandths of text space; negative moves right.
                            other => {
                                if let Some(adj) = get_number_from_value(other) {
                                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                                    state.advance_x(dx);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                state.next_line();
                if let Some(operand) = op.operands.first() {
                    show_string(operand, backend, page_id, &mut state, &mut glyphs);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    if let Some(aw) = num(0) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = num(1) {
                        state.char_spacing = ac;
                    }
                    state.next_line();
                    show_string(&op.operands[2], backend, page_id, &mut state, &mut glyphs);
                }
            }
            _ => {}
        }
    }

    Ok(glyphs)
}

fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    let (Some(key), Some(size)) = (operands.first(), operands.get(1)) else {
        return;
    };
    let key = match key {
        PdfValue::Name(n) | PdfValue::Str(n) => n.clone(),
        _ => return,
    };

    state.font_name = match resolve_font(&key, fonts).and_then(|f| f.base_font.clone()) {
        Some(base) => base,
        None => String::from_utf8_lossy(&key).into_owned(),
    };
    state.font_size = get_number_from_value(size).unwrap_or(0.0);
    state.font_key = key;
}

fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    if let &[a, b, c, d, e, f] = vals.as_slice() {
        state.text_matrix = [a, b, c, d, e, f];
        state.line_matrix = state.text_matrix;
    }
}

/// Emit one glyph per character of a string operand and advance the pen.
fn show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    glyphs: &mut Vec<Glyph>,
) {
    let PdfValue::Str(bytes) = operand else {
        return;
    };
    let text = normalize_text(&backend.decode_text(page_id, &state.font_key, bytes));

    let font_size = state.effective_font_size();
    for ch in text.chars() {
        let advance = state.char_advance();
        glyphs.push(Glyph {
            text: ch.to_string(),
            x: state.x(),
            y: state.y(),
            width: advance * state.matrix_scale_x(),
            font_size,
            font_name: state.font_name.clone(),
        });

        let mut dx = advance + state.char_spacing;
        if ch == ' ' {
            dx += state.word_spacing;
        }
        state.advance_x(dx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::testing::{op, td, tf, tj, MockBackend};
    use crate::parser::backend::ContentOp;

    fn glyphs_for(ops: Vec<ContentOp>) -> Vec<Glyph> {
        let backend = MockBackend::letter(ops);
        extract_page_glyphs(&backend, (1, 0)).unwrap()
    }

    fn text_of(glyphs: &[Glyph]) -> String {
        glyphs.iter().map(|g| g.text.as_str()).collect()
    }

    #[test]
    fn test_tj_emits_one_glyph_per_char() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            tf(10.0),
            td(72.0, 700.0),
            tj("Form:"),
            op("ET", vec![]),
        ]);

        assert_eq!(glyphs.len(), 5);
        assert_eq!(text_of(&glyphs), "Form:");
        assert!((glyphs[0].x - 72.0).abs() < 0.01);
        assert!((glyphs[1].x - 77.0).abs() < 0.01);
        assert!((glyphs[0].y - 700.0).abs() < 0.01);
        assert!((glyphs[0].width - 5.0).abs() < 0.01);
        assert_eq!(glyphs[0].font_name, "Helvetica");
        assert!((glyphs[0].font_size - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_td_moves_relative_to_line_start() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            tf(10.0),
            td(72.0, 700.0),
            tj("AB"),
            td(0.0, -20.0),
            tj("C"),
            op("ET", vec![]),
        ]);
        assert!((glyphs[2].x - 72.0).abs() < 0.01);
        assert!((glyphs[2].y - 680.0).abs() < 0.01);
    }

    #[test]
    fn test_tm_scales_font_size() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            tf(1.0),
            op(
                "Tm",
                vec![
                    PdfValue::Real(12.0),
                    PdfValue::Real(0.0),
                    PdfValue::Real(0.0),
                    PdfValue::Real(12.0),
                    PdfValue::Real(100.0),
                    PdfValue::Real(500.0),
                ],
            ),
            tj("Hi"),
            op("ET", vec![]),
        ]);
        assert!((glyphs[0].font_size - 12.0).abs() < 0.01);
        assert!((glyphs[0].width - 6.0).abs() < 0.01);
        assert!((glyphs[1].x - 106.0).abs() < 0.01);
    }

    #[test]
    fn test_tj_array_kerning_advances_pen() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            tf(10.0),
            td(0.0, 0.0),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    PdfValue::Str(b"A".to_vec()),
                    PdfValue::Integer(-1000),
                    PdfValue::Str(b"B".to_vec()),
                ])],
            ),
            op("ET", vec![]),
        ]);
        // A advances 5, the kerning moves a further 10.
        assert!((glyphs[1].x - 15.0).abs() < 0.01);
    }

    #[test]
    fn test_t_star_uses_leading() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            tf(10.0),
            op("TL", vec![PdfValue::Real(14.0)]),
            td(72.0, 700.0),
            tj("A"),
            op("T*", vec![]),
            tj("B"),
            op("ET", vec![]),
        ]);
        assert!((glyphs[1].y - 686.0).abs() < 0.01);
        assert!((glyphs[1].x - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_word_spacing_applies_to_spaces_only() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            tf(10.0),
            op("Tw", vec![PdfValue::Real(4.0)]),
            td(0.0, 0.0),
            tj("a b"),
            op("ET", vec![]),
        ]);
        assert!((glyphs[1].x - 5.0).abs() < 0.01);
        assert!((glyphs[2].x - 14.0).abs() < 0.01);
        assert_eq!(glyphs[1].text, " ");
    }

    #[test]
    fn test_unknown_font_keeps_resource_key() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F9".to_vec()), PdfValue::Real(8.0)]),
            tj("x"),
            op("ET", vec![]),
        ]);
        assert_eq!(glyphs[0].font_name, "F9");
    }

    #[test]
    fn test_ligature_is_expanded() {
        let glyphs = glyphs_for(vec![
            op("BT", vec![]),
            tf(10.0),
            tj("\u{FB01}eld"),
            op("ET", vec![]),
        ]);
        assert_eq!(text_of(&glyphs), "field");
    }

    #[test]
    fn test_non_text_operators_ignored() {
        let glyphs = glyphs_for(vec![
            op("q", vec![]),
            op("re", vec![PdfValue::Integer(0); 4]),
            op("f", vec![]),
            op("Q", vec![]),
        ]);
        assert!(glyphs.is_empty());
    }
}
