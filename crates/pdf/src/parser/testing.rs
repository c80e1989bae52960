//! In-memory [`PdfBackend`] for parser tests.

use std::collections::BTreeMap;

use super::backend::{
    decode_text_simple, BackendFontInfo, ContentOp, PageGeometry, PageId, PdfBackend, PdfValue,
};
use crate::PdfError;

pub struct MockBackend {
    pub geometry: PageGeometry,
    pub fonts: Vec<BackendFontInfo>,
    pub ops: Vec<ContentOp>,
}

impl MockBackend {
    /// A US Letter page using `/F1` as Helvetica.
    pub fn letter(ops: Vec<ContentOp>) -> Self {
        Self {
            geometry: PageGeometry {
                left: 0.0,
                bottom: 0.0,
                width: 612.0,
                height: 792.0,
            },
            fonts: vec![BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: Some("Helvetica".to_string()),
            }],
            ops,
        }
    }
}

impl PdfBackend for MockBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        BTreeMap::from([(1, (1, 0))])
    }

    fn page_geometry(&self, _page: PageId) -> Result<PageGeometry, PdfError> {
        Ok(self.geometry)
    }

    fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
        Ok(self.fonts.clone())
    }

    fn page_content(&self, _page: PageId) -> Result<Vec<u8>, PdfError> {
        Ok(vec![])
    }

    fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
        Ok(self.ops.clone())
    }

    fn decode_text(&self, _page: PageId, _font_name: &[u8], data: &[u8]) -> String {
        decode_text_simple(data)
    }
}

pub fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
    ContentOp {
        operator: operator.to_string(),
        operands,
    }
}

pub fn tf(size: f32) -> ContentOp {
    op("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Real(size)])
}

pub fn td(tx: f32, ty: f32) -> ContentOp {
    op("Td", vec![PdfValue::Real(tx), PdfValue::Real(ty)])
}

pub fn tj(text: &str) -> ContentOp {
    op("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())])
}

/// `BT /F1 size Tf x y Td (text) Tj ET`
pub fn text_at(x: f32, y: f32, size: f32, text: &str) -> Vec<ContentOp> {
    vec![op("BT", vec![]), tf(size), td(x, y), tj(text), op("ET", vec![])]
}
