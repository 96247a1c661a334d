//! Deterministic stand-in face for tests
//!
//! Every character shapes to one glyph whose id is its code point. Glyphs are
//! `WIDTH`x`HEIGHT` boxes sitting on the baseline, filled with a coverage
//! value derived from the character; spaces rasterize to an empty bitmap.

use super::font::{FaceMetrics, FixedVec, FontBackend, FontError, FontResult, GlyphSlot, ShapedGlyph};

pub(crate) struct FakeFont {
    metrics: FaceMetrics,
    failing: Vec<char>,
    fail_shaping: bool,
}

impl FakeFont {
    pub const ADVANCE: i32 = 10 * 64;
    pub const WIDTH: u32 = 8;
    pub const HEIGHT: u32 = 12;

    pub fn new() -> Self {
        Self {
            metrics: FaceMetrics {
                size_px: 16.0,
                units_per_em: 1000,
                bbox_height: 1200,
                ascender: 13 * 64,
                descender: -3 * 64,
                line_height: 20 * 64,
            },
            failing: Vec::new(),
            fail_shaping: false,
        }
    }

    /// Make rasterization of `ch` fail
    pub fn failing(mut self, ch: char) -> Self {
        self.failing.push(ch);
        self
    }

    /// Make every shaping call fail
    pub fn failing_shape(mut self) -> Self {
        self.fail_shaping = true;
        self
    }

    /// Coverage byte the glyph for `ch` is filled with
    pub fn coverage(ch: char) -> u8 {
        (ch as u32 % 200) as u8 + 55
    }
}

impl FontBackend for FakeFont {
    fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    fn shape(&self, text: &str) -> FontResult<Vec<ShapedGlyph>> {
        if self.fail_shaping {
            return Err(FontError::Shaping("fake shaping failure".to_string()));
        }
        Ok(text
            .char_indices()
            .map(|(index, ch)| ShapedGlyph {
                glyph_id: ch as u32,
                cluster: index as u32,
                advance: FixedVec::new(Self::ADVANCE, 0),
                offset: FixedVec::default(),
            })
            .collect())
    }

    fn rasterize(&self, glyph_id: u32, slot: &mut GlyphSlot) -> FontResult<()> {
        let ch = char::from_u32(glyph_id).ok_or(FontError::GlyphOutOfRange(glyph_id))?;
        if self.failing.contains(&ch) {
            return Err(FontError::Rasterize {
                glyph_id,
                reason: "fake rasterization failure".to_string(),
            });
        }
        if ch == ' ' {
            slot.store(Vec::new(), 0, 0, 0, 0);
        } else {
            let size = (Self::WIDTH * Self::HEIGHT) as usize;
            slot.store(vec![Self::coverage(ch); size], Self::WIDTH, Self::HEIGHT, 0, Self::HEIGHT as i32 * 64);
        }
        Ok(())
    }
}
