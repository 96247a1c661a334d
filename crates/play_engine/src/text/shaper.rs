//! Shaping adapter with a single rasterization slot
//!
//! [`FontShaper`] owns a face and the one [`GlyphSlot`] it rasterizes into.
//! [`FontShaper::rasterize`] hands out a [`GlyphRecord`] that borrows the
//! slot, so only one glyph bitmap is ever in flight: the record must be
//! dropped (uploaded and drawn) before the next glyph can be rasterized.

use crate::foundation::math::{UVec2, Vec2};

use super::font::{FaceMetrics, FixedVec, FontBackend, FontFace, FontResult, GlyphSlot, ShapedGlyph};

/// Glyphs produced by shaping one string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedLine {
    glyphs: Vec<ShapedGlyph>,
}

impl ShapedLine {
    /// Shaped glyphs in logical order
    pub fn glyphs(&self) -> &[ShapedGlyph] {
        &self.glyphs
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True when shaping produced nothing
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Glyphs visited and dropped by [`FontShaper::for_each_glyph`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphTally {
    /// Glyphs handed to the visitor
    pub visited: usize,
    /// Glyphs that failed to rasterize
    pub dropped: usize,
}

/// A rasterized glyph, borrowing the shaper's slot
#[derive(Debug, Clone, Copy)]
pub struct GlyphRecord<'a> {
    /// Glyph index
    pub glyph_id: u32,
    /// Source byte offset
    pub cluster: u32,
    /// Coverage bitmap, row-major, top row first
    pub bitmap: &'a [u8],
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Pen advance, 1/64 px
    pub advance: FixedVec,
    /// Offset from the pen, 1/64 px
    pub offset: FixedVec,
    /// Bitmap top above the baseline, 1/64 px
    pub bearing_y: i32,
}

impl GlyphRecord<'_> {
    /// Pen advance in NDC for a `viewport` of pixel size (W, H)
    pub fn advance_ndc(&self, viewport: UVec2) -> Vec2 {
        fixed_to_ndc(self.advance, viewport)
    }

    /// Offset in NDC for a `viewport` of pixel size (W, H)
    pub fn offset_ndc(&self, viewport: UVec2) -> Vec2 {
        fixed_to_ndc(self.offset, viewport)
    }

    /// The same record with `bias` (1/64 px) added to the x offset
    #[must_use]
    pub fn with_offset_bias(mut self, bias: i32) -> Self {
        self.offset.x += bias;
        self
    }
}

fn fixed_to_ndc(value: FixedVec, viewport: UVec2) -> Vec2 {
    Vec2::new(
        value.x as f32 / 64.0 / viewport.x as f32,
        value.y as f32 / 64.0 / viewport.y as f32,
    )
}

/// Font shaping adapter
pub struct FontShaper<F: FontBackend = FontFace> {
    face: F,
    slot: GlyphSlot,
}

impl<F: FontBackend> FontShaper<F> {
    /// Wrap a loaded face
    pub fn new(face: F) -> Self {
        Self {
            face,
            slot: GlyphSlot::default(),
        }
    }

    /// Face-wide metrics
    pub fn metrics(&self) -> &FaceMetrics {
        self.face.metrics()
    }

    /// Shape `text`
    ///
    /// A shaping failure drops the whole string: it is logged and an empty
    /// line is returned.
    pub fn shape(&self, text: &str) -> ShapedLine {
        match self.face.shape(text) {
            Ok(glyphs) => ShapedLine { glyphs },
            Err(e) => {
                log::warn!("Dropping unshapeable text {:?}: {}", text, e);
                ShapedLine::default()
            }
        }
    }

    /// Rasterize one shaped glyph into the slot
    pub fn rasterize(&mut self, glyph: &ShapedGlyph) -> FontResult<GlyphRecord<'_>> {
        self.face.rasterize(glyph.glyph_id, &mut self.slot)?;
        Ok(GlyphRecord {
            glyph_id: glyph.glyph_id,
            cluster: glyph.cluster,
            bitmap: self.slot.bitmap(),
            width: self.slot.width(),
            height: self.slot.height(),
            advance: glyph.advance,
            offset: glyph.offset,
            bearing_y: self.slot.bearing_y(),
        })
    }

    /// Shape `text` and hand each successfully rasterized glyph to `visit`
    ///
    /// Glyphs that fail to rasterize are logged and skipped; they are never
    /// visited, so the caller applies no advance for them. Stops at the first
    /// error `visit` reports.
    pub fn for_each_glyph<E>(
        &mut self,
        text: &str,
        mut visit: impl FnMut(GlyphRecord<'_>) -> Result<(), E>,
    ) -> Result<GlyphTally, E> {
        let line = self.shape(text);
        let mut tally = GlyphTally::default();
        for glyph in line.glyphs() {
            match self.rasterize(glyph) {
                Ok(record) => {
                    visit(record)?;
                    tally.visited += 1;
                }
                Err(e) => {
                    log::warn!("Dropping glyph {} of {:?}: {}", glyph.glyph_id, text, e);
                    tally.dropped += 1;
                }
            }
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::testing::FakeFont;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_string_shapes_to_nothing() {
        let shaper = FontShaper::new(FakeFont::new());
        assert!(shaper.shape("").is_empty());
    }

    #[test]
    fn test_shape_keeps_logical_order() {
        let shaper = FontShaper::new(FakeFont::new());
        let line = shaper.shape("héllo");

        assert_eq!(line.len(), 5);
        let clusters: Vec<_> = line.glyphs().iter().map(|glyph| glyph.cluster).collect();
        assert_eq!(clusters, vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn test_shaping_failure_drops_the_string() {
        let shaper = FontShaper::new(FakeFont::new().failing_shape());
        assert!(shaper.shape("abc").is_empty());
    }

    #[test]
    fn test_record_reads_from_the_slot() {
        let mut shaper = FontShaper::new(FakeFont::new());
        let line = shaper.shape("ab");

        let first = shaper.rasterize(&line.glyphs()[0]).unwrap().bitmap.to_vec();
        let second = shaper.rasterize(&line.glyphs()[1]).unwrap();

        assert_ne!(first.as_slice(), second.bitmap);
        assert!(second.bitmap.iter().all(|&b| b == FakeFont::coverage('b')));
    }

    #[test]
    fn test_failed_glyphs_are_not_visited() {
        let mut shaper = FontShaper::new(FakeFont::new().failing('x'));
        let mut seen = Vec::new();

        let tally = shaper
            .for_each_glyph("axbx", |record| {
                seen.push(record.cluster);
                Ok::<(), ()>(())
            })
            .unwrap();

        assert_eq!(tally, GlyphTally { visited: 2, dropped: 2 });
        assert_eq!(seen, vec![0, 2]);
    }

    #[test]
    fn test_visitor_error_stops_iteration() {
        let mut shaper = FontShaper::new(FakeFont::new());
        let mut calls = 0;
        let result = shaper.for_each_glyph("abc", |_| {
            calls += 1;
            if calls == 2 { Err("stop") } else { Ok(()) }
        });

        assert_eq!(result, Err("stop"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_ndc_conversion() {
        let mut shaper = FontShaper::new(FakeFont::new());
        let line = shaper.shape("a");
        let record = shaper.rasterize(&line.glyphs()[0]).unwrap().with_offset_bias(400);
        let viewport = UVec2::new(1280, 720);

        let advance = record.advance_ndc(viewport);
        assert_relative_eq!(advance.x, FakeFont::ADVANCE as f32 / 64.0 / 1280.0);
        assert_relative_eq!(advance.y, 0.0);
        assert_relative_eq!(record.offset_ndc(viewport).x, 400.0 / 64.0 / 1280.0);
    }
}
