//! Quad-per-glyph renderer
//!
//! Each glyph becomes one textured quad: its bitmap is uploaded to the
//! pipeline texture, six vertices are uploaded to the pipeline buffer, and a
//! single draw is issued. Nothing is batched or cached between glyphs.

use crate::config::BaselineMode;
use crate::foundation::math::UVec2;
use crate::render::{GlyphVertex, RenderError, TextBackend};

use super::font::FaceMetrics;
use super::pipeline::TextPipeline;
use super::shaper::GlyphRecord;

/// Pen position in normalized device coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PenPosition {
    /// Horizontal position, -1 (left) to 1 (right)
    pub x: f32,
    /// Vertical position, -1 (bottom) to 1 (top)
    pub y: f32,
}

impl PenPosition {
    /// Create a pen at `(x, y)`
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a pen from an `[x, y]` pair, as stored in config
    pub const fn from_array(origin: [f32; 2]) -> Self {
        Self::new(origin[0], origin[1])
    }

    /// True if the pen has left the right or top edge of the target
    pub fn is_overflowing(&self) -> bool {
        self.x > 1.0 || self.y > 1.0
    }
}

/// Places and draws glyph quads for one viewport and face
#[derive(Debug, Clone, Copy)]
pub struct GlyphRenderer {
    viewport: UVec2,
    baseline_drop: i32,
}

impl GlyphRenderer {
    /// Create a renderer for a viewport of `viewport` pixels
    ///
    /// `mode` picks the face quantity a glyph's top bearing is measured
    /// against; see [`BaselineMode`].
    pub fn new(viewport: UVec2, metrics: &FaceMetrics, mode: BaselineMode) -> Self {
        Self {
            viewport,
            baseline_drop: metrics.baseline_drop(mode),
        }
    }

    /// Quad for `record` with the pen at `pen`
    ///
    /// Two triangles; texcoord (0,0) is the bitmap's top-left texel.
    pub fn quad(&self, record: &GlyphRecord<'_>, pen: PenPosition) -> [GlyphVertex; 6] {
        let vh = self.viewport.y as f32;
        let w = record.width as f32 / self.viewport.x as f32;
        let h = record.height as f32 / vh;

        let offset = record.offset_ndc(self.viewport);
        let drop = (self.baseline_drop - record.bearing_y) as f32 / 64.0;
        let x = pen.x + offset.x;
        let y = pen.y + offset.y - drop / vh;

        [
            GlyphVertex::new(x, y, 0.0, 0.0),
            GlyphVertex::new(x, y - h, 0.0, 1.0),
            GlyphVertex::new(x + w, y, 1.0, 0.0),
            GlyphVertex::new(x + w, y, 1.0, 0.0),
            GlyphVertex::new(x, y - h, 0.0, 1.0),
            GlyphVertex::new(x + w, y - h, 1.0, 1.0),
        ]
    }

    /// Upload and draw one glyph, then advance the pen
    ///
    /// The pipeline must already be bound. Returns
    /// [`RenderError::PenOverflow`] if the advanced pen is past the right or
    /// top edge; the glyph itself has been drawn by then.
    pub fn draw(
        &self,
        backend: &mut dyn TextBackend,
        pipeline: &TextPipeline,
        record: &GlyphRecord<'_>,
        pen: &mut PenPosition,
    ) -> Result<(), RenderError> {
        backend.upload_r8(pipeline.texture(), record.width, record.height, record.bitmap)?;
        let quad = self.quad(record, *pen);
        backend.upload_vertices(pipeline.buffer(), bytemuck::cast_slice(&quad))?;
        backend.draw_triangles(quad.len() as u32)?;

        let advance = record.advance_ndc(self.viewport);
        pen.x += advance.x;
        pen.y += advance.y;

        if pen.is_overflowing() {
            return Err(RenderError::PenOverflow { x: pen.x, y: pen.y });
        }
        Ok(())
    }

    /// Vertical distance between baselines in NDC
    pub fn line_advance(&self, metrics: &FaceMetrics) -> f32 {
        metrics.line_height as f32 / 64.0 / self.viewport.y as f32
    }
}
