//! Shaped text overlay
//!
//! [`TextOverlay`] ties the shaping adapter, the glyph renderer and the GPU
//! resources together. It draws a single line, a full paragraph, or a
//! paragraph clipped to a typewriter reveal budget.

use crate::config::BaselineMode;
use crate::foundation::math::UVec2;
use crate::render::{RenderError, TextBackend};

use super::font::{FontBackend, FontFace};
use super::glyph_renderer::{GlyphRenderer, PenPosition};
use super::layout::{reveal_prefixes, ParagraphStyle};
use super::pipeline::TextPipeline;
use super::shaper::FontShaper;

/// What a draw produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Glyphs drawn, one draw call each
    pub glyphs_drawn: usize,
    /// Glyphs dropped because they failed to rasterize
    pub glyphs_dropped: usize,
    /// Lines laid out
    pub lines: usize,
}

impl std::ops::AddAssign for TextStats {
    fn add_assign(&mut self, other: Self) {
        self.glyphs_drawn += other.glyphs_drawn;
        self.glyphs_dropped += other.glyphs_dropped;
        self.lines += other.lines;
    }
}

/// Shaped text drawn one quad per glyph
pub struct TextOverlay<F: FontBackend = FontFace> {
    shaper: FontShaper<F>,
    pipeline: Option<TextPipeline>,
    baseline: BaselineMode,
}

impl<F: FontBackend> TextOverlay<F> {
    /// Create the overlay and its GPU resources
    pub fn new(
        face: F,
        baseline: BaselineMode,
        color: [f32; 4],
        backend: &mut dyn TextBackend,
    ) -> Result<Self, RenderError> {
        let pipeline = TextPipeline::new(backend, color)?;
        Ok(Self {
            shaper: FontShaper::new(face),
            pipeline: Some(pipeline),
            baseline,
        })
    }

    /// Draw one line starting at `pen`, leaving the pen after its last glyph
    ///
    /// `indent` is added to every glyph's x offset (1/64 px). Glyphs that
    /// fail to rasterize are dropped without advancing the pen. A pen
    /// overflow stops the line after the offending glyph and is returned as
    /// an error; [`TextOverlay::draw_paragraph`] then skips the lines below.
    pub fn draw_line(
        &mut self,
        backend: &mut dyn TextBackend,
        viewport: UVec2,
        text: &str,
        pen: &mut PenPosition,
        indent: i32,
    ) -> Result<TextStats, RenderError> {
        let pipeline = self.pipeline.as_ref().ok_or(RenderError::UnknownResource("text pipeline"))?;
        let mut stats = TextStats {
            lines: 1,
            ..TextStats::default()
        };
        if text.is_empty() || viewport.x == 0 || viewport.y == 0 {
            return Ok(stats);
        }

        pipeline.bind(backend)?;
        let renderer = GlyphRenderer::new(viewport, self.shaper.metrics(), self.baseline);
        let tally = self.shaper.for_each_glyph(text, |record| {
            renderer.draw(backend, pipeline, &record.with_offset_bias(indent), pen)
        })?;
        stats.glyphs_drawn = tally.visited;
        stats.glyphs_dropped = tally.dropped;
        Ok(stats)
    }

    /// Draw every line of a paragraph
    ///
    /// The pen is reset to `origin.x` at the start of each line and moves
    /// one line height per line in the direction `style` gives.
    pub fn draw_paragraph<S: AsRef<str>>(
        &mut self,
        backend: &mut dyn TextBackend,
        viewport: UVec2,
        lines: &[S],
        origin: PenPosition,
        style: ParagraphStyle,
    ) -> Result<TextStats, RenderError> {
        if viewport.x == 0 || viewport.y == 0 {
            return Ok(TextStats::default());
        }
        let renderer = GlyphRenderer::new(viewport, self.shaper.metrics(), self.baseline);
        let step = renderer.line_advance(self.shaper.metrics()) * style.flow.sign();

        let mut stats = TextStats::default();
        let mut baseline_y = origin.y;
        for line in lines {
            let mut pen = PenPosition::new(origin.x, baseline_y);
            stats += self.draw_line(backend, viewport, line.as_ref(), &mut pen, style.indent)?;
            baseline_y += step;
        }
        Ok(stats)
    }

    /// Draw the first `revealed` characters of a paragraph, typewriter style
    pub fn draw_revealed<S: AsRef<str>>(
        &mut self,
        backend: &mut dyn TextBackend,
        viewport: UVec2,
        lines: &[S],
        revealed: usize,
        origin: PenPosition,
        indent: i32,
    ) -> Result<TextStats, RenderError> {
        let visible = reveal_prefixes(lines, revealed);
        self.draw_paragraph(backend, viewport, &visible, origin, ParagraphStyle::typewriter(indent))
    }

    /// Release the GPU resources; later draws fail
    pub fn release(&mut self, backend: &mut dyn TextBackend) {
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.release(backend);
        }
    }
}
