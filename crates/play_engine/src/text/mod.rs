//! # Shaped Text
//!
//! Immediate-mode text: strings are shaped, and every glyph is rasterized,
//! uploaded and drawn as its own quad. Nothing is cached across glyphs or
//! frames.
//!
//! ## Architecture
//!
//! - **FontFace**: shaping (`rustybuzz`) and rasterization (`fontdue`) of one face
//! - **FontShaper**: shaping adapter owning the face's single glyph slot
//! - **GlyphRenderer**: quad geometry, upload and draw for one glyph
//! - **TextPipeline**: the texture, sampler, buffer and program glyphs share
//! - **TextOverlay**: lines and paragraphs, full or typewriter-revealed

pub mod font;
pub mod shaper;
pub mod glyph_renderer;
pub mod pipeline;
pub mod layout;
pub mod overlay;

#[cfg(test)]
pub(crate) mod testing;

pub use font::{FaceMetrics, FixedVec, FontBackend, FontError, FontFace, FontResult, GlyphSlot, ShapedGlyph};
pub use shaper::{FontShaper, GlyphRecord, GlyphTally, ShapedLine};
pub use glyph_renderer::{GlyphRenderer, PenPosition};
pub use pipeline::TextPipeline;
pub use layout::{character_count, reveal_prefixes, LineFlow, ParagraphStyle};
pub use overlay::{TextOverlay, TextStats};
