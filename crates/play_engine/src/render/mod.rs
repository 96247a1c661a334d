//! # Rendering System
//!
//! The text overlay talks to the GPU through [`TextBackend`], a narrow,
//! immediate-mode interface: one R8 texture, one sampler, one vertex buffer
//! and one program, re-filled and drawn once per glyph.
//!
//! ## Architecture
//!
//! - **TextBackend**: resource creation, R8 uploads, six-vertex draws
//! - **SoftwareBackend**: CPU implementation used for headless previews and tests
//! - **LineOverlay**: the host's vector line text, for instructional captions

pub mod backend;
pub mod overlay;
pub mod software;

pub use backend::{
    TextBackend, BackendResult, GlyphVertex, PipelineBinding, SamplerDesc,
    WrapMode, FilterMode, ShaderSource,
    TextureHandle, SamplerHandle, BufferHandle, ProgramHandle,
};
pub use overlay::LineOverlay;
pub use software::{SoftwareBackend, FrameStats};

use thiserror::Error;

/// Errors raised by the rendering system
#[derive(Error, Debug)]
pub enum RenderError {
    /// A handle did not name a live resource
    ///
    /// Usually a handle used after the pipeline was released.
    #[error("Unknown {0} handle")]
    UnknownResource(&'static str),

    /// Pixel data does not match the declared image size
    #[error("Upload of {width}x{height} texture got {actual} bytes")]
    InvalidUpload {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Bytes supplied
        actual: usize,
    },

    /// A draw was issued with no pipeline bound
    #[error("Draw issued with no text pipeline bound")]
    NothingBound,

    /// Vertex count does not form whole glyph quads
    #[error("Draw of {0} vertices; glyph quads take 6")]
    InvalidDraw(u32),

    /// Shader program failed to build
    #[error("Shader program failed: {0}")]
    ShaderCompile(String),

    /// The pen left the render target after a glyph
    ///
    /// A line is too long (or starts too high) for the viewport. This is a
    /// content problem; drawing stops after the offending glyph and the rest of
    /// the paragraph is skipped.
    #[error("Pen overflowed the render target at ({x:.3}, {y:.3})")]
    PenOverflow {
        /// Pen X in NDC after the glyph
        x: f32,
        /// Pen Y in NDC after the glyph
        y: f32,
    },

    /// Encoding or writing an image failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
