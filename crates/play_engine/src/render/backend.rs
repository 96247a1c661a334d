//! Backend abstraction for the glyph pipeline
//!
//! This module defines the trait a graphics backend implements so the text
//! overlay can upload glyph bitmaps and draw glyph quads.

use bytemuck::{Pod, Zeroable};
use slotmap::new_key_type;

use super::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

new_key_type! {
    /// Handle to a texture stored in the backend
    pub struct TextureHandle;
    /// Handle to a sampler stored in the backend
    pub struct SamplerHandle;
    /// Handle to a vertex buffer stored in the backend
    pub struct BufferHandle;
    /// Handle to a linked shader program stored in the backend
    pub struct ProgramHandle;
}

/// One glyph-quad vertex: NDC position and texture coordinate
///
/// Matches the `vec4 position` attribute of the text vertex shader
/// (`xy` = position, `zw` = texcoord).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    /// Position in normalized device coordinates
    pub position: [f32; 2],
    /// Texture coordinate; (0,0) is the bitmap's top-left
    pub tex_coord: [f32; 2],
}

impl GlyphVertex {
    /// Create a vertex from position and texture coordinate
    pub const fn new(x: f32, y: f32, s: f32, t: f32) -> Self {
        Self {
            position: [x, y],
            tex_coord: [s, t],
        }
    }
}

/// Texture wrap behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Clamp coordinates to the edge texel
    ClampToEdge,
    /// Tile the texture
    Repeat,
}

/// Texture filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest texel
    Nearest,
    /// Bilinear
    Linear,
}

/// Sampler parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc {
    /// Wrap mode on both axes
    pub wrap: WrapMode,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
}

/// Shader sources for a program
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource<'a> {
    /// Vertex stage source
    pub vertex: &'a str,
    /// Fragment stage source
    pub fragment: &'a str,
}

/// Everything bound for a run of glyph draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineBinding {
    /// Glyph texture, re-filled before each draw
    pub texture: TextureHandle,
    /// Sampler bound to texture unit 0
    pub sampler: SamplerHandle,
    /// Vertex buffer, re-filled before each draw
    pub buffer: BufferHandle,
    /// Text program
    pub program: ProgramHandle,
    /// Glyph color; the texture's red channel scales alpha
    pub color: [f32; 4],
}

/// Graphics backend used by the text overlay
///
/// Binding the text pipeline also sets its fixed state: alpha blending
/// (src-alpha, one-minus-src-alpha), no depth test, no face culling.
pub trait TextBackend {
    /// Create an empty texture
    fn create_texture(&mut self) -> BackendResult<TextureHandle>;

    /// Create a sampler
    fn create_sampler(&mut self, desc: &SamplerDesc) -> BackendResult<SamplerHandle>;

    /// Create an empty vertex buffer
    fn create_vertex_buffer(&mut self) -> BackendResult<BufferHandle>;

    /// Compile and link a program
    fn create_program(&mut self, source: &ShaderSource<'_>) -> BackendResult<ProgramHandle>;

    /// Release a texture
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Release a sampler
    fn destroy_sampler(&mut self, handle: SamplerHandle);

    /// Release a vertex buffer
    fn destroy_buffer(&mut self, handle: BufferHandle);

    /// Release a program
    fn destroy_program(&mut self, handle: ProgramHandle);

    /// Clear the color target
    fn clear(&mut self, color: [f32; 4]) -> BackendResult<()>;

    /// Bind the text pipeline for the following uploads and draws
    fn bind_text_pipeline(&mut self, binding: &PipelineBinding) -> BackendResult<()>;

    /// Replace a texture's contents with a tightly packed (row alignment 1)
    /// single-channel 8-bit image
    fn upload_r8(&mut self, texture: TextureHandle, width: u32, height: u32, pixels: &[u8]) -> BackendResult<()>;

    /// Replace a vertex buffer's contents
    fn upload_vertices(&mut self, buffer: BufferHandle, bytes: &[u8]) -> BackendResult<()>;

    /// Draw `vertex_count` vertices of the bound buffer as triangles
    fn draw_triangles(&mut self, vertex_count: u32) -> BackendResult<()>;
}
