//! GPU resources of the glyph pipeline

use crate::render::{
    BackendResult, BufferHandle, FilterMode, PipelineBinding, ProgramHandle, SamplerDesc, SamplerHandle,
    ShaderSource, TextBackend, TextureHandle, WrapMode,
};

/// Passes NDC positions through; `position.zw` carries the texcoord
pub const VERTEX_SHADER: &str = "\
#version 330
in vec4 position;
out vec2 texCoords;
void main(void) {
    gl_Position = vec4(position.xy, 0, 1);
    texCoords = position.zw;
}
";

/// Tints white by `color`, using the glyph texture's red channel as alpha
pub const FRAGMENT_SHADER: &str = "\
#version 330
uniform sampler2D tex;
uniform vec4 color;
in vec2 texCoords;
out vec4 fragColor;
void main(void) {
    fragColor = vec4(1, 1, 1, texture(tex, texCoords).r) * color;
}
";

/// Sampler used for glyph textures
pub const GLYPH_SAMPLER: SamplerDesc = SamplerDesc {
    wrap: WrapMode::ClampToEdge,
    min_filter: FilterMode::Linear,
    mag_filter: FilterMode::Linear,
};

/// Texture, sampler, vertex buffer and program shared by every glyph draw
///
/// One per mode instance. Created when the mode is built and released
/// explicitly through [`TextPipeline::release`]; the texture and buffer are
/// re-filled for each glyph.
#[derive(Debug)]
pub struct TextPipeline {
    texture: TextureHandle,
    sampler: SamplerHandle,
    buffer: BufferHandle,
    program: ProgramHandle,
    color: [f32; 4],
}

impl TextPipeline {
    /// Create the pipeline's resources
    ///
    /// Anything created before a failing step is released again.
    pub fn new(backend: &mut dyn TextBackend, color: [f32; 4]) -> BackendResult<Self> {
        let texture = backend.create_texture()?;

        let sampler = match backend.create_sampler(&GLYPH_SAMPLER) {
            Ok(sampler) => sampler,
            Err(e) => {
                backend.destroy_texture(texture);
                return Err(e);
            }
        };

        let buffer = match backend.create_vertex_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                backend.destroy_sampler(sampler);
                backend.destroy_texture(texture);
                return Err(e);
            }
        };

        let source = ShaderSource {
            vertex: VERTEX_SHADER,
            fragment: FRAGMENT_SHADER,
        };
        let program = match backend.create_program(&source) {
            Ok(program) => program,
            Err(e) => {
                backend.destroy_buffer(buffer);
                backend.destroy_sampler(sampler);
                backend.destroy_texture(texture);
                return Err(e);
            }
        };

        log::debug!("Created text pipeline");
        Ok(Self {
            texture,
            sampler,
            buffer,
            program,
            color,
        })
    }

    /// Glyph texture
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Glyph vertex buffer
    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    /// Binding state for [`TextBackend::bind_text_pipeline`]
    pub fn binding(&self) -> PipelineBinding {
        PipelineBinding {
            texture: self.texture,
            sampler: self.sampler,
            buffer: self.buffer,
            program: self.program,
            color: self.color,
        }
    }

    /// Bind for the glyph draws that follow
    pub fn bind(&self, backend: &mut dyn TextBackend) -> BackendResult<()> {
        backend.bind_text_pipeline(&self.binding())
    }

    /// Release every resource
    pub fn release(self, backend: &mut dyn TextBackend) {
        backend.destroy_program(self.program);
        backend.destroy_buffer(self.buffer);
        backend.destroy_sampler(self.sampler);
        backend.destroy_texture(self.texture);
        log::debug!("Released text pipeline");
    }
}
