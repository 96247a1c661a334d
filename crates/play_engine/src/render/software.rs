//! CPU implementation of the text backend
//!
//! Renders glyph quads into an RGBA image. Good enough to preview dialogue
//! layout without a GPU, and it keeps counts of draws and uploads so tests
//! can check the one-draw-per-glyph contract.

use std::path::Path;

use image::{GrayImage, ImageFormat, Rgba, RgbaImage};
use slotmap::SlotMap;

use super::backend::{
    BackendResult, BufferHandle, GlyphVertex, PipelineBinding, ProgramHandle, SamplerDesc,
    SamplerHandle, ShaderSource, TextBackend, TextureHandle,
};
use super::RenderError;

/// Counters accumulated since the last [`SoftwareBackend::reset_stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls issued
    pub draw_calls: u32,
    /// Texture uploads performed
    pub texture_uploads: u32,
    /// Vertices drawn
    pub vertices: u32,
    /// Framebuffer pixels touched by non-zero coverage
    pub covered_pixels: u64,
}

/// Text backend that rasterizes on the CPU
///
/// Samples the nearest texel regardless of the sampler's filter.
pub struct SoftwareBackend {
    framebuffer: RgbaImage,
    textures: SlotMap<TextureHandle, GrayImage>,
    samplers: SlotMap<SamplerHandle, SamplerDesc>,
    buffers: SlotMap<BufferHandle, Vec<u8>>,
    programs: SlotMap<ProgramHandle, ()>,
    bound: Option<PipelineBinding>,
    stats: FrameStats,
}

impl SoftwareBackend {
    /// Create a backend with a transparent black target of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: RgbaImage::new(width, height),
            textures: SlotMap::with_key(),
            samplers: SlotMap::with_key(),
            buffers: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            bound: None,
            stats: FrameStats::default(),
        }
    }

    /// Rendered image
    pub fn framebuffer(&self) -> &RgbaImage {
        &self.framebuffer
    }

    /// Counters since the last reset
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Zero the counters
    pub fn reset_stats(&mut self) {
        self.stats = FrameStats::default();
    }

    /// Number of live textures, samplers, buffers and programs
    pub fn live_resources(&self) -> usize {
        self.textures.len() + self.samplers.len() + self.buffers.len() + self.programs.len()
    }

    /// Write the target as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> BackendResult<()> {
        self.framebuffer.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

impl TextBackend for SoftwareBackend {
    fn create_texture(&mut self) -> BackendResult<TextureHandle> {
        Ok(self.textures.insert(GrayImage::new(0, 0)))
    }

    fn create_sampler(&mut self, desc: &SamplerDesc) -> BackendResult<SamplerHandle> {
        Ok(self.samplers.insert(*desc))
    }

    fn create_vertex_buffer(&mut self) -> BackendResult<BufferHandle> {
        Ok(self.buffers.insert(Vec::new()))
    }

    fn create_program(&mut self, source: &ShaderSource<'_>) -> BackendResult<ProgramHandle> {
        for (stage, text) in [("vertex", source.vertex), ("fragment", source.fragment)] {
            if !text.contains("void main") {
                return Err(RenderError::ShaderCompile(format!("{stage} stage has no entry point")));
            }
        }
        Ok(self.programs.insert(()))
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(handle);
    }

    fn destroy_sampler(&mut self, handle: SamplerHandle) {
        self.samplers.remove(handle);
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        self.buffers.remove(handle);
    }

    fn destroy_program(&mut self, handle: ProgramHandle) {
        self.programs.remove(handle);
    }

    fn clear(&mut self, color: [f32; 4]) -> BackendResult<()> {
        let pixel = Rgba(color.map(to_byte));
        for p in self.framebuffer.pixels_mut() {
            *p = pixel;
        }
        Ok(())
    }

    fn bind_text_pipeline(&mut self, binding: &PipelineBinding) -> BackendResult<()> {
        if !self.textures.contains_key(binding.texture) {
            return Err(RenderError::UnknownResource("texture"));
        }
        if !self.samplers.contains_key(binding.sampler) {
            return Err(RenderError::UnknownResource("sampler"));
        }
        if !self.buffers.contains_key(binding.buffer) {
            return Err(RenderError::UnknownResource("buffer"));
        }
        if !self.programs.contains_key(binding.program) {
            return Err(RenderError::UnknownResource("program"));
        }
        self.bound = Some(*binding);
        Ok(())
    }

    fn upload_r8(&mut self, texture: TextureHandle, width: u32, height: u32, pixels: &[u8]) -> BackendResult<()> {
        let slot = self.textures.get_mut(texture).ok_or(RenderError::UnknownResource("texture"))?;
        *slot = GrayImage::from_raw(width, height, pixels.to_vec()).ok_or(RenderError::InvalidUpload {
            width,
            height,
            actual: pixels.len(),
        })?;
        self.stats.texture_uploads += 1;
        Ok(())
    }

    fn upload_vertices(&mut self, buffer: BufferHandle, bytes: &[u8]) -> BackendResult<()> {
        let slot = self.buffers.get_mut(buffer).ok_or(RenderError::UnknownResource("buffer"))?;
        slot.clear();
        slot.extend_from_slice(bytes);
        Ok(())
    }

    fn draw_triangles(&mut self, vertex_count: u32) -> BackendResult<()> {
        if vertex_count % 6 != 0 {
            return Err(RenderError::InvalidDraw(vertex_count));
        }
        let binding = self.bound.ok_or(RenderError::NothingBound)?;
        let bytes = self.buffers.get(binding.buffer).ok_or(RenderError::UnknownResource("buffer"))?;
        let texture = self.textures.get(binding.texture).ok_or(RenderError::UnknownResource("texture"))?;

        let stride = std::mem::size_of::<GlyphVertex>();
        if bytes.len() / stride < vertex_count as usize {
            return Err(RenderError::InvalidDraw(vertex_count));
        }
        let vertices: Vec<GlyphVertex> = bytes
            .chunks_exact(stride)
            .take(vertex_count as usize)
            .map(bytemuck::pod_read_unaligned)
            .collect();

        self.stats.draw_calls += 1;
        self.stats.vertices += vertex_count;
        for quad in vertices.chunks_exact(6) {
            self.stats.covered_pixels += blit_quad(&mut self.framebuffer, texture, quad, binding.color);
        }
        Ok(())
    }
}

/// Fill one axis-aligned glyph quad; vertices 0 and 5 are opposite corners.
fn blit_quad(target: &mut RgbaImage, texture: &GrayImage, quad: &[GlyphVertex], color: [f32; 4]) -> u64 {
    let (tw, th) = texture.dimensions();
    if tw == 0 || th == 0 {
        return 0;
    }
    let (w, h) = target.dimensions();
    let to_pixels = |v: &GlyphVertex| {
        (
            (v.position[0] + 1.0) * 0.5 * w as f32,
            (1.0 - v.position[1]) * 0.5 * h as f32,
        )
    };

    let (a, b) = (quad[0], quad[5]);
    let (ax, ay) = to_pixels(&a);
    let (bx, by) = to_pixels(&b);
    let (x0, x1) = (ax.min(bx), ax.max(bx));
    let (y0, y1) = (ay.min(by), ay.max(by));
    if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
        return 0;
    }

    let mut covered = 0;
    let (px_start, px_end) = (x0.floor().max(0.0) as u32, x1.ceil().min(w as f32) as u32);
    let (py_start, py_end) = (y0.floor().max(0.0) as u32, y1.ceil().min(h as f32) as u32);
    for py in py_start..py_end {
        let cy = py as f32 + 0.5;
        if cy < y0 || cy >= y1 {
            continue;
        }
        let t = a.tex_coord[1] + (cy - ay) / (by - ay) * (b.tex_coord[1] - a.tex_coord[1]);
        let ty = ((t * th as f32) as u32).min(th - 1);

        for px in px_start..px_end {
            let cx = px as f32 + 0.5;
            if cx < x0 || cx >= x1 {
                continue;
            }
            let s = a.tex_coord[0] + (cx - ax) / (bx - ax) * (b.tex_coord[0] - a.tex_coord[0]);
            let tx = ((s * tw as f32) as u32).min(tw - 1);

            let coverage = texture.get_pixel(tx, ty).0[0];
            if coverage == 0 {
                continue;
            }
            let alpha = f32::from(coverage) / 255.0 * color[3];
            blend(target.get_pixel_mut(px, py), color, alpha);
            covered += 1;
        }
    }
    covered
}

fn blend(dst: &mut Rgba<u8>, color: [f32; 4], alpha: f32) {
    for channel in 0..3 {
        let d = f32::from(dst.0[channel]) / 255.0;
        dst.0[channel] = to_byte(color[channel] * alpha + d * (1.0 - alpha));
    }
    let d = f32::from(dst.0[3]) / 255.0;
    dst.0[3] = to_byte(alpha + d * (1.0 - alpha));
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FilterMode, WrapMode};

    const SHADERS: ShaderSource<'static> = ShaderSource {
        vertex: "void main(void) {}",
        fragment: "void main(void) {}",
    };

    fn pipeline(backend: &mut SoftwareBackend, color: [f32; 4]) -> PipelineBinding {
        let binding = PipelineBinding {
            texture: backend.create_texture().unwrap(),
            sampler: backend
                .create_sampler(&SamplerDesc {
                    wrap: WrapMode::ClampToEdge,
                    min_filter: FilterMode::Linear,
                    mag_filter: FilterMode::Linear,
                })
                .unwrap(),
            buffer: backend.create_vertex_buffer().unwrap(),
            program: backend.create_program(&SHADERS).unwrap(),
            color,
        };
        backend.bind_text_pipeline(&binding).unwrap();
        binding
    }

    /// Quad from NDC (x, y) top-left to (x + w, y - h), same corner order as the glyph renderer
    fn quad(x: f32, y: f32, w: f32, h: f32) -> [GlyphVertex; 6] {
        [
            GlyphVertex::new(x, y, 0.0, 0.0),
            GlyphVertex::new(x, y - h, 0.0, 1.0),
            GlyphVertex::new(x + w, y, 1.0, 0.0),
            GlyphVertex::new(x + w, y, 1.0, 0.0),
            GlyphVertex::new(x, y - h, 0.0, 1.0),
            GlyphVertex::new(x + w, y - h, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_quad_covers_expected_pixels() {
        let mut backend = SoftwareBackend::new(8, 8);
        let binding = pipeline(&mut backend, [1.0, 0.0, 0.0, 1.0]);

        backend.upload_r8(binding.texture, 2, 2, &[255; 4]).unwrap();
        // Top-left quarter of the target: NDC (-1, 1) to (0, 0)
        backend
            .upload_vertices(binding.buffer, bytemuck::cast_slice(&quad(-1.0, 1.0, 1.0, 1.0)))
            .unwrap();
        backend.draw_triangles(6).unwrap();

        let stats = backend.stats();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.texture_uploads, 1);
        assert_eq!(stats.covered_pixels, 16);
        assert_eq!(backend.framebuffer().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(backend.framebuffer().get_pixel(3, 3), &Rgba([255, 0, 0, 255]));
        assert_eq!(backend.framebuffer().get_pixel(4, 4), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_coverage_scales_alpha() {
        let mut backend = SoftwareBackend::new(2, 2);
        let binding = pipeline(&mut backend, [1.0, 1.0, 1.0, 1.0]);
        backend.clear([0.0, 0.0, 0.0, 1.0]).unwrap();

        backend.upload_r8(binding.texture, 1, 1, &[0]).unwrap();
        backend
            .upload_vertices(binding.buffer, bytemuck::cast_slice(&quad(-1.0, 1.0, 2.0, 2.0)))
            .unwrap();
        backend.draw_triangles(6).unwrap();
        assert_eq!(backend.stats().covered_pixels, 0, "zero coverage leaves the target alone");

        backend.upload_r8(binding.texture, 1, 1, &[128]).unwrap();
        backend.draw_triangles(6).unwrap();
        let pixel = backend.framebuffer().get_pixel(1, 1);
        assert_eq!(pixel.0[0], 128);
        assert_eq!(pixel.0[3], 255);
    }

    #[test]
    fn test_empty_texture_still_counts_a_draw() {
        let mut backend = SoftwareBackend::new(4, 4);
        let binding = pipeline(&mut backend, [1.0; 4]);
        backend.upload_r8(binding.texture, 0, 0, &[]).unwrap();
        backend
            .upload_vertices(binding.buffer, bytemuck::cast_slice(&quad(0.0, 0.0, 0.0, 0.0)))
            .unwrap();
        backend.draw_triangles(6).unwrap();

        assert_eq!(backend.stats().draw_calls, 1);
        assert_eq!(backend.stats().covered_pixels, 0);
    }

    #[test]
    fn test_draw_errors() {
        let mut backend = SoftwareBackend::new(4, 4);
        assert!(matches!(backend.draw_triangles(6), Err(RenderError::NothingBound)));

        let binding = pipeline(&mut backend, [1.0; 4]);
        assert!(matches!(backend.draw_triangles(4), Err(RenderError::InvalidDraw(4))));
        assert!(matches!(backend.draw_triangles(6), Err(RenderError::InvalidDraw(6))), "buffer is empty");
        assert!(matches!(
            backend.upload_r8(binding.texture, 3, 3, &[0; 4]),
            Err(RenderError::InvalidUpload { width: 3, height: 3, actual: 4 })
        ));

        backend.destroy_texture(binding.texture);
        assert!(matches!(
            backend.bind_text_pipeline(&binding),
            Err(RenderError::UnknownResource("texture"))
        ));
    }

    #[test]
    fn test_program_needs_entry_points() {
        let mut backend = SoftwareBackend::new(1, 1);
        let result = backend.create_program(&ShaderSource { vertex: "void main() {}", fragment: "" });
        assert!(matches!(result, Err(RenderError::ShaderCompile(_))));
    }

    #[test]
    fn test_resources_are_released() {
        let mut backend = SoftwareBackend::new(1, 1);
        let binding = pipeline(&mut backend, [1.0; 4]);
        assert_eq!(backend.live_resources(), 4);

        backend.destroy_texture(binding.texture);
        backend.destroy_sampler(binding.sampler);
        backend.destroy_buffer(binding.buffer);
        backend.destroy_program(binding.program);
        assert_eq!(backend.live_resources(), 0);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut backend = SoftwareBackend::new(3, 2);
        backend.clear([0.1, 0.2, 0.4, 1.0]).unwrap();
        backend.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(2, 1), &Rgba([26, 51, 102, 255]));
    }
}
