//! Font faces: shaping and glyph rasterization
//!
//! [`FontFace`] pairs `rustybuzz` (a HarfBuzz port) for shaping with
//! `fontdue` for rasterization. Both read the same font bytes. All lengths
//! handed out are 26.6 fixed point (1/64 pixel) at the face's pixel size,
//! except [`FaceMetrics::bbox_height`].

use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use rustybuzz::UnicodeBuffer;

use crate::config::BaselineMode;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Font file could not be read
    #[error("Failed to read font {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    LoadError(String),

    /// Shaping a string failed
    #[error("Failed to shape text: {0}")]
    Shaping(String),

    /// Shaper produced a glyph index the rasterizer does not have
    #[error("Glyph index {0} is out of range for this face")]
    GlyphOutOfRange(u32),

    /// Failed to rasterize a specific glyph
    #[error("Failed to rasterize glyph {glyph_id}: {reason}")]
    Rasterize {
        /// Glyph index
        glyph_id: u32,
        /// What went wrong
        reason: String,
    },
}

/// 26.6 fixed-point vector (1/64 pixel units)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedVec {
    /// Horizontal component
    pub x: i32,
    /// Vertical component, +Y up
    pub y: i32,
}

impl FixedVec {
    /// Create a vector from 1/64 pixel components
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Face-wide metrics at the configured pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    /// Pixel size the face was set to
    pub size_px: f32,
    /// Font design units per em
    pub units_per_em: u16,
    /// Height of the face's global bounding box in *unscaled font units*
    pub bbox_height: i32,
    /// Scaled ascender, 1/64 px
    pub ascender: i32,
    /// Scaled descender (negative below the baseline), 1/64 px
    pub descender: i32,
    /// Distance between consecutive baselines, 1/64 px
    pub line_height: i32,
}

impl FaceMetrics {
    /// The quantity a glyph's top bearing is subtracted from when placing its quad
    pub fn baseline_drop(&self, mode: BaselineMode) -> i32 {
        match mode {
            BaselineMode::BoundingBox => self.bbox_height,
            BaselineMode::Ascender => self.ascender,
        }
    }
}

/// One shaped glyph, before rasterization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedGlyph {
    /// Glyph index in the face
    pub glyph_id: u32,
    /// Byte offset of the source cluster in the shaped string
    pub cluster: u32,
    /// Pen advance after this glyph, 1/64 px
    pub advance: FixedVec,
    /// Offset of this glyph from the pen, 1/64 px
    pub offset: FixedVec,
}

/// The single rasterization slot of a face
///
/// Each rasterization overwrites the previous bitmap.
#[derive(Debug, Clone, Default)]
pub struct GlyphSlot {
    bitmap: Vec<u8>,
    width: u32,
    height: u32,
    bearing_x: i32,
    bearing_y: i32,
}

impl GlyphSlot {
    /// Replace the slot contents
    ///
    /// `bitmap` is row-major, top row first, one coverage byte per pixel.
    /// Bearings are 1/64 px from the pen: `bearing_y` is the bitmap's top
    /// edge above the baseline.
    pub fn store(&mut self, bitmap: Vec<u8>, width: u32, height: u32, bearing_x: i32, bearing_y: i32) {
        self.bitmap = bitmap;
        self.width = width;
        self.height = height;
        self.bearing_x = bearing_x;
        self.bearing_y = bearing_y;
    }

    /// Coverage bytes of the last rasterized glyph
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Bitmap width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bitmap height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Left edge of the bitmap relative to the pen, 1/64 px
    pub fn bearing_x(&self) -> i32 {
        self.bearing_x
    }

    /// Top edge of the bitmap above the baseline, 1/64 px
    pub fn bearing_y(&self) -> i32 {
        self.bearing_y
    }
}

/// A loaded face that can shape strings and rasterize glyphs
pub trait FontBackend {
    /// Face-wide metrics
    fn metrics(&self) -> &FaceMetrics;

    /// Shape `text` into glyphs in logical order
    fn shape(&self, text: &str) -> FontResult<Vec<ShapedGlyph>>;

    /// Rasterize one glyph into `slot`, replacing what was there
    fn rasterize(&self, glyph_id: u32, slot: &mut GlyphSlot) -> FontResult<()>;
}

/// TrueType/OpenType face shaped with `rustybuzz` and rasterized with `fontdue`
pub struct FontFace {
    data: Vec<u8>,
    raster: Font,
    metrics: FaceMetrics,
    fixed_per_unit: f32,
}

impl FontFace {
    /// Load a face from a font file and set its pixel size
    pub fn load(path: impl AsRef<Path>, size_px: f32) -> FontResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let face = Self::from_bytes(data, size_px)?;
        log::info!("Loaded font {} at {}px", path.display(), size_px);
        Ok(face)
    }

    /// Create a face from raw font bytes (TTF or OTF) and set its pixel size
    pub fn from_bytes(data: Vec<u8>, size_px: f32) -> FontResult<Self> {
        if size_px.is_nan() || size_px <= 0.0 {
            return Err(FontError::LoadError(format!("invalid pixel size {size_px}")));
        }

        let raster = Font::from_bytes(
            data.as_slice(),
            FontSettings {
                scale: size_px,
                ..FontSettings::default()
            },
        )
        .map_err(|e| FontError::LoadError(format!("fontdue: {e}")))?;

        if rustybuzz::Face::from_slice(&data, 0).is_none() {
            return Err(FontError::LoadError("face cannot be shaped".to_string()));
        }

        let (metrics, fixed_per_unit) = {
            let face = rustybuzz::ttf_parser::Face::parse(&data, 0)
                .map_err(|e| FontError::LoadError(format!("ttf-parser: {e}")))?;
            let units_per_em = face.units_per_em();
            let fixed_per_unit = fixed_per_unit(size_px, units_per_em);
            let scale = |units: i16| scale_units(i32::from(units), fixed_per_unit);

            let bbox = face.global_bounding_box();
            let ascender = scale(face.ascender());
            let descender = scale(face.descender());
            let line_height = raster.horizontal_line_metrics(size_px).map_or_else(
                || ascender - descender + scale(face.line_gap()),
                |line| (line.new_line_size * 64.0).round() as i32,
            );

            let metrics = FaceMetrics {
                size_px,
                units_per_em,
                bbox_height: i32::from(bbox.y_max) - i32::from(bbox.y_min),
                ascender,
                descender,
                line_height,
            };
            (metrics, fixed_per_unit)
        };

        Ok(Self {
            data,
            raster,
            metrics,
            fixed_per_unit,
        })
    }

    fn to_fixed(&self, units: i32) -> i32 {
        scale_units(units, self.fixed_per_unit)
    }
}

/// 26.6 units per font design unit at `size_px`
fn fixed_per_unit(size_px: f32, units_per_em: u16) -> f32 {
    size_px * 64.0 / f32::from(units_per_em)
}

/// Font design units to 26.6, rounded to the nearest 1/64 px
fn scale_units(units: i32, fixed_per_unit: f32) -> i32 {
    (units as f32 * fixed_per_unit).round() as i32
}

/// Move a fontdue raster into `slot`
///
/// fontdue reports the bitmap's bottom-left corner (`xmin`, `ymin`) relative
/// to the pen and baseline; the slot wants the top edge.
fn store_raster(
    slot: &mut GlyphSlot,
    glyph_id: u32,
    bitmap: Vec<u8>,
    width: usize,
    height: usize,
    xmin: i32,
    ymin: i32,
) -> FontResult<()> {
    if bitmap.len() != width * height {
        return Err(FontError::Rasterize {
            glyph_id,
            reason: format!("{} bytes for a {width}x{height} bitmap", bitmap.len()),
        });
    }
    let top = ymin + height as i32;
    slot.store(bitmap, width as u32, height as u32, xmin * 64, top * 64);
    Ok(())
}

impl FontBackend for FontFace {
    fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    fn shape(&self, text: &str) -> FontResult<Vec<ShapedGlyph>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let face = rustybuzz::Face::from_slice(&self.data, 0)
            .ok_or_else(|| FontError::Shaping("face no longer parses".to_string()))?;

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&face, &[], buffer);

        // rustybuzz positions are in font units; scale them to 26.6 at our size
        let glyphs = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                advance: FixedVec::new(self.to_fixed(pos.x_advance), self.to_fixed(pos.y_advance)),
                offset: FixedVec::new(self.to_fixed(pos.x_offset), self.to_fixed(pos.y_offset)),
            })
            .collect();
        Ok(glyphs)
    }

    fn rasterize(&self, glyph_id: u32, slot: &mut GlyphSlot) -> FontResult<()> {
        let index = u16::try_from(glyph_id)
            .ok()
            .filter(|&index| index < self.raster.glyph_count())
            .ok_or(FontError::GlyphOutOfRange(glyph_id))?;

        let (metrics, bitmap) = self.raster.rasterize_indexed(index, self.metrics.size_px);
        store_raster(slot, glyph_id, bitmap, metrics.width, metrics.height, metrics.xmin, metrics.ymin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FaceMetrics {
        FaceMetrics {
            size_px: 72.0,
            units_per_em: 2048,
            bbox_height: 2700,
            ascender: 67 * 64,
            descender: -18 * 64,
            line_height: 84 * 64,
        }
    }

    #[test]
    fn test_baseline_drop_modes() {
        let metrics = metrics();
        assert_eq!(metrics.baseline_drop(BaselineMode::BoundingBox), 2700);
        assert_eq!(metrics.baseline_drop(BaselineMode::Ascender), 67 * 64);
    }

    #[test]
    fn test_slot_store_overwrites() {
        let mut slot = GlyphSlot::default();
        slot.store(vec![1; 6], 3, 2, 64, 128);
        slot.store(vec![2; 2], 1, 2, 0, 64);

        assert_eq!(slot.bitmap(), &[2, 2]);
        assert_eq!((slot.width(), slot.height()), (1, 2));
        assert_eq!((slot.bearing_x(), slot.bearing_y()), (0, 64));
    }

    #[test]
    fn test_unit_scaling() {
        let scale = fixed_per_unit(72.0, 2048);
        assert_eq!(scale_units(2048, scale), 72 * 64);
        assert_eq!(scale_units(1024, scale), 36 * 64);
        // 1 unit = 2.25/64 px, rounds to 2
        assert_eq!(scale_units(1, scale), 2);
        assert_eq!(scale_units(-483, scale), -1087);
    }

    #[test]
    fn test_raster_top_edge_from_bottom() {
        let mut slot = GlyphSlot::default();
        store_raster(&mut slot, 7, vec![9; 30], 3, 10, 2, -3).unwrap();

        assert_eq!((slot.width(), slot.height()), (3, 10));
        assert_eq!(slot.bearing_x(), 2 * 64);
        assert_eq!(slot.bearing_y(), 7 * 64);
    }

    #[test]
    fn test_raster_size_mismatch_is_rejected() {
        let mut slot = GlyphSlot::default();
        let result = store_raster(&mut slot, 7, vec![0; 5], 3, 2, 0, 0);
        assert!(matches!(result, Err(FontError::Rasterize { glyph_id: 7, .. })));
        assert!(slot.bitmap().is_empty(), "slot untouched on failure");
    }

    mod dejavu {
        use super::super::*;
        use rustybuzz::ttf_parser;

        const DEJAVU_SANS: &[u8] = include_bytes!("../../test_data/DejaVuSans.ttf");

        fn face() -> FontFace {
            FontFace::from_bytes(DEJAVU_SANS.to_vec(), 72.0).unwrap()
        }

        fn parsed() -> ttf_parser::Face<'static> {
            ttf_parser::Face::parse(DEJAVU_SANS, 0).unwrap()
        }

        fn glyph(ch: char) -> u32 {
            u32::from(parsed().glyph_index(ch).unwrap().0)
        }

        #[test]
        fn test_face_metrics() {
            let face = face();
            let metrics = face.metrics();
            let parsed = parsed();
            let scale = fixed_per_unit(72.0, parsed.units_per_em());

            assert_eq!(metrics.units_per_em, 2048);
            let bbox = parsed.global_bounding_box();
            assert_eq!(metrics.bbox_height, i32::from(bbox.y_max) - i32::from(bbox.y_min));
            assert_eq!(metrics.ascender, scale_units(i32::from(parsed.ascender()), scale));
            assert_eq!(metrics.descender, scale_units(i32::from(parsed.descender()), scale));
            assert!(metrics.ascender > 0 && metrics.descender < 0);

            let raster = Font::from_bytes(DEJAVU_SANS, FontSettings::default()).unwrap();
            let line = raster.horizontal_line_metrics(72.0).unwrap();
            assert_eq!(metrics.line_height, (line.new_line_size * 64.0).round() as i32);
        }

        #[test]
        fn test_shape_order_clusters_and_ligature() {
            let glyphs = face().shape("AVo fi é").unwrap();

            // "fi" becomes one ligature glyph; é is two bytes
            let clusters: Vec<_> = glyphs.iter().map(|g| g.cluster).collect();
            assert_eq!(clusters, vec![0, 1, 2, 3, 4, 6, 7]);
            assert_eq!(glyphs[0].glyph_id, glyph('A'));
            assert_eq!(glyphs[1].glyph_id, glyph('V'));
            assert_ne!(glyphs[4].glyph_id, glyph('f'));
            assert_eq!(glyphs[6].glyph_id, glyph('é'));
        }

        #[test]
        fn test_advance_is_scaled_to_fixed_point() {
            let parsed = parsed();
            let o = parsed.glyph_index('o').unwrap();
            let units = i32::from(parsed.glyph_hor_advance(o).unwrap());

            let shaped = face().shape("o").unwrap();
            assert_eq!(shaped[0].advance, FixedVec::new(scale_units(units, fixed_per_unit(72.0, 2048)), 0));
            assert_eq!(shaped[0].offset, FixedVec::default());
        }

        #[test]
        fn test_pair_is_kerned() {
            let face = face();
            let alone = face.shape("A").unwrap()[0].advance.x;
            let kerned = face.shape("AV").unwrap()[0].advance.x;
            assert!(kerned < alone, "A before V should tighten: {kerned} vs {alone}");
        }

        #[test]
        fn test_rasterize_fills_slot() {
            let face = face();
            let mut slot = GlyphSlot::default();

            face.rasterize(glyph('A'), &mut slot).unwrap();
            assert_eq!((slot.width(), slot.height()), (49, 53));
            assert_eq!(slot.bitmap().len(), 49 * 53);
            assert_eq!(slot.bearing_y(), 53 * 64, "A sits on the baseline");

            face.rasterize(glyph('p'), &mut slot).unwrap();
            assert!(slot.bearing_y() > 0);
            assert!(slot.bearing_y() < slot.height() as i32 * 64, "p descends below the baseline");

            face.rasterize(glyph(' '), &mut slot).unwrap();
            assert_eq!((slot.width(), slot.height()), (0, 0));
        }

        #[test]
        fn test_glyph_out_of_range() {
            let mut slot = GlyphSlot::default();
            assert!(matches!(
                face().rasterize(60_000, &mut slot),
                Err(FontError::GlyphOutOfRange(60_000))
            ));
        }
    }

    #[test]
    fn test_garbage_bytes_fail_to_load() {
        let result = FontFace::from_bytes(b"definitely not a font".to_vec(), 72.0);
        assert!(matches!(result, Err(FontError::LoadError(_))));
    }

    #[test]
    fn test_bad_size_fails_to_load() {
        assert!(matches!(FontFace::from_bytes(Vec::new(), 0.0), Err(FontError::LoadError(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ttf");
        match FontFace::load(&path, 72.0) {
            Err(FontError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io error, got {:?}", other.err()),
        }
    }
}
