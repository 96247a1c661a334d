//! Line-drawn caption text provided by the host

use crate::foundation::math::{Mat4, Vec3};

/// Vector line text overlay
///
/// Used for static instruction captions; shaped text goes through the
/// glyph pipeline instead.
pub trait LineOverlay {
    /// Draw `text` starting at `anchor`, with glyph axes `x_axis`/`y_axis`,
    /// after transforming by `projection`
    fn draw_text(&mut self, projection: &Mat4, text: &str, anchor: Vec3, x_axis: Vec3, y_axis: Vec3, color: [u8; 4]);
}
