//! # Play Modes
//!
//! A mode is one interactive screen. The host's frame loop feeds it input
//! events, then calls [`Mode::update`] and [`Mode::draw`] once per frame, and
//! finally [`Mode::cleanup`] to release its GPU resources.

pub mod dialogue;
pub mod hexapod;

pub use dialogue::DialogueMode;
pub use hexapod::HexapodMode;

use thiserror::Error;

use crate::assets::AssetError;
use crate::dialogue::DialogueError;
use crate::foundation::math::UVec2;
use crate::input::InputEvent;
use crate::render::{LineOverlay, RenderError, TextBackend};
use crate::text::FontError;

/// Errors raised by modes
#[derive(Error, Debug)]
pub enum ModeError {
    /// A transform the mode animates is not in the scene
    #[error("Scene has no transform named {0}")]
    MissingTransform(&'static str),

    /// The scene does not have exactly one camera
    #[error("Expecting scene to have exactly one camera, but it has {0}")]
    CameraCount(usize),

    /// Font could not be loaded
    #[error("Font error: {0}")]
    Font(#[from] FontError),

    /// Text pipeline failure
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Dialogue could not be loaded
    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    /// Asset could not be resolved
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// What a mode draws into for one frame
pub struct Frame<'a> {
    /// Drawable size in pixels
    pub drawable_size: UVec2,
    backend: &'a mut dyn TextBackend,
    lines: Option<&'a mut dyn LineOverlay>,
}

impl<'a> Frame<'a> {
    /// Frame of `drawable_size` pixels drawing through `backend`
    pub fn new(drawable_size: UVec2, backend: &'a mut dyn TextBackend) -> Self {
        Self {
            drawable_size,
            backend,
            lines: None,
        }
    }

    /// Attach the host's line text overlay
    #[must_use]
    pub fn with_line_overlay(mut self, lines: &'a mut dyn LineOverlay) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Width over height, or 1 for a degenerate drawable
    pub fn aspect(&self) -> f32 {
        if self.drawable_size.y == 0 {
            1.0
        } else {
            self.drawable_size.x as f32 / self.drawable_size.y as f32
        }
    }

    /// Text backend
    pub fn backend(&mut self) -> &mut (dyn TextBackend + 'a) {
        &mut *self.backend
    }

    /// Line text overlay, if the host provided one
    pub fn line_overlay(&mut self) -> Option<&mut (dyn LineOverlay + 'a)> {
        self.lines.as_deref_mut()
    }
}

/// One interactive screen
pub trait Mode {
    /// Handle one input event; returns true if it was consumed
    fn handle_event(&mut self, event: &InputEvent, window_size: UVec2) -> bool;

    /// Advance by `elapsed` seconds
    fn update(&mut self, elapsed: f32) -> Result<(), ModeError>;

    /// Draw the current state
    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), ModeError>;

    /// Release GPU resources; the mode must not draw afterwards
    fn cleanup(&mut self, backend: &mut dyn TextBackend);
}

/// Log a pen overflow once, pass every other render error through
///
/// `reported` remembers whether this overflow was already logged so a long
/// line does not flood the log every frame.
pub(crate) fn report_overflow(result: Result<(), RenderError>, reported: &mut bool) -> Result<(), RenderError> {
    match result {
        Err(RenderError::PenOverflow { x, y }) => {
            if !*reported {
                log::error!("Text ran off the render target at ({:.3}, {:.3}); rest of paragraph cut", x, y);
                *reported = true;
            }
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareBackend;

    #[test]
    fn test_overflow_is_reported_once() {
        let mut reported = false;
        let overflow = || Err(RenderError::PenOverflow { x: 1.1, y: 0.0 });

        assert!(report_overflow(overflow(), &mut reported).is_ok());
        assert!(reported);
        assert!(report_overflow(overflow(), &mut reported).is_ok());
    }

    #[test]
    fn test_other_errors_pass_through() {
        let mut reported = false;
        let result = report_overflow(Err(RenderError::NothingBound), &mut reported);
        assert!(matches!(result, Err(RenderError::NothingBound)));
        assert!(!reported);
    }

    #[test]
    fn test_frame_aspect() {
        let mut backend = SoftwareBackend::new(4, 4);
        assert_eq!(Frame::new(UVec2::new(1280, 640), &mut backend).aspect(), 2.0);
        assert_eq!(Frame::new(UVec2::new(10, 0), &mut backend).aspect(), 1.0);
    }
}
