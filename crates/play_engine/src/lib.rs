//! # Play Engine
//!
//! Interactive play modes for the engine samples: a 3D hexapod scene with a
//! shaped-text overlay, and a visual-novel style dialogue screen whose text
//! is revealed typewriter fashion and which branches on player choices.
//!
//! ## Features
//!
//! - **Shaped Text**: HarfBuzz-compatible shaping (`rustybuzz`) with glyphs
//!   rasterized by `fontdue`, one textured quad and one draw call per glyph
//! - **Typewriter Reveal**: fixed-cadence character reveal across a paragraph
//! - **Branching Dialogue**: file-driven levels with one-shot choice detours
//! - **Software Target**: a CPU implementation of the text backend for
//!   headless previews and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use play_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlayConfig::default();
//!     let mut backend = SoftwareBackend::new(1280, 720);
//!     let mut mode = DialogueMode::from_config(&config, &mut backend)?;
//!
//!     mode.update(1.0 / 60.0)?;
//!     let mut frame = Frame::new(UVec2::new(1280, 720), &mut backend);
//!     mode.draw(&mut frame)?;
//!     mode.cleanup(&mut backend);
//!     Ok(())
//! }
//! ```

pub mod foundation;
pub mod config;
pub mod assets;
pub mod input;
pub mod audio;
pub mod scene;
pub mod render;
pub mod text;
pub mod dialogue;
pub mod mode;

pub use mode::{Mode, ModeError, Frame};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Mode, ModeError, Frame,
        foundation::math::{Vec2, Vec3, Mat4, Quat, UVec2, Transform},
        config::{Config, ConfigError, PlayConfig},
        assets::AssetPaths,
        input::{Button, InputEvent, KeyCode, MouseButton},
        render::{TextBackend, SoftwareBackend, LineOverlay},
        text::{FontFace, FontShaper, TextOverlay},
        dialogue::{DialogueBuffer, Progression, RevealState},
        mode::{DialogueMode, HexapodMode},
    };
}
