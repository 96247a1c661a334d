//! Settings for the play modes
//!
//! Every section has defaults matching the stock sample content, so a config
//! file only needs to name what it changes.

use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use super::{Config, ConfigError};
use crate::input::KeyCode;

/// Top-level play configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Asset resolution
    pub assets: AssetsConfig,
    /// Font face used by the shaped-text overlay
    pub font: FontConfig,
    /// Overlay colors
    pub text: TextConfig,
    /// Dialogue mode settings
    pub dialogue: DialogueConfig,
    /// Hexapod mode settings
    pub hexapod: HexapodConfig,
}

impl Config for PlayConfig {}

impl PlayConfig {
    /// Check values that would otherwise fail deep inside a frame
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font.size_px.is_nan() || self.font.size_px <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "font.size_px",
                reason: format!("must be positive, got {}", self.font.size_px),
            });
        }
        if self.dialogue.reveal_interval.is_nan() || self.dialogue.reveal_interval <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "dialogue.reveal_interval",
                reason: format!("must be positive, got {}", self.dialogue.reveal_interval),
            });
        }
        if self.dialogue.levels.is_empty() {
            return Err(ConfigError::Invalid {
                field: "dialogue.levels",
                reason: "at least one level is required".to_string(),
            });
        }
        let keys = &self.dialogue.choice_keys;
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[0] == keys[2] {
            return Err(ConfigError::Invalid {
                field: "dialogue.choice_keys",
                reason: format!("choice keys must be distinct, got {keys:?}"),
            });
        }
        Ok(())
    }
}

/// Asset resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Data directory; relative paths are taken from the working directory
    pub root: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
        }
    }
}

/// Font face settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Logical asset name of the TTF/OTF file
    pub path: String,
    /// Pixel size the face is set to, once, at load
    pub size_px: f32,
    /// Vertical placement rule for glyph quads
    pub baseline: BaselineMode,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: "fonts/Roboto-Regular.ttf".to_string(),
            size_px: 72.0,
            baseline: BaselineMode::BoundingBox,
        }
    }
}

/// How a glyph's top edge is placed relative to the pen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    /// Drop by the face bounding-box height (unscaled font units) minus the
    /// glyph's top bearing. Matches the shipped sample layout.
    #[default]
    BoundingBox,
    /// Drop by the scaled face ascender minus the glyph's top bearing. The pen
    /// marks the ascender line; the first baseline sits one ascender below it.
    Ascender,
}

/// Overlay colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Glyph color (RGBA); glyph coverage multiplies alpha
    pub color: [f32; 4],
    /// Clear color for modes that own the whole frame
    pub clear_color: [f32; 4],
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            color: [0.388, 0.765, 0.196, 1.0],
            clear_color: [0.1, 0.2, 0.4, 0.0],
        }
    }
}

/// Dialogue mode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Level dialogue files, in play order (asset names without branch suffix)
    pub levels: Vec<String>,
    /// Pen start for the first line, in NDC
    pub origin: [f32; 2],
    /// Horizontal bias added to every glyph offset, in 1/64 px
    pub indent: i32,
    /// Seconds between revealed characters
    pub reveal_interval: f32,
    /// Keys for choices A, B and C
    pub choice_keys: [KeyCode; 3],
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                "scenes/intro".to_string(),
                "scenes/level_1".to_string(),
                "scenes/finish".to_string(),
            ],
            origin: [-0.9, 0.8],
            indent: 400,
            reveal_interval: 0.03,
            choice_keys: [KeyCode::A, KeyCode::B, KeyCode::C],
        }
    }
}

/// Hexapod mode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexapodConfig {
    /// Camera movement speed in world units per second
    pub player_speed: f32,
    /// Sample looped at the leg tip
    pub loop_sample: String,
    /// Instruction caption drawn with the line overlay
    pub caption: String,
    /// Lines drawn with the shaped-text overlay
    pub overlay_lines: Vec<String>,
    /// Pen start for the shaped overlay, in NDC
    pub overlay_origin: [f32; 2],
}

impl Default for HexapodConfig {
    fn default() -> Self {
        Self {
            player_speed: 30.0,
            loop_sample: "dusty-floor.opus".to_string(),
            caption: "Mouse motion rotates camera; WASD moves; escape ungrabs mouse".to_string(),
            overlay_lines: vec!["Hello World! Shaped text over the hexapod. abcdABCD".to_string()],
            overlay_origin: [0.0, 0.0],
        }
    }
}
