//! # Dialogue
//!
//! File-driven dialogue screens revealed typewriter style, with levels that
//! branch on the player's choices.
//!
//! Dialogue files are plain text, one line of dialogue per line, named by a
//! level id (`scenes/level_1`) plus an optional branch suffix (`_a`, `_b`,
//! `_c`) and resolved through [`AssetPaths`](crate::assets::AssetPaths).

pub mod buffer;
pub mod reveal;
pub mod progression;
pub mod session;

pub use buffer::DialogueBuffer;
pub use reveal::RevealState;
pub use progression::{Branch, Phase, Progression, Transition};
pub use session::DialogueSession;

use std::path::PathBuf;

use thiserror::Error;

use crate::assets::AssetError;

/// Result type for dialogue operations
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Dialogue errors
#[derive(Error, Debug)]
pub enum DialogueError {
    /// Dialogue file could not be read
    #[error("Failed to read dialogue {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Dialogue id did not resolve to a file
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// No levels were configured
    #[error("No dialogue levels configured")]
    NoLevels,
}
