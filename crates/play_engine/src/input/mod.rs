//! Input events and button latches
//!
//! The host translates its window events into [`InputEvent`]s and hands them
//! to the active mode. Modes keep one [`Button`] per logical control.

use serde::{Serialize, Deserialize};

/// Latched state of one logical button
///
/// `pressed` follows the key; `downs` counts presses since the last
/// [`Button::clear_downs`], which modes call at the end of every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Button {
    /// Number of key-down edges since the last reset
    pub downs: u8,
    /// Whether the key is currently held
    pub pressed: bool,
}

impl Button {
    /// Register a key-down edge
    pub fn press(&mut self) {
        self.downs = self.downs.saturating_add(1);
        self.pressed = true;
    }

    /// Register a key-up edge
    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Whether at least one press happened since the last reset
    pub fn was_pressed(&self) -> bool {
        self.downs > 0
    }

    /// Forget the presses counted so far
    pub fn clear_downs(&mut self) {
        self.downs = 0;
    }
}

/// Input event delivered to a mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key went down
    KeyDown(KeyCode),

    /// Key went up
    KeyUp(KeyCode),

    /// Mouse button went down
    MouseButtonDown(MouseButton),

    /// Relative mouse motion in window pixels
    MouseMotion {
        /// Horizontal motion, +X right
        xrel: f32,
        /// Vertical motion, +Y down (window convention)
        yrel: f32,
    },
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}
