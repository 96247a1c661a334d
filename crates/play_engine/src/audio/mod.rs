//! Positional audio interface
//!
//! Playback itself lives in the host's audio backend; modes only start
//! loops and move them (and the listener) around.

use crate::foundation::math::Vec3;

/// Handle to a playing loop, issued by the audio backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(pub u64);

/// Positional audio backend consumed by the modes
pub trait PositionalAudio {
    /// Start looping `sample` at `position`
    ///
    /// `half_volume_radius` is the distance at which the loop is heard at half volume.
    fn loop_3d(&mut self, sample: &str, volume: f32, position: Vec3, half_volume_radius: f32) -> LoopHandle;

    /// Move a playing loop, ramping over `ramp` seconds
    fn set_loop_position(&mut self, handle: LoopHandle, position: Vec3, ramp: f32);

    /// Move the listener; `right` orients stereo panning
    fn set_listener(&mut self, position: Vec3, right: Vec3, ramp: f32);
}
