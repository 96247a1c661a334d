//! Scene graph interface
//!
//! Scene loading, meshes and lit shading belong to the host's scene system.
//! Modes look transforms up by name once, keep their ids, and mutate them
//! every frame.

use slotmap::new_key_type;

use crate::foundation::math::{Mat4, Transform, Vec3};

new_key_type! {
    /// Stable id of a transform node in a scene
    pub struct TransformId;
}

/// Perspective camera attached to a scene transform
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Transform the camera is attached to
    pub transform: TransformId,
    /// Vertical field of view in radians
    pub fovy: f32,
    /// Width over height of the drawable
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
}

/// Directional light handed to the lit shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels
    pub direction: Vec3,
    /// Light energy per color channel
    pub energy: Vec3,
}

/// Scene system consumed by the modes
pub trait SceneGraph {
    /// Find a transform by node name
    fn find_transform(&self, name: &str) -> Option<TransformId>;

    /// Read a transform
    fn transform(&self, id: TransformId) -> Option<&Transform>;

    /// Mutate a transform
    fn transform_mut(&mut self, id: TransformId) -> Option<&mut Transform>;

    /// Accumulated local-to-world matrix of a transform (parents included)
    fn local_to_world(&self, id: TransformId) -> Option<Mat4>;

    /// Cameras in the scene
    fn cameras(&self) -> &[Camera];

    /// Mutable cameras in the scene
    fn cameras_mut(&mut self) -> &mut [Camera];

    /// Draw every drawable as seen from camera `camera`
    fn draw(&mut self, camera: usize, light: &DirectionalLight);
}
