//! Math utilities and types
//!
//! Provides the math types used by scenes, cameras and the text overlay.
//! Normalized device coordinates (NDC) run from -1 to 1 on both axes with +Y up.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix4,
    UnitQuaternion,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Unsigned 2D vector, used for window and drawable sizes in pixels
pub type UVec2 = Vector2<u32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale relative to a parent
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in parent space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Matrix taking local coordinates to the parent's frame (T * R * S)
    pub fn make_local_to_parent(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Local +X axis expressed in the parent frame (scaled)
    pub fn right(&self) -> Vec3 {
        column(&self.make_local_to_parent(), 0)
    }

    /// Local -Z axis expressed in the parent frame (scaled); cameras look down -Z
    pub fn forward(&self) -> Vec3 {
        -column(&self.make_local_to_parent(), 2)
    }
}

/// First three components of a matrix column
pub fn column(matrix: &Mat4, index: usize) -> Vec3 {
    Vec3::new(matrix[(0, index)], matrix[(1, index)], matrix[(2, index)])
}

/// Transform a point (w = 1) and drop the homogeneous coordinate
pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    (matrix * Vec4::new(point.x, point.y, point.z, 1.0)).xyz()
}

/// Projection that squeezes X by the aspect ratio, so overlay text keeps its shape
pub fn aspect_projection(aspect: f32) -> Mat4 {
    Mat4::new_nonuniform_scaling(&Vec3::new(1.0 / aspect, 1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_axes() {
        let transform = Transform::default();
        assert_relative_eq!(transform.right(), Vec3::x(), epsilon = EPSILON);
        assert_relative_eq!(transform.forward(), -Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_local_to_parent_applies_rotation_then_translation() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation,
            ..Transform::default()
        };

        let moved = transform_point(&transform.make_local_to_parent(), Vec3::x());
        assert_relative_eq!(moved, Vec3::new(1.0, 2.0, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_aspect_projection_scales_x_only() {
        let projection = aspect_projection(2.0);
        let p = transform_point(&projection, Vec3::new(2.0, 1.0, 0.5));
        assert_relative_eq!(p, Vec3::new(1.0, 1.0, 0.5), epsilon = EPSILON);
    }
}
