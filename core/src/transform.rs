//! Spatial placement of an actor.
//!
//! [`Transform`] has a fixed-width binary pose used by every saved actor
//! container: translation, rotation `[x, y, z, w]`, scale, ten little-endian
//! `f32` values in that order.

use crate::math::{Quat, Vec3, quat_from_array, quat_identity, quat_to_array, vec3_to_array};

/// Size in bytes of an encoded pose.
pub const POSE_SIZE: usize = 10 * 4;

/// Position, rotation and scale of a placed object.
///
/// # Example
///
/// ```
/// use keepsake_core::Transform;
/// use keepsake_core::math::{Vec3, quat_from_rotation_y};
///
/// let transform = Transform::from_xyz(1.0, 2.0, 3.0)
///     .with_rotation(quat_from_rotation_y(std::f32::consts::FRAC_PI_2))
///     .with_scale(Vec3::new(2.0, 2.0, 2.0));
/// assert_eq!(transform.translation.y, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// No translation, no rotation, unit scale.
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: quat_identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Creates a transform at the given position with default rotation and scale.
    #[inline]
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    /// Creates a transform with the given translation.
    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Returns this transform with a different rotation.
    #[inline]
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns this transform with a different scale.
    #[inline]
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Encodes the pose as ten little-endian `f32` values.
    pub fn to_pose_bytes(&self) -> [u8; POSE_SIZE] {
        let mut out = [0u8; POSE_SIZE];
        let values = self.pose_values();
        for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// Decodes a pose written by [`to_pose_bytes`](Self::to_pose_bytes).
    pub fn from_pose_bytes(bytes: &[u8; POSE_SIZE]) -> Self {
        let mut values = [0f32; 10];
        for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self {
            translation: Vec3::new(values[0], values[1], values[2]),
            rotation: quat_from_array([values[3], values[4], values[5], values[6]]),
            scale: Vec3::new(values[7], values[8], values[9]),
        }
    }

    fn pose_values(&self) -> [f32; 10] {
        let [tx, ty, tz] = vec3_to_array(self.translation);
        let [rx, ry, rz, rw] = quat_to_array(self.rotation);
        let [sx, sy, sz] = vec3_to_array(self.scale);
        [tx, ty, tz, rx, ry, rz, rw, sx, sy, sz]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quat_from_xyzw;

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.translation, Vec3::zeros());
        assert_eq!(t.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(quat_to_array(t.rotation), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn pose_layout_is_translation_rotation_scale() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0)
            .with_rotation(quat_from_xyzw(4.0, 5.0, 6.0, 7.0))
            .with_scale(Vec3::new(8.0, 9.0, 10.0));
        let bytes = t.to_pose_bytes();
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &4.0f32.to_le_bytes());
        assert_eq!(&bytes[24..28], &7.0f32.to_le_bytes());
        assert_eq!(&bytes[36..40], &10.0f32.to_le_bytes());
        assert_eq!(Transform::from_pose_bytes(&bytes), t);
    }

    #[test]
    fn builders_keep_other_components() {
        let t = Transform::from_xyz(1.0, 0.0, 0.0).with_scale(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(t.translation.x, 1.0);
        assert_eq!(quat_to_array(t.rotation), [0.0, 0.0, 0.0, 1.0]);
    }
}
