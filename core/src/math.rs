//! Math type aliases and helper functions.
//!
//! Everything a saved pose needs is single precision.

pub use nalgebra;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Use [`quat_from_xyzw`] or `Quaternion::new(w, x, y, z)` to construct.
pub type Quat = nalgebra::Quaternion<f32>;

/// Create a quaternion from x, y, z, w components.
pub fn quat_from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Quat {
    nalgebra::Quaternion::new(w, x, y, z)
}

/// Create a quaternion from a `[x, y, z, w]` array.
pub fn quat_from_array(a: [f32; 4]) -> Quat {
    nalgebra::Quaternion::new(a[3], a[0], a[1], a[2])
}

/// Convert a quaternion to a `[x, y, z, w]` array.
pub fn quat_to_array(q: Quat) -> [f32; 4] {
    [q.coords.x, q.coords.y, q.coords.z, q.coords.w]
}

/// The identity rotation.
pub fn quat_identity() -> Quat {
    nalgebra::Quaternion::identity()
}

/// Create a quaternion from rotation around the Y axis.
pub fn quat_from_rotation_y(angle: f32) -> Quat {
    nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Vector3::y_axis(), angle).into_inner()
}

/// Convert a vector to a `[x, y, z]` array.
pub fn vec3_to_array(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quat_array_order_is_xyzw() {
        let q = quat_from_xyzw(0.1, 0.2, 0.3, 0.9);
        assert_eq!(quat_to_array(q), [0.1, 0.2, 0.3, 0.9]);
        assert_eq!(quat_from_array([0.1, 0.2, 0.3, 0.9]), q);
    }

    #[test]
    fn identity_has_unit_w() {
        assert_eq!(quat_to_array(quat_identity()), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rotation_y_is_unit_length() {
        let q = quat_from_rotation_y(1.2);
        assert!((q.norm() - 1.0).abs() < 1e-6);
    }
}
