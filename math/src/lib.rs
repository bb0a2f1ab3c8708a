//! Geometry kernel shared by the map model and the renderer. Everything in
//! here is a pure function or a `Copy` value type.

mod angle;
mod bbox;
mod line;
mod transform;

pub use angle::*;
pub use bbox::BBox;
pub use glam::Vec2;
pub use line::*;
pub use transform::Transform2;

/// 2D cross product (z of the 3D cross). Positive when `rhs` is
/// counter-clockwise from `lhs`.
#[inline]
pub fn cross(lhs: Vec2, rhs: Vec2) -> f32 {
    lhs.x * rhs.y - lhs.y * rhs.x
}

/// Rotate a vector counter-clockwise
#[inline]
pub fn rotate(v: Vec2, angle: Angle) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Convert a world point to camera space for a viewer at `viewer` facing
/// `angle`.
///
/// Returned `x` is the lateral offset `camX = dx·(−sinθ) + dy·cosθ`, positive
/// to the viewer's left. Returned `y` is the forward depth
/// `camZ = dx·cosθ + dy·sinθ`, positive in front of the viewer.
///
/// A one off point, anything projecting many points should build the
/// `Transform2` once.
#[inline]
pub fn to_camera_space(point: Vec2, viewer: Vec2, angle: Angle) -> Vec2 {
    Transform2::world_to_camera(viewer, angle).transform_point(point)
}

/// Wrap an integer texture coordinate in to `0..size`, negative values
/// included
#[inline]
pub const fn wrap(n: i32, size: i32) -> i32 {
    ((n % size) + size) % size
}

/// Do a 2d XY projection of `this` on to `onto`
#[inline]
pub fn project_vec2d(this: Vec2, onto: Vec2) -> Vec2 {
    let d = onto.dot(onto);
    if d > 0.0 {
        let dp = this.dot(onto);
        return onto * (dp / d);
    }
    onto
}

#[cfg(test)]
mod tests {
    use super::{Angle, cross, project_vec2d, rotate, to_camera_space, wrap};
    use glam::Vec2;

    #[test]
    fn camera_space_facing_east() {
        let cam = to_camera_space(Vec2::new(0.0, 10.0), Vec2::ZERO, Angle::new(0.0));
        assert!((cam.x - 10.0).abs() < 1e-5);
        assert!(cam.y.abs() < 1e-5);
    }

    #[test]
    fn camera_space_facing_north() {
        let cam = to_camera_space(Vec2::new(0.0, 10.0), Vec2::ZERO, Angle::from_degrees(90.0));
        assert!(cam.x.abs() < 1e-4);
        assert!((cam.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn camera_space_is_translation_invariant() {
        let viewer = Vec2::new(-300.0, 25.0);
        let a = to_camera_space(Vec2::new(-200.0, 25.0), viewer, Angle::new(0.0));
        assert!((a - Vec2::new(0.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn vector_helpers() {
        assert_eq!(cross(Vec2::X, Vec2::Y), 1.0);
        assert_eq!(cross(Vec2::Y, Vec2::X), -1.0);
        let r = rotate(Vec2::new(2.0, 0.0), Angle::from_degrees(90.0));
        assert!((r - Vec2::new(0.0, 2.0)).length() < 1e-5);
        assert!((Angle::from_vector(r).to_degrees() - 90.0).abs() < 1e-3);
        assert_eq!(project_vec2d(Vec2::new(3.0, 4.0), Vec2::X), Vec2::new(3.0, 0.0));
        assert!((Vec2::new(3.0, 4.0).normalize_or_zero() - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn wrap_handles_negatives() {
        assert_eq!(wrap(5, 64), 5);
        assert_eq!(wrap(64, 64), 0);
        assert_eq!(wrap(-1, 64), 63);
        assert_eq!(wrap(-129, 64), 63);
    }
}
