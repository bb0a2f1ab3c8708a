use glam::{Affine2, Mat2, Vec2};

use crate::Angle;

/// 2D affine transform: rotation, scale and translation.
///
/// Composition reads left to right, `a.then(b)` applies `a` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2(Affine2);

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2 {
    pub const IDENTITY: Self = Self(Affine2::IDENTITY);

    #[inline]
    pub fn rotation(angle: Angle) -> Self {
        Self(Affine2::from_angle(angle.rad()))
    }

    #[inline]
    pub fn translation(offset: Vec2) -> Self {
        Self(Affine2::from_translation(offset))
    }

    #[inline]
    pub fn scale(scale: Vec2) -> Self {
        Self(Affine2::from_scale(scale))
    }

    /// World to camera space for a viewer at `pos` facing `angle`. The output
    /// X is the lateral offset (positive to the viewer's left) and Y the
    /// forward depth.
    pub fn world_to_camera(pos: Vec2, angle: Angle) -> Self {
        let (sin, cos) = angle.sin_cos();
        let m = Mat2::from_cols(Vec2::new(-sin, cos), Vec2::new(cos, sin));
        Self(Affine2::from_mat2_translation(m, -(m * pos)))
    }

    /// Apply `self`, then `next`
    #[inline]
    pub fn then(&self, next: &Transform2) -> Self {
        Self(next.0 * self.0)
    }

    #[inline]
    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        self.0.transform_point2(p)
    }

    /// Vectors ignore the translation part
    #[inline]
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        self.0.transform_vector2(v)
    }
}
