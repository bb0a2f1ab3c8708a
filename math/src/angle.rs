use glam::Vec2;
use std::f32::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Number of BAMS units in a full circle
pub const BAMS_PER_TURN: f32 = 65536.0;

/// An angle in radians, always stored wrapped to `[0, 2π)`
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Angle(f32);

impl Angle {
    /// Will always wrap < 0 to > PI
    #[inline]
    pub const fn new(mut radians: f32) -> Self {
        radians %= TAU;
        if radians < 0.0 {
            radians += TAU;
        }
        // A tiny negative input rounds up to exactly TAU after the add
        if radians >= TAU {
            radians -= TAU;
        }
        Angle(radians)
    }

    #[inline]
    const fn inner_wrap(&mut self) {
        *self = Angle::new(self.0);
    }

    #[inline]
    pub fn from_degrees(degrees: f32) -> Self {
        Angle::new(degrees.to_radians())
    }

    /// Decode a 16 bit binary angle, `degrees = raw * 360 / 65536`
    #[inline]
    pub fn from_bams(raw: u16) -> Self {
        Angle::new(raw as f32 / BAMS_PER_TURN * TAU)
    }

    /// Encode to the nearest 16 bit binary angle. A full turn wraps to 0.
    #[inline]
    pub fn to_bams(&self) -> u16 {
        ((self.0 / TAU * BAMS_PER_TURN).round() as u32 & 0xFFFF) as u16
    }

    /// Radians in `[0, 2π)`
    #[inline]
    pub const fn rad(&self) -> f32 {
        self.0
    }

    /// Degrees in `[0, 360)`
    #[inline]
    pub fn to_degrees(&self) -> f32 {
        self.0.to_degrees()
    }

    /// Radians in the canonical `(−π, π]` range
    #[inline]
    pub const fn normalized(&self) -> f32 {
        if self.0 > PI { self.0 - TAU } else { self.0 }
    }

    /// Shortest signed rotation, in radians, that takes `self` to `other`
    #[inline]
    pub const fn delta(&self, other: Angle) -> f32 {
        Angle::new(other.0 - self.0).normalized()
    }

    /// Interpolate along the shortest path. `t` of 0 is `self`, 1 is `other`.
    #[inline]
    pub fn lerp(&self, other: Angle, t: f32) -> Angle {
        Angle::new(self.0 + self.delta(other) * t)
    }

    #[inline]
    pub fn sin(&self) -> f32 {
        self.0.sin()
    }

    #[inline]
    pub fn cos(&self) -> f32 {
        self.0.cos()
    }

    #[inline]
    pub fn tan(&self) -> f32 {
        self.0.tan()
    }

    #[inline]
    pub fn sin_cos(&self) -> (f32, f32) {
        self.0.sin_cos()
    }

    #[inline(always)]
    pub fn unit(&self) -> Vec2 {
        let (y, x) = self.sin_cos();
        Vec2::new(x, y)
    }

    pub fn from_vector(input: Vec2) -> Self {
        Angle::new(input.y.atan2(input.x))
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, other: Angle) -> Angle {
        Angle::new(self.0 + other.0)
    }
}

impl Add<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, other: f32) -> Angle {
        Angle::new(self.0 + other)
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, other: Angle) {
        self.0 += other.0;
        self.inner_wrap();
    }
}

impl AddAssign<f32> for Angle {
    #[inline]
    fn add_assign(&mut self, other: f32) {
        self.0 += other;
        self.inner_wrap();
    }
}

impl Mul<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn mul(self, other: f32) -> Angle {
        Angle::new(self.0 * other)
    }
}

impl MulAssign<f32> for Angle {
    #[inline]
    fn mul_assign(&mut self, other: f32) {
        self.0 *= other;
        self.inner_wrap();
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, other: Angle) -> Angle {
        Angle::new(self.0 - other.0)
    }
}

impl Sub<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, other: f32) -> Angle {
        Angle::new(self.0 - other)
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, other: Angle) {
        self.0 -= other.0;
        self.inner_wrap();
    }
}

impl SubAssign<f32> for Angle {
    #[inline]
    fn sub_assign(&mut self, other: f32) {
        self.0 -= other;
        self.inner_wrap();
    }
}

impl Div<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn div(self, other: f32) -> Angle {
        Angle::new(self.0 / other)
    }
}

impl DivAssign<f32> for Angle {
    #[inline]
    fn div_assign(&mut self, other: f32) {
        self.0 /= other;
        self.inner_wrap();
    }
}

impl Neg for Angle {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Angle::new(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Angle, BAMS_PER_TURN};
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    const BAMS_UNIT_DEG: f32 = 360.0 / BAMS_PER_TURN;

    #[test]
    fn wraps_into_positive_turn() {
        assert!((Angle::new(-FRAC_PI_2).rad() - 3.0 * FRAC_PI_2).abs() < 1e-6);
        assert!((Angle::new(TAU + 1.0).rad() - 1.0).abs() < 1e-5);
        let tiny = Angle::new(-1e-9);
        assert!(tiny.rad() >= 0.0 && tiny.rad() < TAU);
    }

    #[test]
    fn canonical_range() {
        assert!((Angle::from_degrees(270.0).normalized() + FRAC_PI_2).abs() < 1e-5);
        assert!((Angle::new(PI).normalized() - PI).abs() < 1e-6);
        assert!((Angle::from_degrees(-180.0).normalized().abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn shortest_delta_crosses_zero() {
        let a = Angle::from_degrees(350.0);
        let b = Angle::from_degrees(10.0);
        assert!((a.delta(b).to_degrees() - 20.0).abs() < 1e-3);
        assert!((b.delta(a).to_degrees() + 20.0).abs() < 1e-3);
    }

    #[test]
    fn lerp_takes_short_path() {
        let a = Angle::from_degrees(350.0);
        let b = Angle::from_degrees(10.0);
        let mid = a.lerp(b, 0.5);
        assert!(mid.to_degrees() < 1e-3 || (mid.to_degrees() - 360.0).abs() < 1e-3);
        assert!((a.lerp(b, 0.0).to_degrees() - 350.0).abs() < 1e-3);
    }

    #[test]
    fn bams_known_values() {
        assert_eq!(Angle::from_bams(0x4000).to_degrees().round(), 90.0);
        assert_eq!(Angle::from_bams(0x8000).to_degrees().round(), 180.0);
        assert_eq!(Angle::from_degrees(270.0).to_bams(), 0xC000);
    }

    #[test]
    fn bams_round_trip_within_one_unit() {
        let mut deg = 0.0f32;
        while deg < 360.0 {
            let a = Angle::from_degrees(deg);
            let back = Angle::from_bams(a.to_bams());
            let err = a.delta(back).to_degrees().abs();
            assert!(err <= BAMS_UNIT_DEG, "{deg} came back as {}", back.to_degrees());
            deg += 0.37;
        }
    }

    #[test]
    fn operators_keep_range() {
        let mut a = Angle::from_degrees(300.0);
        a += Angle::from_degrees(90.0);
        assert!((a.to_degrees() - 30.0).abs() < 1e-3);
        a -= 1.0;
        assert!(a.rad() >= 0.0 && a.rad() < TAU);
        let n = -Angle::from_degrees(90.0);
        assert!((n.to_degrees() - 270.0).abs() < 1e-3);
    }
}
