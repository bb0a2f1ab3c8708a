use glam::Vec2;

use crate::cross;

/// Cross products smaller than this are treated as parallel
pub const PARALLEL_EPSILON: f32 = 1e-10;

/// An infinite line through `origin` running along `delta`.
///
/// Also used as the partition line of BSP nodes and as a trace for
/// intercept tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line2 {
    pub origin: Vec2,
    pub delta: Vec2,
}

impl Line2 {
    #[inline]
    pub const fn new(origin: Vec2, delta: Vec2) -> Self {
        Self { origin, delta }
    }

    #[inline]
    pub fn from_points(p1: Vec2, p2: Vec2) -> Self {
        Self {
            origin: p1,
            delta: p2 - p1,
        }
    }

    /// A line built from two identical points has no direction
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.delta.length_squared() <= PARALLEL_EPSILON
    }

    /// Signed area test. Positive when `point` is to the left of the line
    /// walking from `origin` along `delta`, negative to the right, zero on it.
    ///
    /// Every partition and wall facing decision goes through this.
    #[inline]
    pub fn side_of_point(&self, point: Vec2) -> f32 {
        cross(self.delta, point - self.origin)
    }

    /// Doom style side index: 0 for the right/front side, 1 for left/back.
    /// Points exactly on the line count as front.
    #[inline]
    pub fn point_on_side(&self, point: Vec2) -> usize {
        if self.side_of_point(point) > 0.0 { 1 } else { 0 }
    }

    /// Perpendicular distance from the point to the line
    #[inline]
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        let len = self.delta.length();
        if len <= f32::EPSILON {
            return point.distance(self.origin);
        }
        self.side_of_point(point).abs() / len
    }

    /// Point where the two infinite lines cross, `None` if parallel
    pub fn intersect(&self, other: &Line2) -> Option<Vec2> {
        let denom = cross(self.delta, other.delta);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = cross(other.origin - self.origin, other.delta) / denom;
        Some(self.origin + self.delta * t)
    }

    /// Projection of the point on to the line
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let d = self.delta.length_squared();
        if d <= f32::EPSILON {
            return self.origin;
        }
        let t = (point - self.origin).dot(self.delta) / d;
        self.origin + self.delta * t
    }
}

/// A bounded segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineSeg2 {
    pub start: Vec2,
    pub end: Vec2,
}

impl LineSeg2 {
    #[inline]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn line(&self) -> Line2 {
        Line2::from_points(self.start, self.end)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    #[inline]
    pub fn side_of_point(&self, point: Vec2) -> f32 {
        self.line().side_of_point(point)
    }

    /// Distance from the point to the nearest point on the segment
    #[inline]
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        self.closest_point(point).distance(point)
    }

    /// Nearest point on the segment, clamped to the end points
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let delta = self.end - self.start;
        let d = delta.length_squared();
        if d <= f32::EPSILON {
            return self.start;
        }
        let t = ((point - self.start).dot(delta) / d).clamp(0.0, 1.0);
        self.start + delta * t
    }

    /// Crossing point of two segments, `None` if parallel or if the
    /// crossing lies outside either segment
    pub fn intersect(&self, other: &LineSeg2) -> Option<Vec2> {
        let d1 = self.end - self.start;
        let d2 = other.end - other.start;
        let denom = cross(d1, d2);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let diff = other.start - self.start;
        let t = cross(diff, d2) / denom;
        let u = cross(diff, d1) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            return Some(self.start + d1 * t);
        }
        None
    }
}

/// Returns the fractional intercept point along `v2`.
///
/// The lines can be pictured as `v1` being an infinite plane, and `v2` being
/// the line to check if intersected by the plane. Parallel lines return 0.
#[inline]
pub fn intercept_vector(v2: Line2, v1: Line2) -> f32 {
    let denominator = (v1.delta.y * v2.delta.x) - (v1.delta.x * v2.delta.y);
    if denominator.abs() < PARALLEL_EPSILON {
        return 0.0;
    }
    let numerator = ((v1.origin.x - v2.origin.x) * v1.delta.y)
        + ((v2.origin.y - v1.origin.y) * v1.delta.x);
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::{Line2, LineSeg2, intercept_vector};
    use glam::Vec2;

    #[test]
    fn left_is_positive() {
        let line = Line2::from_points(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!(line.side_of_point(Vec2::new(5.0, 3.0)) > 0.0);
        assert!(line.side_of_point(Vec2::new(5.0, -3.0)) < 0.0);
        assert_eq!(line.side_of_point(Vec2::new(20.0, 0.0)), 0.0);
        assert_eq!(line.point_on_side(Vec2::new(5.0, 3.0)), 1);
        assert_eq!(line.point_on_side(Vec2::new(5.0, -3.0)), 0);
    }

    #[test]
    fn line_side_problem() {
        let v1 = Vec2::new(832.0, -2944.0);
        let v2 = Vec2::new(968.0, -2880.0);
        let line = Line2::from_points(v1, v2);
        assert_eq!(line.point_on_side(Vec2::new(0.0, 0.0)), 1);
        assert_eq!(line.point_on_side(Vec2::new(976.0, -2912.0)), 0);
    }

    #[test]
    fn perpendicular_distance() {
        let line = Line2::from_points(Vec2::new(0.0, 1.0), Vec2::new(4.0, 1.0));
        assert!((line.distance_to_point(Vec2::new(-30.0, 6.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = Line2::from_points(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let b = Line2::from_points(Vec2::new(0.0, 1.0), Vec2::new(1.0, 2.0));
        assert!(a.intersect(&b).is_none());
        assert_eq!(intercept_vector(a, b), 0.0);
    }

    #[test]
    fn crossing_lines() {
        let a = Line2::from_points(Vec2::new(5.0, 1.0), Vec2::new(5.0, 10.0));
        let b = Line2::from_points(Vec2::new(1.0, 5.0), Vec2::new(10.0, 5.0));
        let p = a.intersect(&b).unwrap();
        assert!((p - Vec2::new(5.0, 5.0)).length() < 1e-5);

        let frac = intercept_vector(b, a);
        assert!((frac - 4.0 / 9.0).abs() < 1e-5);
    }

    #[test]
    fn segments_must_overlap() {
        let a = LineSeg2::new(Vec2::new(1.0, 1.0), Vec2::new(10.0, 10.0));
        let b = LineSeg2::new(Vec2::new(10.0, 1.0), Vec2::new(1.0, 10.0));
        assert!(a.intersect(&b).is_some());

        let c = LineSeg2::new(Vec2::new(4.0, 1.0), Vec2::new(4.0, 2.0));
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn closest_point_clamps() {
        let seg = LineSeg2::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_eq!(seg.closest_point(Vec2::new(-5.0, 5.0)), Vec2::ZERO);
        assert_eq!(seg.closest_point(Vec2::new(5.0, 5.0)), Vec2::new(5.0, 0.0));
        let line = seg.line();
        assert_eq!(line.closest_point(Vec2::new(-5.0, 5.0)), Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn degenerate_line_is_safe() {
        let p = Vec2::new(3.0, 3.0);
        let line = Line2::from_points(p, p);
        assert!(line.is_degenerate());
        assert_eq!(line.side_of_point(Vec2::new(9.0, 1.0)), 0.0);
        assert!(line.intersect(&Line2::from_points(Vec2::ZERO, Vec2::X)).is_none());
        assert_eq!(line.closest_point(Vec2::ZERO), p);
        assert!((line.distance_to_point(Vec2::new(3.0, 7.0)) - 4.0).abs() < 1e-5);
    }
}
