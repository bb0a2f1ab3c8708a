use glam::Vec2;

/// Axis aligned bounding box in map space. Y grows upwards so `top` is the
/// largest Y.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BBox {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl BBox {
    pub fn new(v1: Vec2, v2: Vec2) -> Self {
        let mut bbox = BBox::default();

        if v1.x < v2.x {
            bbox.left = v1.x;
            bbox.right = v2.x;
        } else {
            bbox.left = v2.x;
            bbox.right = v1.x;
        }

        if v1.y < v2.y {
            bbox.bottom = v1.y;
            bbox.top = v2.y;
        } else {
            bbox.bottom = v2.y;
            bbox.top = v1.y;
        }

        bbox
    }

    /// Smallest box holding every point. An empty iterator gives an empty box
    /// at the origin.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return BBox::default();
        };
        let mut bbox = BBox::new(first, first);
        for p in iter {
            bbox.add_point(p);
        }
        bbox
    }

    pub fn add_point(&mut self, p: Vec2) {
        self.left = self.left.min(p.x);
        self.right = self.right.max(p.x);
        self.bottom = self.bottom.min(p.y);
        self.top = self.top.max(p.y);
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// No area, e.g. built from a single point or a straight line
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Inclusive containment
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.bottom + self.top) * 0.5,
        )
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.right, self.bottom)
    }

    /// Corners in clockwise order starting top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right, self.top),
            Vec2::new(self.right, self.bottom),
            Vec2::new(self.left, self.bottom),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::BBox;
    use glam::Vec2;

    #[test]
    fn orders_corners() {
        let b = BBox::new(Vec2::new(10.0, -5.0), Vec2::new(-2.0, 7.0));
        assert_eq!(b.left, -2.0);
        assert_eq!(b.right, 10.0);
        assert_eq!(b.bottom, -5.0);
        assert_eq!(b.top, 7.0);
        assert_eq!(b.center(), Vec2::new(4.0, 1.0));
        assert!(b.contains(Vec2::new(0.0, 0.0)));
        assert!(!b.contains(Vec2::new(11.0, 0.0)));
    }

    #[test]
    fn identical_points_are_empty() {
        let p = Vec2::new(64.0, 64.0);
        let b = BBox::new(p, p);
        assert!(b.is_empty());
        assert!(BBox::from_points([]).is_empty());
        assert!(!BBox::from_points([Vec2::ZERO, Vec2::ONE, Vec2::new(-1.0, 3.0)]).is_empty());
    }
}
