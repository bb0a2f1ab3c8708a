use std::fmt::Debug;

/// Drawsegs reserved up front, the list grows past this when a view needs it
pub const MAXDRAWSEGS: usize = 1024 * 2;

/// Visplane columns that have not been marked
pub const UNMARKED: i32 = i32::MAX;

/// One stored wall range. Per column arrays live in the frame's openings
/// arena and are referenced by their start, column `x` is at
/// `start + (x - x1)`.
#[derive(Debug, Clone, Copy)]
pub struct DrawSeg {
    /// Index of the `Segment` in the map
    pub curline: usize,
    pub x1: i32,
    pub x2: i32,

    pub scale1: f32,
    pub scale2: f32,
    pub scalestep: f32,

    /// Ceiling clip per column after this seg was drawn
    pub sprtopclip: Option<usize>,
    /// Floor clip per column after this seg was drawn
    pub sprbottomclip: Option<usize>,
    /// Texture column of the masked middle texture per column
    pub maskedtexturecol: Option<usize>,
}

impl DrawSeg {
    pub fn new(curline: usize) -> Self {
        DrawSeg {
            curline,
            x1: 0,
            x2: 0,
            scale1: 0.0,
            scale2: 0.0,
            scalestep: 0.0,
            sprtopclip: None,
            sprbottomclip: None,
            maskedtexturecol: None,
        }
    }

    /// Average depth scale over the range
    #[inline]
    pub fn scale(&self) -> f32 {
        (self.scale1 + self.scale2) * 0.5
    }

    /// Scale at column `x`. Scale is linear in screen X for a flat wall so
    /// stepping from `scale1` is exact.
    #[inline]
    pub fn scale_at(&self, x: i32) -> f32 {
        self.scale1 + (x - self.x1) as f32 * self.scalestep
    }
}

/// The range of columns on the screen clipped against
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClipRange {
    /// Leftmost starting pixel/column
    pub first: i32,
    /// Rightmost ending pixel/column
    pub last: i32,
}

/// Now what is a visplane, anyway?
#[derive(Clone)]
pub struct Visplane {
    pub height: f32,
    /// Flat index, `None` if the sector's flat was not found
    pub picnum: Option<usize>,
    pub lightlevel: usize,
    pub minx: i32,
    pub maxx: i32,
    /// Here lies the rub for all
    ///  dynamic resize/change of resolution.
    pub top: Vec<i32>,
    /// See above.
    pub bottom: Vec<i32>,
}

impl Debug for Visplane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visplane")
            .field("height", &self.height)
            .field("picnum", &self.picnum)
            .field("lightlevel", &self.lightlevel)
            .field("minx", &self.minx)
            .field("maxx", &self.maxx)
            .finish_non_exhaustive()
    }
}

impl Visplane {
    pub fn new(screen_width: usize) -> Self {
        Visplane {
            height: 0.0,
            picnum: None,
            lightlevel: 0,
            minx: 0,
            maxx: -1,
            top: vec![UNMARKED; screen_width],
            bottom: vec![0; screen_width],
        }
    }

    pub fn clear(&mut self) {
        self.height = 0.0;
        self.picnum = None;
        self.lightlevel = 0;
        self.minx = 0;
        self.maxx = -1;
        self.top.fill(UNMARKED);
        self.bottom.fill(0);
    }

    /// Column `x` has rows marked on it
    #[inline]
    pub fn is_marked(&self, x: i32) -> bool {
        self.top
            .get(x as usize)
            .is_some_and(|t| *t != UNMARKED)
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawSeg, Visplane};

    #[test]
    fn drawseg_scale_steps() {
        let mut ds = DrawSeg::new(3);
        ds.x1 = 10;
        ds.x2 = 20;
        ds.scale1 = 1.0;
        ds.scale2 = 2.0;
        ds.scalestep = 0.1;
        assert!((ds.scale_at(20) - 2.0).abs() < 1e-5);
        assert!((ds.scale_at(15) - 1.5).abs() < 1e-5);
        assert!((ds.scale() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn visplane_clear() {
        let mut plane = Visplane::new(320);
        plane.top[5] = 10;
        assert!(plane.is_marked(5));
        plane.clear();
        assert!(!plane.is_marked(5));
        assert!(!plane.is_marked(-1));
        assert!(plane.minx > plane.maxx);
    }
}
