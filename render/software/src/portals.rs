//! Vertical clipping for windows/portals, used in Segs render part
//! which will have some of it's function split out to here.

pub struct PortalClip {
    /// Clip values are the solid pixel bounding the range.
    ///  floorclip starts out SCREENHEIGHT
    ///  ceilingclip starts out -1
    pub floorclip: Vec<i32>,
    pub ceilingclip: Vec<i32>,
    screen_width: usize,
    screen_height: usize,
}

impl PortalClip {
    pub fn new(screen_width: usize, screen_height: usize) -> Self {
        PortalClip {
            floorclip: vec![screen_height as i32; screen_width],
            ceilingclip: vec![-1; screen_width],
            screen_width,
            screen_height,
        }
    }

    pub(super) fn clear(&mut self) {
        self.floorclip.fill(self.screen_height as i32);
        self.ceilingclip.fill(-1);
    }

    pub fn screen_width(&self) -> usize {
        self.screen_width
    }

    pub fn screen_height(&self) -> usize {
        self.screen_height
    }
}
