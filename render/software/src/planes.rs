use glam::Vec2;
use level::{FlatPic, PicData, WallPic};
use render_trait::PixelBuffer;

use super::defs::{UNMARKED, Visplane};
use crate::frame_buffer::FrameBuffer;
use crate::utilities::{RenderView, WarnOnce, light_scale, shade};

/// Sky texture columns per degree of view angle
pub const SKY_ANGLE_SCALE: f32 = 2.2;
/// Sky textures are laid out for a 200 row screen
const SKY_ROWS: f32 = 200.0;

pub struct VisPlaneRender {
    // Here comes the obnoxious "visplane".
    pub visplanes: Vec<Visplane>,
    pub lastvisplane: usize,
    /// Index of current visplane in `self.visplanes` for floor
    pub floorplane: Option<usize>,
    /// Index of current visplane in `self.visplanes` for ceiling
    pub ceilingplane: Option<usize>,

    /// Per column arrays for masked segs: texture columns and the clip
    /// bounds sprites and masked walls are drawn within
    pub openings: Vec<i32>,

    screen_width: usize,
}

impl VisPlaneRender {
    pub fn new(screen_width: usize) -> Self {
        VisPlaneRender {
            visplanes: Vec::with_capacity(128),
            lastvisplane: 0,
            floorplane: None,
            ceilingplane: None,
            openings: Vec::with_capacity(screen_width * 64),
            screen_width,
        }
    }

    /// R_ClearPlanes
    /// At begining of frame.
    pub fn clear_planes(&mut self) {
        for p in self.visplanes[..self.lastvisplane].iter_mut() {
            p.clear();
        }
        self.lastvisplane = 0;
        self.floorplane = None;
        self.ceilingplane = None;
        self.openings.clear();
    }

    /// Planes are pooled across frames, the pool only grows
    fn next_plane(&mut self) -> usize {
        if self.lastvisplane == self.visplanes.len() {
            self.visplanes.push(Visplane::new(self.screen_width));
        }
        self.lastvisplane += 1;
        self.lastvisplane - 1
    }

    /// Reserve `count` columns in `openings`, returning the start
    pub fn reserve_openings(&mut self, count: usize) -> usize {
        let start = self.openings.len();
        self.openings.resize(start + count, 0);
        start
    }

    /// Copy a run of clip values in to `openings`, returning the start
    pub fn push_openings(&mut self, values: &[i32]) -> usize {
        let start = self.openings.len();
        self.openings.extend_from_slice(values);
        start
    }

    /// Find a plane matching height, picnum, light level. Otherwise return a new plane.
    #[allow(clippy::float_cmp)]
    pub fn find_plane(
        &mut self,
        mut height: f32,
        picnum: Option<usize>,
        skynum: Option<usize>,
        mut light_level: usize,
    ) -> usize {
        // All sky is one plane whatever the sector
        if picnum.is_some() && picnum == skynum {
            height = 0.0;
            light_level = 0;
        }

        if let Some(index) = self.visplanes[..self.lastvisplane].iter().position(|plane| {
            plane.height == height && plane.picnum == picnum && plane.lightlevel == light_level
        }) {
            return index;
        }

        // Otherwise edit new
        let index = self.next_plane();
        let check = &mut self.visplanes[index];
        check.height = height;
        check.picnum = picnum;
        check.lightlevel = light_level;
        check.minx = self.screen_width as i32;
        check.maxx = -1;
        check.top.fill(UNMARKED);
        index
    }

    /// Check if this plane can take the columns `start..=stop`, otherwise
    /// use a new plane with the same surface.
    pub fn check_plane(&mut self, start: i32, stop: i32, plane_idx: usize) -> usize {
        let plane = &mut self.visplanes[plane_idx];

        let (intrl, unionl) = if start < plane.minx {
            (plane.minx, start)
        } else {
            (start, plane.minx)
        };

        let (intrh, unionh) = if stop > plane.maxx {
            (plane.maxx, stop)
        } else {
            (stop, plane.maxx)
        };

        if !(intrl..=intrh).any(|x| plane.is_marked(x)) {
            plane.minx = unionl;
            plane.maxx = unionh;
            // Use the same plane
            return plane_idx;
        }

        // Otherwise make a new plane
        let height = plane.height;
        let picnum = plane.picnum;
        let lightlevel = plane.lightlevel;

        let index = self.next_plane();
        let plane = &mut self.visplanes[index];
        plane.height = height;
        plane.picnum = picnum;
        plane.lightlevel = lightlevel;
        plane.minx = start;
        plane.maxx = stop;
        plane.top.fill(UNMARKED);
        index
    }

    /// R_DrawPlanes
    /// At the end of each frame. Returns the number of planes drawn.
    pub fn draw_planes(
        &self,
        view: &RenderView,
        pic_data: &PicData,
        missing: &mut WarnOnce,
        pixels: &mut FrameBuffer,
    ) -> usize {
        let mut drawn = 0;
        for plane in &self.visplanes[..self.lastvisplane] {
            if plane.minx > plane.maxx {
                continue;
            }
            // Unknown flats were reported when the map was linked
            let Some(picnum) = plane.picnum else {
                continue;
            };

            if Some(picnum) == pic_data.sky_num() {
                let Some(sky) = pic_data.sky_pic().and_then(|n| pic_data.get_texture(n)) else {
                    missing.warn("sky texture", pic_data.sky_texture_name());
                    continue;
                };
                for x in plane.minx..=plane.maxx {
                    if plane.is_marked(x) {
                        let (top, bottom) = (plane.top[x as usize], plane.bottom[x as usize]);
                        draw_sky_column(view, x, top, bottom, sky, pixels);
                    }
                }
                drawn += 1;
                continue;
            }

            let Some(flat) = pic_data.get_flat(picnum) else {
                missing.warn("flat", &picnum.to_string());
                continue;
            };
            for x in plane.minx..=plane.maxx {
                if plane.is_marked(x) {
                    let (top, bottom) = (plane.top[x as usize], plane.bottom[x as usize]);
                    draw_flat_column(
                        view,
                        x,
                        top,
                        bottom,
                        plane.height,
                        flat,
                        plane.lightlevel,
                        pixels,
                    );
                }
            }
            drawn += 1;
        }
        drawn
    }
}

/// Flats tile every 64 units on both axes, with map Y running down the
/// picture
#[inline]
pub fn flat_texel(flat: &FlatPic, world: Vec2) -> u32 {
    flat.texel(world.x.floor() as i32, (-world.y).floor() as i32)
}

/// Draw rows `y1..=y2` of column `x` as a horizontal plane at
/// `plane_height`. Each row is cast back to the world point it sees.
#[allow(clippy::too_many_arguments)]
pub fn draw_flat_column(
    view: &RenderView,
    x: i32,
    y1: i32,
    y2: i32,
    plane_height: f32,
    flat: &FlatPic,
    light_level: usize,
    pixels: &mut FrameBuffer,
) {
    if y1 > y2 || x < 0 || x >= view.width {
        return;
    }
    let col_angle = view.column_angle(x);
    let distscale = col_angle.cos();
    let dir = (view.angle + col_angle).unit();
    let planeheight = plane_height - view.viewz;

    for y in y1.max(0)..=y2.min(view.height - 1) {
        let dy = view.row_height(y);
        // The horizon row sees the plane at infinity
        if dy.abs() < 0.5 {
            continue;
        }
        let depth = view.dist * planeheight / dy;
        if depth <= 0.0 {
            continue;
        }
        let world = view.xy + dir * (depth / distscale);
        let colour = shade(flat_texel(flat, world), light_scale(light_level, depth));
        pixels.write(x, y, depth, &colour);
    }
}

/// Sky is fixed to the view, scrolling with the view angle and never lit.
/// Only colour is written so the sky stays behind everything.
pub fn draw_sky_column(
    view: &RenderView,
    x: i32,
    y1: i32,
    y2: i32,
    sky: &WallPic,
    pixels: &mut FrameBuffer,
) {
    if y1 > y2 || x < 0 || x >= view.width {
        return;
    }
    let angle = view.angle.to_degrees() + view.column_angle(x).to_degrees();
    let u = (SKY_ANGLE_SCALE * angle).floor() as i32;
    let v_step = SKY_ROWS / view.height as f32;

    for y in y1.max(0)..=y2.min(view.height - 1) {
        let v = ((y as f32 + 0.5) * v_step).floor() as i32;
        let colour = shade(sky.texel(u, v), 1.0);
        pixels.set_pixel(x as usize, y as usize, &colour);
    }
}
