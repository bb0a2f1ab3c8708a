use std::collections::HashSet;

use glam::Vec2;
use level::log::warn;
use level::Segment;
use math::{Angle, Transform2};
use render_trait::{BufferSize, ViewState};

/// Walls are clipped to this forward distance before projection
pub const NEAR_CLIP: f32 = 1.0;
/// Sprites at or closer than this are dropped
pub const SPRITE_NEAR: f32 = 0.5;
/// Rays closer to parallel than this with a wall are skipped
pub const PARALLEL_EPSILON: f32 = 1e-6;
/// Light lost per map unit of depth, as a fraction of the sector light
const LIGHT_FADE: f32 = 1.0 / 1280.0;
/// Distance fade never takes a surface below this fraction of its light
const LIGHT_FLOOR: f32 = 0.25;
/// Light step used by the fake contrast on axis aligned walls
const FAKE_CONTRAST: usize = 16;

/// Distance from the eye to the projection plane for a buffer `width` wide
/// covering `fov` radians horizontally
#[inline]
pub fn projection(fov: f32, screen_width_half: f32) -> f32 {
    screen_width_half / (fov / 2.0).tan()
}

/// Everything about the viewer that the drawers need, worked out once per
/// frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub xy: Vec2,
    pub viewz: f32,
    pub angle: Angle,
    /// World to camera space, built once per frame
    pub camera: Transform2,
    /// Screen distance, `(width / 2) / tan(fov / 2)`
    pub dist: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub width: i32,
    pub height: i32,
}

impl RenderView {
    pub fn new(view: &ViewState, fov: f32, size: &BufferSize) -> Self {
        Self {
            xy: view.xy,
            viewz: view.viewz,
            angle: view.angle,
            camera: Transform2::world_to_camera(view.xy, view.angle),
            dist: projection(fov, size.half_width_f32()),
            half_width: size.half_width_f32(),
            half_height: size.half_height_f32(),
            width: size.width(),
            height: size.height(),
        }
    }

    /// `x` is lateral (left positive), `y` is forward depth
    #[inline]
    pub fn to_camera(&self, point: Vec2) -> Vec2 {
        self.camera.transform_point(point)
    }

    /// Screen X of a camera space point, `camera.y` must be positive
    #[inline]
    pub fn screen_x(&self, camera: Vec2) -> f32 {
        self.half_width - camera.x * self.dist / camera.y
    }

    /// Screen Y of a world height seen at `scale`
    #[inline]
    pub fn screen_y(&self, world_z: f32, scale: f32) -> f32 {
        self.half_height - (world_z - self.viewz) * scale
    }

    /// First column whose centre is at or right of `sx`, clamped on screen
    #[inline]
    pub fn first_column(&self, sx: f32) -> i32 {
        ((sx - 0.5).ceil() as i32).max(0)
    }

    /// Last column whose centre is left of `sx`, clamped on screen
    #[inline]
    pub fn last_column(&self, sx: f32) -> i32 {
        ((sx - 0.5).ceil() as i32).saturating_sub(1).min(self.width - 1)
    }

    /// First row whose centre is at or below `sy`, clamped on screen
    #[inline]
    pub fn first_row(&self, sy: f32) -> i32 {
        ((sy - 0.5).ceil() as i32).max(0)
    }

    /// Last row whose centre is above `sy`, clamped on screen
    #[inline]
    pub fn last_row(&self, sy: f32) -> i32 {
        ((sy - 0.5).ceil() as i32).saturating_sub(1).min(self.height - 1)
    }

    /// Camera space direction through the centre of column `x`, scaled so
    /// the forward component is 1
    #[inline]
    pub fn column_ray(&self, x: i32) -> Vec2 {
        Vec2::new((self.half_width - (x as f32 + 0.5)) / self.dist, 1.0)
    }

    /// Angle of column `x` off the view direction, positive to the left
    #[inline]
    pub fn column_angle(&self, x: i32) -> f32 {
        self.column_ray(x).x.atan()
    }

    /// Camera space height of the centre of row `y`, positive above the
    /// horizon
    #[inline]
    pub fn row_height(&self, y: i32) -> f32 {
        self.half_height - (y as f32 + 0.5)
    }
}

/// Clip a camera space line to `camera.y >= near`. `None` if it is entirely
/// behind.
pub fn clip_to_near(c1: Vec2, c2: Vec2, near: f32) -> Option<(Vec2, Vec2)> {
    if c1.y < near && c2.y < near {
        return None;
    }
    if c1.y >= near && c2.y >= near {
        return Some((c1, c2));
    }
    let t = (near - c1.y) / (c2.y - c1.y);
    let mut cut = c1 + (c2 - c1) * t;
    cut.y = near;
    if c1.y < near {
        Some((cut, c2))
    } else {
        Some((c1, cut))
    }
}

/// Where a column ray meets the line through `c1` along `delta`. Returns
/// forward depth and the fraction along `delta`.
#[inline]
pub fn ray_line_intersect(ray: Vec2, c1: Vec2, delta: Vec2) -> Option<(f32, f32)> {
    let den = math::cross(ray, delta);
    if den.abs() < PARALLEL_EPSILON {
        return None;
    }
    let depth = math::cross(c1, delta) / den;
    let frac = math::cross(c1, ray) / den;
    Some((depth, frac))
}

/// Sector light (0-255) dimmed by depth, as a scalar in `[0, 1]`
#[inline]
pub fn light_scale(light_level: usize, depth: f32) -> f32 {
    let base = light_level.min(255) as f32 / 255.0;
    let fade = 1.0 - depth.max(0.0) * LIGHT_FADE;
    base * fade.clamp(LIGHT_FLOOR, 1.0)
}

/// Walls running along an axis get a little darker or lighter so corners
/// read better
pub fn wall_light_level(seg: &Segment, light_level: usize) -> usize {
    if seg.v1.y == seg.v2.y {
        light_level.saturating_sub(FAKE_CONTRAST)
    } else if seg.v1.x == seg.v2.x {
        light_level + FAKE_CONTRAST
    } else {
        light_level
    }
}

/// Apply a light scalar to a packed ARGB colour, output is opaque RGBA
#[inline]
pub fn shade(colour: u32, light: f32) -> [u8; 4] {
    let [r, g, b, _] = level::pic::rgba(colour);
    let l = |c: u8| (c as f32 * light).clamp(0.0, 255.0) as u8;
    [l(r), l(g), l(b), 255]
}

/// Logs a missing picture the first time it is asked for
#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: HashSet<String>,
}

impl WarnOnce {
    pub fn warn(&mut self, kind: &str, name: &str) {
        if self.seen.insert(format!("{kind}:{name}")) {
            warn!("Missing {kind} {name}, not drawing it");
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
