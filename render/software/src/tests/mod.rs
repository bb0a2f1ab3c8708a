mod box_room_tests;

use glam::Vec2;
use level::pic::argb;
use level::{PicData, Picture};
use math::Angle;
use render_trait::{SpriteSource, ViewState};
use std::f32::consts::FRAC_PI_2;

use crate::{FrameBuffer, RenderConfig, SoftwareRenderer};

/// A plain object for the sprite drawer
pub(super) struct TestSprite {
    pub xy: Vec2,
    pub z: f32,
    pub height: f32,
    pub name: &'static str,
    pub light: usize,
}

impl TestSprite {
    pub fn new(name: &'static str, xy: Vec2, height: f32) -> Self {
        Self {
            xy,
            z: 0.0,
            height,
            name,
            light: 255,
        }
    }
}

impl SpriteSource for TestSprite {
    fn position(&self) -> Vec2 {
        self.xy
    }

    fn base_z(&self) -> f32 {
        self.z
    }

    fn render_height(&self) -> f32 {
        self.height
    }

    fn sprite_name(&self) -> Option<&str> {
        Some(self.name)
    }

    fn light_level(&self) -> usize {
        self.light
    }
}

pub(super) fn view_from(xy: Vec2, viewz: f32, degrees: f32) -> ViewState {
    ViewState {
        xy,
        viewz,
        angle: Angle::from_degrees(degrees),
        fov: FRAC_PI_2,
    }
}

pub(super) fn renderer() -> SoftwareRenderer {
    SoftwareRenderer::new(&RenderConfig::default()).unwrap()
}

pub(super) fn frame() -> FrameBuffer {
    FrameBuffer::new(320, 200)
}

/// Pictures for the box room: one wall, one flat for floor and ceiling,
/// and an opaque block sprite. `GRATE` is a see through mid texture and
/// `HALF` a sprite with its right half transparent.
pub(super) fn box_pics() -> PicData {
    let mut pics = PicData::default();
    pics.add_wall(Picture::from_fn("WALL", 64, 128, |x, y| {
        argb(255, 100 + (x % 16) as u8, 90 + (y % 16) as u8, 80)
    }));
    pics.add_wall(Picture::from_fn("GRATE", 16, 128, |x, _| {
        if x < 8 { argb(255, 20, 20, 250) } else { 0 }
    }));
    pics.add_flat(Picture::from_fn("FLOOR", 64, 64, |x, y| {
        argb(255, 60 + (x % 8) as u8, 60 + (y % 8) as u8, 60)
    }));
    pics.add_flat(Picture::from_fn("CEIL", 64, 64, |_, _| argb(255, 30, 30, 90)));
    pics.add_sprite(
        Picture::from_fn("BLOCK", 16, 32, |_, _| argb(255, 250, 20, 20)).with_left_offset(8),
    );
    pics.add_sprite(
        Picture::from_fn("OTHER", 16, 32, |_, _| argb(255, 20, 250, 20)).with_left_offset(8),
    );
    pics.add_sprite(
        Picture::from_fn("HALF", 16, 32, |x, _| {
            if x < 8 { argb(255, 250, 20, 20) } else { 0 }
        })
        .with_left_offset(8),
    );
    pics
}
