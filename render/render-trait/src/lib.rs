use glam::Vec2;
use level::{MapData, PicData};
use math::Angle;

/// channels should match pixel format
pub const SOFT_PIXEL_CHANNELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferSize {
    width_usize: usize,
    height_usize: usize,
    width: i32,
    height: i32,
    width_f32: f32,
    height_f32: f32,
}

impl BufferSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width_usize: width,
            height_usize: height,
            width: width as i32,
            height: height as i32,
            width_f32: width as f32,
            height_f32: height as f32,
        }
    }

    // todo, need const traits stabilised
    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn half_width(&self) -> i32 {
        self.width / 2
    }

    pub const fn half_height(&self) -> i32 {
        self.height / 2
    }

    pub const fn width_usize(&self) -> usize {
        self.width_usize
    }

    pub const fn height_usize(&self) -> usize {
        self.height_usize
    }

    pub const fn width_f32(&self) -> f32 {
        self.width_f32
    }

    pub const fn height_f32(&self) -> f32 {
        self.height_f32
    }

    pub const fn half_width_f32(&self) -> f32 {
        self.width_f32 / 2.0
    }

    pub const fn half_height_f32(&self) -> f32 {
        self.height_f32 / 2.0
    }

    pub const fn area(&self) -> usize {
        self.width_usize * self.height_usize
    }
}

pub trait PixelBuffer {
    fn size(&self) -> &BufferSize;
    fn clear(&mut self);
    fn clear_with_colour(&mut self, colour: &[u8; SOFT_PIXEL_CHANNELS]);
    /// Out of bounds writes are ignored
    fn set_pixel(&mut self, x: usize, y: usize, colour: &[u8; SOFT_PIXEL_CHANNELS]);
    fn read_pixel(&self, x: usize, y: usize) -> [u8; SOFT_PIXEL_CHANNELS];
    fn buf(&self) -> &[u8];
    fn buf_mut(&mut self) -> &mut [u8];
    /// The pitch that should be added/subtracted to go up or down the Y while
    /// keeping X position
    fn pitch(&self) -> usize;
    /// Amount of colour channels, e.g: [R, G, B] == 3
    fn channels(&self) -> usize;
    /// Get an index point for this coord to copy a colour array too
    fn get_buf_index(&self, x: usize, y: usize) -> usize;
}

/// Where the view is rendered from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub xy: Vec2,
    /// Absolute eye height in map units
    pub viewz: f32,
    pub angle: Angle,
    /// Horizontal field of view in radians
    pub fov: f32,
}

/// What the sprite drawer needs from a game object. Picking the rotation
/// and animation frame is up to the object, only the final picture name
/// comes through here.
pub trait SpriteSource {
    fn position(&self) -> Vec2;
    /// World height of the bottom of the sprite
    fn base_z(&self) -> f32;
    /// Height the sprite is drawn at, in map units
    fn render_height(&self) -> f32;
    /// `None` when the object has nothing to draw this frame
    fn sprite_name(&self) -> Option<&str>;
    fn full_bright(&self) -> bool {
        false
    }
    /// Light level of the sector the object is in, 0-255
    fn light_level(&self) -> usize;
}

pub trait PlayViewRenderer {
    type Buffer: PixelBuffer;

    /// Doom function name `R_RenderPlayerView`
    fn render_player_view(
        &mut self,
        view: &ViewState,
        objects: &[&dyn SpriteSource],
        map: &MapData,
        pic_data: &PicData,
        buffer: &mut Self::Buffer,
    );
}

#[cfg(test)]
mod tests {
    use super::BufferSize;

    #[test]
    fn sizes() {
        let size = BufferSize::new(320, 201);
        assert_eq!(size.half_width(), 160);
        assert_eq!(size.half_height(), 100);
        assert_eq!(size.half_height_f32(), 100.5);
        assert_eq!(size.area(), 320 * 201);
    }
}
