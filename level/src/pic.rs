//! All picture data the renderer samples from:
//! - Wall textures
//! - Flat/span textures
//! - Sprites
//!
//! Pictures are already decoded to packed ARGB (`0xAARRGGBB`) and stored
//! column major since walls and sprites are drawn a column at a time.
//! Decoding palettes and patches is the loader's job.

use std::collections::HashMap;

use log::{debug, warn};
use math::wrap;

/// Flat used by sectors that should show the sky instead of a ceiling
pub const DEFAULT_SKY_FLAT: &str = "F_SKY1";
/// Wall texture drawn for sky ceilings
pub const DEFAULT_SKY_TEXTURE: &str = "SKY1";

#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline]
pub const fn alpha(c: u32) -> u8 {
    (c >> 24) as u8
}

/// Split a packed colour in to `[r, g, b, a]`
#[inline]
pub const fn rgba(c: u32) -> [u8; 4] {
    [(c >> 16) as u8, (c >> 8) as u8, c as u8, (c >> 24) as u8]
}

#[derive(Debug, Clone)]
pub struct Picture {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Sprites only: distance from the left edge to the object origin
    pub left_offset: i32,
    /// Column major, `data[x * height + y]`
    data: Vec<u32>,
}

pub type WallPic = Picture;
pub type FlatPic = Picture;
pub type SpritePic = Picture;

impl Picture {
    /// `data` must be column major. Short data is padded with transparent
    /// pixels, long data truncated.
    pub fn new(name: &str, width: usize, height: usize, mut data: Vec<u32>) -> Self {
        let len = width * height;
        if data.len() != len {
            warn!(
                "Picture {name} has {} pixels, expected {width}x{height}",
                data.len()
            );
            data.resize(len, 0);
        }
        Self {
            name: name.to_ascii_uppercase(),
            width,
            height,
            left_offset: 0,
            data,
        }
    }

    /// Build a picture by calling `func(x, y)` for every pixel
    pub fn from_fn(
        name: &str,
        width: usize,
        height: usize,
        mut func: impl FnMut(usize, usize) -> u32,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                data.push(func(x, y));
            }
        }
        Self::new(name, width, height, data)
    }

    /// Sprites stand on their base with `left_offset` columns left of the
    /// object origin
    pub fn with_left_offset(mut self, left_offset: i32) -> Self {
        self.left_offset = left_offset;
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Column `x`, wrapped in to the picture width
    #[inline]
    pub fn column(&self, x: i32) -> &[u32] {
        if self.is_empty() {
            return &[];
        }
        let x = wrap(x, self.width as i32) as usize;
        &self.data[x * self.height..(x + 1) * self.height]
    }

    /// Tiled lookup, both coordinates wrap. Empty pictures are transparent.
    #[inline]
    pub fn texel(&self, u: i32, v: i32) -> u32 {
        if self.is_empty() {
            return 0;
        }
        let x = wrap(u, self.width as i32) as usize;
        let y = wrap(v, self.height as i32) as usize;
        self.data[x * self.height + y]
    }

    /// Bounded lookup, `None` outside the picture
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[x * self.height + y])
    }
}

/// Picture store with name lookup. Lookups return `None` for unknown names
/// rather than failing.
#[derive(Debug, Clone)]
pub struct PicData {
    walls: Vec<WallPic>,
    wall_names: HashMap<String, usize>,
    flats: Vec<FlatPic>,
    flat_names: HashMap<String, usize>,
    sprites: Vec<SpritePic>,
    sprite_names: HashMap<String, usize>,
    sky_flat: String,
    sky_texture: String,
    /// The number flats use to signify a sky should be drawn
    sky_num: Option<usize>,
    /// The index number of the texture to use for skybox
    sky_pic: Option<usize>,
}

impl Default for PicData {
    fn default() -> Self {
        Self {
            walls: Vec::new(),
            wall_names: HashMap::new(),
            flats: Vec::new(),
            flat_names: HashMap::new(),
            sprites: Vec::new(),
            sprite_names: HashMap::new(),
            sky_flat: DEFAULT_SKY_FLAT.to_string(),
            sky_texture: DEFAULT_SKY_TEXTURE.to_string(),
            sky_num: None,
            sky_pic: None,
        }
    }
}

fn insert(pics: &mut Vec<Picture>, names: &mut HashMap<String, usize>, pic: Picture) -> usize {
    if let Some(&num) = names.get(&pic.name) {
        debug!("Replacing picture {}", pic.name);
        pics[num] = pic;
        return num;
    }
    let num = pics.len();
    names.insert(pic.name.clone(), num);
    pics.push(pic);
    num
}

impl PicData {
    pub fn add_wall(&mut self, pic: WallPic) -> usize {
        let num = insert(&mut self.walls, &mut self.wall_names, pic);
        if self.walls[num].name == self.sky_texture {
            self.sky_pic = Some(num);
        }
        num
    }

    pub fn add_flat(&mut self, pic: FlatPic) -> usize {
        if pic.width != 64 || pic.height != 64 {
            warn!("Flat {} was not 64x64 in size", pic.name);
        }
        let num = insert(&mut self.flats, &mut self.flat_names, pic);
        if self.flats[num].name == self.sky_flat {
            self.sky_num = Some(num);
        }
        num
    }

    pub fn add_sprite(&mut self, pic: SpritePic) -> usize {
        insert(&mut self.sprites, &mut self.sprite_names, pic)
    }

    /// Choose which flat marks sky ceilings and which wall texture is drawn
    /// for them. Either may be missing, in which case no sky is drawn.
    pub fn set_sky(&mut self, flat: &str, texture: &str) {
        self.sky_flat = flat.to_ascii_uppercase();
        self.sky_texture = texture.to_ascii_uppercase();
        self.sky_num = self.flat_num_for_name(flat);
        self.sky_pic = self.wallpic_num_for_name(texture);
    }

    /// Get the number of the flat used for the sky texture. Sectors using this
    /// number for the flat will be rendered with the skybox.
    pub fn sky_num(&self) -> Option<usize> {
        self.sky_num
    }

    /// Get the index used by `get_texture()` to return the sky texture
    pub fn sky_pic(&self) -> Option<usize> {
        self.sky_pic
    }

    pub fn sky_flat_name(&self) -> &str {
        &self.sky_flat
    }

    pub fn sky_texture_name(&self) -> &str {
        &self.sky_texture
    }

    pub fn wallpic_num_for_name(&self, name: &str) -> Option<usize> {
        self.wall_names.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn flat_num_for_name(&self, name: &str) -> Option<usize> {
        self.flat_names.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn sprite_num_for_name(&self, name: &str) -> Option<usize> {
        self.sprite_names.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn get_texture(&self, num: usize) -> Option<&WallPic> {
        self.walls.get(num)
    }

    pub fn get_flat(&self, num: usize) -> Option<&FlatPic> {
        self.flats.get(num)
    }

    pub fn get_sprite(&self, num: usize) -> Option<&SpritePic> {
        self.sprites.get(num)
    }

    pub fn num_textures(&self) -> usize {
        self.walls.len()
    }

    pub fn num_flats(&self) -> usize {
        self.flats.len()
    }

    pub fn num_sprites(&self) -> usize {
        self.sprites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{PicData, Picture, alpha, argb, rgba};

    fn checker(name: &str, size: usize) -> Picture {
        Picture::from_fn(name, size, size, |x, y| {
            if (x + y) % 2 == 0 {
                argb(255, 255, 255, 255)
            } else {
                argb(255, 0, 0, 0)
            }
        })
    }

    #[test]
    fn colour_packing() {
        let c = argb(0x80, 0x10, 0x20, 0x30);
        assert_eq!(c, 0x8010_2030);
        assert_eq!(alpha(c), 0x80);
        assert_eq!(rgba(c), [0x10, 0x20, 0x30, 0x80]);
    }

    #[test]
    fn texel_wraps_both_axes() {
        let pic = Picture::from_fn("GRAD", 4, 8, |x, y| (x * 100 + y) as u32);
        assert_eq!(pic.texel(1, 2), 102);
        assert_eq!(pic.texel(5, 10), 102);
        assert_eq!(pic.texel(-3, -6), 102);
        assert_eq!(pic.column(-1)[7], 307);
        assert_eq!(pic.pixel(4, 0), None);
    }

    #[test]
    fn short_data_is_padded() {
        let pic = Picture::new("BROKEN", 2, 2, vec![1, 2, 3]);
        assert_eq!(pic.pixel(1, 1), Some(0));
        let empty = Picture::new("NONE", 0, 0, Vec::new());
        assert_eq!(empty.texel(3, 3), 0);
        assert!(empty.column(0).is_empty());
    }

    #[test]
    fn lookups_and_sky() {
        let mut pics = PicData::default();
        assert_eq!(pics.sky_num(), None);
        let floor = pics.add_flat(checker("FLOOR4_8", 64));
        let sky = pics.add_flat(checker("F_SKY1", 64));
        let wall = pics.add_wall(checker("startan3", 64));
        let sky_tex = pics.add_wall(checker("SKY1", 16));

        assert_eq!(pics.flat_num_for_name("floor4_8"), Some(floor));
        assert_eq!(pics.wallpic_num_for_name("STARTAN3"), Some(wall));
        assert_eq!(pics.sprite_num_for_name("TROOA1"), None);
        assert_eq!(pics.sky_num(), Some(sky));
        assert_eq!(pics.sky_pic(), Some(sky_tex));

        pics.set_sky("FLOOR4_8", "NOPE");
        assert_eq!(pics.sky_num(), Some(floor));
        assert_eq!(pics.sky_pic(), None);
    }

    #[test]
    fn re_adding_replaces() {
        let mut pics = PicData::default();
        let a = pics.add_sprite(checker("TROOA1", 8));
        let b = pics.add_sprite(checker("TROOA1", 16));
        assert_eq!(a, b);
        assert_eq!(pics.num_sprites(), 1);
        assert_eq!(pics.get_sprite(a).map(|p| p.width), Some(16));
    }
}
