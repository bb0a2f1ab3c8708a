use std::cmp;

use level::log::warn;
use level::pic::alpha;
use level::{LineDefFlags, MapData, PicData, SpritePic};
use render_trait::SpriteSource;

use super::bsp::SoftwareRenderer;
use super::defs::DrawSeg;
use crate::frame_buffer::FrameBuffer;
use crate::utilities::{SPRITE_NEAR, light_scale, shade, wall_light_level};

pub const MAX_VIS_SPRITES: usize = 1024;

/// A sprite projected to the screen, ready to draw
#[derive(Debug, Clone, Copy, Default)]
pub struct VisSprite {
    /// Visible column and row range, on screen
    x1: i32,
    x2: i32,
    y1: i32,
    y2: i32,
    /// Unclipped screen position of the picture's left and top edges
    x_left: f32,
    y_top: f32,
    /// Forward distance, the same for every pixel of the sprite
    depth: f32,
    scale: f32,
    /// Texels per screen pixel
    iscale: f32,
    /// The index in to the sprite pictures
    patch: usize,
    light: f32,
}

impl PartialEq for VisSprite {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}

impl Eq for VisSprite {}

impl PartialOrd for VisSprite {
    fn partial_cmp(&self, other: &VisSprite) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Smaller scale is further away and sorts first
impl Ord for VisSprite {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.scale.total_cmp(&other.scale)
    }
}

impl SoftwareRenderer {
    /// R_ProjectSprite. Returns false once the sprite list is full.
    fn project_sprite(&mut self, thing: &dyn SpriteSource, pic_data: &PicData) -> bool {
        let Some(name) = thing.sprite_name() else {
            return true;
        };
        let Some(patch) = pic_data.sprite_num_for_name(name) else {
            self.r_data.missing.warn("sprite", name);
            return true;
        };
        let Some(pic) = pic_data.get_sprite(patch) else {
            return true;
        };
        let render_height = thing.render_height();
        if pic.is_empty() || render_height <= 0.0 {
            return true;
        }

        let view = &self.view;
        let cam = view.to_camera(thing.position());
        // Is it behind the view?
        if cam.y <= SPRITE_NEAR {
            return true; // keep checking
        }

        let scale = view.dist / cam.y;
        // World units per texel, the picture is stretched to the render height
        let texel_size = render_height / pic.height as f32;
        let x_left = view.screen_x(cam) - pic.left_offset as f32 * texel_size * scale;
        let x_right = x_left + pic.width as f32 * texel_size * scale;
        let y_top = view.screen_y(thing.base_z() + render_height, scale);
        let y_bottom = view.screen_y(thing.base_z(), scale);

        let x1 = view.first_column(x_left);
        let x2 = view.last_column(x_right);
        let y1 = view.first_row(y_top);
        let y2 = view.last_row(y_bottom);
        // off the side, or above or below the screen
        if x1 > x2 || y1 > y2 {
            return true;
        }

        if self.vissprites.len() >= MAX_VIS_SPRITES {
            return false;
        }

        let light = if thing.full_bright() {
            1.0
        } else {
            light_scale(thing.light_level(), cam.y)
        };

        self.vissprites.push(VisSprite {
            x1,
            x2,
            y1,
            y2,
            x_left,
            y_top,
            depth: cam.y,
            scale,
            iscale: 1.0 / (texel_size * scale),
            patch,
            light,
        });
        true
    }

    /// R_DrawMasked. Sprites far to near, then masked middle textures in
    /// reverse draw order. Everything here is depth tested.
    pub(crate) fn draw_masked(
        &mut self,
        objects: &[&dyn SpriteSource],
        map: &MapData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        self.vissprites.clear();
        for thing in objects {
            if !self.project_sprite(*thing, pic_data) {
                warn!(
                    "Out of vissprites, up to {} objects not drawn",
                    objects.len().saturating_sub(MAX_VIS_SPRITES)
                );
                break;
            }
        }
        self.stats.vissprites = self.vissprites.len();

        self.vissprites.sort();
        for vis in &self.vissprites {
            if let Some(pic) = pic_data.get_sprite(vis.patch) {
                draw_vissprite(vis, pic, pixels);
            }
        }

        for ds in self.r_data.drawsegs.iter().rev() {
            if ds.maskedtexturecol.is_some() {
                self.render_masked_seg_range(ds, map, pic_data, pixels);
            }
        }
    }

    /// Draw the middle texture of a two sided line within the clip bounds
    /// saved when the seg was stored. Not tiled vertically.
    fn render_masked_seg_range(
        &self,
        ds: &DrawSeg,
        map: &MapData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        // No column of it was ever in front of the eye
        if ds.scale() <= 0.0 {
            return;
        }
        let seg = &map.segments()[ds.curline];
        let Some(backsector) = seg.backsector.map(|b| &map.sectors()[b]) else {
            return;
        };
        let sidedef = &map.sidedefs()[seg.sidedef];
        let Some(texture) = sidedef.midtexture.and_then(|t| pic_data.get_texture(t)) else {
            return;
        };
        let (Some(cols), Some(tops), Some(bottoms)) =
            (ds.maskedtexturecol, ds.sprtopclip, ds.sprbottomclip)
        else {
            return;
        };
        let frontsector = &map.sectors()[seg.frontsector];
        let linedef = &map.linedefs()[seg.linedef];
        let view = &self.view;
        let tex_height = texture.height as f32;

        // find positioning
        let mut dc_texturemid = if LineDefFlags::UnpegBottom.is_set(linedef.flags) {
            frontsector.floorheight.max(backsector.floorheight) + tex_height - view.viewz
        } else {
            frontsector.ceilingheight.min(backsector.ceilingheight) - view.viewz
        };
        dc_texturemid += sidedef.rowoffset;

        let wall_lights = wall_light_level(seg, frontsector.lightlevel);
        let openings = &self.r_data.visplane_render.openings;

        for x in ds.x1..=ds.x2 {
            let i = (x - ds.x1) as usize;
            let (Some(&column), Some(&ceilingclip), Some(&floorclip)) = (
                openings.get(cols + i),
                openings.get(tops + i),
                openings.get(bottoms + i),
            ) else {
                break;
            };
            let scale = ds.scale_at(x);
            if scale <= 0.0 {
                continue;
            }
            let depth = view.dist / scale;
            let light = light_scale(wall_lights, depth);
            let texture_column = texture.column(column);

            let sprtopscreen = view.half_height - dc_texturemid * scale;
            let y1 = view.first_row(sprtopscreen).max(ceilingclip + 1);
            let y2 = view
                .last_row(sprtopscreen + tex_height * scale)
                .min(floorclip - 1);

            for y in y1..=y2 {
                let v = (dc_texturemid - view.row_height(y) / scale).floor() as i32;
                let Some(&texel) = usize::try_from(v).ok().and_then(|v| texture_column.get(v))
                else {
                    continue;
                };
                if alpha(texel) == 0 {
                    continue;
                }
                pixels.write_if_nearer(x, y, depth, &shade(texel, light));
            }
        }
    }
}

/// R_DrawVisSprite. Transparent texels are skipped, the rest only land
/// where nothing nearer has been drawn.
fn draw_vissprite(vis: &VisSprite, patch: &SpritePic, pixels: &mut FrameBuffer) {
    for x in vis.x1..=vis.x2 {
        let u = ((x as f32 + 0.5 - vis.x_left) * vis.iscale).floor();
        if u < 0.0 || u >= patch.width as f32 {
            continue;
        }
        for y in vis.y1..=vis.y2 {
            let v = ((y as f32 + 0.5 - vis.y_top) * vis.iscale).floor();
            if v < 0.0 {
                continue;
            }
            let Some(texel) = patch.pixel(u as usize, v as usize) else {
                continue;
            };
            if alpha(texel) == 0 {
                continue;
            }
            pixels.write_if_nearer(x, y, vis.depth, &shade(texel, vis.light));
        }
    }
}
