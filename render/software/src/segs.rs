use glam::Vec2;
use level::log::trace;
use level::{LineDefFlags, MapData, PicData, WallPic};
use math::wrap;

use super::RenderData;
use super::defs::DrawSeg;
use crate::frame_buffer::FrameBuffer;
use crate::utilities::{
    NEAR_CLIP, RenderView, light_scale, ray_line_intersect, shade, wall_light_level,
};

/// Where a column ray meets the wall being drawn
#[derive(Debug, Clone, Copy)]
struct WallColumn {
    depth: f32,
    scale: f32,
    /// Horizontal texture coordinate in texels
    texture_u: f32,
}

/// All of the state in this struct is unique to it as it is used once per seg
/// to be rendered.
#[derive(Default)]
pub(crate) struct SegRender {
    /// One sided line, closes every column it covers
    solid: bool,
    /// False if the back side is the same plane.
    markfloor: bool,
    markceiling: bool,
    /// Index in to `openings` of the first masked texture column
    maskedtexturecol: Option<usize>,
    /// Two sided line with a wall above the opening, textured or not
    has_top: bool,
    has_bottom: bool,
    toptexture: Option<usize>,
    bottomtexture: Option<usize>,
    midtexture: Option<usize>,
    /// Unclipped seg start and direction in camera space
    cam_v1: Vec2,
    cam_delta: Vec2,
    seg_length: f32,
    // regular wall
    rw_startx: i32,
    rw_x: i32,
    rw_stopx: i32,
    /// Texture column at `v1`
    rw_offset: f32,
    rw_midtexturemid: f32,
    rw_toptexturemid: f32,
    rw_bottomtexturemid: f32,

    worldtop: f32,
    worldbottom: f32,
    worldhigh: f32,
    worldlow: f32,

    /// Light level for the wall
    wall_lights: usize,
}

/// Full height of a texture, `None` if it is missing
fn texture_height(pic_data: &PicData, texture: Option<usize>) -> Option<f32> {
    texture
        .and_then(|t| pic_data.get_texture(t))
        .map(|t| t.height as f32)
}

impl SegRender {
    pub fn new() -> Self {
        Self::default()
    }

    fn wall_column(&self, view: &RenderView, x: i32) -> Option<WallColumn> {
        let (depth, frac) = ray_line_intersect(view.column_ray(x), self.cam_v1, self.cam_delta)?;
        let depth = depth.max(NEAR_CLIP);
        Some(WallColumn {
            depth,
            scale: view.dist / depth,
            texture_u: self.rw_offset + frac * self.seg_length,
        })
    }

    /// R_StoreWallRange - r_segs
    #[allow(clippy::too_many_arguments)]
    pub fn store_wall_range(
        &mut self,
        start: i32,
        stop: i32,
        seg_num: usize,
        map: &MapData,
        view: &RenderView,
        rdata: &mut RenderData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        if start < 0 || stop >= view.width || start > stop {
            trace!("Bad R_RenderWallRange: {start} to {stop}");
            return;
        }

        let seg = &map.segments()[seg_num];
        let sidedef = &map.sidedefs()[seg.sidedef];
        let linedef = &map.linedefs()[seg.linedef];
        let frontsector = &map.sectors()[seg.frontsector];
        let viewz = view.viewz;
        let skynum = pic_data.sky_num();
        let is_sky = |pic: Option<usize>| pic.is_some() && pic == skynum;

        self.cam_v1 = view.to_camera(seg.v1);
        self.cam_delta = view.to_camera(seg.v2) - self.cam_v1;
        self.seg_length = seg.length();
        self.rw_offset = sidedef.textureoffset + seg.offset;

        let mut ds_p = DrawSeg::new(seg_num);
        ds_p.x1 = start;
        ds_p.x2 = stop;
        ds_p.scale1 = self.wall_column(view, start).map_or(0.0, |c| c.scale);
        if stop > start {
            ds_p.scale2 = self.wall_column(view, stop).map_or(ds_p.scale1, |c| c.scale);
            ds_p.scalestep = (ds_p.scale2 - ds_p.scale1) / (stop - start) as f32;
        } else {
            ds_p.scale2 = ds_p.scale1;
        }
        self.rw_startx = start;
        self.rw_x = start;
        self.rw_stopx = stop + 1;

        // calculate texture boundaries
        //  and decide if floor / ceiling marks are needed
        self.worldtop = frontsector.ceilingheight - viewz;
        self.worldbottom = frontsector.floorheight - viewz;
        self.midtexture = None;
        self.toptexture = None;
        self.bottomtexture = None;
        self.has_top = false;
        self.has_bottom = false;
        self.maskedtexturecol = None;

        match seg.backsector.map(|b| &map.sectors()[b]) {
            None => {
                // single sided line
                self.solid = true;
                self.midtexture = sidedef.midtexture;
                self.markfloor = true;
                self.markceiling = true;
                self.rw_midtexturemid = if LineDefFlags::UnpegBottom.is_set(linedef.flags) {
                    // bottom of texture at bottom
                    texture_height(pic_data, sidedef.midtexture)
                        .map_or(self.worldtop, |h| frontsector.floorheight + h - viewz)
                } else {
                    // top of texture at top
                    self.worldtop
                };
                self.rw_midtexturemid += sidedef.rowoffset;
            }
            Some(backsector) => {
                // two sided line
                self.solid = false;
                self.worldhigh = backsector.ceilingheight - viewz;
                self.worldlow = backsector.floorheight - viewz;

                // hack to allow height changes in outdoor areas
                if is_sky(frontsector.ceilingpic) && is_sky(backsector.ceilingpic) {
                    self.worldtop = self.worldhigh;
                }

                #[allow(clippy::float_cmp)]
                {
                    self.markfloor = self.worldlow != self.worldbottom
                        || backsector.floorpic != frontsector.floorpic
                        || backsector.lightlevel != frontsector.lightlevel;
                    self.markceiling = self.worldhigh != self.worldtop
                        || backsector.ceilingpic != frontsector.ceilingpic
                        || backsector.lightlevel != frontsector.lightlevel;
                }

                if backsector.ceilingheight <= frontsector.floorheight
                    || backsector.floorheight >= frontsector.ceilingheight
                {
                    // closed door
                    self.markceiling = true;
                    self.markfloor = true;
                }

                if self.worldhigh < self.worldtop {
                    self.has_top = true;
                    self.toptexture = sidedef.toptexture;
                    self.rw_toptexturemid = if LineDefFlags::UnpegTop.is_set(linedef.flags) {
                        // top of texture at top
                        self.worldtop
                    } else {
                        // bottom of texture
                        texture_height(pic_data, sidedef.toptexture)
                            .map_or(self.worldtop, |h| backsector.ceilingheight + h - viewz)
                    };
                }

                if self.worldlow > self.worldbottom {
                    self.has_bottom = true;
                    self.bottomtexture = sidedef.bottomtexture;
                    self.rw_bottomtexturemid = if LineDefFlags::UnpegBottom.is_set(linedef.flags)
                    {
                        // bottom of texture at bottom
                        self.worldtop
                    } else {
                        // top of texture at top
                        self.worldlow
                    };
                }

                self.rw_toptexturemid += sidedef.rowoffset;
                self.rw_bottomtexturemid += sidedef.rowoffset;

                // allocate space for masked texture tables
                if sidedef.midtexture.is_some() {
                    let count = (stop - start + 1) as usize;
                    self.maskedtexturecol = Some(rdata.visplane_render.reserve_openings(count));
                    ds_p.maskedtexturecol = self.maskedtexturecol;
                }
            }
        }

        self.wall_lights = wall_light_level(seg, frontsector.lightlevel);

        // if a floor / ceiling plane is on the wrong side
        //  of the view plane, it is definitely invisible
        //  and doesn't need to be marked.
        if frontsector.floorheight >= viewz {
            self.markfloor = false;
        }
        if frontsector.ceilingheight <= viewz && !is_sky(frontsector.ceilingpic) {
            self.markceiling = false;
        }

        // render it
        if self.markceiling {
            if let Some(plane) = rdata.visplane_render.ceilingplane {
                rdata.visplane_render.ceilingplane =
                    Some(rdata.visplane_render.check_plane(start, stop, plane));
            } else {
                self.markceiling = false;
            }
        }
        if self.markfloor {
            if let Some(plane) = rdata.visplane_render.floorplane {
                rdata.visplane_render.floorplane =
                    Some(rdata.visplane_render.check_plane(start, stop, plane));
            } else {
                self.markfloor = false;
            }
        }

        self.render_seg_loop(view, rdata, pic_data, pixels);

        // save sprite clipping info
        if self.maskedtexturecol.is_some() {
            let columns = start as usize..=stop as usize;
            ds_p.sprtopclip = Some(
                rdata
                    .visplane_render
                    .push_openings(&rdata.portal_clip.ceilingclip[columns.clone()]),
            );
            ds_p.sprbottomclip = Some(
                rdata
                    .visplane_render
                    .push_openings(&rdata.portal_clip.floorclip[columns]),
            );
        }

        rdata.drawsegs.push(ds_p);
    }

    /// Doom function name `R_RenderSegLoop`
    fn render_seg_loop(
        &mut self,
        view: &RenderView,
        rdata: &mut RenderData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        let half_height = view.half_height;

        while self.rw_x < self.rw_stopx {
            let x = self.rw_x;
            let clip_index = x as usize;
            self.rw_x += 1;

            let Some(column) = self.wall_column(view, x) else {
                continue;
            };
            let scale = column.scale;
            let texture_column = column.texture_u.floor() as i32;

            let ceilingclip = rdata.portal_clip.ceilingclip[clip_index];
            let floorclip = rdata.portal_clip.floorclip[clip_index];

            let topfrac = half_height - self.worldtop * scale;
            let bottomfrac = half_height - self.worldbottom * scale;

            // no space above wall?
            let yl = view.first_row(topfrac).max(ceilingclip + 1);

            if self.markceiling {
                let top = ceilingclip + 1;
                let bottom = (yl - 1).min(floorclip - 1);
                if top <= bottom {
                    if let Some(ceil) = rdata.visplane_render.ceilingplane {
                        let plane = &mut rdata.visplane_render.visplanes[ceil];
                        plane.top[clip_index] = top;
                        plane.bottom[clip_index] = bottom;
                    }
                }
            }

            let yh = view.last_row(bottomfrac).min(floorclip - 1);

            if self.markfloor {
                let top = (yh + 1).max(ceilingclip + 1);
                let bottom = floorclip - 1;
                if top <= bottom {
                    if let Some(floor) = rdata.visplane_render.floorplane {
                        let plane = &mut rdata.visplane_render.visplanes[floor];
                        plane.top[clip_index] = top;
                        plane.bottom[clip_index] = bottom;
                    }
                }
            }

            let light = light_scale(self.wall_lights, column.depth);
            let mut dc = DrawColumn {
                texture: None,
                texture_column,
                light,
                fracstep: 1.0 / scale,
                dc_x: x,
                dc_texturemid: 0.0,
                depth: column.depth,
                yl,
                yh,
            };

            if self.solid {
                // single sided line
                if let Some(texture) = self.texture(self.midtexture, rdata, pic_data) {
                    dc.texture = Some(texture);
                    dc.dc_texturemid = self.rw_midtexturemid;
                    dc.draw_column(view, pixels);
                }
                rdata.portal_clip.ceilingclip[clip_index] = view.height;
                rdata.portal_clip.floorclip[clip_index] = -1;
                continue;
            }

            // two sided line
            if self.has_top {
                // top wall
                let pixhigh = half_height - self.worldhigh * scale;
                let mid = view.last_row(pixhigh).min(floorclip - 1);
                if mid >= yl {
                    if let Some(texture) = self.texture(self.toptexture, rdata, pic_data) {
                        dc.texture = Some(texture);
                        dc.dc_texturemid = self.rw_toptexturemid;
                        dc.yl = yl;
                        dc.yh = mid;
                        dc.draw_column(view, pixels);
                    }
                    rdata.portal_clip.ceilingclip[clip_index] = mid;
                } else {
                    rdata.portal_clip.ceilingclip[clip_index] = yl - 1;
                }
            } else if self.markceiling {
                rdata.portal_clip.ceilingclip[clip_index] = yl - 1;
            }

            if self.has_bottom {
                // bottom wall
                let pixlow = half_height - self.worldlow * scale;
                let mid = view
                    .first_row(pixlow)
                    .max(rdata.portal_clip.ceilingclip[clip_index] + 1);
                if mid <= yh {
                    if let Some(texture) = self.texture(self.bottomtexture, rdata, pic_data) {
                        dc.texture = Some(texture);
                        dc.dc_texturemid = self.rw_bottomtexturemid;
                        dc.yl = mid;
                        dc.yh = yh;
                        dc.draw_column(view, pixels);
                    }
                    rdata.portal_clip.floorclip[clip_index] = mid;
                } else {
                    rdata.portal_clip.floorclip[clip_index] = yh + 1;
                }
            } else if self.markfloor {
                rdata.portal_clip.floorclip[clip_index] = yh + 1;
            }

            if let Some(start) = self.maskedtexturecol {
                // save texturecol
                //  for backdrawing of masked mid texture
                let index = start + (x - self.rw_startx) as usize;
                rdata.visplane_render.openings[index] = texture_column;
            }
        }
    }

    /// Texture for a wall part, `None` when the side has none. A texture
    /// number with no picture behind it is reported once.
    fn texture<'a>(
        &self,
        texture: Option<usize>,
        rdata: &mut RenderData,
        pic_data: &'a PicData,
    ) -> Option<&'a WallPic> {
        let num = texture?;
        let pic = pic_data.get_texture(num);
        if pic.is_none() {
            rdata.missing.warn("wall texture", &num.to_string());
        }
        pic
    }
}

/// A single wall column, `yl..=yh` on screen
pub struct DrawColumn<'a> {
    texture: Option<&'a WallPic>,
    texture_column: i32,
    light: f32,
    /// Texels per screen row
    fracstep: f32,
    dc_x: i32,
    /// World height of the texture's top edge, relative to the eye
    dc_texturemid: f32,
    depth: f32,
    yl: i32,
    yh: i32,
}

impl DrawColumn<'_> {
    /// Doom function name `R_DrawColumn`. Walls tile vertically.
    pub fn draw_column(&self, view: &RenderView, pixels: &mut FrameBuffer) {
        let Some(texture) = self.texture else {
            return;
        };
        let column = texture.column(self.texture_column);
        if column.is_empty() || self.yl > self.yh {
            return;
        }
        let height = column.len() as i32;

        for y in self.yl.max(0)..=self.yh.min(view.height - 1) {
            let frac = self.dc_texturemid - view.row_height(y) * self.fracstep;
            let select = wrap(frac.floor() as i32, height) as usize;
            let colour = shade(column[select], self.light);
            pixels.write(self.dc_x, y, self.depth, &colour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DrawColumn;
    use crate::frame_buffer::{BACKGROUND, FrameBuffer};
    use crate::utilities::RenderView;
    use glam::Vec2;
    use level::Picture;
    use level::pic::argb;
    use math::Angle;
    use render_trait::{BufferSize, PixelBuffer, ViewState};
    use std::f32::consts::FRAC_PI_2;

    fn view() -> RenderView {
        let state = ViewState {
            xy: Vec2::ZERO,
            viewz: 41.0,
            angle: Angle::new(0.0),
            fov: FRAC_PI_2,
        };
        RenderView::new(&state, FRAC_PI_2, &BufferSize::new(320, 200))
    }

    #[test]
    fn column_tiles_and_writes_depth() {
        // Top half red, bottom half green, 8 rows tall
        let pic = Picture::from_fn("T", 1, 8, |_, y| {
            if y < 4 {
                argb(255, 255, 0, 0)
            } else {
                argb(255, 0, 255, 0)
            }
        });
        let v = view();
        let mut frame = FrameBuffer::new(320, 200);
        frame.reset();
        // One texel per row, texture top at the top of the screen
        let dc = DrawColumn {
            texture: Some(&pic),
            texture_column: 0,
            light: 1.0,
            fracstep: 1.0,
            dc_x: 10,
            dc_texturemid: v.half_height,
            depth: 64.0,
            yl: 0,
            yh: 15,
        };
        dc.draw_column(&v, &mut frame);
        assert_eq!(frame.read_pixel(10, 0), [255, 0, 0, 255]);
        assert_eq!(frame.read_pixel(10, 4), [0, 255, 0, 255]);
        // wrapped
        assert_eq!(frame.read_pixel(10, 8), [255, 0, 0, 255]);
        assert_eq!(frame.read_pixel(10, 16), BACKGROUND);
        assert_eq!(frame.depth().depth(10, 15), 64.0);
    }

    #[test]
    fn inverted_column_is_noop() {
        let pic = Picture::from_fn("T", 4, 4, |_, _| argb(255, 1, 2, 3));
        let v = view();
        let mut frame = FrameBuffer::new(320, 200);
        frame.reset();
        let dc = DrawColumn {
            texture: Some(&pic),
            texture_column: 0,
            light: 1.0,
            fracstep: 1.0,
            dc_x: 10,
            dc_texturemid: 0.0,
            depth: 64.0,
            yl: 50,
            yh: 49,
        };
        dc.draw_column(&v, &mut frame);
        assert!(frame.buf().chunks(4).all(|c| c == BACKGROUND));
    }
}
