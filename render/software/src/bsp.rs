use std::f32::consts::PI;

use glam::Vec2;
use level::log::{debug, trace};
use level::{BspVisitor, MapData, PicData, Sector};
use math::{Angle, BBox};
use render_trait::{BufferSize, PixelBuffer, PlayViewRenderer, SpriteSource, ViewState};

use super::RenderData;
use super::defs::ClipRange;
use super::segs::SegRender;
use super::things::{MAX_VIS_SPRITES, VisSprite};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::frame_buffer::FrameBuffer;
use crate::utilities::{NEAR_CLIP, RenderView, clip_to_near};

/// Left sentinel of the solid column list, never drawn over
const CLIP_MIN: i32 = i32::MIN + 1;
/// Right sentinel of the solid column list
const CLIP_MAX: i32 = i32::MAX - 1;

/// Counters for the last frame, logged at trace level
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Far side bounding boxes tested during the BSP walk
    pub nodes_checked: usize,
    pub subsectors: usize,
    pub segs: usize,
    pub drawsegs: usize,
    pub visplanes: usize,
    pub vissprites: usize,
}

/// Draws one view of a map per `render_frame` call. Walls go first, front
/// to back in BSP order, then the floors and ceilings they marked, then
/// sprites and see through middle textures against the depth buffer. All
/// per frame storage is kept between frames and only grows.
pub struct SoftwareRenderer {
    config: RenderConfig,
    /// Column ranges already covered by solid walls, sorted, with a
    /// sentinel at each end
    solidsegs: Vec<ClipRange>,
    /// Visible sprite data, used for Z-ordered rendering of sprites
    pub(super) vissprites: Vec<VisSprite>,

    pub(super) r_data: RenderData,
    pub(super) seg_renderer: SegRender,
    pub(super) view: RenderView,
    pub(super) stats: FrameStats,
}

/// Hands the subsectors of a BSP walk to the renderer
struct BspWalk<'a> {
    renderer: &'a mut SoftwareRenderer,
    pic_data: &'a PicData,
    pixels: &'a mut FrameBuffer,
}

impl BspVisitor for BspWalk<'_> {
    fn bbox_visible(&mut self, bbox: &BBox) -> bool {
        self.renderer.stats.nodes_checked += 1;
        !self.renderer.is_screen_closed() && self.renderer.bb_extents_in_fov(bbox)
    }

    fn visit_subsector(&mut self, map: &MapData, subsector: usize) {
        self.renderer
            .draw_subsector(map, subsector, self.pic_data, self.pixels);
    }
}

impl SoftwareRenderer {
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let (width, height) = (config.screen_width, config.screen_height);
        let fov = config.fov_radians();
        debug!(
            "Software renderer {width}x{height}, {} degree FOV, projection {}",
            config.horizontal_fov,
            config.screen_distance()
        );

        let view = ViewState {
            xy: Vec2::ZERO,
            viewz: 0.0,
            angle: Angle::default(),
            fov,
        };
        Ok(Self {
            config: *config,
            solidsegs: Vec::with_capacity(128),
            vissprites: Vec::with_capacity(MAX_VIS_SPRITES),
            r_data: RenderData::new(width, height),
            seg_renderer: SegRender::new(),
            view: RenderView::new(&view, fov, &BufferSize::new(width, height)),
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Counters from the last frame drawn
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Distinct pictures asked for and not found since this renderer was
    /// made
    pub fn missing_pictures(&self) -> usize {
        self.r_data.missing.len()
    }

    /// Doom function name `R_RenderPlayerView`. Draws everything `view` can
    /// see in to `pixels`, replacing whatever was there.
    pub fn render_frame(
        &mut self,
        view: &ViewState,
        objects: &[&dyn SpriteSource],
        map: &MapData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        let size = *pixels.size();
        pixels.reset();
        if size.width() < 1 || size.height() < 1 {
            return;
        }
        if size.width_usize() != self.r_data.portal_clip.screen_width()
            || size.height_usize() != self.r_data.portal_clip.screen_height()
        {
            debug!("Resizing render data to {}x{}", size.width(), size.height());
            let missing = std::mem::take(&mut self.r_data.missing);
            self.r_data = RenderData::new(size.width_usize(), size.height_usize());
            self.r_data.missing = missing;
        }

        let fov = if view.fov > 0.0 && view.fov < PI {
            view.fov
        } else {
            self.config.fov_radians()
        };
        self.view = RenderView::new(view, fov, &size);
        self.clear(size.width());
        self.stats = FrameStats::default();

        let mut walk = BspWalk {
            renderer: &mut *self,
            pic_data,
            pixels: &mut *pixels,
        };
        map.traverse_bsp(view.xy, &mut walk);
        self.stats.drawsegs = self.r_data.drawsegs.len();

        self.stats.visplanes = self.r_data.visplane_render.draw_planes(
            &self.view,
            pic_data,
            &mut self.r_data.missing,
            pixels,
        );
        self.draw_masked(objects, map, pic_data, pixels);
        trace!("{:?}", self.stats);
    }

    fn clear(&mut self, screen_width: i32) {
        self.vissprites.clear();
        self.clear_clip_segs(screen_width);
        self.r_data.clear_data();
    }

    /// R_AddLine - r_bsp
    fn add_line(
        &mut self,
        map: &MapData,
        seg_num: usize,
        front_sector: &Sector,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        self.stats.segs += 1;
        let seg = &map.segments()[seg_num];

        // reject orthogonal back sides
        if !seg.is_facing_point(self.view.xy) {
            return;
        }

        let Some((c1, c2)) = clip_to_near(
            self.view.to_camera(seg.v1),
            self.view.to_camera(seg.v2),
            NEAR_CLIP,
        ) else {
            return;
        };
        let sx1 = self.view.screen_x(c1);
        let sx2 = self.view.screen_x(c2);
        // Edge on, or wound the wrong way after clipping
        if !(sx1 < sx2) {
            return;
        }

        let x1 = self.view.first_column(sx1);
        let x2 = self.view.last_column(sx2);
        // Does not cross a pixel?
        if x1 > x2 {
            return;
        }

        if let Some(back_sector) = seg.backsector.map(|b| &map.sectors()[b]) {
            // Doors. Block view
            if back_sector.ceilingheight <= front_sector.floorheight
                || back_sector.floorheight >= front_sector.ceilingheight
            {
                self.clip_solid_seg(x1, x2, seg_num, map, pic_data, pixels);
                return;
            }

            // Windows usually, but also changes in heights from sectors eg: steps
            #[allow(clippy::float_cmp)]
            if back_sector.ceilingheight != front_sector.ceilingheight
                || back_sector.floorheight != front_sector.floorheight
            {
                self.clip_portal_seg(x1, x2, seg_num, map, pic_data, pixels);
                return;
            }

            // Reject empty lines used for triggers and special events.
            // Identical floor and ceiling on both sides, identical light levels
            // on both sides, and no middle texture.
            if back_sector.ceilingpic == front_sector.ceilingpic
                && back_sector.floorpic == front_sector.floorpic
                && back_sector.lightlevel == front_sector.lightlevel
                && map.sidedefs()[seg.sidedef].midtexture.is_none()
            {
                return;
            }

            self.clip_portal_seg(x1, x2, seg_num, map, pic_data, pixels);
            return;
        }
        self.clip_solid_seg(x1, x2, seg_num, map, pic_data, pixels);
    }

    /// R_Subsector - r_bsp
    fn draw_subsector(
        &mut self,
        map: &MapData,
        subsect: usize,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        self.stats.subsectors += 1;
        let subsector = &map.subsectors()[subsect];
        let front_sector = &map.sectors()[subsector.sector];
        let skynum = pic_data.sky_num();
        let viewz = self.view.viewz;

        let planes = &mut self.r_data.visplane_render;
        planes.floorplane = if front_sector.floorheight < viewz {
            Some(planes.find_plane(
                front_sector.floorheight,
                front_sector.floorpic,
                skynum,
                front_sector.lightlevel,
            ))
        } else {
            None
        };

        let sky_ceiling = front_sector.ceilingpic.is_some() && front_sector.ceilingpic == skynum;
        planes.ceilingplane = if front_sector.ceilingheight > viewz || sky_ceiling {
            Some(planes.find_plane(
                front_sector.ceilingheight,
                front_sector.ceilingpic,
                skynum,
                front_sector.lightlevel,
            ))
        } else {
            None
        };

        for seg in subsector.seg_range() {
            self.add_line(map, seg, front_sector, pic_data, pixels);
        }
    }

    /// R_ClearClipSegs - r_bsp
    fn clear_clip_segs(&mut self, screen_width: i32) {
        self.solidsegs.clear();
        self.solidsegs.push(ClipRange {
            first: CLIP_MIN,
            last: -1,
        });
        self.solidsegs.push(ClipRange {
            first: screen_width,
            last: CLIP_MAX,
        });
    }

    fn store_wall_range(
        &mut self,
        first: i32,
        last: i32,
        seg_num: usize,
        map: &MapData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        self.seg_renderer.store_wall_range(
            first,
            last,
            seg_num,
            map,
            &self.view,
            &mut self.r_data,
            pic_data,
            pixels,
        );
    }

    /// R_ClipSolidWallSegment - r_bsp
    fn clip_solid_seg(
        &mut self,
        first: i32,
        last: i32,
        seg_num: usize,
        map: &MapData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        // Find the first range that touches the range
        //  (adjacent pixels are touching).
        let mut start = 0; // first index
        while self.solidsegs[start].last < first - 1 {
            start += 1;
        }

        if first < self.solidsegs[start].first {
            if last < self.solidsegs[start].first - 1 {
                // Post is entirely visible (above start),
                // so insert a new clippost.
                self.store_wall_range(first, last, seg_num, map, pic_data, pixels);
                self.solidsegs.insert(start, ClipRange { first, last });
                return;
            }

            // There is a fragment above *start.
            let fragment_last = self.solidsegs[start].first - 1;
            self.store_wall_range(first, fragment_last, seg_num, map, pic_data, pixels);
            // Now adjust the clip size.
            self.solidsegs[start].first = first;
        }

        // Bottom contained in start?
        if last <= self.solidsegs[start].last {
            return;
        }

        let mut next = start;
        while last >= self.solidsegs[next + 1].first - 1 {
            let gap_first = self.solidsegs[next].last + 1;
            let gap_last = self.solidsegs[next + 1].first - 1;
            self.store_wall_range(gap_first, gap_last, seg_num, map, pic_data, pixels);

            next += 1;

            if last <= self.solidsegs[next].last {
                self.solidsegs[start].last = self.solidsegs[next].last;
                return self.crunch(start, next);
            }
        }

        // There is a fragment after *next.
        let gap_first = self.solidsegs[next].last + 1;
        self.store_wall_range(gap_first, last, seg_num, map, pic_data, pixels);
        // Adjust the clip size.
        self.solidsegs[start].last = last;

        self.crunch(start, next);
    }

    /// R_ClipPassWallSegment - r_bsp
    /// Clips the given range of columns, but does not includes it in the clip
    /// list. Does handle windows, e.g. LineDefs with upper and lower
    /// texture
    fn clip_portal_seg(
        &mut self,
        first: i32,
        last: i32,
        seg_num: usize,
        map: &MapData,
        pic_data: &PicData,
        pixels: &mut FrameBuffer,
    ) {
        // Find the first range that touches the range
        //  (adjacent pixels are touching).
        let mut start = 0; // first index
        while self.solidsegs[start].last < first - 1 {
            start += 1;
        }

        if first < self.solidsegs[start].first {
            if last < self.solidsegs[start].first - 1 {
                // Post is entirely visible (above start),
                self.store_wall_range(first, last, seg_num, map, pic_data, pixels);
                return;
            }

            // There is a fragment above *start.
            let fragment_last = self.solidsegs[start].first - 1;
            self.store_wall_range(first, fragment_last, seg_num, map, pic_data, pixels);
        }

        // Bottom contained in start?
        if last <= self.solidsegs[start].last {
            return;
        }

        while last >= self.solidsegs[start + 1].first - 1 {
            let gap_first = self.solidsegs[start].last + 1;
            let gap_last = self.solidsegs[start + 1].first - 1;
            self.store_wall_range(gap_first, gap_last, seg_num, map, pic_data, pixels);

            start += 1;

            if last <= self.solidsegs[start].last {
                return;
            }
        }

        // There is a fragment after *next.
        let gap_first = self.solidsegs[start].last + 1;
        self.store_wall_range(gap_first, last, seg_num, map, pic_data, pixels);
    }

    /// Remove the ranges swallowed by `start`
    fn crunch(&mut self, start: usize, next: usize) {
        if next == start {
            return;
        }
        self.solidsegs.drain(start + 1..=next);
    }

    /// Solid walls cover every column, nothing further away can show
    fn is_screen_closed(&self) -> bool {
        self.solidsegs[0].last >= self.view.width - 1
    }

    /// R_CheckBBox - r_bsp
    ///
    /// True if some part of the box may be visible. Boxes wholly behind the
    /// eye are not, boxes that only reach behind the near plane always are.
    fn bb_extents_in_fov(&self, bbox: &BBox) -> bool {
        let view = &self.view;
        let boxx = if view.xy.x <= bbox.left {
            0
        } else if view.xy.x < bbox.right {
            1
        } else {
            2
        };
        let boxy = if view.xy.y >= bbox.top {
            0
        } else if view.xy.y > bbox.bottom {
            1
        } else {
            2
        };

        let boxpos = (boxy << 2) + boxx;
        // Inside the box
        if boxpos == 5 || boxpos > 10 {
            return true;
        }

        // The two corners that bound the box as seen from the view
        let (v1, v2) = match boxpos {
            0 => (
                Vec2::new(bbox.right, bbox.top),
                Vec2::new(bbox.left, bbox.bottom),
            ),
            1 => (
                Vec2::new(bbox.right, bbox.top),
                Vec2::new(bbox.left, bbox.top),
            ),
            2 => (
                Vec2::new(bbox.right, bbox.bottom),
                Vec2::new(bbox.left, bbox.top),
            ),
            4 => (
                Vec2::new(bbox.left, bbox.top),
                Vec2::new(bbox.left, bbox.bottom),
            ),
            6 => (
                Vec2::new(bbox.right, bbox.bottom),
                Vec2::new(bbox.right, bbox.top),
            ),
            8 => (
                Vec2::new(bbox.left, bbox.top),
                Vec2::new(bbox.right, bbox.bottom),
            ),
            9 => (
                Vec2::new(bbox.left, bbox.bottom),
                Vec2::new(bbox.right, bbox.bottom),
            ),
            10 => (
                Vec2::new(bbox.left, bbox.bottom),
                Vec2::new(bbox.right, bbox.top),
            ),
            _ => return true,
        };

        let c1 = view.to_camera(v1);
        let c2 = view.to_camera(v2);
        // The box lies between these two corners as seen from the eye
        if c1.y < 0.0 && c2.y < 0.0 {
            return false;
        }
        if c1.y < NEAR_CLIP || c2.y < NEAR_CLIP {
            return true;
        }

        let x1 = view.first_column(view.screen_x(c1));
        let x2 = view.last_column(view.screen_x(c2));
        // Off screen, or does not cross a pixel
        if x1 > x2 {
            return false;
        }

        let mut start = 0;
        while self.solidsegs[start].last < x2 {
            start += 1;
        }

        !(x1 >= self.solidsegs[start].first && x2 <= self.solidsegs[start].last)
    }
}

impl PlayViewRenderer for SoftwareRenderer {
    type Buffer = FrameBuffer;

    fn render_player_view(
        &mut self,
        view: &ViewState,
        objects: &[&dyn SpriteSource],
        map: &MapData,
        pic_data: &PicData,
        buffer: &mut FrameBuffer,
    ) {
        self.render_frame(view, objects, map, pic_data, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::SoftwareRenderer;
    use crate::config::RenderConfig;
    use crate::defs::ClipRange;
    use glam::Vec2;
    use math::BBox;

    fn renderer() -> SoftwareRenderer {
        let mut r = SoftwareRenderer::new(&RenderConfig::default()).unwrap();
        r.clear(320);
        r
    }

    #[test]
    fn clip_segs_start_open() {
        let r = renderer();
        assert_eq!(r.solidsegs.len(), 2);
        assert_eq!(r.solidsegs[0].last, -1);
        assert_eq!(r.solidsegs[1].first, 320);
        assert!(!r.is_screen_closed());
    }

    #[test]
    fn crunch_merges_ranges() {
        let mut r = renderer();
        r.solidsegs.insert(1, ClipRange { first: 10, last: 20 });
        r.solidsegs.insert(2, ClipRange { first: 30, last: 40 });
        r.solidsegs[1].last = 40;
        r.crunch(1, 2);
        assert_eq!(r.solidsegs.len(), 3);
        assert_eq!(r.solidsegs[1], ClipRange { first: 10, last: 40 });
    }

    #[test]
    fn bbox_behind_is_culled() {
        let r = renderer();
        // Viewer at the origin facing east
        let behind = BBox::new(Vec2::new(-300.0, -50.0), Vec2::new(-200.0, 50.0));
        assert!(!r.bb_extents_in_fov(&behind));
        let ahead = BBox::new(Vec2::new(200.0, -50.0), Vec2::new(300.0, 50.0));
        assert!(r.bb_extents_in_fov(&ahead));
        let around = BBox::new(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0));
        assert!(r.bb_extents_in_fov(&around));
    }
}
