//! Software renderer for BSP levels. Walls are drawn front to back in
//! columns, clipped against what is already on screen, with floors and
//! ceilings collected as visplanes and drawn once the walls are done.
//! Sprites and see through middle textures go last, tested against the
//! depth buffer.

use self::{defs::DrawSeg, planes::VisPlaneRender, portals::PortalClip};
use defs::MAXDRAWSEGS;
use utilities::WarnOnce;

mod bsp;
mod config;
mod defs;
mod depth_buffer;
mod error;
mod frame_buffer;
mod planes;
mod portals;
mod segs;
mod things;
mod utilities;

#[cfg(test)]
mod tests;

pub use bsp::{FrameStats, SoftwareRenderer};
pub use config::RenderConfig;
pub use depth_buffer::DepthBuffer;
pub use error::RenderError;
pub use frame_buffer::{BACKGROUND, FrameBuffer};
pub use planes::SKY_ANGLE_SCALE;

/// We store most of what is needed for rendering in various functions here to avoid
/// having to pass too many things in args through multiple function calls. This
/// is due to the Doom C relying a fair bit on global state.
///
/// `RenderData` will be passed to the sprite drawer/clipper to use `drawsegs`
/// ----------------------------------------------------------------------------
/// - R_DrawMasked, r_things.c
/// - R_StoreWallRange, r_segs.c, pushes its one entry when finished
/// - R_DrawPlanes, r_plane.c
pub(crate) struct RenderData {
    /// DrawSegs in the order they were stored, nearest first
    pub drawsegs: Vec<DrawSeg>,
    pub portal_clip: PortalClip,
    pub visplane_render: VisPlaneRender,
    /// Pictures the map asked for that were not found
    pub missing: WarnOnce,
}

impl RenderData {
    pub(crate) fn new(screen_width: usize, screen_height: usize) -> Self {
        Self {
            drawsegs: Vec::with_capacity(MAXDRAWSEGS),
            visplane_render: VisPlaneRender::new(screen_width),
            portal_clip: PortalClip::new(screen_width, screen_height),
            missing: WarnOnce::default(),
        }
    }

    pub(crate) fn clear_data(&mut self) {
        self.portal_clip.clear();
        self.drawsegs.clear();
        self.visplane_render.clear_planes();
    }
}
