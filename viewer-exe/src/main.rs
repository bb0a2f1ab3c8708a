//! `bspview` renders one view of the built in sample map with the software
//! renderer and writes it out as a PNG.

mod cli;
mod config;
mod snapshot;

use cli::*;
use glam::Vec2;
use level::log::{self, debug, info, warn};
use level::samples::{PLAYER_START, courtyard, sample_pics, sprite_for_kind};
use level::{MapData, Thing};
use math::Angle;
use render_soft::{FrameBuffer, SoftwareRenderer};
use render_trait::{PlayViewRenderer, SpriteSource, ViewState};
use simplelog::TermLogger;
use std::error::Error;

use crate::config::UserConfig;

const BASE_DIR: &str = "bspview/";
/// Eye height above the floor the viewer stands on
const VIEW_HEIGHT: f32 = 41.0;

/// A map thing resolved to the sprite it shows
struct MapObject {
    xy: Vec2,
    z: f32,
    height: f32,
    name: &'static str,
    light: usize,
}

impl MapObject {
    fn new(thing: &Thing, map: &MapData) -> Option<Self> {
        let (name, height) = sprite_for_kind(thing.kind)?;
        let sector = map.point_in_sector(thing.xy);
        Some(Self {
            xy: thing.xy,
            z: sector.floorheight,
            height,
            name,
            light: sector.lightlevel,
        })
    }
}

impl SpriteSource for MapObject {
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

/// The player start, or the middle of the map if there isn't one
fn view_for(options: &CLIOptions, map: &MapData) -> ViewState {
    let (start, angle) = map
        .things()
        .iter()
        .find(|t| t.kind == PLAYER_START)
        .map(|t| (t.xy, t.angle))
        .unwrap_or_else(|| {
            let extents = map.get_map_extents();
            (
                (extents.min_vertex + extents.max_vertex) * 0.5,
                Angle::default(),
            )
        });

    let xy = Vec2::new(options.x.unwrap_or(start.x), options.y.unwrap_or(start.y));
    let angle = options.angle.map(Angle::from_degrees).unwrap_or(angle);
    let viewz = map.point_in_sector(xy).floorheight + VIEW_HEIGHT;
    ViewState {
        xy,
        viewz,
        angle,
        fov: options.fov.unwrap_or(90.0).to_radians(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load();
    user_config.sync_cli(&mut options);
    user_config.write();

    let render_config = user_config.render_config();
    let mut renderer = SoftwareRenderer::new(&render_config)?;

    let pic_data = sample_pics();
    let map = courtyard(&pic_data)?;
    info!(
        "Loaded {}: {} sectors, {} segs, {} subsectors",
        map.name(),
        map.sectors().len(),
        map.segments().len(),
        map.subsectors().len()
    );

    let objects: Vec<MapObject> = if options.no_sprites {
        Vec::new()
    } else {
        map.things()
            .iter()
            .filter_map(|thing| MapObject::new(thing, &map))
            .collect()
    };
    let objects: Vec<&dyn SpriteSource> = objects.iter().map(|o| o as &dyn SpriteSource).collect();

    let view = view_for(&options, &map);
    info!(
        "Viewing from {} at height {}, facing {} degrees",
        view.xy,
        view.viewz,
        view.angle.to_degrees()
    );

    let mut buffer = FrameBuffer::new(render_config.screen_width, render_config.screen_height);
    renderer.render_player_view(&view, &objects, &map, &pic_data, &mut buffer);
    debug!("{:?}", renderer.stats());
    if renderer.missing_pictures() > 0 {
        warn!(
            "{} pictures were missing and not drawn",
            renderer.missing_pictures()
        );
    }

    snapshot::save_png(&buffer, render_config.screen_scale, &options.output)?;
    info!(
        "Wrote {}x{} frame to {}",
        render_config.screen_width * render_config.screen_scale,
        render_config.screen_height * render_config.screen_scale,
        options.output
    );
    Ok(())
}
