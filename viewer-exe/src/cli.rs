use argh::FromArgs;
use level::log;

/// Render a view of the built in sample map to a PNG
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// resolution width in pixels
    #[argh(option, default = "0")]
    pub width: usize,
    /// resolution height in pixels
    #[argh(option, default = "0")]
    pub height: usize,
    /// horizontal field of view in degrees
    #[argh(option)]
    pub fov: Option<f32>,
    /// integer upscale applied to the written image
    #[argh(option)]
    pub scale: Option<usize>,
    /// path of the PNG to write
    #[argh(option, default = "String::from(\"bspview.png\")")]
    pub output: String,
    /// view X position, defaults to the player start
    #[argh(option)]
    pub x: Option<f32>,
    /// view Y position, defaults to the player start
    #[argh(option)]
    pub y: Option<f32>,
    /// view angle in degrees, 0 is east and 90 north
    #[argh(option)]
    pub angle: Option<f32>,
    /// leave the map objects out
    #[argh(switch)]
    pub no_sprites: bool,
}
